use shiori_core::{Clipping, DeviceClock, LookupEvent};

/// A highlight paired with the lookup it was most likely made from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled<'a> {
    pub clipping: &'a Clipping,
    pub lookup: Option<&'a LookupEvent>,
}

/// Lookup whose sentence contains the highlight, nearest in time.
///
/// Ties go to the earliest candidate in `lookups` order. A clipping without a
/// parsable timestamp takes the first candidate.
pub fn find_lookup<'a>(
    clipping: &Clipping,
    lookups: &'a [LookupEvent],
    clock: DeviceClock,
) -> Option<&'a LookupEvent> {
    let content = clipping.content.as_str();
    let mut candidates = lookups
        .iter()
        .filter(move |lookup| lookup.usage.contains(content));

    match clipping.added_at() {
        Some(added) => {
            let added_ms = clock.epoch_millis(added);
            candidates.min_by_key(|lookup| lookup.timestamp.abs_diff(added_ms))
        }
        None => candidates.next(),
    }
}

/// Match every clipping against the full lookup set; the set is never narrowed
pub fn reconcile<'a>(
    clippings: impl IntoIterator<Item = &'a Clipping>,
    lookups: &'a [LookupEvent],
    clock: DeviceClock,
) -> Vec<Reconciled<'a>> {
    clippings
        .into_iter()
        .map(|clipping| {
            let lookup = find_lookup(clipping, lookups, clock);
            match lookup {
                Some(lookup) => tracing::debug!(
                    "Matched {:?} to lookup of {:?} at {}",
                    clipping.content,
                    lookup.word,
                    lookup.timestamp
                ),
                None => tracing::debug!("No lookup contains {:?}", clipping.content),
            }
            Reconciled { clipping, lookup }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> DeviceClock {
        DeviceClock::from_offset_minutes(0).unwrap()
    }

    fn clipping(content: &str, added: Option<&str>) -> Clipping {
        Clipping {
            kind: Some("ハイライト".to_string()),
            document: "Some Book".to_string(),
            page: None,
            location: Some("1".to_string()),
            added: added.map(String::from),
            content: content.to_string(),
        }
    }

    fn lookup(word: &str, usage: &str, timestamp: i64) -> LookupEvent {
        LookupEvent {
            stem: word.to_string(),
            word: word.to_string(),
            usage: usage.to_string(),
            timestamp,
            title: "Some Book".to_string(),
            authors: "Author".to_string(),
        }
    }

    // 2023-04-01T10:00:00Z
    const ADDED_MS: i64 = 1_680_343_200_000;
    const ADDED: &str = "2023年4月1日土曜日 10:00:00";

    #[test]
    fn picks_nearest_containing_lookup() {
        let lookups = vec![
            lookup("遠い", "彼から借りた本だ", ADDED_MS + 3_600_000),
            lookup("無関係", "別の文", ADDED_MS),
            lookup("近い", "彼から借りた本だ", ADDED_MS - 60_000),
            lookup("古い", "彼から借りた本だ", ADDED_MS - 86_400_000),
        ];

        let found = find_lookup(&clipping("借りた本", Some(ADDED)), &lookups, clock());
        assert_eq!(found.map(|l| l.word.as_str()), Some("近い"));
    }

    #[test]
    fn equal_distance_keeps_first_candidate() {
        let lookups = vec![
            lookup("後", "借りた本", ADDED_MS + 1_000),
            lookup("前", "借りた本", ADDED_MS - 1_000),
        ];

        let found = find_lookup(&clipping("借りた本", Some(ADDED)), &lookups, clock());
        assert_eq!(found.map(|l| l.word.as_str()), Some("後"));
    }

    #[test]
    fn undated_clipping_takes_newest_candidate() {
        let lookups = vec![
            lookup("一", "借りた本", ADDED_MS + 5_000),
            lookup("二", "借りた本", ADDED_MS),
        ];

        let found = find_lookup(&clipping("借りた本", None), &lookups, clock());
        assert_eq!(found.map(|l| l.word.as_str()), Some("一"));
    }

    #[test]
    fn device_offset_shifts_the_comparison() {
        let lookups = vec![
            lookup("utc", "借りた本", ADDED_MS),
            lookup("jst", "借りた本", ADDED_MS - 9 * 3_600_000),
        ];
        let jst = DeviceClock::from_offset_minutes(9 * 60).unwrap();

        let found = find_lookup(&clipping("借りた本", Some(ADDED)), &lookups, jst);
        assert_eq!(found.map(|l| l.word.as_str()), Some("jst"));
    }

    #[test]
    fn every_clipping_rescans_all_lookups() {
        let lookups = vec![
            lookup("新", "新しい文と古い文", ADDED_MS),
            lookup("旧", "古い文", ADDED_MS - 10_000),
        ];
        let clippings = vec![
            clipping("新しい文", Some(ADDED)),
            clipping("古い文", Some(ADDED)),
            clipping("存在しない", Some(ADDED)),
            clipping("新しい文", Some(ADDED)),
        ];

        let matched = reconcile(&clippings, &lookups, clock());
        let words: Vec<_> = matched.iter().map(|m| m.lookup.map(|l| l.word.as_str())).collect();
        assert_eq!(words, vec![Some("新"), Some("新"), None, Some("新")]);
    }

    #[test]
    fn matching_is_deterministic() {
        let lookups: Vec<_> = (0..20)
            .map(|i| lookup(&format!("w{i}"), "同じ文", ADDED_MS + (i % 5 - 2) * 1_000))
            .collect();
        let clippings = vec![clipping("同じ文", Some(ADDED)), clipping("同じ", None)];

        let first = reconcile(&clippings, &lookups, clock());
        for _ in 0..5 {
            assert_eq!(reconcile(&clippings, &lookups, clock()), first);
        }
        assert_eq!(first[0].lookup.map(|l| l.word.as_str()), Some("w2"));
        assert_eq!(first[1].lookup.map(|l| l.word.as_str()), Some("w0"));
    }
}
