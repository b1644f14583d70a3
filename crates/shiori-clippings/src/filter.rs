use shiori_core::{Clipping, Watermark};

/// Keep highlight clippings with content.
///
/// Heuristic: some exports omit the kind for legitimate highlights, so the
/// marker is configurable rather than authoritative.
pub fn highlights_only(clippings: &[Clipping], marker: &str) -> Vec<Clipping> {
    clippings
        .iter()
        .filter(|clipping| clipping.kind_contains(marker) && !clipping.content.trim().is_empty())
        .cloned()
        .collect()
}

/// Chronological suffix of `highlights` added after the watermark.
///
/// Walks newest to oldest and stops at the first clipping at or before the
/// watermark. Clippings without a parsable timestamp never stop the walk.
pub fn after_watermark(highlights: &[Clipping], watermark: Option<Watermark>) -> Vec<Clipping> {
    let Some(watermark) = watermark else {
        return highlights.to_vec();
    };

    let mut newer: Vec<Clipping> = highlights
        .iter()
        .rev()
        .take_while(|clipping| {
            clipping
                .added_at()
                .is_none_or(|added| added > watermark.at())
        })
        .cloned()
        .collect();
    newer.reverse();
    newer
}
