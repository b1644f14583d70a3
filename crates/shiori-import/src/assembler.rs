use std::collections::HashSet;

use shiori_config::anki::{AnkiConfig, WordSource};
use shiori_core::notes::NoteLayout;
use shiori_core::{Clipping, LookupEvent};

/// A note waiting for the commit phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNote {
    /// One value per note type field
    pub fields: Vec<String>,
    pub tags: Vec<String>,
    pub deck: String,
    pub sentence: String,
    pub word: String,
    pub clipping: Clipping,
}

impl PendingNote {
    fn key(&self) -> (String, String) {
        (self.sentence.clone(), self.word.clone())
    }
}

/// `ページ<page> <added> <word>`, absent parts left out
pub fn source_field(clipping: &Clipping, lookup: &LookupEvent) -> String {
    let page = clipping.page.as_deref().map(|page| format!("ページ{page}"));
    [page.as_deref(), clipping.added.as_deref(), Some(lookup.word.as_str())]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tags cannot contain whitespace
pub fn sanitize_tag(tag: &str) -> Option<String> {
    let tag = tag.split_whitespace().collect::<Vec<_>>().join("_");
    (!tag.is_empty()).then_some(tag)
}

pub struct NoteAssembler<'a> {
    layout: &'a NoteLayout,
    anki: &'a AnkiConfig,
}

impl<'a> NoteAssembler<'a> {
    pub fn new(layout: &'a NoteLayout, anki: &'a AnkiConfig) -> Self {
        Self { layout, anki }
    }

    /// Raw text the word field is normalized from
    pub fn word_input<'b>(&self, clipping: &'b Clipping, lookup: &'b LookupEvent) -> &'b str {
        match self.anki.word_source {
            WordSource::Stem => lookup.stem.as_str(),
            WordSource::Word => lookup.word.as_str(),
            WordSource::Highlight => clipping.content.as_str(),
        }
    }

    pub fn assemble(&self, clipping: &Clipping, lookup: &LookupEvent, word: String) -> PendingNote {
        let sentence = lookup.usage.trim().to_string();
        let source = source_field(clipping, lookup);
        let fields = self.layout.fill(sentence.clone(), source, word.clone());

        let tags = [lookup.authors.as_str(), lookup.title.as_str()]
            .into_iter()
            .filter_map(sanitize_tag)
            .collect();

        let title = match lookup.title.trim() {
            "" => clipping.document.trim(),
            title => title,
        };

        PendingNote {
            fields,
            tags,
            deck: self.anki.deck_path(title),
            sentence,
            word,
            clipping: clipping.clone(),
        }
    }
}

/// Notes in match order with (sentence, word) duplicates suppressed
#[derive(Debug, Default)]
pub struct NoteQueue {
    notes: Vec<PendingNote>,
    seen: HashSet<(String, String)>,
    duplicates: usize,
}

impl NoteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// `false` when an earlier note has the same sentence and word
    pub fn push(&mut self, note: PendingNote) -> bool {
        if !self.seen.insert(note.key()) {
            tracing::debug!("Dropping duplicate note {:?} / {:?}", note.sentence, note.word);
            self.duplicates += 1;
            return false;
        }
        self.notes.push(note);
        true
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Oldest first
    pub fn into_commit_order(self) -> Vec<PendingNote> {
        let mut notes = self.notes;
        notes.reverse();
        notes
    }
}

#[cfg(test)]
mod tests {
    use shiori_core::notes::FieldRole;

    use super::*;

    fn layout() -> NoteLayout {
        let fields = ["Word", "Sentence", "Notes", "Source"]
            .into_iter()
            .map(String::from)
            .collect();
        NoteLayout::resolve("Kindle Mining", fields, |role| {
            AnkiConfig::default().fields.field_for(role)
        })
        .unwrap()
    }

    fn clipping(page: Option<&str>, added: Option<&str>) -> Clipping {
        Clipping {
            kind: Some("ハイライト".to_string()),
            document: "Some Book".to_string(),
            page: page.map(String::from),
            location: Some("120-121".to_string()),
            added: added.map(String::from),
            content: "借りた本".to_string(),
        }
    }

    fn lookup(title: &str) -> LookupEvent {
        LookupEvent {
            stem: "借りる".to_string(),
            word: "借りた".to_string(),
            usage: "  彼から借りた本だ\n".to_string(),
            timestamp: 0,
            title: title.to_string(),
            authors: "夏目 漱石".to_string(),
        }
    }

    #[test]
    fn source_leaves_out_absent_parts() {
        let added = "2023年4月1日土曜日 10:00:00";
        assert_eq!(
            source_field(&clipping(Some("5"), Some(added)), &lookup("")),
            "ページ5 2023年4月1日土曜日 10:00:00 借りた"
        );
        assert_eq!(source_field(&clipping(None, Some(added)), &lookup("")), "2023年4月1日土曜日 10:00:00 借りた");
        assert_eq!(source_field(&clipping(None, None), &lookup("")), "借りた");
    }

    #[test]
    fn tags_replace_whitespace_and_skip_empty() {
        assert_eq!(sanitize_tag(" 夏目 漱石 "), Some("夏目_漱石".to_string()));
        assert_eq!(sanitize_tag("a\tb  c"), Some("a_b_c".to_string()));
        assert_eq!(sanitize_tag("  "), None);
    }

    #[test]
    fn assembles_fields_into_layout_slots() {
        let layout = layout();
        let anki = AnkiConfig::default();
        let note = NoteAssembler::new(&layout, &anki).assemble(
            &clipping(Some("5"), None),
            &lookup("こころ"),
            "借りる".to_string(),
        );

        assert_eq!(note.fields[layout.slot(FieldRole::Word)], "借りる");
        assert_eq!(note.fields[layout.slot(FieldRole::Sentence)], "彼から借りた本だ");
        assert_eq!(note.fields[layout.slot(FieldRole::Source)], "ページ5 借りた");
        assert_eq!(note.fields[2], "");
        assert_eq!(note.tags, vec!["夏目_漱石", "こころ"]);
        assert_eq!(note.deck, "Kindle::こころ");
    }

    #[test]
    fn empty_title_falls_back_to_document() {
        let layout = layout();
        let anki = AnkiConfig::default();
        let note = NoteAssembler::new(&layout, &anki).assemble(
            &clipping(None, None),
            &lookup(""),
            "借りる".to_string(),
        );

        assert_eq!(note.deck, "Kindle::Some Book");
        assert_eq!(note.tags, vec!["夏目_漱石"]);
    }

    #[test]
    fn word_input_follows_configured_source() {
        let layout = layout();
        let mut anki = AnkiConfig::default();
        let clipping = clipping(None, None);
        let lookup = lookup("");

        assert_eq!(NoteAssembler::new(&layout, &anki).word_input(&clipping, &lookup), "借りる");
        anki.word_source = WordSource::Word;
        assert_eq!(NoteAssembler::new(&layout, &anki).word_input(&clipping, &lookup), "借りた");
        anki.word_source = WordSource::Highlight;
        assert_eq!(NoteAssembler::new(&layout, &anki).word_input(&clipping, &lookup), "借りた本");
    }

    #[test]
    fn queue_keeps_first_of_each_duplicate_set() {
        let layout = layout();
        let anki = AnkiConfig::default();
        let assembler = NoteAssembler::new(&layout, &anki);

        let notes: Vec<PendingNote> = [("一", "a"), ("二", "b"), ("一", "a"), ("三", "a")]
            .into_iter()
            .enumerate()
            .map(|(i, (page, word))| {
                let mut note = assembler.assemble(&clipping(Some(page), None), &lookup("本"), word.to_string());
                note.clipping.location = Some(i.to_string());
                note
            })
            .collect();

        let mut queue = NoteQueue::new();
        let accepted: Vec<bool> = notes.iter().cloned().map(|n| queue.push(n)).collect();
        assert_eq!(accepted, vec![true, true, false, false]);
        assert_eq!(queue.duplicates(), 2);

        let committed = queue.into_commit_order();
        let locations: Vec<_> = committed
            .iter()
            .map(|n| n.clipping.location.as_deref().unwrap())
            .collect();
        assert_eq!(locations, vec!["1", "0"]);
    }
}
