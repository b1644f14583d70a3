use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use shiori_core::dictionary::{Lexicon, LoadError};

// JSON structures for parsing jmdict-simplified format; only headword texts are kept
#[derive(Debug, Deserialize)]
struct JMdictJson {
    words: Vec<JMdictJsonEntry>,
}

#[derive(Debug, Deserialize)]
struct JMdictJsonEntry {
    #[serde(default)]
    kanji: Vec<TextElement>,
    #[serde(default)]
    kana: Vec<TextElement>,
}

#[derive(Debug, Deserialize)]
struct TextElement {
    text: String,
}

/// Known dictionary headwords (kanji and kana spellings)
#[derive(Debug, Clone, Default)]
pub struct KnownWords {
    words: HashSet<String>,
}

impl KnownWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every kanji and kana text of every entry in a jmdict-simplified document
    pub fn from_jmdict_json(path: &Path, json_str: &str) -> Result<Self, LoadError> {
        let data: JMdictJson =
            serde_json::from_str(json_str).map_err(|source| LoadError::InvalidFormat {
                path: path.to_path_buf(),
                source,
            })?;

        let words = data
            .words
            .into_iter()
            .flat_map(|entry| entry.kanji.into_iter().chain(entry.kana))
            .map(|element| element.text)
            .filter(|text| !text.is_empty())
            .collect();

        Ok(Self { words })
    }

    /// One word per line; blank lines and `#` comments are skipped
    pub fn from_word_list(text: &str) -> Self {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        Self { words }
    }

    pub fn merge(mut self, other: KnownWords) -> Self {
        self.words.extend(other.words);
        self
    }
}

impl Lexicon for KnownWords {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    fn len(&self) -> usize {
        self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JMDICT: &str = r#"{
        "version": "3.5.0",
        "words": [
            {
                "id": "1",
                "kanji": [{ "common": true, "text": "化ける", "tags": [] }],
                "kana": [{ "common": true, "text": "ばける", "tags": [] }],
                "sense": [{ "partOfSpeech": ["v1"], "gloss": [{ "lang": "eng", "text": "to take the form of" }] }]
            },
            {
                "id": "2",
                "kana": [{ "text": "ああ" }],
                "sense": []
            }
        ]
    }"#;

    #[test]
    fn jmdict_json_collects_kanji_and_kana() {
        let words = KnownWords::from_jmdict_json(Path::new("jmdict.json"), JMDICT).unwrap();

        assert_eq!(words.len(), 3);
        assert!(words.contains("化ける"));
        assert!(words.contains("ばける"));
        assert!(words.contains("ああ"));
        assert!(!words.contains("ばけた"));
    }

    #[test]
    fn invalid_json_names_the_file() {
        let err = KnownWords::from_jmdict_json(Path::new("broken.json"), "{ nope").unwrap_err();
        assert!(matches!(err, LoadError::InvalidFormat { ref path, .. } if path == Path::new("broken.json")));
    }

    #[test]
    fn word_list_skips_comments_and_blanks() {
        let words = KnownWords::from_word_list("# known words\n本\n\n  借りる  \n#借りた\n");

        assert_eq!(words.len(), 2);
        assert!(words.contains("借りる"));
        assert!(!words.contains("#借りた"));
    }

    #[test]
    fn merge_unions_sets() {
        let merged = KnownWords::from_word_list("本\n").merge(KnownWords::from_word_list("本\n猫\n"));
        assert_eq!(merged.len(), 2);
    }
}
