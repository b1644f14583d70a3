use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use shiori_core::dictionary::{Lexicon, LoadError};

use crate::dictionary::KnownWords;

pub struct KnownWordsLoader;

impl KnownWordsLoader {
    /// Load known words from a file: `.json` as jmdict-simplified, anything else as a word list
    pub fn load_from_file(path: &Path) -> Result<KnownWords, LoadError> {
        tracing::info!("Loading known words from file: {}", path.display());

        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
            _ => LoadError::IoError {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let words = if is_json {
            KnownWords::from_jmdict_json(path, &text)?
        } else {
            KnownWords::from_word_list(&text)
        };

        tracing::info!("Loaded {} known words from {}", words.len(), path.display());
        Ok(words)
    }

    /// Union of every configured file; any failure aborts the load
    pub fn load_paths(paths: &[String]) -> Result<KnownWords, LoadError> {
        let mut words = KnownWords::new();
        for path in paths {
            words = words.merge(Self::load_from_file(Path::new(path))?);
        }

        if paths.is_empty() {
            tracing::warn!("No known-word files configured; words are kept as cleaned");
        }
        Ok(words)
    }
}
