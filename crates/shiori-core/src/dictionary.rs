use std::collections::HashSet;
use std::path::PathBuf;

/// Set of known dictionary headwords
pub trait Lexicon: Send + Sync {
    /// Exact membership test
    fn contains(&self, word: &str) -> bool;

    /// Number of known words
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Lexicon for HashSet<String> {
    fn contains(&self, word: &str) -> bool {
        HashSet::contains(self, word)
    }

    fn len(&self) -> usize {
        HashSet::len(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid format in {}: {source}", path.display())]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error reading {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
