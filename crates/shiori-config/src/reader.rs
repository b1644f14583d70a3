use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_clippings_file() -> String {
    "documents/My Clippings.txt".to_string()
}

fn default_vocab_db() -> String {
    "system/vocabulary/vocab.db".to_string()
}

/// Layout of the mounted e-reader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Mount point of the device
    pub root: PathBuf,
    /// Clippings export, relative to `root` unless absolute
    #[serde(default = "default_clippings_file")]
    pub clippings_file: String,
    /// Lookup database, relative to `root` unless absolute
    #[serde(default = "default_vocab_db")]
    pub vocab_db: String,
}

impl ReaderConfig {
    pub fn clippings_path(&self) -> PathBuf {
        self.root.join(&self.clippings_file)
    }

    pub fn vocab_db_path(&self) -> PathBuf {
        self.root.join(&self.vocab_db)
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            clippings_file: default_clippings_file(),
            vocab_db: default_vocab_db(),
        }
    }
}
