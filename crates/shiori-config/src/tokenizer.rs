use serde::{Deserialize, Serialize};

/// External morphological analyzer used as the last normalization fallback
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TokenizerConfig {
    /// MeCab-compatible command; the built-in segmenter is used when unset
    pub command: Option<String>,
    pub args: Vec<String>,
}
