use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Known-word files: jmdict-simplified `.json` or one word per line
    pub known_words_paths: Vec<String>,
}
