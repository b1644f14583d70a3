use serde::{Deserialize, Serialize};
use shiori_core::notes::FieldRole;

fn default_url() -> String {
    "http://localhost:8765".to_string()
}

fn default_deck() -> String {
    "Kindle".to_string()
}

fn default_model() -> String {
    "Kindle Mining".to_string()
}

/// Where the normalized word field is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordSource {
    /// Headword recorded by the e-reader dictionary
    #[default]
    Stem,
    /// Surface form as looked up
    Word,
    /// The highlighted text itself
    Highlight,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub sentence_field: String,
    pub source_field: String,
    pub word_field: String,
}

impl FieldMapping {
    pub fn field_for(&self, role: FieldRole) -> String {
        match role {
            FieldRole::Sentence => self.sentence_field.clone(),
            FieldRole::Source => self.source_field.clone(),
            FieldRole::Word => self.word_field.clone(),
        }
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            sentence_field: "Sentence".to_string(),
            source_field: "Source".to_string(),
            word_field: "Word".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnkiConfig {
    /// AnkiConnect URL
    #[serde(default = "default_url")]
    pub url: String,
    /// Root deck; cards land in `<deck>::<book title>`
    #[serde(default = "default_deck")]
    pub deck: String,
    /// Note type name
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(flatten)]
    pub fields: FieldMapping,
    pub word_source: WordSource,
}

impl AnkiConfig {
    pub fn deck_path(&self, title: &str) -> String {
        format!("{}::{}", self.deck, title)
    }
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            deck: default_deck(),
            model: default_model(),
            fields: FieldMapping::default(),
            word_source: WordSource::default(),
        }
    }
}
