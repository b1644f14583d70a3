use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

/// Logical role a note field plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Sentence,
    Source,
    Word,
}

impl FieldRole {
    pub const ALL: [FieldRole; 3] = [FieldRole::Sentence, FieldRole::Source, FieldRole::Word];
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldRole::Sentence => "sentence",
            FieldRole::Source => "source",
            FieldRole::Word => "word",
        })
    }
}

/// Role → field slot mapping, resolved once against the note type's fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLayout {
    model: String,
    field_names: Vec<String>,
    sentence: usize,
    source: usize,
    word: usize,
}

impl NoteLayout {
    /// Fails fast when a role is unmapped or names a field the note type lacks
    pub fn resolve(
        model: &str,
        field_names: Vec<String>,
        mapping: impl Fn(FieldRole) -> String,
    ) -> Result<Self> {
        let slot = |role: FieldRole| -> Result<usize> {
            let field = mapping(role);
            if field.trim().is_empty() {
                return Err(ImportError::UnmappedRole(role));
            }
            field_names
                .iter()
                .position(|name| *name == field)
                .ok_or_else(|| ImportError::MissingField {
                    model: model.to_string(),
                    role,
                    field,
                })
        };

        let sentence = slot(FieldRole::Sentence)?;
        let source = slot(FieldRole::Source)?;
        let word = slot(FieldRole::Word)?;

        Ok(Self {
            model: model.to_string(),
            field_names,
            sentence,
            source,
            word,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn slot(&self, role: FieldRole) -> usize {
        match role {
            FieldRole::Sentence => self.sentence,
            FieldRole::Source => self.source,
            FieldRole::Word => self.word,
        }
    }

    /// One value per declared field, empty for unmapped fields
    pub fn fill(&self, sentence: String, source: String, word: String) -> Vec<String> {
        let mut values = vec![String::new(); self.field_names.len()];
        values[self.sentence] = sentence;
        values[self.source] = source;
        values[self.word] = word;
        values
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedNote {
    pub note_id: u64,
    pub card_ids: Vec<u64>,
}

/// Flashcard collection the import writes into
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Declared field names of a note type, `None` when the note type does not exist
    async fn model_field_names(&self, model: &str) -> anyhow::Result<Option<Vec<String>>>;

    /// Create a note from one value per declared field
    async fn add_note(
        &self,
        model: &str,
        fields: &[String],
        tags: &[String],
    ) -> anyhow::Result<CreatedNote>;

    /// Move cards into a deck, creating the deck if needed
    async fn change_deck(&self, card_ids: &[u64], deck: &str) -> anyhow::Result<()>;
}
