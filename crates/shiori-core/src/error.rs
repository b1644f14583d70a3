use std::path::PathBuf;

use crate::dictionary::LoadError;
use crate::language::TokenizeError;
use crate::notes::FieldRole;

pub type Result<T> = std::result::Result<T, ImportError>;

/// Configuration-class failures that abort an import run.
///
/// Data-quality problems (malformed blocks, unmatched highlights, duplicate
/// notes) are never raised; they are collected into the run report.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Unsupported clippings file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Cannot read {what} at {}: {source}", path.display())]
    Unreadable {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Note type not found: {0}")]
    ModelNotFound(String),

    #[error("No field is mapped to the {0} role")]
    UnmappedRole(FieldRole),

    #[error("Note type {model:?} has no field {field:?} (mapped to the {role} role)")]
    MissingField {
        model: String,
        role: FieldRole,
        field: String,
    },

    #[error("Invalid watermark {value:?}: {source}")]
    InvalidWatermark {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Known-word dictionary error: {0}")]
    Dictionary(#[from] LoadError),

    #[error("Tokenizer environment error: {0}")]
    Environment(#[from] TokenizeError),

    #[error("Lookup store error at {}: {source}", path.display())]
    LookupStore {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Note store error: {0:#}")]
    NoteStore(#[source] anyhow::Error),

    #[error("Watermark store error: {0:#}")]
    WatermarkStore(#[source] anyhow::Error),
}
