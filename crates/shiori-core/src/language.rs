/// Rule-based conversion of an inflected form to candidate dictionary forms
pub trait Deconjugator: Send + Sync {
    /// Candidates in rule order, most specific rules first
    fn deconjugate(&self, word: &str) -> Vec<DeconjugationResult>;
}

/// Morphological analyzer used as the last resort of word normalization
pub trait Tokenizer: Send + Sync {
    /// Segment text into morphemes
    fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>, TokenizeError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    pub surface: String,
    /// Dictionary form reported by the analyzer, if any
    pub base_form: Option<String>,
}

impl Morpheme {
    pub fn new(surface: impl Into<String>, base_form: Option<String>) -> Self {
        Self {
            surface: surface.into(),
            base_form,
        }
    }

    pub fn dictionary_form(&self) -> &str {
        self.base_form.as_deref().unwrap_or(&self.surface)
    }
}

/// Display form of a segmentation: base forms joined by a space
pub fn render_segmentation(morphemes: &[Morpheme]) -> String {
    morphemes
        .iter()
        .map(Morpheme::dictionary_form)
        .filter(|form| !form.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct DeconjugationResult {
    pub base_form: String,
    pub conjugation_type: String,
    pub confidence: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    #[error("failed to start analyzer {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("analyzer {command:?} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("analyzer output is not valid UTF-8")]
    InvalidOutput,
}
