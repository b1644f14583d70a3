use std::sync::Arc;

use shiori_core::dictionary::Lexicon;
use shiori_core::language::{Deconjugator, TokenizeError, Tokenizer, render_segmentation};
use shiori_core::preprocess::{DefaultPreprocessor, Preprocessor};

use crate::deconjugator::JapaneseDeconjugator;
use crate::script::strip_non_lexical;
use crate::tokenizer::SegmentingTokenizer;

/// Which step of the cascade produced the headword
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Cleaned word is already a known headword
    Known,
    /// Rewritten by a deconjugation rule
    Deconjugated { conjugation_type: String },
    /// Rendered from the tokenizer's segmentation
    Segmented,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub word: String,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizerStats {
    pub known: usize,
    pub deconjugated: usize,
    pub fallback: usize,
}

/// Per-run word normalization state.
///
/// Holds the known-word set and the collaborators of the cascade: known word,
/// then rule deconjugation, then tokenizer fallback.
pub struct NormalizerContext {
    lexicon: Arc<dyn Lexicon>,
    deconjugator: Box<dyn Deconjugator>,
    tokenizer: Box<dyn Tokenizer>,
    preprocessor: DefaultPreprocessor,
    stats: NormalizerStats,
}

impl NormalizerContext {
    pub fn new(
        lexicon: Arc<dyn Lexicon>,
        deconjugator: Box<dyn Deconjugator>,
        tokenizer: Box<dyn Tokenizer>,
    ) -> Self {
        Self {
            lexicon,
            deconjugator,
            tokenizer,
            preprocessor: DefaultPreprocessor,
            stats: NormalizerStats::default(),
        }
    }

    /// Japanese rules; segments with the known-word set unless an analyzer is given
    pub fn japanese(lexicon: Arc<dyn Lexicon>, tokenizer: Option<Box<dyn Tokenizer>>) -> Self {
        let tokenizer = tokenizer
            .unwrap_or_else(|| Box::new(SegmentingTokenizer::new(Arc::clone(&lexicon))));
        Self::new(lexicon, Box::new(JapaneseDeconjugator::new()), tokenizer)
    }

    pub fn normalize(&mut self, input: &str) -> Result<Normalized, TokenizeError> {
        let preprocessed = self.preprocessor.process(input);
        let cleaned = strip_non_lexical(&preprocessed);

        if self.lexicon.contains(cleaned) {
            self.stats.known += 1;
            return Ok(Normalized {
                word: cleaned.to_string(),
                resolution: Resolution::Known,
            });
        }

        let deconjugated = self
            .deconjugator
            .deconjugate(cleaned)
            .into_iter()
            .find(|candidate| self.lexicon.contains(&candidate.base_form));
        if let Some(candidate) = deconjugated {
            tracing::debug!(
                "Deconjugated {} -> {} ({})",
                cleaned,
                candidate.base_form,
                candidate.conjugation_type
            );
            self.stats.deconjugated += 1;
            return Ok(Normalized {
                word: candidate.base_form,
                resolution: Resolution::Deconjugated {
                    conjugation_type: candidate.conjugation_type,
                },
            });
        }

        let morphemes = self.tokenizer.tokenize(cleaned)?;
        let word = render_segmentation(&morphemes);
        tracing::debug!("Tokenizer fallback for {}: {}", cleaned, word);
        self.stats.fallback += 1;
        Ok(Normalized {
            word,
            resolution: Resolution::Segmented,
        })
    }

    pub fn stats(&self) -> NormalizerStats {
        self.stats
    }
}
