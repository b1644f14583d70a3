pub mod deconjugator;
pub mod dictionary;
pub mod loader;
pub mod normalizer;
pub mod script;
pub mod tokenizer;

pub use deconjugator::JapaneseDeconjugator;
pub use dictionary::KnownWords;
pub use loader::KnownWordsLoader;
pub use normalizer::{Normalized, NormalizerContext, NormalizerStats, Resolution};
pub use tokenizer::{CommandTokenizer, SegmentingTokenizer};
