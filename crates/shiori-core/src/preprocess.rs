use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default JP preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // NFKC folds half-width katakana and full-width ASCII
        text.nfkc()
            .filter(|c| !matches!(c, '\n' | '\r'))
            .collect::<String>()
            .trim()
            .to_string()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
