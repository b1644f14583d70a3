use std::fmt;

use shiori_core::Watermark;

/// Separator used when listing raw blocks back to the operator
pub const BLOCK_SEPARATOR: &str = "\n==========\n";

/// Outcome of one import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Notes committed (or logged, on a dry run)
    pub imported: usize,
    /// Notes dropped as (sentence, word) duplicates
    pub duplicates: usize,
    /// Highlights at or before the watermark
    pub old_highlights: usize,
    /// Highlights with no text
    pub empty_highlights: usize,
    /// Clippings that are not highlights
    pub non_highlights: usize,
    /// Raw text of blocks that failed to parse
    pub bad_clippings: Vec<String>,
    /// Rendered highlights with no matching lookup
    pub unmatched: Vec<String>,
    /// Words resolved through the tokenizer fallback
    pub fallback: usize,
    /// Watermark persisted by this run
    pub watermark: Option<Watermark>,
}

impl ImportReport {
    pub fn bad_clippings_text(&self) -> Option<String> {
        (!self.bad_clippings.is_empty()).then(|| {
            format!(
                "The following {} clippings could not be parsed:\n\n{}",
                self.bad_clippings.len(),
                self.bad_clippings.join(BLOCK_SEPARATOR)
            )
        })
    }

    pub fn unmatched_text(&self) -> Option<String> {
        (!self.unmatched.is_empty()).then(|| {
            format!(
                "The following {} clippings could not be matched automatically:\n\n{}",
                self.unmatched.len(),
                self.unmatched.join(BLOCK_SEPARATOR)
            )
        })
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.imported > 0 {
            parts.push(format!("{} new highlights imported", self.imported));
        }
        if self.old_highlights > 0 {
            parts.push(format!("{} old highlights ignored", self.old_highlights));
        }
        if self.empty_highlights > 0 {
            parts.push(format!("{} empty highlights ignored", self.empty_highlights));
        }
        if self.non_highlights > 0 {
            parts.push(format!("{} non-highlight clippings ignored", self.non_highlights));
        }
        if self.fallback > 0 {
            parts.push(format!("{} words segmented by the tokenizer", self.fallback));
        }

        if !parts.is_empty() {
            write!(f, "{}.", parts.join(", "))
        } else if !self.bad_clippings.is_empty() || !self.unmatched.is_empty() {
            f.write_str("No other clippings found.")
        } else {
            f.write_str("No clippings found.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_nonzero_counts() {
        let report = ImportReport {
            imported: 3,
            non_highlights: 2,
            ..ImportReport::default()
        };
        assert_eq!(
            report.to_string(),
            "3 new highlights imported, 2 non-highlight clippings ignored."
        );
    }

    #[test]
    fn empty_highlights_are_not_called_non_highlights() {
        let report = ImportReport {
            empty_highlights: 1,
            non_highlights: 1,
            ..ImportReport::default()
        };
        assert_eq!(
            report.to_string(),
            "1 empty highlights ignored, 1 non-highlight clippings ignored."
        );
    }

    #[test]
    fn empty_runs_say_so() {
        assert_eq!(ImportReport::default().to_string(), "No clippings found.");

        let report = ImportReport {
            bad_clippings: vec!["garbage".to_string()],
            ..ImportReport::default()
        };
        assert_eq!(report.to_string(), "No other clippings found.");
    }

    #[test]
    fn raw_blocks_are_joined_with_separators() {
        let report = ImportReport {
            unmatched: vec!["a\n".to_string(), "b\n".to_string()],
            ..ImportReport::default()
        };

        assert_eq!(report.bad_clippings_text(), None);
        assert_eq!(
            report.unmatched_text().unwrap(),
            "The following 2 clippings could not be matched automatically:\n\na\n\n==========\nb\n"
        );
    }
}
