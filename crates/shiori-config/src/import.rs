use serde::{Deserialize, Serialize};

fn default_highlight_marker() -> String {
    "ハイライト".to_string()
}

fn default_benign_markers() -> Vec<String> {
    vec!["ブックマーク".to_string()]
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ImportConfig {
    /// Substring of the clipping kind that marks a highlight
    #[serde(default = "default_highlight_marker")]
    pub highlight_marker: String,
    /// Malformed blocks containing one of these are dropped without a report
    #[serde(default = "default_benign_markers")]
    pub benign_markers: Vec<String>,
    /// Device clock offset from UTC; the host's offset when unset
    pub utc_offset_minutes: Option<i32>,
    /// Suppress progress signalling and watermark persistence
    pub diagnostic: bool,
    /// Log notes instead of sending them
    pub dry_run: bool,
}

impl ImportConfig {
    /// A dry run never persists anything either
    pub fn is_diagnostic(&self) -> bool {
        self.diagnostic || self.dry_run
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            highlight_marker: default_highlight_marker(),
            benign_markers: default_benign_markers(),
            utc_offset_minutes: None,
            diagnostic: false,
            dry_run: false,
        }
    }
}
