use crate::error::Result;
use crate::types::{LookupEvent, Watermark};

/// Read side of the e-reader's lookup history
pub trait LookupSource {
    /// Lookups with `timestamp > cutoff_ms`, newest first
    fn lookups_after(&self, cutoff_ms: i64) -> Result<Vec<LookupEvent>>;
}

/// Persisted boundary of already-imported clippings
pub trait WatermarkStore {
    fn load(&self) -> Result<Option<Watermark>>;

    fn store(&mut self, watermark: Watermark) -> Result<()>;
}
