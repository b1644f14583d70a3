pub mod dictionary;
pub mod error;
pub mod language;
pub mod notes;
pub mod preprocess;
pub mod progress;
pub mod store;
pub mod types;

pub use error::{ImportError, Result};
pub use types::{Clipping, DeviceClock, LookupEvent, Watermark};
