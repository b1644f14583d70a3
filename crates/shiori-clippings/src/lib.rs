//! Clippings export parsing and the highlight window.

pub mod filter;
pub mod html;
pub mod parser;

pub use filter::{after_watermark, highlights_only};
pub use parser::{ClippingFormat, ParseOptions, ParseOutput, Parsed, read_clippings};
