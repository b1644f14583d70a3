use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use shiori_core::Clipping;
use shiori_core::error::{ImportError, Result};

use crate::html;

pub const SEPARATOR: &str = "==========";

static CLIPPING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\A\x{FEFF}?(?P<document>[^\n]*)\n",
        r"- (?:(?P<page>[^\n|]*?)ページ\|)?位置No\. (?P<location>[^\n]*?)の",
        r"[ \t\x{3000}]*(?:(?P<kind>[^\n|]*?)[ \t\x{3000}]*\|[ \t\x{3000}]*)?",
        r"作成日: (?P<added>[^\n]*)\n",
        r"\n",
        r"(?P<content>[^\n]*)\n?\n?\z",
    ))
    .expect("clipping pattern is valid")
});

/// Export encoding, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClippingFormat {
    /// `My Clippings.txt`, blocks separated by `==========`
    Text,
    /// Notebook export markup
    Html,
}

impl ClippingFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("txt") => Ok(Self::Text),
            Some("html" | "htm") => Ok(Self::Html),
            _ => Err(ImportError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Malformed blocks containing any of these are dropped silently
    pub benign_markers: Vec<String>,
}

impl ParseOptions {
    pub fn is_benign(&self, raw: &str) -> bool {
        self.benign_markers
            .iter()
            .any(|marker| !marker.is_empty() && raw.contains(marker.as_str()))
    }
}

/// Outcome of parsing one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Clipping(Clipping),
    /// Raw block text, shown verbatim to the operator
    Malformed(String),
    /// Known non-highlight marker that failed the grammar
    Benign,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    /// Well-formed clippings in file order
    pub clippings: Vec<Clipping>,
    /// Raw text of blocks that failed to parse, in file order
    pub bad_clippings: Vec<String>,
}

impl ParseOutput {
    pub(crate) fn push(&mut self, parsed: Parsed) {
        match parsed {
            Parsed::Clipping(clipping) => self.clippings.push(clipping),
            Parsed::Malformed(raw) => self.bad_clippings.push(raw),
            Parsed::Benign => {}
        }
    }
}

/// Match one block of the text export against the clipping grammar
pub fn parse_text_block(block: &str, options: &ParseOptions) -> Parsed {
    let Some(caps) = CLIPPING_PATTERN.captures(block) else {
        if options.is_benign(block) {
            tracing::debug!("Dropping benign block: {:?}", block);
            return Parsed::Benign;
        }
        return Parsed::Malformed(block.to_string());
    };

    let text = |name: &str| caps.name(name).map_or("", |m| m.as_str());
    let optional = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Parsed::Clipping(Clipping {
        kind: optional("kind"),
        document: text("document").to_string(),
        page: optional("page"),
        location: optional("location"),
        added: optional("added"),
        content: text("content").to_string(),
    })
}

/// Split the text export on separator lines and parse every block.
///
/// A trailing block without a closing separator is reported as malformed.
pub fn parse_text(text: &str, options: &ParseOptions) -> ParseOutput {
    let text = text.replace("\r\n", "\n");
    let mut output = ParseOutput::default();
    let mut block = String::new();

    for line in text.split_inclusive('\n') {
        if line.trim_end_matches('\n') != SEPARATOR {
            block.push_str(line);
            continue;
        }

        if !block.trim().is_empty() {
            output.push(parse_text_block(&block, options));
        }
        block.clear();
    }

    if !block.trim().is_empty() {
        tracing::warn!("Clippings file ends without a separator");
        output.bad_clippings.push(block);
    }

    output
}

pub fn parse(text: &str, format: ClippingFormat, options: &ParseOptions) -> ParseOutput {
    match format {
        ClippingFormat::Text => parse_text(text, options),
        ClippingFormat::Html => html::parse_html(text, options),
    }
}

/// Read and parse a clippings export; the extension is checked before reading
pub fn read_clippings(path: &Path, options: &ParseOptions) -> Result<ParseOutput> {
    let format = ClippingFormat::from_path(path)?;

    let text = fs::read_to_string(path).map_err(|source| ImportError::Unreadable {
        what: "clippings file",
        path: path.to_path_buf(),
        source,
    })?;

    let output = parse(&text, format, options);
    tracing::info!(
        "Parsed {} clippings ({} malformed) from {}",
        output.clippings.len(),
        output.bad_clippings.len(),
        path.display()
    );
    Ok(output)
}
