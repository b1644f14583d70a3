//! Notebook export (`.html`) variant.
//!
//! The export is a flat list of `div`s: `bookTitle` sets the document,
//! each `noteHeading` is followed by the `noteText` it describes. It carries
//! no creation timestamps.

use std::sync::LazyLock;

use regex::Regex;
use shiori_core::Clipping;

use crate::parser::{ParseOptions, ParseOutput, Parsed};

static ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<(?:div|h[1-6])\b[^>]*\bclass\s*=\s*['"](?P<class>[^'"]+)['"][^>]*>(?P<body>.*?)</(?:div|h[1-6])>"#,
    )
    .expect("element pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:[xX](?P<hex>[0-9a-fA-F]{1,6})|(?P<dec>[0-9]{1,7}));")
        .expect("character reference pattern is valid")
});

static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:位置(?:No\.)?|Location)\s*(?P<location>[0-9][0-9\-]*)")
        .expect("location pattern is valid")
});

static PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?P<before>[0-9ivxlcdmIVXLCDM]+)\s*ページ|(?:ページ|Page)\s*(?P<after>[0-9ivxlcdmIVXLCDM]+))")
        .expect("page pattern is valid")
});

struct Heading {
    kind: Option<String>,
    page: Option<String>,
    location: String,
    raw: String,
}

fn decode_char_ref(caps: &regex::Captures<'_>) -> String {
    let code = match (caps.name("hex"), caps.name("dec")) {
        (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
        (None, Some(dec)) => dec.as_str().parse().ok(),
        (None, None) => None,
    };

    // Invalid code points stay as written
    code.and_then(char::from_u32)
        .map_or_else(|| caps[0].to_string(), String::from)
}

fn element_text(body: &str) -> String {
    let stripped = TAG.replace_all(body, "");
    let decoded = CHAR_REF.replace_all(&stripped, decode_char_ref);
    decoded
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

fn parse_heading(text: &str, raw: &str) -> Option<Heading> {
    let location = LOCATION.captures(text)?.name("location")?.as_str().to_string();

    let page = PAGE.captures(text).and_then(|caps| {
        caps.name("before")
            .or_else(|| caps.name("after"))
            .map(|m| m.as_str().to_string())
    });

    // Kind is everything before the colour annotation or the " - " position part
    let kind_end = text
        .find(['(', '（'])
        .into_iter()
        .chain(text.find(" - "))
        .min()
        .unwrap_or(0);
    let kind = Some(text[..kind_end].trim().to_string()).filter(|k| !k.is_empty());

    Some(Heading {
        kind,
        page,
        location,
        raw: raw.to_string(),
    })
}

pub fn parse_html(text: &str, options: &ParseOptions) -> ParseOutput {
    let mut output = ParseOutput::default();
    let mut document = String::new();
    let mut pending: Option<Heading> = None;
    let mut skip_text = false;

    for element in ELEMENT.captures_iter(text) {
        let raw = element.get(0).map_or("", |m| m.as_str());
        let classes = element.name("class").map_or("", |m| m.as_str());
        let body = element_text(element.name("body").map_or("", |m| m.as_str()));
        let has_class = |name: &str| classes.split_whitespace().any(|c| c == name);

        if has_class("bookTitle") {
            document = body;
        } else if has_class("noteHeading") {
            if let Some(orphan) = pending.take() {
                output.push(Parsed::Malformed(orphan.raw));
            }

            skip_text = false;
            match parse_heading(&body, raw) {
                Some(heading) => pending = Some(heading),
                None if options.is_benign(&body) => skip_text = true,
                None => output.push(Parsed::Malformed(raw.to_string())),
            }
        } else if has_class("noteText") {
            match pending.take() {
                Some(heading) => output.push(Parsed::Clipping(Clipping {
                    kind: heading.kind,
                    document: document.clone(),
                    page: heading.page,
                    location: Some(heading.location),
                    added: None,
                    content: body,
                })),
                None if skip_text => {}
                None => output.push(Parsed::Malformed(raw.to_string())),
            }
            skip_text = false;
        }
    }

    if let Some(orphan) = pending {
        output.push(Parsed::Malformed(orphan.raw));
    }

    output
}
