use std::fmt;
use std::sync::LazyLock;

use chrono::{FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, Utc};
use regex::Regex;

use crate::error::ImportError;

/// `2023年4月1日土曜日 10:00:00`, weekday name ignored
static ADDED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{4})年(\d{1,2})月(\d{1,2})日\S*?\s*(\d{1,2}):(\d{1,2}):(\d{1,2})\s*$")
        .expect("added timestamp pattern is valid")
});

/// One excerpt from the e-reader export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipping {
    /// Free-text category label (ハイライト, ブックマーク, メモ...)
    pub kind: Option<String>,
    pub document: String,
    pub page: Option<String>,
    pub location: Option<String>,
    /// Timestamp exactly as printed in the export
    pub added: Option<String>,
    pub content: String,
}

impl Clipping {
    /// Parsed `added` timestamp in the device's local time
    pub fn added_at(&self) -> Option<NaiveDateTime> {
        self.added.as_deref().and_then(parse_added)
    }

    /// Case-insensitive substring test against the clipping kind
    pub fn kind_contains(&self, marker: &str) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.to_lowercase().contains(&marker.to_lowercase()))
    }

    /// Render back to the text export's block grammar (without separator line)
    pub fn to_block(&self) -> String {
        let page = self
            .page
            .as_deref()
            .map(|p| format!("{p}ページ|"))
            .unwrap_or_default();
        let kind = self
            .kind
            .as_deref()
            .map(|k| format!("{k} | "))
            .unwrap_or_default();

        format!(
            "{}\n- {}位置No. {}の{}作成日: {}\n\n{}\n",
            self.document,
            page,
            self.location.as_deref().unwrap_or_default(),
            kind,
            self.added.as_deref().unwrap_or_default(),
            self.content,
        )
    }
}

impl fmt::Display for Clipping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_block())
    }
}

/// Parse the export's `Year年Month月Day日Weekday H:M:S` timestamp
pub fn parse_added(added: &str) -> Option<NaiveDateTime> {
    let caps = ADDED_PATTERN.captures(added)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = i32::try_from(num(1)?).ok()?;
    NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?.and_hms_opt(num(4)?, num(5)?, num(6)?)
}

/// One dictionary lookup recorded by the e-reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEvent {
    /// Dictionary headword
    pub stem: String,
    /// Surface form as looked up
    pub word: String,
    /// Sentence the lookup happened in
    pub usage: String,
    /// Milliseconds since the unix epoch
    pub timestamp: i64,
    pub title: String,
    pub authors: String,
}

/// Boundary of already-imported clippings, persisted between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Watermark(NaiveDateTime);

impl Watermark {
    pub const ISO_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S";

    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    pub fn parse(iso: &str) -> Result<Self, ImportError> {
        NaiveDateTime::parse_from_str(iso.trim(), Self::ISO_FORMAT)
            .map(Self)
            .map_err(|source| ImportError::InvalidWatermark {
                value: iso.to_string(),
                source,
            })
    }

    pub fn at(&self) -> NaiveDateTime {
        self.0
    }

    pub fn to_iso(&self) -> String {
        self.0.format(Self::ISO_FORMAT).to_string()
    }
}

/// Converts the export's naive device-local timestamps to epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceClock {
    offset: FixedOffset,
}

impl DeviceClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Offset of the machine running the import
    pub fn local() -> Self {
        Self::new(*Local::now().offset())
    }

    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn epoch_millis(&self, at: NaiveDateTime) -> i64 {
        at.and_utc().timestamp_millis() - i64::from(self.offset.local_minus_utc()) * 1000
    }
}

impl Default for DeviceClock {
    fn default() -> Self {
        Self::utc()
    }
}
