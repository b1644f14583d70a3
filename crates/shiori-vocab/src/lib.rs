//! Reader for the e-reader's dictionary lookup history (`vocab.db`).

mod helpers;

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use rusqlite::{Connection, OpenFlags, Row, params};
use shiori_core::error::{ImportError, Result};
use shiori_core::store::LookupSource;
use shiori_core::{DeviceClock, LookupEvent, Watermark};

use crate::helpers::{lossy_text, millis};

/// Cutoff used on the first run, well before any lookup history
pub const FALLBACK_CUTOFF_SECS: i64 = 1_362_301_382;

/// Lookups may precede the highlight that uses them, or be skewed by the
/// device clock, so the window reaches back a day before the watermark
pub const SAFETY_MARGIN_HOURS: i64 = 24;

const LOOKUPS_SQL: &str = "
    SELECT WORDS.stem, WORDS.word, LOOKUPS.usage, LOOKUPS.timestamp,
           BOOK_INFO.title, BOOK_INFO.authors
    FROM LOOKUPS
    LEFT JOIN WORDS ON WORDS.id = LOOKUPS.word_key
    LEFT JOIN BOOK_INFO ON BOOK_INFO.id = LOOKUPS.book_key
    WHERE LOOKUPS.timestamp > ?1
    ORDER BY LOOKUPS.timestamp DESC";

/// Lower bound (exclusive, epoch ms) for the lookups considered by a run
pub fn cutoff_millis(watermark: Option<Watermark>, clock: DeviceClock) -> i64 {
    match watermark {
        Some(watermark) => clock.epoch_millis(watermark.at() - TimeDelta::hours(SAFETY_MARGIN_HOURS)),
        None => FALLBACK_CUTOFF_SECS * 1000,
    }
}

fn row_to_lookup(row: &Row) -> rusqlite::Result<LookupEvent> {
    Ok(LookupEvent {
        stem: lossy_text(row, 0)?,
        word: lossy_text(row, 1)?,
        usage: lossy_text(row, 2)?,
        timestamp: millis(row, 3)?,
        title: lossy_text(row, 4)?,
        authors: lossy_text(row, 5)?,
    })
}

pub struct VocabDb {
    path: PathBuf,
    conn: Connection,
}

impl VocabDb {
    /// Open read-only; a missing database is an error, never created
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| store_error(path, err))?;

        Ok(Self::with_connection(path, conn))
    }

    pub fn with_connection(path: &Path, conn: Connection) -> Self {
        Self {
            path: path.to_path_buf(),
            conn,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn query_lookups(&self, cutoff_ms: i64) -> rusqlite::Result<Vec<LookupEvent>> {
        let mut stmt = self.conn.prepare(LOOKUPS_SQL)?;
        let mut rows = stmt.query(params![cutoff_ms])?;

        let mut lookups = Vec::new();
        while let Some(row) = rows.next()? {
            lookups.push(row_to_lookup(row)?);
        }
        Ok(lookups)
    }
}

impl LookupSource for VocabDb {
    fn lookups_after(&self, cutoff_ms: i64) -> Result<Vec<LookupEvent>> {
        let lookups = self
            .query_lookups(cutoff_ms)
            .map_err(|err| store_error(&self.path, err))?;

        tracing::info!(
            "Read {} lookups after {} from {}",
            lookups.len(),
            cutoff_ms,
            self.path.display()
        );
        Ok(lookups)
    }
}

fn store_error(path: &Path, err: rusqlite::Error) -> ImportError {
    ImportError::LookupStore {
        path: path.to_path_buf(),
        source: Box::new(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "
        CREATE TABLE WORDS (id TEXT PRIMARY KEY NOT NULL UNIQUE, word TEXT, stem TEXT, lang TEXT,
                            category INTEGER DEFAULT 0, timestamp INTEGER DEFAULT 0, profileid TEXT);
        CREATE TABLE LOOKUPS (id TEXT PRIMARY KEY NOT NULL, word_key TEXT, book_key TEXT, dict_key TEXT,
                              pos TEXT, usage TEXT, timestamp INTEGER DEFAULT 0);
        CREATE TABLE BOOK_INFO (id TEXT PRIMARY KEY NOT NULL UNIQUE, asin TEXT, guid TEXT, lang TEXT,
                                title TEXT, authors TEXT);
        INSERT INTO WORDS (id, word, stem) VALUES ('ja:借りた', '借りた', '借りる'),
                                                  ('ja:化けた', 'ばけた', 'ばける');
        INSERT INTO BOOK_INFO (id, title, authors) VALUES ('b1', 'Some Book', '作者');
        INSERT INTO LOOKUPS (id, word_key, book_key, usage, timestamp) VALUES
            ('l1', 'ja:借りた', 'b1', '彼から借りた本だ', 1680339600000),
            ('l2', 'ja:化けた', 'b1', '狐がばけた', 1680426000000),
            ('l3', 'ja:missing', 'b-missing', CAST(X'E5BDBCE3' AS TEXT), 1680512400000),
            ('l4', 'ja:借りた', 'b1', 'old', 1000);
    ";

    fn seeded() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.db");
        Connection::open(&path).unwrap().execute_batch(SCHEMA).unwrap();
        (dir, path)
    }

    #[test]
    fn reads_newest_first_after_cutoff() {
        let (_dir, path) = seeded();
        let db = VocabDb::open(&path).unwrap();

        let lookups = db.lookups_after(1680339600000).unwrap();
        let timestamps: Vec<i64> = lookups.iter().map(|l| l.timestamp).collect();
        assert_eq!(timestamps, vec![1680512400000, 1680426000000]);

        let bake = &lookups[1];
        assert_eq!(bake.stem, "ばける");
        assert_eq!(bake.word, "ばけた");
        assert_eq!(bake.title, "Some Book");
        assert_eq!(bake.authors, "作者");
    }

    #[test]
    fn undecodable_and_missing_columns_do_not_fail_the_read() {
        let (_dir, path) = seeded();
        let db = VocabDb::open(&path).unwrap();

        let lookups = db.lookups_after(1680426000000).unwrap();
        assert_eq!(lookups.len(), 1);

        let broken = &lookups[0];
        assert!(broken.usage.starts_with('彼'));
        assert!(broken.usage.contains('\u{FFFD}'));
        assert_eq!(broken.stem, "");
        assert_eq!(broken.title, "");
    }

    #[test]
    fn fallback_cutoff_reads_whole_history_but_ancient_rows() {
        let (_dir, path) = seeded();
        let db = VocabDb::open(&path).unwrap();

        let lookups = db.lookups_after(cutoff_millis(None, DeviceClock::utc())).unwrap();
        assert_eq!(lookups.len(), 3);
    }

    #[test]
    fn cutoff_reaches_back_one_day_before_watermark() {
        let watermark = Watermark::parse("2023-04-02T09:00:00").unwrap();

        assert_eq!(cutoff_millis(Some(watermark), DeviceClock::utc()), 1680339600000);

        let tokyo = DeviceClock::from_offset_minutes(540).unwrap();
        assert_eq!(cutoff_millis(Some(watermark), tokyo), 1680339600000 - 9 * 3600 * 1000);
    }

    #[test]
    fn missing_database_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = VocabDb::open(&dir.path().join("absent.db")).err().unwrap();
        assert!(matches!(err, ImportError::LookupStore { .. }));
    }
}
