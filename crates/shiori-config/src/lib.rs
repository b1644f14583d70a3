use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shiori_core::error::ImportError;
use shiori_core::store::WatermarkStore;
use shiori_core::{DeviceClock, Watermark};

use self::anki::AnkiConfig;
use self::dictionary::DictionaryConfig;
use self::import::ImportConfig;
use self::reader::ReaderConfig;
use self::tokenizer::TokenizerConfig;

pub mod anki;
pub mod dictionary;
pub mod import;
pub mod reader;
pub mod tokenizer;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reader: ReaderConfig,
    pub anki: AnkiConfig,
    pub dictionary: DictionaryConfig,
    pub tokenizer: TokenizerConfig,
    pub import: ImportConfig,
    /// ISO timestamp of the newest imported clipping
    pub last_added: Option<String>,
}

impl Config {
    /// Environment variables win over file values
    pub fn apply_env(&mut self) {
        if let Ok(root) = env::var("SHIORI_READER_ROOT") {
            self.reader.root = PathBuf::from(root);
        }

        if let Ok(url) = env::var("ANKI_CONNECT_URL") {
            self.anki.url = url;
        }

        if let Some(minutes) = env::var("SHIORI_UTC_OFFSET_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.import.utc_offset_minutes = Some(minutes);
        }

        if let Some(diagnostic) = env::var("SHIORI_DIAGNOSTIC")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.import.diagnostic = diagnostic;
        }
    }

    pub fn watermark(&self) -> Result<Option<Watermark>, ImportError> {
        self.last_added
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(Watermark::parse)
            .transpose()
    }

    pub fn device_clock(&self) -> DeviceClock {
        self.import
            .utc_offset_minutes
            .and_then(DeviceClock::from_offset_minutes)
            .unwrap_or_else(DeviceClock::local)
    }
}

/// Config bound to the JSON file it was read from
pub struct ConfigFile {
    path: PathBuf,
    pub config: Config,
}

impl ConfigFile {
    /// Missing file yields defaults; the file is created on first save
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();

        let config = if path.exists() {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Invalid config in {}", path.display()))?
        } else {
            tracing::warn!("Config {} not found, using defaults", path.display());
            Config::default()
        };

        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let serialized = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write config to {}", self.path.display()))
    }
}

impl WatermarkStore for ConfigFile {
    fn load(&self) -> Result<Option<Watermark>, ImportError> {
        self.config.watermark()
    }

    fn store(&mut self, watermark: Watermark) -> Result<(), ImportError> {
        self.config.last_added = Some(watermark.to_iso());
        self.save().map_err(ImportError::WatermarkStore)?;
        tracing::info!("Watermark advanced to {}", watermark.to_iso());
        Ok(())
    }
}
