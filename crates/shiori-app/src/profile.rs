use std::env;
use std::path::PathBuf;

use shiori_config::{Config, ConfigFile};

/// Config used when neither `--config` nor `SHIORI_CONFIG` is given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| env::var_os("SHIORI_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Overrides applied on top of the file for this run only
#[derive(Debug, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub diagnostic: bool,
    pub dry_run: bool,
}

/// Load the config file and derive the effective run config.
///
/// The file keeps its on-disk values so that persisting the watermark never
/// writes environment or command-line overrides back.
pub fn load_profile(path: PathBuf, overrides: Overrides) -> anyhow::Result<(ConfigFile, Config)> {
    tracing::info!("Loading config from {}", path.display());
    let file = ConfigFile::load(path)?;

    let mut config = file.config.clone();
    config.apply_env();
    if let Some(root) = overrides.root {
        config.reader.root = root;
    }
    config.import.diagnostic |= overrides.diagnostic;
    config.import.dry_run |= overrides.dry_run;

    Ok((file, config))
}
