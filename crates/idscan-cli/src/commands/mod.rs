//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod extract;
pub mod serve;

use std::path::{Path, PathBuf};

use idscan_core::models::config::IdScanConfig;
use tracing::debug;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("idscan")
        .join("config.json")
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<IdScanConfig> {
    if let Some(path) = config_path {
        debug!("Loading configuration from {}", path);
        return Ok(IdScanConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(IdScanConfig::from_file(&default_path)?)
    } else {
        Ok(IdScanConfig::default())
    }
}
