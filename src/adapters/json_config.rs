//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single `serde_json` document on disk.
//!
//! - Validation: every field is range-checked on load and before save.
//! - Atomic writes: the document is written to a sibling temp file and
//!   renamed over the target.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::ControllerConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(e: &io::Error) -> ConfigError {
    match e.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound,
        io::ErrorKind::StorageFull => ConfigError::StorageFull,
        _ => ConfigError::IoError,
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<ControllerConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(
                    "JsonConfigFile: no config at {}, using defaults",
                    self.path.display()
                );
                return Ok(ControllerConfig::default());
            }
            Err(e) => {
                warn!("JsonConfigFile: read {} failed: {}", self.path.display(), e);
                return Err(io_error(&e));
            }
        };

        let cfg: ControllerConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("JsonConfigFile: {} is corrupted: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        cfg.validate()?;
        info!("JsonConfigFile: loaded config from {}", self.path.display());
        Ok(cfg)
    }

    fn save(&self, config: &ControllerConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let json = serde_json::to_string_pretty(config).map_err(|_| ConfigError::IoError)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| {
            warn!("JsonConfigFile: write {} failed: {}", tmp.display(), e);
            io_error(&e)
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            warn!("JsonConfigFile: rename to {} failed: {}", self.path.display(), e);
            io_error(&e)
        })?;
        info!("JsonConfigFile: config saved to {}", self.path.display());
        Ok(())
    }
}
