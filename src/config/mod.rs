//! Configuration loading and persistence for deplayer
//!
//! Values from the file only provide defaults; command-line flags win.

pub mod schema;

pub use schema::Config;

use crate::error::{DepLayerError, DepLayerResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Reads and writes the deplayer config file
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Use `<config dir>/deplayer/config.toml`
    pub fn new() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_path(base.join("deplayer").join("config.toml"))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load and validate the config file; a missing file yields defaults
    pub async fn load(&self) -> DepLayerResult<Config> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(DepLayerError::io(
                    format!("reading config from {}", self.path.display()),
                    e,
                ))
            }
        };

        let config: Config = toml::from_str(&content).map_err(|e| self.invalid(e.to_string()))?;
        config.validate().map_err(|reason| self.invalid(reason))?;
        debug!("Loaded config from {}", self.path.display());
        Ok(config)
    }

    /// Validate `config` and write it, creating the parent directory as needed
    pub async fn save(&self, config: &Config) -> DepLayerResult<()> {
        config.validate().map_err(|reason| self.invalid(reason))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DepLayerError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.path, content).await.map_err(|e| {
            DepLayerError::io(format!("writing config to {}", self.path.display()), e)
        })?;

        info!("Configuration saved to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn invalid(&self, reason: String) -> DepLayerError {
        DepLayerError::ConfigInvalid {
            path: self.path.clone(),
            reason,
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
