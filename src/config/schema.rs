//! Configuration schema for deplayer
//!
//! Configuration is stored at `~/.config/deplayer/config.toml`

use crate::sbom::SbomFormat;
use serde::{Deserialize, Serialize};

const LOG_FORMATS: &[&str] = &["text", "json"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Build defaults
    pub build: BuildConfig,

    /// Artifact delivery settings
    pub delivery: DeliveryConfig,
}

impl Config {
    /// Check values serde cannot, returning the first problem found
    pub fn validate(&self) -> Result<(), String> {
        if !LOG_FORMATS.contains(&self.general.log_format.as_str()) {
            return Err(format!(
                "general.log_format must be one of {}, got {:?}",
                LOG_FORMATS.join(", "),
                self.general.log_format
            ));
        }

        if self.build.dependency.trim().is_empty() {
            return Err("build.dependency must not be empty".to_string());
        }

        for format in &self.build.sbom_formats {
            format
                .parse::<SbomFormat>()
                .map_err(|e| format!("build.sbom_formats: {}", e))?;
        }

        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Build defaults, overridable per invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Name of the dependency (and layer) to build
    pub dependency: String,

    /// Stack identifier used when none is given on the command line
    pub stack: Option<String>,

    /// Generate SBOMs when a layer is rebuilt
    pub sbom: bool,

    /// SBOM media types rendered in addition to the buildpack's own list
    pub sbom_formats: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dependency: "dep".to_string(),
            stack: None,
            sbom: true,
            sbom_formats: vec![],
        }
    }
}

/// Artifact delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Reject artifacts whose SHA-256 differs from the catalog
    pub verify_checksum: bool,

    /// Download timeout in seconds (no limit when unset)
    pub timeout_secs: Option<u64>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            verify_checksum: true,
            timeout_secs: None,
        }
    }
}
