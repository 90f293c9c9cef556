//! Error types for deplayer
//!
//! All modules use `DepLayerResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deplayer operations
pub type DepLayerResult<T> = Result<T, DepLayerError>;

/// All errors that can occur while building a dependency layer
#[derive(Error, Debug)]
pub enum DepLayerError {
    // Resolution errors
    #[error("Failed to resolve dependency {id} (version {version}, stack {stack}): {reason}")]
    Resolution {
        id: String,
        version: String,
        stack: String,
        reason: String,
    },

    #[error("Invalid dependency catalog at {path}: {reason}")]
    CatalogInvalid { path: PathBuf, reason: String },

    #[error("Invalid buildpack plan at {path}: {reason}")]
    PlanInvalid { path: PathBuf, reason: String },

    // Layer errors
    #[error("Failed to access layer {path}: {source}")]
    LayerAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Delivery errors
    #[error("Failed to deliver dependency {dependency}: {reason}")]
    Delivery { dependency: String, reason: String },

    // SBOM errors
    #[error("Failed to generate SBOM: {0}")]
    SbomGeneration(String),

    #[error("Unsupported SBOM format: {0}")]
    UnsupportedFormat(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl DepLayerError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a layer access error for the given path
    pub fn layer_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LayerAccess {
            path: path.into(),
            source,
        }
    }

    /// Create a delivery error
    pub fn delivery(dependency: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Delivery {
            dependency: dependency.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Resolution { .. } => {
                Some("Check that buildpack.toml lists a dependency for this stack and version")
            }
            Self::LayerAccess { .. } => Some("Check that the layers directory is writable"),
            Self::UnsupportedFormat(_) => Some(concat!(
                "Supported formats: application/vnd.cyclonedx+json, ",
                "application/spdx+json, application/vnd.syft+json"
            )),
            _ => None,
        }
    }
}
