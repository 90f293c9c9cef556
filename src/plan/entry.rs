//! Plan entry types and plan file parsing

use crate::error::{DepLayerError, DepLayerResult};
use crate::plan::{BUILD_KEY, LAUNCH_KEY, VERSION_KEY, VERSION_SOURCE_KEY};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One request for a dependency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Dependency name
    pub name: String,

    /// Free-form metadata (`version`, `version-source`, `launch`, `build`, ...)
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub metadata: toml::Table,
}

impl PlanEntry {
    /// Create an entry with no metadata
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: toml::Table::new(),
        }
    }

    /// Add a metadata value
    pub fn with(mut self, key: &str, value: impl Into<toml::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Requested version constraint, if any
    pub fn version(&self) -> Option<&str> {
        self.metadata
            .get(VERSION_KEY)
            .and_then(toml::Value::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Where the version constraint came from, if recorded
    pub fn version_source(&self) -> Option<&str> {
        self.metadata
            .get(VERSION_SOURCE_KEY)
            .and_then(toml::Value::as_str)
    }

    /// Whether the entry asks for the dependency at launch
    pub fn launch(&self) -> bool {
        self.flag(LAUNCH_KEY)
    }

    /// Whether the entry asks for the dependency at build time
    pub fn build(&self) -> bool {
        self.flag(BUILD_KEY)
    }

    /// Read a boolean-ish flag: `true` or the string `"true"`
    pub fn flag(&self, key: &str) -> bool {
        match self.metadata.get(key) {
            Some(toml::Value::Boolean(b)) => *b,
            Some(toml::Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// The set of entries handed to a build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildpackPlan {
    #[serde(default)]
    pub entries: Vec<PlanEntry>,
}

impl BuildpackPlan {
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        Self { entries }
    }

    /// Parse a plan from TOML
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a plan from a TOML file
    pub async fn from_file(path: &Path) -> DepLayerResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DepLayerError::io(format!("reading plan {}", path.display()), e))?;

        Self::parse(&content).map_err(|e| DepLayerError::PlanInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
