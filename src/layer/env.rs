//! Environment deltas contributed by a layer
//!
//! Instead of mutating the process environment, a layer records the changes
//! it wants (`PATH.append` plus `PATH.delim`). Callers merge them into their
//! own environment with [`Environment::apply`].

use crate::error::{DepLayerError, DepLayerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

/// A set of environment modifications keyed by `NAME.operation`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment(BTreeMap<String, String>);

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to `name`, separated by `delim`
    pub fn append(&mut self, name: &str, value: impl Into<String>, delim: &str) {
        self.0.insert(format!("{}.append", name), value.into());
        self.0.insert(format!("{}.delim", name), delim.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge this delta into `base`, returning the resulting environment
    pub fn apply(&self, base: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut env = base.clone();

        for (key, value) in &self.0 {
            let Some(name) = key.strip_suffix(".append") else {
                continue;
            };
            let delim = self
                .0
                .get(&format!("{}.delim", name))
                .map(String::as_str)
                .unwrap_or("");

            let merged = match env.get(name).filter(|v| !v.is_empty()) {
                Some(current) => format!("{}{}{}", current, delim, value),
                None => value.clone(),
            };
            env.insert(name.to_string(), merged);
        }

        env
    }

    /// Write one file per entry into `dir`.
    ///
    /// An empty delta removes `dir`, so a previous build's entries do not linger.
    pub async fn write(&self, dir: &Path) -> DepLayerResult<()> {
        if self.0.is_empty() {
            return match tokio::fs::remove_dir_all(dir).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(DepLayerError::layer_access(dir, e)),
            };
        }

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DepLayerError::layer_access(dir, e))?;

        for (key, value) in &self.0 {
            let path = dir.join(key);
            tokio::fs::write(&path, value)
                .await
                .map_err(|e| DepLayerError::io(format!("writing {}", path.display()), e))?;
        }
        Ok(())
    }
}
