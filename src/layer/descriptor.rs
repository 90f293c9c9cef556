//! Layer descriptor and its metadata file format

use crate::layer::env::Environment;
use crate::layer::{BUILT_AT_KEY, DEPENDENCY_CACHE_KEY};
use crate::sbom::SbomRendering;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lifecycle flags of a layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerTypes {
    /// Available to the running application
    #[serde(default)]
    pub launch: bool,

    /// Visible to later build steps
    #[serde(default)]
    pub build: bool,

    /// Kept for the next build
    #[serde(default)]
    pub cache: bool,
}

/// Contents of `<layers>/<name>.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LayerFile {
    #[serde(default)]
    pub types: LayerTypes,

    #[serde(default)]
    pub metadata: toml::Table,
}

/// One dependency's layer as seen by a build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub name: String,
    pub path: PathBuf,
    pub launch: bool,
    pub build: bool,
    pub cache: bool,
    pub metadata: toml::Table,
    pub build_env: Environment,
    pub launch_env: Environment,
    /// SBOM renderings, present only when the layer was (re)built
    pub sbom: Vec<SbomRendering>,
}

impl Layer {
    /// An empty layer with all flags off
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            launch: false,
            build: false,
            cache: false,
            metadata: toml::Table::new(),
            build_env: Environment::new(),
            launch_env: Environment::new(),
            sbom: Vec::new(),
        }
    }

    pub(crate) fn from_file(name: String, path: PathBuf, file: LayerFile) -> Self {
        let mut layer = Self::new(name, path);
        layer.set_types(file.types);
        layer.metadata = file.metadata;
        layer
    }

    pub(crate) fn to_file(&self) -> LayerFile {
        LayerFile {
            types: self.types(),
            metadata: self.metadata.clone(),
        }
    }

    pub fn types(&self) -> LayerTypes {
        LayerTypes {
            launch: self.launch,
            build: self.build,
            cache: self.cache,
        }
    }

    pub fn set_types(&mut self, types: LayerTypes) {
        self.launch = types.launch;
        self.build = types.build;
        self.cache = types.cache;
    }

    /// Checksum of the artifact last installed here; empty counts as absent
    pub fn cached_checksum(&self) -> Option<&str> {
        self.metadata
            .get(DEPENDENCY_CACHE_KEY)
            .and_then(toml::Value::as_str)
            .filter(|sha| !sha.is_empty())
    }

    /// Whether the layer already holds the artifact with `sha256`
    pub fn holds(&self, sha256: &str) -> bool {
        self.cached_checksum() == Some(sha256)
    }

    /// Record the installed checksum and install time, replacing prior metadata
    pub fn stamp(&mut self, sha256: &str, built_at: String) {
        let mut metadata = toml::Table::new();
        metadata.insert(DEPENDENCY_CACHE_KEY.to_string(), sha256.into());
        metadata.insert(BUILT_AT_KEY.to_string(), built_at.into());
        self.metadata = metadata;
    }
}
