//! Dependency catalog parsing and resolution
//!
//! The catalog lives in the buildpack's `buildpack.toml`:
//!
//! ```toml
//! [buildpack]
//! id = "example/dep"
//! name = "Dep Buildpack"
//! version = "1.0.0"
//! sbom-formats = ["application/vnd.cyclonedx+json"]
//!
//! [metadata.default-versions]
//! dep = "0.5.*"
//!
//! [[metadata.dependencies]]
//! id = "dep"
//! name = "Dep"
//! version = "0.5.4"
//! sha256 = "..."
//! uri = "https://example.com/dep-0.5.4.tgz"
//! stacks = ["io.buildpacks.stacks.jammy"]
//! ```

use crate::dependency::record::Dependency;
use crate::error::{DepLayerError, DepLayerResult};
use crate::plan::DEFAULT_VERSION;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Stack wildcard accepted in a record's `stacks`
const ANY_STACK: &str = "*";

/// Buildpack identity from the `[buildpack]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildpackInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// SBOM media types the buildpack emits
    #[serde(default)]
    pub sbom_formats: Vec<String>,
}

/// Parsed `buildpack.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub buildpack: BuildpackInfo,

    #[serde(default)]
    pub metadata: CatalogMetadata,
}

/// The `[metadata]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogMetadata {
    /// Constraint used for a dependency when the plan asks for `default`
    #[serde(default)]
    pub default_versions: BTreeMap<String, String>,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// How a requested version is compared against catalog versions
#[derive(Debug)]
enum VersionMatcher {
    /// A full version: only that version matches
    Exact(Version),
    /// A semver range such as `0.5.*` or `>=0.4, <0.6`
    Range(VersionReq),
    /// Anything else: literal string comparison
    Literal(String),
}

impl VersionMatcher {
    fn parse(constraint: &str) -> Self {
        let constraint = constraint.trim();
        if let Ok(version) = Version::parse(constraint) {
            return Self::Exact(version);
        }
        match VersionReq::parse(constraint) {
            Ok(req) => Self::Range(req),
            Err(_) => Self::Literal(constraint.to_string()),
        }
    }

    fn matches(&self, version: &str) -> bool {
        match self {
            Self::Exact(wanted) => Version::parse(version).is_ok_and(|v| v == *wanted),
            Self::Range(req) => Version::parse(version).is_ok_and(|v| req.matches(&v)),
            Self::Literal(wanted) => wanted == version,
        }
    }
}

impl Catalog {
    /// Parse a catalog from TOML content
    pub fn parse(content: &str, path: &Path) -> DepLayerResult<Self> {
        toml::from_str(content).map_err(|e| DepLayerError::CatalogInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load a catalog from disk
    pub async fn from_file(path: &Path) -> DepLayerResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DepLayerError::io(format!("reading dependency catalog {}", path.display()), e)
        })?;
        Self::parse(&content, path)
    }

    /// Constraint that `version` stands for, expanding `default`
    pub fn constraint_for<'a>(&'a self, id: &str, version: &'a str) -> &'a str {
        if version == DEFAULT_VERSION {
            self.metadata
                .default_versions
                .get(id)
                .map(String::as_str)
                .unwrap_or("*")
        } else {
            version
        }
    }

    /// Pick the highest version of `id` satisfying `version` on `stack`
    pub fn resolve(&self, id: &str, version: &str, stack: &str) -> DepLayerResult<Dependency> {
        let constraint = self.constraint_for(id, version);
        let matcher = VersionMatcher::parse(constraint);

        let on_stack: Vec<&Dependency> = self
            .metadata
            .dependencies
            .iter()
            .filter(|d| d.id == id)
            .filter(|d| d.stacks.iter().any(|s| s == stack || s == ANY_STACK))
            .collect();

        let best = on_stack
            .iter()
            .filter(|d| matcher.matches(&d.version))
            .max_by_key(|d| (Version::parse(&d.version).ok(), d.version.clone()));

        match best {
            Some(dependency) => {
                debug!(
                    "Resolved {} {} on {} to {}",
                    id, constraint, stack, dependency.version
                );
                Ok((*dependency).clone())
            }
            None => {
                let mut supported: Vec<&str> =
                    on_stack.iter().map(|d| d.version.as_str()).collect();
                supported.sort_unstable();
                supported.dedup();
                Err(DepLayerError::Resolution {
                    id: id.to_string(),
                    version: constraint.to_string(),
                    stack: stack.to_string(),
                    reason: format!(
                        "no compatible versions. Supported versions are: [{}]",
                        supported.join(", ")
                    ),
                })
            }
        }
    }
}
