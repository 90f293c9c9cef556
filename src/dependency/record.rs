//! Resolved dependency record

use serde::{Deserialize, Serialize};

/// A concrete artifact resolved from the catalog
///
/// Two records describe the same artifact iff their checksums match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Catalog identity, e.g. `dep`
    pub id: String,

    /// Human-readable name
    #[serde(default)]
    pub name: String,

    /// Resolved version
    pub version: String,

    /// SHA-256 of the artifact (hex)
    pub sha256: String,

    /// Where the artifact is fetched from
    pub uri: String,

    /// Stacks this artifact runs on
    #[serde(default)]
    pub stacks: Vec<String>,

    /// SPDX license identifiers, when the catalog records them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<String>,
}

impl Dependency {
    /// File name of the artifact, taken from the last URI segment
    pub fn artifact_name(&self) -> String {
        let trimmed = self.uri.trim_end_matches('/');
        let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let segment = segment.split(['?', '#']).next().unwrap_or(segment);
        if segment.is_empty() {
            self.id.clone()
        } else {
            segment.to_string()
        }
    }
}
