//! Detection: declare which dependency this buildpack provides

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A dependency offered to later buildpacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlanProvision {
    pub name: String,
}

/// A dependency this buildpack needs from others
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildPlanRequirement {
    pub name: String,
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub metadata: toml::Table,
}

/// Provides/requires declaration handed to the build phase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildPlan {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<BuildPlanProvision>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<BuildPlanRequirement>,
}

/// Outcome of detection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectResult {
    pub plan: BuildPlan,
}

/// Detect against `working_dir`.
///
/// Detection always passes: the buildpack provides `dependency` and
/// requires nothing, whatever the application contains.
pub fn detect(working_dir: &Path, dependency: &str) -> DetectResult {
    debug!("Detecting in {}", working_dir.display());
    DetectResult {
        plan: BuildPlan {
            provides: vec![BuildPlanProvision {
                name: dependency.to_string(),
            }],
            requires: Vec::new(),
        },
    }
}
