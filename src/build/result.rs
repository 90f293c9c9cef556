//! Build outcome and its persistence

use crate::bom::BomEntry;
use crate::error::{DepLayerError, DepLayerResult};
use crate::layer::{Layer, Layers};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// BOM contributed to the build environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bom: Vec<BomEntry>,
}

/// BOM contributed to the launch environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bom: Vec<BomEntry>,
}

/// What a successful build hands back to the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct BuildResult {
    pub layers: Vec<Layer>,
    pub build: BuildMetadata,
    pub launch: LaunchMetadata,
}

impl BuildResult {
    /// Persist every layer plus `build.toml` / `launch.toml` under the layers root.
    ///
    /// A metadata file with no BOM entries is removed, so a file left by an
    /// earlier build never outlives the flag that produced it.
    pub async fn write(&self, layers: &Layers) -> DepLayerResult<()> {
        for layer in &self.layers {
            layers.write(layer).await?;
        }

        sync_toml(
            &layers.path.join("build.toml"),
            &self.build,
            self.build.bom.is_empty(),
        )
        .await?;
        sync_toml(
            &layers.path.join("launch.toml"),
            &self.launch,
            self.launch.bom.is_empty(),
        )
        .await
    }
}

/// Write `value` to `path`, or remove `path` when there is nothing to say
async fn sync_toml<T: Serialize>(path: &Path, value: &T, empty: bool) -> DepLayerResult<()> {
    if empty {
        return match tokio::fs::remove_file(path).await {
            Ok(()) => {
                debug!("Removed stale {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DepLayerError::io(format!("removing {}", path.display()), e)),
        };
    }

    let content = toml::to_string(value)?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| DepLayerError::io(format!("writing {}", path.display()), e))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::PlanRefinery;
    use crate::dependency::Dependency;
    use tempfile::TempDir;

    fn bom() -> Vec<BomEntry> {
        vec![PlanRefinery::new().bill_of_materials(&Dependency {
            id: "dep".to_string(),
            name: "Dep".to_string(),
            version: "0.5.4".to_string(),
            sha256: "sha-A".to_string(),
            uri: "https://example.com/dep.tgz".to_string(),
            stacks: vec!["some-stack".to_string()],
            licenses: vec![],
        })]
    }

    #[tokio::test]
    async fn writes_layers_and_launch_bom() {
        let temp = TempDir::new().unwrap();
        let layers = Layers::new(temp.path());
        let mut layer = layers.get("dep").await.unwrap();
        layer.stamp("sha-A", "now".to_string());

        let result = BuildResult {
            layers: vec![layer],
            build: BuildMetadata::default(),
            launch: LaunchMetadata { bom: bom() },
        };
        result.write(&layers).await.unwrap();

        assert!(temp.path().join("dep.toml").is_file());
        assert!(!temp.path().join("build.toml").exists());

        let launch: LaunchMetadata =
            toml::from_str(&std::fs::read_to_string(temp.path().join("launch.toml")).unwrap())
                .unwrap();
        assert_eq!(launch.bom, bom());
    }

    #[tokio::test]
    async fn empty_bom_removes_previous_file() {
        let temp = TempDir::new().unwrap();
        let layers = Layers::new(temp.path());
        let mut result = BuildResult {
            layers: vec![],
            build: BuildMetadata { bom: bom() },
            launch: LaunchMetadata { bom: bom() },
        };
        result.write(&layers).await.unwrap();
        assert!(temp.path().join("build.toml").is_file());

        result.build = BuildMetadata::default();
        result.write(&layers).await.unwrap();

        assert!(!temp.path().join("build.toml").exists());
        assert!(temp.path().join("launch.toml").is_file());
    }

    #[test]
    fn bom_serializes_as_array_of_tables() {
        let content = toml::to_string(&BuildMetadata { bom: bom() }).unwrap();
        assert!(content.contains("[[bom]]"));
        assert!(content.contains("sha256 = \"sha-A\""));
    }
}
