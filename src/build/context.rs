//! Inputs of a single build invocation

use crate::dependency::catalog::{BuildpackInfo, Catalog};
use crate::error::DepLayerResult;
use crate::layer::Layers;
use crate::plan::BuildpackPlan;
use std::path::{Path, PathBuf};

/// Catalog file name inside the buildpack directory
pub const CATALOG_FILE: &str = "buildpack.toml";

/// Everything a build needs to know about its surroundings
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Identity of the buildpack running the build
    pub buildpack_info: BuildpackInfo,

    /// Buildpack directory holding `buildpack.toml`
    pub cnb_path: PathBuf,

    /// Platform directory (bindings, env)
    pub platform_path: PathBuf,

    /// Stack the artifact must run on
    pub stack: String,

    /// Requests from every build participant
    pub plan: BuildpackPlan,

    /// Layers root
    pub layers: Layers,
}

impl BuildContext {
    /// Assemble a context, reading buildpack identity and the plan from disk
    pub async fn load(
        cnb_path: &Path,
        plan_path: &Path,
        layers_path: &Path,
        platform_path: &Path,
        stack: &str,
    ) -> DepLayerResult<Self> {
        let catalog = Catalog::from_file(&cnb_path.join(CATALOG_FILE)).await?;
        let plan = BuildpackPlan::from_file(plan_path).await?;

        Ok(Self {
            buildpack_info: catalog.buildpack,
            cnb_path: cnb_path.to_path_buf(),
            platform_path: platform_path.to_path_buf(),
            stack: stack.to_string(),
            plan,
            layers: Layers::new(layers_path),
        })
    }

    /// Path of the dependency catalog
    pub fn catalog_path(&self) -> PathBuf {
        self.cnb_path.join(CATALOG_FILE)
    }
}
