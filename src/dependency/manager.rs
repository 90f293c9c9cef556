//! Dependency manager abstraction

use crate::bom::{BomEntry, PlanRefinery};
use crate::dependency::record::Dependency;
use crate::error::DepLayerResult;
use async_trait::async_trait;
use std::path::Path;

/// Resolves dependency requests against a catalog and delivers artifacts
///
/// The build orchestrator depends only on this trait, so it can be driven
/// by [`CatalogService`](crate::dependency::CatalogService) in production
/// and by a recording double in tests.
#[async_trait]
pub trait DependencyManager: Send + Sync {
    /// Find the best record for `id` matching `version` on `stack` in the
    /// catalog at `path`. Fails with a resolution error when nothing matches.
    async fn resolve(
        &self,
        path: &Path,
        id: &str,
        version: &str,
        stack: &str,
    ) -> DepLayerResult<Dependency>;

    /// Fetch the artifact for `dependency` and place it in `layer_path`
    async fn deliver(
        &self,
        dependency: &Dependency,
        cnb_path: &Path,
        layer_path: &Path,
        platform_path: &Path,
    ) -> DepLayerResult<()>;

    /// Bill-of-materials entries for every resolved record in a build
    fn generate_bill_of_materials(&self, dependencies: &[Dependency]) -> Vec<BomEntry> {
        let refinery = PlanRefinery::new();
        dependencies
            .iter()
            .map(|d| refinery.bill_of_materials(d))
            .collect()
    }
}
