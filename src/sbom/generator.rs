//! SBOM generation from an installed layer

use crate::dependency::Dependency;
use crate::error::{DepLayerError, DepLayerResult};
use crate::sbom::document::{SbomComponent, SbomDocument, SbomFile};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Produces an SBOM for a dependency installed at a path
#[async_trait]
pub trait SbomGenerator: Send + Sync {
    async fn generate_from_dependency(
        &self,
        dependency: &Dependency,
        dir: &Path,
    ) -> DepLayerResult<SbomDocument>;
}

/// Describes the dependency record plus every file found under the layer
#[derive(Debug, Clone, Default)]
pub struct DependencySbomGenerator;

impl DependencySbomGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SbomGenerator for DependencySbomGenerator {
    async fn generate_from_dependency(
        &self,
        dependency: &Dependency,
        dir: &Path,
    ) -> DepLayerResult<SbomDocument> {
        let root = dir.to_path_buf();
        let files = tokio::task::spawn_blocking(move || scan(&root))
            .await
            .map_err(|e| DepLayerError::SbomGeneration(format!("scan task failed: {}", e)))??;

        debug!("SBOM for {} covers {} files", dependency.id, files.len());

        Ok(SbomDocument::new(vec![SbomComponent {
            id: dependency.id.clone(),
            name: dependency.name.clone(),
            version: dependency.version.clone(),
            sha256: dependency.sha256.clone(),
            uri: dependency.uri.clone(),
            licenses: dependency.licenses.clone(),
            files,
        }]))
    }
}

/// Hash every regular file below `root`, sorted by relative path
fn scan(root: &Path) -> DepLayerResult<Vec<SbomFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            DepLayerError::SbomGeneration(format!("walking {}: {}", root.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        files.push(SbomFile {
            path: relative.to_string_lossy().replace('\\', "/"),
            sha256: hash_file(path)?,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn hash_file(path: &Path) -> DepLayerResult<String> {
    let mut file = fs::File::open(path).map_err(|e| {
        DepLayerError::SbomGeneration(format!("opening {}: {}", path.display(), e))
    })?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| {
        DepLayerError::SbomGeneration(format!("reading {}: {}", path.display(), e))
    })?;
    Ok(hex::encode(hasher.finalize()))
}
