//! Catalog-backed dependency manager
//!
//! Resolves records from `buildpack.toml` and delivers artifacts from local
//! paths, `file://` URIs or HTTP(S), verifying their SHA-256 before they are
//! placed in the layer.

use crate::config::schema::DeliveryConfig;
use crate::dependency::catalog::Catalog;
use crate::dependency::manager::DependencyManager;
use crate::dependency::record::Dependency;
use crate::error::{DepLayerError, DepLayerResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Binding type that remaps dependency URIs
const DEPENDENCY_MAPPING_TYPE: &str = "dependency-mapping";

/// [`DependencyManager`] backed by the buildpack's catalog
#[derive(Debug, Clone)]
pub struct CatalogService {
    verify_checksum: bool,
    timeout: Option<Duration>,
}

impl CatalogService {
    /// Create a service from delivery settings
    pub fn new(config: &DeliveryConfig) -> Self {
        Self {
            verify_checksum: config.verify_checksum,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Fetch the raw artifact bytes for `uri`
    async fn fetch(&self, uri: &str, cnb_path: &Path, id: &str) -> DepLayerResult<Vec<u8>> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return self.download(uri, id).await;
        }

        let path = local_path(uri, cnb_path);
        debug!("Reading artifact from {}", path.display());
        tokio::fs::read(&path)
            .await
            .map_err(|e| DepLayerError::delivery(id, format!("reading {}: {}", path.display(), e)))
    }

    async fn download(&self, uri: &str, id: &str) -> DepLayerResult<Vec<u8>> {
        let uri_owned = uri.to_string();
        let timeout = self.timeout;

        let result = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, String> {
            let config = ureq::Agent::config_builder()
                .timeout_global(timeout)
                .build();
            let agent = ureq::Agent::new_with_config(config);

            let response = agent.get(&uri_owned).call().map_err(|e| e.to_string())?;
            let mut bytes = Vec::new();
            response
                .into_body()
                .into_reader()
                .read_to_end(&mut bytes)
                .map_err(|e| e.to_string())?;
            Ok(bytes)
        })
        .await
        .map_err(|e| DepLayerError::delivery(id, format!("download task failed: {}", e)))?;

        result.map_err(|reason| {
            DepLayerError::delivery(id, format!("downloading {}: {}", uri, reason))
        })
    }
}

#[async_trait]
impl DependencyManager for CatalogService {
    async fn resolve(
        &self,
        path: &Path,
        id: &str,
        version: &str,
        stack: &str,
    ) -> DepLayerResult<Dependency> {
        let catalog = Catalog::from_file(path).await?;
        catalog.resolve(id, version, stack)
    }

    async fn deliver(
        &self,
        dependency: &Dependency,
        cnb_path: &Path,
        layer_path: &Path,
        platform_path: &Path,
    ) -> DepLayerResult<()> {
        let uri = match mapped_uri(platform_path, &dependency.sha256).await? {
            Some(mapped) => {
                info!("Dependency {} remapped to {}", dependency.id, mapped);
                mapped
            }
            None => dependency.uri.clone(),
        };

        let bytes = self.fetch(&uri, cnb_path, &dependency.id).await?;

        if self.verify_checksum {
            let actual = sha256_hex(&bytes);
            if !actual.eq_ignore_ascii_case(&dependency.sha256) {
                return Err(DepLayerError::delivery(
                    &dependency.id,
                    format!(
                        "checksum mismatch for {}: expected {}, got {}",
                        uri, dependency.sha256, actual
                    ),
                ));
            }
        }

        tokio::fs::create_dir_all(layer_path)
            .await
            .map_err(|e| DepLayerError::layer_access(layer_path, e))?;

        let target = layer_path.join(dependency.artifact_name());
        tokio::fs::write(&target, &bytes).await.map_err(|e| {
            DepLayerError::delivery(&dependency.id, format!("writing {}: {}", target.display(), e))
        })?;

        debug!("Delivered {} ({} bytes) to {}", dependency.id, bytes.len(), target.display());
        Ok(())
    }
}

/// Hex-encoded SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Resolve a non-HTTP URI to a path; relative paths are inside the buildpack
fn local_path(uri: &str, cnb_path: &Path) -> PathBuf {
    let raw = uri.strip_prefix("file://").unwrap_or(uri);
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        cnb_path.join(path)
    }
}

/// Look up a URI override for `sha256` in the platform's dependency-mapping bindings
async fn mapped_uri(platform_path: &Path, sha256: &str) -> DepLayerResult<Option<String>> {
    // Only a hex digest can name a file inside the binding directory.
    if sha256.is_empty() || !sha256.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Ok(None);
    }

    let bindings = platform_path.join("bindings");
    let mut entries = match tokio::fs::read_dir(&bindings).await {
        Ok(entries) => entries,
        Err(_) => return Ok(None),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DepLayerError::io("reading platform bindings", e))?
    {
        let binding = entry.path();
        let kind = match tokio::fs::read_to_string(binding.join("type")).await {
            Ok(kind) => kind,
            Err(_) => continue,
        };
        if kind.trim() != DEPENDENCY_MAPPING_TYPE {
            continue;
        }

        if let Ok(uri) = tokio::fs::read_to_string(binding.join(sha256)).await {
            let uri = uri.trim();
            if !uri.is_empty() {
                return Ok(Some(uri.to_string()));
            }
        }
    }

    Ok(None)
}
