//! Layer lookup, reset and persistence

use crate::error::{DepLayerError, DepLayerResult};
use crate::layer::descriptor::{Layer, LayerFile};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The layers root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layers {
    pub path: PathBuf,
}

impl Layers {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn metadata_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{}.toml", name))
    }

    fn sbom_path(&self, name: &str, extension: &str) -> PathBuf {
        self.path.join(format!("{}.sbom.{}", name, extension))
    }

    /// Look up the layer `name`, creating its directory on first use.
    ///
    /// Previously persisted flags and metadata are loaded when present.
    pub async fn get(&self, name: &str) -> DepLayerResult<Layer> {
        let layer_path = self.path.join(name);
        tokio::fs::create_dir_all(&layer_path)
            .await
            .map_err(|e| DepLayerError::layer_access(&layer_path, e))?;

        let metadata_path = self.metadata_path(name);
        let file = match tokio::fs::read_to_string(&metadata_path).await {
            Ok(content) => toml::from_str::<LayerFile>(&content).unwrap_or_else(|e| {
                // Unreadable metadata is treated like none: the next build is a miss.
                debug!("Ignoring malformed {}: {}", metadata_path.display(), e);
                LayerFile::default()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => LayerFile::default(),
            Err(e) => return Err(DepLayerError::layer_access(&metadata_path, e)),
        };

        Ok(Layer::from_file(name.to_string(), layer_path, file))
    }

    /// Discard everything the layer holds and return it empty.
    ///
    /// The metadata file goes first so an interrupted reset reads back as a miss.
    pub async fn reset(&self, layer: &Layer) -> DepLayerResult<Layer> {
        remove_file_if_exists(&self.metadata_path(&layer.name)).await?;
        self.remove_sbom_files(&layer.name).await?;

        match tokio::fs::remove_dir_all(&layer.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(DepLayerError::layer_access(&layer.path, e)),
        }

        tokio::fs::create_dir_all(&layer.path)
            .await
            .map_err(|e| DepLayerError::layer_access(&layer.path, e))?;

        debug!("Reset layer {}", layer.path.display());
        Ok(Layer::new(layer.name.clone(), layer.path.clone()))
    }

    /// Persist the layer's flags, metadata, environment and SBOM renderings
    pub async fn write(&self, layer: &Layer) -> DepLayerResult<()> {
        tokio::fs::create_dir_all(&layer.path)
            .await
            .map_err(|e| DepLayerError::layer_access(&layer.path, e))?;

        layer.build_env.write(&layer.path.join("env.build")).await?;
        layer.launch_env.write(&layer.path.join("env.launch")).await?;

        for rendering in &layer.sbom {
            let path = self.sbom_path(&layer.name, &rendering.extension);
            tokio::fs::write(&path, &rendering.content)
                .await
                .map_err(|e| DepLayerError::io(format!("writing {}", path.display()), e))?;
        }

        let content = toml::to_string(&layer.to_file())?;
        let metadata_path = self.metadata_path(&layer.name);
        tokio::fs::write(&metadata_path, content)
            .await
            .map_err(|e| DepLayerError::layer_access(&metadata_path, e))?;

        debug!("Wrote layer metadata {}", metadata_path.display());
        Ok(())
    }

    async fn remove_sbom_files(&self, name: &str) -> DepLayerResult<()> {
        let prefix = format!("{}.sbom.", name);
        let mut entries = match tokio::fs::read_dir(&self.path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(DepLayerError::layer_access(&self.path, e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DepLayerError::layer_access(&self.path, e))?
        {
            if entry.file_name().to_string_lossy().starts_with(&prefix) {
                remove_file_if_exists(&entry.path()).await?;
            }
        }
        Ok(())
    }
}

async fn remove_file_if_exists(path: &Path) -> DepLayerResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DepLayerError::layer_access(path, e)),
    }
}
