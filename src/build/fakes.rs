//! Recording test doubles for the build collaborators

use crate::dependency::{Dependency, DependencyManager};
use crate::error::{DepLayerError, DepLayerResult};
use crate::sbom::{SbomComponent, SbomDocument, SbomGenerator};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveCall {
    pub path: PathBuf,
    pub id: String,
    pub version: String,
    pub stack: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverCall {
    pub dependency: Dependency,
    pub cnb_path: PathBuf,
    pub layer_path: PathBuf,
    pub platform_path: PathBuf,
}

/// Returns a fixed record and drops a file into the layer on delivery
pub struct FakeDependencyManager {
    dependency: Mutex<Dependency>,
    resolve_error: Option<String>,
    deliver_error: Option<String>,
    pub resolve_calls: Mutex<Vec<ResolveCall>>,
    pub deliver_calls: Mutex<Vec<DeliverCall>>,
}

impl FakeDependencyManager {
    pub fn new(dependency: Dependency) -> Self {
        Self {
            dependency: Mutex::new(dependency),
            resolve_error: None,
            deliver_error: None,
            resolve_calls: Mutex::new(Vec::new()),
            deliver_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_resolve(mut self, reason: &str) -> Self {
        self.resolve_error = Some(reason.to_string());
        self
    }

    pub fn failing_deliver(mut self, reason: &str) -> Self {
        self.deliver_error = Some(reason.to_string());
        self
    }

    /// Swap the record returned by later `resolve` calls
    pub fn set_dependency(&self, dependency: Dependency) {
        *self.dependency.lock().unwrap() = dependency;
    }

    pub fn resolve_calls(&self) -> Vec<ResolveCall> {
        self.resolve_calls.lock().unwrap().clone()
    }

    pub fn deliver_calls(&self) -> Vec<DeliverCall> {
        self.deliver_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DependencyManager for FakeDependencyManager {
    async fn resolve(
        &self,
        path: &Path,
        id: &str,
        version: &str,
        stack: &str,
    ) -> DepLayerResult<Dependency> {
        self.resolve_calls.lock().unwrap().push(ResolveCall {
            path: path.to_path_buf(),
            id: id.to_string(),
            version: version.to_string(),
            stack: stack.to_string(),
        });

        if let Some(reason) = &self.resolve_error {
            return Err(DepLayerError::Resolution {
                id: id.to_string(),
                version: version.to_string(),
                stack: stack.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.dependency.lock().unwrap().clone())
    }

    async fn deliver(
        &self,
        dependency: &Dependency,
        cnb_path: &Path,
        layer_path: &Path,
        platform_path: &Path,
    ) -> DepLayerResult<()> {
        self.deliver_calls.lock().unwrap().push(DeliverCall {
            dependency: dependency.clone(),
            cnb_path: cnb_path.to_path_buf(),
            layer_path: layer_path.to_path_buf(),
            platform_path: platform_path.to_path_buf(),
        });

        if let Some(reason) = &self.deliver_error {
            return Err(DepLayerError::delivery(&dependency.id, reason.clone()));
        }

        std::fs::create_dir_all(layer_path.join("bin")).unwrap();
        std::fs::write(layer_path.join("bin").join(&dependency.id), &dependency.sha256).unwrap();
        Ok(())
    }
}

/// Returns a one-component document and records each request
#[derive(Default)]
pub struct FakeSbomGenerator {
    error: Option<String>,
    pub calls: Mutex<Vec<(Dependency, PathBuf)>>,
}

impl FakeSbomGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            error: Some(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Dependency, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SbomGenerator for FakeSbomGenerator {
    async fn generate_from_dependency(
        &self,
        dependency: &Dependency,
        dir: &Path,
    ) -> DepLayerResult<SbomDocument> {
        self.calls
            .lock()
            .unwrap()
            .push((dependency.clone(), dir.to_path_buf()));

        if let Some(reason) = &self.error {
            return Err(DepLayerError::SbomGeneration(reason.clone()));
        }

        Ok(SbomDocument::new(vec![SbomComponent {
            id: dependency.id.clone(),
            name: dependency.name.clone(),
            version: dependency.version.clone(),
            sha256: dependency.sha256.clone(),
            uri: dependency.uri.clone(),
            licenses: vec![],
            files: vec![],
        }]))
    }
}
