//! The dependency build: resolve, reuse or reinstall, describe

use crate::build::context::BuildContext;
use crate::build::result::{BuildMetadata, BuildResult, LaunchMetadata};
use crate::clock::{round_millis, Clock};
use crate::dependency::DependencyManager;
use crate::emitter::LogEmitter;
use crate::error::DepLayerResult;
use crate::layer::{Layer, LayerTypes};
use crate::plan::{EntryResolver, DEFAULT_VERSION};
use crate::sbom::SbomGenerator;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds one dependency layer
///
/// Collaborators are injected so the decision logic can be driven by
/// recording doubles in tests.
pub struct Build {
    dependency: String,
    entry_resolver: Arc<dyn EntryResolver>,
    dependency_manager: Arc<dyn DependencyManager>,
    sbom_generator: Option<Arc<dyn SbomGenerator>>,
    sbom_formats: Vec<String>,
    clock: Clock,
    logger: LogEmitter,
}

impl Build {
    pub fn new(
        dependency: impl Into<String>,
        entry_resolver: Arc<dyn EntryResolver>,
        dependency_manager: Arc<dyn DependencyManager>,
        clock: Clock,
        logger: LogEmitter,
    ) -> Self {
        Self {
            dependency: dependency.into(),
            entry_resolver,
            dependency_manager,
            sbom_generator: None,
            sbom_formats: Vec::new(),
            clock,
            logger,
        }
    }

    /// Generate an SBOM whenever the layer is rebuilt
    pub fn with_sbom_generator(mut self, generator: Arc<dyn SbomGenerator>) -> Self {
        self.sbom_generator = Some(generator);
        self
    }

    /// Media types rendered in addition to the buildpack's declared formats
    pub fn with_sbom_formats(mut self, formats: Vec<String>) -> Self {
        self.sbom_formats = formats;
        self
    }

    /// Run the build against `ctx`.
    ///
    /// Any collaborator failure aborts the build and is returned unchanged;
    /// nothing is written to disk beyond what the failing step touched.
    pub async fn run(&self, ctx: &BuildContext) -> DepLayerResult<BuildResult> {
        self.logger.title(format!(
            "{} {}",
            ctx.buildpack_info.name, ctx.buildpack_info.version
        ));

        let (entry, _) = self
            .entry_resolver
            .resolve(&self.dependency, &ctx.plan.entries, &[]);
        let version = entry.version().unwrap_or(DEFAULT_VERSION).to_string();

        let dependency = self
            .dependency_manager
            .resolve(&ctx.catalog_path(), &self.dependency, &version, &ctx.stack)
            .await?;

        let bom = self
            .dependency_manager
            .generate_bill_of_materials(std::slice::from_ref(&dependency));

        let (launch, build) = self
            .entry_resolver
            .merge_layer_types(&self.dependency, &ctx.plan.entries);
        let types = LayerTypes {
            launch,
            build,
            cache: build,
        };

        let build_metadata = BuildMetadata {
            bom: if build { bom.clone() } else { Vec::new() },
        };
        let launch_metadata = LaunchMetadata {
            bom: if launch { bom } else { Vec::new() },
        };

        let mut layer = ctx.layers.get(&self.dependency).await?;

        if layer.holds(&dependency.sha256) {
            info!(
                "Layer {} already holds {} ({})",
                self.dependency, dependency.version, dependency.sha256
            );
            self.logger
                .process(format!("Reusing cached layer {}", layer.path.display()));
            self.logger.break_line();

            layer.set_types(types);
            export_path(&mut layer);

            return Ok(BuildResult {
                layers: vec![layer],
                build: build_metadata,
                launch: launch_metadata,
            });
        }

        debug!(
            "Cached checksum {:?} differs from {}",
            layer.cached_checksum(),
            dependency.sha256
        );
        self.logger.process("Executing build process");

        let mut layer = ctx.layers.reset(&layer).await?;
        layer.set_types(types);

        let display_name = if dependency.name.is_empty() {
            &dependency.id
        } else {
            &dependency.name
        };
        self.logger.subprocess(format!(
            "Installing {} {}",
            display_name, dependency.version
        ));

        let (duration, delivered) = self
            .clock
            .measure(|| {
                self.dependency_manager.deliver(
                    &dependency,
                    &ctx.cnb_path,
                    &layer.path,
                    &ctx.platform_path,
                )
            })
            .await;
        delivered?;

        self.logger
            .action(format!("Completed in {:?}", round_millis(duration)));
        self.logger.break_line();

        if let Some(generator) = &self.sbom_generator {
            let formats: Vec<String> = ctx
                .buildpack_info
                .sbom_formats
                .iter()
                .chain(&self.sbom_formats)
                .cloned()
                .collect();

            self.logger.process("Generating SBOM");
            let (duration, document) = self
                .clock
                .measure(|| generator.generate_from_dependency(&dependency, &layer.path))
                .await;
            let document = document?;
            self.logger
                .action(format!("Completed in {:?}", round_millis(duration)));

            layer.sbom = document.in_formats(&formats)?;
            if !layer.sbom.is_empty() {
                self.logger.process("Writing SBOM in the following format(s):");
                for format in &formats {
                    self.logger.subprocess(format);
                }
            }
            self.logger.break_line();
        }

        layer.stamp(&dependency.sha256, self.clock.timestamp());
        export_path(&mut layer);

        Ok(BuildResult {
            layers: vec![layer],
            build: build_metadata,
            launch: launch_metadata,
        })
    }
}

/// Put the layer on `PATH` for later build steps, and for the app when it launches
fn export_path(layer: &mut Layer) {
    let root = layer.path.display().to_string();
    layer.build_env.append("PATH", root.clone(), ":");
    if layer.launch {
        layer.launch_env.append("PATH", root, ":");
    }
}
