//! Build command - resolve, reuse or install the dependency layer

use crate::build::{Build, BuildContext};
use crate::cli::args::BuildArgs;
use crate::clock::Clock;
use crate::config::Config;
use crate::dependency::CatalogService;
use crate::emitter::LogEmitter;
use crate::error::{DepLayerError, DepLayerResult};
use crate::plan::PlanEntryResolver;
use crate::sbom::DependencySbomGenerator;
use console::style;
use std::sync::Arc;
use tracing::debug;

/// Execute the build command
pub async fn execute(args: BuildArgs, config: &Config) -> DepLayerResult<()> {
    let stack = args
        .stack
        .clone()
        .or_else(|| config.build.stack.clone())
        .ok_or_else(|| {
            DepLayerError::User(
                "No stack given. Pass --stack, set CNB_STACK_ID, or set build.stack in config"
                    .to_string(),
            )
        })?;

    let ctx = BuildContext::load(
        &args.buildpack,
        &args.plan,
        &args.layers,
        &args.platform,
        &stack,
    )
    .await?;
    debug!("Building {} on {}", config.build.dependency, ctx.stack);

    let mut build = Build::new(
        config.build.dependency.clone(),
        Arc::new(PlanEntryResolver::new()),
        Arc::new(CatalogService::new(&config.delivery)),
        Clock::default(),
        LogEmitter::stdout(),
    );

    if config.build.sbom && !args.no_sbom {
        let mut formats = config.build.sbom_formats.clone();
        formats.extend(args.sbom_formats);
        build = build
            .with_sbom_generator(Arc::new(DependencySbomGenerator::new()))
            .with_sbom_formats(formats);
    }

    let result = build.run(&ctx).await?;
    result.write(&ctx.layers).await?;

    for layer in &result.layers {
        let checksum = layer.cached_checksum().unwrap_or("-");
        println!(
            "{} {} (launch: {}, build: {}, cache: {}) {}",
            style("Layer").green().bold(),
            layer.name,
            layer.launch,
            layer.build,
            layer.cache,
            checksum
        );
    }

    Ok(())
}
