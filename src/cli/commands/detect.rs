//! Detect command - write the build plan

use crate::cli::args::DetectArgs;
use crate::config::Config;
use crate::detect::detect;
use crate::error::{DepLayerError, DepLayerResult};
use tokio::fs;

/// Execute the detect command
pub async fn execute(args: DetectArgs, config: &Config) -> DepLayerResult<()> {
    let result = detect(&args.app, &config.build.dependency);

    let content = toml::to_string(&result.plan)?;
    if let Some(parent) = args.plan.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| DepLayerError::io(format!("creating {}", parent.display()), e))?;
    }
    fs::write(&args.plan, content)
        .await
        .map_err(|e| DepLayerError::io(format!("writing {}", args.plan.display()), e))?;

    println!("Detected: provides {}", config.build.dependency);
    Ok(())
}
