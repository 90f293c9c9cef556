//! deplayer - dependency layer builder
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use deplayer::cli::{Cli, Commands};
use deplayer::config::ConfigManager;
use deplayer::error::DepLayerResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> DepLayerResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    // 0 = warn, 1 = info, 2+ = debug; general.verbose counts as -v
    let level = cli.verbose.max(u8::from(config.general.verbose));
    let filter = match level {
        0 => EnvFilter::new("deplayer=warn"),
        1 => EnvFilter::new("deplayer=info"),
        _ => EnvFilter::new("deplayer=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Build(args) => deplayer::cli::commands::build(args, &config).await,
        Commands::Detect(args) => deplayer::cli::commands::detect(args, &config).await,
        Commands::Config(args) => {
            deplayer::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
