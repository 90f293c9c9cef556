//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// deplayer - dependency layer builder
///
/// Resolves a dependency from a buildpack catalog, reuses its layer when
/// the checksum is unchanged and reinstalls it otherwise.
#[derive(Parser, Debug)]
#[command(name = "deplayer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DEPLAYER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dependency layer
    Build(BuildArgs),

    /// Write the detection build plan
    Detect(DetectArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Layers root directory
    #[arg(long)]
    pub layers: PathBuf,

    /// Buildpack plan (TOML with [[entries]])
    #[arg(long)]
    pub plan: PathBuf,

    /// Buildpack directory containing buildpack.toml
    #[arg(long)]
    pub buildpack: PathBuf,

    /// Platform directory
    #[arg(long, default_value = "/platform")]
    pub platform: PathBuf,

    /// Stack identifier (defaults to build.stack from config)
    #[arg(long, env = "CNB_STACK_ID")]
    pub stack: Option<String>,

    /// Additional SBOM media type to render (repeatable)
    #[arg(long = "sbom-format")]
    pub sbom_formats: Vec<String>,

    /// Skip SBOM generation
    #[arg(long)]
    pub no_sbom: bool,
}

/// Arguments for the detect command
#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Where to write the build plan
    #[arg(long)]
    pub plan: PathBuf,

    /// Application directory
    #[arg(long, default_value = ".")]
    pub app: PathBuf,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}
