//! Buildpack plan entries and their resolution
//!
//! Several participants may request the same dependency with different
//! intents. [`PlanEntryResolver`] reduces those requests to one entry with a
//! version constraint and merged `launch`/`build` flags.

pub mod entry;
pub mod resolver;

pub use entry::{BuildpackPlan, PlanEntry};
pub use resolver::{EntryResolver, PlanEntryResolver};

/// Metadata key holding a version constraint
pub const VERSION_KEY: &str = "version";

/// Metadata key naming where the version constraint came from
pub const VERSION_SOURCE_KEY: &str = "version-source";

/// Metadata key marking a dependency as needed at launch
pub const LAUNCH_KEY: &str = "launch";

/// Metadata key marking a dependency as needed at build time
pub const BUILD_KEY: &str = "build";

/// Version constraint used when no entry asks for one
pub const DEFAULT_VERSION: &str = "default";
