//! On-disk dependency layers
//!
//! A layer is a directory under the layers root plus a `<name>.toml`
//! metadata file recording its lifecycle flags and the checksum of the
//! artifact installed in it. Reuse is decided by comparing that checksum
//! with the checksum of the freshly resolved dependency.
//!
//! # Layout
//!
//! | Path | Contents |
//! |------|----------|
//! | `<layers>/<name>/` | installed artifact, `env.build/`, `env.launch/` |
//! | `<layers>/<name>.toml` | `[types]` flags and `[metadata]` |
//! | `<layers>/<name>.sbom.<ext>` | SBOM renderings |

pub mod descriptor;
pub mod env;
pub mod store;

pub use descriptor::{Layer, LayerTypes};
pub use env::Environment;
pub use store::Layers;

/// Metadata key holding the checksum of the installed artifact
pub const DEPENDENCY_CACHE_KEY: &str = "dependency-sha";

/// Metadata key holding the install timestamp
pub const BUILT_AT_KEY: &str = "built_at";
