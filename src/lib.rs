//! deplayer - dependency layer builder
//!
//! Resolves a named dependency against a buildpack catalog, reuses its
//! on-disk layer when the stored checksum still matches and reinstalls it
//! otherwise, then describes the result as a bill of materials and,
//! optionally, an SBOM.

pub mod bom;
pub mod build;
pub mod cli;
pub mod clock;
pub mod config;
pub mod dependency;
pub mod detect;
pub mod emitter;
pub mod error;
pub mod layer;
pub mod plan;
pub mod sbom;

pub use error::{DepLayerError, DepLayerResult};
