//! Software bill of materials for rebuilt layers
//!
//! An [`SbomGenerator`] describes a freshly installed dependency as an
//! [`SbomDocument`], which is then rendered into each requested
//! [`SbomFormat`] and attached to the layer.

pub mod document;
pub mod generator;

pub use document::{SbomComponent, SbomDocument, SbomFile, SbomFormat, SbomRendering};
pub use generator::{DependencySbomGenerator, SbomGenerator};
