//! Dependency build orchestration
//!
//! [`Build`] resolves the requested dependency, decides whether its layer
//! can be reused and installs the artifact when it cannot. The outcome is a
//! [`BuildResult`] that the caller persists with [`BuildResult::write`].

pub mod context;
pub mod orchestrator;
pub mod result;

#[cfg(test)]
pub(crate) mod fakes;

pub use context::BuildContext;
pub use orchestrator::Build;
pub use result::{BuildMetadata, BuildResult, LaunchMetadata};
