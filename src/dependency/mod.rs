//! Dependency records and the manager that resolves and delivers them
//!
//! The orchestrator only talks to [`DependencyManager`]. [`CatalogService`]
//! is the production implementation backed by a `buildpack.toml` catalog.

pub mod catalog;
pub mod manager;
pub mod record;
pub mod service;

pub use catalog::Catalog;
pub use manager::DependencyManager;
pub use record::Dependency;
pub use service::CatalogService;
