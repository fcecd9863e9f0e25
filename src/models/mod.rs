//! Data models and structures for the site auditor

pub mod config;
pub mod estimate;
pub mod resource;

// Re-export main model types
pub use config::{Config, NetworkModel, Thresholds};
pub use estimate::{ClassLoad, LoadEstimate};
pub use resource::{PageResource, ResourceKind};
