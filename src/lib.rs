//! Site Performance Auditor
//!
//! Audits a statically generated documentation site: estimates first and
//! largest contentful paint under a fixed network model, measures page
//! weight before and after gzip, summarizes static resources and tidies
//! image assets.

pub mod app;
pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod estimator;
pub mod logging;
pub mod models;
pub mod optimizer;
pub mod output;
pub mod report;
pub mod scanner;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, LoadEstimate, NetworkModel, PageResource, ResourceKind, Thresholds};
pub use estimator::LoadTimeEstimator;
pub use audit::{CompressionAuditor, PageAudit};
pub use scanner::ResourceScanner;
pub use output::{OutputFormatter, ColoredFormatter, PlainFormatter, OutputCoordinator, OutputFormatterFactory};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Directory produced by the site build
    pub const DEFAULT_SITE_DIR: &str = "site";
    /// Directory holding source images for the optimizer
    pub const DEFAULT_IMAGE_DIR: &str = "docs/assets/images";

    /// Typical home broadband
    pub const DEFAULT_BANDWIDTH_MBPS: f64 = 10.0;
    /// Round-trip cost charged per request batch
    pub const DEFAULT_LATENCY_MS: f64 = 50.0;
    /// Browser default of parallel connections per host
    pub const DEFAULT_MAX_CONCURRENT: u32 = 6;
    /// Share of JavaScript load time treated as render-blocking
    pub const DEFAULT_JS_BLOCKING_FRACTION: f64 = 0.5;

    pub const INDEX_FCP_LIMIT_SECS: f64 = 1.5;
    pub const CONTENT_FCP_LIMIT_SECS: f64 = 2.0;
    /// Content pages within this factor of the limit only warn
    pub const FCP_WARN_FACTOR: f64 = 1.2;

    /// Maximum compressed page size
    pub const MAX_PAGE_BYTES: u64 = 200 * 1024;
    /// Pages above this share of the limit warn
    pub const PAGE_SIZE_WARN_FRACTION: f64 = 0.8;
    /// Minimum average compression ratio in percent
    pub const MIN_COMPRESSION_RATIO: f64 = 70.0;
    pub const LARGE_IMAGE_BYTES: u64 = 200 * 1024;
    /// Highest gzip level
    pub const GZIP_LEVEL: u32 = 9;

    pub const LOAD_TIME_REPORT: &str = "load-time-report.json";
    pub const PERFORMANCE_REPORT: &str = "performance-report.json";

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
