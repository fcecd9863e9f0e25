//! Configuration data model and validation

use crate::logging::LogLevel;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Simplified network the load-time estimates assume
///
/// Fixed for a run. Every field is a heuristic, not a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkModel {
    /// Link bandwidth in bits per second (1 Mbps = 1024 * 1024 bits)
    pub bandwidth_bits_per_second: f64,
    /// Latency charged once per request batch
    pub per_request_latency_seconds: f64,
    /// Parallel connections a browser opens per host
    pub max_concurrent_connections: u32,
    /// Share of JavaScript load time that delays first paint
    pub render_blocking_js_fraction: f64,
}

impl Default for NetworkModel {
    fn default() -> Self {
        Self::from_mbps(
            crate::defaults::DEFAULT_BANDWIDTH_MBPS,
            crate::defaults::DEFAULT_LATENCY_MS,
            crate::defaults::DEFAULT_MAX_CONCURRENT,
        )
    }
}

impl NetworkModel {
    /// Build a model from human units (megabits per second, milliseconds)
    pub fn from_mbps(bandwidth_mbps: f64, latency_ms: f64, max_concurrent: u32) -> Self {
        Self {
            bandwidth_bits_per_second: bandwidth_mbps * 1024.0 * 1024.0,
            per_request_latency_seconds: latency_ms / 1000.0,
            max_concurrent_connections: max_concurrent,
            render_blocking_js_fraction: crate::defaults::DEFAULT_JS_BLOCKING_FRACTION,
        }
    }

    pub fn with_js_blocking_fraction(mut self, fraction: f64) -> Self {
        self.render_blocking_js_fraction = fraction;
        self
    }

    pub fn bandwidth_bytes_per_second(&self) -> f64 {
        self.bandwidth_bits_per_second / 8.0
    }

    pub fn bandwidth_mbps(&self) -> f64 {
        self.bandwidth_bits_per_second / (1024.0 * 1024.0)
    }

    pub fn latency_ms(&self) -> f64 {
        self.per_request_latency_seconds * 1000.0
    }

    /// Seconds needed to transfer `bytes` at the model bandwidth
    pub fn transfer_seconds(&self, bytes: u64) -> f64 {
        bytes as f64 / self.bandwidth_bytes_per_second()
    }

    /// Number of request rounds needed to fetch `count` resources
    pub fn batches(&self, count: usize) -> u64 {
        let per_batch = self.max_concurrent_connections.max(1) as u64;
        (count as u64).div_ceil(per_batch)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bandwidth_bits_per_second.is_finite() || self.bandwidth_bits_per_second <= 0.0 {
            return Err(AppError::config("Bandwidth must be greater than 0"));
        }

        if !self.per_request_latency_seconds.is_finite() || self.per_request_latency_seconds < 0.0 {
            return Err(AppError::config("Latency cannot be negative"));
        }

        if self.max_concurrent_connections == 0 {
            return Err(AppError::config("Max concurrent connections must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.render_blocking_js_fraction) {
            return Err(AppError::config(format!(
                "Render-blocking JS fraction must be between 0 and 1, got: {}",
                self.render_blocking_js_fraction
            )));
        }

        Ok(())
    }
}

/// Pass/warn/fail limits applied by the reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub index_fcp_limit_secs: f64,
    pub content_fcp_limit_secs: f64,
    pub fcp_warn_factor: f64,
    pub max_page_bytes: u64,
    pub page_size_warn_fraction: f64,
    pub min_compression_ratio: f64,
    pub large_image_bytes: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        use crate::defaults::*;
        Self {
            index_fcp_limit_secs: INDEX_FCP_LIMIT_SECS,
            content_fcp_limit_secs: CONTENT_FCP_LIMIT_SECS,
            fcp_warn_factor: FCP_WARN_FACTOR,
            max_page_bytes: MAX_PAGE_BYTES,
            page_size_warn_fraction: PAGE_SIZE_WARN_FRACTION,
            min_compression_ratio: MIN_COMPRESSION_RATIO,
            large_image_bytes: LARGE_IMAGE_BYTES,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the built site
    #[serde(default = "default_site_dir")]
    pub site_dir: PathBuf,

    #[serde(default)]
    pub network: NetworkModel,

    #[serde(default)]
    pub thresholds: Thresholds,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Explicit log level, overriding the verbose/debug mapping
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_dir: default_site_dir(),
            network: NetworkModel::default(),
            thresholds: Thresholds::default(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            log_level: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.site_dir.as_os_str().is_empty() {
            return Err(AppError::config("Site directory cannot be empty"));
        }

        self.network.validate()?;

        if self.thresholds.max_page_bytes == 0 {
            return Err(AppError::config("Maximum page size must be greater than 0"));
        }

        Ok(())
    }

    /// Merge process environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge variables provided by `lookup` into this configuration
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(site_dir) = lookup("SITE_DIR") {
            let site_dir = site_dir.trim();
            if !site_dir.is_empty() {
                self.site_dir = PathBuf::from(site_dir);
            }
        }

        if let Some(bandwidth) = lookup("BANDWIDTH_MBPS") {
            let mbps: f64 = bandwidth.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid BANDWIDTH_MBPS value '{}': {}", bandwidth, e)))?;
            self.network.bandwidth_bits_per_second = mbps * 1024.0 * 1024.0;
        }

        if let Some(latency) = lookup("LATENCY_MS") {
            let ms: f64 = latency.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid LATENCY_MS value '{}': {}", latency, e)))?;
            self.network.per_request_latency_seconds = ms / 1000.0;
        }

        if let Some(max_concurrent) = lookup("MAX_CONCURRENT") {
            self.network.max_concurrent_connections = max_concurrent.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid MAX_CONCURRENT value '{}': {}", max_concurrent, e)))?;
        }

        if let Some(fraction) = lookup("JS_BLOCKING_FRACTION") {
            self.network.render_blocking_js_fraction = fraction.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid JS_BLOCKING_FRACTION value '{}': {}", fraction, e)))?;
        }

        if let Some(enable_color) = lookup("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        // https://no-color.org: any non-empty value disables color
        if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            self.enable_color = false;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = Some(level.parse()?);
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_site_dir() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_SITE_DIR)
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.site_dir, PathBuf::from("site"));
    }

    #[test]
    fn test_default_network_model() {
        let model = NetworkModel::default();
        assert_eq!(model.bandwidth_bytes_per_second(), 1_310_720.0);
        assert!((model.per_request_latency_seconds - 0.05).abs() < 1e-12);
        assert_eq!(model.max_concurrent_connections, 6);
        assert_eq!(model.render_blocking_js_fraction, 0.5);
        assert!((model.bandwidth_mbps() - 10.0).abs() < 1e-12);
        assert!((model.latency_ms() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_batches() {
        let model = NetworkModel::default();
        assert_eq!(model.batches(0), 0);
        assert_eq!(model.batches(1), 1);
        assert_eq!(model.batches(6), 1);
        assert_eq!(model.batches(7), 2);
        assert_eq!(model.batches(13), 3);
    }

    #[test]
    fn test_zero_bandwidth_invalid() {
        let mut config = Config::default();
        config.network.bandwidth_bits_per_second = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_latency_invalid() {
        let mut config = Config::default();
        config.network.per_request_latency_seconds = -0.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_invalid() {
        let mut config = Config::default();
        config.network.max_concurrent_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_js_fraction_out_of_range_invalid() {
        let mut config = Config::default();
        config.network.render_blocking_js_fraction = 1.5;
        assert!(config.validate().is_err());
        config.network.render_blocking_js_fraction = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_from_lookup() {
        let mut config = Config::default();
        config.merge_from_lookup(lookup_from(&[
            ("SITE_DIR", "public"),
            ("BANDWIDTH_MBPS", "20"),
            ("LATENCY_MS", "100"),
            ("MAX_CONCURRENT", "4"),
            ("JS_BLOCKING_FRACTION", "0.25"),
            ("ENABLE_COLOR", "false"),
            ("LOG_LEVEL", "debug"),
        ])).unwrap();

        assert_eq!(config.site_dir, PathBuf::from("public"));
        assert!((config.network.bandwidth_mbps() - 20.0).abs() < 1e-9);
        assert!((config.network.per_request_latency_seconds - 0.1).abs() < 1e-12);
        assert_eq!(config.network.max_concurrent_connections, 4);
        assert_eq!(config.network.render_blocking_js_fraction, 0.25);
        assert!(!config.enable_color);
        assert_eq!(config.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn test_no_color_convention() {
        let mut config = Config::default();
        config.merge_from_lookup(lookup_from(&[("NO_COLOR", "1")])).unwrap();
        assert!(!config.enable_color);

        let mut config = Config::default();
        config.merge_from_lookup(lookup_from(&[("NO_COLOR", "")])).unwrap();
        assert!(config.enable_color);
    }

    #[test]
    fn test_invalid_env_values_rejected() {
        let mut config = Config::default();
        let err = config.merge_from_lookup(lookup_from(&[("MAX_CONCURRENT", "six")])).unwrap_err();
        assert!(err.to_string().contains("MAX_CONCURRENT"));

        let mut config = Config::default();
        assert!(config.merge_from_lookup(lookup_from(&[("BANDWIDTH_MBPS", "fast")])).is_err());
    }
}
