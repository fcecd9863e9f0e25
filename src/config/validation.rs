//! Configuration validation utilities and rules

use crate::{
    models::Config,
    error::Result,
};

/// Configuration validator with advisory rules beyond `Config::validate`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration and collect advisory warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        config.validate()?;

        warnings.extend(Self::validate_site_dir(config));
        warnings.extend(Self::validate_network_model(config));

        Ok(warnings)
    }

    fn validate_site_dir(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.site_dir.is_absolute() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Site directory '{}' is absolute; report paths stay relative to it", config.site_dir.display()),
            ));
        }

        warnings
    }

    /// Flag model values far from any realistic connection
    fn validate_network_model(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let network = &config.network;

        let mbps = network.bandwidth_mbps();
        if mbps < 1.0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Bandwidth of {:.2} Mbps is slower than most mobile connections", mbps),
            ));
        } else if mbps > 1000.0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Bandwidth of {:.0} Mbps makes transfer time negligible", mbps),
            ));
        }

        let latency = network.latency_ms();
        if latency > 500.0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Latency of {:.0} ms per request batch will dominate every estimate", latency),
            ));
        }

        if network.max_concurrent_connections > 32 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("{} parallel connections is more than browsers open per host", network.max_concurrent_connections),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self) -> String {
        format!("[{}] {}", self.level.as_str(), self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
