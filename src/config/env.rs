//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::logging::LogLevel;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the current directory if it exists
    ///
    /// Variables already set in the process environment win over the file.
    /// Returns whether a file was loaded.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"))
    }

    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;
        Ok(true)
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "SITE_DIR" => {
                if value.is_empty() {
                    return Err(AppError::config("SITE_DIR cannot be empty"));
                }
            }
            "BANDWIDTH_MBPS" => {
                let mbps: f64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid BANDWIDTH_MBPS value '{}': {}", value, e)))?;
                if !mbps.is_finite() || mbps <= 0.0 {
                    return Err(AppError::config(format!("BANDWIDTH_MBPS must be greater than 0, got: {}", mbps)));
                }
            }
            "LATENCY_MS" => {
                let ms: f64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid LATENCY_MS value '{}': {}", value, e)))?;
                if !ms.is_finite() || ms < 0.0 {
                    return Err(AppError::config(format!("LATENCY_MS cannot be negative, got: {}", ms)));
                }
            }
            "MAX_CONCURRENT" => {
                let count: u32 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid MAX_CONCURRENT value '{}': {}", value, e)))?;
                if count == 0 {
                    return Err(AppError::config("MAX_CONCURRENT must be greater than 0"));
                }
            }
            "JS_BLOCKING_FRACTION" => {
                let fraction: f64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid JS_BLOCKING_FRACTION value '{}': {}", value, e)))?;
                if !(0.0..=1.0).contains(&fraction) {
                    return Err(AppError::config(format!("JS_BLOCKING_FRACTION must be between 0 and 1, got: {}", fraction)));
                }
            }
            "ENABLE_COLOR" => {
                value.parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            "LOG_LEVEL" => {
                value.parse::<LogLevel>()?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("SITE_DIR", "Directory containing the built site", "site"),
            ("BANDWIDTH_MBPS", "Modelled bandwidth in megabits per second", "10"),
            ("LATENCY_MS", "Modelled latency per request batch in milliseconds", "50"),
            ("MAX_CONCURRENT", "Parallel connections per host", "6"),
            ("JS_BLOCKING_FRACTION", "Share of JavaScript load time blocking first paint (0-1)", "0.5"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
            ("LOG_LEVEL", "Minimum log level (trace, debug, info, warn, error)", "warn"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Check a .env file and return one warning per invalid line
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"');
                if let Err(e) = Self::validate_env_var(key.trim(), value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(Some(warnings))
    }
}
