//! Type definitions shared by the audits and the output layer

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Outcome of a single threshold check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Within the limit
    Pass,
    /// Within the limit but close to it, or above a soft limit
    Warn,
    /// Over the limit
    Fail,
}

impl CheckStatus {
    /// Classify `value` against an upper `limit`, warning above `warn_at`
    pub fn upper_bound(value: f64, limit: f64, warn_at: f64) -> Self {
        if value > limit {
            Self::Fail
        } else if value > warn_at {
            Self::Warn
        } else {
            Self::Pass
        }
    }

    /// Classify `value` against a lower `minimum`
    pub fn lower_bound(value: f64, minimum: f64) -> Self {
        if value >= minimum {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    /// Whether the check counts as passed (warnings included)
    pub fn is_passing(&self) -> bool {
        !matches!(self, Self::Fail)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Warn => "⚠",
            Self::Fail => "✗",
        }
    }
}

/// Priority of an optimization recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a byte count the way the reports print sizes
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Format an estimated duration in seconds
pub fn format_seconds(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.0} ms", seconds * 1000.0)
    } else {
        format!("{:.2} s", seconds)
    }
}
