//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation.

use crate::error::Result;
use crate::types::{CheckStatus, Priority};

/// Width of section banners
pub const BANNER_WIDTH: usize = 80;

/// Main trait for output formatting
///
/// Implementations style individual pieces; the layout of a whole summary
/// lives in [`super::OutputCoordinator`].
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format a bold sub-heading inside a section
    fn format_label(&self, label: &str) -> String;

    /// Prefix `message` with the marker of `status`
    fn format_check(&self, status: CheckStatus, message: &str) -> String;

    /// Render a recommendation priority tag such as `[HIGH]`
    fn format_priority(&self, priority: Priority) -> String;

    /// De-emphasized text (paths, hints)
    fn format_muted(&self, text: &str) -> String;

    /// Format error messages
    fn format_error(&self, error: &str) -> String;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> String;

    /// Format success messages
    fn format_success(&self, message: &str) -> String;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
        }
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    #[allow(dead_code)]
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "=".repeat(BANNER_WIDTH);
        Ok(format!("{}\n{:^width$}\n{}", border, title, border, width = BANNER_WIDTH))
    }

    fn format_label(&self, label: &str) -> String {
        label.to_string()
    }

    fn format_check(&self, status: CheckStatus, message: &str) -> String {
        format!("{} {}", status.symbol(), message)
    }

    fn format_priority(&self, priority: Priority) -> String {
        format!("[{}]", priority)
    }

    fn format_muted(&self, text: &str) -> String {
        text.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("ERROR: {}", error)
    }

    fn format_warning(&self, warning: &str) -> String {
        format!("WARNING: {}", warning)
    }

    fn format_success(&self, message: &str) -> String {
        format!("SUCCESS: {}", message)
    }
}
