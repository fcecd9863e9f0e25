//! Colored formatter implementation with terminal color support
//!
//! Pass/warn/fail markers are green, yellow and red; headers are bold blue.

use super::formatter::{FormattingOptions, OutputFormatter, BANNER_WIDTH};
use crate::error::Result;
use crate::types::{CheckStatus, Priority};
use colored::*;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,
            muted: Color::BrightBlack,
        }
    }
}

impl ColorScheme {
    fn status(&self, status: CheckStatus) -> Color {
        match status {
            CheckStatus::Pass => self.success,
            CheckStatus::Warn => self.warning,
            CheckStatus::Fail => self.error,
        }
    }

    fn priority(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.error,
            Priority::Medium => self.warning,
            Priority::Low => self.info,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self { options, color_scheme }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "=".repeat(BANNER_WIDTH);
        let centered = format!("{:^width$}", title, width = BANNER_WIDTH);
        Ok(format!(
            "{}\n{}\n{}",
            self.colorize(&border, self.color_scheme.header).bold(),
            self.colorize(&centered, self.color_scheme.header).bold(),
            self.colorize(&border, self.color_scheme.header).bold(),
        ))
    }

    fn format_label(&self, label: &str) -> String {
        self.bold(label).to_string()
    }

    fn format_check(&self, status: CheckStatus, message: &str) -> String {
        let line = format!("{} {}", status.symbol(), message);
        self.colorize(&line, self.color_scheme.status(status)).to_string()
    }

    fn format_priority(&self, priority: Priority) -> String {
        let tag = format!("[{}]", priority);
        self.colorize(&tag, self.color_scheme.priority(priority)).to_string()
    }

    fn format_muted(&self, text: &str) -> String {
        self.colorize(text, self.color_scheme.muted).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        self.colorize(&format!("✗ {}", error), self.color_scheme.error).to_string()
    }

    fn format_warning(&self, warning: &str) -> String {
        self.colorize(&format!("⚠ {}", warning), self.color_scheme.warning).to_string()
    }

    fn format_success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), self.color_scheme.success).to_string()
    }
}
