//! Command-line interface

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Site Performance Auditor - estimates load time and page weight of a built static site
#[derive(Parser, Debug, Clone)]
#[command(name = "site-audit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the built site [default: site]
    #[arg(long, global = true, value_name = "DIR")]
    pub site_dir: Option<PathBuf>,

    /// Force colored output
    #[arg(long, global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug output (JSON log lines on stderr)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Estimate first and largest contentful paint for each page
    LoadTime(LoadTimeArgs),
    /// Audit page size, gzip compression and static resources
    Performance(PerformanceArgs),
    /// Minify SVG files and report image sizes
    OptimizeImages(OptimizeImagesArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct LoadTimeArgs {
    /// Page to estimate, relative to the site directory (repeatable; default: all pages)
    #[arg(long = "page", value_name = "PATH", action = ArgAction::Append)]
    pub pages: Vec<String>,

    /// Report file [default: load-time-report.json]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Link bandwidth in megabits per second
    #[arg(long, value_name = "MBPS", value_parser = parse_positive_f64)]
    pub bandwidth_mbps: Option<f64>,

    /// Latency per request batch in milliseconds
    #[arg(long, value_name = "MS", value_parser = parse_non_negative_f64)]
    pub latency_ms: Option<f64>,

    /// Parallel connections per host
    #[arg(long, value_name = "N", value_parser = parse_positive_u32)]
    pub max_concurrent: Option<u32>,

    /// Share of JavaScript load time that blocks first paint (0 to 1)
    #[arg(long, value_name = "FRACTION", value_parser = parse_fraction)]
    pub js_blocking_fraction: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PerformanceArgs {
    /// Report file [default: performance-report.json]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with code 3 when a threshold check fails
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug, Clone)]
pub struct OptimizeImagesArgs {
    /// Directory to optimize
    #[arg(long, value_name = "DIR", default_value = crate::defaults::DEFAULT_IMAGE_DIR)]
    pub target_dir: PathBuf,

    /// Show what would be done without modifying files
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Command::LoadTime(args) = &self.command {
            if let Some(page) = args.pages.iter().find(|p| p.trim().is_empty()) {
                return Err(format!("Invalid --page value '{}': path cannot be empty", page));
            }
        }

        Ok(())
    }

    /// Explicit color choice from the command line, if any
    pub fn color_preference(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled, honoring the color environment
    pub fn use_colors(&self) -> bool {
        resolve_color(self.color_preference(), |key| std::env::var(key).ok())
    }

    /// Short name of the selected subcommand
    pub fn command_name(&self) -> &'static str {
        match self.command {
            Command::LoadTime(_) => "load-time",
            Command::Performance(_) => "performance",
            Command::OptimizeImages(_) => "optimize-images",
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Command Line Summary:\n");
        summary.push_str(&format!("  Command: {}\n", self.command_name()));
        if let Some(ref site_dir) = self.site_dir {
            summary.push_str(&format!("  Site directory: {}\n", site_dir.display()));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        match &self.command {
            Command::LoadTime(args) => {
                if !args.pages.is_empty() {
                    summary.push_str(&format!("  Pages: {}\n", args.pages.join(", ")));
                }
            }
            Command::Performance(args) => {
                summary.push_str(&format!("  Strict: {}\n", args.strict));
            }
            Command::OptimizeImages(args) => {
                summary.push_str(&format!("  Target directory: {}\n", args.target_dir.display()));
                summary.push_str(&format!("  Dry run: {}\n", args.dry_run));
            }
        }

        summary
    }
}

fn parse_positive_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !value.is_finite() || value <= 0.0 {
        return Err("Value must be greater than 0".to_string());
    }
    Ok(value)
}

fn parse_non_negative_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !value.is_finite() || value < 0.0 {
        return Err("Value cannot be negative".to_string());
    }
    Ok(value)
}

fn parse_positive_u32(s: &str) -> Result<u32, String> {
    if s.starts_with('+') {
        return Err(format!("Invalid count: {}", s));
    }
    match s.parse::<u32>() {
        Ok(0) => Err("Count must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid count: {}", s)),
    }
}

fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(0.0..=1.0).contains(&value) {
        return Err("Fraction must be between 0 and 1".to_string());
    }
    Ok(value)
}

/// Decide on color from an explicit flag, then the environment
///
/// `NO_COLOR` (non-empty) and `ENABLE_COLOR=false` turn color off; without
/// either the terminal decides.
pub fn resolve_color<F>(preference: Option<bool>, lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(enabled) = preference {
        return enabled;
    }
    if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    if lookup("ENABLE_COLOR").is_some_and(|v| v.trim().eq_ignore_ascii_case("false")) {
        return false;
    }
    supports_color(&lookup)
}

/// Check if the terminal supports color output
fn supports_color<F>(lookup: &F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if lookup("TERM").is_some_and(|term| term == "dumb") {
        return false;
    }

    if lookup("FORCE_COLOR").is_some() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
