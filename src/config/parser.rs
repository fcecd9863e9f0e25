//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{Cli, Command},
    models::Config,
    error::Result,
    config::env::EnvManager,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    ///
    /// Precedence is defaults, then `.env`, then the process environment,
    /// then command-line flags.
    pub fn parse(&self) -> Result<Config> {
        EnvManager::load_env_file()?;
        let mut config = Config::default();
        config.merge_from_env()?;
        self.finish(config)
    }

    /// Build the configuration from an arbitrary variable source
    pub fn parse_with_lookup<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.merge_from_lookup(lookup)?;
        self.finish(config)
    }

    /// CLI flags win over everything merged so far
    fn finish(&self, mut config: Config) -> Result<Config> {
        self.apply_cli_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref site_dir) = self.cli.site_dir {
            config.site_dir = site_dir.clone();
        }

        if let Some(enable_color) = self.cli.color_preference() {
            config.enable_color = enable_color;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if let Command::LoadTime(ref args) = self.cli.command {
            if let Some(mbps) = args.bandwidth_mbps {
                config.network.bandwidth_bits_per_second = mbps * 1024.0 * 1024.0;
            }
            if let Some(ms) = args.latency_ms {
                config.network.per_request_latency_seconds = ms / 1000.0;
            }
            if let Some(max_concurrent) = args.max_concurrent {
                config.network.max_concurrent_connections = max_concurrent;
            }
            if let Some(fraction) = args.js_blocking_fraction {
                config.network.render_blocking_js_fraction = fraction;
            }
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Site Directory: {}", config.site_dir.display()));
    summary.push(format!("Bandwidth: {:.2} Mbps", config.network.bandwidth_mbps()));
    summary.push(format!("Latency: {:.0} ms", config.network.latency_ms()));
    summary.push(format!("Max Concurrent: {}", config.network.max_concurrent_connections));
    summary.push(format!("JS Blocking Fraction: {}", config.network.render_blocking_js_fraction));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));
    if let Some(level) = config.log_level {
        summary.push(format!("Log Level: {}", level.as_str()));
    }

    summary.join("\n")
}
