//! Main application orchestration and execution

use crate::{
    audit::{CompressionAuditor, PerformanceChecks, ResourceInventory},
    cli::{Cli, Command, LoadTimeArgs, OptimizeImagesArgs, PerformanceArgs},
    config::{display_config_summary, load_config, validate_config, ValidationLevel},
    error::{AppError, Result},
    estimator::LoadTimeEstimator,
    log_warn,
    logging::{Logger, LoggerFactory},
    models::{Config, LoadEstimate, ResourceKind},
    optimizer::ImageOptimizer,
    output::{OutputCoordinator, OutputFormatterFactory},
    report::{write_json, LoadTimeReport, PerformanceReport},
    scanner::ResourceScanner,
};
use std::path::{Path, PathBuf};

/// Main application struct that coordinates all components
pub struct App {
    command: Command,
    config: Config,
    loggers: LoggerFactory,
    logger: Logger,
    coordinator: OutputCoordinator,
}

impl App {
    /// Load configuration and wire up logging and output
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::validation)?;

        let command = cli.command.clone();
        let config = load_config(cli)?;
        let loggers = LoggerFactory::new(&config);
        let logger = loggers.create_logger("app");

        let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
        let mut coordinator = OutputCoordinator::new(formatter, config.thresholds);
        if config.verbose {
            coordinator = coordinator.with_full_listings();
        }

        Ok(Self { command, config, loggers, logger, coordinator })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the selected subcommand and print its summary to stdout
    pub fn run(self) -> Result<()> {
        self.logger.debug("Configuration loaded")
            .field("session", self.loggers.session_id())
            .field("summary", display_config_summary(&self.config))
            .log();

        for warning in validate_config(&self.config)? {
            let builder = match warning.level {
                ValidationLevel::Warning => self.logger.warn(&warning.message),
                ValidationLevel::Info => self.logger.info(&warning.message),
            };
            builder.field("check", "config").log();
        }

        match &self.command {
            Command::LoadTime(args) => self.run_load_time(args),
            Command::Performance(args) => self.run_performance(args),
            Command::OptimizeImages(args) => self.run_optimize_images(args),
        }
    }

    fn run_load_time(&self, args: &LoadTimeArgs) -> Result<()> {
        let scanner = ResourceScanner::new(&self.config.site_dir)?;
        let pages = self.select_pages(&scanner, &args.pages);
        let estimator = LoadTimeEstimator::new(self.config.network, scanner.root())?;

        let mut results: Vec<LoadEstimate> = Vec::with_capacity(pages.len());
        for page in &pages {
            match estimator.estimate_page(page) {
                Ok(estimate) => {
                    self.logger.debug("Estimated page")
                        .field("page", &estimate.path)
                        .field("fcp_seconds", estimate.fcp_seconds)
                        .log();
                    results.push(estimate);
                }
                Err(e) => {
                    log_warn!(self.logger, "Skipping unreadable page")
                        .field("page", page.display().to_string())
                        .error_info(&e)
                        .log();
                }
            }
        }
        results.sort_by(|a, b| a.path.cmp(&b.path));

        let report = LoadTimeReport::new(&self.config.network, results);
        let output = args.output.clone().unwrap_or_else(|| PathBuf::from(crate::defaults::LOAD_TIME_REPORT));
        write_json(&report, &output)?;

        println!("{}", self.coordinator.display_load_time(&report)?);
        println!();
        println!("{}", self.report_saved(&output));
        Ok(())
    }

    /// Every HTML page, or only the requested ones that exist
    fn select_pages(&self, scanner: &ResourceScanner, requested: &[String]) -> Vec<PathBuf> {
        if requested.is_empty() {
            let scan = scanner.scan(&[ResourceKind::Html]);
            self.warn_unreadable(scan.unreadable);
            return scan.resources.into_iter().map(|r| r.path).collect();
        }

        requested
            .iter()
            .filter_map(|page| {
                let path = scanner.root().join(page.trim_start_matches('/'));
                if path.is_file() {
                    Some(path)
                } else {
                    println!(
                        "{}",
                        self.coordinator.formatter().format_warning(&format!("Page not found, skipping: {}", page))
                    );
                    None
                }
            })
            .collect()
    }

    fn run_performance(&self, args: &PerformanceArgs) -> Result<()> {
        let scanner = ResourceScanner::new(&self.config.site_dir)?;
        let auditor = CompressionAuditor::new(scanner.root());

        let scan = scanner.scan(&[ResourceKind::Html]);
        self.warn_unreadable(scan.unreadable);

        let (pages, failures) = auditor.audit_pages(&scan.resources);
        for (path, error) in &failures {
            log_warn!(self.logger, "Skipping unreadable page")
                .field("page", path.display().to_string())
                .error_info(error)
                .log();
        }

        let resources = ResourceInventory::collect(&scanner, &auditor);
        let checks = PerformanceChecks::evaluate(&pages, &self.config.thresholds);
        let report = PerformanceReport::new(pages, resources, &self.config.thresholds);

        let output = args.output.clone().unwrap_or_else(|| PathBuf::from(crate::defaults::PERFORMANCE_REPORT));
        write_json(&report, &output)?;

        println!("{}", self.coordinator.display_performance(&report, &checks)?);
        println!();
        println!("{}", self.report_saved(&output));

        if args.strict && !checks.all_passed() {
            return Err(AppError::threshold(format!("{} check(s) failed", checks.failed_count())));
        }
        Ok(())
    }

    fn run_optimize_images(&self, args: &OptimizeImagesArgs) -> Result<()> {
        let logger = self.loggers.create_logger("optimizer");
        let mut optimizer = ImageOptimizer::new(args.dry_run, self.config.verbose, logger)?
            .with_large_image_limit(self.config.thresholds.large_image_bytes);

        let summary = optimizer.optimize_directory(&args.target_dir)?;
        println!("{}", self.coordinator.display_optimization(&summary)?);
        Ok(())
    }

    fn warn_unreadable(&self, count: usize) {
        if count > 0 {
            self.logger.warn("Some directory entries could not be read")
                .field("count", count)
                .log();
        }
    }

    fn report_saved(&self, path: &Path) -> String {
        self.coordinator.formatter().format_success(&format!("Report saved to {}", path.display()))
    }
}
