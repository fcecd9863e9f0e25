//! Output formatting and display system
//!
//! Formatters style single lines; the coordinator lays out the console
//! summary of each command.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{FormattingOptions, OutputFormatter, PlainFormatter, BANNER_WIDTH};

use crate::audit::{PerformanceChecks, ResourceEntry, ResourceInventory};
use crate::error::{AppError, Result};
use crate::models::{LoadEstimate, Thresholds};
use crate::optimizer::{FileOutcome, OptimizationSummary};
use crate::report::{LoadTimeReport, PerformanceReport, Recommendation};
use crate::stats::Summary;
use crate::types::{format_seconds, format_size, CheckStatus};
use std::fmt::Write as _;
use std::path::Path;

/// Largest images listed in the resource summary
const LARGE_IMAGES_LISTED: usize = 5;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

fn fmt_error(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", e))
}

/// Main output coordinator that handles all result display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    thresholds: Thresholds,
    max_listed: usize,
}

impl OutputCoordinator {
    /// Create a new output coordinator with the specified formatter
    pub fn new(formatter: Box<dyn OutputFormatter>, thresholds: Thresholds) -> Self {
        Self {
            formatter,
            thresholds,
            max_listed: 10,
        }
    }

    /// List every entry instead of the first ten
    pub fn with_full_listings(mut self) -> Self {
        self.max_listed = usize::MAX;
        self
    }

    pub fn formatter(&self) -> &dyn OutputFormatter {
        self.formatter.as_ref()
    }

    /// Console summary of the `load-time` command
    pub fn display_load_time(&self, report: &LoadTimeReport) -> Result<String> {
        let mut out = String::new();
        let f = self.formatter();
        let results = &report.results;

        writeln!(out, "{}\n", f.format_header("Page Load Time Estimates")?).map_err(fmt_error)?;
        writeln!(
            out,
            "{}",
            f.format_muted(&format!(
                "Network model: {:.1} Mbps, {:.0} ms latency, {} parallel requests, {:.0}% of JS render-blocking",
                report.test_conditions.bandwidth_mbps,
                report.test_conditions.latency_ms,
                report.test_conditions.max_concurrent,
                report.test_conditions.render_blocking_js_fraction * 100.0,
            ))
        ).map_err(fmt_error)?;

        if results.is_empty() {
            writeln!(out, "\n{}", f.format_warning("No pages to estimate")).map_err(fmt_error)?;
            return Ok(out);
        }

        let index = results.iter().find(|r| r.is_index);
        if let Some(index) = index {
            writeln!(out, "\n{}", f.format_label("Index page")).map_err(fmt_error)?;
            self.write_page_breakdown(&mut out, index)?;
            writeln!(out, "{}", self.index_verdict(index)).map_err(fmt_error)?;
        }

        let content: Vec<&LoadEstimate> = results.iter().filter(|r| !r.is_index).collect();
        if !content.is_empty() {
            writeln!(out, "\n{}", f.format_label("Content pages")).map_err(fmt_error)?;
            for page in &content {
                let line = format!("{}  FCP {}  LCP {}", page.path, format_seconds(page.fcp_seconds), format_seconds(page.lcp_seconds));
                writeln!(out, "  {}", f.format_check(page.fcp_status(&self.thresholds), &line)).map_err(fmt_error)?;
            }
        }

        self.write_load_analysis(&mut out, results)?;
        self.write_recommendations(&mut out, &report.recommendations)?;

        writeln!(out, "\n{}\n", f.format_header("Summary")?).map_err(fmt_error)?;
        let mut passed = 0;
        let mut failed = 0;
        if let Some(index) = index {
            writeln!(out, "{}", self.index_verdict(index)).map_err(fmt_error)?;
            if index.fcp_status(&self.thresholds) == CheckStatus::Pass {
                passed += 1;
            } else {
                failed += 1;
            }
        }
        if !content.is_empty() {
            let within = content.iter().filter(|p| p.fcp_status(&self.thresholds) == CheckStatus::Pass).count();
            let status = if within == content.len() { CheckStatus::Pass } else { CheckStatus::Warn };
            let message = format!(
                "{}/{} content pages FCP within {}",
                within,
                content.len(),
                format_seconds(self.thresholds.content_fcp_limit_secs)
            );
            writeln!(out, "{}", f.format_check(status, &message)).map_err(fmt_error)?;
            if status == CheckStatus::Pass {
                passed += 1;
            } else {
                failed += 1;
            }
        }
        writeln!(out, "\nPassed: {}\nFailed: {}", passed, failed).map_err(fmt_error)?;
        if failed == 0 {
            writeln!(out, "\n{}", f.format_success("All load time checks passed")).map_err(fmt_error)?;
        } else {
            writeln!(out, "\n{}", f.format_warning("Some pages miss the optimal targets; estimates only")).map_err(fmt_error)?;
        }

        Ok(out)
    }

    fn index_verdict(&self, index: &LoadEstimate) -> String {
        let limit = format_seconds(index.fcp_limit(&self.thresholds));
        let status = index.fcp_status(&self.thresholds);
        let message = if status.is_passing() {
            format!("Index FCP {} within {}", format_seconds(index.fcp_seconds), limit)
        } else {
            format!("Index FCP {} exceeds {}", format_seconds(index.fcp_seconds), limit)
        };
        self.formatter.format_check(status, &message)
    }

    fn write_page_breakdown(&self, out: &mut String, page: &LoadEstimate) -> Result<()> {
        writeln!(out, "  HTML: {}", format_size(page.html_size)).map_err(fmt_error)?;
        writeln!(out, "  CSS: {} files, {}", page.css_count, format_size(page.css_size)).map_err(fmt_error)?;
        writeln!(out, "  JavaScript: {} files, {}", page.js_count, format_size(page.js_size)).map_err(fmt_error)?;
        writeln!(out, "  Images: {} files, {}", page.img_count, format_size(page.img_size)).map_err(fmt_error)?;
        writeln!(out, "  FCP: {}", format_seconds(page.fcp_seconds)).map_err(fmt_error)?;
        writeln!(out, "  LCP: {}", format_seconds(page.lcp_seconds)).map_err(fmt_error)?;
        Ok(())
    }

    fn write_load_analysis(&self, out: &mut String, results: &[LoadEstimate]) -> Result<()> {
        let f = self.formatter();
        let (Some(fcp), Some(lcp)) = (
            Summary::from_values(results.iter().map(|r| r.fcp_seconds)),
            Summary::from_values(results.iter().map(|r| r.lcp_seconds)),
        ) else {
            return Ok(());
        };

        writeln!(out, "\n{}\n", f.format_header("Load Time Analysis")?).map_err(fmt_error)?;
        writeln!(out, "{}", f.format_label("FCP (First Contentful Paint):")).map_err(fmt_error)?;
        writeln!(out, "  Average: {}", format_seconds(fcp.mean)).map_err(fmt_error)?;
        writeln!(out, "  Min: {}", format_seconds(fcp.min)).map_err(fmt_error)?;
        writeln!(out, "  Max: {}", format_seconds(fcp.max)).map_err(fmt_error)?;
        writeln!(out, "\n{}", f.format_label("LCP (Largest Contentful Paint):")).map_err(fmt_error)?;
        writeln!(out, "  Average: {}", format_seconds(lcp.mean)).map_err(fmt_error)?;
        writeln!(out, "  Max: {}", format_seconds(lcp.max)).map_err(fmt_error)?;

        let slowest = results
            .iter()
            .max_by(|a, b| a.fcp_seconds.total_cmp(&b.fcp_seconds));
        if let Some(slowest) = slowest {
            writeln!(out, "\n{}", f.format_label("Slowest page:")).map_err(fmt_error)?;
            writeln!(out, "  Path: {}", slowest.path).map_err(fmt_error)?;
            writeln!(out, "  FCP: {}", format_seconds(slowest.fcp_seconds)).map_err(fmt_error)?;
            let reasons = slowest_page_reasons(slowest);
            if !reasons.is_empty() {
                writeln!(out, "  Likely causes:").map_err(fmt_error)?;
                for reason in reasons {
                    writeln!(out, "    - {}", reason).map_err(fmt_error)?;
                }
            }
        }
        Ok(())
    }

    fn write_recommendations(&self, out: &mut String, recommendations: &[Recommendation]) -> Result<()> {
        let f = self.formatter();
        writeln!(out, "\n{}\n", f.format_header("Optimization Recommendations")?).map_err(fmt_error)?;

        if recommendations.is_empty() {
            writeln!(out, "{}", f.format_success("No significant performance issues found")).map_err(fmt_error)?;
            return Ok(());
        }

        for (i, rec) in recommendations.iter().enumerate() {
            writeln!(out, "{}. {} {}", i + 1, f.format_priority(rec.priority), f.format_label(&rec.category)).map_err(fmt_error)?;
            writeln!(out, "   Issue: {}", rec.issue).map_err(fmt_error)?;
            writeln!(out, "   Actions:").map_err(fmt_error)?;
            for action in &rec.actions {
                writeln!(out, "     • {}", action).map_err(fmt_error)?;
            }
            writeln!(out).map_err(fmt_error)?;
        }
        Ok(())
    }

    /// Console summary of the `performance` command
    pub fn display_performance(&self, report: &PerformanceReport, checks: &PerformanceChecks) -> Result<String> {
        let mut out = String::new();
        let f = self.formatter();
        let limit = format_size(self.thresholds.max_page_bytes);

        writeln!(out, "{}\n", f.format_header("Page Size")?).map_err(fmt_error)?;
        writeln!(out, "Pages audited: {}", report.html_files.len()).map_err(fmt_error)?;
        let flagged: Vec<_> = checks.pages.iter().filter(|c| c.status != CheckStatus::Pass).collect();
        for check in flagged.iter().take(self.max_listed) {
            let line = format!("{}: {} compressed", check.path, format_size(check.compressed_size));
            writeln!(out, "  {}", f.format_check(check.status, &line)).map_err(fmt_error)?;
        }
        if flagged.len() > self.max_listed {
            writeln!(out, "  {}", f.format_muted(&format!("... and {} more", flagged.len() - self.max_listed))).map_err(fmt_error)?;
        }
        let oversized = checks.oversized_pages().count();
        if oversized == 0 {
            writeln!(out, "{}", f.format_check(CheckStatus::Pass, &format!("All pages within {} compressed", limit))).map_err(fmt_error)?;
        } else {
            writeln!(out, "{}", f.format_check(CheckStatus::Fail, &format!("{} page(s) exceed {} compressed", oversized, limit))).map_err(fmt_error)?;
        }

        writeln!(out, "\n{}\n", f.format_header("Compression")?).map_err(fmt_error)?;
        let ratio = &checks.ratio;
        match &ratio.summary {
            Some(summary) => {
                writeln!(out, "Average ratio: {:.1}% (min {:.1}%, max {:.1}%)", summary.mean, summary.min, summary.max).map_err(fmt_error)?;
                let message = format!("Average compression ratio {:.1}% (minimum {:.0}%)", summary.mean, self.thresholds.min_compression_ratio);
                writeln!(out, "{}", f.format_check(ratio.status, &message)).map_err(fmt_error)?;
            }
            None => {
                writeln!(out, "{}", f.format_check(CheckStatus::Fail, "No HTML pages found")).map_err(fmt_error)?;
            }
        }
        for (path, page_ratio) in ratio.low_ratio_pages.iter().take(self.max_listed) {
            writeln!(out, "  {}", f.format_warning(&format!("{}: {:.1}%", path, page_ratio))).map_err(fmt_error)?;
        }

        self.write_resources(&mut out, &report.resources)?;

        let summary = &report.summary;
        writeln!(out, "\n{}\n", f.format_header("Site Totals")?).map_err(fmt_error)?;
        writeln!(out, "  Pages: {}", summary.total_pages).map_err(fmt_error)?;
        writeln!(out, "  HTML: {} ({} compressed)", format_size(summary.total_html_size), format_size(summary.total_html_gzip)).map_err(fmt_error)?;
        writeln!(out, "  Site size: {}", format_size(summary.total_site_size)).map_err(fmt_error)?;

        self.write_recommendations(&mut out, &report.recommendations)?;

        writeln!(out, "{}\n", f.format_header("Summary")?).map_err(fmt_error)?;
        let failed = checks.failed_count();
        writeln!(out, "Passed: {}\nFailed: {}", 2 - failed, failed).map_err(fmt_error)?;
        if failed == 0 {
            writeln!(out, "\n{}", f.format_success("All performance checks passed")).map_err(fmt_error)?;
        } else {
            writeln!(out, "\n{}", f.format_error("Some performance checks failed")).map_err(fmt_error)?;
        }

        Ok(out)
    }

    fn write_resources(&self, out: &mut String, resources: &ResourceInventory) -> Result<()> {
        let f = self.formatter();
        writeln!(out, "\n{}\n", f.format_header("Static Resources")?).map_err(fmt_error)?;

        for (label, entries) in [("CSS", &resources.css), ("JavaScript", &resources.js)] {
            write!(out, "{}: {} files, {}", f.format_label(label), entries.len(), format_size(ResourceInventory::total_size(entries))).map_err(fmt_error)?;
            if let Some(ratio) = ResourceInventory::group_ratio(entries) {
                write!(out, " ({} compressed, {:.1}%)", format_size(ResourceInventory::total_gzip_size(entries)), ratio).map_err(fmt_error)?;
            }
            writeln!(out).map_err(fmt_error)?;
        }

        writeln!(out, "{}: {} files, {}", f.format_label("Images"), resources.images.len(), format_size(ResourceInventory::total_size(&resources.images))).map_err(fmt_error)?;
        let large: Vec<&ResourceEntry> = resources.large_images(self.thresholds.large_image_bytes);
        if !large.is_empty() {
            writeln!(out, "  {}", f.format_warning(&format!("{} image(s) over {}", large.len(), format_size(self.thresholds.large_image_bytes)))).map_err(fmt_error)?;
            for image in large.iter().take(LARGE_IMAGES_LISTED) {
                writeln!(out, "    - {} ({})", image.path, format_size(image.size)).map_err(fmt_error)?;
            }
        }

        writeln!(out, "{}: {} files, {}", f.format_label("Fonts"), resources.fonts.len(), format_size(ResourceInventory::total_size(&resources.fonts))).map_err(fmt_error)?;
        Ok(())
    }

    /// Console summary of the `optimize-images` command
    pub fn display_optimization(&self, summary: &OptimizationSummary) -> Result<String> {
        let mut out = String::new();
        let f = self.formatter();

        writeln!(out, "Scanning directory: {}", summary.target_dir.display()).map_err(fmt_error)?;
        if summary.files.is_empty() {
            writeln!(out, "No images found to optimize.").map_err(fmt_error)?;
            return Ok(out);
        }
        writeln!(out, "Found {} images to process.\n", summary.files.len()).map_err(fmt_error)?;

        for file in &summary.files {
            let line = match &file.outcome {
                FileOutcome::Optimized { original, optimized } => {
                    let saved = original - optimized;
                    f.format_check(CheckStatus::Pass, &format!(
                        "{}: {} → {} (saved {}, {:.1}%)",
                        file.path,
                        format_size(*original),
                        format_size(*optimized),
                        format_size(saved),
                        saved as f64 / *original as f64 * 100.0,
                    ))
                }
                FileOutcome::AlreadyOptimized { size } => {
                    f.format_muted(&format!("○ {}: Already optimized ({})", file.path, format_size(*size)))
                }
                FileOutcome::Raster { original, optimized, resized, webp_size, oversized } => {
                    let mut line = if *oversized {
                        f.format_check(CheckStatus::Warn, &format!(
                            "{}: {} → {} (still larger than {})",
                            file.path,
                            format_size(*original),
                            format_size(*optimized),
                            format_size(self.thresholds.large_image_bytes),
                        ))
                    } else if optimized < original {
                        let saved = original - optimized;
                        f.format_check(CheckStatus::Pass, &format!(
                            "{}: {} → {} (saved {}, {:.1}%)",
                            file.path,
                            format_size(*original),
                            format_size(*optimized),
                            format_size(saved),
                            saved as f64 / *original as f64 * 100.0,
                        ))
                    } else {
                        f.format_muted(&format!("○ {}: Already optimized ({})", file.path, format_size(*original)))
                    };
                    if let Some((width, height)) = resized {
                        line.push_str(&format!("\n  Resized to {}x{}", width, height));
                    }
                    let webp = Path::new(&file.path).with_extension("webp");
                    line.push_str(&format!("\n  WebP: {} ({})", webp.display(), format_size(*webp_size)));
                    line
                }
                FileOutcome::Failed { message } => f.format_error(&format!("{}: {}", file.path, message)),
            };
            writeln!(out, "{}", line).map_err(fmt_error)?;
        }

        let stats = &summary.stats;
        writeln!(out, "\n{}", f.format_header("Optimization Summary")?).map_err(fmt_error)?;
        writeln!(out, "Processed: {}", stats.processed).map_err(fmt_error)?;
        writeln!(out, "Skipped:   {}", stats.skipped).map_err(fmt_error)?;
        writeln!(out, "Errors:    {}", stats.errors).map_err(fmt_error)?;
        writeln!(out, "\nOriginal size:  {}", format_size(stats.original_size)).map_err(fmt_error)?;
        writeln!(out, "Optimized size: {}", format_size(stats.optimized_size)).map_err(fmt_error)?;
        if stats.original_size > 0 {
            writeln!(out, "Total savings:  {} ({:.1}%)", format_size(stats.savings()), stats.savings_percent()).map_err(fmt_error)?;
        }
        if summary.dry_run {
            writeln!(out, "\n{}", f.format_warning("DRY RUN: No files were modified")).map_err(fmt_error)?;
        }

        Ok(out)
    }
}

/// Reasons the slowest page is slow
pub fn slowest_page_reasons(page: &LoadEstimate) -> Vec<String> {
    let mut reasons = Vec::new();
    if page.css_size > 100 * 1024 {
        reasons.push(format!("Large CSS ({})", format_size(page.css_size)));
    }
    if page.js_size > 500 * 1024 {
        reasons.push(format!("Large JavaScript ({})", format_size(page.js_size)));
    }
    if page.js_count > 10 {
        reasons.push(format!("Many JavaScript files ({})", page.js_count));
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::PageAudit;
    use crate::models::NetworkModel;
    use crate::optimizer::{FileReport, OptimizationStats};
    use std::path::PathBuf;

    fn coordinator() -> OutputCoordinator {
        OutputCoordinator::new(OutputFormatterFactory::create_plain_formatter(), Thresholds::default())
    }

    fn estimate(path: &str, fcp: f64) -> LoadEstimate {
        LoadEstimate {
            path: path.to_string(),
            is_index: path == "index.html",
            html_size: 10 * 1024,
            css_count: 1,
            css_size: 50 * 1024,
            js_count: 12,
            js_size: 600 * 1024,
            img_count: 0,
            img_size: 0,
            html_load_seconds: 0.058,
            css_load_seconds: 0.09,
            js_load_seconds: 0.0,
            img_load_seconds: 0.0,
            fcp_seconds: fcp,
            lcp_seconds: fcp,
        }
    }

    #[test]
    fn test_load_time_summary() {
        let report = LoadTimeReport::new(
            &NetworkModel::default(),
            vec![estimate("index.html", 0.148), estimate("guide/index.html", 2.2), estimate("about.html", 3.0)],
        );
        let output = coordinator().display_load_time(&report).unwrap();

        assert!(output.contains("Network model: 10.0 Mbps, 50 ms latency, 6 parallel requests, 50% of JS render-blocking"));
        assert!(output.contains("✓ Index FCP 148 ms within 1.50 s"));
        assert!(output.contains("⚠ guide/index.html  FCP 2.20 s"));
        assert!(output.contains("✗ about.html  FCP 3.00 s"));
        assert!(output.contains("Path: about.html"));
        assert!(output.contains("Large JavaScript"));
        assert!(output.contains("Many JavaScript files (12)"));
        assert!(output.contains("0/2 content pages FCP within 2.00 s"));
        assert!(output.contains("[HIGH] JavaScript optimization"));
        assert!(output.contains("Passed: 1\nFailed: 1"));
    }

    #[test]
    fn test_load_time_without_pages() {
        let report = LoadTimeReport::new(&NetworkModel::default(), Vec::new());
        let output = coordinator().display_load_time(&report).unwrap();
        assert!(output.contains("WARNING: No pages to estimate"));
    }

    #[test]
    fn test_performance_summary() {
        let pages = vec![
            PageAudit { path: "index.html".into(), original_size: 40_000, compressed_size: 8_000, compression_ratio: 80.0, css_count: 1, js_count: 1, img_count: 0 },
            PageAudit { path: "big.html".into(), original_size: 900_000, compressed_size: 300 * 1024, compression_ratio: 65.0, css_count: 1, js_count: 1, img_count: 0 },
        ];
        let resources = ResourceInventory {
            images: vec![ResourceEntry { path: "img/board.png".into(), size: 400 * 1024, gzip_size: None }],
            ..Default::default()
        };
        let checks = PerformanceChecks::evaluate(&pages, &Thresholds::default());
        let report = PerformanceReport::new(pages, resources, &Thresholds::default());
        let output = coordinator().display_performance(&report, &checks).unwrap();

        assert!(output.contains("✗ big.html: 300.00 KB compressed"));
        assert!(output.contains("1 page(s) exceed 200.00 KB compressed"));
        assert!(output.contains("Average ratio: 72.5%"));
        assert!(output.contains("WARNING: big.html: 65.0%"));
        assert!(output.contains("img/board.png (400.00 KB)"));
        assert!(output.contains("[HIGH] Images"));
        assert!(output.contains("Passed: 1\nFailed: 1"));
    }

    #[test]
    fn test_optimization_summary() {
        let summary = OptimizationSummary {
            target_dir: PathBuf::from("docs/assets/images"),
            dry_run: true,
            files: vec![
                FileReport { path: "a.svg".into(), outcome: FileOutcome::Optimized { original: 2000, optimized: 1500 } },
                FileReport { path: "b.svg".into(), outcome: FileOutcome::Failed { message: "no <svg> root element".into() } },
                FileReport {
                    path: "c.png".into(),
                    outcome: FileOutcome::Raster {
                        original: 400 * 1024,
                        optimized: 300 * 1024,
                        resized: Some((2000, 1500)),
                        webp_size: 250 * 1024,
                        oversized: true,
                    },
                },
            ],
            stats: OptimizationStats { processed: 1, skipped: 1, errors: 1, original_size: 2000, optimized_size: 1500 },
        };
        let output = coordinator().display_optimization(&summary).unwrap();

        assert!(output.contains("Found 3 images to process."));
        assert!(output.contains("✓ a.svg: 1.95 KB → 1.46 KB (saved 500 B, 25.0%)"));
        assert!(output.contains("ERROR: b.svg: no <svg> root element"));
        assert!(output.contains("⚠ c.png: 400.00 KB → 300.00 KB (still larger than 200.00 KB)"));
        assert!(output.contains("  Resized to 2000x1500"));
        assert!(output.contains("  WebP: c.webp (250.00 KB)"));
        assert!(output.contains("Errors:    1"));
        assert!(output.contains("Total savings:  500 B (25.0%)"));
        assert!(output.contains("DRY RUN"));
    }

    #[test]
    fn test_slowest_page_reasons() {
        let mut page = estimate("p.html", 1.0);
        page.css_size = 10;
        page.js_size = 10;
        page.js_count = 2;
        assert!(slowest_page_reasons(&page).is_empty());
    }
}
