//! JSON reports written after each audit
//!
//! Reports are pretty-printed and overwrite any previous file at the same
//! path.

pub mod recommendations;

pub use recommendations::{load_time_recommendations, performance_recommendations, Recommendation};

use crate::audit::{PageAudit, ResourceInventory};
use crate::error::{AppError, Result};
use crate::models::{LoadEstimate, NetworkModel, Thresholds};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Timestamp format used in every report
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time in report format
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Network assumptions recorded alongside the estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConditions {
    pub bandwidth_mbps: f64,
    pub latency_ms: f64,
    pub max_concurrent: u32,
    pub render_blocking_js_fraction: f64,
}

impl From<&NetworkModel> for TestConditions {
    fn from(model: &NetworkModel) -> Self {
        Self {
            bandwidth_mbps: model.bandwidth_mbps(),
            latency_ms: model.latency_ms(),
            max_concurrent: model.max_concurrent_connections,
            render_blocking_js_fraction: model.render_blocking_js_fraction,
        }
    }
}

/// Output of the `load-time` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTimeReport {
    pub timestamp: String,
    pub test_conditions: TestConditions,
    pub results: Vec<LoadEstimate>,
    pub recommendations: Vec<Recommendation>,
}

impl LoadTimeReport {
    pub fn new(model: &NetworkModel, results: Vec<LoadEstimate>) -> Self {
        let recommendations = load_time_recommendations(&results);
        Self {
            timestamp: timestamp_now(),
            test_conditions: TestConditions::from(model),
            results,
            recommendations,
        }
    }
}

/// Byte totals across the whole site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSummary {
    pub total_pages: usize,
    pub total_html_size: u64,
    pub total_html_gzip: u64,
    pub total_css_size: u64,
    pub total_js_size: u64,
    pub total_img_size: u64,
    pub total_font_size: u64,
    pub total_site_size: u64,
}

impl SiteSummary {
    pub fn from_parts(pages: &[PageAudit], resources: &ResourceInventory) -> Self {
        let total_html_size: u64 = pages.iter().map(|p| p.original_size).sum();
        let total_css_size = ResourceInventory::total_size(&resources.css);
        let total_js_size = ResourceInventory::total_size(&resources.js);
        let total_img_size = ResourceInventory::total_size(&resources.images);
        let total_font_size = ResourceInventory::total_size(&resources.fonts);

        Self {
            total_pages: pages.len(),
            total_html_size,
            total_html_gzip: pages.iter().map(|p| p.compressed_size).sum(),
            total_css_size,
            total_js_size,
            total_img_size,
            total_font_size,
            total_site_size: total_html_size + total_css_size + total_js_size + total_img_size + total_font_size,
        }
    }
}

/// Output of the `performance` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub timestamp: String,
    pub summary: SiteSummary,
    pub html_files: Vec<PageAudit>,
    pub resources: ResourceInventory,
    pub recommendations: Vec<Recommendation>,
}

impl PerformanceReport {
    pub fn new(html_files: Vec<PageAudit>, resources: ResourceInventory, thresholds: &Thresholds) -> Self {
        let summary = SiteSummary::from_parts(&html_files, &resources);
        let recommendations = performance_recommendations(&html_files, &resources, thresholds);
        Self {
            timestamp: timestamp_now(),
            summary,
            html_files,
            resources,
            recommendations,
        }
    }
}

/// Serialize `report` as pretty JSON to `path`, replacing any existing file
pub fn write_json<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json + "\n")
        .map_err(|e| AppError::report(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::ResourceEntry;
    use tempfile::TempDir;

    fn page(path: &str, original: u64, compressed: u64) -> PageAudit {
        PageAudit {
            path: path.to_string(),
            original_size: original,
            compressed_size: compressed,
            compression_ratio: crate::audit::compression_ratio(original, compressed),
            css_count: 1,
            js_count: 1,
            img_count: 0,
        }
    }

    fn entry(path: &str, size: u64) -> ResourceEntry {
        ResourceEntry { path: path.to_string(), size, gzip_size: None }
    }

    #[test]
    fn test_test_conditions_from_default_model() {
        let conditions = TestConditions::from(&NetworkModel::default());
        assert!((conditions.bandwidth_mbps - 10.0).abs() < 1e-9);
        assert!((conditions.latency_ms - 50.0).abs() < 1e-9);
        assert_eq!(conditions.max_concurrent, 6);
        assert_eq!(conditions.render_blocking_js_fraction, 0.5);
    }

    #[test]
    fn test_site_summary_totals() {
        let pages = vec![page("a.html", 1000, 300), page("b.html", 2000, 500)];
        let resources = ResourceInventory {
            css: vec![entry("a.css", 100)],
            js: vec![entry("a.js", 200), entry("b.js", 300)],
            images: vec![entry("a.png", 4000)],
            fonts: vec![entry("a.woff2", 50)],
        };
        let summary = SiteSummary::from_parts(&pages, &resources);
        assert_eq!(summary.total_pages, 2);
        assert_eq!(summary.total_html_size, 3000);
        assert_eq!(summary.total_html_gzip, 800);
        assert_eq!(summary.total_js_size, 500);
        assert_eq!(summary.total_site_size, 3000 + 100 + 500 + 4000 + 50);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_write_json_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("load-time-report.json");
        std::fs::write(&path, "stale").unwrap();

        let report = LoadTimeReport::new(&NetworkModel::default(), Vec::new());
        write_json(&report, &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["test_conditions"]["max_concurrent"], 6);
        assert!(value["results"].as_array().unwrap().is_empty());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_write_json_into_missing_directory_is_report_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing/report.json");
        let err = write_json(&serde_json::json!({}), &path).unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert_eq!(err.category(), "REPORT");
    }

    #[test]
    fn test_performance_report_shape() {
        let report = PerformanceReport::new(vec![page("index.html", 1000, 250)], ResourceInventory::default(), &Thresholds::default());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["summary"]["total_pages"], 1);
        assert_eq!(value["html_files"][0]["path"], "index.html");
        assert!(value["resources"]["css"].is_array());
        assert!(value["recommendations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_performance_report_uses_given_thresholds() {
        let thresholds = Thresholds { max_page_bytes: 100, ..Thresholds::default() };
        let report = PerformanceReport::new(vec![page("index.html", 1000, 250)], ResourceInventory::default(), &thresholds);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].category, "Page size");
    }
}
