//! Prioritized optimization suggestions derived from audit numbers

use crate::audit::{PageAudit, ResourceInventory};
use crate::models::{LoadEstimate, Thresholds};
use crate::stats::mean;
use crate::types::{format_size, Priority};
use serde::{Deserialize, Serialize};

const AVG_CSS_BYTES_LIMIT: f64 = 150.0 * 1024.0;
const AVG_JS_BYTES_LIMIT: f64 = 500.0 * 1024.0;
const AVG_JS_COUNT_LIMIT: f64 = 15.0;
const MAX_CSS_FILES: usize = 5;
const MAX_JS_FILES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub issue: String,
    pub actions: Vec<String>,
}

impl Recommendation {
    fn new(priority: Priority, category: &str, issue: String, actions: &[&str]) -> Self {
        Self {
            priority,
            category: category.to_string(),
            issue,
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Suggestions for the `load-time` command; a general LOW item is always last
pub fn load_time_recommendations(results: &[LoadEstimate]) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if !results.is_empty() {
        let avg_css_size = mean(results.iter().map(|r| r.css_size as f64));
        let avg_js_size = mean(results.iter().map(|r| r.js_size as f64));
        let avg_js_count = mean(results.iter().map(|r| r.js_count as f64));

        if avg_css_size > AVG_CSS_BYTES_LIMIT {
            recommendations.push(Recommendation::new(
                Priority::Medium,
                "CSS optimization",
                format!("Average CSS size is large ({})", format_size(avg_css_size as u64)),
                &[
                    "Minify stylesheets",
                    "Remove unused CSS rules",
                    "Inline critical CSS",
                ],
            ));
        }

        if avg_js_size > AVG_JS_BYTES_LIMIT {
            recommendations.push(Recommendation::new(
                Priority::High,
                "JavaScript optimization",
                format!("Average JavaScript size is large ({})", format_size(avg_js_size as u64)),
                &[
                    "Split code into smaller bundles",
                    "Defer non-critical scripts",
                    "Remove unused code with tree shaking",
                    "Consider lighter libraries",
                ],
            ));
        }

        if avg_js_count > AVG_JS_COUNT_LIMIT {
            recommendations.push(Recommendation::new(
                Priority::Medium,
                "HTTP requests",
                format!("Many JavaScript files per page (average {:.0})", avg_js_count),
                &[
                    "Bundle JavaScript files",
                    "Serve assets over HTTP/2",
                    "Enable browser caching",
                ],
            ));
        }
    }

    recommendations.push(Recommendation::new(
        Priority::Low,
        "General",
        "Further performance improvements".to_string(),
        &[
            "Enable gzip or Brotli compression on the server",
            "Serve static assets from a CDN",
            "Preload critical resources",
            "Optimize font loading",
            "Cache assets with a service worker",
        ],
    ));

    recommendations
}

/// Suggestions for the `performance` command; empty when nothing stands out
pub fn performance_recommendations(
    pages: &[PageAudit],
    resources: &ResourceInventory,
    thresholds: &Thresholds,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let large_pages = pages.iter().filter(|p| p.compressed_size > thresholds.max_page_bytes).count();
    if large_pages > 0 {
        recommendations.push(Recommendation::new(
            Priority::High,
            "Page size",
            format!("{} page(s) exceed {} compressed", large_pages, format_size(thresholds.max_page_bytes)),
            &["Split long pages", "Lazy-load images", "Reduce inline resources"],
        ));
    }

    let low_ratio = pages.iter().filter(|p| p.compression_ratio < thresholds.min_compression_ratio).count();
    if low_ratio > 0 {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            "Compression",
            format!("{} page(s) compress below {:.0}%", low_ratio, thresholds.min_compression_ratio),
            &["Look for incompressible content such as inline base64 images"],
        ));
    }

    let large_images = resources.large_images(thresholds.large_image_bytes).len();
    if large_images > 0 {
        recommendations.push(Recommendation::new(
            Priority::High,
            "Images",
            format!("{} image(s) exceed {}", large_images, format_size(thresholds.large_image_bytes)),
            &["Compress images", "Convert to WebP", "Serve responsive images"],
        ));
    }

    if resources.css.len() > MAX_CSS_FILES {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            "CSS optimization",
            format!("Many CSS files ({})", resources.css.len()),
            &["Merge stylesheets", "Minify CSS"],
        ));
    }

    if resources.js.len() > MAX_JS_FILES {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            "JavaScript optimization",
            format!("Many JavaScript files ({})", resources.js.len()),
            &["Merge scripts", "Use code splitting", "Defer non-critical scripts"],
        ));
    }

    recommendations
}
