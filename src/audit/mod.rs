//! Page weight and compression audit
//!
//! Every HTML page is compressed with gzip at the highest level to
//! approximate what a server would send. The transfer size is the smaller
//! of the compressed and the raw size, so the ratio never goes negative
//! for tiny pages that gzip inflates.

pub mod checks;
pub mod resources;

pub use checks::{PageSizeCheck, PerformanceChecks, RatioCheck};
pub use resources::{ResourceEntry, ResourceInventory};

use crate::error::{AppError, ErrorContext, Result};
use crate::models::resource::relative_display;
use crate::models::PageResource;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Size and markup counts for one HTML page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAudit {
    pub path: String,
    pub original_size: u64,
    /// Bytes on the wire: `min(gzip, original)`
    pub compressed_size: u64,
    /// Percent saved by compression, in `[0, 100)`
    pub compression_ratio: f64,
    /// `<link` plus `<style` occurrences
    pub css_count: usize,
    pub js_count: usize,
    pub img_count: usize,
}

/// Size of `bytes` after gzip at `level`
pub fn gzip_size(bytes: &[u8], level: u32) -> Result<u64> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::new(level));
    encoder.write_all(bytes)?;
    let compressed = encoder.finish()?;
    Ok(compressed.len() as u64)
}

/// Bytes a server would send for a body of `original` bytes
pub fn transfer_size(original: u64, gzipped: u64) -> u64 {
    gzipped.min(original)
}

/// Percentage saved, `(1 - compressed / original) * 100`; 0 for empty input
pub fn compression_ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}

/// Computes raw and compressed sizes of site files
#[derive(Debug, Clone)]
pub struct CompressionAuditor {
    site_root: PathBuf,
    level: u32,
}

impl CompressionAuditor {
    pub fn new(site_root: &Path) -> Self {
        Self {
            site_root: site_root.to_path_buf(),
            level: crate::defaults::GZIP_LEVEL,
        }
    }

    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    /// Transfer size of a whole file
    pub fn compressed_file_size(&self, path: &Path) -> Result<u64> {
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(transfer_size(bytes.len() as u64, gzip_size(&bytes, self.level)?))
    }

    /// Audit one HTML page
    pub fn audit_page(&self, page: &Path) -> Result<PageAudit> {
        let bytes = fs::read(page).with_context(|| format!("Failed to read {}", page.display()))?;
        let original_size = bytes.len() as u64;
        let compressed_size = transfer_size(original_size, gzip_size(&bytes, self.level)?);
        let content = String::from_utf8_lossy(&bytes);

        Ok(PageAudit {
            path: relative_display(page, &self.site_root),
            original_size,
            compressed_size,
            compression_ratio: compression_ratio(original_size, compressed_size),
            css_count: content.matches("<link").count() + content.matches("<style").count(),
            js_count: content.matches("<script").count(),
            img_count: content.matches("<img").count(),
        })
    }

    /// Audit every page, collecting per-page failures instead of stopping
    pub fn audit_pages(&self, pages: &[PageResource]) -> (Vec<PageAudit>, Vec<(PathBuf, AppError)>) {
        let mut audits = Vec::with_capacity(pages.len());
        let mut failures = Vec::new();

        for page in pages {
            match self.audit_page(&page.path) {
                Ok(audit) => audits.push(audit),
                Err(e) => failures.push((page.path.clone(), e)),
            }
        }

        audits.sort_by(|a, b| a.path.cmp(&b.path));
        (audits, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceKind;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_gzip_is_deterministic() {
        let data = b"<html><body>".repeat(200);
        assert_eq!(gzip_size(&data, 9).unwrap(), gzip_size(&data, 9).unwrap());
        assert!(gzip_size(&data, 9).unwrap() < data.len() as u64);
    }

    #[test]
    fn test_ratio_of_repetitive_markup_is_high() {
        let data = "<div class=\"md-content\"><p>Zephyr</p></div>\n".repeat(500);
        let compressed = transfer_size(data.len() as u64, gzip_size(data.as_bytes(), 9).unwrap());
        let ratio = compression_ratio(data.len() as u64, compressed);
        assert!(ratio > 90.0 && ratio < 100.0);
    }

    #[test]
    fn test_tiny_input_never_goes_negative() {
        let data = b"x";
        let gz = gzip_size(data, 9).unwrap();
        assert!(gz > 1);
        let transfer = transfer_size(1, gz);
        assert_eq!(transfer, 1);
        assert_eq!(compression_ratio(1, transfer), 0.0);
    }

    #[test]
    fn test_empty_input_ratio_is_zero() {
        assert_eq!(compression_ratio(0, 0), 0.0);
    }

    #[test]
    fn test_audit_page_counts_tags() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("guide")).unwrap();
        let page = root.join("guide/index.html");
        std::fs::write(&page, r#"<html><head><link rel="stylesheet" href="a.css"><style>p{}</style>
            <script src="a.js"></script><script>x()</script></head>
            <body><img src="a.png"><img src="b.png"><img src="c.png"></body></html>"#).unwrap();

        let audit = CompressionAuditor::new(root).audit_page(&page).unwrap();
        assert_eq!(audit.path, "guide/index.html");
        assert_eq!(audit.css_count, 2);
        assert_eq!(audit.js_count, 2);
        assert_eq!(audit.img_count, 3);
        assert!(audit.compressed_size <= audit.original_size);
    }

    #[test]
    fn test_audit_pages_collects_failures() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("b.html"), "<p>b</p>".repeat(50)).unwrap();
        std::fs::write(root.join("a.html"), "<p>a</p>".repeat(50)).unwrap();
        let pages = vec![
            PageResource::new(root.join("b.html"), 0, ResourceKind::Html),
            PageResource::new(root.join("missing.html"), 0, ResourceKind::Html),
            PageResource::new(root.join("a.html"), 0, ResourceKind::Html),
        ];

        let (audits, failures) = CompressionAuditor::new(root).audit_pages(&pages);
        assert_eq!(audits.iter().map(|a| a.path.as_str()).collect::<Vec<_>>(), vec!["a.html", "b.html"]);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].0.ends_with("missing.html"));
    }

    proptest! {
        #[test]
        fn prop_ratio_in_range(data in proptest::collection::vec(any::<u8>(), 1..4096)) {
            let original = data.len() as u64;
            let compressed = transfer_size(original, gzip_size(&data, 9).unwrap());
            let ratio = compression_ratio(original, compressed);
            prop_assert!((0.0..100.0).contains(&ratio));
            prop_assert_eq!(ratio == 0.0, compressed == original);
        }
    }
}
