//! Load-time estimation under a fixed network model
//!
//! For each page:
//!
//! ```text
//! html = bytes / bandwidth + latency
//! class = total_bytes / bandwidth + ceil(count / max_concurrent) * latency
//! fcp = html + css + js_fraction * js
//! lcp = fcp + largest_image / bandwidth   (fcp when the page has no images)
//! ```
//!
//! References that do not resolve to an existing file are left out of
//! the totals.

pub mod references;

pub use references::{AssetReferences, ReferenceExtractor, ReferenceResolver};

use crate::error::{ErrorContext, Result};
use crate::models::{resource::relative_display, ClassLoad, LoadEstimate, NetworkModel};
use std::fs;
use std::path::{Path, PathBuf};

/// Sizes of the assets a page pulls in, grouped by class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSizes {
    pub css: Vec<u64>,
    pub js: Vec<u64>,
    pub images: Vec<u64>,
}

/// Estimates FCP and LCP for pages of one site
#[derive(Debug, Clone)]
pub struct LoadTimeEstimator {
    model: NetworkModel,
    site_root: PathBuf,
    extractor: ReferenceExtractor,
    resolver: ReferenceResolver,
}

impl LoadTimeEstimator {
    /// `site_root` must be absolute (see [`crate::scanner::ResourceScanner::root`])
    pub fn new(model: NetworkModel, site_root: &Path) -> Result<Self> {
        Ok(Self {
            model,
            site_root: site_root.to_path_buf(),
            extractor: ReferenceExtractor::new()?,
            resolver: ReferenceResolver::new(site_root)?,
        })
    }

    pub fn model(&self) -> &NetworkModel {
        &self.model
    }

    /// Read a page and estimate its paint timings
    pub fn estimate_page(&self, page: &Path) -> Result<LoadEstimate> {
        let bytes = fs::read(page)
            .with_context(|| format!("Failed to read {}", page.display()))?;
        let html = String::from_utf8_lossy(&bytes);
        let references = self.extractor.extract(&html);
        let sizes = self.resolve_sizes(page, &references);
        let path = relative_display(page, &self.site_root);

        Ok(self.estimate(path, bytes.len() as u64, &sizes))
    }

    /// Sizes of the referenced files that exist on disk
    pub fn resolve_sizes(&self, page: &Path, references: &AssetReferences) -> AssetSizes {
        let sizes_of = |refs: &[String]| -> Vec<u64> {
            refs.iter()
                .filter_map(|r| self.resolver.resolve(page, r))
                .filter_map(|p| fs::metadata(p).ok())
                .filter(|m| m.is_file())
                .map(|m| m.len())
                .collect()
        };

        AssetSizes {
            css: sizes_of(&references.stylesheets),
            js: sizes_of(&references.scripts),
            images: sizes_of(&references.images),
        }
    }

    /// Apply the model to already resolved sizes
    pub fn estimate(&self, path: String, html_size: u64, sizes: &AssetSizes) -> LoadEstimate {
        let model = &self.model;
        let html_load = model.transfer_seconds(html_size) + model.per_request_latency_seconds;
        let css = ClassLoad::from_sizes(&sizes.css, model);
        let js = ClassLoad::from_sizes(&sizes.js, model);
        let img = ClassLoad::from_sizes(&sizes.images, model);

        let fcp = html_load + css.load_seconds + model.render_blocking_js_fraction * js.load_seconds;
        let lcp = if img.count == 0 {
            fcp
        } else {
            fcp + model.transfer_seconds(img.largest_bytes)
        };

        LoadEstimate {
            is_index: path == "index.html",
            path,
            html_size,
            css_count: css.count,
            css_size: css.total_bytes,
            js_count: js.count,
            js_size: js.total_bytes,
            img_count: img.count,
            img_size: img.total_bytes,
            html_load_seconds: html_load,
            css_load_seconds: css.load_seconds,
            js_load_seconds: js.load_seconds,
            img_load_seconds: img.load_seconds,
            fcp_seconds: fcp,
            lcp_seconds: lcp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn estimator() -> LoadTimeEstimator {
        let root = std::env::temp_dir();
        LoadTimeEstimator::new(NetworkModel::default(), &root).unwrap()
    }

    fn approx(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn test_html_and_single_stylesheet_scenario() {
        let sizes = AssetSizes { css: vec![50 * 1024], js: vec![], images: vec![] };
        let estimate = estimator().estimate("index.html".to_string(), 10 * 1024, &sizes);

        assert!(approx(estimate.html_load_seconds, 0.058, 0.001));
        assert!(approx(estimate.css_load_seconds, 0.09, 0.002));
        assert!(approx(estimate.fcp_seconds, 0.148, 0.003));
        assert_eq!(estimate.lcp_seconds, estimate.fcp_seconds);
        assert!(estimate.is_index);
        assert_eq!(estimate.css_count, 1);
        assert_eq!(estimate.js_load_seconds, 0.0);
    }

    #[test]
    fn test_half_of_javascript_blocks_render() {
        let sizes = AssetSizes { css: vec![], js: vec![131_072], images: vec![] };
        let estimate = estimator().estimate("a/index.html".to_string(), 0, &sizes);
        // 0.1 s download + 0.05 s latency
        assert!(approx(estimate.js_load_seconds, 0.15, 1e-9));
        assert!(approx(estimate.fcp_seconds, 0.05 + 0.075, 1e-9));
        assert!(!estimate.is_index);
    }

    #[test]
    fn test_lcp_adds_largest_image_only() {
        let sizes = AssetSizes { css: vec![], js: vec![], images: vec![131_072, 262_144] };
        let estimate = estimator().estimate("p.html".to_string(), 0, &sizes);
        assert_eq!(estimate.img_count, 2);
        assert_eq!(estimate.img_size, 393_216);
        assert!(approx(estimate.lcp_seconds - estimate.fcp_seconds, 0.2, 1e-9));
    }

    #[test]
    fn test_custom_js_fraction() {
        let model = NetworkModel::default().with_js_blocking_fraction(1.0);
        let estimator = LoadTimeEstimator::new(model, &std::env::temp_dir()).unwrap();
        let sizes = AssetSizes { css: vec![], js: vec![131_072], images: vec![] };
        let estimate = estimator.estimate("p.html".to_string(), 0, &sizes);
        assert!(approx(estimate.fcp_seconds, 0.05 + 0.15, 1e-9));
    }

    #[test]
    fn test_estimate_page_skips_missing_assets() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::create_dir_all(root.join("assets")).unwrap();
        std::fs::create_dir_all(root.join("guide")).unwrap();
        std::fs::write(root.join("assets/main.css"), vec![b'a'; 2048]).unwrap();
        std::fs::write(root.join("assets/app.js"), vec![b'b'; 4096]).unwrap();
        let html = r#"<link href="../assets/main.css"><link href="/assets/missing.css">
            <script src="/assets/app.js"></script><img src="gone.png">"#;
        let page = root.join("guide/index.html");
        std::fs::write(&page, html).unwrap();

        let estimator = LoadTimeEstimator::new(NetworkModel::default(), &root).unwrap();
        let estimate = estimator.estimate_page(&page).unwrap();

        assert_eq!(estimate.path, "guide/index.html");
        assert_eq!(estimate.html_size, html.len() as u64);
        assert_eq!(estimate.css_count, 1);
        assert_eq!(estimate.css_size, 2048);
        assert_eq!(estimate.js_count, 1);
        assert_eq!(estimate.js_size, 4096);
        assert_eq!(estimate.img_count, 0);
        assert_eq!(estimate.lcp_seconds, estimate.fcp_seconds);
    }

    #[test]
    fn test_estimate_missing_page_is_error() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let estimator = LoadTimeEstimator::new(NetworkModel::default(), &root).unwrap();
        assert!(estimator.estimate_page(&root.join("nope.html")).is_err());
    }

    proptest! {
        #[test]
        fn prop_fcp_not_below_html_load(
            html in 0u64..5_000_000,
            css in proptest::collection::vec(0u64..1_000_000, 0..20),
            js in proptest::collection::vec(0u64..1_000_000, 0..20),
            images in proptest::collection::vec(0u64..1_000_000, 0..20),
        ) {
            let sizes = AssetSizes { css, js, images };
            let estimate = estimator().estimate("p.html".to_string(), html, &sizes);
            prop_assert!(estimate.fcp_seconds >= estimate.html_load_seconds);
            prop_assert!(estimate.lcp_seconds >= estimate.fcp_seconds);
        }

        #[test]
        fn prop_lcp_equals_fcp_without_images(
            html in 0u64..5_000_000,
            css in proptest::collection::vec(0u64..1_000_000, 0..20),
            js in proptest::collection::vec(0u64..1_000_000, 0..20),
        ) {
            let sizes = AssetSizes { css, js, images: vec![] };
            let estimate = estimator().estimate("p.html".to_string(), html, &sizes);
            prop_assert_eq!(estimate.lcp_seconds, estimate.fcp_seconds);
        }

        #[test]
        fn prop_batches_is_ceiling(n in 0usize..10_000, c in 1u32..64) {
            let model = NetworkModel::from_mbps(10.0, 50.0, c);
            let expected = (n as u64 + c as u64 - 1) / c as u64;
            prop_assert_eq!(model.batches(n), expected);
            if n == 0 {
                prop_assert_eq!(model.batches(n), 0);
            }
        }
    }
}
