//! Load-time estimate data models

use super::config::NetworkModel;
use crate::types::CheckStatus;
use serde::{Deserialize, Serialize};

/// Totals for one asset class referenced by a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassLoad {
    pub count: usize,
    pub total_bytes: u64,
    pub largest_bytes: u64,
    pub batches: u64,
    pub load_seconds: f64,
}

impl ClassLoad {
    /// Price the given file sizes under `model`
    ///
    /// An empty class costs nothing: zero batches, zero seconds.
    pub fn from_sizes(sizes: &[u64], model: &NetworkModel) -> Self {
        let count = sizes.len();
        let total_bytes: u64 = sizes.iter().sum();
        let largest_bytes = sizes.iter().copied().max().unwrap_or(0);
        let batches = model.batches(count);
        let download = model.transfer_seconds(total_bytes);
        let latency = batches as f64 * model.per_request_latency_seconds;

        Self {
            count,
            total_bytes,
            largest_bytes,
            batches,
            load_seconds: download + latency,
        }
    }
}

/// Estimated paint timings for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadEstimate {
    /// Page path relative to the site root
    pub path: String,
    /// Whether this is the site's landing page
    pub is_index: bool,
    pub html_size: u64,
    pub css_count: usize,
    pub css_size: u64,
    pub js_count: usize,
    pub js_size: u64,
    pub img_count: usize,
    pub img_size: u64,
    pub html_load_seconds: f64,
    pub css_load_seconds: f64,
    pub js_load_seconds: f64,
    pub img_load_seconds: f64,
    pub fcp_seconds: f64,
    pub lcp_seconds: f64,
}

impl LoadEstimate {
    /// FCP limit that applies to this page
    pub fn fcp_limit(&self, thresholds: &super::Thresholds) -> f64 {
        if self.is_index {
            thresholds.index_fcp_limit_secs
        } else {
            thresholds.content_fcp_limit_secs
        }
    }

    /// FCP verdict: the index page passes or fails, content pages get a
    /// warning band up to `fcp_warn_factor` times the limit
    pub fn fcp_status(&self, thresholds: &super::Thresholds) -> CheckStatus {
        let limit = self.fcp_limit(thresholds);
        if self.is_index {
            CheckStatus::upper_bound(self.fcp_seconds, limit, limit)
        } else {
            CheckStatus::upper_bound(self.fcp_seconds, limit * thresholds.fcp_warn_factor, limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_class_costs_nothing() {
        let load = ClassLoad::from_sizes(&[], &NetworkModel::default());
        assert_eq!(load.count, 0);
        assert_eq!(load.batches, 0);
        assert_eq!(load.load_seconds, 0.0);
        assert_eq!(load.largest_bytes, 0);
    }

    #[test]
    fn test_class_load_batches_latency() {
        let model = NetworkModel::default();
        let sizes = vec![1024; 7];
        let load = ClassLoad::from_sizes(&sizes, &model);
        assert_eq!(load.count, 7);
        assert_eq!(load.total_bytes, 7 * 1024);
        assert_eq!(load.batches, 2);
        let expected = 7.0 * 1024.0 / 1_310_720.0 + 2.0 * 0.05;
        assert!((load.load_seconds - expected).abs() < 1e-12);
    }

    fn estimate(is_index: bool, fcp_seconds: f64) -> LoadEstimate {
        LoadEstimate {
            path: if is_index { "index.html".into() } else { "guide/index.html".into() },
            is_index,
            html_size: 0,
            css_count: 0,
            css_size: 0,
            js_count: 0,
            js_size: 0,
            img_count: 0,
            img_size: 0,
            html_load_seconds: 0.0,
            css_load_seconds: 0.0,
            js_load_seconds: 0.0,
            img_load_seconds: 0.0,
            fcp_seconds,
            lcp_seconds: fcp_seconds,
        }
    }

    #[test]
    fn test_fcp_status() {
        let thresholds = super::super::Thresholds::default();
        assert_eq!(estimate(true, 1.5).fcp_status(&thresholds), CheckStatus::Pass);
        assert_eq!(estimate(true, 1.6).fcp_status(&thresholds), CheckStatus::Fail);
        assert_eq!(estimate(false, 2.0).fcp_status(&thresholds), CheckStatus::Pass);
        assert_eq!(estimate(false, 2.3).fcp_status(&thresholds), CheckStatus::Warn);
        assert_eq!(estimate(false, 2.5).fcp_status(&thresholds), CheckStatus::Fail);
    }

    #[test]
    fn test_largest_bytes() {
        let load = ClassLoad::from_sizes(&[10, 300, 20], &NetworkModel::default());
        assert_eq!(load.largest_bytes, 300);
    }
}
