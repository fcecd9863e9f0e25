//! Threshold checks over page audits

use super::PageAudit;
use crate::models::Thresholds;
use crate::stats::Summary;
use crate::types::CheckStatus;
use serde::{Deserialize, Serialize};

/// Compressed-size verdict for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSizeCheck {
    pub path: String,
    pub compressed_size: u64,
    pub status: CheckStatus,
}

impl PageSizeCheck {
    /// `compressed_size <= max_page_bytes` passes; above the warn fraction it warns
    pub fn evaluate(audit: &PageAudit, thresholds: &Thresholds) -> Self {
        let limit = thresholds.max_page_bytes as f64;
        Self {
            path: audit.path.clone(),
            compressed_size: audit.compressed_size,
            status: CheckStatus::upper_bound(
                audit.compressed_size as f64,
                limit,
                limit * thresholds.page_size_warn_fraction,
            ),
        }
    }
}

/// Site-wide compression ratio verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioCheck {
    pub summary: Option<Summary>,
    pub status: CheckStatus,
    /// Pages below the minimum ratio, in audit order
    pub low_ratio_pages: Vec<(String, f64)>,
}

impl RatioCheck {
    /// Average ratio `>= min_compression_ratio` passes; no pages fails
    pub fn evaluate(audits: &[PageAudit], thresholds: &Thresholds) -> Self {
        let summary = Summary::from_values(audits.iter().map(|a| a.compression_ratio));
        let status = match summary {
            Some(s) => CheckStatus::lower_bound(s.mean, thresholds.min_compression_ratio),
            None => CheckStatus::Fail,
        };
        let low_ratio_pages = audits
            .iter()
            .filter(|a| a.compression_ratio < thresholds.min_compression_ratio)
            .map(|a| (a.path.clone(), a.compression_ratio))
            .collect();

        Self { summary, status, low_ratio_pages }
    }
}

/// All threshold checks of the `performance` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceChecks {
    pub pages: Vec<PageSizeCheck>,
    pub ratio: RatioCheck,
}

impl PerformanceChecks {
    pub fn evaluate(audits: &[PageAudit], thresholds: &Thresholds) -> Self {
        Self {
            pages: audits.iter().map(|a| PageSizeCheck::evaluate(a, thresholds)).collect(),
            ratio: RatioCheck::evaluate(audits, thresholds),
        }
    }

    /// Pages over the size limit
    pub fn oversized_pages(&self) -> impl Iterator<Item = &PageSizeCheck> {
        self.pages.iter().filter(|c| c.status == CheckStatus::Fail)
    }

    /// Number of failed site-level checks: page size (any page over) and ratio
    pub fn failed_count(&self) -> usize {
        let size_failed = self.oversized_pages().next().is_some();
        usize::from(size_failed) + usize::from(!self.ratio.status.is_passing())
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }
}
