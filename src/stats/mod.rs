//! Descriptive statistics over per-page measurements

use serde::{Deserialize, Serialize};

/// Count, mean and extremes of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize `values`; `None` for an empty sample
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            count,
            mean: sum / count as f64,
            min,
            max,
        })
    }
}

/// Arithmetic mean, 0 for an empty sample
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    Summary::from_values(values).map(|s| s.mean).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert!(Summary::from_values(Vec::<f64>::new()).is_none());
        assert_eq!(mean(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_summary() {
        let summary = Summary::from_values([0.2, 0.5, 0.8]).unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.mean - 0.5).abs() < 1e-12);
        assert_eq!(summary.min, 0.2);
        assert_eq!(summary.max, 0.8);
    }

    #[test]
    fn test_mean_of_two_ratios_is_exact() {
        assert_eq!(mean([60.0, 80.0]), 70.0);
    }
}
