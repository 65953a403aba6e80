//! Summary statistics over metric value sets.

use serde::{Deserialize, Serialize};

/// Distribution summary of one metric over a session.
///
/// Percentiles use linear interpolation between order statistics. Stored
/// baselines were produced with this method; changing it would shift every
/// comparison, so it is part of the persisted contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub median: f64,
    pub p90: f64,
    pub p95: f64,
    pub max: f64,
}

/// Summarize the present values of one metric; `None` when empty.
pub fn summarize(values: &[f64]) -> Option<MetricSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(MetricSummary {
        mean: mean(values)?,
        median: percentile_sorted(&sorted, 0.50),
        p90: percentile_sorted(&sorted, 0.90),
        p95: percentile_sorted(&sorted, 0.95),
        max: sorted[sorted.len() - 1],
    })
}

/// Arithmetic mean; `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Quantile `q` in `[0, 1]` with linear interpolation; `None` when empty.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(percentile_sorted(&sorted, q))
}

fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;
    if lo + 1 >= n {
        return sorted[n - 1];
    }
    sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
}

/// Round to a fixed number of decimal places (report output precision).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_empty_is_none() {
        assert_eq!(summarize(&[]), None);
        assert_eq!(mean(&[]), None);
        assert_eq!(percentile(&[], 0.9), None);
    }

    #[test]
    fn summarize_single_value() {
        let s = summarize(&[42.0]).unwrap();
        assert_eq!(s.mean, 42.0);
        assert_eq!(s.median, 42.0);
        assert_eq!(s.p90, 42.0);
        assert_eq!(s.p95, 42.0);
        assert_eq!(s.max, 42.0);
    }

    #[test]
    fn summarize_basic() {
        let values = [10.0, 20.0, 30.0, 40.0];
        let s = summarize(&values).unwrap();
        assert_eq!(s.mean, 25.0);
        assert_eq!(s.median, 25.0);
        assert_eq!(s.max, 40.0);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        // Ranks 0..=4; p90 lands at rank 3.6 → 40 + 0.6 * 10.
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&values, 0.90), Some(46.0));
        assert_eq!(percentile(&values, 0.50), Some(30.0));
        assert_eq!(percentile(&values, 0.0), Some(10.0));
        assert_eq!(percentile(&values, 1.0), Some(50.0));
    }

    #[test]
    fn percentile_handles_unsorted_input() {
        let values = [50.0, 10.0, 40.0, 20.0, 30.0];
        assert_eq!(percentile(&values, 0.50), Some(30.0));
    }

    #[test]
    fn mean_over_present_values_only_scenario() {
        // CPU [10, 20] with one absent reading dropped upstream.
        assert_eq!(mean(&[10.0, 20.0]), Some(15.0));
        assert_eq!(mean(&[100000.0, 102000.0, 104000.0]), Some(102000.0));
    }

    #[test]
    fn round_to_decimals() {
        assert_eq!(round_to(59.94, 1), 59.9);
        assert_eq!(round_to(5.567, 2), 5.57);
        assert_eq!(round_to(1.25, 1), 1.3); // ties round half away from zero
    }
}
