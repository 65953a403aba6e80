//! Regression comparison of a session against a stored baseline.

use serde::Serialize;

use crate::baseline::Baseline;
use crate::sample::Sample;
use crate::series::Series;
use crate::stats::{self, MetricSummary};

/// Drift classification for one statistic. Higher is worse for every
/// compared metric (CPU load, memory footprint), so positive drift reads
/// as regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftCategory {
    Stable,
    Regression,
    MinorRegression,
    Improvement,
    MinorImprovement,
}

impl std::fmt::Display for DriftCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stable => write!(f, "stable"),
            Self::Regression => write!(f, "regression"),
            Self::MinorRegression => write!(f, "minor_regression"),
            Self::Improvement => write!(f, "improvement"),
            Self::MinorImprovement => write!(f, "minor_improvement"),
        }
    }
}

/// Classify a percentage drift.
///
/// The decision chain is ordered exactly as recorded sessions were judged
/// historically; re-ordering it would re-grade old comparisons, so the
/// chain (including its behavior at the ±5 boundaries) is contract.
pub fn classify(percent_diff: f64) -> DriftCategory {
    if percent_diff.abs() < 5.0 {
        DriftCategory::Stable
    } else if percent_diff > 15.0 {
        DriftCategory::Regression
    } else if percent_diff > 5.0 {
        DriftCategory::MinorRegression
    } else if percent_diff < -10.0 {
        DriftCategory::Improvement
    } else {
        DriftCategory::MinorImprovement
    }
}

/// Percentage drift of `current` against `baseline`; defined as 0 when the
/// baseline is non-positive to avoid division blow-up.
pub fn percent_diff(baseline: f64, current: f64) -> f64 {
    if baseline > 0.0 {
        (current - baseline) / baseline * 100.0
    } else {
        0.0
    }
}

/// Drift of one statistic of one metric.
#[derive(Debug, Clone, Serialize)]
pub struct StatDrift {
    pub statistic: &'static str,
    pub baseline_value: f64,
    pub current_value: f64,
    pub absolute_diff: f64,
    pub percent_diff: f64,
    pub category: DriftCategory,
}

/// Per-statistic drift table for one metric category.
#[derive(Debug, Clone, Serialize)]
pub struct MetricComparison {
    pub rows: Vec<StatDrift>,
}

/// Full comparison of a session against a baseline.
///
/// `issues` and `improvements` carry the session-level verdicts; both
/// empty means the session is stable against the baseline.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub baseline_name: String,
    pub baseline_created_at: String,
    pub current_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<MetricComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MetricComparison>,
    pub issues: Vec<String>,
    pub improvements: Vec<String>,
}

/// Compare a session against a baseline.
///
/// Only categories present on both sides are compared — a metric missing
/// from either the baseline or the current series is skipped, never
/// treated as zero. The session-level verdict thresholds (mean > 15% or
/// p90 > 20% regression, mean < −10% improvement) are deliberately coarser
/// than the per-statistic classification.
pub fn compare(baseline: &Baseline, series: &Series) -> ComparisonReport {
    let mut report = ComparisonReport {
        baseline_name: baseline.name.clone(),
        baseline_created_at: baseline.created_at.clone(),
        current_file: series.file_name(),
        cpu: None,
        memory: None,
        issues: Vec::new(),
        improvements: Vec::new(),
    };

    if let Some(base) = &baseline.metrics.cpu
        && let Some(current) = stats::summarize(&series.values(|s| s.app_cpu_percent))
    {
        report.cpu = Some(drift_table(base, &current));
        session_verdict(
            base,
            &current,
            "CPU load",
            &mut report.issues,
            &mut report.improvements,
        );
    }

    if let Some(base) = &baseline.metrics.memory
        && let Some(current) = stats::summarize(&series.values(app_mem_f64))
    {
        report.memory = Some(drift_table(base, &current));
        session_verdict(
            base,
            &current,
            "memory footprint",
            &mut report.issues,
            &mut report.improvements,
        );
    }

    report
}

/// Per-statistic drift rows: mean, p90, p95, max.
fn drift_table(base: &MetricSummary, current: &MetricSummary) -> MetricComparison {
    let pairs: [(&'static str, f64, f64); 4] = [
        ("mean", base.mean, current.mean),
        ("p90", base.p90, current.p90),
        ("p95", base.p95, current.p95),
        ("max", base.max, current.max),
    ];

    let rows = pairs
        .into_iter()
        .map(|(statistic, baseline_value, current_value)| {
            let pd = percent_diff(baseline_value, current_value);
            StatDrift {
                statistic,
                baseline_value,
                current_value,
                absolute_diff: current_value - baseline_value,
                percent_diff: pd,
                category: classify(pd),
            }
        })
        .collect();

    MetricComparison { rows }
}

fn session_verdict(
    base: &MetricSummary,
    current: &MetricSummary,
    label: &str,
    issues: &mut Vec<String>,
    improvements: &mut Vec<String>,
) {
    let mean_diff = percent_diff(base.mean, current.mean);
    let p90_diff = percent_diff(base.p90, current.p90);

    if mean_diff > 15.0 || p90_diff > 20.0 {
        issues.push(format!(
            "{label} regression (mean {mean_diff:+.1}%, p90 {p90_diff:+.1}%)"
        ));
    } else if mean_diff < -10.0 {
        improvements.push(format!("{label} improved ({mean_diff:+.1}%)"));
    }
}

fn app_mem_f64(sample: &Sample) -> Option<f64> {
    sample.app_mem_kb.map(|v| v as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineMetrics;

    fn summary(mean: f64, p90: f64) -> MetricSummary {
        MetricSummary {
            mean,
            median: mean,
            p90,
            p95: p90,
            max: p90,
        }
    }

    fn baseline_with(cpu: Option<MetricSummary>, memory: Option<MetricSummary>) -> Baseline {
        Baseline {
            name: "v1".to_string(),
            description: String::new(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            source_file: "metrics_20250101_000000.csv".to_string(),
            data_points: 10,
            duration_minutes: 5.0,
            metrics: BaselineMetrics {
                cpu,
                memory,
                battery: None,
                temperature: None,
            },
        }
    }

    fn cpu_series(values: &[f64]) -> Series {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut s = Sample::new(i as u64);
                s.app_cpu_percent = Some(v);
                s
            })
            .collect();
        Series::from_samples("metrics_20250201_000000.csv", samples)
    }

    // -----------------------------------------------------------------------
    // classify
    // -----------------------------------------------------------------------

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(0.0), DriftCategory::Stable);
        assert_eq!(classify(4.9), DriftCategory::Stable);
        assert_eq!(classify(-4.9), DriftCategory::Stable);
        assert_eq!(classify(17.5), DriftCategory::Regression);
        assert_eq!(classify(10.0), DriftCategory::MinorRegression);
        assert_eq!(classify(15.0), DriftCategory::MinorRegression);
        assert_eq!(classify(-15.0), DriftCategory::Improvement);
        assert_eq!(classify(-7.0), DriftCategory::MinorImprovement);
        assert_eq!(classify(-10.0), DriftCategory::MinorImprovement);
    }

    #[test]
    fn classify_boundary_chain_order() {
        // The historical decision chain sends exactly +5 to the trailing
        // branch; this is deliberate compatibility behavior.
        assert_eq!(classify(5.0), DriftCategory::MinorImprovement);
        assert_eq!(classify(-5.0), DriftCategory::MinorImprovement);
    }

    #[test]
    fn percent_diff_guards_non_positive_baseline() {
        assert_eq!(percent_diff(0.0, 50.0), 0.0);
        assert_eq!(percent_diff(-3.0, 50.0), 0.0);
        assert_eq!(percent_diff(20.0, 23.5), 17.5);
        assert_eq!(percent_diff(20.0, 19.0), -5.0);
    }

    // -----------------------------------------------------------------------
    // compare
    // -----------------------------------------------------------------------

    #[test]
    fn regression_at_17_5_percent() {
        let baseline = baseline_with(Some(summary(20.0, 20.0)), None);
        let series = cpu_series(&[23.5, 23.5]);
        let report = compare(&baseline, &series);

        let cpu = report.cpu.unwrap();
        let mean_row = cpu.rows.iter().find(|r| r.statistic == "mean").unwrap();
        assert_eq!(mean_row.percent_diff, 17.5);
        assert_eq!(mean_row.category, DriftCategory::Regression);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].contains("CPU"));
    }

    #[test]
    fn stable_at_zero_drift() {
        // Baseline mean 15.0 vs current [14, 16] → mean 15.0, 0% drift.
        let baseline = baseline_with(Some(summary(15.0, 16.0)), None);
        let series = cpu_series(&[14.0, 16.0]);
        let report = compare(&baseline, &series);

        let cpu = report.cpu.unwrap();
        let mean_row = cpu.rows.iter().find(|r| r.statistic == "mean").unwrap();
        assert_eq!(mean_row.current_value, 15.0);
        assert_eq!(mean_row.category, DriftCategory::Stable);
        assert!(report.issues.is_empty());
        assert!(report.improvements.is_empty());
    }

    #[test]
    fn minus_five_percent_is_boundary_improvement() {
        let baseline = baseline_with(Some(summary(20.0, 20.0)), None);
        let series = cpu_series(&[19.0, 19.0]);
        let report = compare(&baseline, &series);

        let mean_row = report.cpu.unwrap().rows[0].clone();
        assert_eq!(mean_row.percent_diff, -5.0);
        assert_eq!(mean_row.category, DriftCategory::MinorImprovement);
    }

    #[test]
    fn categories_missing_either_side_are_skipped() {
        // Baseline has memory only; series has CPU only.
        let baseline = baseline_with(None, Some(summary(100000.0, 110000.0)));
        let series = cpu_series(&[10.0]);
        let report = compare(&baseline, &series);
        assert!(report.cpu.is_none());
        assert!(report.memory.is_none());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn p90_spike_alone_triggers_session_regression() {
        // Mean drifts under the 15% gate; p90 blows past its 20% gate.
        let baseline = baseline_with(Some(summary(20.0, 10.0)), None);
        let samples: Vec<f64> = vec![19.0; 9].into_iter().chain([20.0]).collect();
        let series = cpu_series(&samples);
        let report = compare(&baseline, &series);

        let current_p90 = stats::percentile(&samples, 0.90).unwrap();
        assert!(percent_diff(10.0, current_p90) > 20.0);
        assert_eq!(report.issues.len(), 1);
        assert!(report.improvements.is_empty());
    }

    #[test]
    fn session_improvement_verdict() {
        let baseline = baseline_with(Some(summary(20.0, 20.0)), None);
        let series = cpu_series(&[15.0, 15.0]);
        let report = compare(&baseline, &series);
        assert!(report.issues.is_empty());
        assert_eq!(report.improvements.len(), 1);
        assert!(report.improvements[0].contains("-25.0%"));
    }

    #[test]
    fn full_flow_through_store_and_log_files() {
        use crate::baseline::BaselineStore;
        use crate::collector::SessionLog;

        let tmp = tempfile::tempdir().unwrap();

        // Session one: CPU [10, 20, absent], memory [100000, 102000, 104000].
        let mut log = SessionLog::create(tmp.path()).unwrap();
        for (cpu, mem) in [(Some(10.0), 100000), (Some(20.0), 102000), (None, 104000)] {
            let mut s = Sample::new(0);
            s.app_cpu_percent = cpu;
            s.app_mem_kb = Some(mem);
            log.append(&s).unwrap();
        }
        let first = Series::load(log.finish().unwrap()).unwrap();

        let store = BaselineStore::new(tmp.path().join("baselines"));
        let baseline = store.create("b1", "", &first).unwrap();
        assert_eq!(baseline.metrics.cpu.unwrap().mean, 15.0);
        assert_eq!(baseline.metrics.memory.unwrap().mean, 102000.0);

        // Session two: CPU [14, 16] → mean 15.0, zero drift.
        let second = cpu_series(&[14.0, 16.0]);
        let report = compare(&store.show("b1").unwrap(), &second);

        let cpu = report.cpu.unwrap();
        let mean_row = cpu.rows.iter().find(|r| r.statistic == "mean").unwrap();
        assert_eq!(mean_row.percent_diff, 0.0);
        assert_eq!(mean_row.category, DriftCategory::Stable);
        // Memory exists only on the baseline side; skipped.
        assert!(report.memory.is_none());
    }

    #[test]
    fn baseline_zero_mean_reads_stable() {
        let baseline = baseline_with(Some(summary(0.0, 0.0)), None);
        let series = cpu_series(&[50.0, 50.0]);
        let report = compare(&baseline, &series);
        for row in &report.cpu.unwrap().rows {
            assert_eq!(row.percent_diff, 0.0);
            assert_eq!(row.category, DriftCategory::Stable);
        }
        assert!(report.issues.is_empty());
    }
}
