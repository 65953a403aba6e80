//! Session analysis reports: summaries, grades, leak detection.
//!
//! A report is a derived artifact written next to the session logs under a
//! timestamped name — independent of the baseline store, which keeps the
//! long-lived comparison references.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::clock;
use crate::error::Result;
use crate::series::Series;
use crate::stats::{self, MetricSummary, round_to};

/// Memory readings needed before a growth rate is estimated.
const MIN_GROWTH_READINGS: usize = 10;

/// Growth above this (MB/h) flags a severe leak risk.
const SEVERE_LEAK_MB_PER_HOUR: f64 = 30.0;

/// Growth above this (MB/h) flags a mild leak risk.
const MILD_LEAK_MB_PER_HOUR: f64 = 15.0;

/// Coarse quality grade for one metric dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

/// CPU section of a report.
#[derive(Debug, Clone, Serialize)]
pub struct CpuReport {
    #[serde(flatten)]
    pub summary: MetricSummary,
    pub grade: Grade,
}

/// Memory section of a report (figures in MB).
#[derive(Debug, Clone, Serialize)]
pub struct MemoryReport {
    pub mean_mb: f64,
    pub median_mb: f64,
    pub p90_mb: f64,
    pub max_mb: f64,
    pub min_mb: f64,
    /// Drift of the steady-state footprint across the session; needs at
    /// least [`MIN_GROWTH_READINGS`] readings and a positive span.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_mb_per_hour: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leak_warning: Option<String>,
    pub grade: Grade,
}

/// Rendering fluency section of a report.
#[derive(Debug, Clone, Serialize)]
pub struct FluencyReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps_mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps_min: Option<f64>,
    /// The worst 10% of observed frame rates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps_p10: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jank_rate_mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jank_rate_max: Option<f64>,
    pub grade: Grade,
}

/// Full analysis of one session. Sections with no data are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source_file: String,
    pub generated_at: String,
    pub duration_minutes: f64,
    pub data_points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fluency: Option<FluencyReport>,
}

/// Analyze one session.
pub fn analyze(series: &Series) -> AnalysisReport {
    AnalysisReport {
        source_file: series.file_name(),
        generated_at: clock::format_iso8601(clock::unix_now_secs()),
        duration_minutes: round_to(series.duration_secs() as f64 / 60.0, 1),
        data_points: series.len(),
        cpu: cpu_report(series),
        memory: memory_report(series),
        fluency: fluency_report(series),
    }
}

/// Write a report under a timestamped name in `data_dir`; returns the path.
pub fn save(report: &AnalysisReport, data_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    let name = format!("report_{}.json", clock::format_compact(clock::unix_now_secs()));
    let path = data_dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    Ok(path)
}

fn cpu_report(series: &Series) -> Option<CpuReport> {
    let values = series.values(|s| s.app_cpu_percent);
    let summary = stats::summarize(&values)?;

    let grade = if summary.mean < 15.0 {
        Grade::Excellent
    } else if summary.mean < 30.0 {
        Grade::Good
    } else if summary.mean < 50.0 {
        Grade::Fair
    } else {
        Grade::Poor
    };

    Some(CpuReport {
        summary: MetricSummary {
            mean: round_to(summary.mean, 2),
            median: round_to(summary.median, 2),
            p90: round_to(summary.p90, 2),
            p95: round_to(summary.p95, 2),
            max: round_to(summary.max, 2),
        },
        grade,
    })
}

fn memory_report(series: &Series) -> Option<MemoryReport> {
    let values_mb: Vec<f64> = series
        .values(|s| s.app_mem_kb.map(|v| v as f64))
        .into_iter()
        .map(|kb| kb / 1024.0)
        .collect();
    let summary = stats::summarize(&values_mb)?;
    let min_mb = values_mb.iter().copied().fold(f64::MAX, f64::min);

    let mut growth_mb_per_hour = None;
    let mut leak_warning = None;
    if values_mb.len() >= MIN_GROWTH_READINGS {
        let hours = series.duration_secs() as f64 / 3600.0;
        if hours > 0.0 {
            // Compare steady-state windows, not single readings, so one
            // GC pause or spike does not dominate.
            let start = stats::mean(&values_mb[..5])?;
            let end = stats::mean(&values_mb[values_mb.len() - 5..])?;
            let growth = (end - start) / hours;
            growth_mb_per_hour = Some(round_to(growth, 2));
            if growth > SEVERE_LEAK_MB_PER_HOUR {
                leak_warning = Some("severe leak risk".to_string());
            } else if growth > MILD_LEAK_MB_PER_HOUR {
                leak_warning = Some("mild leak risk".to_string());
            }
        }
    }

    let grade = if summary.mean < 150.0 {
        Grade::Excellent
    } else if summary.mean < 250.0 {
        Grade::Good
    } else if summary.mean < 400.0 {
        Grade::Fair
    } else {
        Grade::Poor
    };

    Some(MemoryReport {
        mean_mb: round_to(summary.mean, 1),
        median_mb: round_to(summary.median, 1),
        p90_mb: round_to(summary.p90, 1),
        max_mb: round_to(summary.max, 1),
        min_mb: round_to(min_mb, 1),
        growth_mb_per_hour,
        leak_warning,
        grade,
    })
}

fn fluency_report(series: &Series) -> Option<FluencyReport> {
    let fps = series.values(|s| s.fps);
    let jank = series.values(|s| s.jank_rate_percent);
    if fps.is_empty() && jank.is_empty() {
        return None;
    }

    let fps_mean = stats::mean(&fps).map(|v| round_to(v, 1));
    let fps_min = (!fps.is_empty()).then(|| round_to(fps.iter().copied().fold(f64::MAX, f64::min), 1));
    let fps_p10 = stats::percentile(&fps, 0.10).map(|v| round_to(v, 1));
    let jank_rate_mean = stats::mean(&jank).map(|v| round_to(v, 2));
    let jank_rate_max =
        (!jank.is_empty()).then(|| round_to(jank.iter().copied().fold(f64::MIN, f64::max), 2));

    // Grading defaults: a session with no fps data is judged on jank
    // alone, and vice versa.
    let fps_for_grade = fps_mean.unwrap_or(60.0);
    let jank_for_grade = jank_rate_mean.unwrap_or(0.0);
    let grade = if fps_for_grade >= 55.0 && jank_for_grade < 2.0 {
        Grade::Excellent
    } else if fps_for_grade >= 50.0 && jank_for_grade < 5.0 {
        Grade::Good
    } else if fps_for_grade >= 45.0 {
        Grade::Fair
    } else {
        Grade::Poor
    };

    Some(FluencyReport {
        fps_mean,
        fps_min,
        fps_p10,
        jank_rate_mean,
        jank_rate_max,
        grade,
    })
}
