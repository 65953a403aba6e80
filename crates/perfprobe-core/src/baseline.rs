//! Named performance baselines: summarization, persistence, lookup.
//!
//! A baseline is a statistical snapshot of one closed session, stored as
//! `<name>.json` next to a verbatim copy of the source log
//! (`<name>_data.csv`) for audit and replay. The store owns the persisted
//! representation exclusively; records are immutable once written and only
//! replaced wholesale by re-creating under the same name.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clock;
use crate::error::{ProbeError, Result};
use crate::sample::Sample;
use crate::series::Series;
use crate::stats::{self, MetricSummary};

/// Minimum battery readings for a drain rate.
const MIN_BATTERY_READINGS: usize = 2;

/// Minimum session span, in hours, for a battery drain rate.
const MIN_DRAIN_SPAN_HOURS: f64 = 0.1;

/// Battery figures derived over a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatterySummary {
    /// Charge percentage consumed per hour, first reading to last over the
    /// session's wall-clock span.
    pub drain_rate_per_hour: f64,
    pub mean_level: f64,
}

/// Battery temperature figures over a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub mean: f64,
    pub max: f64,
}

/// Per-category summaries; categories with no data are omitted from the
/// persisted JSON entirely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BaselineMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<MetricSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MetricSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<BatterySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureSummary>,
}

impl BaselineMetrics {
    /// Summarize every present metric category of a series.
    pub fn from_series(series: &Series) -> Self {
        Self {
            cpu: stats::summarize(&series.values(|s| s.app_cpu_percent)),
            memory: stats::summarize(&series.values(app_mem_f64)),
            battery: battery_summary(series),
            temperature: temperature_summary(series),
        }
    }
}

/// A named baseline record as persisted to `<name>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    pub name: String,
    pub description: String,
    pub created_at: String,
    /// File name of the session the baseline was built from.
    pub source_file: String,
    pub data_points: usize,
    pub duration_minutes: f64,
    pub metrics: BaselineMetrics,
}

/// Filesystem-backed store of named baselines.
pub struct BaselineStore {
    dir: PathBuf,
}

impl BaselineStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create (or wholesale replace) the baseline `name` from a closed
    /// series. Persists the record and a copy of the raw session log.
    pub fn create(&self, name: &str, description: &str, series: &Series) -> Result<Baseline> {
        fs::create_dir_all(&self.dir)?;

        let baseline = Baseline {
            name: name.to_string(),
            description: description.to_string(),
            created_at: clock::format_iso8601(clock::unix_now_secs()),
            source_file: series.file_name(),
            data_points: series.len(),
            duration_minutes: series.duration_secs() as f64 / 60.0,
            metrics: BaselineMetrics::from_series(series),
        };

        let json = serde_json::to_string_pretty(&baseline)?;
        fs::write(self.record_path(name), json)?;
        fs::copy(series.path(), self.data_path(name))?;

        log::info!("baseline '{name}' created from {}", baseline.source_file);
        Ok(baseline)
    }

    /// All persisted baselines, ordered by name.
    pub fn list(&self) -> Result<Vec<Baseline>> {
        let mut baselines = Vec::new();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(baselines),
            Err(e) => return Err(e.into()),
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_record(&path) {
                Ok(baseline) => baselines.push(baseline),
                Err(e) => log::warn!("skipping unreadable baseline {}: {e}", path.display()),
            }
        }

        baselines.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(baselines)
    }

    /// Load the baseline `name`.
    pub fn show(&self, name: &str) -> Result<Baseline> {
        let path = self.record_path(name);
        if !path.exists() {
            return Err(ProbeError::BaselineNotFound(name.to_string()));
        }
        read_record(&path)
    }

    /// Delete the baseline `name` and its data copy.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.record_path(name);
        if !path.exists() {
            return Err(ProbeError::BaselineNotFound(name.to_string()));
        }
        fs::remove_file(path)?;

        let data = self.data_path(name);
        if data.exists() {
            fs::remove_file(data)?;
        }
        Ok(())
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn data_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}_data.csv"))
    }
}

fn read_record(path: &Path) -> Result<Baseline> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn app_mem_f64(sample: &Sample) -> Option<f64> {
    sample.app_mem_kb.map(|v| v as f64)
}

fn battery_summary(series: &Series) -> Option<BatterySummary> {
    let levels = series.values(|s| s.battery_level);
    if levels.len() < MIN_BATTERY_READINGS {
        return None;
    }

    // Drain is measured over the whole session span, not just the battery
    // rows.
    let hours = series.duration_secs() as f64 / 3600.0;
    if hours <= MIN_DRAIN_SPAN_HOURS {
        return None;
    }

    Some(BatterySummary {
        drain_rate_per_hour: (levels[0] - levels[levels.len() - 1]) / hours,
        mean_level: stats::mean(&levels)?,
    })
}

fn temperature_summary(series: &Series) -> Option<TemperatureSummary> {
    let temps = series.values(|s| s.battery_temp_c);
    if temps.is_empty() {
        return None;
    }
    Some(TemperatureSummary {
        mean: stats::mean(&temps)?,
        max: temps.iter().copied().fold(f64::MIN, f64::max),
    })
}
