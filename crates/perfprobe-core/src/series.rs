//! A recorded session: an ordered, append-only sequence of samples.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProbeError, Result};
use crate::sample::Sample;

/// File-name prefix for session logs in a data directory.
pub const SESSION_PREFIX: &str = "metrics_";

/// An ordered series of samples loaded from one session log.
///
/// The session's identity is the creation timestamp embedded in its file
/// name (`metrics_YYYYMMDD_HHMMSS.csv`). Loading tolerates a torn final
/// row — the scheduler flushes after every append, so at most the last
/// line of an in-progress log can be incomplete. Unparsable rows are
/// skipped, not fatal.
#[derive(Debug, Clone)]
pub struct Series {
    path: PathBuf,
    samples: Vec<Sample>,
}

impl Series {
    /// Load a session log from disk.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = fs::read_to_string(&path)?;

        let mut samples = Vec::new();
        for (i, line) in contents.lines().enumerate() {
            if i == 0 || line.trim().is_empty() {
                // header row
                continue;
            }
            match Sample::from_csv_row(line) {
                Some(sample) => samples.push(sample),
                None => log::warn!("{}: skipping malformed row {}", path.display(), i + 1),
            }
        }

        Ok(Self { path, samples })
    }

    /// Build a series directly from samples (tests, in-memory assembly).
    pub fn from_samples(path: impl Into<PathBuf>, samples: Vec<Sample>) -> Self {
        Self {
            path: path.into(),
            samples,
        }
    }

    /// The most recent session log in a data directory, by the timestamp
    /// embedded in the file name.
    pub fn latest_in_dir(dir: &Path) -> Result<Self> {
        let mut names: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir)?.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with(SESSION_PREFIX) && name.ends_with(".csv") {
                names.push(path);
            }
        }
        names.sort();

        match names.pop() {
            Some(path) => Self::load(path),
            None => Err(ProbeError::NoSessionData(dir.to_path_buf())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The log's file name — the series identity used in baseline records.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<u64> {
        self.samples.first().map(|s| s.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<u64> {
        self.samples.last().map(|s| s.timestamp)
    }

    /// Elapsed wall-clock span of the session in seconds; zero for fewer
    /// than two samples.
    pub fn duration_secs(&self) -> u64 {
        match (self.first_timestamp(), self.last_timestamp()) {
            (Some(first), Some(last)) => last.saturating_sub(first),
            _ => 0,
        }
    }

    /// Present values of one metric, in sample order.
    pub fn values(&self, metric: impl Fn(&Sample) -> Option<f64>) -> Vec<f64> {
        self.samples.iter().filter_map(metric).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::CSV_HEADER;
    use std::io::Write;

    fn write_log(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{CSV_HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        path
    }

    fn sample_at(secs: u64, cpu: Option<f64>) -> Sample {
        let mut s = Sample::new(secs);
        s.app_cpu_percent = cpu;
        s
    }

    #[test]
    fn load_round_trips_samples() {
        let tmp = tempfile::tempdir().unwrap();
        let samples = vec![
            sample_at(1000, Some(10.0)),
            sample_at(1001, Some(20.0)),
            sample_at(1002, None),
        ];
        let rows: Vec<String> = samples.iter().map(Sample::to_csv_row).collect();
        let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let path = write_log(tmp.path(), "metrics_19700101_001640.csv", &row_refs);

        let series = Series::load(&path).unwrap();
        assert_eq!(series.samples(), samples.as_slice());
        assert_eq!(series.duration_secs(), 2);
    }

    #[test]
    fn load_discards_torn_final_row() {
        let tmp = tempfile::tempdir().unwrap();
        let full = sample_at(1000, Some(10.0)).to_csv_row();
        let torn = &full[..full.len() / 2];
        let path = write_log(tmp.path(), "metrics_19700101_001640.csv", &[&full, torn]);

        let series = Series::load(&path).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Series::load(tmp.path().join("metrics_nope.csv")).unwrap_err();
        assert!(matches!(err, ProbeError::Io(_)));
    }

    #[test]
    fn latest_in_dir_picks_newest_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        let row = sample_at(1000, Some(1.0)).to_csv_row();
        write_log(tmp.path(), "metrics_20250101_000000.csv", &[&row]);
        let newer = sample_at(2000, Some(2.0)).to_csv_row();
        write_log(tmp.path(), "metrics_20250102_000000.csv", &[&newer]);
        // Not a session log; must be ignored.
        fs::write(tmp.path().join("report_20250103_000000.json"), "{}").unwrap();

        let series = Series::latest_in_dir(tmp.path()).unwrap();
        assert_eq!(series.file_name(), "metrics_20250102_000000.csv");
        assert_eq!(series.values(|s| s.app_cpu_percent), vec![2.0]);
    }

    #[test]
    fn latest_in_dir_empty_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Series::latest_in_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, ProbeError::NoSessionData(_)));
    }

    #[test]
    fn values_skips_absent() {
        let series = Series::from_samples(
            "metrics_x.csv",
            vec![
                sample_at(1, Some(10.0)),
                sample_at(2, None),
                sample_at(3, Some(20.0)),
            ],
        );
        assert_eq!(series.values(|s| s.app_cpu_percent), vec![10.0, 20.0]);
    }
}
