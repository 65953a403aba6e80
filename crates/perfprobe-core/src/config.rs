//! Runtime configuration.
//!
//! Built once at process start and passed by reference into the collector
//! and the stores — parsers and comparators never look anything up from
//! the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::device::DEFAULT_COMMAND_TIMEOUT;

/// Default wall-clock spacing between samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for a sampling process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Device serial passed to `adb -s`; `None` uses the default device.
    pub adb_serial: Option<String>,
    /// Target application identifier. Without it, app-scoped metrics
    /// (app CPU, PSS, frame timing) are not collected.
    pub app_package: Option<String>,
    /// Requested sampling interval.
    pub interval: Duration,
    /// Per-command timeout for device calls.
    pub command_timeout: Duration,
    /// Where session logs and report artifacts land.
    pub data_dir: PathBuf,
    /// Where named baselines are persisted.
    pub baseline_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            adb_serial: None,
            app_package: None,
            interval: DEFAULT_SAMPLE_INTERVAL,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            data_dir: PathBuf::from("data"),
            baseline_dir: PathBuf::from("baselines"),
        }
    }
}

impl Config {
    /// Build a config from the process environment, falling back to
    /// defaults for anything unset or unparsable.
    ///
    /// Recognized variables: `ADB_SERIAL`, `APP_PACKAGE`,
    /// `SAMPLE_INTERVAL_SECONDS`, `DATA_DIR`, `BASELINE_DIR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(serial) = env_nonempty("ADB_SERIAL") {
            config.adb_serial = Some(serial);
        }
        if let Some(package) = env_nonempty("APP_PACKAGE") {
            config.app_package = Some(package);
        }
        if let Some(interval) = env_nonempty("SAMPLE_INTERVAL_SECONDS")
            && let Ok(secs) = interval.parse::<f64>()
            && secs.is_finite()
            && secs > 0.0
        {
            config.interval = Duration::from_secs_f64(secs);
        }
        if let Some(dir) = env_nonempty("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_nonempty("BASELINE_DIR") {
            config.baseline_dir = PathBuf::from(dir);
        }

        config
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}
