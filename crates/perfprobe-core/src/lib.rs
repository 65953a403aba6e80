//! # perfprobe-core
//!
//! Sample an Android application's performance over `adb` and catch
//! regressions against named baselines.
//!
//! The collector periodically shells out to the device's diagnostic
//! commands (`top`, `dumpsys cpuinfo`, `dumpsys meminfo`, `dumpsys
//! gfxinfo`, `dumpsys battery`, `/proc/meminfo`), extracts typed metrics
//! from their loosely-structured text, and appends one [`Sample`] per tick
//! to an append-only CSV session log. A finished session can be frozen
//! into a named [`Baseline`]; later sessions are compared against it and
//! every statistic's drift is classified.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use perfprobe_core::{AdbShell, Collector, Config, Sampler};
//!
//! let config = Config::from_env();
//! let shell = AdbShell::new(config.adb_serial.clone(), config.command_timeout);
//! let collector = Collector::new(&shell, config.app_package.clone());
//! let sampler = Sampler::new(collector, config.interval);
//!
//! let stop = AtomicBool::new(false); // flipped by a Ctrl+C handler
//! let log_path = sampler.run(&config.data_dir, &stop).unwrap();
//! println!("session saved to {}", log_path.display());
//! ```
//!
//! ## Architecture
//!
//! Device shell → parsers → Sample → session log (CSV), then separately:
//! session log → [`BaselineStore`] → persisted baseline, and (session log,
//! baseline) → [`compare`] → classified drift report.
//!
//! Parsers are pure text → `Option` functions: a diagnostic dialect the
//! device doesn't speak, a timed-out command, or a malformed dump degrade
//! single fields to absent and never abort a sample.

pub mod baseline;
pub mod clock;
pub mod collector;
pub mod compare;
pub mod config;
pub mod device;
pub mod error;
pub mod parsers;
pub mod report;
pub mod sample;
pub mod series;
pub mod stats;

pub use baseline::{Baseline, BaselineMetrics, BaselineStore, BatterySummary, TemperatureSummary};
pub use collector::{Collector, MIN_SAMPLE_INTERVAL, Sampler, SessionLog};
pub use compare::{ComparisonReport, DriftCategory, MetricComparison, StatDrift, compare};
pub use config::Config;
pub use device::{AdbShell, DEFAULT_COMMAND_TIMEOUT, DeviceShell};
pub use error::{ProbeError, Result};
pub use report::{AnalysisReport, Grade, analyze};
pub use sample::Sample;
pub use series::Series;
pub use stats::MetricSummary;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
