pub mod analyze;
pub mod baseline;
pub mod compare;
pub mod record;
pub mod sessions;

use std::path::PathBuf;

use perfprobe_core::{Config, ProbeError, Result, Series};

/// Apply a `--data-dir` override on top of the environment config.
pub fn data_dir(config: &Config, flag: Option<String>) -> PathBuf {
    flag.map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone())
}

/// Load the latest session, exiting with a hint when none exists.
pub fn latest_series_or_exit(dir: &std::path::Path) -> Series {
    match Series::latest_in_dir(dir) {
        Ok(series) => series,
        Err(ProbeError::NoSessionData(_)) => {
            eprintln!("No session data found in {}", dir.display());
            eprintln!("Record a session first: perfprobe record");
            std::process::exit(1);
        }
        Err(e) => exit_with(e),
    }
}

/// Print an error and exit non-zero.
pub fn exit_with(e: ProbeError) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

/// Unwrap a result or exit non-zero.
pub fn ok_or_exit<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => exit_with(e),
    }
}
