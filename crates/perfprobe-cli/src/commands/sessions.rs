//! `perfprobe sessions` — list recorded session logs.

use std::path::PathBuf;

use perfprobe_core::{Config, Series, series::SESSION_PREFIX};

use super::data_dir;

pub fn run(config: Config, data_dir_flag: Option<String>) {
    let dir = data_dir(&config, data_dir_flag);
    if !dir.exists() {
        println!("No data directory found at {}", dir.display());
        println!("Record a session first: perfprobe record");
        return;
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", dir.display());
            std::process::exit(1);
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(SESSION_PREFIX) && name.ends_with(".csv") {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        println!("No sessions found in {}", dir.display());
        println!("Record a session first: perfprobe record");
        return;
    }

    // Newest first; the timestamp in the name sorts lexicographically.
    paths.sort();
    paths.reverse();

    println!("{:<36} {:>8} {:>10}", "Session", "Samples", "Duration");
    println!("{}", "-".repeat(56));

    for path in &paths {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        match Series::load(path) {
            Ok(series) => {
                let mins = series.duration_secs() as f64 / 60.0;
                println!("{:<36} {:>8} {:>9.1}m", name, series.len(), mins);
            }
            Err(e) => println!("{name:<36} (unreadable: {e})"),
        }
    }

    println!();
    println!("{} session(s) in {}", paths.len(), dir.display());
    println!("Run: perfprobe analyze  for a full report on the latest session");
}
