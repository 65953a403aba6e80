//! `perfprobe record` — run a sampling session until Ctrl+C.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use perfprobe_core::{AdbShell, Collector, Config, Sampler};

use super::{data_dir, ok_or_exit};

pub fn run(
    config: Config,
    serial: Option<String>,
    package: Option<String>,
    interval: Option<f64>,
    data_dir_flag: Option<String>,
) {
    let serial = serial.or(config.adb_serial.clone());
    let package = package.or(config.app_package.clone());
    let interval = interval
        .filter(|s| s.is_finite() && *s > 0.0)
        .map(Duration::from_secs_f64)
        .unwrap_or(config.interval);
    let dir = data_dir(&config, data_dir_flag);

    if !AdbShell::is_available() {
        eprintln!("Error: adb not found on PATH");
        std::process::exit(1);
    }
    if package.is_none() {
        eprintln!("Warning: no target package set; app-scoped metrics will be absent");
        eprintln!("         (set APP_PACKAGE or pass --package)");
    }

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    println!("Recording session");
    match &package {
        Some(package) => println!("  Package:  {package}"),
        None => println!("  Package:  (none, device-wide metrics only)"),
    }
    match &serial {
        Some(serial) => println!("  Device:   {serial}"),
        None => println!("  Device:   default"),
    }
    println!("  Interval: {:.1}s", interval.as_secs_f64());
    println!("  Output:   {}", dir.display());
    println!("  Stop with Ctrl+C");
    println!();

    let shell = AdbShell::new(serial, config.command_timeout);
    let collector = Collector::new(&shell, package);
    let sampler = Sampler::new(collector, interval);

    let mut count = 0u64;
    let path = ok_or_exit(sampler.run_with(&dir, &stop, |sample| {
        count += 1;
        print!(
            "\r  [{count}] cpu: {}  mem: {}  fps: {}   ",
            fmt(sample.app_cpu_percent.or(sample.total_cpu_percent), "%"),
            fmt(sample.app_mem_kb.map(|v| v as f64 / 1024.0), " MB"),
            fmt(sample.fps, ""),
        );
        let _ = std::io::Write::flush(&mut std::io::stdout());
    }));

    println!();
    println!();
    println!("Session saved to {}", path.display());
}

fn fmt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}{unit}"),
        None => "-".to_string(),
    }
}
