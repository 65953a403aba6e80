//! `perfprobe baseline` — create, list, show, and delete baselines.

use perfprobe_core::{Baseline, BaselineStore, Config};

use super::{data_dir, latest_series_or_exit, ok_or_exit};

pub fn create(config: Config, name: &str, description: &str, data_dir_flag: Option<String>) {
    let dir = data_dir(&config, data_dir_flag);
    let series = latest_series_or_exit(&dir);
    let store = BaselineStore::new(&config.baseline_dir);

    println!("Using session {}", series.file_name());
    let baseline = ok_or_exit(store.create(name, description, &series));

    println!("Baseline created: {name}");
    println!("  Record: {}", store.dir().join(format!("{name}.json")).display());
    println!("  Data:   {}", store.dir().join(format!("{name}_data.csv")).display());
    if let Some(cpu) = &baseline.metrics.cpu {
        println!("  CPU mean:    {:.2}%", cpu.mean);
    }
    if let Some(memory) = &baseline.metrics.memory {
        println!("  Memory mean: {:.2} MB", memory.mean / 1024.0);
    }
    if let Some(battery) = &baseline.metrics.battery {
        println!("  Battery drain: {:.2}%/h", battery.drain_rate_per_hour);
    }
}

pub fn list(config: Config) {
    let store = BaselineStore::new(&config.baseline_dir);
    let baselines = ok_or_exit(store.list());

    if baselines.is_empty() {
        println!("No baselines in {}", store.dir().display());
        println!("Create one first: perfprobe baseline create <name>");
        return;
    }

    println!("{:<20} {:<22} {:<30}", "Name", "Created", "Description");
    println!("{}", "-".repeat(72));
    for baseline in &baselines {
        println!(
            "{:<20} {:<22} {:<30}",
            baseline.name, baseline.created_at, baseline.description
        );
    }
    println!();
    println!("{} baseline(s)", baselines.len());
}

pub fn show(config: Config, name: &str) {
    let store = BaselineStore::new(&config.baseline_dir);
    let baseline = ok_or_exit(store.show(name));
    print_baseline(&baseline);
}

pub fn delete(config: Config, name: &str) {
    let store = BaselineStore::new(&config.baseline_dir);
    ok_or_exit(store.delete(name));
    println!("Baseline deleted: {name}");
}

fn print_baseline(baseline: &Baseline) {
    println!("Baseline: {}", baseline.name);
    if !baseline.description.is_empty() {
        println!("  Description: {}", baseline.description);
    }
    println!("  Created:     {}", baseline.created_at);
    println!("  Source:      {}", baseline.source_file);
    println!("  Samples:     {}", baseline.data_points);
    println!("  Span:        {:.1} min", baseline.duration_minutes);

    if let Some(cpu) = &baseline.metrics.cpu {
        println!("\nCPU load");
        println!("  Mean:   {:.2}%", cpu.mean);
        println!("  Median: {:.2}%", cpu.median);
        println!("  P90:    {:.2}%   P95: {:.2}%", cpu.p90, cpu.p95);
        println!("  Peak:   {:.2}%", cpu.max);
    }

    if let Some(memory) = &baseline.metrics.memory {
        println!("\nMemory footprint");
        println!("  Mean:   {:.2} MB", memory.mean / 1024.0);
        println!("  Median: {:.2} MB", memory.median / 1024.0);
        println!(
            "  P90:    {:.2} MB   P95: {:.2} MB",
            memory.p90 / 1024.0,
            memory.p95 / 1024.0
        );
        println!("  Peak:   {:.2} MB", memory.max / 1024.0);
    }

    if let Some(battery) = &baseline.metrics.battery {
        println!("\nBattery");
        println!("  Drain:      {:.2}%/h", battery.drain_rate_per_hour);
        println!("  Mean level: {:.1}%", battery.mean_level);
    }

    if let Some(temperature) = &baseline.metrics.temperature {
        println!("\nTemperature");
        println!("  Mean: {:.1}°C", temperature.mean);
        println!("  Peak: {:.1}°C", temperature.max);
    }
}
