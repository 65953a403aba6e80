//! `perfprobe compare` — compare the latest session against a baseline.

use perfprobe_core::{
    BaselineStore, ComparisonReport, Config, DriftCategory, MetricComparison, compare,
};

use super::{data_dir, latest_series_or_exit, ok_or_exit};

pub fn run(config: Config, name: &str, data_dir_flag: Option<String>, output: Option<&str>) {
    let dir = data_dir(&config, data_dir_flag);
    let store = BaselineStore::new(&config.baseline_dir);
    let baseline = ok_or_exit(store.show(name));
    let series = latest_series_or_exit(&dir);

    let report = compare(&baseline, &series);
    print_report(&report);

    if let Some(path) = output {
        let json = match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(path, json) {
            eprintln!("Error writing {path}: {e}");
            std::process::exit(1);
        }
        println!("Comparison saved to {path}");
    }
}

fn print_report(report: &ComparisonReport) {
    println!("Comparison against baseline '{}'", report.baseline_name);
    println!("  Baseline: {}", report.baseline_created_at);
    println!("  Current:  {}", report.current_file);

    if let Some(cpu) = &report.cpu {
        print_table("CPU load (%)", cpu, 1.0);
    }
    if let Some(memory) = &report.memory {
        print_table("Memory footprint (MB)", memory, 1024.0);
    }
    if report.cpu.is_none() && report.memory.is_none() {
        println!("\nNo metric category is present in both baseline and session.");
        return;
    }

    println!("\nOverall");
    for issue in &report.issues {
        println!("  !! {issue}");
    }
    for improvement in &report.improvements {
        println!("  ++ {improvement}");
    }
    if report.issues.is_empty() && report.improvements.is_empty() {
        println!("  stable, no significant change");
    }
}

fn print_table(title: &str, comparison: &MetricComparison, divisor: f64) {
    println!("\n{title}");
    println!(
        "  {:<6} {:>10} {:>10} {:>18}  {}",
        "Stat", "Baseline", "Current", "Diff", "Assessment"
    );
    println!("  {}", "-".repeat(62));
    for row in &comparison.rows {
        println!(
            "  {:<6} {:>10.2} {:>10.2} {:>+9.2} ({:+.1}%)  {}",
            row.statistic,
            row.baseline_value / divisor,
            row.current_value / divisor,
            row.absolute_diff / divisor,
            row.percent_diff,
            marker(row.category),
        );
    }
}

fn marker(category: DriftCategory) -> String {
    match category {
        DriftCategory::Stable => "stable".to_string(),
        DriftCategory::Regression => "!! regression".to_string(),
        DriftCategory::MinorRegression => "! minor regression".to_string(),
        DriftCategory::Improvement => "++ improvement".to_string(),
        DriftCategory::MinorImprovement => "+ minor improvement".to_string(),
    }
}
