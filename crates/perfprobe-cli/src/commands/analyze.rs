//! `perfprobe analyze` — report on the latest recorded session.

use perfprobe_core::{AnalysisReport, Config, report};

use super::{data_dir, latest_series_or_exit, ok_or_exit};

pub fn run(config: Config, data_dir_flag: Option<String>, save: bool) {
    let dir = data_dir(&config, data_dir_flag);
    let series = latest_series_or_exit(&dir);
    let analysis = report::analyze(&series);

    print_report(&analysis);

    if save {
        let path = ok_or_exit(report::save(&analysis, &dir));
        println!("Report saved to {}", path.display());
    }
}

fn print_report(analysis: &AnalysisReport) {
    println!("Performance report: {}", analysis.source_file);
    println!(
        "  Span: {:.1} min ({} samples)",
        analysis.duration_minutes, analysis.data_points
    );

    if let Some(cpu) = &analysis.cpu {
        println!("\nCPU load");
        println!("  Mean:  {:.2}%", cpu.summary.mean);
        println!(
            "  P90:   {:.2}%   P95: {:.2}%",
            cpu.summary.p90, cpu.summary.p95
        );
        println!("  Peak:  {:.2}%", cpu.summary.max);
        println!("  Grade: {}", cpu.grade);
    }

    if let Some(memory) = &analysis.memory {
        println!("\nMemory footprint");
        println!("  Mean:  {:.1} MB", memory.mean_mb);
        println!("  P90:   {:.1} MB   Peak: {:.1} MB", memory.p90_mb, memory.max_mb);
        println!("  Grade: {}", memory.grade);
        if let Some(growth) = memory.growth_mb_per_hour {
            println!("  Growth: {growth:.2} MB/h");
        }
        if let Some(warning) = &memory.leak_warning {
            println!("  Warning: {warning}");
        }
    }

    if let Some(fluency) = &analysis.fluency {
        println!("\nFluency");
        if let Some(fps_mean) = fluency.fps_mean {
            println!("  Mean FPS: {fps_mean:.1}");
        }
        if let (Some(fps_min), Some(fps_p10)) = (fluency.fps_min, fluency.fps_p10) {
            println!("  Min FPS:  {fps_min:.1}   P10: {fps_p10:.1}");
        }
        if let Some(jank) = fluency.jank_rate_mean {
            println!("  Mean jank rate: {jank:.2}%");
        }
        println!("  Grade: {}", fluency.grade);
    }

    println!();
}
