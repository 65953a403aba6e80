//! CPU extraction from ranked-process listings and aggregate usage reports.

/// Upper bound accepted for a CPU percentage token. Multi-core attribution
/// can push a single process well past 100%.
const MAX_CPU_PERCENT: f64 = 800.0;

/// Extract the target application's CPU percentage from a ranked-process
/// listing (`top -b -n 1` dialect):
///
/// ```text
/// PID USER         PR  NI VIRT  RES  SHR S [%CPU] %MEM     TIME+ ARGS
/// 1234 u0_a123     RT   - 4.2G 212M 118M S  23.4   5.2   1:02.33 com.example.app
/// ```
///
/// Finds the line containing `process` and takes the first token after the
/// PID column that parses as a number in `[0, 800]`. The PID column is
/// excluded by position rather than value, so a small PID cannot shadow
/// the reading. On unusual column layouts this can still capture a non-CPU
/// numeric column (priority, memory); recorded sessions and stored
/// baselines depend on this exact extraction, so the column heuristic
/// stays as-is.
pub fn app_cpu_from_ranked_listing(text: &str, process: &str) -> Option<f64> {
    if process.is_empty() {
        return None;
    }

    for line in text.lines() {
        if !line.contains(process) {
            continue;
        }
        for (i, token) in line.split_whitespace().enumerate() {
            if i == 0 {
                // PID column
                continue;
            }
            if let Ok(val) = token.parse::<f64>()
                && (0.0..=MAX_CPU_PERCENT).contains(&val)
            {
                return Some(val);
            }
        }
    }
    None
}

/// Extract total CPU usage from an aggregate usage report
/// (`dumpsys cpuinfo` dialect). Two strategies, in order:
///
/// 1. a line carrying a `TOTAL` marker without the `TOTAL:` label, e.g.
///    `400% TOTAL` — the trailing percentage token is the value;
/// 2. a summary line `<label>: N% user + M% kernel + ...` — every
///    percentage token on the line is summed.
///
/// The first strategy to yield a value wins.
pub fn total_cpu_from_usage_report(text: &str) -> Option<f64> {
    for line in text.lines() {
        if line.contains("TOTAL")
            && !line.contains("TOTAL:")
            && let Some(val) = percent_tokens(line).last()
        {
            return Some(val);
        }
    }

    for line in text.lines() {
        if line.contains(':') && line.contains("% user") {
            let mut sum = 0.0;
            let mut seen = false;
            for val in percent_tokens(line) {
                sum += val;
                seen = true;
            }
            if seen {
                return Some(sum);
            }
        }
    }

    None
}

/// Total CPU with fallback: run both usage-report strategies against the
/// primary aggregate text, then against a caller-supplied secondary text
/// source (in practice the ranked-process listing). The priority order is
/// contract — when both sources would yield a value, the primary wins.
pub fn total_cpu(primary: &str, secondary: &str) -> Option<f64> {
    total_cpu_from_usage_report(primary).or_else(|| total_cpu_from_usage_report(secondary))
}

/// Extract the target application's CPU percentage from a per-process
/// ranked report (`dumpsys cpuinfo` per-process lines):
///
/// ```text
///   15% 1234/com.example.app: 10% user + 5% kernel
/// ```
///
/// Takes the first line containing `process` and a percent sign; the first
/// percentage token on that line is the value. Returns on the first
/// matching line — no aggregation across threads or repeated entries.
pub fn app_cpu_from_process_report(text: &str, process: &str) -> Option<f64> {
    if process.is_empty() {
        return None;
    }

    for line in text.lines() {
        if line.contains(process) && line.contains('%') {
            return percent_tokens(line).next();
        }
    }
    None
}

/// All numeric tokens on a line that end in `%`.
fn percent_tokens(line: &str) -> impl Iterator<Item = f64> + '_ {
    line.split_whitespace()
        .filter_map(|t| t.strip_suffix('%'))
        .filter_map(|t| t.parse::<f64>().ok())
}
