//! Memory extraction: application PSS and system-wide memory.

/// System memory figures derived from a `/proc/meminfo` style dump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemMemory {
    pub total_kb: u64,
    pub available_kb: u64,
    /// `(1 - available/total) * 100`; absent when total is zero.
    pub used_percent: Option<f64>,
}

/// Extract the application's PSS total in kilobytes from a memory
/// diagnostic dump (`dumpsys meminfo <package>`):
///
/// ```text
///              TOTAL   212345    180000     12000     ...
/// ```
///
/// Matches a line starting with the bare token `TOTAL` (lines carrying the
/// `TOTAL:` label belong to a different table and are skipped) and takes
/// the first purely numeric token after the label.
pub fn app_pss_kb(text: &str) -> Option<u64> {
    for line in text.lines() {
        let line = line.trim();
        if !line.starts_with("TOTAL") || line.contains("TOTAL:") {
            continue;
        }
        for token in line.split_whitespace().skip(1) {
            if token.bytes().all(|b| b.is_ascii_digit()) {
                return token.parse().ok();
            }
        }
    }
    None
}

/// Extract system memory from a key-value memory-info dump:
///
/// ```text
/// MemTotal:        3882924 kB
/// MemAvailable:    1244028 kB
/// ```
///
/// Both labels must be present for a reading; used-percent is derived only
/// when the total is non-zero.
pub fn system_memory(text: &str) -> Option<SystemMemory> {
    let total_kb = labeled_value(text, "MemTotal:")?;
    let available_kb = labeled_value(text, "MemAvailable:")?;

    let used_percent =
        (total_kb > 0).then(|| (1.0 - available_kb as f64 / total_kb as f64) * 100.0);

    Some(SystemMemory {
        total_kb,
        available_kb,
        used_percent,
    })
}

/// First numeric token following `label` on the first line that carries it.
fn labeled_value(text: &str, label: &str) -> Option<u64> {
    for line in text.lines() {
        if let Some(rest) = line.trim().strip_prefix(label) {
            return rest.split_whitespace().next()?.parse().ok();
        }
    }
    None
}
