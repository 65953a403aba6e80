//! One timestamped observation and its durable CSV row form.

use crate::clock;

/// CSV header naming every sample field, written once per session log.
pub const CSV_HEADER: &str = "timestamp,total_cpu_percent,app_cpu_percent,mem_total_kb,\
mem_available_kb,mem_used_percent,app_mem_kb,battery_level,battery_temp_c,fps,\
total_frames,janky_frames,jank_rate_percent";

/// Number of comma-separated fields in a serialized row.
const FIELD_COUNT: usize = 13;

/// One observation from a single scheduler tick.
///
/// Only the timestamp is guaranteed: any diagnostic command can fail and
/// any metric can be unparsable in a given cycle, so every other field
/// degrades independently to absent. A sample is assembled once and never
/// edited afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Wall-clock time, epoch seconds.
    pub timestamp: u64,
    pub total_cpu_percent: Option<f64>,
    pub app_cpu_percent: Option<f64>,
    pub mem_total_kb: Option<u64>,
    pub mem_available_kb: Option<u64>,
    pub mem_used_percent: Option<f64>,
    pub app_mem_kb: Option<u64>,
    pub battery_level: Option<f64>,
    pub battery_temp_c: Option<f64>,
    pub fps: Option<f64>,
    pub total_frames: Option<u64>,
    pub janky_frames: Option<u64>,
    pub jank_rate_percent: Option<f64>,
}

impl Sample {
    /// An empty sample at the given wall-clock time.
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp,
            total_cpu_percent: None,
            app_cpu_percent: None,
            mem_total_kb: None,
            mem_available_kb: None,
            mem_used_percent: None,
            app_mem_kb: None,
            battery_level: None,
            battery_temp_c: None,
            fps: None,
            total_frames: None,
            janky_frames: None,
            jank_rate_percent: None,
        }
    }

    /// Serialize as one CSV row. Absent fields become empty strings.
    pub fn to_csv_row(&self) -> String {
        let fields = [
            clock::format_iso8601(self.timestamp),
            fmt_f64(self.total_cpu_percent),
            fmt_f64(self.app_cpu_percent),
            fmt_u64(self.mem_total_kb),
            fmt_u64(self.mem_available_kb),
            fmt_f64(self.mem_used_percent),
            fmt_u64(self.app_mem_kb),
            fmt_f64(self.battery_level),
            fmt_f64(self.battery_temp_c),
            fmt_f64(self.fps),
            fmt_u64(self.total_frames),
            fmt_u64(self.janky_frames),
            fmt_f64(self.jank_rate_percent),
        ];
        fields.join(",")
    }

    /// Parse a row written by [`Sample::to_csv_row`].
    ///
    /// Returns `None` when the row shape is wrong (field count, timestamp)
    /// — the one case a reader must tolerate is a torn final row from a
    /// log that is still being appended. Individual metric fields that
    /// fail to parse degrade to absent instead of rejecting the row.
    pub fn from_csv_row(row: &str) -> Option<Self> {
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() != FIELD_COUNT {
            return None;
        }

        let timestamp = clock::parse_iso8601(fields[0])?;

        Some(Self {
            timestamp,
            total_cpu_percent: parse_opt(fields[1]),
            app_cpu_percent: parse_opt(fields[2]),
            mem_total_kb: parse_opt(fields[3]),
            mem_available_kb: parse_opt(fields[4]),
            mem_used_percent: parse_opt(fields[5]),
            app_mem_kb: parse_opt(fields[6]),
            battery_level: parse_opt(fields[7]),
            battery_temp_c: parse_opt(fields[8]),
            fps: parse_opt(fields[9]),
            total_frames: parse_opt(fields[10]),
            janky_frames: parse_opt(fields[11]),
            jank_rate_percent: parse_opt(fields[12]),
        })
    }
}

fn fmt_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn fmt_u64(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_opt<T: std::str::FromStr>(field: &str) -> Option<T> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    field.parse().ok()
}
