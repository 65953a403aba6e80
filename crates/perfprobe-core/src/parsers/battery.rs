//! Battery level and temperature extraction.

/// Battery readings from a `dumpsys battery` style dump. Either field can
/// be absent independently.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatteryStatus {
    /// Charge level, 0–100.
    pub level: Option<f64>,
    /// Temperature in °C. Reported by the device in tenths of a degree.
    pub temp_c: Option<f64>,
}

/// Extract battery level and temperature:
///
/// ```text
/// Current Battery Service state:
///   level: 85
///   temperature: 273
/// ```
///
/// Labels match case-insensitively; the first occurrence of each wins.
/// Temperature is divided by 10 to yield Celsius.
pub fn battery_status(text: &str) -> BatteryStatus {
    let mut status = BatteryStatus::default();

    for line in text.lines() {
        let line = line.trim().to_ascii_lowercase();
        if let Some(rest) = line.strip_prefix("level:") {
            if status.level.is_none() {
                status.level = rest.trim().parse().ok();
            }
        } else if let Some(rest) = line.strip_prefix("temperature:") {
            if status.temp_c.is_none() {
                status.temp_c = rest.trim().parse::<f64>().ok().map(|t| t / 10.0);
            }
        }
    }

    status
}
