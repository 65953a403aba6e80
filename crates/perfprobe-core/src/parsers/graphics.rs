//! Frame timing extraction: aggregate jank counters and per-frame FPS.

/// Minimum rendered-frame count before a jank rate is reported. A nearly
/// static UI renders a handful of frames per window; a rate computed from
/// those reads as a spurious spike.
pub const MIN_FRAMES_FOR_JANK_RATE: u64 = 10;

/// Ceiling applied to a computed FPS value. Corrupted or out-of-order
/// timestamp data can otherwise produce nonsensical readings.
pub const MAX_FPS: f64 = 120.0;

/// Marker opening the per-frame profile data section of a graphics dump.
const PROFILE_DATA_MARKER: &str = "---PROFILEDATA---";

/// Aggregate frame counters from a graphics diagnostic dump.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub total_frames: Option<u64>,
    pub janky_frames: Option<u64>,
    /// `janky / total * 100`, only when total ≥ [`MIN_FRAMES_FOR_JANK_RATE`].
    pub jank_rate_percent: Option<f64>,
}

/// Extract aggregate frame counters (`dumpsys gfxinfo` dialect):
///
/// ```text
/// Total frames rendered: 12345
/// Janky frames: 123 (1.00%)
/// ```
pub fn frame_stats(text: &str) -> FrameStats {
    let mut total: Option<u64> = None;
    let mut janky: Option<u64> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.contains("Total frames rendered:") {
            if let Some((_, rest)) = line.split_once(':')
                && let Ok(v) = rest.trim().parse()
            {
                total = Some(v);
            }
        } else if line.contains("Janky frames:") {
            if let Some((_, rest)) = line.split_once(':')
                && let Some(first) = rest.trim().split_whitespace().next()
                && let Ok(v) = first.parse()
            {
                janky = Some(v);
            }
        }
    }

    let jank_rate_percent = match (total, janky) {
        (Some(t), Some(j)) if t >= MIN_FRAMES_FOR_JANK_RATE => Some(j as f64 / t as f64 * 100.0),
        _ => None,
    };

    FrameStats {
        total_frames: total,
        janky_frames: janky,
        jank_rate_percent,
    }
}

/// Compute FPS from the per-frame timeline in a `framestats` dump.
///
/// Rows after the `---PROFILEDATA---` marker are comma-separated; the
/// second field is the intended-vsync timestamp in nanoseconds. FPS is
/// `(count - 1) / span_seconds` over the collected timestamps, requiring
/// at least two valid rows and a positive span, and clamped to
/// [`MAX_FPS`].
pub fn fps_from_framestats(text: &str) -> Option<f64> {
    let mut timestamps: Vec<i64> = Vec::new();
    let mut in_profile = false;

    for line in text.lines() {
        let line = line.trim();
        if line.contains(PROFILE_DATA_MARKER) {
            in_profile = true;
            continue;
        }
        if !in_profile || line.is_empty() || line.starts_with("Flags") {
            continue;
        }

        let mut fields = line.split(',');
        let _flags = fields.next();
        if let Some(vsync) = fields.next()
            && let Ok(ts) = vsync.trim().parse::<i64>()
            && ts > 0
        {
            timestamps.push(ts);
        }
    }

    if timestamps.len() < 2 {
        return None;
    }

    let span_ns = timestamps[timestamps.len() - 1] - timestamps[0];
    if span_ns <= 0 {
        return None;
    }

    let fps = (timestamps.len() - 1) as f64 / (span_ns as f64 / 1e9);
    Some(fps.min(MAX_FPS))
}
