//! Sample assembly and the periodic sampling loop.
//!
//! One [`Collector::collect_once`] call issues every configured diagnostic
//! command, routes the raw text through the parsers in priority order, and
//! assembles exactly one [`Sample`]. The [`Sampler`] drives that on a
//! fixed interval, appending to a [`SessionLog`] and watching a
//! cooperative stop flag at loop boundaries — no OS signal handling lives
//! here, so the whole loop runs under test with a mock shell and an
//! injected flag.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::clock;
use crate::device::DeviceShell;
use crate::error::Result;
use crate::parsers::{battery, cpu, graphics, memory};
use crate::sample::{CSV_HEADER, Sample};
use crate::series::SESSION_PREFIX;
use crate::stats::round_to;

/// Floor for the sampling interval, bounding device-command load.
pub const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Sleep slice while waiting out the interval; the stop flag is
/// re-checked between slices.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// Sample assembly
// ---------------------------------------------------------------------------

/// Assembles one sample per invocation from device diagnostics.
pub struct Collector<'a> {
    shell: &'a dyn DeviceShell,
    package: Option<String>,
}

impl<'a> Collector<'a> {
    pub fn new(shell: &'a dyn DeviceShell, package: Option<String>) -> Self {
        Self { shell, package }
    }

    /// Collect one timestamped sample.
    ///
    /// Every field degrades independently: a failed command or a parser
    /// miss leaves that field absent and never aborts the sample.
    /// App-scoped diagnostics are skipped entirely without a target
    /// package.
    pub fn collect_once(&self) -> Sample {
        let mut sample = Sample::new(clock::unix_now_secs());

        let ranked = self.shell.run(&["top", "-n", "1", "-b"]);
        let usage = self.shell.run(&["dumpsys", "cpuinfo"]);
        sample.total_cpu_percent = cpu::total_cpu(&usage, &ranked);

        if let Some(package) = self.package.as_deref() {
            sample.app_cpu_percent = cpu::app_cpu_from_ranked_listing(&ranked, package)
                .or_else(|| cpu::app_cpu_from_process_report(&usage, package));
            if sample.app_cpu_percent.is_none() {
                log::debug!("no CPU reading for {package} this cycle");
            }

            let meminfo = self.shell.run(&["dumpsys", "meminfo", package]);
            sample.app_mem_kb = memory::app_pss_kb(&meminfo);

            let gfx = self.shell.run(&["dumpsys", "gfxinfo", package, "framestats"]);
            let frames = graphics::frame_stats(&gfx);
            sample.total_frames = frames.total_frames;
            sample.janky_frames = frames.janky_frames;
            // Persisted precision: prior sessions stored jank at 2 decimals
            // and fps at 1.
            sample.jank_rate_percent = frames.jank_rate_percent.map(|r| round_to(r, 2));
            sample.fps = graphics::fps_from_framestats(&gfx).map(|f| round_to(f, 1));
        }

        let sys_meminfo = self.shell.run(&["cat", "/proc/meminfo"]);
        if let Some(mem) = memory::system_memory(&sys_meminfo) {
            sample.mem_total_kb = Some(mem.total_kb);
            sample.mem_available_kb = Some(mem.available_kb);
            sample.mem_used_percent = mem.used_percent;
        }

        let battery_dump = self.shell.run(&["dumpsys", "battery"]);
        let bat = battery::battery_status(&battery_dump);
        sample.battery_level = bat.level;
        sample.battery_temp_c = bat.temp_c;

        sample
    }
}

// ---------------------------------------------------------------------------
// Session log
// ---------------------------------------------------------------------------

/// Append-only CSV log for one session. Single writer; each append is one
/// complete row followed by an immediate flush, so a crash risks at most
/// the row being written.
pub struct SessionLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl SessionLog {
    /// Create a new session log named after the current wall-clock time,
    /// writing the header row immediately.
    pub fn create(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let name = format!(
            "{SESSION_PREFIX}{}.csv",
            clock::format_compact(clock::unix_now_secs())
        );
        let path = data_dir.join(name);

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{CSV_HEADER}")?;
        writer.flush()?;

        Ok(Self { path, writer })
    }

    /// Append one sample and flush to durable storage.
    pub fn append(&mut self, sample: &Sample) -> Result<()> {
        writeln!(self.writer, "{}", sample.to_csv_row())?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the log, returning its path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        Ok(self.path)
    }
}

// ---------------------------------------------------------------------------
// Sampling loop
// ---------------------------------------------------------------------------

/// Periodic sampling scheduler.
///
/// Runs: collect → append+flush → sleep, until the stop flag is observed
/// at a loop boundary. Cancellation is cooperative: an in-flight sample is
/// finished and written before the loop exits. Only log I/O failures are
/// fatal; per-sample command and parse failures are recorded as absent
/// fields.
pub struct Sampler<'a> {
    collector: Collector<'a>,
    interval: Duration,
}

impl<'a> Sampler<'a> {
    pub fn new(collector: Collector<'a>, interval: Duration) -> Self {
        Self {
            collector,
            interval: interval.max(MIN_SAMPLE_INTERVAL),
        }
    }

    /// Run the sampling loop until `stop` flips, creating the session log
    /// in `data_dir`. Returns the closed log's path.
    pub fn run(&self, data_dir: &Path, stop: &AtomicBool) -> Result<PathBuf> {
        self.run_with(data_dir, stop, |_| {})
    }

    /// Like [`Sampler::run`], invoking `observer` after each appended
    /// sample (progress display, counters).
    pub fn run_with(
        &self,
        data_dir: &Path,
        stop: &AtomicBool,
        mut observer: impl FnMut(&Sample),
    ) -> Result<PathBuf> {
        let mut log = SessionLog::create(data_dir)?;
        log::info!("session log created at {}", log.path().display());

        while !stop.load(Ordering::SeqCst) {
            let sample = self.collector.collect_once();
            log.append(&sample)?;
            observer(&sample);

            let deadline = Instant::now() + self.interval;
            while Instant::now() < deadline && !stop.load(Ordering::SeqCst) {
                std::thread::sleep(SLEEP_SLICE);
            }
        }

        let path = log.finish()?;
        log::info!("session closed: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Series;
    use std::sync::atomic::AtomicUsize;

    /// Canned-output shell: maps the first argument to a fixed blob.
    struct MockShell {
        responses: Vec<(&'static str, &'static str)>,
        calls: AtomicUsize,
    }

    impl MockShell {
        fn new(responses: Vec<(&'static str, &'static str)>) -> Self {
            Self {
                responses,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DeviceShell for MockShell {
        fn run(&self, args: &[&str]) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = args.get(1).copied().unwrap_or(args[0]);
            self.responses
                .iter()
                .find(|(k, _)| *k == key || args[0] == *k)
                .map(|(_, v)| (*v).to_string())
                .unwrap_or_default()
        }
    }

    const TOP: &str =
        " 1234 u0_a1 RT - 4.2G 212M 118M S 23.4 5.2 1:02.33 com.example.app\n";
    const CPUINFO: &str = "400% TOTAL: 200% user + 150% kernel + 50% iowait\n";
    const MEMINFO_APP: &str = "  TOTAL 212345 180000 12000\n";
    const PROC_MEMINFO: &str = "MemTotal: 4000000 kB\nMemAvailable: 1000000 kB\n";
    const BATTERY: &str = "  level: 80\n  temperature: 300\n";
    const GFX: &str = "\
Total frames rendered: 1000
Janky frames: 50 (5.00%)
---PROFILEDATA---
Flags,IntendedVsync,Vsync
0,1000000000,0
0,2000000000,0
0,3000000000,0
";

    fn full_mock() -> MockShell {
        MockShell::new(vec![
            ("top", TOP),
            ("cpuinfo", CPUINFO),
            ("meminfo", MEMINFO_APP),
            ("cat", PROC_MEMINFO),
            ("battery", BATTERY),
            ("gfxinfo", GFX),
        ])
    }

    // -----------------------------------------------------------------------
    // Collector
    // -----------------------------------------------------------------------

    #[test]
    fn collects_all_fields_with_package() {
        let shell = full_mock();
        let collector = Collector::new(&shell, Some("com.example.app".to_string()));
        let sample = collector.collect_once();

        assert_eq!(sample.app_cpu_percent, Some(23.4));
        assert_eq!(sample.total_cpu_percent, Some(800.0));
        assert_eq!(sample.app_mem_kb, Some(212345));
        assert_eq!(sample.mem_total_kb, Some(4000000));
        assert_eq!(sample.mem_available_kb, Some(1000000));
        assert_eq!(sample.mem_used_percent, Some(75.0));
        assert_eq!(sample.battery_level, Some(80.0));
        assert_eq!(sample.battery_temp_c, Some(30.0));
        assert_eq!(sample.total_frames, Some(1000));
        assert_eq!(sample.janky_frames, Some(50));
        assert_eq!(sample.jank_rate_percent, Some(5.0));
        assert_eq!(sample.fps, Some(1.0));
    }

    #[test]
    fn without_package_skips_app_metrics() {
        let shell = full_mock();
        let collector = Collector::new(&shell, None);
        let sample = collector.collect_once();

        assert_eq!(sample.app_cpu_percent, None);
        assert_eq!(sample.app_mem_kb, None);
        assert_eq!(sample.fps, None);
        // System-wide metrics still collected.
        assert_eq!(sample.mem_total_kb, Some(4000000));
        assert_eq!(sample.battery_level, Some(80.0));
    }

    #[test]
    fn failed_commands_degrade_to_absent() {
        let shell = MockShell::new(vec![]);
        let collector = Collector::new(&shell, Some("com.example.app".to_string()));
        let sample = collector.collect_once();

        assert!(sample.timestamp > 0);
        assert_eq!(sample.app_cpu_percent, None);
        assert_eq!(sample.total_cpu_percent, None);
        assert_eq!(sample.mem_total_kb, None);
        assert_eq!(sample.battery_level, None);
    }

    #[test]
    fn app_cpu_falls_back_to_process_report() {
        let shell = MockShell::new(vec![
            ("top", "header only, no process rows\n"),
            ("cpuinfo", "  12% 1234/com.example.app: 9% user + 3% kernel\n"),
        ]);
        let collector = Collector::new(&shell, Some("com.example.app".to_string()));
        let sample = collector.collect_once();
        assert_eq!(sample.app_cpu_percent, Some(12.0));
    }

    // -----------------------------------------------------------------------
    // SessionLog
    // -----------------------------------------------------------------------

    #[test]
    fn session_log_writes_header_and_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let mut log = SessionLog::create(tmp.path()).unwrap();

        let mut sample = Sample::new(1000);
        sample.app_cpu_percent = Some(12.5);
        log.append(&sample).unwrap();
        let path = log.finish().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].contains("12.5"));

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(SESSION_PREFIX) && name.ends_with(".csv"));
    }

    #[test]
    fn session_log_create_fails_on_unwritable_dir() {
        // A file where the data directory should be.
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();
        assert!(SessionLog::create(&blocker).is_err());
    }

    // -----------------------------------------------------------------------
    // Sampler
    // -----------------------------------------------------------------------

    /// Shell wrapper that trips the stop flag after a number of samples,
    /// exercising the loop-boundary cancellation check.
    struct StoppingShell<'s> {
        inner: &'s MockShell,
        stop: &'s AtomicBool,
        battery_calls: AtomicUsize,
        stop_after: usize,
    }

    impl DeviceShell for StoppingShell<'_> {
        fn run(&self, args: &[&str]) -> String {
            // The battery dump is the last command of each cycle.
            if args.first() == Some(&"dumpsys") && args.get(1) == Some(&"battery") {
                let done = self.battery_calls.fetch_add(1, Ordering::SeqCst) + 1;
                if done >= self.stop_after {
                    self.stop.store(true, Ordering::SeqCst);
                }
            }
            self.inner.run(args)
        }
    }

    #[test]
    fn sampler_observes_stop_flag_between_iterations() {
        let tmp = tempfile::tempdir().unwrap();
        let stop = AtomicBool::new(false);
        let mock = full_mock();
        let shell = StoppingShell {
            inner: &mock,
            stop: &stop,
            battery_calls: AtomicUsize::new(0),
            stop_after: 2,
        };

        let collector = Collector::new(&shell, Some("com.example.app".to_string()));
        let sampler = Sampler::new(collector, Duration::from_millis(100));

        let mut observed = 0usize;
        let path = sampler
            .run_with(tmp.path(), &stop, |_| observed += 1)
            .unwrap();

        // The flag flipped mid-cycle 2; that sample still completed and
        // was written, and no third cycle started.
        assert_eq!(observed, 2);
        let series = Series::load(&path).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.values(|s| s.app_cpu_percent), vec![23.4, 23.4]);
    }

    #[test]
    fn sampler_with_prearmed_stop_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let stop = AtomicBool::new(true);
        let mock = full_mock();
        let collector = Collector::new(&mock, None);
        let sampler = Sampler::new(collector, Duration::from_millis(100));

        let path = sampler.run(tmp.path(), &stop).unwrap();
        let series = Series::load(&path).unwrap();
        assert!(series.is_empty());
        assert_eq!(mock.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn sampler_clamps_interval_floor() {
        let mock = full_mock();
        let collector = Collector::new(&mock, None);
        let sampler = Sampler::new(collector, Duration::from_millis(1));
        assert_eq!(sampler.interval, MIN_SAMPLE_INTERVAL);
    }
}
