//! Opaque device command execution.
//!
//! The sampler only ever sees text: it hands a diagnostic argument list to
//! a [`DeviceShell`] and gets back whatever the device printed, or an
//! empty string when the command could not run. The concrete transport is
//! `adb shell`, but the trait keeps the sampling loop testable with canned
//! output and no device attached.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Default per-command timeout. A hung device command degrades one field
/// to absent; it must never wedge the sampling loop.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll interval while waiting for a child process to exit.
const WAIT_POLL: Duration = Duration::from_millis(20);

/// Executes one diagnostic command on the device.
pub trait DeviceShell: Send + Sync {
    /// Run a diagnostic command, returning merged stdout+stderr.
    ///
    /// Spawn failures and timeouts yield an empty string. A non-zero exit
    /// still returns whatever output was captured — diagnostic tools often
    /// print usable text before failing.
    fn run(&self, args: &[&str]) -> String;
}

/// [`DeviceShell`] implementation over `adb shell`.
pub struct AdbShell {
    serial: Option<String>,
    timeout: Duration,
}

impl AdbShell {
    pub fn new(serial: Option<String>, timeout: Duration) -> Self {
        Self { serial, timeout }
    }

    /// Check that the `adb` binary is reachable on PATH.
    pub fn is_available() -> bool {
        Command::new("which")
            .arg("adb")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl DeviceShell for AdbShell {
    fn run(&self, args: &[&str]) -> String {
        let mut cmd = Command::new("adb");
        if let Some(serial) = &self.serial {
            cmd.arg("-s").arg(serial);
        }
        cmd.arg("shell").args(args);
        run_with_timeout(cmd, self.timeout).unwrap_or_default()
    }
}

/// Run a command, killing it at the deadline. Returns `None` on spawn
/// failure or timeout; otherwise merged stdout+stderr regardless of exit
/// status.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Option<String> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            log::warn!("failed to spawn {:?}: {e}", cmd.get_program());
            return None;
        }
    };

    // Drain both pipes on their own threads so a chatty command cannot
    // deadlock against a full pipe buffer while we poll for exit.
    let stdout = child.stdout.take()?;
    let stderr = child.stderr.take()?;
    let out_reader = thread::spawn(move || read_to_string_lossy(stdout));
    let err_reader = thread::spawn(move || read_to_string_lossy(stderr));

    let deadline = Instant::now() + timeout;
    let timed_out = loop {
        match child.try_wait() {
            Ok(Some(_status)) => break false,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    break true;
                }
                thread::sleep(WAIT_POLL);
            }
            Err(_) => break false,
        }
    };

    let mut text = out_reader.join().unwrap_or_default();
    text.push_str(&err_reader.join().unwrap_or_default());

    if timed_out {
        log::warn!("device command timed out after {:?}", timeout);
        return None;
    }
    Some(text)
}

fn read_to_string_lossy(mut reader: impl Read) -> String {
    let mut buf = Vec::new();
    let _ = reader.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let out = run_with_timeout(cmd, Duration::from_secs(5)).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn merges_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo out; echo err >&2"]);
        let out = run_with_timeout(cmd, Duration::from_secs(5)).unwrap();
        assert!(out.contains("out"));
        assert!(out.contains("err"));
    }

    #[test]
    fn nonzero_exit_still_returns_output() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo partial; exit 3"]);
        let out = run_with_timeout(cmd, Duration::from_secs(5)).unwrap();
        assert!(out.contains("partial"));
    }

    #[test]
    fn timeout_kills_and_returns_none() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let start = Instant::now();
        let out = run_with_timeout(cmd, Duration::from_millis(200));
        assert_eq!(out, None);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn spawn_failure_returns_none() {
        let cmd = Command::new("/nonexistent/binary/xyz");
        assert_eq!(run_with_timeout(cmd, Duration::from_secs(1)), None);
    }
}
