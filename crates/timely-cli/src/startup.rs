//! System boot time probing.
//!
//! The boot time seeds an empty day with its first clock-in. Probing shells
//! out to platform tools and is best effort: any failure means the day simply
//! starts empty.

use std::io;
use std::process::{Command, ExitStatus};
use std::sync::LazyLock;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Trailing `HH:MM` on the `system boot` line of `who -b`.
///
/// Linux prints `system boot  2025-01-15 08:03`, macOS `system boot  Jan 15 08:03`.
static WHO_BOOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)system boot.*\b([0-9]{1,2}:[0-9]{2})\s*$").unwrap()
});

const EVENT_LOG_SCRIPT: &str = "(Get-EventLog -LogName System -After (Get-Date -Hour 0 -Minute 0 -Second 0 -Millisecond 0) | Select-Object -Last 1).TimeGenerated.ToString(\"HH:mm\")";

/// Errors from a boot time probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{command} exited with {status}")]
    Failed {
        command: &'static str,
        status: ExitStatus,
    },

    #[error("unexpected output from {command}: {output:?}")]
    UnexpectedOutput {
        command: &'static str,
        output: String,
    },

    #[error("boot time probing is not supported on this platform")]
    Unsupported,
}

/// A way to find out when the machine was started today.
///
/// The returned time carries today's date; the boot date is not preserved.
pub trait StartupProbe: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Attempts to read the boot time of day.
    fn startup_time(&self) -> Result<NaiveDateTime, ProbeError>;
}

/// Reads the boot time from `who -b`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhoProbe;

impl StartupProbe for WhoProbe {
    fn name(&self) -> &'static str {
        "who"
    }

    fn startup_time(&self) -> Result<NaiveDateTime, ProbeError> {
        let output = run_command("who", &["-b"])?;
        parse_who_output(&output, Local::now().date_naive())
    }
}

/// Reads the time of the last System event log entry since midnight.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventLogProbe;

impl StartupProbe for EventLogProbe {
    fn name(&self) -> &'static str {
        "powershell"
    }

    fn startup_time(&self) -> Result<NaiveDateTime, ProbeError> {
        let output = run_command("powershell", &["-Command", EVENT_LOG_SCRIPT])?;
        parse_event_log_output(&output, Local::now().date_naive())
    }
}

/// Probe for platforms without a known boot time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProbe;

impl StartupProbe for NoProbe {
    fn name(&self) -> &'static str {
        "none"
    }

    fn startup_time(&self) -> Result<NaiveDateTime, ProbeError> {
        Err(ProbeError::Unsupported)
    }
}

/// Returns the probe suited to the current platform.
pub fn platform_probe() -> Box<dyn StartupProbe> {
    if cfg!(windows) {
        Box::new(EventLogProbe)
    } else if cfg!(unix) {
        Box::new(WhoProbe)
    } else {
        Box::new(NoProbe)
    }
}

/// Runs `probe` on a background thread.
///
/// The receiver yields at most one value. When the probe fails the sender is
/// dropped without sending and the failure is only logged.
pub fn spawn_probe(probe: Box<dyn StartupProbe>) -> Receiver<NaiveDateTime> {
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("boot-probe".to_string())
        .spawn(move || match probe.startup_time() {
            Ok(time) => {
                info!(probe = probe.name(), %time, "boot time probed");
                // The session may already be gone.
                let _ = tx.send(time);
            }
            Err(e) => debug!(probe = probe.name(), error = %e, "boot time probe failed"),
        });

    if let Err(e) = spawned {
        warn!(error = %e, "failed to start boot time probe");
    }
    rx
}

fn run_command(command: &'static str, args: &[&str]) -> Result<String, ProbeError> {
    let output = Command::new(command)
        .args(args)
        .output()
        .map_err(|source| ProbeError::Spawn { command, source })?;

    if !output.status.success() {
        return Err(ProbeError::Failed {
            command,
            status: output.status,
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extracts the boot time of day from `who -b` output.
pub fn parse_who_output(output: &str, date: NaiveDate) -> Result<NaiveDateTime, ProbeError> {
    let unexpected = || ProbeError::UnexpectedOutput {
        command: "who",
        output: output.trim().to_string(),
    };

    let caps = WHO_BOOT_RE.captures(output).ok_or_else(unexpected)?;
    timely_core::parse_time_on(&caps[1], date).map_err(|_| unexpected())
}

/// Extracts the `HH:mm` time printed by the event log script.
pub fn parse_event_log_output(output: &str, date: NaiveDate) -> Result<NaiveDateTime, ProbeError> {
    timely_core::parse_time_on(output.trim(), date).map_err(|_| ProbeError::UnexpectedOutput {
        command: "powershell",
        output: output.trim().to_string(),
    })
}
