//! Structured logger with per-dependency summary collection.
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{DepEntry, DepStatus, Log};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Per-status counts over a run's recorded dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Dependencies that were already correct.
    pub ok: usize,
    /// Dependencies downloaded or extracted.
    pub fetched: usize,
    /// Dependencies deleted.
    pub removed: usize,
    /// Dependencies that failed.
    pub failed: usize,
}

impl Tally {
    /// Count the statuses in `entries`.
    #[must_use]
    pub fn of(entries: &[DepEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut t, e| {
            match e.status {
                DepStatus::Ok => t.ok += 1,
                DepStatus::Fetched => t.fetched += 1,
                DepStatus::Removed => t.removed += 1,
                DepStatus::Failed => t.failed += 1,
            }
            t
        })
    }

    /// Total number of dependencies counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.ok + self.fetched + self.removed + self.failed
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.total() == 1 {
            "dependency"
        } else {
            "dependencies"
        };
        write!(
            f,
            "{} {noun}: {} ok, {} fetched, {} removed, {} failed",
            self.total(),
            self.ok,
            self.fetched,
            self.removed,
            self.failed
        )
    }
}

/// Structured logger with summary collection.
///
/// All messages are also written to a persistent log file at
/// `$XDG_CACHE_HOME/ezdeps/<command>.log` (default `~/.cache/ezdeps/<command>.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    deps: Mutex<Vec<DepEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary.  The file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            deps: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "ezdeps::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record a dependency outcome for the summary.
    pub fn record(&self, name: &str, status: DepStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.deps.lock() {
            guard.push(DepEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return a copy of every recorded outcome, in record order.
    #[must_use]
    pub fn entries(&self) -> Vec<DepEntry> {
        self.deps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the recorded failures.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        Tally::of(&self.entries()).failed
    }

    /// Print the per-dependency summary, the tally and the log path.
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");
        for entry in &entries {
            let (icon, color) = match entry.status {
                DepStatus::Ok => ("✓", "\x1b[32m"),
                DepStatus::Fetched => ("↓", "\x1b[36m"),
                DepStatus::Removed => ("-", "\x1b[2m"),
                DepStatus::Failed => ("✗", "\x1b[31m"),
            };
            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", entry.name));
        }

        println!();
        let tally = Tally::of(&entries);
        if tally.failed > 0 {
            self.info(&format!("\x1b[31m{tally}\x1b[0m"));
        } else {
            self.info(&tally.to_string());
        }

        if let Some(path) = self.log_path() {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);

    fn record(&self, name: &str, status: DepStatus, message: Option<&str>) {
        self.record(name, status, message);
    }
}
