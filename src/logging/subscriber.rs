//! Global subscriber: a coloured console view plus a per-command run log.
//!
//! Both outputs classify events the same way through [`LineKind`], so a
//! stage header on the terminal is also a stage header in the run log.
use std::fs::File;
use std::io::{LineWriter, Write as _};
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "ezdeps::stage";

/// How an event is rendered, on either output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Stage,
    Error,
    Warn,
    Info,
    Detail,
}

impl LineKind {
    fn of(metadata: &Metadata<'_>) -> Self {
        match *metadata.level() {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO if metadata.target() == STAGE_TARGET => Self::Stage,
            Level::INFO => Self::Info,
            _ => Self::Detail,
        }
    }

    /// Run log rendering, without timestamp.
    fn plain(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("==> {msg}"),
            Self::Error => format!("    [error] {msg}"),
            Self::Warn => format!("    [warn] {msg}"),
            Self::Info => format!("    {msg}"),
            Self::Detail => format!("    [debug] {msg}"),
        }
    }

    /// Terminal rendering with ANSI colours.
    fn coloured(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Detail => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Collects the `message` field of an event into the borrowed buffer.
struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(self.0);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        }
    }
}

fn event_message(event: &Event<'_>) -> String {
    let mut message = String::new();
    event.record(&mut MessageVisitor(&mut message));
    message
}

/// Banner written at the top of every run log.
fn run_banner(command: &str) -> String {
    let rule = "=".repeat(42);
    let version =
        option_env!("EZDEPS_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
    format!(
        "{rule}\nezdeps {version} {command} {}\n{rule}\n",
        format_utc_datetime()
    )
}

/// Appends every event, timestamped and stripped of ANSI codes, to the
/// command's run log under the cache directory.
#[derive(Debug)]
pub(super) struct RunLogLayer {
    out: Mutex<LineWriter<File>>,
}

impl RunLogLayer {
    /// Start a fresh run log for `command`.
    ///
    /// Returns `None` when the cache directory or the file is unavailable;
    /// the run then logs to the console only.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let mut file = File::create(&path).ok()?;
        file.write_all(run_banner(command).as_bytes()).ok()?;
        Some(Self {
            out: Mutex::new(LineWriter::new(file)),
        })
    }
}

impl<S: Subscriber> tracing_subscriber::Layer<S> for RunLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let body = LineKind::of(event.metadata()).plain(&strip_ansi(&event_message(event)));
        if let Ok(mut out) = self.out.lock() {
            writeln!(out, "[{}] {body}", format_utc_time()).ok();
        }
    }
}

/// Console event format built on [`LineKind::coloured`].
struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let kind = LineKind::of(event.metadata());
        writeln!(writer, "{}", kind.coloured(&event_message(event)))
    }
}

/// Install the global subscriber for one run of `command`.
///
/// The console shows `INFO` and above (`DEBUG` with `verbose`), sending
/// warnings and errors to stderr and the rest to stdout.  The run log at
/// `$XDG_CACHE_HOME/ezdeps/<command>.log` always receives `DEBUG` and above.
/// Call once, before anything logs.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{Layer as _, fmt, layer::SubscriberExt as _};
    use tracing_subscriber::util::SubscriberInitExt as _;

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(ConsoleFormat)
                .with_writer(console_writer)
                .with_filter(console_level),
        )
        .with(RunLogLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG)))
        .init();
}
