use std::{
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Default filter when neither `--log-level` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "info";

// --- Formatter ---

/// One line per event: `<time> <LEVEL> [target:] <fields>`.
///
/// The terminal gets a short clock time and the event target only at
/// `debug` and `trace`. The log file gets a full local date for every line
/// and always names the target.
struct LocalFmt {
    file: bool,
}

impl LocalFmt {
    fn timestamp_format(&self) -> &'static str {
        if self.file {
            "%Y-%m-%d %H:%M:%S%.3f%:z"
        } else {
            "%H:%M:%S"
        }
    }

    fn shows_target(
        &self,
        level: Level,
    ) -> bool {
        self.file || level >= Level::DEBUG
    }
}

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let level = *meta.level();
        let (dim, bold, reset) = if writer.has_ansi_escapes() {
            ("\x1b[2m", level_color(level), "\x1b[0m")
        } else {
            ("", "", "")
        };

        let timestamp = Local::now().format(self.timestamp_format());
        write!(writer, "{dim}{timestamp}{reset} {bold}{level:>5}{reset} ")?;

        if self.shows_target(level) {
            write!(writer, "{dim}{}:{reset} ", meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

/// Builds the global filter.
///
/// An explicit `level` wins; otherwise `RUST_LOG` is honoured; otherwise `info`.
/// Accepts a bare level ("warn", "debug") or any full EnvFilter directive.
pub fn build_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("invalid log level '{level}': {e}")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Initializes logging. Call once at startup.
///
/// - Stderr: colored when attached to a terminal, plain when redirected. Reports
///   go to stdout, so logs never mix into piped output.
/// - File: appended to `log_file` when given. The directory must already exist.
pub fn init_logging(
    level: Option<&str>,
    log_file: Option<&Path>,
) -> Result<()> {
    let filter = build_filter(level)?;

    let file_layer = log_file
        .map(|path| {
            File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))
        })
        .transpose()?
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt { file: true })
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt { file: false })
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")
}
