use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::parser::{ParseLogKind, ParseLogSink};
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Target used for parser trace lines.
pub const PARSE_TRACE_TARGET: &str = "treescope::parse";

/// Filter used when `RUST_LOG` is unset. Parser traces are only emitted
/// while a session has log output on, so they pass at trace level.
pub const DEFAULT_FILTER: &str = "info,treescope::parse=trace";

/// Install the process-wide subscriber, logging to `config.log_dir`.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(
    config: &ExplorerConfig,
    component: &str,
    to_stderr: bool,
) -> Result<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let (subscriber, guard) = build_subscriber(&config.log_dir, component, filter, to_stderr)?;
    if subscriber.try_init().is_err() {
        tracing::debug!("Global subscriber already set; keeping it");
    }
    Ok(guard)
}

/// Subscriber writing to a daily file under `log_dir`, optionally mirrored
/// to stderr.
pub fn build_subscriber(
    log_dir: &Path,
    component: &str,
    filter: EnvFilter,
    to_stderr: bool,
) -> Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)?;

    // Daily files named after the component, e.g. explorer.2024-01-21
    let file_appender = tracing_appender::rolling::daily(log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);
    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer);
    Ok((subscriber, guard))
}

/// Formats one parser trace line the way the log output channel shows it.
pub fn format_parse_trace(kind: ParseLogKind, message: &str) -> String {
    match kind {
        ParseLogKind::Lex => format!("[LEX]: {}", message),
        ParseLogKind::Parse => format!("[PARSE]: {}", message),
    }
}

/// Sink forwarding parser trace lines to `tracing`.
pub fn tracing_parse_sink(document: String) -> ParseLogSink {
    Box::new(move |kind, message| {
        tracing::trace!(
            target: PARSE_TRACE_TARGET,
            document = %document,
            "{}",
            format_parse_trace(kind, message)
        );
    })
}
