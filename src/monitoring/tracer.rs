/*!
 * Structured Tracing
 * Subscriber setup and per-command spans using the tracing crate
 *
 * Features:
 * - Env-filter driven levels (RUST_LOG)
 * - JSON-formatted logs for structured parsing
 * - One span per CLI command with outcome and duration
 */

use crate::core::limits::ENV_TRACE_JSON;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - PARTSIM_TRACE_JSON: Enable JSON output (default: false)
///
/// Logs go to stderr so stdout stays reserved for command output. Calling this
/// more than once is a no-op.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        debug!(json = use_json, "Tracing initialized");
    }
}

static NEXT_COMMAND: AtomicU64 = AtomicU64::new(1);

/// Span covering a single CLI command
pub struct CommandSpan {
    span: Span,
    start: Instant,
    seq: u64,
}

impl CommandSpan {
    pub fn new(command: &str) -> Self {
        let seq = NEXT_COMMAND.fetch_add(1, Ordering::Relaxed);
        let span = span!(
            Level::DEBUG,
            "command",
            seq,
            command = command,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            seq,
        }
    }

    /// Sequence number of this command within the process
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Run `f` inside the span
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        self.span.in_scope(f)
    }

    /// Record success and duration
    pub fn success(self) {
        self.finish("success", None);
    }

    /// Record failure and duration
    pub fn error(self, error: &str) {
        self.finish("error", Some(error));
    }

    fn finish(self, result: &str, error: Option<&str>) {
        let duration_us = self.start.elapsed().as_micros() as u64;
        self.span.record("duration_us", duration_us);
        self.span.record("result", result);
        if let Some(error) = error {
            self.span.record("error", error);
        }
        self.span.in_scope(|| debug!(duration_us, result, "command finished"));
    }
}

/// Helper to create a command span
#[inline]
pub fn span_command(command: &str) -> CommandSpan {
    CommandSpan::new(command)
}
