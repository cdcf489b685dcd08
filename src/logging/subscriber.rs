//! Tracing subscriber setup: console formatter and initialisation.
use std::fmt::{self, Write as _};
use std::io::IsTerminal as _;

use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Collects the `message` field and every other field of a [`tracing::Event`].
#[derive(Debug, Default)]
struct MessageExtractor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for MessageExtractor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }
}

/// Render one log line: level tag, message, then `key=value` pairs.
fn render(level: Level, message: &str, fields: &[(&str, String)], ansi: bool) -> String {
    let (tag, color) = match level {
        Level::ERROR => ("ERROR", "31"),
        Level::WARN => ("WARN ", "33"),
        Level::INFO => ("INFO ", "34"),
        Level::DEBUG => ("DEBUG", "2"),
        Level::TRACE => ("TRACE", "2"),
    };

    let mut line = if ansi {
        format!("\x1b[{color}m{tag}\x1b[0m {message}")
    } else {
        format!("{tag} {message}")
    };
    for (key, value) in fields {
        if ansi {
            let _ = write!(line, " \x1b[2m{key}=\x1b[0m{value}");
        } else {
            let _ = write!(line, " {key}={value}");
        }
    }
    line
}

/// A [`FormatEvent`] that emits compact single-line console output.
struct A2toggleFormatter {
    ansi: bool,
}

impl<S, N> FormatEvent<S, N> for A2toggleFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let line = render(
            *event.metadata().level(),
            &extractor.message,
            &extractor.fields,
            self.ansi,
        );
        writeln!(writer, "{line}")
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Events go to stderr so that stdout carries only command results.  The
/// level defaults to `info` (`debug` with `verbose`); `RUST_LOG` overrides
/// it.  Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .event_format(A2toggleFormatter {
            ansi: std::io::stderr().is_terminal(),
        })
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
