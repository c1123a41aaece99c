use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

pub const LOG_DIR: &str = "logs";

/// Installs the global subscriber: a rotating plain-text file log for the
/// whole run and a terse colored console layer for errors only.
///
/// Progress meant for the operator is printed by the application itself, so
/// the console layer stays quiet unless something breaks.
pub fn setup_logger() -> Option<WorkerGuard> {
    if std::fs::create_dir_all(LOG_DIR).is_err() {
        return None;
    }

    let file_appender = tracing_appender::rolling::hourly(LOG_DIR, "app");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = tracing_subscriber::filter::Targets::new()
        .with_target("ethers_providers", tracing::Level::WARN)
        .with_target("hyper", tracing::Level::WARN)
        .with_default(tracing::Level::INFO);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(file_filter);

    let console_filter =
        tracing_subscriber::filter::Targets::new().with_default(tracing::Level::ERROR);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(console_filter);

    // try_init: a second call (tests, embedding) keeps the first subscriber
    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .ok()?;

    Some(guard)
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn extract_message(event: &Event<'_>) -> String {
    let mut visitor = MessageVisitor {
        message: String::new(),
    };
    event.record(&mut visitor);
    visitor.message
}

/// Paints SUCCESS/FAILED markers so status words stand out on the terminal.
pub fn colorize_status(msg: &str) -> String {
    if msg.contains("SUCCESS") || msg.contains("Success") {
        let green_text = Style::new().fg(Color::LightGreen).bold();
        msg.replace("SUCCESS", &format!("{}", green_text.paint("SUCCESS")))
            .replace("Success", &format!("{}", green_text.paint("Success")))
    } else if msg.contains("FAILED") || msg.contains("Failed") {
        let red_text = Style::new().fg(Color::LightRed).bold();
        msg.replace("FAILED", &format!("{}", red_text.paint("FAILED")))
            .replace("Failed", &format!("{}", red_text.paint("Failed")))
    } else {
        msg.to_string()
    }
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let msg = extract_message(event);
        writeln!(writer, "{}", colorize_status(&msg))
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let meta = event.metadata();

        write!(writer, "{} [{}] [{}] ", timestamp, meta.level(), meta.target())?;
        writeln!(writer, "{}", extract_message(event))
    }
}
