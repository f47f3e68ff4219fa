//! Tracing subscriber setup: console formatter, file layer, and initialisation.
//!
//! Both outputs render the same events. Operation events carry `action`,
//! `source` and `destination` fields, which the log file keeps as
//! tab-separated `key=value` columns after the shell-like command.
use std::fmt;
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use tracing::Level;
use tracing::field::{Field, Visit};

use super::types::Tone;
use super::utils::log_file_path;

/// Target of stage headers.
pub(super) const STAGE: &str = "dotlink::stage";
/// Target of performed filesystem operations.
pub(super) const OPERATION: &str = "dotlink::operation";
/// Target of operations logged in place of running them.
pub(super) const PLANNED: &str = "dotlink::planned";
/// Target of per-file result lines carrying a `tone` field.
pub(super) const RESULT: &str = "dotlink::result";

/// How an event is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    Operation { planned: bool },
    Toned,
    Info,
    Debug,
    Warn,
    Error,
}

impl Kind {
    fn of(metadata: &tracing::Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE) => Self::Stage,
            (Level::INFO, OPERATION) => Self::Operation { planned: false },
            (Level::INFO, PLANNED) => Self::Operation { planned: true },
            (Level::INFO, RESULT) => Self::Toned,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// The fields dotlink events carry.
#[derive(Debug, Default, PartialEq, Eq)]
struct Fields {
    message: String,
    action: Option<String>,
    source: Option<String>,
    destination: Option<String>,
    tone: Option<Tone>,
}

impl Fields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    fn set(&mut self, name: &str, value: String) {
        match name {
            "message" => self.message = value,
            "action" => self.action = Some(value),
            "source" => self.source = Some(value).filter(|v| !v.is_empty()),
            "destination" => self.destination = Some(value),
            "tone" => self.tone = Tone::from_name(&value),
            _ => {}
        }
    }

    /// `\taction=..\tsource=..\tdestination=..`, skipping absent fields.
    fn operation_columns(&self) -> String {
        [
            ("action", &self.action),
            ("source", &self.source),
            ("destination", &self.destination),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("\t{key}={v}")))
        .collect()
    }
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.set(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.set(field.name(), format!("{value:?}"));
    }
}

const fn tone_color(tone: Tone) -> &'static str {
    match tone {
        Tone::Good => "\x1b[32m",
        Tone::Changed => "\x1b[36m",
        Tone::Muted => "\x1b[2m",
        Tone::Pending => "\x1b[33m",
        Tone::Bad => "\x1b[31m",
    }
}

fn console_line(kind: Kind, fields: &Fields) -> String {
    let msg = &fields.message;
    match kind {
        Kind::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
        Kind::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        Kind::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
        Kind::Operation { planned: false } => format!("    \x1b[2m+ {msg}\x1b[0m"),
        Kind::Operation { planned: true } => format!("    \x1b[33m[DRY RUN]\x1b[0m {msg}"),
        Kind::Toned => match fields.tone {
            Some(tone) => format!("  {}{msg}\x1b[0m", tone_color(tone)),
            None => format!("  {msg}"),
        },
        Kind::Info => format!("  {msg}"),
        Kind::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

fn file_line(kind: Kind, fields: &Fields, time: &str) -> String {
    let msg = &fields.message;
    match kind {
        Kind::Stage => format!("[{time}] ==> {msg}"),
        Kind::Operation { planned } => {
            let tag = if planned { "[dry run] " } else { "" };
            format!("[{time}]     {tag}+ {msg}{}", fields.operation_columns())
        }
        Kind::Error => format!("[{time}]     [error] {msg}"),
        Kind::Warn => format!("[{time}]     [warn] {msg}"),
        Kind::Debug => format!("[{time}]     [debug] {msg}"),
        Kind::Toned | Kind::Info => format!("[{time}]     {msg}"),
    }
}

/// A [`tracing_subscriber::Layer`] that appends every event to
/// `$XDG_CACHE_HOME/dotlink/<command>.log`, at `DEBUG` and above regardless
/// of the console verbosity.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command` and write a one-line run header.
    ///
    /// Returns `None` if the file cannot be created.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let header = format!(
            "# dotlink {} {command} started {}\n",
            crate::commands::version::VERSION,
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let time = Utc::now().format("%H:%M:%S").to_string();
        let line = file_line(Kind::of(event.metadata()), &Fields::of(event), &time);
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits dotlink-style
/// console output.
#[derive(Debug)]
struct DotlinkFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for DotlinkFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let line = console_line(Kind::of(event.metadata()), &Fields::of(event));
        writeln!(writer, "{line}")
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout (warnings and errors to stderr); the log
/// file receives everything including `debug`. Must be called once at
/// program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(DotlinkFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
