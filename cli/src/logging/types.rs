//! Core logging types: per-file summary entries and the [`Log`] trait.
use crate::resources::Operation;

/// Per-file result for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Managed file label (`package/name`).
    pub name: String,
    /// Final status of the file.
    pub status: FileStatus,
    /// Optional detail message (backup location, error description).
    pub message: Option<String>,
}

/// Outcome for one managed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// The target was absent and is now linked.
    Linked,
    /// Existing content was moved to the backup directory, then linked.
    BackedUp,
    /// The target already was the correct symlink.
    AlreadyLinked,
    /// Dry run; the listed operations were not performed.
    DryRun,
    /// The file could not be processed; the run stopped here.
    Failed,
}

impl FileStatus {
    /// Summary icon.
    #[must_use]
    pub const fn icon(self) -> char {
        match self {
            Self::Linked => '✓',
            Self::BackedUp => '↻',
            Self::AlreadyLinked => '·',
            Self::DryRun => '~',
            Self::Failed => '✗',
        }
    }

    /// Console tone of the summary line.
    #[must_use]
    pub const fn tone(self) -> Tone {
        match self {
            Self::Linked => Tone::Good,
            Self::BackedUp => Tone::Changed,
            Self::AlreadyLinked => Tone::Muted,
            Self::DryRun => Tone::Pending,
            Self::Failed => Tone::Bad,
        }
    }
}

/// Colour hint carried as the `tone` field of a result line.
///
/// Messages themselves stay plain text; only the console formatter turns a
/// tone into colour, so the log file never sees escape codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Done and correct.
    Good,
    /// Done, with something moved aside.
    Changed,
    /// Nothing to do.
    Muted,
    /// Still to be done.
    Pending,
    /// Broken or failed.
    Bad,
}

impl Tone {
    /// Field value written into the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Changed => "changed",
            Self::Muted => "muted",
            Self::Pending => "pending",
            Self::Bad => "bad",
        }
    }

    /// Inverse of [`Tone::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Good, Self::Changed, Self::Muted, Self::Pending, Self::Bad]
            .into_iter()
            .find(|tone| tone.as_str() == name)
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) writes through `tracing`;
/// [`RecordingLog`](super::recording::RecordingLog) keeps everything in
/// memory so tests can assert on exactly what was reported.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a filesystem operation before it is performed (or, in a dry run,
    /// instead of performing it).
    fn operation(&self, op: &Operation, dry_run: bool);
    /// Record a per-file result for the summary.
    fn record_file(&self, name: &str, status: FileStatus, message: Option<&str>);
}
