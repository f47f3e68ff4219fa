//! In-memory [`Log`] implementation.
use std::sync::Mutex;

use super::types::{FileEntry, FileStatus, Log};
use crate::resources::Operation;

/// A single recorded log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// A stage header entry.
    Stage(String),
    /// An informational entry.
    Info(String),
    /// A debug entry.
    Debug(String),
    /// A warning entry.
    Warn(String),
    /// An error entry.
    Error(String),
    /// A filesystem operation, performed or (in a dry run) only announced.
    Operation {
        /// The operation.
        op: Operation,
        /// Whether it was logged in place of being performed.
        dry_run: bool,
    },
}

/// Implement the display methods of [`Log`] by recording each message into
/// `self.entries` as the corresponding [`LogEntry`] variant.
macro_rules! record_log_methods {
    ($($method:ident => $variant:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                if let Ok(mut guard) = self.entries.lock() {
                    guard.push(LogEntry::$variant(msg.to_string()));
                }
            }
        )+
    };
}

/// Logger that keeps every call in memory and writes nothing.
///
/// Used by tests and by callers that want to inspect exactly which
/// operations a run performed.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<LogEntry>>,
    files: Mutex<Vec<FileEntry>>,
}

impl RecordingLog {
    /// Create an empty recording logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded log calls, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// The recorded operations, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                LogEntry::Operation { op, .. } => Some(op),
                _ => None,
            })
            .collect()
    }

    /// The recorded per-file results, in order.
    #[must_use]
    pub fn files(&self) -> Vec<FileEntry> {
        self.files.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

impl Log for RecordingLog {
    record_log_methods! {
        stage => Stage,
        info  => Info,
        debug => Debug,
        warn  => Warn,
        error => Error,
    }

    fn operation(&self, op: &Operation, dry_run: bool) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(LogEntry::Operation {
                op: op.clone(),
                dry_run,
            });
        }
    }

    fn record_file(&self, name: &str, status: FileStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.files.lock() {
            guard.push(FileEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
