//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{OPERATION, PLANNED, RESULT, STAGE};
use super::types::{FileEntry, FileStatus, Log, Tone};
use super::utils::log_file_path;
use crate::resources::Operation;

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

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/dotlink/<command>.log` (default `~/.cache/dotlink/<command>.log`)
/// with timestamps, regardless of the verbose flag. Messages are plain text;
/// colour is chosen by the console formatter.
#[derive(Debug)]
pub struct Logger {
    files: Mutex<Vec<FileEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary. The file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            files: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded file entries (test-only).
    #[cfg(test)]
    pub(crate) fn file_entries(&self) -> Vec<FileEntry> {
        self.files.lock().map_or_else(|_| vec![], |g| g.clone())
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
        tracing::info!(target: STAGE, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file via the [`FileLayer`](super::subscriber::FileLayer)).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a per-file result line, coloured by `tone` on the console.
    pub fn result(&self, tone: Tone, msg: &str) {
        tracing::info!(target: RESULT, tone = tone.as_str(), "{msg}");
    }

    /// Log a filesystem operation with its action and paths as fields.
    pub fn operation(&self, op: &Operation, dry_run: bool) {
        let source = op
            .source()
            .map_or_else(String::new, |p| p.display().to_string());
        let destination = op.destination().display().to_string();
        if dry_run {
            tracing::info!(
                target: PLANNED,
                action = op.kind(),
                source = source.as_str(),
                destination = destination.as_str(),
                "{op}"
            );
        } else {
            tracing::info!(
                target: OPERATION,
                action = op.kind(),
                source = source.as_str(),
                destination = destination.as_str(),
                "{op}"
            );
        }
    }

    /// Record a file result for the summary.
    pub fn record_file(&self, name: &str, status: FileStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.files.lock() {
            guard.push(FileEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Print the summary of all recorded files.
    pub fn print_summary(&self) {
        let files = match self.files.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        if files.is_empty() {
            return;
        }

        self.stage("Summary");

        let count = |status| files.iter().filter(|f| f.status == status).count();
        for file in &files {
            let suffix = file
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.result(
                file.status.tone(),
                &format!("{} {}{suffix}", file.status.icon(), file.name),
            );
        }

        self.info(&format!(
            "{} files: {} linked, {} backed up, {} already linked, {} dry-run, {} failed",
            files.len(),
            count(FileStatus::Linked),
            count(FileStatus::BackedUp),
            count(FileStatus::AlreadyLinked),
            count(FileStatus::DryRun),
            count(FileStatus::Failed),
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("log: {}", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);

    fn operation(&self, op: &Operation, dry_run: bool) {
        self.operation(op, dry_run);
    }

    fn record_file(&self, name: &str, status: FileStatus, message: Option<&str>) {
        self.record_file(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    fn read_log(log: &Logger) -> String {
        let path = log.log_path().expect("log path should exist");
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn logger_new() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.file_entries().is_empty(), "expected empty file list");
    }

    #[test]
    fn record_file_with_message() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_file(".vimrc", FileStatus::BackedUp, Some("backup-x/.vimrc"));
        let files = log.file_entries();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, ".vimrc");
        assert_eq!(files[0].status, FileStatus::BackedUp);
        assert_eq!(files[0].message.as_deref(), Some("backup-x/.vimrc"));
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.record_file("via-trait", FileStatus::Linked, None);
        assert_eq!(log.file_entries().len(), 1);
    }

    #[test]
    fn log_file_is_created() {
        let (log, _tmp, _guard) = isolated_logger();
        let path = log.log_path().expect("log path should exist");
        assert!(path.exists(), "log file should be created by the file layer");
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = read_log(&log);
        assert!(contents.contains("[debug]"));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn warn_and_error_tagged_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.warn("careful");
        log.error("broken");
        let contents = read_log(&log);
        assert!(contents.contains("[warn] careful"));
        assert!(contents.contains("[error] broken"));
    }

    #[test]
    fn stage_written_to_file_with_arrow() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Linking files");
        assert!(read_log(&log).contains("==> Linking files"));
    }

    /// Parse the `key=value` columns of the first `+` line containing `cmd`.
    fn operation_columns(contents: &str, cmd: &str) -> Vec<(String, String)> {
        let line = contents
            .lines()
            .find(|l| l.contains(&format!("+ {cmd}")))
            .expect("operation line in log");
        line.split('\t')
            .skip(1)
            .filter_map(|col| col.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn operation_written_to_file_with_fields() {
        let (log, _tmp, _guard) = isolated_logger();
        let op = Operation::Move {
            from: PathBuf::from("/home/u/.vimrc"),
            to: PathBuf::from("/cwd/backup/.vimrc"),
        };
        log.operation(&op, false);
        let columns = operation_columns(&read_log(&log), "mv /home/u/.vimrc /cwd/backup/.vimrc");
        assert_eq!(
            columns,
            vec![
                ("action".to_string(), "move".to_string()),
                ("source".to_string(), "/home/u/.vimrc".to_string()),
                ("destination".to_string(), "/cwd/backup/.vimrc".to_string()),
            ]
        );
    }

    #[test]
    fn dry_run_operation_written_with_tag_and_fields() {
        let (log, _tmp, _guard) = isolated_logger();
        let op = Operation::Link {
            source: PathBuf::from("/repo/.vimrc"),
            target: PathBuf::from("/home/u/.vimrc"),
        };
        log.operation(&op, true);
        let contents = read_log(&log);
        assert!(contents.contains("[dry run] + ln -sfn /repo/.vimrc /home/u/.vimrc"));
        let columns = operation_columns(&contents, "ln -sfn");
        assert!(columns.contains(&("action".to_string(), "link".to_string())));
        assert!(columns.contains(&("destination".to_string(), "/home/u/.vimrc".to_string())));
    }

    #[test]
    fn summary_lines_are_plain_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_file("vim/.vimrc", FileStatus::Linked, None);
        log.record_file("zsh/.zshrc", FileStatus::Failed, Some("link: denied"));
        log.print_summary();
        let contents = read_log(&log);
        assert!(contents.contains("✓ vim/.vimrc"));
        assert!(contents.contains("✗ zsh/.zshrc (link: denied)"));
        assert!(contents.contains("2 files: 1 linked, 0 backed up, 0 already linked, 0 dry-run, 1 failed"));
        assert!(!contents.contains('\x1b'));
    }
}
