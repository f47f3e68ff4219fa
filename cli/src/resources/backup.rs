//! Lazily created, timestamp-named backup directory.
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// Prefix of every backup directory name.
pub const BACKUP_PREFIX: &str = "backup-";

/// `strftime` format of the timestamp part, e.g. `2024-01-02_03h04m05s`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%Hh%Mm%Ss";

/// Source of the current local time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// [`Clock`] backed by the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// [`Clock`] frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Directory name for a backup taken at `at`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use dotlink_cli::resources::backup::backup_dir_name;
///
/// let at = NaiveDate::from_ymd_opt(2024, 1, 2)
///     .and_then(|d| d.and_hms_opt(3, 4, 5))
///     .unwrap_or_default();
/// assert_eq!(backup_dir_name(at), "backup-2024-01-02_03h04m05s");
/// ```
#[must_use]
pub fn backup_dir_name(at: NaiveDateTime) -> String {
    format!("{BACKUP_PREFIX}{}", at.format(TIMESTAMP_FORMAT))
}

/// The backup directory of a single installer run.
///
/// The path is chosen the first time it is needed and then kept for the rest
/// of the run. If a directory with the timestamped name already exists (an
/// earlier run within the same second), a `-1`, `-2`, ... suffix is added so
/// runs never share a directory. Entry names are tracked so two displaced
/// files with the same base name do not overwrite each other.
#[derive(Debug)]
pub struct BackupDir {
    parent: PathBuf,
    path: Option<PathBuf>,
    entries: HashSet<OsString>,
}

impl BackupDir {
    /// A backup directory that will live under `parent` once resolved.
    #[must_use]
    pub fn new(parent: impl Into<PathBuf>) -> Self {
        Self {
            parent: parent.into(),
            path: None,
            entries: HashSet::new(),
        }
    }

    /// The resolved path, if any entry has been placed in this run.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Resolve the directory path, consulting `clock` only on first use.
    ///
    /// Returns the path and whether it was resolved by this call (i.e. the
    /// directory still has to be created).
    pub fn resolve(&mut self, clock: &dyn Clock) -> (PathBuf, bool) {
        if let Some(path) = &self.path {
            return (path.clone(), false);
        }

        let base = backup_dir_name(clock.now());
        let mut candidate = self.parent.join(&base);
        let mut n = 1u32;
        while candidate.symlink_metadata().is_ok() {
            candidate = self.parent.join(format!("{base}-{n}"));
            n += 1;
        }
        self.path = Some(candidate.clone());
        (candidate, true)
    }

    /// Reserve a destination inside the resolved directory for `base_name`.
    ///
    /// Repeated base names get a `.1`, `.2`, ... suffix. Call
    /// [`resolve`](Self::resolve) first; before that, slots land in `parent`.
    pub fn slot(&mut self, base_name: &OsStr) -> PathBuf {
        let dir = self.path.clone().unwrap_or_else(|| self.parent.clone());
        let mut name = base_name.to_os_string();
        let mut n = 1u32;
        while self.entries.contains(&name) {
            name = base_name.to_os_string();
            name.push(format!(".{n}"));
            n += 1;
        }
        self.entries.insert(name.clone());
        dir.join(name)
    }
}
