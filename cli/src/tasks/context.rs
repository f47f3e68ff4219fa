use std::path::PathBuf;
use std::sync::Arc;

use crate::logging::Log;
use crate::resources::backup::{Clock, SystemClock};

/// Everything the installer needs from its environment, passed explicitly.
pub struct Context {
    /// Repository root the managed sources live under.
    pub root: PathBuf,
    /// Home directory targets are resolved against.
    pub home: PathBuf,
    /// Directory the run's backup directory is created in.
    pub backup_parent: PathBuf,
    /// Whether to log operations without performing them.
    pub dry_run: bool,
    /// Logger for output and per-file recording.
    pub log: Arc<dyn Log>,
    /// Time source for the backup directory name.
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root)
            .field("home", &self.home)
            .field("backup_parent", &self.backup_parent)
            .field("dry_run", &self.dry_run)
            .field("log", &"<dyn Log>")
            .field("clock", &"<dyn Clock>")
            .finish()
    }
}

impl Context {
    /// Creates a context using the system clock, with dry run disabled.
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        home: impl Into<PathBuf>,
        backup_parent: impl Into<PathBuf>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            root: root.into(),
            home: home.into(),
            backup_parent: backup_parent.into(),
            dry_run: false,
            log,
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the dry-run flag.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::RecordingLog;

    #[test]
    fn debug_hides_trait_objects() {
        let ctx = Context::new("/repo", "/home/u", "/cwd", Arc::new(RecordingLog::new()))
            .with_dry_run(true);
        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("dry_run: true"));
        assert!(rendered.contains("<dyn Log>"));
        assert!(rendered.contains("\"/home/u\""));
    }
}
