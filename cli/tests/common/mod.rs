// Shared helpers for integration tests.
//
// Provides a temporary repository, home directory and working directory plus
// a fluent builder, so each integration test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use dotlink_cli::config::{Config, MANIFEST_FILE};
use dotlink_cli::logging::RecordingLog;
use dotlink_cli::resources::backup::FixedClock;
use dotlink_cli::tasks::Context;

/// Instant every test run's backup directory is named after.
pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .expect("valid timestamp")
}

/// Backup directory name produced at [`fixed_time`].
pub const BACKUP_NAME: &str = "backup-2024-01-02_03h04m05s";

/// An isolated `repo/`, `home/` and `cwd/` triple backed by a
/// [`tempfile::TempDir`], deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory holding the three subdirectories.
    pub dir: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create empty `repo/`, `home/` and `cwd/` directories.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        for sub in ["repo", "home", "cwd"] {
            std::fs::create_dir(dir.path().join(sub)).expect("create test dir");
        }
        Self { dir }
    }

    /// Path to the repository root.
    pub fn repo(&self) -> PathBuf {
        self.dir.path().join("repo")
    }

    /// Path to the home directory.
    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// Path the backup directory is created in.
    pub fn cwd(&self) -> PathBuf {
        self.dir.path().join("cwd")
    }

    /// Load `repo/dotlink.toml`.
    pub fn load_config(&self) -> Config {
        Config::load(&self.repo(), &self.home(), None).expect("load config")
    }

    /// Installer context with a frozen clock and a fresh recording logger.
    pub fn context(&self, dry_run: bool) -> (Context, Arc<RecordingLog>) {
        let log = Arc::new(RecordingLog::new());
        let ctx = Context::new(self.repo(), self.home(), self.cwd(), log.clone())
            .with_dry_run(dry_run)
            .with_clock(Arc::new(FixedClock(fixed_time())));
        (ctx, log)
    }

    /// Entries of the backup parent directory, sorted.
    pub fn backup_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = std::fs::read_dir(self.cwd())
            .expect("read cwd")
            .map(|e| e.expect("dir entry").path())
            .collect();
        dirs.sort();
        dirs
    }

    /// Assert `target` is a symlink whose link text is `source`.
    pub fn assert_linked(&self, target: &Path, source: &Path) {
        let meta = target.symlink_metadata().expect("target exists");
        assert!(meta.file_type().is_symlink(), "{} is not a symlink", target.display());
        assert_eq!(std::fs::read_link(target).expect("read link"), source);
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new, empty context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` as the repository's `dotlink.toml`.
    pub fn with_manifest(self, content: &str) -> Self {
        std::fs::write(self.ctx.repo().join(MANIFEST_FILE), content).expect("write manifest");
        self
    }

    /// Create `repo/<path>` with `content`, creating parents.
    pub fn with_source(self, path: &str, content: &str) -> Self {
        write_file(&self.ctx.repo().join(path), content);
        self
    }

    /// Create `home/<path>` with `content`, creating parents.
    pub fn with_home_file(self, path: &str, content: &str) -> Self {
        write_file(&self.ctx.home().join(path), content);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write file");
}
