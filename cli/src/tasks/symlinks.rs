//! Link managed files into the home directory, moving foreign content aside.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::Context;
use crate::config::ManagedFile;
use crate::config::validation::missing_sources;
use crate::error::InstallError;
use crate::logging::FileStatus;
use crate::resources::backup::BackupDir;
use crate::resources::helpers::fs::missing_parent;
use crate::resources::symlink::SymlinkResource;
use crate::resources::{LinkState, Operation};

/// What happened to one managed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The target was absent and has been linked.
    Linked,
    /// Existing content was moved to `backup`, then the target was linked.
    BackedUp {
        /// Where the displaced content now lives.
        backup: PathBuf,
    },
    /// The target already was the correct symlink; nothing was done.
    AlreadyLinked,
}

/// Per-file entry of a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// The file's target path.
    pub target: PathBuf,
    /// What the run did (or, in a dry run, would do) with it.
    pub outcome: Outcome,
}

/// Result of one installer run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Operations in the order they were performed (or planned, in a dry run).
    pub operations: Vec<Operation>,
    /// Outcomes in managed-file order.
    pub files: Vec<FileReport>,
    /// The run's backup directory, if anything had to be moved aside.
    pub backup_dir: Option<PathBuf>,
}

impl Report {
    /// Number of entries moved into the backup directory.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::Move { .. }))
            .count()
    }

    /// Whether the run found nothing to change.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Read-only view of one managed file.
#[derive(Debug, Clone)]
pub struct Inspection {
    /// The managed file.
    pub file: ManagedFile,
    /// Whether the repository source exists.
    pub source_exists: bool,
    /// What currently occupies the target.
    pub state: LinkState,
}

/// Inspect every managed file without touching the filesystem.
///
/// # Errors
///
/// Returns [`InstallError::Io`] if a target cannot be examined.
pub fn inspect(files: &[ManagedFile]) -> Result<Vec<Inspection>, InstallError> {
    files
        .iter()
        .map(|file| {
            let state = SymlinkResource::new(&file.source, &file.target)
                .current_state()
                .map_err(|e| InstallError::io("inspect", &file.target, e))?;
            Ok(Inspection {
                file: file.clone(),
                source_exists: file.source.exists(),
                state,
            })
        })
        .collect()
}

/// Make every managed file's target a symlink to its source.
///
/// Files are processed in order. A target that is already the correct
/// symlink is left alone; anything else found at a target is moved into the
/// run's backup directory first, which is created on first use. Every
/// operation is logged before it runs; in a dry run it is only logged.
///
/// # Errors
///
/// Returns [`InstallError::MissingSources`] before any change if a source
/// does not exist, [`InstallError::InsideRepository`] for a target reached
/// through a link into the repository, and [`InstallError::Io`] for the first
/// operation that fails. Files processed before the failure stay linked.
pub fn install(ctx: &Context, files: &[ManagedFile]) -> Result<Report, InstallError> {
    let missing = missing_sources(files);
    if !missing.is_empty() {
        for path in &missing {
            ctx.log
                .error(&format!("source missing: {}", path.display()));
        }
        return Err(InstallError::MissingSources(missing));
    }

    ctx.log.debug(&format!(
        "linking {} file(s) from {} into {}",
        files.len(),
        ctx.root.display(),
        ctx.home.display()
    ));

    let mut run = Run::new(ctx);
    for file in files {
        let label = file.label();
        ctx.log.info(&label);
        match run.link(file) {
            Ok(outcome) => {
                run.record(&label, &outcome);
                run.report.files.push(FileReport {
                    target: file.target.clone(),
                    outcome,
                });
            }
            Err(e) => {
                ctx.log
                    .record_file(&label, FileStatus::Failed, Some(&e.to_string()));
                return Err(e);
            }
        }
    }

    let mut report = run.report;
    if report.moves() > 0 {
        report.backup_dir = run.backup.path().map(Path::to_path_buf);
    }
    Ok(report)
}

/// State of one installer run.
struct Run<'a> {
    ctx: &'a Context,
    /// Canonical repository root.
    root: PathBuf,
    backup: BackupDir,
    /// Directories created (or planned) so far; keeps dry runs from planning
    /// the same `mkdir` twice.
    created_dirs: HashSet<PathBuf>,
    report: Report,
}

impl<'a> Run<'a> {
    fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            root: dunce::canonicalize(&ctx.root).unwrap_or_else(|_| ctx.root.clone()),
            backup: BackupDir::new(&ctx.backup_parent),
            created_dirs: HashSet::new(),
            report: Report::default(),
        }
    }

    fn link(&mut self, file: &ManagedFile) -> Result<Outcome, InstallError> {
        let resource = SymlinkResource::new(&file.source, &file.target);
        let state = resource
            .current_state()
            .map_err(|e| InstallError::io("inspect", &file.target, e))?;
        self.ctx
            .log
            .debug(&format!("{}: {state}", file.target.display()));

        if state == LinkState::Correct {
            return Ok(Outcome::AlreadyLinked);
        }
        self.ensure_outside_repository(&file.target)?;

        let mut backup = None;
        if state.needs_backup() {
            let (dir, fresh) = self.backup.resolve(self.ctx.clock.as_ref());
            if fresh {
                self.perform(Operation::CreateBackupDir { path: dir })?;
            }
            let to = self.backup.slot(file.base_name());
            self.perform(Operation::Move {
                from: file.target.clone(),
                to: to.clone(),
            })?;
            backup = Some(to);
        }

        if let Some(parent) = missing_parent(&file.target)
            && !self.created_dirs.contains(parent)
        {
            let parent = parent.to_path_buf();
            self.created_dirs.insert(parent.clone());
            self.perform(Operation::CreateDir { path: parent })?;
        }

        self.perform(Operation::Link {
            source: file.source.clone(),
            target: file.target.clone(),
        })?;

        Ok(backup.map_or(Outcome::Linked, |backup| Outcome::BackedUp { backup }))
    }

    /// Refuse a target whose parent resolves into the repository, such as a
    /// file reached through an already linked directory. Moving it would take
    /// the source itself out of the repository.
    fn ensure_outside_repository(&self, target: &Path) -> Result<(), InstallError> {
        let Some(resolved) = target.parent().and_then(|p| dunce::canonicalize(p).ok()) else {
            return Ok(());
        };
        if resolved.starts_with(&self.root) {
            return Err(InstallError::InsideRepository {
                target: target.to_path_buf(),
                resolved,
            });
        }
        Ok(())
    }

    /// Log `op`, then run it unless this is a dry run.
    fn perform(&mut self, op: Operation) -> Result<(), InstallError> {
        self.ctx.log.operation(&op, self.ctx.dry_run);
        if !self.ctx.dry_run {
            op.apply()?;
        }
        self.report.operations.push(op);
        Ok(())
    }

    fn record(&self, label: &str, outcome: &Outcome) {
        let log = &self.ctx.log;
        match outcome {
            Outcome::AlreadyLinked => log.record_file(label, FileStatus::AlreadyLinked, None),
            Outcome::Linked if self.ctx.dry_run => {
                log.record_file(label, FileStatus::DryRun, Some("would link"));
            }
            Outcome::BackedUp { backup } if self.ctx.dry_run => log.record_file(
                label,
                FileStatus::DryRun,
                Some(&format!("would back up to {}", backup.display())),
            ),
            Outcome::Linked => log.record_file(label, FileStatus::Linked, None),
            Outcome::BackedUp { backup } => log.record_file(
                label,
                FileStatus::BackedUp,
                Some(&backup.display().to_string()),
            ),
        }
    }
}
