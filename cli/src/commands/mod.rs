//! Top-level subcommand orchestration.
pub mod install;
pub mod status;
pub mod version;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{Config, MANIFEST_FILE};
use crate::logging::Logger;

/// Shared state produced by the common command setup sequence.
///
/// Resolves the repository root, home directory and backup location, then
/// loads the manifest, so each command does not repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded manifest with absolute source and target paths.
    pub config: Config,
    /// Where the run's backup directory goes.
    pub backup_parent: PathBuf,
}

impl CommandSetup {
    /// Resolve all paths and load the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the root or home directory cannot be determined,
    /// or if the manifest is missing or invalid.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let root = resolve_root(global)?;
        let home = resolve_home(global)?;
        let backup_parent = resolve_backup_parent(global)?;
        log.debug(&format!("root: {}", root.display()));
        log.debug(&format!("home: {}", home.display()));
        log.debug(&format!("backup parent: {}", backup_parent.display()));

        log.stage("Loading manifest");
        let config = Config::load(&root, &home, global.manifest.as_deref())?;
        log.info(&format!(
            "{} managed file(s) from {}",
            config.files.len(),
            config.manifest.display()
        ));

        Ok(Self {
            config,
            backup_parent,
        })
    }
}

/// Resolve the repository root from CLI arguments or auto-detection.
///
/// # Errors
///
/// Returns an error if no root can be determined or it does not exist.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let root = root_candidate(global, std::env::var_os("DOTLINK_ROOT"), &cwd)?;
    dunce::canonicalize(&root)
        .with_context(|| format!("repository root {}", root.display()))
}

/// Pick the root: `--root`, then `DOTLINK_ROOT`, then the directory of an
/// explicit `--manifest`, then the current directory if it holds a manifest.
fn root_candidate(global: &GlobalOpts, env: Option<OsString>, cwd: &Path) -> Result<PathBuf> {
    if let Some(root) = &global.root {
        return Ok(root.clone());
    }
    if let Some(root) = env.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    if let Some(parent) = global.manifest.as_deref().and_then(Path::parent)
        && !parent.as_os_str().is_empty()
    {
        return Ok(parent.to_path_buf());
    }
    if cwd.join(MANIFEST_FILE).is_file() {
        return Ok(cwd.to_path_buf());
    }
    anyhow::bail!(
        "cannot determine repository root: no {MANIFEST_FILE} in {}. Use --root or set DOTLINK_ROOT",
        cwd.display()
    );
}

/// Resolve the home directory: `--home`, else `HOME` (`USERPROFILE` first on Windows).
///
/// # Errors
///
/// Returns an error if no home directory is configured.
pub fn resolve_home(global: &GlobalOpts) -> Result<PathBuf> {
    let home = home_candidate(
        global.home.as_deref(),
        std::env::var_os("HOME"),
        std::env::var_os("USERPROFILE"),
    )?;
    std::path::absolute(&home).with_context(|| format!("home directory {}", home.display()))
}

fn home_candidate(
    explicit: Option<&Path>,
    home: Option<OsString>,
    userprofile: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(home) = explicit {
        return Ok(home.to_path_buf());
    }
    let (first, second) = if cfg!(windows) {
        (userprofile, home)
    } else {
        (home, userprofile)
    };
    first
        .or(second)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .context("neither HOME nor USERPROFILE is set; use --home")
}

/// Resolve where backups go: `--backup-parent`, else the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn resolve_backup_parent(global: &GlobalOpts) -> Result<PathBuf> {
    match &global.backup_parent {
        Some(dir) => std::path::absolute(dir)
            .with_context(|| format!("backup directory parent {}", dir.display())),
        None => std::env::current_dir().context("read current directory"),
    }
}
