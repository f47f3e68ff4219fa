//! Idempotent filesystem primitives (inspect + apply pattern).
//!
//! Every mutation the installer performs is expressed as an [`Operation`]
//! so it can be logged before it runs and recorded in the run report.
pub mod backup;
pub mod helpers;
pub mod symlink;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::InstallError;

/// What currently occupies a target path that is not the expected symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A real directory (not a symlink to one).
    Directory,
    /// A symlink pointing somewhere other than the managed source.
    Symlink(PathBuf),
    /// Anything else (fifo, socket, device).
    Other,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "regular file"),
            Self::Directory => write!(f, "directory"),
            Self::Symlink(dest) => write!(f, "symlink to {}", dest.display()),
            Self::Other => write!(f, "special file"),
        }
    }
}

/// State of a managed target path.
///
/// # Examples
///
/// ```
/// use dotlink_cli::resources::{EntryKind, LinkState};
///
/// assert!(!LinkState::Absent.needs_backup());
/// assert!(!LinkState::Correct.needs_backup());
/// assert!(LinkState::Foreign(EntryKind::File).needs_backup());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing exists at the target path.
    Absent,
    /// The target is a symlink to the managed source.
    Correct,
    /// Something else occupies the target and must be moved aside first.
    Foreign(EntryKind),
}

impl LinkState {
    /// Whether the target must be relocated to the backup directory.
    #[must_use]
    pub const fn needs_backup(&self) -> bool {
        matches!(self, Self::Foreign(_))
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "missing"),
            Self::Correct => write!(f, "linked"),
            Self::Foreign(kind) => write!(f, "occupied by {kind}"),
        }
    }
}

/// A single filesystem mutation planned or performed by the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create the run's backup directory.
    CreateBackupDir {
        /// Directory to create.
        path: PathBuf,
    },
    /// Move an existing target into the backup directory.
    Move {
        /// Current location of the displaced entry.
        from: PathBuf,
        /// Location inside the backup directory.
        to: PathBuf,
    },
    /// Create a missing parent directory of a target.
    CreateDir {
        /// Directory to create, with intermediates.
        path: PathBuf,
    },
    /// Create or replace the symlink at `target` pointing to `source`.
    Link {
        /// Repository file the link points to.
        source: PathBuf,
        /// Link location under the home directory.
        target: PathBuf,
    },
}

impl Operation {
    /// Short machine-readable action name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateBackupDir { .. } => "backup-dir",
            Self::Move { .. } => "move",
            Self::CreateDir { .. } => "mkdir",
            Self::Link { .. } => "link",
        }
    }

    /// The path read from, if the action has one.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        match self {
            Self::Move { from, .. } => Some(from),
            Self::Link { source, .. } => Some(source),
            Self::CreateBackupDir { .. } | Self::CreateDir { .. } => None,
        }
    }

    /// The path written to.
    #[must_use]
    pub fn destination(&self) -> &Path {
        match self {
            Self::CreateBackupDir { path } | Self::CreateDir { path } => path,
            Self::Move { to, .. } => to,
            Self::Link { target, .. } => target,
        }
    }

    /// Perform the operation.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Io`] naming the step and path if the
    /// filesystem call fails.
    pub fn apply(&self) -> Result<(), InstallError> {
        match self {
            Self::CreateBackupDir { path } => std::fs::create_dir_all(path)
                .map_err(|e| InstallError::io("create backup dir", path, e)),
            Self::CreateDir { path } => {
                std::fs::create_dir_all(path).map_err(|e| InstallError::io("mkdir", path, e))
            }
            Self::Move { from, to } => {
                helpers::fs::move_path(from, to).map_err(|e| InstallError::io("move", from, e))
            }
            Self::Link { source, target } => symlink::SymlinkResource::new(source, target)
                .apply()
                .map_err(|e| InstallError::io("link", target, e)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateBackupDir { path } | Self::CreateDir { path } => {
                write!(f, "mkdir -p {}", path.display())
            }
            Self::Move { from, to } => write!(f, "mv {} {}", from.display(), to.display()),
            Self::Link { source, target } => {
                write!(f, "ln -sfn {} {}", source.display(), target.display())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn operations_render_as_shell_commands() {
        let ops = [
            Operation::CreateBackupDir {
                path: PathBuf::from("/cwd/backup-2024-01-02_03h04m05s"),
            },
            Operation::Move {
                from: PathBuf::from("/home/u/.vimrc"),
                to: PathBuf::from("/cwd/backup-2024-01-02_03h04m05s/.vimrc"),
            },
            Operation::CreateDir {
                path: PathBuf::from("/home/u/.config/nvim"),
            },
            Operation::Link {
                source: PathBuf::from("/repo/vim/.vimrc"),
                target: PathBuf::from("/home/u/.vimrc"),
            },
        ];
        let rendered: Vec<String> = ops.iter().map(ToString::to_string).collect();
        insta::assert_snapshot!(rendered.join("\n"), @r"
        mkdir -p /cwd/backup-2024-01-02_03h04m05s
        mv /home/u/.vimrc /cwd/backup-2024-01-02_03h04m05s/.vimrc
        mkdir -p /home/u/.config/nvim
        ln -sfn /repo/vim/.vimrc /home/u/.vimrc
        ");
    }

    #[test]
    fn operation_fields() {
        let op = Operation::Move {
            from: PathBuf::from("/a"),
            to: PathBuf::from("/b"),
        };
        assert_eq!(op.kind(), "move");
        assert_eq!(op.source(), Some(Path::new("/a")));
        assert_eq!(op.destination(), Path::new("/b"));

        let op = Operation::CreateDir {
            path: PathBuf::from("/d"),
        };
        assert_eq!(op.kind(), "mkdir");
        assert_eq!(op.source(), None);
    }

    #[test]
    fn link_state_display() {
        assert_eq!(LinkState::Absent.to_string(), "missing");
        assert_eq!(LinkState::Correct.to_string(), "linked");
        assert_eq!(
            LinkState::Foreign(EntryKind::Symlink(PathBuf::from("/x"))).to_string(),
            "occupied by symlink to /x"
        );
    }

    #[test]
    fn apply_create_dir_makes_intermediates() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        Operation::CreateDir {
            path: nested.clone(),
        }
        .apply()
        .unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn apply_move_failure_names_step_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("missing");
        let err = Operation::Move {
            from: from.clone(),
            to: dir.path().join("dest"),
        }
        .apply()
        .unwrap_err();
        assert!(matches!(&err, InstallError::Io { op: "move", path, .. } if *path == from));
    }
}
