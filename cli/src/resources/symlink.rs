//! Symlink resource.
use std::io;
use std::path::{Path, PathBuf};

use super::helpers::fs::{create_symlink, remove_link};
use super::{EntryKind, LinkState};

/// A symlink that must exist at `target` and point to `source`.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The repository file the symlink points to.
    pub source: PathBuf,
    /// Where the symlink lives.
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Inspect what currently occupies the target path.
    ///
    /// A dangling symlink counts as present: it is reported as
    /// [`EntryKind::Symlink`] rather than [`LinkState::Absent`].
    ///
    /// # Errors
    ///
    /// Returns an error if the target's metadata or link text cannot be read
    /// for a reason other than the path not existing.
    pub fn current_state(&self) -> io::Result<LinkState> {
        let meta = match std::fs::symlink_metadata(&self.target) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LinkState::Absent),
            Err(e) => return Err(e),
        };

        let file_type = meta.file_type();
        if file_type.is_symlink() {
            let existing = std::fs::read_link(&self.target)?;
            return Ok(if self.points_to_source(&existing) {
                LinkState::Correct
            } else {
                LinkState::Foreign(EntryKind::Symlink(existing))
            });
        }
        if file_type.is_dir() {
            return Ok(LinkState::Foreign(EntryKind::Directory));
        }
        if file_type.is_file() {
            return Ok(LinkState::Foreign(EntryKind::File));
        }
        Ok(LinkState::Foreign(EntryKind::Other))
    }

    /// Create the symlink, replacing a stale symlink at the target.
    ///
    /// Anything other than a symlink at the target is left in place and
    /// reported as [`io::ErrorKind::AlreadyExists`]; callers move such
    /// content aside first.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is occupied by a non-symlink or the
    /// link cannot be replaced or created.
    pub fn apply(&self) -> io::Result<()> {
        match std::fs::symlink_metadata(&self.target) {
            Ok(meta) if meta.file_type().is_symlink() => remove_link(&self.target, &meta)?,
            Ok(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "target exists and is not a symlink",
                ));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        create_symlink(&self.source, &self.target, self.source.is_dir())
    }

    /// Whether link text `existing` refers to the managed source.
    ///
    /// Relative link text is resolved against the link's own directory.
    fn points_to_source(&self, existing: &Path) -> bool {
        if paths_equal(existing, &self.source) {
            return true;
        }
        if existing.is_relative()
            && let Some(parent) = self.target.parent()
        {
            return paths_equal(&normalize(&parent.join(existing)), &normalize(&self.source));
        }
        false
    }
}

/// Compare two paths for equality, handling UNC prefix normalization on Windows.
fn paths_equal(a: &Path, b: &Path) -> bool {
    let strip = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    strip(a) == strip(b)
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
