//! File-system resource helpers.
use std::io;
use std::path::Path;

/// Return the parent of `path` if it does not exist yet as a directory.
#[must_use]
pub fn missing_parent(path: &Path) -> Option<&Path> {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty() && !parent.is_dir())
}

/// Move `from` to `to`, which must not exist yet.
///
/// Tries a rename first. When the rename crosses a filesystem boundary the
/// tree is copied (symlinks are recreated, not followed) and the original is
/// removed only after the copy completed.
///
/// # Errors
///
/// Returns an error if `to` already exists, or if neither the rename nor the
/// copy fallback succeed.
pub fn move_path(from: &Path, to: &Path) -> io::Result<()> {
    if to.symlink_metadata().is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination exists: {}", to.display()),
        ));
    }

    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            if let Err(copy_err) = copy_tree(from, to) {
                let _ = remove_tree(to);
                return Err(copy_err);
            }
            remove_tree(from)
        }
        Err(e) => Err(e),
    }
}

/// Recursively copy `src` to `dst` without following symlinks.
///
/// # Errors
///
/// Returns an error if an entry cannot be read, created, or copied.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    let meta = std::fs::symlink_metadata(src)?;
    if meta.file_type().is_symlink() {
        let dest = std::fs::read_link(src)?;
        let dir_hint = src.is_dir();
        return create_symlink(&dest, dst, dir_hint);
    }
    if meta.is_dir() {
        std::fs::create_dir(dst)?;
        for entry in std::fs::read_dir(src)? {
            let entry = entry?;
            copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
        }
        std::fs::set_permissions(dst, meta.permissions())?;
        return Ok(());
    }
    std::fs::copy(src, dst).map(|_| ())
}

/// Remove `path` whatever it is; directories are removed recursively,
/// symlinks are removed without touching what they point to.
///
/// # Errors
///
/// Returns an error if removal fails.
pub fn remove_tree(path: &Path) -> io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        remove_link(path, &meta)
    }
}

/// Create a symlink at `link` pointing to `dest`.
///
/// `dir_hint` selects a directory symlink on Windows; it is ignored on Unix.
///
/// # Errors
///
/// Returns an error if the link cannot be created.
pub fn create_symlink(dest: &Path, link: &Path, dir_hint: bool) -> io::Result<()> {
    #[cfg(unix)]
    {
        let _ = dir_hint;
        std::os::unix::fs::symlink(dest, link)
    }

    #[cfg(windows)]
    {
        if dir_hint {
            std::os::windows::fs::symlink_dir(dest, link)
        } else {
            std::os::windows::fs::symlink_file(dest, link)
        }
    }
}

/// Remove a file or symlink described by `meta`.
///
/// On Windows, directory symlinks must be removed with `remove_dir`, and
/// `symlink_metadata().is_dir()` is `false` for them, so the raw
/// `FILE_ATTRIBUTE_DIRECTORY` flag is checked instead.
///
/// # Errors
///
/// Returns an error if removal fails.
pub fn remove_link(path: &Path, meta: &std::fs::Metadata) -> io::Result<()> {
    if is_dir_like(meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        let _ = meta;
        false
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_parent_reports_absent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("file.txt");
        assert_eq!(missing_parent(&nested), Some(dir.path().join("a/b").as_path()));
    }

    #[test]
    fn missing_parent_none_when_parent_exists() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(missing_parent(&dir.path().join("file.txt")), None);
    }

    #[test]
    fn move_renames_file_with_content() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("from");
        let to = dir.path().join("to");
        std::fs::write(&from, "old config").unwrap();

        move_path(&from, &to).unwrap();

        assert!(from.symlink_metadata().is_err());
        assert_eq!(std::fs::read_to_string(&to).unwrap(), "old config");
    }

    #[test]
    fn move_refuses_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("from");
        let to = dir.path().join("to");
        std::fs::write(&from, "a").unwrap();
        std::fs::write(&to, "b").unwrap();

        let err = move_path(&from, &to).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read_to_string(&from).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(&to).unwrap(), "b");
    }

    #[test]
    fn copy_tree_copies_files_and_subdirectories() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("a.txt"), b"aaa").unwrap();
        std::fs::create_dir(src.path().join("sub")).unwrap();
        std::fs::write(src.path().join("sub/b.txt"), b"bbb").unwrap();

        let target = dst.path().join("out");
        copy_tree(src.path(), &target).unwrap();

        assert_eq!(std::fs::read(target.join("a.txt")).unwrap(), b"aaa");
        assert_eq!(std::fs::read(target.join("sub/b.txt")).unwrap(), b"bbb");
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_recreates_symlinks() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("/nonexistent/elsewhere", src.path().join("link")).unwrap();

        let target = dst.path().join("out");
        copy_tree(src.path(), &target).unwrap();

        assert_eq!(
            std::fs::read_link(target.join("link")).unwrap(),
            Path::new("/nonexistent/elsewhere")
        );
    }

    #[test]
    fn remove_tree_removes_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("f"), "x").unwrap();
        remove_tree(&sub).unwrap();
        assert!(!sub.exists());
    }

    #[cfg(unix)]
    #[test]
    fn remove_tree_leaves_symlink_destination_alone() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        let link = dir.path().join("link");
        std::fs::create_dir(&real).unwrap();
        std::fs::write(real.join("keep"), "x").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        remove_tree(&link).unwrap();

        assert!(link.symlink_metadata().is_err());
        assert!(real.join("keep").exists());
    }
}
