//! Manifest entry validation.
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use super::ManagedFile;
use crate::error::ConfigError;

/// Check that `name` is a plain relative path that stays inside its base
/// directory (both in the repository and under `$HOME`).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidName`] if the name is empty, absolute, or
/// contains `.`/`..` components.
pub fn validate_name(package: &str, name: &str) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidName {
        package: package.to_string(),
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("must not be empty"));
    }

    let path = Path::new(name);
    if path.is_absolute() || path.has_root() {
        return Err(invalid("must be relative"));
    }

    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            Component::ParentDir => return Err(invalid("must not contain '..'")),
            Component::CurDir => return Err(invalid("must not contain '.' components")),
            Component::RootDir | Component::Prefix(_) => return Err(invalid("must be relative")),
        }
    }
    Ok(())
}

/// Check that targets are distinct and that none lies inside another.
///
/// Once `~/.vim` links into the repository, `~/.vim/colors/dark.vim` is the
/// repository file itself, so linking it would replace its own source.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateTarget`] or [`ConfigError::NestedTarget`]
/// for the first offending entry in declaration order.
pub fn check_targets(files: &[ManagedFile]) -> Result<(), ConfigError> {
    let mut seen: HashMap<&Path, &ManagedFile> = HashMap::with_capacity(files.len());
    for file in files {
        if let Some(first) = seen.insert(&file.target, file) {
            return Err(ConfigError::DuplicateTarget {
                target: file.target.clone(),
                first: first.label(),
                second: file.label(),
            });
        }
    }

    for file in files {
        if let Some(outer) = file.target.ancestors().skip(1).find_map(|dir| seen.get(dir)) {
            return Err(ConfigError::NestedTarget {
                target: file.target.clone(),
                inner: file.label(),
                outer: outer.label(),
            });
        }
    }
    Ok(())
}

/// Return the sources that do not exist, in declaration order.
#[must_use]
pub fn missing_sources(files: &[ManagedFile]) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|f| !f.source.exists())
        .map(|f| f.source.clone())
        .collect()
}
