//! Domain-specific error types for the installer.
//!
//! Library modules return typed errors ([`ConfigError`], [`InstallError`]);
//! command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from loading and validating `dotlink.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No manifest at the expected location.
    #[error("manifest not found: {0}")]
    MissingManifest(PathBuf),

    /// An I/O error occurred while reading the manifest.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest is not valid TOML or does not match the expected shape.
    #[error("invalid manifest {path}: {message}")]
    InvalidSyntax {
        /// Manifest path.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A glob pattern could not be compiled.
    #[error("invalid glob '{pattern}' in package '{package}': {message}")]
    InvalidGlob {
        /// Package directory the pattern belongs to.
        package: String,
        /// The offending pattern.
        pattern: String,
        /// Compiler diagnostic from the `glob` crate.
        message: String,
    },

    /// A managed file name is empty, absolute, or escapes its base directory.
    #[error("invalid file name '{name}' in package '{package}': {reason}")]
    InvalidName {
        /// Package directory the name belongs to.
        package: String,
        /// The offending name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// Two entries resolve to the same target path.
    #[error("target {target} is declared by both '{first}' and '{second}'")]
    DuplicateTarget {
        /// The contested target path.
        target: PathBuf,
        /// Package/name of the first declaration.
        first: String,
        /// Package/name of the second declaration.
        second: String,
    },

    /// A target lies inside another managed target, so it would resolve
    /// through that target's link into the repository.
    #[error("target {target} ('{inner}') lies inside target '{outer}'")]
    NestedTarget {
        /// The nested target path.
        target: PathBuf,
        /// Package/name of the nested declaration.
        inner: String,
        /// Package/name of the enclosing declaration.
        outer: String,
    },
}

/// Errors that abort an installer run.
#[derive(Error, Debug)]
pub enum InstallError {
    /// One or more declared sources do not exist in the repository.
    ///
    /// Raised before any filesystem mutation.
    #[error("{} source file(s) missing: {}", .0.len(), display_paths(.0))]
    MissingSources(Vec<PathBuf>),

    /// The target's parent resolves into the repository, so changing it
    /// would rewrite a source instead of the home directory.
    #[error("refusing to touch {}: it resolves into the repository at {}", .target.display(), .resolved.display())]
    InsideRepository {
        /// Target path as declared.
        target: PathBuf,
        /// Where the target's parent directory actually lives.
        resolved: PathBuf,
    },

    /// A filesystem step could not complete.
    #[error("{op} {}: {source}", .path.display())]
    Io {
        /// Short name of the failed step (`move`, `mkdir`, `link`, ...).
        op: &'static str,
        /// Path the step was operating on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl InstallError {
    /// Build an [`InstallError::Io`] for `op` on `path`.
    #[must_use]
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
