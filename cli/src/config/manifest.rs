//! `dotlink.toml` manifest schema and expansion into managed files.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::ManagedFile;
use super::validation::{check_targets, validate_name};
use crate::error::ConfigError;

/// Names a glob pattern never matches, regardless of `exclude`.
const ALWAYS_EXCLUDED: &[&str] = &[".git"];

/// Root of the manifest file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Packages in declaration order (`[[package]]` tables).
    #[serde(default, rename = "package")]
    pub packages: Vec<Package>,
}

/// One repository directory whose files are linked into `$HOME`.
///
/// ```toml
/// [[package]]
/// dir = "zsh"
/// files = [".zshrc"]
/// glob = ".zsh*"
/// exclude = [".zsh_history"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Package {
    /// Directory relative to the repository root; `.` for the root itself.
    #[serde(default = "default_dir")]
    pub dir: String,
    /// Explicit file names, linked in this order.
    #[serde(default)]
    pub files: Vec<String>,
    /// Pattern expanded inside `dir`; matches are appended after `files`.
    #[serde(default)]
    pub glob: Option<String>,
    /// Names dropped from the glob expansion.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_dir() -> String {
    ".".to_string()
}

impl Manifest {
    /// Expand every package into [`ManagedFile`]s, preserving declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is invalid, a glob cannot be compiled or
    /// walked, or two targets coincide or nest.
    pub fn managed_files(&self, root: &Path, home: &Path) -> Result<Vec<ManagedFile>, ConfigError> {
        let mut files = Vec::new();
        for package in &self.packages {
            for name in package.names(root)? {
                files.push(ManagedFile::new(root, home, &package.dir, &name));
            }
        }
        check_targets(&files)?;
        Ok(files)
    }
}

impl Package {
    /// Directory holding this package's sources.
    #[must_use]
    pub fn base_dir(&self, root: &Path) -> PathBuf {
        super::package_dir(root, &self.dir)
    }

    /// Resolve the ordered list of names managed by this package.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is invalid or the glob cannot be expanded.
    pub fn names(&self, root: &Path) -> Result<Vec<String>, ConfigError> {
        validate_dir(&self.dir)?;

        let mut names = Vec::with_capacity(self.files.len());
        for name in &self.files {
            validate_name(&self.dir, name)?;
            if !names.contains(name) {
                names.push(name.clone());
            }
        }

        if let Some(pattern) = &self.glob {
            for name in self.expand_glob(root, pattern)? {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    fn expand_glob(&self, root: &Path, pattern: &str) -> Result<Vec<String>, ConfigError> {
        let base = self.base_dir(root);
        let full = format!(
            "{}/{pattern}",
            glob::Pattern::escape(&base.to_string_lossy())
        );
        let options = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let paths = glob::glob_with(&full, options).map_err(|e| ConfigError::InvalidGlob {
            package: self.dir.clone(),
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;

        let mut names = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| ConfigError::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            let Ok(relative) = path.strip_prefix(&base) else {
                continue;
            };
            let Some(name) = relative.to_str() else {
                return Err(ConfigError::InvalidName {
                    package: self.dir.clone(),
                    name: relative.to_string_lossy().into_owned(),
                    reason: "must be valid UTF-8",
                });
            };
            if ALWAYS_EXCLUDED.contains(&name) || self.exclude.iter().any(|e| e == name) {
                continue;
            }
            validate_name(&self.dir, name)?;
            names.push(name.to_string());
        }
        names.sort();
        Ok(names)
    }
}

/// The package directory may be `.`, otherwise it follows the file-name rules.
fn validate_dir(dir: &str) -> Result<(), ConfigError> {
    if dir == "." {
        return Ok(());
    }
    validate_name(dir, dir)
}
