//! Manifest loading: which repository files are linked where.
pub mod manifest;
pub mod toml_loader;
pub mod validation;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default manifest file name, looked up at the repository root.
pub const MANIFEST_FILE: &str = "dotlink.toml";

/// A repository file and the `$HOME` path it must be reachable at.
///
/// Identity is the target path; two entries with the same target, or one
/// target inside another, are rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedFile {
    /// Package directory relative to the repository root (`.` for the root).
    pub package: String,
    /// Relative file name as declared, e.g. `.vimrc` or `.config/nvim/init.vim`.
    pub name: String,
    /// Absolute path inside the repository.
    pub source: PathBuf,
    /// Absolute path inside the home directory.
    pub target: PathBuf,
}

impl ManagedFile {
    /// Map `name` in `package` to `<root>/<package>/<name>` → `<home>/<name>`.
    #[must_use]
    pub fn new(root: &Path, home: &Path, package: &str, name: &str) -> Self {
        Self {
            package: package.to_string(),
            name: name.to_string(),
            source: package_dir(root, package).join(name),
            target: home.join(name),
        }
    }

    /// `package/name` for display, or just `name` for root-level packages.
    #[must_use]
    pub fn label(&self) -> String {
        if is_root_package(&self.package) {
            self.name.clone()
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }

    /// Final component of the target path, used as the backup entry name.
    #[must_use]
    pub fn base_name(&self) -> &OsStr {
        self.target
            .file_name()
            .unwrap_or_else(|| OsStr::new(&self.name))
    }
}

/// All loaded configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository root.
    pub root: PathBuf,
    /// Home directory targets are resolved against.
    pub home: PathBuf,
    /// Manifest the file list was read from.
    pub manifest: PathBuf,
    /// Managed files in declaration order.
    pub files: Vec<ManagedFile>,
}

impl Config {
    /// Load the manifest (default `<root>/dotlink.toml`) and expand it.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is missing or invalid, or if its
    /// entries fail validation.
    pub fn load(root: &Path, home: &Path, manifest: Option<&Path>) -> Result<Self, ConfigError> {
        let manifest_path = manifest.map_or_else(|| root.join(MANIFEST_FILE), Path::to_path_buf);
        let parsed: manifest::Manifest = toml_loader::load_config(&manifest_path)?;
        let files = parsed.managed_files(root, home)?;

        Ok(Self {
            root: root.to_path_buf(),
            home: home.to_path_buf(),
            manifest: manifest_path,
            files,
        })
    }
}

fn is_root_package(package: &str) -> bool {
    package.is_empty() || package == "."
}

/// Directory holding a package's sources.
pub(crate) fn package_dir(root: &Path, package: &str) -> PathBuf {
    if is_root_package(package) {
        root.to_path_buf()
    } else {
        root.join(package)
    }
}
