//! Location of the persistent per-command log files.
use std::ffi::OsString;
use std::path::PathBuf;

/// Subdirectory of the cache home that holds dotlink's logs.
const LOG_DIR: &str = "dotlink";

/// `$XDG_CACHE_HOME`, else `.cache` under the first non-empty home variable,
/// else `./.cache`.
fn cache_home(
    xdg: Option<OsString>,
    home: Option<OsString>,
    userprofile: Option<OsString>,
) -> PathBuf {
    if let Some(xdg) = xdg.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    [home, userprofile]
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".cache")
}

/// Log file for `command`, creating its directory on the way.
///
/// `None` when the directory cannot be created; logging then stays
/// console-only.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = cache_home(
        std::env::var_os("XDG_CACHE_HOME"),
        std::env::var_os("HOME"),
        std::env::var_os("USERPROFILE"),
    )
    .join(LOG_DIR);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}
