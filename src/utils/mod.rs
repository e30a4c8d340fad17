use std::path::PathBuf;

use directories::BaseDirs;

/// Expands a leading `~` to the user's home directory. The configured output
/// directory is the only path that may carry one; anything else passes
/// through untouched.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().to_path_buf();
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}
