//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// An absolute `config_name` is returned as-is when it exists. Otherwise
/// walks up from cwd until a directory containing `config_name` is found.
///
/// # Example
/// ```text
/// /home/user/site/templates/   ← cwd
/// /home/user/site/compress.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}
