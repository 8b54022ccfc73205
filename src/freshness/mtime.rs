//! Mtime-based staleness checks for compiled siblings.
//!
//! A compiled-format source (e.g. `style.ccss`) is rebuilt by an external
//! compiler into a sibling with the native extension (`style.css`). Both
//! files live side by side, so timestamps are reliable.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check if file A is newer than file B
///
/// Returns `false` if either file doesn't exist or times can't be compared
pub fn is_newer_than(a: &Path, b: &Path) -> bool {
    let (Some(a_time), Some(b_time)) = (get_mtime(a), get_mtime(b)) else {
        return false;
    };
    a_time > b_time
}

/// Check whether `compiled` must be regenerated from `source`.
///
/// True when `compiled` is missing, or strictly older than `source`.
/// Equal timestamps count as fresh.
pub fn needs_recompile(source: &Path, compiled: &Path) -> bool {
    if get_mtime(compiled).is_none() {
        return true;
    }
    is_newer_than(source, compiled)
}
