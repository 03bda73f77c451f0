//! Source-tree enumeration and staging-directory copy
//!
//! Copies the filtered file set into the staging directory, preserving
//! relative structure and permission bits.

use crate::core::error::PublishError;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Enumerate the source tree as normalized relative file paths
///
/// Directories are not reported; the stager re-creates them as needed.
/// Entries are sorted by file name for a deterministic staging order.
pub fn read_source_tree(root: &Path) -> Result<Vec<PathBuf>, PublishError> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| PublishError::filesystem("stage", e))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| PublishError::filesystem("stage", e))?
            .to_path_buf();
        paths.push(relative);
    }

    Ok(paths)
}

/// Copy the filtered file set from `source_root` into `dest_root`
///
/// Parent directories are created as needed. `tokio::fs::copy` carries
/// permission bits across on platforms that support them, so executable
/// scripts stay executable in the staged copy.
pub async fn stage(
    paths: &[PathBuf],
    source_root: &Path,
    dest_root: &Path,
) -> Result<(), PublishError> {
    for relative in paths {
        let source = source_root.join(relative);
        let dest = dest_root.join(relative);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                PublishError::filesystem("stage", format!("{}: {}", parent.display(), e))
            })?;
        }

        fs::copy(&source, &dest).await.map_err(|e| {
            PublishError::filesystem("stage", format!("{}: {}", relative.display(), e))
        })?;
    }

    Ok(())
}
