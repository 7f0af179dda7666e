//! Repository materialization for template sources.

use crate::error::{CloudError, Result};
use crate::git;
use std::fs;
use std::path::Path;

/// Materialize the repository at `url` under `target`, replacing whatever
/// was there.
///
/// An existing `target` is removed first so repeated runs never mix files
/// from an earlier fetch with the fresh clone. The removal is irreversible.
pub fn fetch(url: &str, target: &Path) -> Result<()> {
    if target.is_dir() {
        fs::remove_dir_all(target).map_err(|e| {
            CloudError::FetchError(format!(
                "failed to remove existing '{}': {}",
                target.display(),
                e
            ))
        })?;
    } else if target.exists() {
        fs::remove_file(target).map_err(|e| {
            CloudError::FetchError(format!(
                "failed to remove existing '{}': {}",
                target.display(),
                e
            ))
        })?;
    }

    git::clone_shallow(url, target)
}
