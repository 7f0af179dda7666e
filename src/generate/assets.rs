//! Staging of bundled helper programs into generated projects.
//!
//! The helpers ship next to the installed binary. Where exactly depends on
//! how the tool was installed, so lookup walks an ordered list of candidate
//! roots and takes the first hit. Installed layouts place the binary three
//! levels below the distribution root; running from a source checkout falls
//! back to the working directory.

use crate::error::{CloudError, Result};
use std::path::{Path, PathBuf};

/// Permission bits applied to staged helpers: owner and group may run and
/// modify them, others may only read.
const ASSET_MODE: u32 = 0o774;

/// Candidate asset roots in resolution order.
pub fn default_asset_roots(workdir: &Path) -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(exe) = std::env::current_exe()
        && let Some(dist_root) = exe.ancestors().nth(3)
    {
        roots.push(dist_root.to_path_buf());
    }

    roots.push(workdir.to_path_buf());
    roots
}

/// Copy the asset at `logical` (a path relative to an asset root) into
/// `target_dir`, marked executable.
///
/// # Arguments
///
/// * `roots` - Candidate roots, searched in order
/// * `logical` - Root-relative path of the asset, e.g. `clouduct-bin/clouduct-tf`
/// * `target_dir` - Directory the asset is copied into
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the staged copy
/// * `Err(CloudError::PreconditionError)` - No root contains the asset
/// * `Err(CloudError::StageError)` - The copy itself failed
pub fn stage(roots: &[PathBuf], logical: &str, target_dir: &Path) -> Result<PathBuf> {
    let source = resolve(roots, logical)?;

    // fs::copy carries the source permissions over, so fix them up front.
    set_asset_mode(&source)?;

    let file_name = source.file_name().ok_or_else(|| {
        CloudError::StageError(format!("asset path '{}' has no file name", source.display()))
    })?;
    let staged = target_dir.join(file_name);

    std::fs::copy(&source, &staged).map_err(|e| {
        CloudError::StageError(format!(
            "failed to copy '{}' to '{}': {}",
            source.display(),
            staged.display(),
            e
        ))
    })?;

    Ok(staged)
}

/// First root whose tree contains `logical`.
fn resolve(roots: &[PathBuf], logical: &str) -> Result<PathBuf> {
    for root in roots {
        let candidate = root.join(logical);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(CloudError::PreconditionError(format!(
        "bundled asset '{}' not found (searched {} location(s))",
        logical,
        roots.len()
    )))
}

#[cfg(unix)]
fn set_asset_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(ASSET_MODE)).map_err(|e| {
        CloudError::StageError(format!(
            "failed to mark '{}' executable: {}",
            path.display(),
            e
        ))
    })
}

#[cfg(not(unix))]
fn set_asset_mode(_path: &Path) -> Result<()> {
    Ok(())
}
