//! Provisioning config for generated infrastructure directories.
//!
//! The infrastructure tooling reads its inputs from `terraform.env`, a flat
//! `KEY=VALUE` file sourced as environment variables. The file is rebuilt
//! from scratch on every run and replaces whatever was there before; stale
//! entries from a previous generation must not leak into the new project.

use crate::error::{CloudError, Result};
use crate::generate::GenerationRequest;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the provisioning config inside the infrastructure directory.
pub const TFVARS_FILE: &str = "terraform.env";

/// Build the ordered config entries for a generation request.
///
/// The project name and region always come first, in that order. Seed
/// variables follow in sorted key order (`project_name` is covered by the
/// first entry already), then a single JSON-encoded `TF_VAR_tags` entry
/// when tags were given.
pub fn entries(request: &GenerationRequest) -> Result<Vec<(String, String)>> {
    let mut entries = vec![
        (
            "TF_VAR_project_name".to_string(),
            request.project_name.clone(),
        ),
        ("TF_VAR_region".to_string(), request.region.clone()),
    ];

    for (key, value) in &request.seed_variables {
        if key == "project_name" {
            continue;
        }
        entries.push((format!("TF_VAR_{}", key), value.clone()));
    }

    if !request.tags.is_empty() {
        let tags: BTreeMap<&str, &str> = request
            .tags
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let json = serde_json::to_string(&tags).map_err(|e| {
            CloudError::ConfigWriteError(format!("failed to encode tags as JSON: {}", e))
        })?;
        entries.push(("TF_VAR_tags".to_string(), json));
    }

    Ok(entries)
}

/// Write `entries` as `KEY=VALUE` lines to the config file in `infra_dir`,
/// replacing any existing file.
///
/// Values are written verbatim, without quoting or escaping. Keys containing
/// `=` and keys or values containing a newline would corrupt the line format,
/// so they are rejected before anything touches the disk.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written config file
/// * `Err(CloudError::ConfigWriteError)` - Invalid entry or write failure
pub fn write_tfvars(infra_dir: &Path, entries: &[(String, String)]) -> Result<PathBuf> {
    for (key, value) in entries {
        if key.contains('=') || key.contains('\n') {
            return Err(CloudError::ConfigWriteError(format!(
                "config key '{}' contains a character reserved by the KEY=VALUE format",
                key.escape_default()
            )));
        }
        if value.contains('\n') {
            return Err(CloudError::ConfigWriteError(format!(
                "config value for '{}' contains a newline",
                key
            )));
        }
    }

    let mut content = String::new();
    for (key, value) in entries {
        content.push_str(key);
        content.push('=');
        content.push_str(value);
        content.push('\n');
    }

    let path = infra_dir.join(TFVARS_FILE);
    atomic_write(&path, content.as_bytes())?;
    Ok(path)
}

/// Write content to a temporary file in the target directory, sync it, and
/// rename it over the target. Readers never observe a half-written config.
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        CloudError::ConfigWriteError(format!("invalid config path '{}'", path.display()))
    })?;
    let parent = path.parent().unwrap_or(Path::new("."));
    let temp_path = parent.join(format!(".{}.tmp", file_name));

    let mut file = File::create(&temp_path).map_err(|e| {
        CloudError::ConfigWriteError(format!(
            "failed to create temporary file '{}': {}",
            temp_path.display(),
            e
        ))
    })?;

    file.write_all(content).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        CloudError::ConfigWriteError(format!("failed to write to temporary file: {}", e))
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        CloudError::ConfigWriteError(format!("failed to sync temporary file to disk: {}", e))
    })?;

    // On Windows rename does not replace an existing target.
    #[cfg(windows)]
    let _ = fs::remove_file(path);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        CloudError::ConfigWriteError(format!("failed to replace '{}': {}", path.display(), e))
    })?;

    // Persist the directory entry as well.
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}
