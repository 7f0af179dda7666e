//! Git command runner for clouduct.
//!
//! Provides a safe wrapper around git commands with captured stdout/stderr
//! and structured error handling. All git operations go through this module.

use crate::error::{CloudError, Result};
use std::path::Path;
use std::process::{Command, Output};

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    /// Create a new GitOutput from raw output bytes.
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Run a git command with the specified working directory.
///
/// # Arguments
///
/// * `cwd` - The working directory to run the command in
/// * `args` - The git command arguments (without "git" prefix)
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(CloudError::FetchError)` - On spawn failure or non-zero exit code
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            CloudError::FetchError(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout.clone()
        } else {
            git_output.stderr.clone()
        };

        Err(CloudError::FetchError(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            exit_code,
            error_msg
        )))
    }
}

/// Shallow-clone `url` into `target`.
///
/// Only the tip commit is fetched (`--depth 1`); template history never
/// matters for generation and full clones are slow for large skeletons.
///
/// # Arguments
///
/// * `url` - The repository to clone (local path or network URL)
/// * `target` - The directory the clone is created at
///
/// # Returns
///
/// * `Ok(())` - On successful clone
/// * `Err(CloudError::FetchError)` - On clone failure, naming the URL
pub fn clone_shallow<P: AsRef<Path>>(url: &str, target: P) -> Result<()> {
    let target = target.as_ref();
    let target_arg = target.to_string_lossy();

    run_git(
        Path::new("."),
        &["clone", "--depth", "1", url, target_arg.as_ref()],
    )
    .map_err(|e| match e {
        CloudError::FetchError(msg) => CloudError::FetchError(format!("'{}': {}", url, msg)),
        other => other,
    })?;

    Ok(())
}
