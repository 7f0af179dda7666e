//! Precondition checks that run before the pipeline touches the disk.
//!
//! Template repositories reachable over SSH need an identity to
//! authenticate with. Detecting that identity up front turns a cryptic
//! mid-clone git failure into an actionable message, before any previous
//! project output has been removed.

use crate::error::{CloudError, Result};
use regex::Regex;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

/// Matches scp-like git remotes such as `git@github.com:org/repo.git`.
static SCP_LIKE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+:").expect("Invalid scp remote regex")
});

/// Default private key files checked under `~/.ssh`.
const DEFAULT_KEY_NAMES: [&str; 3] = ["id_ed25519", "id_ecdsa", "id_rsa"];

/// Whether a template URL will be fetched over SSH.
pub fn is_ssh_remote(url: &str) -> bool {
    url.starts_with("ssh://") || SCP_LIKE_REGEX.is_match(url)
}

/// Fail early when any of `urls` needs SSH but no identity is available.
///
/// An identity counts as available when `ssh-add -l` reports at least one
/// loaded key, or a default key file exists under `~/.ssh`.
///
/// # Returns
///
/// * `Ok(())` - No URL uses SSH, or an identity was found
/// * `Err(CloudError::PreconditionError)` - SSH is needed but no identity exists
pub fn check_ssh_identity(urls: &[&str]) -> Result<()> {
    let Some(ssh_url) = urls.iter().find(|url| is_ssh_remote(url)) else {
        return Ok(());
    };

    if agent_has_identities() || default_key_exists() {
        return Ok(());
    }

    Err(CloudError::PreconditionError(format!(
        "'{}' requires SSH but no SSH identity was found. Load a key into ssh-agent or create one under ~/.ssh.",
        ssh_url
    )))
}

/// `ssh-add -l` exits zero only when the agent is reachable and holds keys.
fn agent_has_identities() -> bool {
    Command::new("ssh-add")
        .arg("-l")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn default_key_exists() -> bool {
    let Some(home) = std::env::var_os("HOME") else {
        return false;
    };
    let ssh_dir = PathBuf::from(home).join(".ssh");

    DEFAULT_KEY_NAMES
        .iter()
        .any(|name| ssh_dir.join(name).is_file())
}
