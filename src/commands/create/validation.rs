//! Argument validation and parsing for the create command.
//!
//! The project name doubles as a directory name, a substitution value, and a
//! prefix for cloud resource names, so it is held to the strictest of those
//! contracts before the pipeline touches anything.

use crate::error::{CloudError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Lowercase letter first, then lowercase letters, digits, and dashes.
static PROJECT_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("Invalid project name regex"));

/// Cloud providers cap resource names well below typical path limits.
const MAX_PROJECT_NAME_LEN: usize = 64;

/// Check that `name` is usable as a directory and resource name.
pub(super) fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CloudError::UserError(
            "project name must not be empty".to_string(),
        ));
    }

    if name.len() > MAX_PROJECT_NAME_LEN {
        return Err(CloudError::UserError(format!(
            "project name '{}' is longer than {} characters",
            name, MAX_PROJECT_NAME_LEN
        )));
    }

    if !PROJECT_NAME_REGEX.is_match(name) {
        return Err(CloudError::UserError(format!(
            "invalid project name '{}': use lowercase letters, digits, and dashes, starting with a letter",
            name
        )));
    }

    Ok(())
}

/// Parse `--tag key:value` arguments, preserving command-line order.
pub(super) fn parse_tags(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|tag| {
            let (key, value) = tag.split_once(':').ok_or_else(|| {
                CloudError::UserError(format!("invalid tag '{}': expected key:value", tag))
            })?;
            if key.is_empty() {
                return Err(CloudError::UserError(format!(
                    "invalid tag '{}': key must not be empty",
                    tag
                )));
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Parse `--var key=value` arguments into a substitution map.
///
/// A key given twice keeps the last value.
pub(super) fn parse_vars(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut vars = BTreeMap::new();
    for var in raw {
        let (key, value) = var.split_once('=').ok_or_else(|| {
            CloudError::UserError(format!("invalid variable '{}': expected key=value", var))
        })?;
        if key.is_empty() {
            return Err(CloudError::UserError(format!(
                "invalid variable '{}': key must not be empty",
                var
            )));
        }
        vars.insert(key.to_string(), value.to_string());
    }
    Ok(vars)
}
