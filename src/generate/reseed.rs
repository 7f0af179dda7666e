//! Placeholder substitution across a fetched skeleton tree.
//!
//! Template authors mark substitution points as `{{name}}`, where the name
//! is an identifier (`[A-Za-z_][A-Za-z0-9_]*`) with no surrounding
//! whitespace. That delimiter syntax is the contract with template authors
//! and must stay stable. Anything that opens with `{{` but is not a
//! well-shaped token — spaces, dots, unterminated braces — passes through
//! byte-identical, which keeps CI workflow files and frontend templates
//! inside skeletons intact.
//!
//! Tokens whose name has no value are left in place and reported, never
//! dropped. Each call is a one-shot rewrite of the tree as it exists on
//! disk; replacement values are not rescanned for tokens.

use crate::error::{CloudError, Result};
use regex::bytes::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Token pattern: `{{name}}` with no interior whitespace.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").expect("Invalid token regex")
});

/// How many leading bytes the binary heuristic sniffs.
const BINARY_SNIFF_LEN: usize = 8000;

/// Outcome of one reseeding pass.
#[derive(Debug, Default)]
pub struct ReseedReport {
    /// Files whose content changed.
    pub files_rewritten: usize,
    /// Files skipped as binary.
    pub binaries_skipped: usize,
    /// Occurrence count per token name that had no substitution value.
    pub unresolved: BTreeMap<String, usize>,
}

/// Replace `{{name}}` tokens in every file under `root` with values from
/// `variables`.
///
/// Files are rewritten in place only when their content changed, which
/// keeps the permission bits of executable skeleton files. Binary files
/// (NUL byte within the first 8000 bytes, git's own heuristic) and the
/// `.git` metadata directory are skipped untouched.
///
/// # Arguments
///
/// * `root` - The directory tree to rewrite
/// * `variables` - Substitution values keyed by token name
///
/// # Returns
///
/// * `Ok(ReseedReport)` - Counts of rewritten/skipped files and unresolved tokens
/// * `Err(CloudError::SubstitutionError)` - A file could not be read or written
pub fn reseed(root: &Path, variables: &BTreeMap<String, String>) -> Result<ReseedReport> {
    let mut report = ReseedReport::default();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name().to_string_lossy() != ".git")
    {
        let entry = entry.map_err(|e| {
            CloudError::SubstitutionError(format!("failed to walk '{}': {}", root.display(), e))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        reseed_file(entry.path(), variables, &mut report)?;
    }

    Ok(report)
}

/// Rewrite a single file, updating the report.
fn reseed_file(
    path: &Path,
    variables: &BTreeMap<String, String>,
    report: &mut ReseedReport,
) -> Result<()> {
    let content = std::fs::read(path).map_err(|e| {
        CloudError::SubstitutionError(format!("failed to read '{}': {}", path.display(), e))
    })?;

    if is_binary(&content) {
        report.binaries_skipped += 1;
        return Ok(());
    }

    let (rewritten, changed) = substitute(&content, variables, &mut report.unresolved);

    if changed {
        std::fs::write(path, rewritten).map_err(|e| {
            CloudError::SubstitutionError(format!("failed to write '{}': {}", path.display(), e))
        })?;
        report.files_rewritten += 1;
    }

    Ok(())
}

/// A file is treated as binary when its leading bytes contain a NUL.
fn is_binary(content: &[u8]) -> bool {
    let sniff = &content[..content.len().min(BINARY_SNIFF_LEN)];
    sniff.contains(&0)
}

/// Substitute tokens in `content`, recording unresolved names.
///
/// Returns the rewritten bytes and whether anything changed. Substitution
/// works on raw bytes, so non-UTF-8 text files are processed safely.
fn substitute(
    content: &[u8],
    variables: &BTreeMap<String, String>,
    unresolved: &mut BTreeMap<String, usize>,
) -> (Vec<u8>, bool) {
    let mut out = Vec::with_capacity(content.len());
    let mut last = 0;
    let mut changed = false;

    for caps in TOKEN_REGEX.captures_iter(content) {
        let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let name = String::from_utf8_lossy(name.as_bytes());
        match variables.get(name.as_ref()) {
            Some(value) => {
                out.extend_from_slice(&content[last..token.start()]);
                out.extend_from_slice(value.as_bytes());
                last = token.end();
                changed = true;
            }
            None => {
                // Token stays in place; copied along with the surrounding bytes.
                *unresolved.entry(name.into_owned()).or_insert(0) += 1;
            }
        }
    }

    out.extend_from_slice(&content[last..]);
    (out, changed)
}
