//! Literal text patches for generated headers.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FixupError;

/// Replace every occurrence of `find` with `replace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub find: String,
    pub replace: String,
}

/// Result of patching one header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HeaderOutcome {
    /// The header does not exist; nothing was written.
    Missing { path: PathBuf },
    /// The header was rewritten. `replacements[i]` counts the occurrences
    /// of rule `i`.
    Patched {
        path: PathBuf,
        replacements: Vec<usize>,
    },
}

impl HeaderOutcome {
    pub fn total_replacements(&self) -> usize {
        match self {
            HeaderOutcome::Missing { .. } => 0,
            HeaderOutcome::Patched { replacements, .. } => replacements.iter().sum(),
        }
    }

    pub fn to_human(&self) -> String {
        match self {
            HeaderOutcome::Missing { path } => {
                format!("Could not find the file at {}, nothing to patch", path.display())
            }
            HeaderOutcome::Patched { path, .. } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                match self.total_replacements() {
                    0 => format!("No occurrences to patch in {} (file rewritten unchanged)", name),
                    n => format!("Successfully patched {} occurrence(s) in {}", n, name),
                }
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Apply rules in order. Returns the new text and per-rule counts.
pub fn apply_replacements(content: &str, rules: &[Replacement]) -> (String, Vec<usize>) {
    let mut text = content.to_string();
    let mut counts = Vec::with_capacity(rules.len());
    for rule in rules {
        let count = text.matches(rule.find.as_str()).count();
        if count > 0 {
            text = text.replace(&rule.find, &rule.replace);
        }
        counts.push(count);
    }
    (text, counts)
}

/// Patch a header in place.
///
/// A missing file is not an error. An existing file is always rewritten,
/// even when no rule matched; the write goes straight to the file.
pub fn patch_header(path: &Path, rules: &[Replacement]) -> Result<HeaderOutcome, FixupError> {
    if !path.exists() {
        log::debug!("header {} not present", path.display());
        return Ok(HeaderOutcome::Missing {
            path: path.to_path_buf(),
        });
    }

    let io_error = |source: std::io::Error| FixupError::Io {
        path: path.to_path_buf(),
        source,
    };
    let content = fs::read_to_string(path).map_err(io_error)?;
    let (patched, replacements) = apply_replacements(&content, rules);
    fs::write(path, patched).map_err(io_error)?;
    log::info!(
        "rewrote {} ({} replacement(s))",
        path.display(),
        replacements.iter().sum::<usize>()
    );

    Ok(HeaderOutcome::Patched {
        path: path.to_path_buf(),
        replacements,
    })
}
