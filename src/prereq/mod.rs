//! Prerequisite check.
//!
//! Confirms that `pod install` has produced the files the fixups edit,
//! without modifying anything.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::FixupConfig;
use crate::store::{PbxprojStore, ProjectStore, StoreError};

/// State of the generated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectStatus {
    Missing,
    Unparseable {
        error: String,
    },
    Ready {
        target_count: usize,
        /// Configured targets present in the project.
        found: Vec<String>,
        /// Configured targets absent from the project.
        absent: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCheck {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCheck {
    pub path: PathBuf,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrerequisiteReport {
    pub project: ProjectCheck,
    pub header: HeaderCheck,
}

impl PrerequisiteReport {
    /// The project must exist and parse. A missing header is tolerated
    /// because the header patch treats it as informational.
    pub fn ok(&self) -> bool {
        matches!(self.project.status, ProjectStatus::Ready { .. })
    }

    pub fn to_human(&self) -> String {
        let mut lines = Vec::new();
        let project = self.project.path.display();
        match &self.project.status {
            ProjectStatus::Missing => {
                lines.push(format!("[FAIL] project: not found at {}", project))
            }
            ProjectStatus::Unparseable { error } => {
                lines.push(format!("[FAIL] project: {} does not parse: {}", project, error))
            }
            ProjectStatus::Ready {
                target_count,
                found,
                absent,
            } => {
                lines.push(format!("[ OK ] project: {} ({} targets)", project, target_count));
                if !found.is_empty() {
                    lines.push(format!("       targets found: {}", found.join(", ")));
                }
                if !absent.is_empty() {
                    lines.push(format!("       targets absent: {}", absent.join(", ")));
                }
            }
        }
        if self.header.present {
            lines.push(format!("[ OK ] header: {}", self.header.path.display()));
        } else {
            lines.push(format!(
                "[SKIP] header: not found at {}",
                self.header.path.display()
            ));
        }
        lines.join("\n")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Inspect the configured artifacts under `root`.
pub fn check(config: &FixupConfig, root: &Path) -> PrerequisiteReport {
    let mut store = PbxprojStore::open(config.project_path(root));
    let status = match store.load() {
        Ok(model) => {
            let (found, absent): (Vec<String>, Vec<String>) = config
                .flags
                .targets
                .iter()
                .cloned()
                .partition(|name| model.target(name).is_some());
            ProjectStatus::Ready {
                target_count: model.targets.len(),
                found,
                absent,
            }
        }
        Err(StoreError::NotFound(_)) => ProjectStatus::Missing,
        Err(e) => ProjectStatus::Unparseable {
            error: e.to_string(),
        },
    };

    let header = config.header_path(root);
    PrerequisiteReport {
        project: ProjectCheck {
            path: store.location().to_path_buf(),
            status,
        },
        header: HeaderCheck {
            present: header.is_file(),
            path: header,
        },
    }
}
