//! Project storage
//!
//! The flag cleaner works on a [`ProjectModel`] and never touches files
//! directly. A [`ProjectStore`] loads the model and writes it back:
//! [`PbxprojStore`] for real `.xcodeproj` bundles, [`MemoryStore`] for
//! tests.

mod disk;
mod memory;
mod model;

pub use disk::PbxprojStore;
pub use memory::MemoryStore;
pub use model::{BuildConfiguration, ProjectModel, SettingValue, Target};

use std::io;
use std::path::{Path, PathBuf};

/// Read/write access to a project document.
pub trait ProjectStore {
    /// Where the document lives, for messages.
    fn location(&self) -> &Path;

    /// Whether the document is present. Checked before any read.
    fn exists(&self) -> bool;

    fn load(&mut self) -> Result<ProjectModel, StoreError>;

    /// Persist the model. Only list-valued settings that differ from the
    /// stored document are written.
    fn save(&mut self, model: &ProjectModel) -> Result<(), StoreError>;
}

/// Errors for project storage
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("project not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: pbxproj::ParseError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("model does not match document: {0}")]
    Inconsistent(String),
}
