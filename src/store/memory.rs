//! In-memory store for tests.

use std::path::{Path, PathBuf};

use super::{ProjectModel, ProjectStore, StoreError};

/// Holds a [`ProjectModel`] in memory and records saves.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    location: PathBuf,
    model: Option<ProjectModel>,
    saves: usize,
}

impl MemoryStore {
    pub fn new(model: ProjectModel) -> Self {
        Self {
            location: PathBuf::from("memory://project.pbxproj"),
            model: Some(model),
            saves: 0,
        }
    }

    /// A store whose document does not exist.
    pub fn missing() -> Self {
        Self {
            location: PathBuf::from("memory://missing.pbxproj"),
            model: None,
            saves: 0,
        }
    }

    /// The current (possibly saved) model.
    pub fn model(&self) -> Option<&ProjectModel> {
        self.model.as_ref()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ProjectStore for MemoryStore {
    fn location(&self) -> &Path {
        &self.location
    }

    fn exists(&self) -> bool {
        self.model.is_some()
    }

    fn load(&mut self) -> Result<ProjectModel, StoreError> {
        self.model
            .clone()
            .ok_or_else(|| StoreError::NotFound(self.location.clone()))
    }

    fn save(&mut self, model: &ProjectModel) -> Result<(), StoreError> {
        self.model = Some(model.clone());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Target;

    #[test]
    fn test_round_trip_counts_saves() {
        let model = ProjectModel {
            targets: vec![Target::new("T1", "App")],
        };
        let mut store = MemoryStore::new(model.clone());
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), model);
        store.save(&model).unwrap();
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_missing_store() {
        let mut store = MemoryStore::missing();
        assert!(!store.exists());
        assert!(matches!(store.load(), Err(StoreError::NotFound(_))));
    }
}
