//! On-disk store backed by a `project.pbxproj` file.

use std::fs;
use std::path::{Path, PathBuf};

use pbxproj::{Document, Node, Value};

use super::{BuildConfiguration, ProjectModel, ProjectStore, SettingValue, StoreError, Target};

/// Document file inside an `.xcodeproj` bundle.
const PBXPROJ_FILE: &str = "project.pbxproj";

/// Store for an Xcode project.
///
/// The document read by `load` is kept so that `save` edits the same text
/// it was built from.
#[derive(Debug)]
pub struct PbxprojStore {
    path: PathBuf,
    document: Option<Document>,
}

impl PbxprojStore {
    /// `path` may be the `.xcodeproj` bundle or the `project.pbxproj`
    /// inside it.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let is_bundle =
            path.extension().map_or(false, |ext| ext == "xcodeproj") || path.is_dir();
        let path = if is_bundle {
            path.join(PBXPROJ_FILE)
        } else {
            path.to_path_buf()
        };
        Self {
            path,
            document: None,
        }
    }

    /// Resolved path of the `project.pbxproj` file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        Document::parse(text).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl ProjectStore for PbxprojStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&mut self) -> Result<ProjectModel, StoreError> {
        if !self.exists() {
            return Err(StoreError::NotFound(self.path.clone()));
        }
        let document = self.read_document()?;
        let model = to_model(&document);
        log::debug!(
            "loaded {} ({} targets)",
            self.path.display(),
            model.targets.len()
        );
        self.document = Some(document);
        Ok(model)
    }

    fn save(&mut self, model: &ProjectModel) -> Result<(), StoreError> {
        let mut document = match self.document.take() {
            Some(document) => document,
            None => self.read_document()?,
        };

        let mut changed = false;
        for target in &model.targets {
            for config in &target.configurations {
                for (key, value) in &config.settings {
                    let SettingValue::List(values) = value else {
                        continue;
                    };
                    match document
                        .build_setting(&config.id, key)
                        .and_then(Node::string_items)
                    {
                        Some(current) if current == *values => continue,
                        Some(_) => {}
                        None => {
                            return Err(StoreError::Inconsistent(format!(
                                "{} has no list setting {} in configuration {}",
                                target.name, key, config.name
                            )))
                        }
                    }
                    changed |= document
                        .set_string_list(&config.id, key, values)
                        .map_err(|e| StoreError::Inconsistent(e.to_string()))?;
                    log::debug!("rewrote {} for {} ({})", key, target.name, config.name);
                }
            }
        }

        if changed {
            fs::write(&self.path, document.text()).map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
            log::info!("wrote {}", self.path.display());
        }
        self.document = Some(document);
        Ok(())
    }
}

/// Build the model for every target in project order.
fn to_model(document: &Document) -> ProjectModel {
    let targets = document
        .targets()
        .into_iter()
        .map(|target| {
            let configurations = document
                .build_configurations(&target.id)
                .into_iter()
                .map(|config| {
                    let settings = document
                        .build_settings(&config.id)
                        .and_then(Node::as_dict)
                        .map(|entries| {
                            entries
                                .iter()
                                .map(|e| (e.key.clone(), setting_value(&e.value)))
                                .collect()
                        })
                        .unwrap_or_default();
                    BuildConfiguration {
                        id: config.id,
                        name: config.name,
                        settings,
                    }
                })
                .collect();
            Target {
                id: target.id,
                name: target.name,
                configurations,
            }
        })
        .collect();
    ProjectModel { targets }
}

fn setting_value(node: &Node) -> SettingValue {
    match &node.value {
        Value::String(s) => SettingValue::Text(s.clone()),
        Value::Array(_) => node
            .string_items()
            .map(SettingValue::List)
            .unwrap_or(SettingValue::Other),
        Value::Dict(_) | Value::Data(_) => SettingValue::Other,
    }
}
