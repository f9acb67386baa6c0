//! In-memory view of a project: targets, their build configurations and
//! settings.

use serde::Serialize;
use std::collections::BTreeMap;

/// Value of a single build setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    List(Vec<String>),
    /// Dictionaries, data, or lists containing non-strings.
    Other,
}

impl SettingValue {
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// A named variant of a target's settings (Debug, Release, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
    /// Object identifier in the project document.
    pub id: String,
    pub name: String,
    pub settings: BTreeMap<String, SettingValue>,
}

impl BuildConfiguration {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            settings: BTreeMap::new(),
        }
    }

    /// Builder-style helper for a list-valued setting.
    pub fn with_list(mut self, key: &str, values: &[&str]) -> Self {
        self.settings.insert(
            key.to_string(),
            SettingValue::List(values.iter().map(|s| s.to_string()).collect()),
        );
        self
    }

    pub fn with_text(mut self, key: &str, value: &str) -> Self {
        self.settings
            .insert(key.to_string(), SettingValue::Text(value.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub id: String,
    pub name: String,
    pub configurations: Vec<BuildConfiguration>,
}

impl Target {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            configurations: Vec::new(),
        }
    }

    pub fn with_configuration(mut self, config: BuildConfiguration) -> Self {
        self.configurations.push(config);
        self
    }
}

/// Targets in project order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectModel {
    pub targets: Vec<Target>,
}

impl ProjectModel {
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }
}
