//! Configuration merge system
//!
//! Implements the 3-layer configuration merge:
//! 1. Built-in defaults
//! 2. Repo config (`.pods-fixup.toml` in the project root, or `--config`)
//! 3. CLI flags

mod defaults;
mod merge;

pub use defaults::{
    BuiltinDefaults, DEFAULT_HEADER_PATH, DEFAULT_KEYS, DEFAULT_PREFIX, DEFAULT_PROJECT_PATH,
    DEFAULT_TARGETS, TEMPLATE_CALL, TEMPLATE_CALL_FIXED,
};
pub use merge::{deep_merge, merge_layers};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cleaner::FlagRules;
use crate::header::Replacement;

/// Repo config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".pods-fixup.toml";

/// Merged configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixupConfig {
    pub flags: FlagsConfig,
    pub header: HeaderConfig,
}

/// Settings for `strip-flags`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagsConfig {
    /// `.xcodeproj` bundle or `project.pbxproj`, relative to the root.
    pub project: PathBuf,
    pub targets: Vec<String>,
    pub keys: Vec<String>,
    pub prefix: String,
}

/// Settings for `patch-header`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
}

impl Default for FixupConfig {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            flags: FlagsConfig {
                project: PathBuf::from(defaults.project),
                targets: defaults.targets,
                keys: defaults.keys,
                prefix: defaults.prefix,
            },
            header: HeaderConfig {
                path: PathBuf::from(defaults.header),
                replacements: defaults
                    .replacements
                    .into_iter()
                    .map(|(find, replace)| Replacement { find, replace })
                    .collect(),
            },
        }
    }
}

impl FixupConfig {
    /// Build the effective config for a project root.
    ///
    /// `config_path` names an explicit config file, which must exist.
    /// Without it, `<root>/.pods-fixup.toml` is used when present.
    pub fn load(
        root: &Path,
        config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];

        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::IoError(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                layers.push(load_toml_file(path)?);
            }
            None => {
                let path = root.join(CONFIG_FILE_NAME);
                if path.exists() {
                    log::debug!("using repo config {}", path.display());
                    layers.push(load_toml_file(&path)?);
                }
            }
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
        }

        Self::from_layers(layers)
    }

    /// Merge layers and validate the result.
    pub fn from_layers(layers: Vec<Value>) -> Result<Self, ConfigError> {
        let merged = merge_layers(layers);
        let config: FixupConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flags.prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "flags.prefix must not be empty".to_string(),
            ));
        }
        if self.flags.targets.is_empty() {
            return Err(ConfigError::ValidationError(
                "flags.targets must name at least one target".to_string(),
            ));
        }
        if self.flags.keys.is_empty() {
            return Err(ConfigError::ValidationError(
                "flags.keys must name at least one build setting".to_string(),
            ));
        }
        if let Some(i) = self.header.replacements.iter().position(|r| r.find.is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "header.replacements[{}].find must not be empty",
                i
            )));
        }
        Ok(())
    }

    /// Project path resolved against the root.
    pub fn project_path(&self, root: &Path) -> PathBuf {
        root.join(&self.flags.project)
    }

    /// Header path resolved against the root.
    pub fn header_path(&self, root: &Path) -> PathBuf {
        root.join(&self.header.path)
    }

    pub fn flag_rules(&self) -> FlagRules {
        FlagRules {
            targets: self.flags.targets.clone(),
            keys: self.flags.keys.clone(),
            prefix: self.flags.prefix.clone(),
        }
    }
}

/// Read a TOML file into a JSON value for merging.
fn load_toml_file(path: &Path) -> Result<Value, ConfigError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
    let toml_value: toml::Value = toml::from_str(&contents)
        .map_err(|e| ConfigError::ParseError(format!("TOML parse error in {}: {}", path.display(), e)))?;
    Ok(toml_to_json(toml_value))
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
