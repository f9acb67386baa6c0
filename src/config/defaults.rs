//! Built-in defaults (layer 1)
//!
//! Paths are relative to the iOS project root, where `pod install` puts
//! the generated `Pods/` directory.

use serde_json::{json, Value};

/// Generated Pods project.
pub const DEFAULT_PROJECT_PATH: &str = "Pods/Pods.xcodeproj";

/// Targets whose flag lists carry the unsupported `-G` options.
pub const DEFAULT_TARGETS: &[&str] = &["gRPC-Core", "BoringSSL-GRPC"];

/// Build settings that are filtered.
pub const DEFAULT_KEYS: &[&str] = &["OTHER_LDFLAGS", "OTHER_CFLAGS"];

pub const DEFAULT_PREFIX: &str = "-G";

/// Header that newer clang rejects without the extra space.
pub const DEFAULT_HEADER_PATH: &str = "Pods/gRPC-Core/src/core/lib/promise/detail/basic_seq.h";

pub const TEMPLATE_CALL: &str = "Traits::template CheckResultAndRunNext<Wrapped>(";
pub const TEMPLATE_CALL_FIXED: &str = "Traits:: template CheckResultAndRunNext<Wrapped>(";

/// Built-in default configuration values
#[derive(Debug, Clone)]
pub struct BuiltinDefaults {
    pub project: String,
    pub targets: Vec<String>,
    pub keys: Vec<String>,
    pub prefix: String,
    pub header: String,
    pub replacements: Vec<(String, String)>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT_PATH.to_string(),
            targets: DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect(),
            keys: DEFAULT_KEYS.iter().map(|s| s.to_string()).collect(),
            prefix: DEFAULT_PREFIX.to_string(),
            header: DEFAULT_HEADER_PATH.to_string(),
            replacements: vec![(TEMPLATE_CALL.to_string(), TEMPLATE_CALL_FIXED.to_string())],
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> Value {
        let replacements: Vec<Value> = self
            .replacements
            .iter()
            .map(|(find, replace)| json!({"find": find, "replace": replace}))
            .collect();
        json!({
            "flags": {
                "project": self.project,
                "targets": self.targets,
                "keys": self.keys,
                "prefix": self.prefix
            },
            "header": {
                "path": self.header,
                "replacements": replacements
            }
        })
    }
}
