//! Top-level error type.

use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Errors surfaced to the CLI.
#[derive(Debug, thiserror::Error)]
pub enum FixupError {
    #[error("Could not find {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse {}: {source}", path.display())]
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

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Project edit failed: {0}")]
    Edit(String),
}

impl From<StoreError> for FixupError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(path) => FixupError::NotFound(path),
            StoreError::Parse { path, source } => FixupError::Parse { path, source },
            StoreError::Io { path, source } => FixupError::Io { path, source },
            StoreError::Inconsistent(msg) => FixupError::Edit(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_through() {
        let err: FixupError = StoreError::NotFound(PathBuf::from("Pods/Pods.xcodeproj")).into();
        assert!(matches!(err, FixupError::NotFound(_)));
        assert_eq!(err.to_string(), "Could not find Pods/Pods.xcodeproj");
    }

    #[test]
    fn test_config_error_message() {
        let err: FixupError = ConfigError::ValidationError("bad".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: Validation error: bad");
    }
}
