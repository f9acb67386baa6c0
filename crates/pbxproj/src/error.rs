//! Error types for reading and editing project documents.

/// Syntax error in a project document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl ParseError {
    pub(crate) fn at(text: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(text.len());
        let before = &text[..floor_char_boundary(text, offset)];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Failure while editing a parsed document.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("object not found: {0}")]
    MissingObject(String),

    #[error("build setting {key} not present in configuration {config}")]
    MissingSetting { config: String, key: String },

    #[error("build setting {key} in configuration {config} is not a list of strings")]
    NotAList { config: String, key: String },

    #[error("new value for build setting {key} in configuration {config} does not keep the existing entries in order")]
    NotASubsequence { config: String, key: String },

    #[error("edited document no longer parses: {0}")]
    Reparse(#[from] ParseError),
}
