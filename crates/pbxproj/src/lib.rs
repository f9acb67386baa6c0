//! Lossless reader/writer for Xcode `project.pbxproj` documents.
//!
//! The document is parsed into span-carrying nodes. Edits are applied to
//! the original text and only touch the values they change, so a project
//! written back by this crate differs from the input exactly where it was
//! edited.

mod document;
mod error;
mod parser;
mod value;

pub use document::{ConfigurationRef, Document, TargetRef};
pub use error::{EditError, ParseError};
pub use parser::parse;
pub use value::{Entry, Item, Node, Span, Value};
