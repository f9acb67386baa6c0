//! pods-fixup - post-install fixups for generated CocoaPods output
//!
//! Two independent patches run after `pod install`:
//! - the flag cleaner strips unsupported `-G` flags from the gRPC targets
//!   in `Pods.xcodeproj`;
//! - the header patcher inserts the space clang needs in
//!   `basic_seq.h`'s dependent template call.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod header;
pub mod prereq;
pub mod store;

pub use cleaner::{clean_project, filter_flags, strip_flags, CleanReport, FlagChange, FlagRules};
pub use config::{ConfigError, FixupConfig};
pub use error::FixupError;
pub use header::{apply_replacements, patch_header, HeaderOutcome, Replacement};
pub use prereq::{check, PrerequisiteReport};
pub use store::{MemoryStore, PbxprojStore, ProjectModel, ProjectStore, StoreError};
