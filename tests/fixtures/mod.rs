//! Test fixtures
//!
//! A trimmed `Pods/` tree as left behind by `pod install`:
//! - `Pods/Pods.xcodeproj/project.pbxproj` with the gRPC targets and an
//!   app target that must not be touched
//! - `Pods/gRPC-Core/.../basic_seq.h` with two unpatched template calls

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const PROJECT_REL: &str = "Pods/Pods.xcodeproj/project.pbxproj";
pub const HEADER_REL: &str = "Pods/gRPC-Core/src/core/lib/promise/detail/basic_seq.h";

/// Root of the fixture tree (the directory containing `Pods/`).
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn project_text() -> String {
    fs::read_to_string(fixture_root().join(PROJECT_REL)).unwrap()
}

pub fn header_text() -> String {
    fs::read_to_string(fixture_root().join(HEADER_REL)).unwrap()
}

/// Copy the fixture `Pods/` tree into `dest` so tests can mutate it.
pub fn install_pods(dest: &Path) {
    copy_dir(&fixture_root().join("Pods"), &dest.join("Pods")).unwrap();
}

fn copy_dir(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

/// Remove one array line (e.g. `"-G",`) from the first list that follows
/// `anchor` in a project text.
pub fn without_entry_after(text: &str, anchor: &str, entry_line: &str) -> String {
    let start = text.find(anchor).expect("anchor present");
    let offset = text[start..].find(entry_line).expect("entry present") + start;
    format!("{}{}", &text[..offset], &text[offset + entry_line.len()..])
}
