//! JSON file output and results-directory scanning.
//!
//! Predictions, metadata, and ground truth all use the same on-disk
//! shape: pretty-printed JSON with 4-space indentation.

use crate::error::{ExtractError, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Serialize a value as pretty JSON with 4-space indentation.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ExtractError::Serialization(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| ExtractError::Serialization(e.to_string()))
}

/// Write a value as pretty JSON, creating parent directories as needed.
///
/// An existing file at `path` is silently overwritten.
pub fn write_pretty_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))?;
        }
    }

    let json = to_pretty_json(value)?;
    fs::write(path, json).map_err(|e| ExtractError::io(path, e))?;

    Ok(())
}

/// Collect the names of all `.json` files directly under a directory.
///
/// A missing directory reads as an empty set: nothing has been written
/// there yet.
pub fn scan_json_filenames(dir: &Path) -> Result<BTreeSet<String>> {
    let mut filenames = BTreeSet::new();

    if !dir.is_dir() {
        return Ok(filenames);
    }

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ExtractError::io(dir, e.into()))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                filenames.insert(name.to_string());
            }
        }
    }

    Ok(filenames)
}
