#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Contents of a file under `tests/fixtures`.
pub fn read_fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture(name)).unwrap()
}

/// Minimal export document wrapping the given data sets.
pub fn export(data: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "version": "2.0.0",
        "type": "llvm.coverage.json.export",
        "data": data,
    }))
    .unwrap()
}

/// A single file entry with the given segments and a zeroed summary.
pub fn file_entry(filename: &str, segments: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "filename": filename,
        "segments": segments,
        "summary": {
            "lines": { "count": 0, "covered": 0 },
            "functions": { "count": 0, "covered": 0 }
        }
    })
}
