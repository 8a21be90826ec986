//! Top-level checks on an `llvm-cov export` document.
//!
//! Only the 2.0.0 JSON export is understood. Anything else is rejected before
//! a single node is built.
use serde_json::Value;

use crate::error::{LlvmCovError, Result};

pub const SUPPORTED_VERSION: &str = "2.0.0";
pub const EXPORT_TYPE: &str = "llvm.coverage.json.export";

/// Validate the document header and return its `data` entries.
pub fn validate(document: &Value) -> Result<&[Value]> {
    expect_literal(document, "version", SUPPORTED_VERSION)?;
    expect_literal(document, "type", EXPORT_TYPE)?;

    let data = match document.get("data") {
        None | Some(Value::Null) => return Err(LlvmCovError::EmptyReport),
        Some(data) => data
            .as_array()
            .ok_or_else(|| LlvmCovError::MissingField("data (expected an array)".to_string()))?,
    };

    if data.is_empty() {
        return Err(LlvmCovError::EmptyReport);
    }
    Ok(data)
}

fn expect_literal(document: &Value, field: &str, expected: &str) -> Result<()> {
    match document.get(field).and_then(|v| v.as_str()) {
        Some(found) if found == expected => Ok(()),
        Some(found) => Err(LlvmCovError::UnsupportedFormat(format!(
            "{field} must be {expected}, found '{found}'"
        ))),
        None => Err(LlvmCovError::UnsupportedFormat(format!(
            "{field} must be {expected}, found none"
        ))),
    }
}
