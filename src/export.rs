//! Typed view of an `llvm-cov export -format=text` JSON document.
//!
//! Reference: https://github.com/llvm/llvm-project/blob/main/llvm/tools/llvm-cov/CoverageExporterJson.cpp
//!
//! Layout (only the parts we read):
//!   { "version": "2.0.0", "type": "llvm.coverage.json.export",
//!     "data": [ {
//!       "files": [ { "filename": "...",
//!                    "segments": [[line, col, count, hasCount, isRegionEntry, isGapRegion], ...],
//!                    "summary": { "lines": { "covered": N, "count": N },
//!                                 "functions": { "covered": N, "count": N } } } ],
//!       "functions": [ { "name": "...",
//!                        "regions": [[lineStart, colStart, lineEnd, colEnd, count, ...], ...],
//!                        "filenames": ["..."] } ] } ] }
//!
//! Everything else (`totals`, `branches`, `expansions`, ...) is ignored.
use serde_json::Value;

use crate::error::{LlvmCovError, Result};
use crate::model::Ratio;
use crate::schema;

/// A validated export document.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageDocument {
    pub version: String,
    pub kind: String,
    pub data: Vec<DataSet>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub files: Vec<FileEntry>,
    pub functions: Vec<FunctionEntry>,
}

/// A coverage event: from `(line, column)` onwards, `count` applies until the
/// next segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Segment {
    pub line: u32,
    pub column: u32,
    pub count: u64,
    pub has_count: bool,
    pub is_region_entry: bool,
    pub is_gap_region: bool,
}

impl Segment {
    pub fn new(line: u32, count: u64, has_count: bool) -> Self {
        Self {
            line,
            count,
            has_count,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileEntry {
    pub filename: String,
    pub segments: Vec<Segment>,
    pub lines: Ratio,
    pub functions: Ratio,
}

/// Inclusive line span of a function region. Columns are not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start_line: u32,
    pub end_line: u32,
}

impl Region {
    pub fn contains(&self, line: u32) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionEntry {
    pub name: String,
    pub regions: Vec<Region>,
    pub filenames: Vec<String>,
}

impl CoverageDocument {
    /// Parse raw JSON bytes into a validated document.
    pub fn parse(input: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(input)?;
        Self::from_value(&value)
    }

    /// Validate the header, then decode every data set. The first missing
    /// field aborts the whole document.
    pub fn from_value(value: &Value) -> Result<Self> {
        let data = schema::validate(value)?;

        let data = data
            .iter()
            .enumerate()
            .map(|(i, entry)| parse_data_set(entry, &format!("data[{i}]")))
            .collect::<Result<Vec<_>>>()?;

        Ok(CoverageDocument {
            version: schema::SUPPORTED_VERSION.to_string(),
            kind: schema::EXPORT_TYPE.to_string(),
            data,
        })
    }
}

fn parse_data_set(entry: &Value, path: &str) -> Result<DataSet> {
    let files = array(entry, "files", path)?
        .iter()
        .enumerate()
        .map(|(i, file)| parse_file(file, &format!("{path}.files[{i}]")))
        .collect::<Result<Vec<_>>>()?;

    let functions = array(entry, "functions", path)?
        .iter()
        .enumerate()
        .map(|(i, func)| parse_function(func, &format!("{path}.functions[{i}]")))
        .collect::<Result<Vec<_>>>()?;

    Ok(DataSet { files, functions })
}

fn parse_file(file: &Value, path: &str) -> Result<FileEntry> {
    let filename = string(file, "filename", path)?;

    let segments = array(file, "segments", path)?
        .iter()
        .enumerate()
        .map(|(i, seg)| parse_segment(seg, &format!("{path}.segments[{i}]")))
        .collect::<Result<Vec<_>>>()?;

    let summary_path = format!("{path}.summary");
    let summary = file
        .get("summary")
        .ok_or_else(|| missing(&summary_path))?;

    Ok(FileEntry {
        filename,
        segments,
        lines: parse_ratio(summary, "lines", &summary_path)?,
        functions: parse_ratio(summary, "functions", &summary_path)?,
    })
}

fn parse_ratio(summary: &Value, key: &str, path: &str) -> Result<Ratio> {
    let path = format!("{path}.{key}");
    let entry = summary.get(key).ok_or_else(|| missing(&path))?;
    Ok(Ratio::new(
        uint(entry, "covered", &path)?,
        uint(entry, "count", &path)?,
    ))
}

/// `[line, col, count, hasCount, isRegionEntry, isGapRegion]`. The two
/// trailing flags are absent in some older exports.
fn parse_segment(seg: &Value, path: &str) -> Result<Segment> {
    let items = seg.as_array().ok_or_else(|| missing(path))?;

    Ok(Segment {
        line: index_u32(items, 0, path)?,
        column: index_u32(items, 1, path)?,
        count: index_u64(items, 2, path)?,
        has_count: index_flag(items, 3, path)?,
        is_region_entry: items.get(4).map(flag).unwrap_or(false),
        is_gap_region: items.get(5).map(flag).unwrap_or(false),
    })
}

fn parse_function(func: &Value, path: &str) -> Result<FunctionEntry> {
    let name = string(func, "name", path)?;

    let regions = array(func, "regions", path)?
        .iter()
        .enumerate()
        .map(|(i, region)| {
            let region_path = format!("{path}.regions[{i}]");
            let items = region.as_array().ok_or_else(|| missing(&region_path))?;
            Ok(Region {
                start_line: index_u32(items, 0, &region_path)?,
                end_line: index_u32(items, 2, &region_path)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let filenames = array(func, "filenames", path)?
        .iter()
        .enumerate()
        .map(|(i, name)| {
            name.as_str()
                .map(str::to_string)
                .ok_or_else(|| missing(&format!("{path}.filenames[{i}]")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FunctionEntry {
        name,
        regions,
        filenames,
    })
}

// ── Field helpers ──────────────────────────────────────────────────────────

fn missing(path: &str) -> LlvmCovError {
    LlvmCovError::MissingField(path.to_string())
}

fn array<'a>(value: &'a Value, key: &str, path: &str) -> Result<&'a Vec<Value>> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| missing(&format!("{path}.{key}")))
}

fn string(value: &Value, key: &str, path: &str) -> Result<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| missing(&format!("{path}.{key}")))
}

fn uint(value: &Value, key: &str, path: &str) -> Result<u64> {
    value
        .get(key)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| missing(&format!("{path}.{key}")))
}

fn index_u64(items: &[Value], idx: usize, path: &str) -> Result<u64> {
    items
        .get(idx)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| missing(&format!("{path}[{idx}]")))
}

fn index_u32(items: &[Value], idx: usize, path: &str) -> Result<u32> {
    let value = index_u64(items, idx, path)?;
    u32::try_from(value).map_err(|_| missing(&format!("{path}[{idx}]")))
}

fn index_flag(items: &[Value], idx: usize, path: &str) -> Result<bool> {
    match items.get(idx) {
        Some(v @ (Value::Bool(_) | Value::Number(_))) => Ok(flag(v)),
        _ => Err(missing(&format!("{path}[{idx}]"))),
    }
}

/// Flags are booleans in current exports and 0/1 integers in older ones.
fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_u64() == Some(1),
        _ => false,
    }
}
