//! The normalized coverage hierarchy produced from an llvm-cov export.
//! Ownership flows strictly downwards: a `ReportNode` owns its data sets,
//! which own directories, which own files, which own functions and lines.

use serde::Serialize;

/// Compute a coverage rate, returning 0.0 when the total is zero.
#[must_use]
pub fn rate(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    }
}

/// A covered/total pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Ratio {
    pub covered: u64,
    pub total: u64,
}

impl Ratio {
    pub fn new(covered: u64, total: u64) -> Self {
        Self { covered, total }
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        rate(self.covered, self.total)
    }
}

impl std::ops::Add for Ratio {
    type Output = Ratio;

    fn add(self, other: Ratio) -> Ratio {
        Ratio::new(self.covered + other.covered, self.total + other.total)
    }
}

/// A line with a known hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    pub line_number: u32,
    pub hit_count: u64,
}

impl LineRecord {
    pub fn new(line_number: u32, hit_count: u64) -> Self {
        Self {
            line_number,
            hit_count,
        }
    }
}

/// A function and the lines attributed to it through its regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionNode {
    pub name: String,
    pub lines: Vec<LineRecord>,
}

/// Coverage data for a single source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileNode {
    pub filename: String,
    pub line_ratio: Ratio,
    pub function_ratio: Ratio,
    pub lines: Vec<LineRecord>,
    pub functions: Vec<FunctionNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryNode {
    pub name: String,
    pub files: Vec<FileNode>,
}

/// One coverage snapshot (one entry of the export's `data` array).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataNode {
    pub name: String,
    pub directories: Vec<DirectoryNode>,
}

impl DataNode {
    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.directories.iter().flat_map(|d| d.files.iter())
    }
}

/// The root of a converted report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportNode {
    pub name: String,
    pub data: Vec<DataNode>,
}

impl ReportNode {
    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.data.iter().flat_map(|d| d.files())
    }

    /// First file with exactly this filename, across all data sets.
    pub fn find_file(&self, filename: &str) -> Option<&FileNode> {
        self.files().find(|f| f.filename == filename)
    }
}

/// Kinds of node handed to a [`crate::adapter::CoverageSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    Report,
    Data,
    Directory,
    File,
    Function,
}

impl ElementKind {
    /// Element name used in the intermediate XML document.
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Report => "report",
            ElementKind::Data => "data",
            ElementKind::Directory => "directory",
            ElementKind::File => "file",
            ElementKind::Function => "function",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Report => "Report",
            ElementKind::Data => "LLVM Data",
            ElementKind::Directory => "LLVM Directory",
            ElementKind::File => "LLVM File",
            ElementKind::Function => "LLVM Function",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Ratios a file node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Metric {
    Line,
    Function,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Line => "line",
            Metric::Function => "function",
        }
    }
}
