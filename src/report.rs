//! Summaries computed from a published [`CoverageResult`], for display.

use crate::model::{ElementKind, LineRecord, Metric, Ratio};
use crate::result::{CoverageResult, NodeId};

/// Totals for a whole report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub name: String,
    pub data_sets: usize,
    pub total_files: usize,
    pub lines: Ratio,
    pub functions: Ratio,
}

impl ReportSummary {
    pub fn from_result(result: &CoverageResult, root: NodeId) -> Self {
        ReportSummary {
            name: result.node(root).name.clone(),
            data_sets: result.descendants_of_kind(root, ElementKind::Data).len(),
            total_files: result.descendants_of_kind(root, ElementKind::File).len(),
            lines: result.aggregate(root, Metric::Line),
            functions: result.aggregate(root, Metric::Function),
        }
    }
}

/// Per-file summary row.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub path: String,
    pub lines: Ratio,
    pub functions: Ratio,
}

/// One row per file node, in registration order.
pub fn file_summaries(result: &CoverageResult, root: NodeId) -> Vec<FileSummary> {
    result
        .descendants_of_kind(root, ElementKind::File)
        .into_iter()
        .map(|id| {
            let node = result.node(id);
            FileSummary {
                path: node
                    .relative_source_path
                    .clone()
                    .unwrap_or_else(|| node.name.clone()),
                lines: node.ratios.get(&Metric::Line).copied().unwrap_or_default(),
                functions: node
                    .ratios
                    .get(&Metric::Function)
                    .copied()
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Lines painted on a node, in line order.
pub fn painted_lines(result: &CoverageResult, id: NodeId) -> Vec<LineRecord> {
    result
        .node(id)
        .painted
        .iter()
        .map(|(&line, &hits)| LineRecord::new(line, hits))
        .collect()
}

/// Widest run of lines without any record that may be folded into an
/// uncovered range.
const MAX_BRIDGE_GAP: u32 = 2;

/// Ranges of zero-hit lines. Two uncovered lines separated only by lines
/// that have no record at all (at most [`MAX_BRIDGE_GAP`] of them) end up in
/// the same range. `lines` must be sorted by line number.
#[must_use]
pub fn uncovered_ranges(lines: &[LineRecord]) -> Vec<(u32, u32)> {
    let mut ranges: Vec<(u32, u32)> = Vec::new();
    let mut last_recorded: Option<u32> = None;

    for line in lines {
        let n = line.line_number;
        if line.hit_count == 0 {
            match ranges.last_mut() {
                // Extend when every line since the range end had no record.
                Some((_, end))
                    if last_recorded == Some(*end)
                        && n.saturating_sub(*end + 1) <= MAX_BRIDGE_GAP =>
                {
                    *end = n;
                }
                _ => ranges.push((n, n)),
            }
        }
        last_recorded = Some(n);
    }

    ranges
}

/// Format ranges as "1, 3-5, 8".
#[must_use]
pub fn format_ranges(ranges: &[(u32, u32)]) -> String {
    ranges
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
