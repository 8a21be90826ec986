//! Command handler functions for the llvm-covrs CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::fmt::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::adapter::publish;
use crate::model::{ElementKind, Ratio, ReportNode};
use crate::report::{self, FileSummary, ReportSummary};
use crate::result::{CoverageResult, NodeId};
use crate::xml;

/// Output format for the `export` command.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    Json,
    Xml,
}

fn published(report: &ReportNode) -> (CoverageResult, NodeId) {
    let mut result = CoverageResult::new();
    let root = publish(report, &mut result);
    (result, root)
}

fn percent(ratio: Ratio) -> f64 {
    ratio.rate() * 100.0
}

pub fn cmd_summary(report: &ReportNode) -> Result<String> {
    let (result, root) = published(report);
    let summary = ReportSummary::from_result(&result, root);

    let mut out = String::new();
    writeln!(out, "Report:     {}", summary.name).unwrap();
    writeln!(out, "Data sets:  {}", summary.data_sets).unwrap();
    writeln!(out, "Files:      {}", summary.total_files).unwrap();
    writeln!(
        out,
        "Lines:      {}/{} ({:.1}%)",
        summary.lines.covered,
        summary.lines.total,
        percent(summary.lines)
    )
    .unwrap();
    if summary.functions.total > 0 {
        writeln!(
            out,
            "Functions:  {}/{} ({:.1}%)",
            summary.functions.covered,
            summary.functions.total,
            percent(summary.functions)
        )
        .unwrap();
    }
    Ok(out)
}

pub fn cmd_files(report: &ReportNode, sort_by_coverage: bool) -> Result<String> {
    let (result, root) = published(report);
    let mut files: Vec<FileSummary> = report::file_summaries(&result, root);

    if sort_by_coverage {
        files.sort_by(|a, b| a.lines.rate().total_cmp(&b.lines.rate()));
    }

    let mut out = String::new();
    writeln!(
        out,
        "{:<60} {:>8} {:>8} {:>8} {:>10}",
        "FILE", "LINES", "COVERED", "RATE", "FUNCTIONS"
    )
    .unwrap();
    writeln!(out, "{}", "-".repeat(98)).unwrap();

    for f in &files {
        writeln!(
            out,
            "{:<60} {:>8} {:>8} {:>7.1}% {:>10}",
            f.path,
            f.lines.total,
            f.lines.covered,
            percent(f.lines),
            format!("{}/{}", f.functions.covered, f.functions.total)
        )
        .unwrap();
    }

    Ok(out)
}

pub fn cmd_lines(report: &ReportNode, source_file: &str, uncovered: bool) -> Result<String> {
    let (result, _) = published(report);
    let file = result
        .find_file(source_file)
        .with_context(|| format!("Source file not found: {source_file}"))?;
    let lines = report::painted_lines(&result, file);

    if uncovered {
        let ranges = report::uncovered_ranges(&lines);
        if ranges.is_empty() {
            return Ok(format!(
                "All instrumentable lines are covered in '{}'\n",
                source_file
            ));
        }

        let count = lines.iter().filter(|l| l.hit_count == 0).count();
        let mut out = String::new();
        writeln!(out, "Uncovered lines in '{}':", source_file).unwrap();
        writeln!(out, "  {}", report::format_ranges(&ranges)).unwrap();
        writeln!(out, "  ({} lines)", count).unwrap();
        return Ok(out);
    }

    if lines.is_empty() {
        return Ok(format!("No line data for '{}'\n", source_file));
    }

    let mut out = String::new();
    writeln!(out, "{:>6}  {:>10}", "LINE", "HITS").unwrap();
    writeln!(out, "{}", "-".repeat(18)).unwrap();
    for line in &lines {
        let marker = if line.hit_count > 0 { "✓" } else { "✗" };
        writeln!(
            out,
            "{:>6}  {:>10}  {}",
            line.line_number, line.hit_count, marker
        )
        .unwrap();
    }
    Ok(out)
}

pub fn cmd_functions(report: &ReportNode, source_file: &str) -> Result<String> {
    let (result, _) = published(report);
    let file = result
        .find_file(source_file)
        .with_context(|| format!("Source file not found: {source_file}"))?;

    let functions: Vec<_> = result
        .children(file)
        .filter(|(_, node)| node.kind == ElementKind::Function)
        .collect();

    if functions.is_empty() {
        return Ok(format!("No functions recorded for '{}'\n", source_file));
    }

    let mut out = String::new();
    writeln!(out, "{:<50} {}", "FUNCTION", "LINES").unwrap();
    writeln!(out, "{}", "-".repeat(70)).unwrap();
    for (id, node) in functions {
        let lines = report::painted_lines(&result, id)
            .iter()
            .map(|l| format!("{}:{}", l.line_number, l.hit_count))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{:<50} {}", node.name, lines).unwrap();
    }
    Ok(out)
}

pub fn cmd_export(report: &ReportNode, format: ExportFormat) -> Result<String> {
    let mut out = match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")?
        }
        ExportFormat::Xml => xml::write_report(report)?,
    };
    out.push('\n');
    Ok(out)
}
