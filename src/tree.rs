//! Assembly of the report hierarchy from a validated export document.
//!
//! Every node is built completely before it is attached to its parent, so a
//! failure anywhere leaves nothing behind.

use crate::error::Result;
use crate::export::{CoverageDocument, DataSet};
use crate::functions::{map_functions, FileLines};
use crate::group::group_by_directory;
use crate::model::{DataNode, FileNode, ReportNode};
use crate::segments::expand_lines;

/// Parse, validate and convert raw export bytes in one step.
pub fn convert(input: &[u8], report_name: &str) -> Result<ReportNode> {
    let document = CoverageDocument::parse(input)?;
    build_report(&document, report_name)
}

/// Build the full hierarchy for a document.
pub fn build_report(document: &CoverageDocument, report_name: &str) -> Result<ReportNode> {
    let single = document.data.len() == 1;

    let data = document
        .data
        .iter()
        .enumerate()
        .map(|(i, data_set)| {
            let name = if single {
                "data".to_string()
            } else {
                format!("data{i}")
            };
            build_data(name, data_set)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ReportNode {
        name: report_name.to_string(),
        data,
    })
}

fn build_data(name: String, data_set: &DataSet) -> Result<DataNode> {
    let expanded = data_set
        .files
        .iter()
        .map(|file| expand_lines(&file.filename, &file.segments))
        .collect::<Result<Vec<_>>>()?;

    let views: Vec<FileLines<'_>> = data_set
        .files
        .iter()
        .zip(&expanded)
        .map(|(file, lines)| FileLines {
            filename: &file.filename,
            lines,
        })
        .collect();
    let functions = map_functions(&data_set.functions, &views);

    // Ratios come straight from the export summary; the expanded lines are
    // for painting only.
    let files: Vec<FileNode> = data_set
        .files
        .iter()
        .zip(expanded)
        .zip(functions)
        .map(|((entry, lines), functions)| FileNode {
            filename: entry.filename.clone(),
            line_ratio: entry.lines,
            function_ratio: entry.functions,
            lines,
            functions,
        })
        .collect();

    log::debug!(
        "{name}: {} files, {} functions",
        files.len(),
        data_set.functions.len()
    );

    Ok(DataNode {
        name,
        directories: group_by_directory(files),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlvmCovError;
    use crate::export::{FileEntry, FunctionEntry, Region, Segment};
    use crate::model::{LineRecord, Ratio};

    fn file(filename: &str, segments: Vec<Segment>, lines: Ratio, functions: Ratio) -> FileEntry {
        FileEntry {
            filename: filename.to_string(),
            segments,
            lines,
            functions,
        }
    }

    fn document(data: Vec<DataSet>) -> CoverageDocument {
        CoverageDocument {
            version: "2.0.0".to_string(),
            kind: "llvm.coverage.json.export".to_string(),
            data,
        }
    }

    #[test]
    fn test_single_data_set_named_data() {
        let doc = document(vec![DataSet::default()]);
        let report = build_report(&doc, "unit").unwrap();
        assert_eq!(report.name, "unit");
        assert_eq!(report.data.len(), 1);
        assert_eq!(report.data[0].name, "data");
    }

    #[test]
    fn test_multiple_data_sets_numbered() {
        let doc = document(vec![DataSet::default(), DataSet::default(), DataSet::default()]);
        let report = build_report(&doc, "unit").unwrap();
        let names: Vec<_> = report.data.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["data0", "data1", "data2"]);
    }

    #[test]
    fn test_ratios_taken_from_summary() {
        // Summary claims 9/10 even though only one line expands.
        let doc = document(vec![DataSet {
            files: vec![file(
                "src/a.c",
                vec![Segment::new(3, 1, true)],
                Ratio::new(9, 10),
                Ratio::new(2, 3),
            )],
            functions: vec![],
        }]);

        let report = build_report(&doc, "unit").unwrap();
        let node = report.find_file("src/a.c").unwrap();
        assert_eq!(node.line_ratio, Ratio::new(9, 10));
        assert_eq!(node.function_ratio, Ratio::new(2, 3));
        assert_eq!(node.lines, vec![LineRecord::new(3, 1)]);
    }

    #[test]
    fn test_functions_attached_to_files() {
        let doc = document(vec![DataSet {
            files: vec![file(
                "main.c",
                vec![Segment::new(10, 2, true), Segment::new(12, 0, true)],
                Ratio::new(2, 3),
                Ratio::new(1, 1),
            )],
            functions: vec![FunctionEntry {
                name: "main".to_string(),
                regions: vec![Region {
                    start_line: 10,
                    end_line: 12,
                }],
                filenames: vec!["main.c".to_string()],
            }],
        }]);

        let report = build_report(&doc, "unit").unwrap();
        assert_eq!(report.data[0].directories[0].name, ".");
        let node = &report.data[0].directories[0].files[0];
        assert_eq!(node.lines.len(), 3);
        assert_eq!(node.functions.len(), 1);
        assert_eq!(node.functions[0].lines, vec![LineRecord::new(10, 2)]);
    }

    #[test]
    fn test_bad_segment_order_aborts_everything() {
        let doc = document(vec![
            DataSet {
                files: vec![file("ok.c", vec![], Ratio::default(), Ratio::default())],
                functions: vec![],
            },
            DataSet {
                files: vec![file(
                    "bad.c",
                    vec![Segment::new(5, 1, true), Segment::new(2, 1, true)],
                    Ratio::default(),
                    Ratio::default(),
                )],
                functions: vec![],
            },
        ]);

        assert!(matches!(
            build_report(&doc, "unit"),
            Err(LlvmCovError::MalformedSegmentOrder { .. })
        ));
    }
}
