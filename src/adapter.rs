//! Hand-off of a converted report to a coverage aggregation library.
//!
//! The library owns node storage, ratio roll-up and percentages. We only
//! need four operations from it, captured by [`CoverageSink`].
use crate::model::{ElementKind, Metric, Ratio, ReportNode};

/// Name given to the report element, prefixed to the caller's report name.
pub const REPORT_ELEMENT_NAME: &str = "llvm-cov";

/// The operations a host aggregation library must provide.
pub trait CoverageSink {
    /// Handle to a node owned by the sink. Children refer to their parent
    /// through it; it carries no ownership.
    type Node: Copy;

    fn construct_node(
        &mut self,
        kind: ElementKind,
        parent: Option<Self::Node>,
        name: &str,
    ) -> Self::Node;

    fn set_relative_source_path(&mut self, node: Self::Node, path: &str);

    fn update_ratio(&mut self, node: Self::Node, metric: Metric, ratio: Ratio);

    /// Record a hit count for a line of the nearest file-scoped node.
    fn paint_line(&mut self, node: Self::Node, line_number: u32, hit_count: u64);
}

/// Walk `report` top-down and register every node with `sink`.
/// Returns the handle of the report node.
pub fn publish<S: CoverageSink>(report: &ReportNode, sink: &mut S) -> S::Node {
    let root = sink.construct_node(
        ElementKind::Report,
        None,
        &format!("{REPORT_ELEMENT_NAME}: {}", report.name),
    );

    for data in &report.data {
        let data_node = sink.construct_node(ElementKind::Data, Some(root), &data.name);

        for dir in &data.directories {
            let dir_node = sink.construct_node(ElementKind::Directory, Some(data_node), &dir.name);

            for file in &dir.files {
                let file_node =
                    sink.construct_node(ElementKind::File, Some(dir_node), &file.filename);
                sink.set_relative_source_path(file_node, &file.filename);
                sink.update_ratio(file_node, Metric::Line, file.line_ratio);
                sink.update_ratio(file_node, Metric::Function, file.function_ratio);

                for line in &file.lines {
                    sink.paint_line(file_node, line.line_number, line.hit_count);
                }

                for func in &file.functions {
                    let func_node =
                        sink.construct_node(ElementKind::Function, Some(file_node), &func.name);
                    for line in &func.lines {
                        sink.paint_line(func_node, line.line_number, line.hit_count);
                    }
                }
            }
        }
    }

    root
}
