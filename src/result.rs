//! In-memory [`CoverageSink`]: an arena of nodes addressed by index, with
//! the roll-up queries a command-line host needs.

use std::collections::BTreeMap;

use crate::adapter::CoverageSink;
use crate::model::{ElementKind, Metric, Ratio};

/// Index of a node inside a [`CoverageResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct ResultNode {
    pub kind: ElementKind,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub relative_source_path: Option<String>,
    pub ratios: BTreeMap<Metric, Ratio>,
    /// Line number → hit count. A repeated paint keeps the last value.
    pub painted: BTreeMap<u32, u64>,
}

#[derive(Debug, Clone, Default)]
pub struct CoverageResult {
    nodes: Vec<ResultNode>,
}

impl CoverageResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The first node registered without a parent.
    pub fn root(&self) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.parent.is_none())
            .map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> &ResultNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &ResultNode)> {
        self.nodes[id.0]
            .children
            .iter()
            .map(move |&child| (child, &self.nodes[child.0]))
    }

    /// All nodes of `kind` under `id` (inclusive), in registration order.
    pub fn descendants_of_kind(&self, id: NodeId, kind: ElementKind) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current.0];
            if node.kind == kind {
                out.push(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First file node whose relative source path matches.
    pub fn find_file(&self, path: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| {
                n.kind == ElementKind::File && n.relative_source_path.as_deref() == Some(path)
            })
            .map(NodeId)
    }

    /// Sum of `metric` over the node and everything below it.
    pub fn aggregate(&self, id: NodeId, metric: Metric) -> Ratio {
        let node = &self.nodes[id.0];
        let own = node.ratios.get(&metric).copied().unwrap_or_default();
        node.children
            .iter()
            .fold(own, |acc, &child| acc + self.aggregate(child, metric))
    }
}

impl CoverageSink for CoverageResult {
    type Node = NodeId;

    fn construct_node(&mut self, kind: ElementKind, parent: Option<NodeId>, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ResultNode {
            kind,
            name: name.to_string(),
            parent,
            children: Vec::new(),
            relative_source_path: None,
            ratios: BTreeMap::new(),
            painted: BTreeMap::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn set_relative_source_path(&mut self, node: NodeId, path: &str) {
        self.nodes[node.0].relative_source_path = Some(path.to_string());
    }

    fn update_ratio(&mut self, node: NodeId, metric: Metric, ratio: Ratio) {
        self.nodes[node.0].ratios.insert(metric, ratio);
    }

    fn paint_line(&mut self, node: NodeId, line_number: u32, hit_count: u64) {
        self.nodes[node.0].painted.insert(line_number, hit_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_links_parent_and_children() {
        let mut result = CoverageResult::new();
        let root = result.construct_node(ElementKind::Report, None, "r");
        let data = result.construct_node(ElementKind::Data, Some(root), "data");

        assert_eq!(result.len(), 2);
        assert_eq!(result.root(), Some(root));
        assert_eq!(result.node(data).parent, Some(root));
        let children: Vec<_> = result.children(root).map(|(id, _)| id).collect();
        assert_eq!(children, vec![data]);
    }

    #[test]
    fn test_aggregate_sums_descendants() {
        let mut result = CoverageResult::new();
        let root = result.construct_node(ElementKind::Report, None, "r");
        let dir = result.construct_node(ElementKind::Directory, Some(root), "src");
        let a = result.construct_node(ElementKind::File, Some(dir), "src/a.c");
        let b = result.construct_node(ElementKind::File, Some(dir), "src/b.c");
        result.update_ratio(a, Metric::Line, Ratio::new(3, 4));
        result.update_ratio(b, Metric::Line, Ratio::new(1, 6));
        result.update_ratio(b, Metric::Function, Ratio::new(1, 2));

        assert_eq!(result.aggregate(root, Metric::Line), Ratio::new(4, 10));
        assert_eq!(result.aggregate(dir, Metric::Function), Ratio::new(1, 2));
        assert_eq!(result.aggregate(a, Metric::Function), Ratio::default());
    }

    #[test]
    fn test_find_file_and_paint() {
        let mut result = CoverageResult::new();
        let root = result.construct_node(ElementKind::Report, None, "r");
        let file = result.construct_node(ElementKind::File, Some(root), "a.c");
        result.set_relative_source_path(file, "a.c");
        result.paint_line(file, 4, 1);
        result.paint_line(file, 4, 7);

        assert_eq!(result.find_file("a.c"), Some(file));
        assert_eq!(result.find_file("b.c"), None);
        assert_eq!(result.node(file).painted.get(&4), Some(&7));
        assert_eq!(
            result.descendants_of_kind(root, ElementKind::File),
            vec![file]
        );
    }
}
