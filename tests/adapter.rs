mod common;

use llvm_covrs::adapter::publish;
use llvm_covrs::model::{ElementKind, Metric, Ratio};
use llvm_covrs::result::CoverageResult;
use llvm_covrs::tree::convert;

fn published() -> (CoverageResult, llvm_covrs::result::NodeId) {
    let report = convert(&common::read_fixture("sample_export.json"), "sample").unwrap();
    let mut result = CoverageResult::new();
    let root = publish(&report, &mut result);
    (result, root)
}

#[test]
fn publish_builds_full_hierarchy() {
    let (result, root) = published();

    assert_eq!(result.root(), Some(root));
    assert_eq!(result.node(root).kind, ElementKind::Report);
    assert_eq!(result.node(root).name, "llvm-cov: sample");

    assert_eq!(result.descendants_of_kind(root, ElementKind::Data).len(), 1);
    assert_eq!(result.descendants_of_kind(root, ElementKind::Directory).len(), 3);
    assert_eq!(result.descendants_of_kind(root, ElementKind::File).len(), 3);
    assert_eq!(result.descendants_of_kind(root, ElementKind::Function).len(), 4);
}

#[test]
fn publish_links_parents() {
    let (result, root) = published();

    let file = result.find_file("src/util/strings.c").unwrap();
    let dir = result.node(file).parent.unwrap();
    assert_eq!(result.node(dir).kind, ElementKind::Directory);
    assert_eq!(result.node(dir).name, "src/util");

    let data = result.node(dir).parent.unwrap();
    assert_eq!(result.node(data).name, "data");
    assert_eq!(result.node(data).parent, Some(root));
}

#[test]
fn publish_sets_ratios_and_paints_lines() {
    let (result, root) = published();

    let file = result.find_file("src/main.c").unwrap();
    let node = result.node(file);
    assert_eq!(node.ratios.get(&Metric::Line), Some(&Ratio::new(2, 4)));
    assert_eq!(node.ratios.get(&Metric::Function), Some(&Ratio::new(1, 1)));
    assert_eq!(
        node.painted.iter().map(|(&l, &h)| (l, h)).collect::<Vec<_>>(),
        vec![(1, 5), (2, 5), (3, 0), (4, 0)]
    );

    let (_, main_fn) = result
        .children(file)
        .find(|(_, n)| n.kind == ElementKind::Function)
        .unwrap();
    assert_eq!(main_fn.name, "main");
    assert_eq!(main_fn.painted.get(&1), Some(&5));

    // Report totals roll up from the per-file summaries.
    assert_eq!(result.aggregate(root, Metric::Line), Ratio::new(4, 7));
    assert_eq!(result.aggregate(root, Metric::Function), Ratio::new(2, 4));
}
