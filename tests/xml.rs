mod common;

use llvm_covrs::error::LlvmCovError;
use llvm_covrs::tree::convert;
use llvm_covrs::xml::{read_report, write_report};
use pretty_assertions::assert_eq;

#[test]
fn xml_preserves_converted_report() {
    let report = convert(&common::read_fixture("sample_export.json"), "sample").unwrap();

    let xml = write_report(&report).unwrap();
    let back = read_report(xml.as_bytes()).unwrap();

    assert_eq!(back, report);
}

#[test]
fn xml_preserves_multiple_data_sets() {
    let report = convert(&common::read_fixture("multi_data.json"), "multi").unwrap();

    let xml = write_report(&report).unwrap();
    assert!(xml.contains("<data name=\"data0\">"));
    assert!(xml.contains("<data name=\"data1\">"));

    assert_eq!(read_report(xml.as_bytes()).unwrap(), report);
}

#[test]
fn xml_output_is_stable() {
    let input = common::read_fixture("sample_export.json");
    let first = write_report(&convert(&input, "r").unwrap()).unwrap();
    let second = write_report(&convert(&input, "r").unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn xml_rejects_foreign_document() {
    let err = read_report(b"<coverage line-rate=\"0.5\"></coverage>").unwrap_err();
    assert!(matches!(err, LlvmCovError::UnsupportedFormat(_)));
}
