#![no_main]
use libfuzzer_sys::fuzz_target;
use llvm_covrs::export::CoverageDocument;

/// Gap filling emits one record per line in the gap, so memory grows with
/// the line span of a file's segments. Spans above this are skipped to stay
/// under libFuzzer's RSS limit.
const MAX_LINE_SPAN: u32 = 1 << 16;

fn line_span_ok(document: &CoverageDocument) -> bool {
    document.data.iter().flat_map(|d| d.files.iter()).all(|file| {
        let lines = file.segments.iter().map(|s| s.line);
        match (lines.clone().min(), lines.max()) {
            (Some(lo), Some(hi)) => hi - lo <= MAX_LINE_SPAN,
            _ => true,
        }
    })
}

fuzz_target!(|data: &[u8]| {
    // Conversion must not panic on any input within the line span limit.
    match CoverageDocument::parse(data) {
        Ok(document) if !line_span_ok(&document) => {}
        _ => {
            let _ = llvm_covrs::tree::convert(data, "fuzz");
        }
    }
});
