#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Reader must not panic on any input; whatever it accepts must render.
    if let Ok(report) = llvm_covrs::xml::read_report(data) {
        let _ = llvm_covrs::xml::write_report(&report);
    }
});
