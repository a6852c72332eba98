#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz the snapshot loading entry point.
///
/// Arbitrary UTF-8 goes through format sniffing, document decoding, schema
/// construction and instance validation.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = instance_diff::parsers::parse_snapshot_str(s);
    }
});
