#![no_main]
use instance_diff::parsers::{parse_snapshot_as, SnapshotFormat};
use libfuzzer_sys::fuzz_target;

// Both decoders on the same input, regardless of what sniffing says.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = SnapshotFormat::sniff(s);
        let _ = parse_snapshot_as(s, SnapshotFormat::Json);
        let _ = parse_snapshot_as(s, SnapshotFormat::Yaml);
    }
});
