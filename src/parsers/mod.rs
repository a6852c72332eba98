//! Snapshot parsers.
//!
//! A snapshot is one serialized copy of an object store: its schema plus
//! every instance. Snapshots are written as JSON or YAML; the format is
//! taken from the file extension and sniffed from the content otherwise.
//!
//! ## Usage
//!
//! ```no_run
//! use instance_diff::parsers::load_snapshot;
//! use std::path::Path;
//!
//! let snapshot = load_snapshot(Path::new("release-86.json")).unwrap();
//! println!("{} instances", snapshot.store.instance_count());
//! ```

mod detection;
mod snapshot;
mod traits;

pub use detection::SnapshotFormat;
pub use snapshot::{
    AttributeDocument, AttributeKind, ClassDocument, InstanceDocument, RawItem, RawValue,
    SchemaDocument, SnapshotDocument,
};
pub use traits::ParseError;

use crate::store::InMemoryStore;
use std::path::Path;
use xxhash_rust::xxh3::xxh3_64;

/// A loaded snapshot
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Store holding the snapshot's instances
    pub store: InMemoryStore,
    /// Format the snapshot was read from
    pub format: SnapshotFormat,
    /// xxh3 hash of the raw content
    pub fingerprint: u64,
}

impl Snapshot {
    /// Hex rendering of the content fingerprint
    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        format!("{:016x}", self.fingerprint)
    }
}

/// Parse a snapshot from a string, detecting the format from its content.
pub fn parse_snapshot_str(content: &str) -> Result<Snapshot, ParseError> {
    parse_snapshot_as(content, SnapshotFormat::sniff(content))
}

/// Parse a snapshot from a string in a known format.
pub fn parse_snapshot_as(content: &str, format: SnapshotFormat) -> Result<Snapshot, ParseError> {
    let document: SnapshotDocument = match format {
        SnapshotFormat::Json => serde_json::from_str(content)?,
        SnapshotFormat::Yaml => serde_yaml_ng::from_str(content)?,
    };

    let store = document.into_store()?;
    tracing::debug!(
        format = format.name(),
        instances = store.instance_count(),
        "parsed snapshot"
    );

    Ok(Snapshot {
        store,
        format,
        fingerprint: xxh3_64(content.as_bytes()),
    })
}

/// Load a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, ParseError> {
    let content = std::fs::read_to_string(path)?;
    let format = SnapshotFormat::detect(Some(path), &content);
    parse_snapshot_as(&content, format)
}
