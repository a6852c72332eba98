//! Snapshot loading stage.

use crate::error::{ErrorContext, Result};
use crate::parsers::Snapshot;
use crate::store::{InMemoryStore, ObjectStore};
use std::path::{Path, PathBuf};

/// A snapshot together with the path it was read from
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    /// Source file
    pub path: PathBuf,
    /// Parsed snapshot
    pub snapshot: Snapshot,
}

impl LoadedSnapshot {
    /// The object store built from the snapshot
    #[must_use]
    pub const fn store(&self) -> &InMemoryStore {
        &self.snapshot.store
    }

    /// Content fingerprint as hex
    #[must_use]
    pub fn fingerprint(&self) -> String {
        self.snapshot.fingerprint_hex()
    }

    /// Path rendered for reports
    #[must_use]
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Load a snapshot with context for error messages
pub fn load_snapshot_with_context(path: &Path, quiet: bool) -> Result<LoadedSnapshot> {
    if !quiet {
        tracing::info!("Loading snapshot: {:?}", path);
    }

    let snapshot = crate::parsers::load_snapshot(path)
        .with_context(|| format!("{}", path.display()))?;

    if !quiet {
        tracing::info!(
            "Loaded {} instances ({} classes)",
            snapshot.store.instance_count(),
            snapshot.store.schema().class_count()
        );
    }

    let dangling = snapshot.store.dangling_references();
    if !dangling.is_empty() {
        tracing::warn!(
            "{} references in {} point at missing instances",
            dangling.len(),
            path.display()
        );
    }

    Ok(LoadedSnapshot {
        path: path.to_path_buf(),
        snapshot,
    })
}
