//! Snapshot format detection.

use std::path::Path;

/// Serialization format of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Get the human-readable name for this format.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    /// Format implied by a file extension, if any
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Sniff the format from content.
    ///
    /// JSON documents start with `{` after whitespace; anything else is
    /// treated as YAML (a superset of JSON anyway).
    #[must_use]
    pub fn sniff(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            Self::Json
        } else {
            Self::Yaml
        }
    }

    /// Extension first, content sniffing as fallback
    #[must_use]
    pub fn detect(path: Option<&Path>, content: &str) -> Self {
        path.and_then(Self::from_path)
            .unwrap_or_else(|| Self::sniff(content))
    }
}

impl std::fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(SnapshotFormat::from_path(Path::new("a/db.json")), Some(SnapshotFormat::Json));
        assert_eq!(SnapshotFormat::from_path(Path::new("db.YML")), Some(SnapshotFormat::Yaml));
        assert_eq!(SnapshotFormat::from_path(Path::new("db.txt")), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(SnapshotFormat::sniff("  \n{\"schema\": {}}"), SnapshotFormat::Json);
        assert_eq!(SnapshotFormat::sniff("schema:\n  classes: []"), SnapshotFormat::Yaml);
    }

    #[test]
    fn test_extension_wins_over_content() {
        let detected = SnapshotFormat::detect(Some(Path::new("db.yaml")), "{}");
        assert_eq!(detected, SnapshotFormat::Yaml);
        assert_eq!(SnapshotFormat::detect(None, "{}"), SnapshotFormat::Json);
    }
}
