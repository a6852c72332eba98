//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".instance-diff.yaml",
    ".instance-diff.yml",
    "instance-diff.yaml",
    "instance-diff.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/instance-diff/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path
        && path.exists()
    {
        return Some(path.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir()
        && let Some(path) = find_config_in_dir(&cwd)
    {
        return Some(path);
    }

    if let Some(git_root) = find_git_root()
        && let Some(path) = find_config_in_dir(&git_root)
    {
        return Some(path);
    }

    if let Some(config_dir) = user_config_dir()
        && let Some(path) = find_config_in_dir(&config_dir)
    {
        return Some(path);
    }

    if let Some(home) = dirs::home_dir()
        && let Some(path) = find_config_in_dir(&home)
    {
        return Some(path);
    }

    None
}

/// Per-user configuration directory
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("instance-diff"))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml_ng::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml_ng::Error> for ConfigFileError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults override; this layers CLI
    /// args over file config.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        // Comparison config
        let (ours, theirs, base) = (&mut self.comparison, &other.comparison, &defaults.comparison);
        if theirs.max_depth != base.max_depth {
            ours.max_depth = theirs.max_depth;
        }
        if theirs.skipped_classes != base.skipped_classes {
            ours.skipped_classes.clone_from(&theirs.skipped_classes);
        }
        // Only names beyond the default list are layered on
        for attr in &theirs.excluded_attributes {
            if !base.excluded_attributes.contains(attr)
                && !ours.excluded_attributes.contains(attr)
            {
                ours.excluded_attributes.push(attr.clone());
            }
        }
        if theirs.only_attributes.is_some() {
            ours.only_attributes.clone_from(&theirs.only_attributes);
        }
        ours.class_exclusions.extend(theirs.class_exclusions.iter().cloned());
        ours.exclude_patterns.extend(theirs.exclude_patterns.iter().cloned());
        if theirs.check_referrers {
            ours.check_referrers = true;
        }

        // Output config - only override if explicitly set
        if other.output.format != crate::reports::ReportFormat::Auto {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }
        if other.output.max_items.is_some() {
            self.output.max_items = other.output.max_items;
        }
        if !other.output.include_warnings {
            self.output.include_warnings = false;
        }

        // Behavior config (booleans - if set to true, override)
        if other.behavior.fail_on_diff {
            self.behavior.fail_on_diff = true;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }

        // Batch config
        if !other.batch.parallel {
            self.batch.parallel = false;
        }
        self.batch
            .include_classes
            .extend(other.batch.include_classes.iter().cloned());
        self.batch
            .exclude_classes
            .extend(other.batch.exclude_classes.iter().cloned());
        if other.batch.include_identical {
            self.batch.include_identical = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# instance-diff configuration
# Place this file at .instance-diff.yaml in your project root or ~/.config/instance-diff/

{}
",
        serde_yaml_ng::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# instance-diff Configuration File
# =================================
#
# Place it at:
#   - .instance-diff.yaml in your project root
#   - ~/.config/instance-diff/instance-diff.yaml for global config
#
# CLI arguments always override file settings.

# What is compared
comparison:
  # Reference hops followed from the root pair (0 = root attributes only)
  max_depth: 5
  # Instances of these classes (and subclasses) are never compared
  skipped_classes:
    - InstanceEdit
  # Attributes that are never compared
  excluded_attributes:
    - DB_ID
    - dateTime
    - _timestamp
    - created
    - modified
  # Compare only these attributes
  # only_attributes: [name, displayName, referenceEntity, formula, identifier]
  # Exclude attributes on one class and its subclasses
  class_exclusions: []
  #   - { class: Complex, attribute: hasComponent }
  # Regexes over attribute names
  exclude_patterns: []
  # Compare how many instances refer to each root
  check_referrers: false

# Output configuration
output:
  # Format: auto, text, summary, json
  format: auto
  # Output file path (omit for stdout)
  # file: report.json
  no_color: false
  # Maximum difference lines per pair
  # max_items: 50
  include_warnings: true

# Behavior flags
behavior:
  # Exit with code 1 if any difference is found
  fail_on_diff: false
  quiet: false

# Whole-class comparison
batch:
  parallel: true
  include_classes: []
  exclude_classes: []
  include_identical: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
