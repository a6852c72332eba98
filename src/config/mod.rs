//! Configuration module for instance-diff.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common comparison jobs
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust
//! use instance_diff::config::{AppConfig, ConfigPreset};
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use a preset
//! let config = AppConfig::from_preset(ConfigPreset::Strict);
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .max_depth(3)
//!     .exclude_on_class("Complex", "hasComponent")
//!     .fail_on_diff(true)
//!     .build();
//! ```
//!
//! # Configuration File
//!
//! Place a `.instance-diff.yaml` file in your project root or
//! `~/.config/instance-diff/`:
//!
//! ```yaml
//! comparison:
//!   max_depth: 3
//!   only_attributes: [name, identifier]
//! behavior:
//!   fail_on_diff: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{ConfigPreset, MAX_ALLOWED_DEPTH};
pub use types::{
    AppConfig, AppConfigBuilder, BatchConfig, BehaviorConfig, ClassAttribute, ComparisonConfig,
    OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, user_config_dir, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and complete `.instance-diff.yaml` files.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
