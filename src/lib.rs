//! **Recursive, depth-bounded comparison of object-store instance graphs.**
//!
//! `instance-diff` compares two instances, typically the same record taken from
//! two copies of a curated database, and reports every place where their
//! attribute values differ. Reference-valued attributes are followed into the
//! referenced instances up to a configurable depth, so a change deep inside a
//! pathway's event hierarchy shows up as a difference of the pathway itself.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the schema (classes, inheritance, attribute descriptors)
//!   and the [`Instance`] values stored against it.
//! - **[`store`]**: the read-only [`ObjectStore`] interface the comparator
//!   fetches through, and the [`InMemoryStore`] implementation.
//! - **[`parsers`]**: loads JSON and YAML snapshot files into stores.
//! - **[`compare`]**: the [`InstanceGraphComparator`], attribute filters and
//!   whole-class batch comparison.
//! - **[`reports`]**: text, summary and JSON renderings of results.
//! - **[`pipeline`]**: the load → compare → report workflow the CLI runs.
//!
//! ## Getting Started
//!
//! ```no_run
//! use instance_diff::parsers::load_snapshot;
//! use instance_diff::compare::InstanceGraphComparator;
//! use instance_diff::model::DbId;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let left = load_snapshot(Path::new("release-85.json"))?;
//!     let right = load_snapshot(Path::new("release-86.json"))?;
//!
//!     let result = InstanceGraphComparator::new(&left.store, &right.store)
//!         .with_max_depth(3)
//!         .compare_ids(DbId(109581), DbId(109581))?;
//!
//!     println!("{} differences", result.difference_count());
//!     print!("{}", result.report());
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface
//!
//! The `instance-diff` binary wraps the [`pipeline`] module; see
//! `instance-diff --help`.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    clippy::similar_names
)]

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reports;
pub mod store;

// Re-export main types for convenience
pub use compare::{
    compare, AttributeFilter, AttributeNameFilter, ComparisonOptions, ComparisonResult,
    DefaultAttributeFilter, Difference, DifferenceKind, InstanceGraphComparator,
};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use error::{ErrorContext, InstanceDiffError, OptionContext, Result};
pub use model::{AttributeValue, DbId, Instance, Schema, ScalarValue};
pub use parsers::{load_snapshot, parse_snapshot_str, Snapshot};
pub use reports::{ReportFormat, ReportGenerator};
pub use store::{InMemoryStore, ObjectStore, StoreError};
