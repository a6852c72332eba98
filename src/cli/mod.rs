//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod batch;
mod compare;

pub use batch::{run_compare_class, ClassRequest};
pub use compare::{run_compare, PairRequest};

use crate::config::{AppConfig, Validatable};
use anyhow::Result;

/// Reject a configuration that fails validation, listing every problem.
fn ensure_valid(config: &AppConfig) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let listing = errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n");
    anyhow::bail!("invalid configuration:\n{listing}")
}
