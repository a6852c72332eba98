//! Snapshot parse error types.

use crate::model::{DbId, SchemaError};
use crate::store::InstanceValidationError;
use thiserror::Error;

/// Errors that can occur while loading a snapshot
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("JSON parse error: {0}")]
    JsonError(String),

    #[error("YAML parse error: {0}")]
    YamlError(String),

    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid instance: {0}")]
    Instance(#[from] InstanceValidationError),

    #[error("Instance {db_id}: attribute '{attribute}' mixes references and scalar values")]
    MixedValues { db_id: DbId, attribute: String },
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<serde_yaml_ng::Error> for ParseError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}
