//! Unified error types for instance-diff.
//!
//! This module provides the library's error hierarchy, with chained context
//! strings for debugging and user-friendly messages.

use crate::config::ConfigFileError;
use crate::parsers::ParseError;
use crate::reports::ReportError;
use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for instance-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InstanceDiffError {
    /// Errors while loading a snapshot
    #[error("Failed to load snapshot: {context}")]
    Snapshot {
        context: String,
        #[source]
        source: ParseError,
    },

    /// Errors while looking up root instances
    #[error("Object store error: {context}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },

    /// Unrecoverable store faults raised during a comparison
    #[error("Comparison aborted: {context}")]
    Compare {
        context: String,
        #[source]
        source: StoreError,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportError,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for instance-diff operations
pub type Result<T> = std::result::Result<T, InstanceDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl InstanceDiffError {
    /// Create a snapshot error with context
    pub fn snapshot(context: impl Into<String>, source: ParseError) -> Self {
        Self::Snapshot {
            context: context.into(),
            source,
        }
    }

    /// Create a store error with context
    pub fn store(context: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }

    /// Create a comparison error with context
    pub fn compare(context: impl Into<String>, source: StoreError) -> Self {
        Self::Compare {
            context: context.into(),
            source,
        }
    }

    /// Create a report error with context
    pub fn report(context: impl Into<String>, source: ReportError) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for InstanceDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<ParseError> for InstanceDiffError {
    fn from(err: ParseError) -> Self {
        Self::snapshot("", err)
    }
}

impl From<StoreError> for InstanceDiffError {
    fn from(err: StoreError) -> Self {
        Self::store("", err)
    }
}

impl From<ReportError> for InstanceDiffError {
    fn from(err: ReportError) -> Self {
        Self::report("", err)
    }
}

impl From<ConfigFileError> for InstanceDiffError {
    fn from(err: ConfigFileError) -> Self {
        Self::Config(err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Each call prepends its context to the error's existing context, so the
/// final message traces the path through the code.
///
/// # Example
///
/// ```
/// use instance_diff::error::ErrorContext;
/// use instance_diff::parsers::parse_snapshot_str;
///
/// let err = parse_snapshot_str("{ not json")
///     .context("reading release-86.json")
///     .unwrap_err();
/// assert!(err.to_string().contains("reading release-86.json"));
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<InstanceDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: InstanceDiffError, new_ctx: &str) -> InstanceDiffError {
    use InstanceDiffError as E;
    match err {
        E::Snapshot { context, source } => E::Snapshot {
            context: chain_context(new_ctx, &context),
            source,
        },
        E::Store { context, source } => E::Store {
            context: chain_context(new_ctx, &context),
            source,
        },
        E::Compare { context, source } => E::Compare {
            context: chain_context(new_ctx, &context),
            source,
        },
        E::Report { context, source } => E::Report {
            context: chain_context(new_ctx, &context),
            source,
        },
        E::Io {
            path,
            message,
            source,
        } => E::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        E::Config(msg) => E::Config(chain_context(new_ctx, &msg)),
        E::Validation(msg) => E::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// Returns "`new`: `existing`", or just `new` when nothing exists yet.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| InstanceDiffError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| InstanceDiffError::Validation(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DbId;

    #[test]
    fn test_error_display() {
        let err = InstanceDiffError::store("looking up root", StoreError::NotFound(DbId(42)));
        let display = err.to_string();
        assert!(display.contains("looking up root"), "{display}");

        let err = InstanceDiffError::io(
            "/path/to/left.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("/path/to/left.json"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;
        let fault = StoreError::Fault("connection reset".into());
        let err = InstanceDiffError::compare("pair 1", fault);
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("Object store fault: connection reset"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(InstanceDiffError::store("base", StoreError::UnknownClass("X".into())))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(InstanceDiffError::Store { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Store error, got {other:?}"),
        }
    }

    #[test]
    fn test_conversion_starts_with_empty_context() {
        let result: std::result::Result<(), StoreError> = Err(StoreError::NotFound(DbId(1)));
        match result.context("fetching root") {
            Err(InstanceDiffError::Store { context, .. }) => assert_eq!(context, "fetching root"),
            other => panic!("Expected Store error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(InstanceDiffError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_option_context() {
        assert_eq!(Some(42).context_none("missing value").unwrap(), 42);

        match None::<i32>.context_none("missing value") {
            Err(InstanceDiffError::Validation(msg)) => assert_eq!(msg, "missing value"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("outer", "middle: inner"), "outer: middle: inner");
    }
}
