//! Error types for fleetcheck operations.
//!
//! This module defines [`FleetError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Fact collection errors (`Unreachable`, `QueryError`) are target-fatal:
//!   the target is skipped and no record is produced
//! - Diagnostic errors (`InvocationRejected`, `InvocationTimeout`,
//!   `MalformedOutput`) degrade the record but never abort it
//! - Use `anyhow::Error` (via `FleetError::Other`) for unexpected errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for fleetcheck operations.
#[derive(Debug, Error)]
pub enum FleetError {
    /// The target did not answer the reachability check.
    #[error("Host '{target}' is unreachable")]
    Unreachable { target: String },

    /// A fact query against the target failed.
    #[error("Query '{query}' failed on '{target}': {message}")]
    QueryError {
        target: String,
        query: String,
        message: String,
    },

    /// The diagnostic tool could not be launched on the target.
    #[error("Diagnostic launch rejected on '{target}': {message}")]
    InvocationRejected {
        target: String,
        code: Option<u32>,
        message: String,
    },

    /// The diagnostic output never appeared within the polling window.
    #[error("Diagnostic output did not appear on '{target}' within {waited:?}")]
    InvocationTimeout { target: String, waited: Duration },

    /// The diagnostic output could not be interpreted.
    #[error("Malformed diagnostic output: {reason}")]
    MalformedOutput { reason: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// External command could not be run.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FleetError {
    /// Whether this error ends the assessment of a target without a record.
    pub fn is_target_fatal(&self) -> bool {
        matches!(
            self,
            FleetError::Unreachable { .. } | FleetError::QueryError { .. }
        )
    }
}

/// Result type alias for fleetcheck operations.
pub type Result<T> = std::result::Result<T, FleetError>;
