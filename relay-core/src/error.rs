//! Core error types
//!
//! All failures here are scoped to a single connection; nothing in the
//! core is fatal to the process.

use thiserror::Error;

/// Why a connection was refused admission to the registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// The connection did not supply a device identifier
    #[error("connection did not supply a device identifier")]
    MissingIdentifier,

    /// Another live connection already holds this device identifier
    #[error("device '{0}' already has a live connection")]
    DuplicateDevice(String),
}

/// Session lifecycle errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A state transition was attempted from the wrong state
    #[error("invalid session state: expected {expected}, was {actual}")]
    InvalidState { expected: String, actual: String },
}
