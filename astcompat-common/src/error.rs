//! Error handling for the AST compatibility layer
//!
//! Host-level failures: loading a translation unit, malformed input, and
//! contract violations surfaced from the normalization layer.

use thiserror::Error;

/// Main error type shared by the host model and the driver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompatError {
    #[error("Malformed AST: {message}")]
    MalformedAst { message: String },

    #[error("Malformed source manager: {message}")]
    MalformedSourceManager { message: String },

    #[error("Contract violation in {operation}: {message}")]
    ContractViolation {
        operation: &'static str,
        message: String,
    },

    #[error("Unknown language standard: {name}")]
    UnknownStandard { name: String },

    #[error("JSON error: {message}")]
    Json { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl CompatError {
    /// Create a malformed AST error
    pub fn malformed_ast(message: String) -> Self {
        CompatError::MalformedAst { message }
    }

    /// Create a contract violation error
    pub fn contract_violation(operation: &'static str, message: String) -> Self {
        CompatError::ContractViolation { operation, message }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompatError {
    fn from(err: std::io::Error) -> Self {
        CompatError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CompatError {
    fn from(err: serde_json::Error) -> Self {
        CompatError::Json {
            message: err.to_string(),
        }
    }
}
