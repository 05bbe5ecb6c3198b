//! Error types for the AIN RPC layer
//!
//! Handlers never produce these: a missing block or a missing argument is a
//! successful call with a `null` result. `RpcError` covers everything around
//! the handlers (unknown methods, broken envelopes, startup and config).

use thiserror::Error;

/// JSON-RPC 2.0 error codes.
pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl RpcError {
    /// JSON-RPC error code reported to the client.
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Parse(_) => PARSE_ERROR,
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcError::InvalidRequest(_) => INVALID_REQUEST,
            RpcError::Internal(_)
            | RpcError::Config(_)
            | RpcError::Io(_)
            | RpcError::Toml(_) => INTERNAL_ERROR,
        }
    }
}

/// Failures of the in-memory reference collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Transaction already pending: {0}")]
    DuplicateTransaction(String),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, RpcError>;
