//! Transport error types

use thiserror::Error;

/// Errors raised while talking to a remote service
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {details}")]
    ClientBuild { details: String },
    /// The request did not complete within the configured timeout
    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },
    /// Connection could not be established or was dropped
    #[error("connection to {url} failed: {details}")]
    Connection { url: String, details: String },
    /// The response body could not be read
    #[error("failed to read response from {url}: {details}")]
    Body { url: String, details: String },
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
