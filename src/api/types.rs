//! Common API types

use crate::processing::ParseError;
use crate::transport::TransportError;
use thiserror::Error;

/// Result type for service calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a single call to the tracking or propagation service
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A response arrived but could not be used
    #[error("{source} (HTTP {status})")]
    Response {
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
        #[source]
        source: ParseError,
    },
}

impl ApiError {
    /// Raw response body, when the failure happened after a response arrived
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Response { body, .. } => Some(body),
            ApiError::Transport(_) => None,
        }
    }
}
