//! Clients for the tracking and propagation services

pub mod tracking;
pub mod propagation;
pub mod types;

pub use types::{ApiError, ApiResult};
pub use tracking::TrackingClient;
pub use propagation::{CoverageRequest, PropagationClient};
