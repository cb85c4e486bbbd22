//! Ship Coverage Tracker
//!
//! Polls a vessel-tracking service for a ship's position, asks a propagation
//! service for a radio coverage heatmap around it, and keeps a KML overlay
//! with the coverage link and a ship marker up to date.

pub mod core;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod transport;
pub mod api;
pub mod overlay;
pub mod driver;
pub mod app;

// Re-export commonly used types
pub use crate::core::{CoverageReference, LastKnownState, Position};
pub use crate::api::{ApiError, ApiResult, CoverageRequest, PropagationClient, TrackingClient};
pub use crate::app::AppError;
pub use crate::driver::{IterationReport, LoopDriver};
pub use crate::overlay::{OverlaySnapshot, OverlayWriter};
pub use crate::transport::{HttpResponse, HttpTransport, MockTransport, Transport, TransportError};
pub use crate::utils::{AppConfig, ConfigurationManager, Credentials};
