//! Vessel position lookup against the tracking service

use crate::api::types::{ApiError, ApiResult};
use crate::processing::{ResponseParser, VesselFix};
use crate::transport::Transport;
use tracing::debug;

/// Client for the tracking service's location query
pub struct TrackingClient {
    url: String,
    api_key: String,
    parser: ResponseParser,
}

impl TrackingClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            parser: ResponseParser::new(),
        }
    }

    /// Toggle range checks on reported positions
    pub fn set_strict_validation(&mut self, strict: bool) {
        self.parser.set_strict_validation(strict);
    }

    /// Fetch the most recent known location of `vessel`
    pub fn fetch_location<T: Transport + ?Sized>(&self, transport: &mut T, vessel: &str) -> ApiResult<VesselFix> {
        let query = [
            ("name", vessel),
            ("what", "loc"),
            ("apikey", self.api_key.as_str()),
            ("format", "json"),
        ];

        let response = transport.get(&self.url, &query)?;
        debug!(vessel, status = response.status, "tracking response received");

        self.parser
            .parse_tracking(&response.body)
            .map_err(|source| ApiError::Response {
                status: response.status,
                body: response.body,
                source,
            })
    }
}
