//! HTTP transport abstraction
//!
//! The service clients talk to the network through the [`Transport`] trait so
//! the polling loop can run against scripted responses in tests.

pub mod http;
pub mod mock;
pub mod error;

pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
pub use mock::MockTransport;

/// Status and body of a completed HTTP exchange.
///
/// Non-2xx responses are still returned here; the services report their
/// errors in the JSON body and the parsers need to see it.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Blocking request interface used by the service clients
pub trait Transport {
    /// Issue a GET with the given query parameters
    fn get(&mut self, url: &str, query: &[(&str, &str)]) -> TransportResult<HttpResponse>;

    /// POST a JSON body with extra request headers
    fn post_json(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> TransportResult<HttpResponse>;
}
