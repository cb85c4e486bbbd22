//! reqwest-backed transport

use crate::transport::{HttpResponse, Transport, TransportError, TransportResult};
use reqwest::blocking::{Client, ClientBuilder, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;
use tracing::debug;

/// Blocking HTTP transport with a fixed per-request timeout
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> TransportResult<Self> {
        Self::with_builder(Client::builder(), timeout)
    }

    fn with_builder(builder: ClientBuilder, timeout: Duration) -> TransportResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = builder
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::ClientBuild {
                details: e.to_string(),
            })?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn execute(&self, url: &str, request: RequestBuilder) -> TransportResult<HttpResponse> {
        let response = request.send().map_err(|e| self.map_error(url, e))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| TransportError::Body {
            url: url.to_string(),
            details: e.to_string(),
        })?;

        debug!(url, status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, body })
    }

    fn map_error(&self, url: &str, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            TransportError::Connection {
                url: url.to_string(),
                details: error.to_string(),
            }
        }
    }
}

impl Transport for HttpTransport {
    fn get(&mut self, url: &str, query: &[(&str, &str)]) -> TransportResult<HttpResponse> {
        let request = self.client.get(url).query(query);
        self.execute(url, request)
    }

    fn post_json(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> TransportResult<HttpResponse> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.execute(url, request)
    }
}
