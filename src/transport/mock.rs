//! Mock transport implementation for testing and development

use crate::transport::{HttpResponse, Transport, TransportError, TransportResult};
use std::collections::VecDeque;

/// HTTP method of a recorded request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request captured by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RecordedRequest {
    /// Look up a query parameter by name
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Look up a header by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// Transport that replays scripted responses in order and records every request
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: VecDeque<TransportResult<HttpResponse>>,
    requests: Vec<RecordedRequest>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body
    pub fn push_response(&mut self, status: u16, body: impl Into<String>) {
        self.responses.push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a transport failure
    pub fn push_error(&mut self, error: TransportError) {
        self.responses.push_back(Err(error));
    }

    /// All requests issued so far
    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }

    /// Number of scripted responses not yet consumed
    pub fn queued_response_count(&self) -> usize {
        self.responses.len()
    }

    fn next_response(&mut self, url: &str) -> TransportResult<HttpResponse> {
        self.responses.pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection {
                url: url.to_string(),
                details: "no scripted response".to_string(),
            })
        })
    }
}

impl Transport for MockTransport {
    fn get(&mut self, url: &str, query: &[(&str, &str)]) -> TransportResult<HttpResponse> {
        self.requests.push(RecordedRequest {
            method: Method::Get,
            url: url.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            headers: Vec::new(),
            body: None,
        });
        self.next_response(url)
    }

    fn post_json(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> TransportResult<HttpResponse> {
        self.requests.push(RecordedRequest {
            method: Method::Post,
            url: url.to_string(),
            query: Vec::new(),
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body: Some(body.clone()),
        });
        self.next_response(url)
    }
}
