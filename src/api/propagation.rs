//! Coverage requests against the propagation service
//!
//! The request schema is fixed: a single transmitter at the vessel position,
//! a dummy receiver, and constant model, antenna, environment and output
//! settings. Only the transmitter block and the radius/resolution are driven
//! by configuration.

use crate::api::types::{ApiError, ApiResult};
use crate::core::Position;
use crate::processing::{CoverageResult, ResponseParser};
use crate::transport::Transport;
use crate::utils::config::TransmitterConfig;
use serde::Serialize;
use tracing::debug;

/// Body of an area coverage request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRequest {
    pub engine: u8,
    pub site: String,
    pub network: String,
    pub transmitter: Transmitter,
    pub model: Model,
    pub receiver: Receiver,
    pub antenna: Antenna,
    pub environment: Environment,
    pub output: Output,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transmitter {
    pub lat: f64,
    pub lon: f64,
    /// Altitude (m)
    pub alt: f64,
    /// Frequency (MHz)
    pub frq: f64,
    /// Power (W)
    pub txw: f64,
    /// Bandwidth (MHz)
    pub bwi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    /// Propagation model
    pub pm: u8,
    /// Propagation environment
    pub pe: u8,
    /// Diffraction model
    pub ked: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receiver {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    /// Receiver gain (dBi)
    pub rxg: f64,
    /// Receiver sensitivity (dBm)
    pub rxs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Antenna {
    pub txg: f64,
    pub txl: f64,
    pub ant: u32,
    pub azi: f64,
    pub tlt: f64,
    pub hbw: f64,
    pub vbw: f64,
    pub pol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environment {
    pub elevation: u8,
    pub landcover: u8,
    pub buildings: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    pub units: String,
    pub col: String,
    pub out: u8,
    pub ber: u8,
    #[serde(rename = "mod")]
    pub modulation: u8,
    pub nf: f64,
    /// Resolution (m)
    pub res: f64,
    /// Radius (km)
    pub rad: f64,
}

impl CoverageRequest {
    /// Build the request for a transmitter at `position`
    pub fn new(position: Position, tx: &TransmitterConfig) -> Self {
        Self {
            engine: 1,
            site: tx.site.clone(),
            network: tx.network.clone(),
            transmitter: Transmitter {
                lat: position.lat,
                lon: position.lon,
                alt: tx.altitude_m,
                frq: tx.frequency_mhz,
                txw: tx.power_w,
                bwi: tx.bandwidth_mhz,
            },
            model: Model { pm: 7, pe: 2, ked: 0 },
            receiver: Receiver {
                lat: 0.0,
                lon: 0.0,
                alt: 2.0,
                rxg: 3.0,
                rxs: -100.0,
            },
            antenna: Antenna {
                txg: 2.15,
                txl: 1.0,
                ant: 1,
                azi: 1.0,
                tlt: 10.0,
                hbw: 2.0,
                vbw: 2.0,
                pol: "h".to_string(),
            },
            environment: Environment {
                elevation: 2,
                landcover: 0,
                buildings: 0,
            },
            output: Output {
                units: "metric".to_string(),
                col: "RAINBOW.dBm".to_string(),
                out: 2,
                ber: 2,
                modulation: 7,
                nf: -100.0,
                res: tx.resolution_m,
                rad: tx.radius_km,
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Infallible for plain structs of numbers and strings.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Client for the propagation service's area calculation
pub struct PropagationClient {
    url: String,
    api_key: String,
    transmitter: TransmitterConfig,
    parser: ResponseParser,
}

impl PropagationClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, transmitter: TransmitterConfig) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            transmitter,
            parser: ResponseParser::new(),
        }
    }

    pub fn set_strict_validation(&mut self, strict: bool) {
        self.parser.set_strict_validation(strict);
    }

    /// Request a coverage heatmap centred on `position`
    pub fn request_coverage<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        position: Position,
    ) -> ApiResult<CoverageResult> {
        let request = CoverageRequest::new(position, &self.transmitter);
        let headers = [("key", self.api_key.as_str())];

        let response = transport.post_json(&self.url, &headers, &request.to_json())?;
        debug!(%position, status = response.status, "propagation response received");

        self.parser
            .parse_coverage(&response.body)
            .map_err(|source| ApiError::Response {
                status: response.status,
                body: response.body,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::ParseError;
    use crate::transport::MockTransport;
    use serde_json::json;

    #[test]
    fn test_request_schema() {
        let request = CoverageRequest::new(Position::new(60.0, 25.0), &TransmitterConfig::default());
        let value = request.to_json();

        assert_eq!(value["engine"], json!(1));
        assert_eq!(value["site"], json!("A1"));
        assert_eq!(value["network"], json!("Testing"));
        assert_eq!(
            value["transmitter"],
            json!({"lat": 60.0, "lon": 25.0, "alt": 15.0, "frq": 160.0, "txw": 10.0, "bwi": 1.0})
        );
        assert_eq!(value["model"], json!({"pm": 7, "pe": 2, "ked": 0}));
        assert_eq!(value["receiver"]["rxs"], json!(-100.0));
        assert_eq!(value["antenna"]["pol"], json!("h"));
        assert_eq!(value["environment"], json!({"elevation": 2, "landcover": 0, "buildings": 0}));
        assert_eq!(value["output"]["mod"], json!(7));
        assert_eq!(value["output"]["res"], json!(30.0));
        assert_eq!(value["output"]["rad"], json!(30.0));
        assert_eq!(value["output"]["col"], json!("RAINBOW.dBm"));
    }

    #[test]
    fn test_request_uses_key_header() {
        let client = PropagationClient::new("https://rf.test/area", "rf-secret", TransmitterConfig::default());
        let mut transport = MockTransport::new();
        transport.push_response(200, r#"{"kmz": "http://x/y.kmz"}"#);

        let result = client
            .request_coverage(&mut transport, Position::new(1.0, 2.0))
            .unwrap();
        assert_eq!(result.reference.as_str(), "http://x/y.kmz");

        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://rf.test/area");
        assert_eq!(request.header("key"), Some("rf-secret"));
        let body = request.body.as_ref().unwrap();
        assert_eq!(body["transmitter"]["lat"], json!(1.0));
        assert_eq!(body["transmitter"]["lon"], json!(2.0));
    }

    #[test]
    fn test_error_payload_keeps_body() {
        let client = PropagationClient::new("https://rf.test/area", "bad", TransmitterConfig::default());
        let mut transport = MockTransport::new();
        transport.push_response(401, r#"{"error":"Invalid API key"}"#);

        let err = client
            .request_coverage(&mut transport, Position::new(1.0, 2.0))
            .unwrap_err();
        assert_eq!(err.body(), Some(r#"{"error":"Invalid API key"}"#));
        assert!(matches!(
            err,
            ApiError::Response { status: 401, source: ParseError::ProviderError { .. }, .. }
        ));
    }
}
