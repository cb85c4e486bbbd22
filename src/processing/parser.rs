use crate::core::{CoverageReference, Position};
use crate::validation::{DataValidator, ValidationError};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while decoding a service response
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {details}")]
    InvalidJson { details: String },
    #[error("service reported an error: {message}")]
    ProviderError { message: String },
    #[error("response is missing field '{field}'")]
    MissingField { field: String },
    #[error("response contains no entries")]
    NoEntries,
    #[error("field '{field}' has non-numeric value '{value}'")]
    InvalidNumber { field: String, value: String },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Latitude/longitude as sent by the tracking service: usually strings,
/// occasionally plain numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Text(String),
    Number(f64),
}

impl Coordinate {
    fn to_degrees(&self, field: &str) -> Result<f64, ParseError> {
        match self {
            Coordinate::Number(value) => Ok(*value),
            Coordinate::Text(text) => text.trim().parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                field: field.to_string(),
                value: text.clone(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrackingEntry {
    lat: Option<Coordinate>,
    lng: Option<Coordinate>,
    name: Option<String>,
    lasttime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackingResponse {
    result: Option<String>,
    description: Option<String>,
    entries: Option<Vec<TrackingEntry>>,
}

#[derive(Debug, Deserialize)]
struct AreaResponse {
    kmz: Option<String>,
    error: Option<String>,
    #[serde(rename = "PNG_WGS84")]
    png_wgs84: Option<String>,
    area: Option<f64>,
    coverage: Option<f64>,
    elapsed: Option<f64>,
    calculation_adjusted: Option<Vec<String>>,
}

/// Position report decoded from the tracking service
#[derive(Debug, Clone, PartialEq)]
pub struct VesselFix {
    pub position: Position,
    /// Name reported by the service, if any
    pub name: Option<String>,
    /// Unix time (seconds) of the last report, if any
    pub last_report: Option<u64>,
}

/// Coverage result decoded from the propagation service
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageResult {
    pub reference: CoverageReference,
    pub png_wgs84: Option<String>,
    /// Covered area (km²)
    pub area_km2: Option<f64>,
    /// Coverage fraction reported by the service
    pub coverage: Option<f64>,
    /// Server-side computation time (seconds)
    pub elapsed_secs: Option<f64>,
    /// Notes about parameters the service adjusted
    pub adjustments: Vec<String>,
}

/// Decodes tracking and propagation responses into domain values
#[derive(Debug, Clone)]
pub struct ResponseParser {
    validator: DataValidator,
    strict_validation: bool,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            validator: DataValidator::new(),
            strict_validation: true,
        }
    }

    /// Toggle range checks on positions and scheme checks on coverage URLs
    pub fn set_strict_validation(&mut self, strict: bool) {
        self.strict_validation = strict;
    }

    /// Extract the first entry's position from a tracking response body
    pub fn parse_tracking(&self, body: &str) -> Result<VesselFix, ParseError> {
        let response: TrackingResponse = serde_json::from_str(body).map_err(|e| ParseError::InvalidJson {
            details: e.to_string(),
        })?;

        if response.result.as_deref() == Some("fail") {
            return Err(ParseError::ProviderError {
                message: response.description.unwrap_or_else(|| "unknown failure".to_string()),
            });
        }

        let entries = response.entries.ok_or_else(|| ParseError::MissingField {
            field: "entries".to_string(),
        })?;
        let entry = entries.into_iter().next().ok_or(ParseError::NoEntries)?;

        let lat = entry
            .lat
            .ok_or_else(|| ParseError::MissingField { field: "lat".to_string() })?
            .to_degrees("lat")?;
        let lon = entry
            .lng
            .ok_or_else(|| ParseError::MissingField { field: "lng".to_string() })?
            .to_degrees("lng")?;

        let position = Position::new(lat, lon);
        if self.strict_validation {
            self.validator.validate_position(&position)?;
        }

        Ok(VesselFix {
            position,
            name: entry.name,
            last_report: entry.lasttime.and_then(|t| t.parse().ok()),
        })
    }

    /// Extract the coverage reference from a propagation response body
    pub fn parse_coverage(&self, body: &str) -> Result<CoverageResult, ParseError> {
        let response: AreaResponse = serde_json::from_str(body).map_err(|e| ParseError::InvalidJson {
            details: e.to_string(),
        })?;

        let kmz = match (response.kmz, response.error) {
            (Some(kmz), _) if !kmz.trim().is_empty() => kmz,
            (_, Some(message)) => return Err(ParseError::ProviderError { message }),
            _ => {
                return Err(ParseError::MissingField {
                    field: "kmz".to_string(),
                })
            }
        };

        if self.strict_validation {
            self.validator.validate_coverage_url(&kmz)?;
        }

        Ok(CoverageResult {
            reference: CoverageReference::new(kmz),
            png_wgs84: response.png_wgs84,
            area_km2: response.area,
            coverage: response.coverage,
            elapsed_secs: response.elapsed,
            adjustments: response.calculation_adjusted.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tracking_entry() {
        let parser = ResponseParser::new();
        let body = r#"{"command":"get","result":"ok","found":1,"what":"loc",
            "entries":[{"name":"OH7RDA","lat":"12.34","lng":"56.78","lasttime":"1700000000"}]}"#;

        let fix = parser.parse_tracking(body).unwrap();
        assert_eq!(fix.position, Position::new(12.34, 56.78));
        assert_eq!(fix.name.as_deref(), Some("OH7RDA"));
        assert_eq!(fix.last_report, Some(1_700_000_000));
    }

    #[test]
    fn test_parse_tracking_numeric_coordinates() {
        let parser = ResponseParser::new();
        let fix = parser
            .parse_tracking(r#"{"entries":[{"lat":-33.5,"lng":151.25}]}"#)
            .unwrap();
        assert_eq!(fix.position, Position::new(-33.5, 151.25));
        assert_eq!(fix.name, None);
    }

    #[test]
    fn test_parse_tracking_missing_entries() {
        let parser = ResponseParser::new();
        let err = parser.parse_tracking(r#"{"command":"get","result":"ok"}"#).unwrap_err();
        assert_eq!(err, ParseError::MissingField { field: "entries".to_string() });

        let err = parser.parse_tracking(r#"{"entries":[]}"#).unwrap_err();
        assert_eq!(err, ParseError::NoEntries);
    }

    #[test]
    fn test_parse_tracking_provider_error() {
        let parser = ResponseParser::new();
        let err = parser
            .parse_tracking(r#"{"command":"get","result":"fail","description":"authentication failed: wrong API key"}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::ProviderError { message: "authentication failed: wrong API key".to_string() }
        );
    }

    #[test]
    fn test_parse_tracking_bad_values() {
        let parser = ResponseParser::new();
        let err = parser.parse_tracking(r#"{"entries":[{"lat":"north","lng":"1"}]}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));

        let err = parser.parse_tracking(r#"{"entries":[{"lat":"1"}]}"#).unwrap_err();
        assert_eq!(err, ParseError::MissingField { field: "lng".to_string() });

        let err = parser.parse_tracking("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { .. }));
    }

    #[test]
    fn test_strict_validation_rejects_out_of_range() {
        let mut parser = ResponseParser::new();
        let body = r#"{"entries":[{"lat":"123.0","lng":"10.0"}]}"#;
        assert!(matches!(parser.parse_tracking(body), Err(ParseError::Invalid(_))));

        parser.set_strict_validation(false);
        assert_eq!(parser.parse_tracking(body).unwrap().position, Position::new(123.0, 10.0));
    }

    #[test]
    fn test_parse_coverage_kmz() {
        let parser = ResponseParser::new();
        let result = parser.parse_coverage(r#"{"kmz": "http://x/y.kmz"}"#).unwrap();
        assert_eq!(result.reference.as_str(), "http://x/y.kmz");
        assert!(result.adjustments.is_empty());
    }

    #[test]
    fn test_parse_coverage_extras() {
        let parser = ResponseParser::new();
        let body = r#"{"kmz":"https://cloudrf.com/a.kmz","PNG_WGS84":"https://cloudrf.com/a.png",
            "area":2826.4,"coverage":61.2,"elapsed":1.8,"calculation_adjusted":["resolution raised to 30m"]}"#;
        let result = parser.parse_coverage(body).unwrap();
        assert_eq!(result.png_wgs84.as_deref(), Some("https://cloudrf.com/a.png"));
        assert_eq!(result.area_km2, Some(2826.4));
        assert_eq!(result.elapsed_secs, Some(1.8));
        assert_eq!(result.adjustments, vec!["resolution raised to 30m".to_string()]);
    }

    #[test]
    fn test_parse_coverage_errors() {
        let parser = ResponseParser::new();
        assert_eq!(
            parser.parse_coverage(r#"{"error":"Invalid API key"}"#).unwrap_err(),
            ParseError::ProviderError { message: "Invalid API key".to_string() }
        );
        assert_eq!(
            parser.parse_coverage(r#"{"area": 1.0}"#).unwrap_err(),
            ParseError::MissingField { field: "kmz".to_string() }
        );
        assert!(matches!(parser.parse_coverage(""), Err(ParseError::InvalidJson { .. })));
    }
}
