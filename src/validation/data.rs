use crate::core::Position;
use thiserror::Error;

/// Reasons a decoded value is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is not a finite number")]
    NonFinite { field: String },
    #[error("latitude {value} outside [-90, 90]")]
    LatitudeOutOfRange { value: f64 },
    #[error("longitude {value} outside [-180, 180]")]
    LongitudeOutOfRange { value: f64 },
    #[error("invalid coverage URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Sanity checks applied to values decoded from service responses
#[derive(Debug, Clone, Default)]
pub struct DataValidator;

impl DataValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check that a position is finite and within geodetic bounds
    pub fn validate_position(&self, position: &Position) -> Result<(), ValidationError> {
        if !position.lat.is_finite() {
            return Err(ValidationError::NonFinite { field: "lat".to_string() });
        }
        if !position.lon.is_finite() {
            return Err(ValidationError::NonFinite { field: "lng".to_string() });
        }
        if !(-90.0..=90.0).contains(&position.lat) {
            return Err(ValidationError::LatitudeOutOfRange { value: position.lat });
        }
        if !(-180.0..=180.0).contains(&position.lon) {
            return Err(ValidationError::LongitudeOutOfRange { value: position.lon });
        }
        Ok(())
    }

    /// Check that a coverage reference is an absolute http(s) URL
    pub fn validate_coverage_url(&self, url: &str) -> Result<(), ValidationError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_position() {
        let validator = DataValidator::new();
        assert!(validator.validate_position(&Position::new(60.1699, 24.9384)).is_ok());
        assert!(validator.validate_position(&Position::new(-90.0, 180.0)).is_ok());
    }

    #[test]
    fn test_out_of_range_position() {
        let validator = DataValidator::new();
        assert_eq!(
            validator.validate_position(&Position::new(95.0, 0.0)),
            Err(ValidationError::LatitudeOutOfRange { value: 95.0 })
        );
        assert_eq!(
            validator.validate_position(&Position::new(0.0, -200.0)),
            Err(ValidationError::LongitudeOutOfRange { value: -200.0 })
        );
        assert!(matches!(
            validator.validate_position(&Position::new(f64::NAN, 0.0)),
            Err(ValidationError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_coverage_url() {
        let validator = DataValidator::new();
        assert!(validator.validate_coverage_url("http://x/y.kmz").is_ok());
        assert!(validator.validate_coverage_url("https://api.cloudrf.com/archive/a.kmz").is_ok());
        assert!(validator.validate_coverage_url("ftp://x/y.kmz").is_err());
        assert!(validator.validate_coverage_url("not a url").is_err());
    }
}
