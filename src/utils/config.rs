use crate::core::constants::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Top-level runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote service endpoints
    pub endpoints: EndpointConfig,
    /// Local file locations
    pub files: FileConfig,
    /// Transmitter and simulation parameters sent to the propagation service
    pub transmitter: TransmitterConfig,
    /// Loop timing
    pub polling: PollingConfig,
    /// Log filter directive, e.g. "info" or "ship_coverage=debug"
    pub log_level: String,
    /// Rewrite the overlay even when the position or coverage was not refreshed this iteration
    pub write_when_stale: bool,
    /// Reject out-of-range positions and non-http(s) coverage links
    pub strict_validation: bool,
}

/// Remote service endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub tracking_url: String,
    pub propagation_url: String,
}

/// Key files and output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub tracking_key_file: String,
    pub propagation_key_file: String,
    pub output_file: String,
}

/// Parameters describing the ship's transmitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmitterConfig {
    /// Site label reported to the propagation service
    pub site: String,
    /// Network label reported to the propagation service
    pub network: String,
    /// Antenna altitude above sea level (metres)
    pub altitude_m: f64,
    /// Carrier frequency (MHz)
    pub frequency_mhz: f64,
    /// Transmit power (watts)
    pub power_w: f64,
    /// Bandwidth (MHz)
    pub bandwidth_mhz: f64,
    /// Simulation radius (kilometres)
    pub radius_km: f64,
    /// Simulation resolution (metres)
    pub resolution_m: f64,
}

/// Loop timing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Sleep between iterations (seconds)
    pub interval_secs: u64,
    /// Timeout applied to each outbound request (seconds)
    pub request_timeout_secs: u64,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            files: FileConfig::default(),
            transmitter: TransmitterConfig::default(),
            polling: PollingConfig::default(),
            log_level: "info".to_string(),
            write_when_stale: true,
            strict_validation: true,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            tracking_url: TRACKING_API_URL.to_string(),
            propagation_url: PROPAGATION_API_URL.to_string(),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            tracking_key_file: TRACKING_KEY_FILE.to_string(),
            propagation_key_file: PROPAGATION_KEY_FILE.to_string(),
            output_file: OUTPUT_FILE.to_string(),
        }
    }
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            site: "A1".to_string(),
            network: "Testing".to_string(),
            altitude_m: ANTENNA_ALTITUDE_M,
            frequency_mhz: FREQUENCY_MHZ,
            power_w: TRANSMIT_POWER_W,
            bandwidth_mhz: BANDWIDTH_MHZ,
            radius_km: RADIUS_KM,
            resolution_m: RESOLUTION_M,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: SLEEP_TIME_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    #[error("Missing required parameter: {parameter}")]
    MissingParameter { parameter: String },
    #[error("I/O error: {message}")]
    IoError { message: String },
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

/// Owns the active configuration and where it came from
pub struct ConfigurationManager {
    config: AppConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a manager holding the built-in defaults
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create a manager from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    /// Load `path` if it exists, otherwise keep the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Path of the file the configuration was loaded from, if any
    pub fn config_file_path(&self) -> Option<&str> {
        self.config_file_path.as_deref()
    }

    /// Replace the configuration after validating it
    pub fn update_config(&mut self, config: AppConfig) -> Result<(), ConfigError> {
        let validation = self.validate_config(&config);
        if let Some(err) = validation.errors.into_iter().next() {
            return Err(err);
        }
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: AppConfig = serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        let validation = self.validate_config(&config);
        if let Some(err) = validation.errors.into_iter().next() {
            return Err(err);
        }

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Validate a configuration without applying it
    pub fn validate_config(&self, config: &AppConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let required = [
            ("endpoints.tracking_url", &config.endpoints.tracking_url),
            ("endpoints.propagation_url", &config.endpoints.propagation_url),
            ("files.tracking_key_file", &config.files.tracking_key_file),
            ("files.propagation_key_file", &config.files.propagation_key_file),
            ("files.output_file", &config.files.output_file),
        ];
        for (parameter, value) in required {
            if value.trim().is_empty() {
                errors.push(ConfigError::MissingParameter {
                    parameter: parameter.to_string(),
                });
            }
        }

        for (parameter, url) in [
            ("endpoints.tracking_url", &config.endpoints.tracking_url),
            ("endpoints.propagation_url", &config.endpoints.propagation_url),
        ] {
            if !url.trim().is_empty() && reqwest::Url::parse(url).is_err() {
                errors.push(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: url.clone(),
                    reason: "not a valid URL".to_string(),
                });
            }
        }

        let tx = &config.transmitter;
        let positive = [
            ("transmitter.frequency_mhz", tx.frequency_mhz),
            ("transmitter.power_w", tx.power_w),
            ("transmitter.bandwidth_mhz", tx.bandwidth_mhz),
            ("transmitter.radius_km", tx.radius_km),
            ("transmitter.resolution_m", tx.resolution_m),
        ];
        for (parameter, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: value.to_string(),
                    reason: "must be a positive number".to_string(),
                });
            }
        }

        if !tx.altitude_m.is_finite() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "transmitter.altitude_m".to_string(),
                value: tx.altitude_m.to_string(),
                reason: "must be finite".to_string(),
            });
        }

        if config.polling.interval_secs == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "polling.interval_secs".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        } else if config.polling.interval_secs < SLEEP_TIME_SECS {
            warnings.push(format!(
                "polling.interval_secs = {} is below the recommended {} seconds",
                config.polling.interval_secs, SLEEP_TIME_SECS
            ));
        }

        if config.polling.request_timeout_secs == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "polling.request_timeout_secs".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }

        if tx.radius_km > 0.0 && tx.resolution_m > 0.0 {
            let cells = (tx.radius_km * 1000.0 / tx.resolution_m).powi(2);
            if cells > 1.0e7 {
                warnings.push(format!(
                    "radius {} km at {} m resolution is a very large calculation",
                    tx.radius_km, tx.resolution_m
                ));
            }
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
