//! Utility modules for configuration and credentials

pub mod config;
pub mod credentials;

pub use config::{AppConfig, ConfigError, ConfigurationManager};
pub use credentials::{CredentialError, Credentials};
