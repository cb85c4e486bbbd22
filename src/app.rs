//! Startup sequence: credentials, vessel prompt, transport, loop

use crate::driver::LoopDriver;
use crate::transport::{HttpTransport, TransportError};
use crate::utils::{AppConfig, ConfigError, CredentialError, Credentials};
use std::io::{self, BufRead, Write};
use std::sync::atomic::AtomicBool;
use thiserror::Error;
use tracing::info;

/// Fatal startup failures
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to read ship name: {0}")]
    Input(#[from] io::Error),
    #[error("no ship name entered")]
    EmptyVesselId,
}

/// Prompt for the vessel identifier and read one whitespace-delimited token
pub fn prompt_vessel_id<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String, AppError> {
    write!(output, "Enter ship name (MMSI): ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    line.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or(AppError::EmptyVesselId)
}

/// Credentials and vessel gathered before the loop starts
#[derive(Debug)]
pub struct Session {
    pub credentials: Credentials,
    pub vessel: String,
}

/// Load credentials and ask for the vessel on stdin
pub fn start(config: &AppConfig) -> Result<Session, AppError> {
    let stdin = io::stdin();
    start_with(config, &mut stdin.lock(), &mut io::stdout())
}

/// Load credentials, then prompt on `output` and read the vessel from `input`
pub fn start_with<R: BufRead, W: Write>(
    config: &AppConfig,
    input: &mut R,
    output: &mut W,
) -> Result<Session, AppError> {
    let credentials = Credentials::load(&config.files.tracking_key_file, &config.files.propagation_key_file)?;
    let vessel = prompt_vessel_id(input, output)?;
    info!(vessel = %vessel, output = %config.files.output_file, "tracking ship");
    Ok(Session { credentials, vessel })
}

/// Poll until `shutdown` is set. Returns the number of completed iterations.
pub fn run(config: &AppConfig, session: Session, shutdown: &AtomicBool) -> Result<u64, AppError> {
    let transport = HttpTransport::new(config.polling.request_timeout())?;
    let mut driver = LoopDriver::new(config, &session.credentials, session.vessel, transport);
    Ok(driver.run(shutdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_reads_first_token() {
        let mut input = Cursor::new("  230123456 trailing words\n");
        let mut output = Vec::new();
        let vessel = prompt_vessel_id(&mut input, &mut output).unwrap();
        assert_eq!(vessel, "230123456");
        assert_eq!(String::from_utf8(output).unwrap(), "Enter ship name (MMSI): ");
    }

    #[test]
    fn test_prompt_rejects_empty_input() {
        let mut output = Vec::new();
        let err = prompt_vessel_id(&mut Cursor::new("\n"), &mut output).unwrap_err();
        assert!(matches!(err, AppError::EmptyVesselId));

        let err = prompt_vessel_id(&mut Cursor::new(""), &mut output).unwrap_err();
        assert!(matches!(err, AppError::EmptyVesselId));
    }

    fn temp_key_file(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("ship_coverage_{}_app_{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_missing_credentials_fail_before_prompt() {
        let mut config = AppConfig::default();
        config.files.tracking_key_file = std::env::temp_dir()
            .join("ship_coverage_missing_tracking_key.txt")
            .to_string_lossy()
            .to_string();
        let mut output = Vec::new();
        let err = start_with(&config, &mut Cursor::new("230123456\n"), &mut output).unwrap_err();
        assert!(matches!(err, AppError::Credentials(CredentialError::Unreadable { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn test_start_reads_keys_and_vessel() {
        let mut config = AppConfig::default();
        config.files.tracking_key_file = temp_key_file("tracking.txt", "track-key\n");
        config.files.propagation_key_file = temp_key_file("propagation.txt", "rf-key\n");

        let mut output = Vec::new();
        let session = start_with(&config, &mut Cursor::new("230123456\n"), &mut output).unwrap();
        assert_eq!(session.vessel, "230123456");
        assert_eq!(session.credentials.tracking_key, "track-key");
        assert_eq!(session.credentials.propagation_key, "rf-key");

        let _ = std::fs::remove_file(&config.files.tracking_key_file);
        let _ = std::fs::remove_file(&config.files.propagation_key_file);
    }

    #[test]
    fn test_run_honours_shutdown_requested_before_loop() {
        let mut config = AppConfig::default();
        config.files.output_file = std::env::temp_dir()
            .join(format!("ship_coverage_{}_app_shutdown.kml", std::process::id()))
            .to_string_lossy()
            .to_string();
        let session = Session {
            credentials: Credentials {
                tracking_key: "track".to_string(),
                propagation_key: "rf".to_string(),
            },
            vessel: "230123456".to_string(),
        };

        let shutdown = AtomicBool::new(true);
        assert_eq!(run(&config, session, &shutdown).unwrap(), 0);
        assert!(!std::path::Path::new(&config.files.output_file).exists());
    }
}
