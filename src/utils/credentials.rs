//! Loading of the API tokens from local key files

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading a key file. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read key file '{}': {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("key file '{}' is empty", .path.display())]
    Empty { path: PathBuf },
}

/// The two tokens used to talk to the tracking and propagation services
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub tracking_key: String,
    pub propagation_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tracking_key", &"<redacted>")
            .field("propagation_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Load both tokens, failing on the first missing or empty file
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        tracking_path: P,
        propagation_path: Q,
    ) -> Result<Self, CredentialError> {
        Ok(Self {
            tracking_key: read_token(tracking_path)?,
            propagation_key: read_token(propagation_path)?,
        })
    }
}

/// Read the first line of `path`, trimmed
pub fn read_token<P: AsRef<Path>>(path: P) -> Result<String, CredentialError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| CredentialError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let token = content.lines().next().unwrap_or("").trim();
    if token.is_empty() {
        return Err(CredentialError::Empty {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "loaded API key");
    Ok(token.to_string())
}
