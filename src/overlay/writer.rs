//! Atomic replacement of the overlay file

use crate::overlay::OverlaySnapshot;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("failed to write overlay '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes overlay documents to a fixed path.
///
/// The document is written to a sibling temp file and renamed over the
/// target, so readers see either the previous or the new document.
pub struct OverlayWriter {
    path: PathBuf,
    temp_path: PathBuf,
}

impl OverlayWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut temp_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);
        Self { path, temp_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the overlay file with `snapshot`
    pub fn write(&self, snapshot: &OverlaySnapshot) -> Result<(), OverlayError> {
        let document = snapshot.to_kml();
        fs::write(&self.temp_path, document.as_bytes())
            .and_then(|_| fs::rename(&self.temp_path, &self.path))
            .map_err(|source| OverlayError::Io {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), bytes = document.len(), "overlay written");
        Ok(())
    }
}
