//! Core data types for the coverage tracker

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Vessel position in geodetic coordinates (decimal degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// URL of externally hosted coverage data returned by the propagation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReference(String);

impl CoverageReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoverageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Most recent successfully fetched values.
///
/// Fields are only ever replaced by a successful fetch, so `None` means
/// "never fetched" while a `Some` that was not refreshed this iteration is
/// stale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastKnownState {
    pub position: Option<Position>,
    pub coverage: Option<CoverageReference>,
    /// Time of the last position update (milliseconds since epoch)
    pub position_updated_ms: Option<u64>,
    /// Time of the last coverage update (milliseconds since epoch)
    pub coverage_updated_ms: Option<u64>,
}

impl LastKnownState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_position(&mut self, position: Position) {
        self.position = Some(position);
        self.position_updated_ms = Some(now_ms());
    }

    pub fn update_coverage(&mut self, coverage: CoverageReference) {
        self.coverage = Some(coverage);
        self.coverage_updated_ms = Some(now_ms());
    }
}

/// Current wall clock time in milliseconds since the Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
