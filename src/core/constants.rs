//! Default service endpoints and transmitter parameters

/// Simulation radius in kilometres
pub const RADIUS_KM: f64 = 30.0;
/// Simulation resolution in metres
pub const RESOLUTION_M: f64 = 30.0;
/// Ship antenna altitude above sea level in metres
pub const ANTENNA_ALTITUDE_M: f64 = 15.0;
/// Transmitter frequency in MHz
pub const FREQUENCY_MHZ: f64 = 160.0;
/// Transmitter power in watts
pub const TRANSMIT_POWER_W: f64 = 10.0;
/// Transmitter bandwidth in MHz
pub const BANDWIDTH_MHZ: f64 = 1.0;

/// Seconds between loop iterations
pub const SLEEP_TIME_SECS: u64 = 2;
/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const TRACKING_API_URL: &str = "https://api.aprs.fi/api/get";
pub const PROPAGATION_API_URL: &str = "https://api.cloudrf.com/area";

pub const TRACKING_KEY_FILE: &str = "ais-api-key.txt";
pub const PROPAGATION_KEY_FILE: &str = "rf-api-key.txt";
pub const OUTPUT_FILE: &str = "ship.kml";
pub const CONFIG_FILE: &str = "ship-coverage.json";
