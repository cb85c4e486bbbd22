//! Polling loop: sleep, fetch location, request coverage, write overlay

use crate::api::{PropagationClient, TrackingClient};
use crate::core::{now_ms, LastKnownState};
use crate::overlay::{OverlaySnapshot, OverlayWriter};
use crate::transport::Transport;
use crate::utils::{AppConfig, Credentials};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Longest uninterrupted sleep while waiting for the next iteration
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Outcome of a single loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    /// The tracking service returned a usable position
    pub position_fresh: bool,
    /// The propagation service returned a usable coverage reference
    pub coverage_fresh: bool,
    /// The overlay file was rewritten
    pub written: bool,
}

/// Drives the fetch → request → write cycle for one vessel
pub struct LoopDriver<T: Transport> {
    transport: T,
    tracking: TrackingClient,
    propagation: PropagationClient,
    writer: OverlayWriter,
    vessel: String,
    interval: Duration,
    write_when_stale: bool,
    state: LastKnownState,
    iterations: u64,
}

impl<T: Transport> LoopDriver<T> {
    pub fn new(config: &AppConfig, credentials: &Credentials, vessel: impl Into<String>, transport: T) -> Self {
        let mut tracking = TrackingClient::new(&config.endpoints.tracking_url, &credentials.tracking_key);
        tracking.set_strict_validation(config.strict_validation);
        let mut propagation = PropagationClient::new(
            &config.endpoints.propagation_url,
            &credentials.propagation_key,
            config.transmitter.clone(),
        );
        propagation.set_strict_validation(config.strict_validation);

        Self {
            transport,
            tracking,
            propagation,
            writer: OverlayWriter::new(&config.files.output_file),
            vessel: vessel.into(),
            interval: config.polling.interval(),
            write_when_stale: config.write_when_stale,
            state: LastKnownState::new(),
            iterations: 0,
        }
    }

    /// Override the sleep between iterations
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> &LastKnownState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Number of iterations completed so far
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Run until `shutdown` is set. Returns the number of completed iterations.
    pub fn run(&mut self, shutdown: &AtomicBool) -> u64 {
        info!(vessel = %self.vessel, interval_secs = self.interval.as_secs_f64(), "starting coverage loop");

        while self.sleep_unless_shutdown(shutdown) {
            let report = self.run_iteration();
            debug!(iteration = self.iterations, ?report, "iteration finished");
        }

        info!(iterations = self.iterations, "coverage loop stopped");
        self.iterations
    }

    /// Fetch location, request coverage and rewrite the overlay once
    pub fn run_iteration(&mut self) -> IterationReport {
        let position_fresh = self.refresh_position();
        let coverage_fresh = self.refresh_coverage();
        let written = self.write_overlay(position_fresh, coverage_fresh);

        self.iterations += 1;
        IterationReport {
            position_fresh,
            coverage_fresh,
            written,
        }
    }

    fn refresh_position(&mut self) -> bool {
        match self.tracking.fetch_location(&mut self.transport, &self.vessel) {
            Ok(fix) => {
                let report_age_secs = fix.last_report.map(|t| (now_ms() / 1000).saturating_sub(t));
                debug!(position = %fix.position, name = ?fix.name, ?report_age_secs, "ship location updated");
                self.state.update_position(fix.position);
                true
            }
            Err(err) => {
                warn!(error = %err, body = err.body().unwrap_or(""), "Error getting ship location");
                false
            }
        }
    }

    fn refresh_coverage(&mut self) -> bool {
        let Some(position) = self.state.position else {
            warn!("no ship location known yet, skipping heatmap request");
            return false;
        };

        match self.propagation.request_coverage(&mut self.transport, position) {
            Ok(result) => {
                for note in &result.adjustments {
                    warn!(note = %note, "propagation service adjusted the calculation");
                }
                debug!(
                    kmz = %result.reference,
                    png = ?result.png_wgs84,
                    area_km2 = ?result.area_km2,
                    coverage = ?result.coverage,
                    elapsed_secs = ?result.elapsed_secs,
                    "heatmap updated"
                );
                self.state.update_coverage(result.reference);
                true
            }
            Err(err) => {
                warn!(error = %err, body = err.body().unwrap_or(""), "Error getting heatmap");
                false
            }
        }
    }

    fn write_overlay(&mut self, position_fresh: bool, coverage_fresh: bool) -> bool {
        let Some(snapshot) = OverlaySnapshot::from_state(&self.state, position_fresh, coverage_fresh) else {
            debug!("no ship location known yet, overlay not written");
            return false;
        };

        if snapshot.is_stale() && !self.write_when_stale {
            debug!(notes = ?snapshot.notes, "stale data, overlay left unchanged");
            return false;
        }

        match self.writer.write(&snapshot) {
            Ok(()) => {
                info!(path = %self.writer.path().display(), stale = snapshot.is_stale(), "Updated kml file!");
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to write overlay");
                false
            }
        }
    }

    /// Sleep for the configured interval. Returns `false` once shutdown is requested.
    fn sleep_unless_shutdown(&self, shutdown: &AtomicBool) -> bool {
        let deadline = Instant::now() + self.interval;
        loop {
            if shutdown.load(Ordering::SeqCst) {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(SHUTDOWN_POLL));
        }
    }
}
