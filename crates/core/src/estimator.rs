//! Vehicle position estimator.
//!
//! Dead-reckons the vehicle forward between telemetry samples and raises
//! the lost-vehicle flag when the link goes quiet. Validity is recomputed
//! on every tick whether or not new telemetry arrived; that recomputation
//! is the failure-detection mechanism.

use crate::geo::offset_position;
use crate::telemetry::{Location, PositionReport};

/// Elapsed time past which the vehicle is declared lost, seconds.
///
/// Fixed by design; making this configurable would let an operator widen
/// the window in which a stale estimate drives the antenna.
pub const TRACKING_TIMEOUT_SEC: f32 = 5.0;

/// [`TRACKING_TIMEOUT_SEC`] in milliseconds, for the link-armed indicator.
pub const TRACKING_TIMEOUT_MS: u64 = 5_000;

/// Last-known vehicle state plus the extrapolated estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleState {
    /// Last reported location
    pub location: Location,
    /// Last reported heading in degrees
    pub heading_deg: f32,
    /// Last reported ground speed in m/s
    pub ground_speed_ms: f32,
    /// Dead-reckoned location estimate
    pub location_estimate: Location,
    /// True while the estimate is usable
    pub location_valid: bool,
    /// Timestamp of the last telemetry sample, microseconds
    pub last_update_us: u64,
    /// Timestamp of the last telemetry sample, milliseconds
    pub last_update_ms: u64,
}

/// Owns [`VehicleState`]; the only writers are telemetry ingest and the
/// per-tick extrapolation step.
#[derive(Debug, Default)]
pub struct VehicleEstimator {
    state: VehicleState,
}

impl VehicleEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Store a new telemetry sample.
    ///
    /// Overwrites the last-known location, heading, speed, and both
    /// timestamps. No validation beyond storage; unit conversion happened
    /// at the wire boundary.
    pub fn handle_position_report(&mut self, report: &PositionReport, now_us: u64, now_ms: u64) {
        self.state.location = report.location();
        self.state.heading_deg = report.heading_deg();
        self.state.ground_speed_ms = report.ground_speed_ms();
        self.state.last_update_us = now_us;
        self.state.last_update_ms = now_ms;
    }

    /// Recompute the location estimate and the validity flag.
    ///
    /// Within the timeout the last-known location is advanced along the
    /// last-known heading by `ground_speed * dt` to cover lost packets.
    /// Past the timeout the vehicle is lost: validity drops and the stale
    /// estimate is left in place for consumers that check the flag.
    pub fn tick(&mut self, now_us: u64) {
        let dt = now_us.saturating_sub(self.state.last_update_us) as f32 * 1.0e-6;

        if dt < TRACKING_TIMEOUT_SEC {
            let (lat, lon) = offset_position(
                self.state.location.lat_deg,
                self.state.location.lon_deg,
                self.state.heading_deg as f64,
                (self.state.ground_speed_ms * dt) as f64,
            );
            self.state.location_estimate = Location {
                lat_deg: lat,
                lon_deg: lon,
                alt_m: self.state.location.alt_m,
            };
            self.state.location_valid = true;
        } else {
            self.state.location_valid = false;
        }
    }

    /// True iff a telemetry sample arrived within the tracking timeout.
    ///
    /// Distinct from `location_valid`: this is the outward "vehicle link
    /// armed" indicator and stays false until the first sample ever.
    pub fn link_armed(&self, now_ms: u64) -> bool {
        self.state.last_update_ms != 0
            && now_ms.saturating_sub(self.state.last_update_ms) < TRACKING_TIMEOUT_MS
    }
}
