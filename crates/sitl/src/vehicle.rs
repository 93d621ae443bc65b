//! Simulated telemetry-emitting vehicle.
//!
//! Flies a constant heading and speed from a configured start position
//! and encodes its true state the way the link would, so the core's
//! wire-boundary conversions are exercised end to end.

use sky_track_core::geo::{offset_position, wrap_360};
use sky_track_core::telemetry::{Location, PositionReport, PressureReport};

/// Standard sea-level pressure in pascals.
const SEA_LEVEL_PA: f32 = 101_325.0;

/// Configuration for a simulated vehicle.
#[derive(Debug, Clone)]
pub struct VehicleConfig {
    /// Initial position
    pub start: Location,
    /// Course over ground in degrees
    pub heading_deg: f32,
    /// Ground speed in m/s
    pub speed_ms: f32,
}

/// A vehicle flying a straight track at constant speed.
#[derive(Debug)]
pub struct SimulatedVehicle {
    location: Location,
    heading_deg: f32,
    speed_ms: f32,
}

impl SimulatedVehicle {
    pub fn new(config: VehicleConfig) -> Self {
        Self {
            location: config.start,
            heading_deg: config.heading_deg,
            speed_ms: config.speed_ms,
        }
    }

    /// Advance the true position by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let (lat, lon) = offset_position(
            self.location.lat_deg,
            self.location.lon_deg,
            self.heading_deg as f64,
            (self.speed_ms * dt) as f64,
        );
        self.location.lat_deg = lat;
        self.location.lon_deg = lon;
    }

    /// True position (not what the link reports; see
    /// [`Self::position_report`]).
    pub fn location(&self) -> Location {
        self.location
    }

    pub fn set_heading_deg(&mut self, heading_deg: f32) {
        self.heading_deg = heading_deg;
    }

    pub fn set_speed_ms(&mut self, speed_ms: f32) {
        self.speed_ms = speed_ms;
    }

    /// Encode the current true state as a wire-scaled position sample.
    pub fn position_report(&self) -> PositionReport {
        let heading = wrap_360(self.heading_deg);
        let heading_rad = heading.to_radians();

        PositionReport {
            lat_e7: (self.location.lat_deg * 1.0e7).round() as i32,
            lon_e7: (self.location.lon_deg * 1.0e7).round() as i32,
            alt_mm: (self.location.alt_m as f64 * 1000.0).round() as i32,
            heading_cdeg: (heading * 100.0).round() as u16,
            vx_cms: (self.speed_ms * heading_rad.cos() * 100.0).round() as i16,
            vy_cms: (self.speed_ms * heading_rad.sin() * 100.0).round() as i16,
        }
    }

    /// ISA barometric pressure at the current true altitude.
    pub fn pressure_report(&self) -> PressureReport {
        let pa = SEA_LEVEL_PA * (1.0 - self.location.alt_m / 44_330.0).powf(1.0 / 0.190_295);
        PressureReport {
            press_abs_hpa: pa / 100.0,
        }
    }
}
