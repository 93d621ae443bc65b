//! Inbound telemetry samples and the unit boundary.
//!
//! Wire fields arrive scaled the way the link encodes them (1e-7 degrees,
//! millimeters, centidegrees, cm/s). Conversion to the unit-pure internal
//! model (degrees, meters, m/s) happens in the accessors here and nowhere
//! else; downstream components never see wire scaling.

use libm::sqrtf;

/// A position in the unit-pure internal model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    /// Latitude in degrees
    pub lat_deg: f64,
    /// Longitude in degrees
    pub lon_deg: f64,
    /// Altitude above mean sea level in meters
    pub alt_m: f32,
}

impl Location {
    pub fn new(lat_deg: f64, lon_deg: f64, alt_m: f32) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m,
        }
    }
}

/// Vehicle position sample as it arrives off the link.
#[derive(Debug, Clone, Copy)]
pub struct PositionReport {
    /// Latitude in 1e-7 degrees
    pub lat_e7: i32,
    /// Longitude in 1e-7 degrees
    pub lon_e7: i32,
    /// Altitude above mean sea level in millimeters
    pub alt_mm: i32,
    /// Heading in centidegrees (0..36000)
    pub heading_cdeg: u16,
    /// North ground-speed component in cm/s
    pub vx_cms: i16,
    /// East ground-speed component in cm/s
    pub vy_cms: i16,
}

impl PositionReport {
    /// Reported position in internal units.
    pub fn location(&self) -> Location {
        Location {
            lat_deg: self.lat_e7 as f64 * 1.0e-7,
            lon_deg: self.lon_e7 as f64 * 1.0e-7,
            alt_m: self.alt_mm as f32 * 0.001,
        }
    }

    /// Reported heading in degrees.
    pub fn heading_deg(&self) -> f32 {
        self.heading_cdeg as f32 * 0.01
    }

    /// Ground speed magnitude in m/s.
    pub fn ground_speed_ms(&self) -> f32 {
        let vx = self.vx_cms as f32;
        let vy = self.vy_cms as f32;
        sqrtf(vx * vx + vy * vy) * 0.01
    }
}

/// Aircraft barometric pressure sample.
#[derive(Debug, Clone, Copy)]
pub struct PressureReport {
    /// Absolute pressure in hectopascals
    pub press_abs_hpa: f32,
}

impl PressureReport {
    /// Absolute pressure in pascals.
    pub fn pressure_pa(&self) -> f32 {
        self.press_abs_hpa * 100.0
    }
}

/// Wire value marking a manual-control axis the operator is not driving.
pub const AXIS_UNUSED: i16 = 0x7FFF;

/// Manual control sample: raw per-axis operator input.
#[derive(Debug, Clone, Copy)]
pub struct ManualControlReport {
    /// Yaw-axis value, [`AXIS_UNUSED`] when not driven
    pub x: i16,
    /// Pitch-axis value, [`AXIS_UNUSED`] when not driven
    pub y: i16,
}

impl ManualControlReport {
    /// True when the operator is driving the yaw axis.
    pub fn x_active(&self) -> bool {
        self.x != AXIS_UNUSED
    }

    /// True when the operator is driving the pitch axis.
    pub fn y_active(&self) -> bool {
        self.y != AXIS_UNUSED
    }
}
