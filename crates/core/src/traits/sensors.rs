//! Sensor-facing traits: own-position GPS, local barometer, attitude
//! reference, and the hardware safety interlock.

use crate::telemetry::Location;

/// GPS fix quality, ordered so that `status >= FixStatus::Fix2D` means
/// the fix is usable for position updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FixStatus {
    /// No receiver detected
    NoGps,
    /// Receiver present but no position solution
    NoFix,
    /// 2D position solution
    Fix2D,
    /// 3D position solution
    Fix3D,
}

/// A raw fix as reported by the GPS driver.
#[derive(Debug, Clone, Copy)]
pub struct GpsFix {
    pub status: FixStatus,
    pub location: Location,
}

/// The tracker's own GPS receiver.
pub trait PositionSource {
    /// Latest fix. Quality below [`FixStatus::Fix2D`] means the location
    /// must not be used.
    fn fix(&self) -> GpsFix;
}

/// The tracker's local barometer.
pub trait BaroSource {
    /// Current local absolute pressure in pascals.
    fn pressure_pa(&self) -> f32;

    /// Altitude difference in meters implied by two absolute pressures,
    /// positive when `pressure_pa` was measured above `base_pa`.
    ///
    /// The default uses the ISA barometric formula; drivers that carry a
    /// temperature-compensated version can override it.
    fn altitude_difference(&self, base_pa: f32, pressure_pa: f32) -> f32 {
        44_330.0 * (1.0 - libm::powf(pressure_pa / base_pa, 0.190_295))
    }
}

/// Attitude reference system.
pub trait AttitudeSource {
    /// Current pitch angle in radians, positive nose-up.
    fn pitch_rad(&self) -> f32;
}

/// Hardware safety interlock gating servo motion.
pub trait SafetySwitch {
    /// True while the interlock allows the servos to move.
    fn motion_armed(&self) -> bool;
}
