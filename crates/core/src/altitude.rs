//! Altitude-difference fusion.
//!
//! Two mutually exclusive sources produce the altitude difference used
//! for pitch pointing: barometric pressure telemetry (calibratable
//! against a user-requested zero) or the GPS altitudes of the two
//! position estimates. The active source is a configuration choice read
//! each time a sample arrives, not a runtime state of this module.

use crate::nav::NavStatus;
use crate::telemetry::PressureReport;
use crate::traits::BaroSource;

/// Altitude-difference source selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AltSource {
    /// Differential barometric pressure (default)
    #[default]
    Baro,
    /// GPS altitude of vehicle estimate minus tracker altitude
    Gps,
}

/// Fold one aircraft pressure sample into the altitude difference.
///
/// A non-finite difference is discarded and the prior value retained. A
/// pending calibration zeroes the difference at the current reading:
/// the offset absorbs the negated difference so subsequent samples read
/// relative to the calibration point.
pub fn handle_pressure_report(nav: &mut NavStatus, baro: &dyn BaroSource, report: &PressureReport) {
    let local_pa = baro.pressure_pa();
    let aircraft_pa = report.pressure_pa();

    let diff = baro.altitude_difference(local_pa, aircraft_pa);
    if !diff.is_nan() {
        nav.altitude_difference_m = diff + nav.altitude_offset_m;
    }

    if nav.need_altitude_calibration {
        nav.altitude_offset_m = -nav.altitude_difference_m;
        nav.altitude_difference_m = 0.0;
        nav.need_altitude_calibration = false;
    }
}

/// Refresh the altitude difference from the GPS altitudes.
///
/// Called every tick while the vehicle estimate is valid; no offset or
/// calibration applies in this mode.
pub fn update_from_gps(nav: &mut NavStatus, vehicle_alt_m: f32, tracker_alt_m: f32) {
    nav.altitude_difference_m = vehicle_alt_m - tracker_alt_m;
}
