//! Navigation command state and the bearing/distance/pitch calculator.
//!
//! [`NavStatus`] is the calculator's output and persists across ticks; it
//! is also written by altitude fusion and by the manual-control handler.
//! Bearing and pitch are contested outputs with multiple producers (this
//! calculator, the SCAN strategy, the operator); the mode/override gates
//! encode which producer currently owns each axis so two never race to
//! overwrite each other within a tick.

use libm::atan2f;

use crate::estimator::VehicleState;
use crate::geo::{calculate_bearing, calculate_distance};
use crate::mode::ControlMode;
use crate::telemetry::{Location, ManualControlReport};

/// Navigation command triple plus altitude fusion state and the per-axis
/// manual override flags. Process-wide lifetime; no reset except explicit
/// altitude calibration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NavStatus {
    /// Commanded bearing in degrees (0-360)
    pub bearing_deg: f32,
    /// Distance to the vehicle estimate in meters
    pub distance_m: f32,
    /// Commanded pitch in degrees
    pub pitch_deg: f32,
    /// Fused altitude difference in meters, vehicle above tracker positive
    pub altitude_difference_m: f32,
    /// Calibration offset applied in barometric mode, meters
    pub altitude_offset_m: f32,
    /// Operator owns the yaw axis
    pub manual_control_yaw: bool,
    /// Operator owns the pitch axis
    pub manual_control_pitch: bool,
    /// Altitude calibration requested but not yet applied
    pub need_altitude_calibration: bool,
}

/// Recompute the command triple from the two position estimates.
///
/// Leaves `nav` untouched while the vehicle estimate is invalid or a
/// servo test is running. Bearing and pitch are skipped while SCAN or a
/// manual override owns the axis; distance is always refreshed.
pub fn update_bearing_and_distance(
    nav: &mut NavStatus,
    tracker: Location,
    vehicle: &VehicleState,
    mode: ControlMode,
) {
    if !vehicle.location_valid || mode == ControlMode::ServoTest {
        return;
    }

    let estimate = vehicle.location_estimate;

    if mode != ControlMode::Scan && !nav.manual_control_yaw {
        nav.bearing_deg = calculate_bearing(
            tracker.lat_deg,
            tracker.lon_deg,
            estimate.lat_deg,
            estimate.lon_deg,
        ) as f32;
    }

    nav.distance_m = calculate_distance(
        tracker.lat_deg,
        tracker.lon_deg,
        estimate.lat_deg,
        estimate.lon_deg,
    ) as f32;

    if mode != ControlMode::Scan && !nav.manual_control_pitch {
        nav.pitch_deg = atan2f(nav.altitude_difference_m, nav.distance_m).to_degrees();
    }
}

/// Apply an operator command directly, bypassing the geometry.
///
/// Each axis carrying the "unused" sentinel releases its override so the
/// calculator resumes ownership on the next tick.
pub fn handle_manual_control(nav: &mut NavStatus, report: &ManualControlReport) {
    nav.bearing_deg = report.x as f32;
    nav.pitch_deg = report.y as f32;
    nav.distance_m = 0.0;
    nav.manual_control_yaw = report.x_active();
    nav.manual_control_pitch = report.y_active();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::AXIS_UNUSED;

    fn tracked_vehicle(lat: f64, lon: f64, alt: f32) -> VehicleState {
        VehicleState {
            location_estimate: Location::new(lat, lon, alt),
            location_valid: true,
            ..Default::default()
        }
    }

    fn tracker_at_origin() -> Location {
        Location::new(35.0, 139.0, 0.0)
    }

    #[test]
    fn invalid_vehicle_leaves_nav_unchanged() {
        let mut nav = NavStatus {
            bearing_deg: 123.0,
            distance_m: 456.0,
            pitch_deg: 7.0,
            ..Default::default()
        };
        let before = nav;

        let vehicle = VehicleState::default();
        update_bearing_and_distance(&mut nav, tracker_at_origin(), &vehicle, ControlMode::Auto);
        assert_eq!(nav, before);
    }

    #[test]
    fn servo_test_leaves_nav_unchanged() {
        let mut nav = NavStatus::default();
        let before = nav;

        let vehicle = tracked_vehicle(36.0, 139.0, 100.0);
        update_bearing_and_distance(
            &mut nav,
            tracker_at_origin(),
            &vehicle,
            ControlMode::ServoTest,
        );
        assert_eq!(nav, before);
    }

    #[test]
    fn computes_triple_toward_vehicle() {
        let mut nav = NavStatus {
            altitude_difference_m: 111_000.0,
            ..Default::default()
        };

        // One degree north: ~111 km, bearing ~0, pitch ~45 with an equal
        // altitude difference
        let vehicle = tracked_vehicle(36.0, 139.0, 0.0);
        update_bearing_and_distance(&mut nav, tracker_at_origin(), &vehicle, ControlMode::Auto);

        assert!(nav.bearing_deg < 1.0 || nav.bearing_deg > 359.0);
        assert!((nav.distance_m - 111_000.0).abs() < 1000.0);
        assert!((nav.pitch_deg - 45.0).abs() < 0.5);
    }

    #[test]
    fn scan_mode_keeps_bearing_and_pitch() {
        let mut nav = NavStatus {
            bearing_deg: 10.0,
            pitch_deg: 20.0,
            ..Default::default()
        };

        let vehicle = tracked_vehicle(36.0, 139.0, 0.0);
        update_bearing_and_distance(&mut nav, tracker_at_origin(), &vehicle, ControlMode::Scan);

        // Scan owns the axes, the calculator still refreshes distance
        assert_eq!(nav.bearing_deg, 10.0);
        assert_eq!(nav.pitch_deg, 20.0);
        assert!((nav.distance_m - 111_000.0).abs() < 1000.0);
    }

    #[test]
    fn manual_override_keeps_owned_axis() {
        let mut nav = NavStatus::default();
        handle_manual_control(&mut nav, &ManualControlReport { x: AXIS_UNUSED, y: 30 });

        let vehicle = tracked_vehicle(35.0, 140.0, 0.0);
        update_bearing_and_distance(&mut nav, tracker_at_origin(), &vehicle, ControlMode::Auto);

        // Pitch is operator-owned, bearing recomputed (vehicle due east)
        assert_eq!(nav.pitch_deg, 30.0);
        assert!((nav.bearing_deg - 90.0).abs() < 1.0);
        assert!(nav.distance_m > 0.0);
    }

    #[test]
    fn manual_control_sets_flags_from_sentinel() {
        let mut nav = NavStatus {
            distance_m: 500.0,
            ..Default::default()
        };
        handle_manual_control(&mut nav, &ManualControlReport { x: AXIS_UNUSED, y: 100 });

        assert!(!nav.manual_control_yaw);
        assert!(nav.manual_control_pitch);
        assert_eq!(nav.distance_m, 0.0);
        assert_eq!(nav.pitch_deg, 100.0);
    }

    #[test]
    fn manual_release_restores_calculator_ownership() {
        let mut nav = NavStatus::default();
        handle_manual_control(&mut nav, &ManualControlReport { x: 45, y: 10 });
        assert!(nav.manual_control_yaw);
        assert!(nav.manual_control_pitch);

        handle_manual_control(
            &mut nav,
            &ManualControlReport {
                x: AXIS_UNUSED,
                y: AXIS_UNUSED,
            },
        );
        assert!(!nav.manual_control_yaw);
        assert!(!nav.manual_control_pitch);
    }

    #[test]
    fn pitch_sign_follows_altitude_difference() {
        let mut nav = NavStatus {
            altitude_difference_m: -100.0,
            ..Default::default()
        };

        let vehicle = tracked_vehicle(35.0, 139.01, 0.0);
        update_bearing_and_distance(&mut nav, tracker_at_origin(), &vehicle, ControlMode::Auto);
        assert!(nav.pitch_deg < 0.0, "vehicle below tracker should pitch down");
    }
}
