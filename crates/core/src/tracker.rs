//! Tick orchestrator and mode state machine.
//!
//! [`Tracker`] owns every piece of mutable tracking state behind one
//! ownership point: telemetry ingest and the 50 Hz tick all go through
//! `&mut self`. A host that ingests from a different execution context
//! than the tick serializes by wrapping the whole struct in its platform
//! mutex; within one context, ownership already guarantees ingest and
//! tick never interleave partial writes.
//!
//! Per-tick sequence: vehicle estimator tick, position-filter tick,
//! altitude refresh (GPS source), bearing/distance/pitch calculation,
//! link-armed refresh, then the two actuation gates, then the mode
//! dispatch. Failing a gate returns after the estimation stage so the
//! estimates stay fresh while output is withheld.

use crate::altitude::{self, AltSource};
use crate::estimator::{VehicleEstimator, VehicleState};
use crate::mode::ControlMode;
use crate::nav::{self, NavStatus};
use crate::params::TrackerParams;
use crate::position::TrackerPositionFilter;
use crate::telemetry::{Location, ManualControlReport, PositionReport, PressureReport};
use crate::traits::{
    AttitudeSource, BaroSource, Clock, ModeStrategies, PositionSource, SafetySwitch, ServoChannels,
};

/// Pitch target held while initialising, degrees.
pub const INITIALISING_PITCH_DEG: f32 = 45.0;

/// Attitude band regarded as settled around the initialising target.
const SETTLE_BAND_LOW_DEG: f32 = 40.0;
const SETTLE_BAND_HIGH_DEG: f32 = 50.0;

/// Platform collaborators handed to every tick.
pub struct TrackerIo<'a> {
    pub clock: &'a dyn Clock,
    pub gps: &'a dyn PositionSource,
    pub attitude: &'a dyn AttitudeSource,
    pub safety: &'a dyn SafetySwitch,
    pub servos: &'a mut dyn ServoChannels,
    pub modes: &'a mut dyn ModeStrategies,
}

/// The estimation-and-control core. The only component with write access
/// to the control mode.
#[derive(Debug)]
pub struct Tracker {
    params: TrackerParams,
    vehicle: VehicleEstimator,
    position: TrackerPositionFilter,
    nav: NavStatus,
    mode: ControlMode,
    start_time_ms: Option<u64>,
    settle_since_ms: Option<u64>,
    link_armed: bool,
}

impl Tracker {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            params,
            vehicle: VehicleEstimator::new(),
            position: TrackerPositionFilter::new(),
            nav: NavStatus::default(),
            mode: ControlMode::default(),
            start_time_ms: None,
            settle_since_ms: None,
            link_armed: false,
        }
    }

    /// Run one 50 Hz control period.
    ///
    /// Never blocks and always runs to completion; the early returns on
    /// the actuation gates are the only abort points, and they happen
    /// after the estimation stage.
    pub fn update(&mut self, io: &mut TrackerIo<'_>) -> Result<(), &'static str> {
        let now_us = io.clock.now_us();
        let now_ms = io.clock.now_ms();
        let start_ms = *self.start_time_ms.get_or_insert(now_ms);

        // Estimation stage, gated or not
        self.vehicle.tick(now_us);
        self.position.tick(&io.gps.fix());
        if self.params.alt_source == AltSource::Gps && self.vehicle.state().location_valid {
            altitude::update_from_gps(
                &mut self.nav,
                self.vehicle.state().location.alt_m,
                self.position.current().alt_m,
            );
        }
        nav::update_bearing_and_distance(
            &mut self.nav,
            self.position.current(),
            self.vehicle.state(),
            self.mode,
        );
        self.link_armed = self.vehicle.link_armed(now_ms);

        // Actuation gates
        let delay_ms = (self.params.startup_delay_s * 1000.0) as u64;
        if delay_ms > 0 && now_ms.saturating_sub(start_ms) < delay_ms {
            return Ok(());
        }
        if !io.safety.motion_armed() {
            return Ok(());
        }

        match self.mode {
            ControlMode::Auto => io.modes.update_auto(&self.nav),
            ControlMode::Manual => io.modes.update_manual(&self.nav),
            ControlMode::Scan => io.modes.update_scan(&mut self.nav),
            ControlMode::ServoTest => io.modes.update_servo_test(),
            ControlMode::Stop => {
                io.servos.disarm_all();
                Ok(())
            }
            ControlMode::Initialising => {
                if self.update_initialising(io, now_ms) {
                    self.set_mode(ControlMode::Auto);
                }
                Ok(())
            }
        }
    }

    /// Pitch-axis levelling state. Returns true once the attitude has
    /// held the settle band for the configured delay.
    fn update_initialising(&mut self, io: &mut TrackerIo<'_>, now_ms: u64) -> bool {
        // Fixed pitch target; yaw output stays off so that axis cannot
        // move erratically before the first real command.
        self.nav.pitch_deg = INITIALISING_PITCH_DEG;

        io.servos.disable_yaw();
        io.servos.enable_pitch();

        let pitch_cmd = (self.nav.pitch_deg + self.params.pitch_trim_deg).clamp(-90.0, 90.0);
        io.servos.set_pitch_angle(pitch_cmd);

        let attitude_pitch_deg = io.attitude.pitch_rad().to_degrees();
        if attitude_pitch_deg > SETTLE_BAND_LOW_DEG && attitude_pitch_deg < SETTLE_BAND_HIGH_DEG {
            let since = *self.settle_since_ms.get_or_insert(now_ms);
            let delay_ms = (self.params.startup_delay_s * 1000.0) as u64;
            now_ms.saturating_sub(since) >= delay_ms
        } else {
            // Not yet settled: leaving the band restarts the timer
            self.settle_since_ms = None;
            false
        }
    }

    /// Externally commanded mode change. Returns the previous mode.
    pub fn set_mode(&mut self, mode: ControlMode) -> ControlMode {
        let previous = self.mode;
        self.mode = mode;
        self.settle_since_ms = None;
        previous
    }

    // -- Telemetry ingest --

    /// Store a vehicle position sample.
    pub fn handle_position_report(&mut self, report: &PositionReport, clock: &dyn Clock) {
        self.vehicle
            .handle_position_report(report, clock.now_us(), clock.now_ms());
    }

    /// Fold an aircraft pressure sample into the altitude difference.
    ///
    /// Ignored entirely while the altitude source is GPS.
    pub fn handle_pressure_report(&mut self, report: &PressureReport, baro: &dyn BaroSource) {
        if self.params.alt_source != AltSource::Baro {
            return;
        }
        altitude::handle_pressure_report(&mut self.nav, baro, report);
    }

    /// Apply an operator manual-control sample.
    pub fn handle_manual_control(&mut self, report: &ManualControlReport) {
        nav::handle_manual_control(&mut self.nav, report);
    }

    /// Request an altitude calibration; applied on the next barometric
    /// sample.
    pub fn request_altitude_calibration(&mut self) {
        self.nav.need_altitude_calibration = true;
    }

    // -- Accessors --

    pub fn nav_status(&self) -> &NavStatus {
        &self.nav
    }

    pub fn control_mode(&self) -> ControlMode {
        self.mode
    }

    pub fn vehicle(&self) -> &VehicleState {
        self.vehicle.state()
    }

    /// Smoothed own position.
    pub fn tracker_position(&self) -> Location {
        self.position.current()
    }

    /// True iff a vehicle telemetry sample arrived within the tracking
    /// timeout, as of the last tick.
    pub fn link_armed(&self) -> bool {
        self.link_armed
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::AXIS_UNUSED;
    use crate::traits::{FixStatus, GpsFix, MockClock};

    struct TestGps {
        fix: GpsFix,
    }

    impl TestGps {
        fn new(lat: f64, lon: f64, alt: f32) -> Self {
            Self {
                fix: GpsFix {
                    status: FixStatus::Fix3D,
                    location: Location::new(lat, lon, alt),
                },
            }
        }
    }

    impl PositionSource for TestGps {
        fn fix(&self) -> GpsFix {
            self.fix
        }
    }

    struct TestAttitude {
        pitch_deg: f32,
    }

    impl AttitudeSource for TestAttitude {
        fn pitch_rad(&self) -> f32 {
            self.pitch_deg.to_radians()
        }
    }

    struct TestSafety {
        armed: bool,
    }

    impl SafetySwitch for TestSafety {
        fn motion_armed(&self) -> bool {
            self.armed
        }
    }

    #[derive(Default)]
    struct TestServos {
        pitch_enabled: bool,
        yaw_enabled: bool,
        last_pitch_deg: Option<f32>,
        disarm_count: u32,
    }

    impl ServoChannels for TestServos {
        fn enable_pitch(&mut self) {
            self.pitch_enabled = true;
        }

        fn disable_pitch(&mut self) {
            self.pitch_enabled = false;
        }

        fn enable_yaw(&mut self) {
            self.yaw_enabled = true;
        }

        fn disable_yaw(&mut self) {
            self.yaw_enabled = false;
        }

        fn set_pitch_angle(&mut self, pitch_deg: f32) {
            self.last_pitch_deg = Some(pitch_deg);
        }

        fn disarm_all(&mut self) {
            self.pitch_enabled = false;
            self.yaw_enabled = false;
            self.disarm_count += 1;
        }
    }

    #[derive(Default)]
    struct TestStrategies {
        auto_calls: u32,
        manual_calls: u32,
        scan_calls: u32,
        servo_test_calls: u32,
    }

    impl ModeStrategies for TestStrategies {
        fn update_auto(&mut self, _nav: &NavStatus) -> Result<(), &'static str> {
            self.auto_calls += 1;
            Ok(())
        }

        fn update_manual(&mut self, _nav: &NavStatus) -> Result<(), &'static str> {
            self.manual_calls += 1;
            Ok(())
        }

        fn update_scan(&mut self, _nav: &mut NavStatus) -> Result<(), &'static str> {
            self.scan_calls += 1;
            Ok(())
        }

        fn update_servo_test(&mut self) -> Result<(), &'static str> {
            self.servo_test_calls += 1;
            Ok(())
        }
    }

    struct Rig {
        clock: MockClock,
        gps: TestGps,
        attitude: TestAttitude,
        safety: TestSafety,
        servos: TestServos,
        strategies: TestStrategies,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                clock: MockClock::new(),
                gps: TestGps::new(35.0, 139.0, 50.0),
                attitude: TestAttitude { pitch_deg: 0.0 },
                safety: TestSafety { armed: true },
                servos: TestServos::default(),
                strategies: TestStrategies::default(),
            }
        }

        fn update(&mut self, tracker: &mut Tracker) {
            let mut io = TrackerIo {
                clock: &self.clock,
                gps: &self.gps,
                attitude: &self.attitude,
                safety: &self.safety,
                servos: &mut self.servos,
                modes: &mut self.strategies,
            };
            tracker.update(&mut io).unwrap();
        }
    }

    fn vehicle_report() -> PositionReport {
        PositionReport {
            lat_e7: 360_000_000,
            lon_e7: 1_390_000_000,
            alt_mm: 250_000,
            heading_cdeg: 9000,
            vx_cms: 0,
            vy_cms: 1000,
        }
    }

    #[test]
    fn startup_delay_withholds_dispatch_but_keeps_estimating() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams {
            startup_delay_s: 1.0,
            ..Default::default()
        });
        tracker.set_mode(ControlMode::Auto);

        rig.clock.set(20_000);
        tracker.handle_position_report(&vehicle_report(), &rig.clock);
        rig.clock.set(40_000);
        rig.update(&mut tracker);

        // Gated: no dispatch, but the estimation stage ran
        assert_eq!(rig.strategies.auto_calls, 0);
        assert!(tracker.vehicle().location_valid);
        assert!(tracker.link_armed());

        rig.clock.set(1_200_000);
        rig.update(&mut tracker);
        assert_eq!(rig.strategies.auto_calls, 1);
    }

    #[test]
    fn startup_delay_measured_from_first_tick() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams {
            startup_delay_s: 1.0,
            ..Default::default()
        });
        tracker.set_mode(ControlMode::Manual);

        rig.clock.set(500_000);
        rig.update(&mut tracker);
        assert_eq!(rig.strategies.manual_calls, 0);

        // 1.2 s after process start but only 0.7 s after the first tick
        rig.clock.set(1_200_000);
        rig.update(&mut tracker);
        assert_eq!(rig.strategies.manual_calls, 0);

        rig.clock.set(1_500_000);
        rig.update(&mut tracker);
        assert_eq!(rig.strategies.manual_calls, 1);
    }

    #[test]
    fn disarmed_safety_withholds_dispatch() {
        let mut rig = Rig::new();
        rig.safety.armed = false;
        let mut tracker = Tracker::new(TrackerParams::default());
        tracker.set_mode(ControlMode::Auto);

        rig.update(&mut tracker);
        assert_eq!(rig.strategies.auto_calls, 0);

        rig.safety.armed = true;
        rig.clock.advance(20_000);
        rig.update(&mut tracker);
        assert_eq!(rig.strategies.auto_calls, 1);
    }

    #[test]
    fn dispatch_reaches_the_active_mode_only() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams::default());

        for (mode, expected) in [
            (ControlMode::Auto, (1, 0, 0, 0)),
            (ControlMode::Manual, (1, 1, 0, 0)),
            (ControlMode::Scan, (1, 1, 1, 0)),
            (ControlMode::ServoTest, (1, 1, 1, 1)),
        ] {
            tracker.set_mode(mode);
            rig.clock.advance(20_000);
            rig.update(&mut tracker);
            let got = (
                rig.strategies.auto_calls,
                rig.strategies.manual_calls,
                rig.strategies.scan_calls,
                rig.strategies.servo_test_calls,
            );
            assert_eq!(got, expected, "after dispatching {:?}", mode);
        }
    }

    #[test]
    fn stop_mode_disarms_every_tick() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams::default());
        tracker.set_mode(ControlMode::Stop);

        rig.update(&mut tracker);
        rig.clock.advance(20_000);
        rig.update(&mut tracker);
        assert_eq!(rig.servos.disarm_count, 2);
    }

    #[test]
    fn initialising_commands_pitch_and_disables_yaw() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams {
            pitch_trim_deg: 2.0,
            ..Default::default()
        });
        rig.servos.yaw_enabled = true;

        rig.update(&mut tracker);

        assert_eq!(tracker.control_mode(), ControlMode::Initialising);
        assert!(rig.servos.pitch_enabled);
        assert!(!rig.servos.yaw_enabled);
        assert_eq!(rig.servos.last_pitch_deg, Some(47.0));
        assert_eq!(tracker.nav_status().pitch_deg, INITIALISING_PITCH_DEG);
    }

    #[test]
    fn initialising_pitch_command_is_clamped() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams {
            pitch_trim_deg: 60.0,
            ..Default::default()
        });

        rig.update(&mut tracker);
        assert_eq!(rig.servos.last_pitch_deg, Some(90.0));
    }

    #[test]
    fn initialising_transitions_after_settling() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams {
            startup_delay_s: 1.0,
            ..Default::default()
        });

        // First tick latches process start; the startup gate holds until
        // one second has elapsed
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Initialising);

        // Past the gate, still out of band
        rig.clock.set(1_020_000);
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Initialising);

        // Enters the band: timer starts, no transition yet
        rig.attitude.pitch_deg = 45.0;
        rig.clock.set(1_040_000);
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Initialising);

        // Still in band but the delay has not elapsed
        rig.clock.set(1_500_000);
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Initialising);

        // One full delay in band
        rig.clock.set(2_040_000);
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Auto);
    }

    #[test]
    fn leaving_the_band_restarts_the_settle_timer() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams {
            startup_delay_s: 1.0,
            ..Default::default()
        });

        // Latch process start, clear the startup gate, enter the band
        rig.update(&mut tracker);
        rig.attitude.pitch_deg = 45.0;
        rig.clock.set(1_020_000);
        rig.update(&mut tracker);

        // Drops out of the band before the delay elapses
        rig.clock.set(1_900_000);
        rig.attitude.pitch_deg = 30.0;
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Initialising);

        // Back in band; the old 0.88 s of credit is gone
        rig.attitude.pitch_deg = 45.0;
        rig.clock.set(2_000_000);
        rig.update(&mut tracker);
        rig.clock.set(2_900_000);
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Initialising);

        rig.clock.set(3_020_000);
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Auto);
    }

    #[test]
    fn initialising_with_zero_delay_transitions_on_first_in_band_tick() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams::default());

        rig.attitude.pitch_deg = 44.0;
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Auto);
    }

    #[test]
    fn settle_band_edges_are_exclusive() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams::default());

        rig.attitude.pitch_deg = 40.0;
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Initialising);

        rig.attitude.pitch_deg = 50.0;
        rig.clock.advance(20_000);
        rig.update(&mut tracker);
        assert_eq!(tracker.control_mode(), ControlMode::Initialising);
    }

    #[test]
    fn gps_alt_source_updates_difference_each_tick() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams {
            alt_source: AltSource::Gps,
            ..Default::default()
        });
        tracker.set_mode(ControlMode::Auto);

        tracker.handle_position_report(&vehicle_report(), &rig.clock);
        rig.clock.set(20_000);
        rig.update(&mut tracker);

        // Vehicle at 250 m, tracker GPS at 50 m
        let nav = tracker.nav_status();
        assert!((nav.altitude_difference_m - 200.0).abs() < 0.01);
    }

    #[test]
    fn pressure_reports_ignored_in_gps_mode() {
        struct TestBaro;
        impl BaroSource for TestBaro {
            fn pressure_pa(&self) -> f32 {
                101_325.0
            }
        }

        let mut tracker = Tracker::new(TrackerParams {
            alt_source: AltSource::Gps,
            ..Default::default()
        });
        tracker.handle_pressure_report(
            &PressureReport {
                press_abs_hpa: 900.0,
            },
            &TestBaro,
        );
        assert_eq!(tracker.nav_status().altitude_difference_m, 0.0);
    }

    #[test]
    fn manual_control_flows_into_nav_status() {
        let mut tracker = Tracker::new(TrackerParams::default());
        tracker.handle_manual_control(&ManualControlReport { x: AXIS_UNUSED, y: 100 });

        let nav = tracker.nav_status();
        assert!(!nav.manual_control_yaw);
        assert!(nav.manual_control_pitch);
        assert_eq!(nav.distance_m, 0.0);
    }

    #[test]
    fn set_mode_returns_previous() {
        let mut tracker = Tracker::new(TrackerParams::default());
        assert_eq!(tracker.control_mode(), ControlMode::Initialising);

        let previous = tracker.set_mode(ControlMode::Scan);
        assert_eq!(previous, ControlMode::Initialising);
        assert_eq!(tracker.control_mode(), ControlMode::Scan);
    }

    #[test]
    fn link_armed_drops_after_timeout() {
        let mut rig = Rig::new();
        let mut tracker = Tracker::new(TrackerParams::default());

        rig.clock.set(20_000);
        tracker.handle_position_report(&vehicle_report(), &rig.clock);
        rig.clock.set(2_000_000);
        rig.update(&mut tracker);
        assert!(tracker.link_armed());

        rig.clock.set(6_000_000);
        rig.update(&mut tracker);
        assert!(!tracker.link_armed());
        assert!(!tracker.vehicle().location_valid);
    }
}
