//! Lockstep SITL bridge.
//!
//! Drives the tracker core at its real 50 Hz cadence against the
//! simulated vehicle and sensors. One step is one 20 ms control period:
//! the vehicle moves, the sensors refresh, any due telemetry is delivered
//! (or dropped by the simulated link), then the core ticks once.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sky_track_core::mode::ControlMode;
use sky_track_core::params::TrackerParams;
use sky_track_core::telemetry::Location;
use sky_track_core::tracker::{Tracker, TrackerIo};
use sky_track_core::traits::MockClock;

use crate::error::HarnessError;
use crate::sensors::{RecordingServos, RecordingStrategies, SimAttitude, SimBaro, SimGps, SimSafetySwitch};
use crate::vehicle::{SimulatedVehicle, VehicleConfig};

/// One control period at 50 Hz, in microseconds.
pub const STEP_US: u64 = 20_000;

/// Harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub vehicle: VehicleConfig,
    /// True tracker position fed to the simulated GPS
    pub tracker_location: Location,
    /// GPS scatter radius in meters (0 = perfect fixes)
    pub gps_jitter_m: f32,
    /// Telemetry period in control steps (50 = 1 Hz, 0 = no telemetry)
    pub telemetry_interval_steps: u32,
    /// Probability that a telemetry sample is lost in the link
    pub packet_loss: f64,
    /// Seed for the link and sensor random streams
    pub seed: u64,
    pub params: TrackerParams,
}

/// Lockstep harness owning the core and every simulated collaborator.
pub struct TrackerHarness {
    pub tracker: Tracker,
    pub clock: MockClock,
    pub vehicle: SimulatedVehicle,
    pub gps: SimGps,
    pub baro: SimBaro,
    pub attitude: SimAttitude,
    pub safety: SimSafetySwitch,
    pub servos: RecordingServos,
    pub strategies: RecordingStrategies,
    rng: StdRng,
    step_count: u32,
    telemetry_interval_steps: u32,
    packet_loss: f64,
    prev_mode: ControlMode,
}

impl TrackerHarness {
    pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
        if !(0.0..=1.0).contains(&config.packet_loss) {
            return Err(HarnessError::InvalidConfig(format!(
                "packet loss {} outside 0..=1",
                config.packet_loss
            )));
        }

        let tracker = Tracker::new(config.params);
        let prev_mode = tracker.control_mode();
        log::info!(
            "harness up: telemetry every {} steps, packet loss {}",
            config.telemetry_interval_steps,
            config.packet_loss
        );

        Ok(Self {
            tracker,
            clock: MockClock::new(),
            vehicle: SimulatedVehicle::new(config.vehicle),
            gps: SimGps::with_jitter(config.tracker_location, config.gps_jitter_m, config.seed ^ 1),
            baro: SimBaro::default(),
            attitude: SimAttitude::new(),
            safety: SimSafetySwitch::new(true),
            servos: RecordingServos::new(),
            strategies: RecordingStrategies::new(),
            rng: StdRng::seed_from_u64(config.seed),
            step_count: 0,
            telemetry_interval_steps: config.telemetry_interval_steps,
            packet_loss: config.packet_loss,
            prev_mode,
        })
    }

    /// Run one 20 ms control period.
    pub fn step(&mut self) -> Result<(), HarnessError> {
        self.clock.advance(STEP_US);
        let dt = STEP_US as f32 * 1.0e-6;

        self.vehicle.step(dt);
        self.gps.step();
        self.attitude.track(self.servos.last_pitch_deg, dt);

        self.step_count += 1;
        if self.telemetry_interval_steps > 0 && self.step_count % self.telemetry_interval_steps == 0
        {
            if self.rng.random_bool(self.packet_loss) {
                log::debug!("telemetry sample dropped by the link");
            } else {
                let report = self.vehicle.position_report();
                self.tracker.handle_position_report(&report, &self.clock);
                let pressure = self.vehicle.pressure_report();
                self.tracker.handle_pressure_report(&pressure, &self.baro);
            }
        }

        let mut io = TrackerIo {
            clock: &self.clock,
            gps: &self.gps,
            attitude: &self.attitude,
            safety: &self.safety,
            servos: &mut self.servos,
            modes: &mut self.strategies,
        };
        self.tracker.update(&mut io).map_err(HarnessError::Strategy)?;

        let mode = self.tracker.control_mode();
        if mode != self.prev_mode {
            log::info!(
                "control mode: {} -> {}",
                self.prev_mode.as_str(),
                mode.as_str()
            );
            self.prev_mode = mode;
        }

        Ok(())
    }

    /// Run a number of control periods.
    pub fn run(&mut self, steps: u32) -> Result<(), HarnessError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Run for a duration in simulated seconds.
    pub fn run_secs(&mut self, secs: f32) -> Result<(), HarnessError> {
        self.run((secs * 50.0).round() as u32)
    }

    /// Silence the vehicle's telemetry from now on.
    pub fn stop_telemetry(&mut self) {
        self.telemetry_interval_steps = 0;
    }
}
