//! Simulated tracker-side sensors and recording actuator fakes.
//!
//! The recording fakes are test instruments, not control strategies:
//! they capture what the core commanded so assertions can inspect it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sky_track_core::nav::NavStatus;
use sky_track_core::telemetry::Location;
use sky_track_core::traits::{
    AttitudeSource, BaroSource, FixStatus, GpsFix, ModeStrategies, PositionSource, SafetySwitch,
    ServoChannels,
};

/// Meters per degree of latitude, for jitter conversion.
const M_PER_DEG: f64 = 111_320.0;

/// Simulated GPS receiver for the tracker's own position.
#[derive(Debug)]
pub struct SimGps {
    location: Location,
    status: FixStatus,
    jitter_m: f32,
    rng: StdRng,
    fix: GpsFix,
}

impl SimGps {
    pub fn new(location: Location) -> Self {
        Self::with_jitter(location, 0.0, 0)
    }

    /// Receiver whose fixes scatter uniformly within `jitter_m` of the
    /// true position, deterministic for a given seed.
    pub fn with_jitter(location: Location, jitter_m: f32, seed: u64) -> Self {
        Self {
            location,
            status: FixStatus::Fix3D,
            jitter_m,
            rng: StdRng::seed_from_u64(seed),
            fix: GpsFix { status: FixStatus::Fix3D, location },
        }
    }

    pub fn set_status(&mut self, status: FixStatus) {
        self.status = status;
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Produce the next fix.
    pub fn step(&mut self) {
        let mut location = self.location;
        if self.jitter_m > 0.0 {
            let j = self.jitter_m as f64;
            location.lat_deg += self.rng.random_range(-j..=j) / M_PER_DEG;
            location.lon_deg += self.rng.random_range(-j..=j) / M_PER_DEG;
            location.alt_m += self.rng.random_range(-j..=j) as f32;
        }
        self.fix = GpsFix {
            status: self.status,
            location,
        };
    }
}

impl PositionSource for SimGps {
    fn fix(&self) -> GpsFix {
        self.fix
    }
}

/// Fixed-pressure local barometer.
#[derive(Debug)]
pub struct SimBaro {
    pressure_pa: f32,
}

impl SimBaro {
    pub fn new(pressure_pa: f32) -> Self {
        Self { pressure_pa }
    }

    pub fn set_pressure_pa(&mut self, pressure_pa: f32) {
        self.pressure_pa = pressure_pa;
    }
}

impl Default for SimBaro {
    fn default() -> Self {
        Self::new(101_325.0)
    }
}

impl BaroSource for SimBaro {
    fn pressure_pa(&self) -> f32 {
        self.pressure_pa
    }
}

/// Attitude reference that lags toward the last commanded pitch like a
/// real gimbal settling.
#[derive(Debug)]
pub struct SimAttitude {
    pitch_deg: f32,
    /// First-order time constant, seconds
    tau_s: f32,
}

impl SimAttitude {
    pub fn new() -> Self {
        Self {
            pitch_deg: 0.0,
            tau_s: 0.5,
        }
    }

    /// Pin the attitude directly (for tests that bypass the servo loop).
    pub fn set_pitch_deg(&mut self, pitch_deg: f32) {
        self.pitch_deg = pitch_deg;
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    /// Relax toward the commanded pitch, if any axis command is active.
    pub fn track(&mut self, commanded_deg: Option<f32>, dt: f32) {
        if let Some(target) = commanded_deg {
            let alpha = (dt / self.tau_s).min(1.0);
            self.pitch_deg += (target - self.pitch_deg) * alpha;
        }
    }
}

impl Default for SimAttitude {
    fn default() -> Self {
        Self::new()
    }
}

impl AttitudeSource for SimAttitude {
    fn pitch_rad(&self) -> f32 {
        self.pitch_deg.to_radians()
    }
}

/// Safety interlock with a toggle.
#[derive(Debug)]
pub struct SimSafetySwitch {
    pub armed: bool,
}

impl SimSafetySwitch {
    pub fn new(armed: bool) -> Self {
        Self { armed }
    }
}

impl SafetySwitch for SimSafetySwitch {
    fn motion_armed(&self) -> bool {
        self.armed
    }
}

/// Servo output recorder.
#[derive(Debug, Default)]
pub struct RecordingServos {
    pub pitch_enabled: bool,
    pub yaw_enabled: bool,
    pub last_pitch_deg: Option<f32>,
    pub pitch_commands: u32,
    pub disarm_count: u32,
}

impl RecordingServos {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServoChannels for RecordingServos {
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
        self.pitch_commands += 1;
    }

    fn disarm_all(&mut self) {
        self.pitch_enabled = false;
        self.yaw_enabled = false;
        self.disarm_count += 1;
    }
}

/// Strategy recorder: counts dispatches per mode.
#[derive(Debug, Default)]
pub struct RecordingStrategies {
    pub auto_calls: u32,
    pub manual_calls: u32,
    pub scan_calls: u32,
    pub servo_test_calls: u32,
    /// When set, every dispatch fails with this message
    pub fail_with: Option<&'static str>,
}

impl RecordingStrategies {
    pub fn new() -> Self {
        Self::default()
    }

    fn outcome(&self) -> Result<(), &'static str> {
        match self.fail_with {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }
}

impl ModeStrategies for RecordingStrategies {
    fn update_auto(&mut self, _nav: &NavStatus) -> Result<(), &'static str> {
        self.auto_calls += 1;
        self.outcome()
    }

    fn update_manual(&mut self, _nav: &NavStatus) -> Result<(), &'static str> {
        self.manual_calls += 1;
        self.outcome()
    }

    fn update_scan(&mut self, _nav: &mut NavStatus) -> Result<(), &'static str> {
        self.scan_calls += 1;
        self.outcome()
    }

    fn update_servo_test(&mut self) -> Result<(), &'static str> {
        self.servo_test_calls += 1;
        self.outcome()
    }
}
