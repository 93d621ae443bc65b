//! sky_track_sitl - Software-in-the-loop harness for the sky_track core
//!
//! Runs the estimation-and-control core against a simulated vehicle and
//! simulated tracker sensors in lockstep at the real 50 Hz cadence. Used
//! by the integration tests and for tuning experiments on the host.

pub mod error;
pub mod harness;
pub mod sensors;
pub mod vehicle;

pub use error::HarnessError;
pub use harness::{HarnessConfig, TrackerHarness, STEP_US};
pub use sensors::{
    RecordingServos, RecordingStrategies, SimAttitude, SimBaro, SimGps, SimSafetySwitch,
};
pub use vehicle::{SimulatedVehicle, VehicleConfig};
