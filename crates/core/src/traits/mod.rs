//! Platform service abstractions
//!
//! Everything the tracking core needs from the outside world comes in
//! through these traits: a monotonic clock, the tracker's own sensors,
//! the servo output layer, and the per-mode control strategies.
//! Platform-specific implementations live in the host crates; the SITL
//! crate provides simulated ones.

mod actuators;
mod clock;
mod sensors;

pub use actuators::{ModeStrategies, ServoChannels};
pub use clock::{Clock, MockClock};
pub use sensors::{
    AttitudeSource, BaroSource, FixStatus, GpsFix, PositionSource, SafetySwitch,
};
