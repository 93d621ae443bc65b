//! Actuator output and per-mode strategy seams.
//!
//! The physical servo layer and the AUTO/MANUAL/SCAN/SERVO_TEST control
//! strategies live outside this core; the tick orchestrator only
//! dispatches to them.

use crate::nav::NavStatus;

/// Yaw and pitch output channels.
///
/// Implementations convert a commanded pitch angle into a physical servo
/// signal.
///
/// # Safety
///
/// Implementations must hold an axis at neutral while its output is
/// disabled, regardless of commanded values.
pub trait ServoChannels {
    /// Enable pitch-axis output.
    fn enable_pitch(&mut self);

    /// Disable pitch-axis output.
    fn disable_pitch(&mut self);

    /// Enable yaw-axis output.
    fn enable_yaw(&mut self);

    /// Disable yaw-axis output.
    fn disable_yaw(&mut self);

    /// Command a pitch angle in degrees to the pitch axis.
    fn set_pitch_angle(&mut self, pitch_deg: f32);

    /// De-energize every axis.
    fn disarm_all(&mut self);
}

/// Per-mode control strategies, dispatched once per tick while their mode
/// is active.
///
/// Scan receives `&mut NavStatus` because it owns the bearing and pitch
/// outputs while active; the other modes only read the command triple.
pub trait ModeStrategies {
    /// Drive the antenna toward the navigation command triple.
    fn update_auto(&mut self, nav: &NavStatus) -> Result<(), &'static str>;

    /// Drive the antenna from operator input.
    fn update_manual(&mut self, nav: &NavStatus) -> Result<(), &'static str>;

    /// Sweep a search pattern; writes its own bearing and pitch.
    fn update_scan(&mut self, nav: &mut NavStatus) -> Result<(), &'static str>;

    /// Exercise the servos for ground testing.
    fn update_servo_test(&mut self) -> Result<(), &'static str>;
}
