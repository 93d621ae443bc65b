//! Control mode enumeration.

/// Top-level control mode. Exactly one is active at a time.
///
/// All transitions are externally commanded except Initialising -> Auto,
/// which the tick orchestrator performs itself once the pitch axis has
/// settled. There is no terminal mode; Stop can be entered and left like
/// any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    /// Track the vehicle estimate
    Auto,
    /// Operator drives yaw/pitch directly
    Manual,
    /// Sweep a search pattern
    Scan,
    /// Ground servo exercise
    ServoTest,
    /// All axes de-energized
    Stop,
    /// Pitch-axis levelling on startup
    #[default]
    Initialising,
}

impl ControlMode {
    /// Mode name for logging and telemetry.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Auto => "Auto",
            ControlMode::Manual => "Manual",
            ControlMode::Scan => "Scan",
            ControlMode::ServoTest => "ServoTest",
            ControlMode::Stop => "Stop",
            ControlMode::Initialising => "Initialising",
        }
    }
}
