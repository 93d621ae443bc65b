//! Tracker parameter definitions.
//!
//! # Parameters
//!
//! - `STARTUP_DELAY` - Seconds to withhold servo output after start; also
//!   the settle time required before Initialising hands over to Auto
//! - `ALT_SOURCE` - Altitude-difference source (0 = barometric, 1 = GPS)
//! - `PITCH_TRIM` - Pitch trim offset in degrees
//!
//! The lost-vehicle timeout is a fixed constant
//! ([`crate::estimator::TRACKING_TIMEOUT_SEC`]), deliberately not a
//! parameter.

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::altitude::AltSource;

const DEFAULT_STARTUP_DELAY_S: f32 = 0.0;
const DEFAULT_ALT_SOURCE: i32 = 0;
const DEFAULT_PITCH_TRIM_DEG: f32 = 0.0;

/// Tracker parameters loaded from the parameter store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackerParams {
    /// Actuation hold-off and initialising settle time, seconds
    pub startup_delay_s: f32,
    /// Altitude-difference source
    pub alt_source: AltSource,
    /// Pitch trim offset in degrees
    pub pitch_trim_deg: f32,
}

impl TrackerParams {
    /// Register tracker parameters with default values.
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "STARTUP_DELAY",
            ParamValue::Float(DEFAULT_STARTUP_DELAY_S),
            ParamFlags::empty(),
        )?;
        store.register(
            "ALT_SOURCE",
            ParamValue::Int(DEFAULT_ALT_SOURCE),
            ParamFlags::empty(),
        )?;
        store.register(
            "PITCH_TRIM",
            ParamValue::Float(DEFAULT_PITCH_TRIM_DEG),
            ParamFlags::empty(),
        )?;

        Ok(())
    }

    /// Load tracker parameters, falling back to defaults for anything
    /// missing or carrying an unexpected variant.
    pub fn from_store(store: &ParameterStore) -> Self {
        let startup_delay_s = match store.get("STARTUP_DELAY") {
            Some(ParamValue::Float(v)) => *v,
            Some(ParamValue::Int(v)) => *v as f32,
            _ => DEFAULT_STARTUP_DELAY_S,
        };

        let alt_source = match store.get("ALT_SOURCE") {
            Some(ParamValue::Int(1)) => AltSource::Gps,
            _ => AltSource::Baro,
        };

        let pitch_trim_deg = match store.get("PITCH_TRIM") {
            Some(ParamValue::Float(v)) => *v,
            Some(ParamValue::Int(v)) => *v as f32,
            _ => DEFAULT_PITCH_TRIM_DEG,
        };

        Self {
            startup_delay_s,
            alt_source,
            pitch_trim_deg,
        }
    }
}
