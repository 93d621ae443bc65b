//! Tracker own-position filter.
//!
//! Exponential smoothing of the tracker's GPS fix. The tracker is
//! stationary or slow-moving, so the filter weights the history heavily
//! to suppress fix jitter without a full Kalman filter.

use crate::telemetry::Location;
use crate::traits::{FixStatus, GpsFix};

/// Weight of the previous smoothed value in the exponential average.
const PREV_WEIGHT: f64 = 0.95;
/// Weight of the new raw sample.
const RAW_WEIGHT: f64 = 0.05;

/// Smoothed own-position state: current and previous smoothed location.
///
/// The previous location is the filter's running state. An explicit
/// `initialized` flag marks whether any usable fix has been seen, so a
/// genuine fix at the zero coordinate is handled like any other.
#[derive(Debug, Default)]
pub struct TrackerPositionFilter {
    current: Location,
    previous: Location,
    initialized: bool,
}

impl TrackerPositionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current smoothed location.
    ///
    /// Frozen at the last smoothed value while the fix quality is below
    /// 2D; zero until the first usable fix.
    pub fn current(&self) -> Location {
        self.current
    }

    /// True once any usable fix has been observed.
    pub fn has_position(&self) -> bool {
        self.initialized
    }

    /// Fold one GPS fix into the smoothed position.
    ///
    /// Below a 2D fix nothing updates. The first usable fix is adopted
    /// directly (bootstrap, no blending); after that each axis blends
    /// `0.95 * previous + 0.05 * raw`, and the result becomes both the
    /// new current and the new previous location.
    pub fn tick(&mut self, fix: &GpsFix) {
        if fix.status < FixStatus::Fix2D {
            return;
        }

        if !self.initialized {
            self.current = fix.location;
            self.previous = fix.location;
            self.initialized = true;
            return;
        }

        let raw = fix.location;
        let blended = Location {
            lat_deg: PREV_WEIGHT * self.previous.lat_deg + RAW_WEIGHT * raw.lat_deg,
            lon_deg: PREV_WEIGHT * self.previous.lon_deg + RAW_WEIGHT * raw.lon_deg,
            alt_m: PREV_WEIGHT as f32 * self.previous.alt_m + RAW_WEIGHT as f32 * raw.alt_m,
        };
        self.current = blended;
        self.previous = blended;
    }
}
