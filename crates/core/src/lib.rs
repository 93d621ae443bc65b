//! sky_track_core - Pure no_std estimation and control core for the
//! sky_track antenna tracker
//!
//! A ground unit keeps a directional antenna aimed at a moving vehicle
//! using intermittent telemetry relayed over a lossy link, plus its own
//! GPS fix. This crate holds the platform-agnostic state and algorithms;
//! platform services (clock, GPS, barometer, attitude reference, servo
//! outputs, per-mode control strategies) are injected via traits so
//! everything here can be tested on the host.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Platform services injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Platform service abstractions (clock, sensors, actuators)
//! - [`geo`]: Geodesic distance/bearing and dead-reckoning offsets
//! - [`telemetry`]: Wire-scaled inbound samples and the unit boundary
//! - [`estimator`]: Vehicle position estimator with lost-vehicle detection
//! - [`position`]: Tracker own-position smoothing filter
//! - [`altitude`]: Barometric/GPS altitude-difference fusion
//! - [`nav`]: Bearing/distance/pitch calculation and manual override
//! - [`mode`]: Control mode enumeration
//! - [`tracker`]: 50 Hz tick orchestrator and initialising state machine
//! - [`params`]: Parameter store and tracker parameters

#![no_std]

pub mod altitude;
pub mod estimator;
pub mod geo;
pub mod mode;
pub mod nav;
pub mod params;
pub mod position;
pub mod telemetry;
pub mod tracker;
pub mod traits;
