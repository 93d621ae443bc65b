//! Tracker configuration parameters.
//!
//! A fixed-capacity key/value store plus typed parameter structs with
//! `register_defaults` / `from_store` pairs. Persistence is the host's
//! concern; this core only registers, reads, and validates values.
//!
//! # Components
//!
//! - [`storage`]: Core parameter types and the `ParameterStore`
//! - [`error`]: Parameter error type
//! - [`tracker`]: Tracker parameter definitions

pub mod error;
pub mod storage;
pub mod tracker;

pub use error::ParameterError;
pub use storage::{ParamFlags, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
pub use tracker::TrackerParams;
