//! Parameter storage types.
//!
//! Fixed-capacity store for tracker configuration, keyed by short ASCII
//! names. Values keep the variant they were registered with; `set`
//! rejects variant changes so a ground-station typo cannot silently turn
//! a float into an integer.

use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

use super::error::ParameterError;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 16;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Hidden from ground-station parameter listings
        const HIDDEN = 0b0000_0001;
        /// Cannot be modified at runtime
        const READ_ONLY = 0b0000_0010;
    }
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point
    Float(f32),
}

impl ParamValue {
    fn same_variant(&self, other: &ParamValue) -> bool {
        matches!(
            (self, other),
            (ParamValue::Bool(_), ParamValue::Bool(_))
                | (ParamValue::Int(_), ParamValue::Int(_))
                | (ParamValue::Float(_), ParamValue::Float(_))
        )
    }
}

/// Parameter store for tracker configuration.
#[derive(Debug, Default)]
pub struct ParameterStore {
    parameters: FnvIndexMap<String<PARAM_NAME_LEN>, ParamValue, MAX_PARAMS>,
    flags: FnvIndexMap<String<PARAM_NAME_LEN>, ParamFlags, MAX_PARAMS>,
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> Result<String<PARAM_NAME_LEN>, ParameterError> {
        let mut key = String::new();
        key.push_str(name)
            .map_err(|_| ParameterError::CapacityExceeded)?;
        Ok(key)
    }

    /// Register a parameter with its default value.
    ///
    /// Re-registering keeps an already-present value so defaults never
    /// clobber configuration loaded before them.
    pub fn register(
        &mut self,
        name: &str,
        default: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = Self::key(name)?;

        if !self.parameters.contains_key(&key) {
            self.parameters
                .insert(key.clone(), default)
                .map_err(|_| ParameterError::CapacityExceeded)?;
        }
        self.flags
            .insert(key, flags)
            .map_err(|_| ParameterError::CapacityExceeded)?;

        Ok(())
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = Self::key(name).ok()?;
        self.parameters.get(&key)
    }

    /// Set parameter value
    ///
    /// The parameter must be registered, writable, and the new value must
    /// carry the registered variant.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = Self::key(name)?;

        let current = self
            .parameters
            .get_mut(&key)
            .ok_or(ParameterError::NotFound)?;
        if !current.same_variant(&value) {
            return Err(ParameterError::TypeMismatch);
        }
        if let Some(flags) = self.flags.get(&key) {
            if flags.contains(ParamFlags::READ_ONLY) {
                return Err(ParameterError::ReadOnly);
            }
        }

        *current = value;
        Ok(())
    }

    /// Number of registered parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// True when no parameters are registered
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
