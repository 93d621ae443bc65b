//! Harness error type.

/// Errors that can occur while driving the SITL loop.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Invalid harness config: {0}")]
    InvalidConfig(String),

    #[error("Mode strategy failed: {0}")]
    Strategy(&'static str),
}
