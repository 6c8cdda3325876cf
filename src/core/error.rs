//! Error types surfaced by the simulation and its collaborators.

use std::io;
use thiserror::Error;

/// Errors returned to callers of the simulation and training harness.
#[derive(Debug, Error)]
pub enum SimError {
    /// A physics, obstacle or training constant is unusable. Raised before any tick runs.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The renderer failed to present a frame.
    #[error("render failed: {0}")]
    Render(#[source] io::Error),
    /// A config file could not be read or written.
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SimError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// A controller could not produce a usable decision.
///
/// The episode treats a fault like a collision: the agent is eliminated and the
/// rest of the population keeps running.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ControllerFault {
    #[error("controller produced a non-finite output ({0})")]
    NonFinite(f64),
    #[error("controller failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message() {
        let err = SimError::invalid("pipe gap must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration: pipe gap must be positive"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let err: SimError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, SimError::Io(_)));
    }

    #[test]
    fn test_fault_display() {
        assert_eq!(
            ControllerFault::NonFinite(f64::NAN).to_string(),
            "controller produced a non-finite output (NaN)"
        );
    }
}
