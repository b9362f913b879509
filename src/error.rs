//! Error types for prediction and callback scheduling.

use bevy::prelude::Entity;
use thiserror::Error;

use crate::types::PostPhysicsHandle;

/// Result alias used by the checked prediction API.
pub type Result<T, E = PredictionError> = std::result::Result<T, E>;

/// Reasons a body snapshot cannot be integrated.
///
/// The unchecked [`predict_velocity`](crate::prediction::predict_velocity)
/// never produces these; it leaves the caller responsible for valid input.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum PredictionError {
    /// Mass is zero or negative.
    ///
    /// avian reports both zero and infinite mass as `0.0`.
    #[error("body mass must be positive, got {0}")]
    NonPositiveMass(f32),

    /// Mass is NaN or infinite.
    #[error("body mass must be finite, got {0}")]
    NonFiniteMass(f32),

    /// The fixed timestep is negative, NaN or infinite.
    #[error("fixed timestep must be finite and non-negative, got {0}")]
    InvalidTimestep(f32),
}

/// Errors from the post-physics callback registry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CallbackError {
    /// The handle was never issued by this world.
    #[error("no post-physics callback registered for {0:?}")]
    UnknownHandle(PostPhysicsHandle),

    /// The callback already stopped (host despawned or cancelled earlier).
    #[error("post-physics callback {handle:?} bound to {host} has already ended")]
    AlreadyEnded {
        handle: PostPhysicsHandle,
        host: Entity,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = PredictionError::NonPositiveMass(0.0);
        assert_eq!(err.to_string(), "body mass must be positive, got 0");

        let err = PredictionError::InvalidTimestep(-0.5);
        assert!(err.to_string().contains("-0.5"));
    }
}
