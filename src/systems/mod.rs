//! Systems module - all ECS systems for prediction and post-physics callbacks.

pub mod callbacks;
pub mod debug;
#[cfg(feature = "dim3")]
pub mod prediction;
