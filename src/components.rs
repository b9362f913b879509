//! Components for per-body velocity prediction.

use bevy::prelude::*;

/// Opt-in marker: predict this body's velocity every fixed step.
///
/// Inserting it also inserts [`PredictedVelocity`], which the prediction
/// system overwrites each step.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_step_hooks::components::{PredictVelocity, AccumulatedForce};
///
/// fn spawn_probe(mut commands: Commands) {
///     commands.spawn((PredictVelocity, AccumulatedForce::default()));
/// }
/// ```
#[derive(Component, Reflect, Default, Clone, Copy)]
#[reflect(Component)]
#[require(PredictedVelocity)]
pub struct PredictVelocity;

/// Velocity the body is expected to have after the upcoming physics step.
///
/// Written in `FixedUpdate`, before the physics engine steps in
/// `FixedPostUpdate`. Excludes collision response and friction.
#[derive(Component, Reflect, Default, Clone, Copy, Debug, PartialEq, Deref, DerefMut)]
#[reflect(Component)]
pub struct PredictedVelocity(pub Vec3);

/// Forces added to a body during the current fixed step.
///
/// Gameplay systems add forces here during `FixedUpdate`. Each step the
/// buffer is handed to avian's `Forces::apply_force`, so the physics step
/// integrates it, and then cleared.
#[derive(Component, Reflect, Default, Clone, Copy, Debug, PartialEq)]
#[reflect(Component)]
pub struct AccumulatedForce(pub Vec3);

impl AccumulatedForce {
    /// Add a force (N) for this step.
    pub fn add(&mut self, force: Vec3) {
        self.0 += force;
    }

    /// Total force accumulated so far this step.
    pub fn total(&self) -> Vec3 {
        self.0
    }

    /// Reset to zero.
    pub fn clear(&mut self) {
        self.0 = Vec3::ZERO;
    }
}
