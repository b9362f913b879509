//! # Bevy Step Hooks
//!
//! Fixed-step physics helpers for Bevy 0.18 and avian3d.
//!
//! ## Features
//! - Predict a rigid body's velocity after the next physics step, before
//!   avian integrates it (forces, optional gravity, optional linear drag)
//! - Run any system once per fixed step after physics, bound to a host
//!   entity's lifetime
//! - Per-step force accumulation for gameplay code
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_step_hooks::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(StepHooksPluginGroup)
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     let host = commands.spawn(Name::new("referee")).id();
//!     commands.add_post_physics_callback(host, || info!("step finished"));
//! }
//! ```

pub mod components;
pub mod error;
pub mod events;
pub mod prediction;
pub mod resources;
pub mod scheduling;
pub mod systems;
pub mod types;

pub mod prelude {
    pub use crate::components::*;
    pub use crate::error::{CallbackError, PredictionError};
    pub use crate::events::*;
    pub use crate::prediction::{drag_multiplier, predict_position, predict_velocity, try_predict_velocity};
    pub use crate::resources::*;
    pub use crate::scheduling::{PostPhysicsCommandsExt, PostPhysicsExt};
    pub use crate::types::*;
    pub use crate::StepHooksPluginGroup;
    pub use crate::{
        PostPhysicsCallbackPlugin, StepHooksDebugPlugin, VelocityPredictionPlugin,
        VelocityPredictionSystems,
    };
}

use bevy::prelude::*;

/// Main plugin group: prediction, post-physics callbacks and debug drawing.
///
/// Physics itself is not included; add avian's `PhysicsPlugins` alongside.
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_step_hooks::prelude::*;
///
/// fn main() {
///     App::new()
///         .add_plugins(DefaultPlugins)
///         .add_plugins(StepHooksPluginGroup)
///         .run();
/// }
/// ```
#[derive(Default)]
pub struct StepHooksPluginGroup;

impl PluginGroup for StepHooksPluginGroup {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(VelocityPredictionPlugin)
            .add(PostPhysicsCallbackPlugin)
            .add(StepHooksDebugPlugin)
    }
}

/// System set holding the prediction systems in `FixedUpdate`.
///
/// Gameplay systems that fill [`AccumulatedForce`](components::AccumulatedForce)
/// or apply forces through avian's `Forces` should run
/// `.before(VelocityPredictionSystems)`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct VelocityPredictionSystems;

/// Velocity prediction plugin.
///
/// # Systems
/// - `forward_accumulated_forces` - Hands `AccumulatedForce` to avian's `Forces` and clears it (`dim3`)
/// - `predict_velocities` - Writes `PredictedVelocity` for marked bodies (`dim3`)
pub struct VelocityPredictionPlugin;

impl Plugin for VelocityPredictionPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::PredictVelocity>()
            .register_type::<components::PredictedVelocity>()
            .register_type::<components::AccumulatedForce>()
            .register_type::<resources::PredictionConfig>()
            .init_resource::<resources::PredictionConfig>();

        #[cfg(feature = "dim3")]
        app.add_systems(
            FixedUpdate,
            (
                systems::prediction::forward_accumulated_forces,
                systems::prediction::predict_velocities,
            )
                .chain()
                .in_set(VelocityPredictionSystems),
        );
    }
}

/// Post-physics callback plugin.
///
/// # Systems
/// - `run_post_physics_callbacks` - Runs registered callbacks in `FixedLast`
///
/// # Messages
/// - `PostPhysicsCallbackEnded` - A callback stopped (host gone or cancelled)
pub struct PostPhysicsCallbackPlugin;

impl Plugin for PostPhysicsCallbackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<resources::PostPhysicsCallbacks>()
            .add_message::<events::PostPhysicsCallbackEnded>()
            .add_systems(FixedLast, systems::callbacks::run_post_physics_callbacks);
    }
}

/// Debug plugin for prediction visualization.
pub struct StepHooksDebugPlugin;

impl Plugin for StepHooksDebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<resources::PredictionConfig>()
            .add_systems(Update, systems::debug::draw_prediction_debug);
    }
}
