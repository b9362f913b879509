//! Plain data types shared by the prediction and scheduling APIs.

use bevy::ecs::system::SystemId;
use bevy::prelude::*;

/// Read-only view of a simulated rigid body.
///
/// This is the seam between the prediction math and whatever owns the body
/// state. [`BodySnapshot`] implements it for plain values; with the `dim3`
/// feature the prediction system builds snapshots from avian3d components.
pub trait RigidBodyView {
    /// Mass in kilograms.
    fn mass(&self) -> f32;
    /// Current linear velocity (m/s).
    fn velocity(&self) -> Vec3;
    /// Sum of forces applied during the current tick and not yet integrated (N).
    fn accumulated_force(&self) -> Vec3;
    /// Whether the global gravity vector acts on this body.
    fn use_gravity(&self) -> bool;
    /// Linear drag coefficient (1/s).
    fn drag(&self) -> f32;
}

/// Snapshot of the body properties the predictor reads.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_step_hooks::types::BodySnapshot;
///
/// let body = BodySnapshot::new(2.0)
///     .with_velocity(Vec3::new(0.0, 3.0, 0.0))
///     .with_force(Vec3::X * 10.0)
///     .with_gravity(true);
/// assert_eq!(body.mass, 2.0);
/// ```
#[derive(Reflect, Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot {
    /// Mass (kg)
    pub mass: f32,
    /// Linear velocity (m/s)
    pub velocity: Vec3,
    /// Forces accumulated this tick (N)
    pub accumulated_force: Vec3,
    /// Gravity opt-in
    pub use_gravity: bool,
    /// Linear drag coefficient
    pub drag: f32,
}

impl Default for BodySnapshot {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl BodySnapshot {
    /// Body at rest with the given mass, no forces, gravity off, no drag.
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            velocity: Vec3::ZERO,
            accumulated_force: Vec3::ZERO,
            use_gravity: false,
            drag: 0.0,
        }
    }

    /// Builder pattern: set velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder pattern: set accumulated force
    pub fn with_force(mut self, force: Vec3) -> Self {
        self.accumulated_force = force;
        self
    }

    /// Builder pattern: set gravity opt-in
    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    /// Builder pattern: set drag coefficient
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }
}

impl RigidBodyView for BodySnapshot {
    fn mass(&self) -> f32 {
        self.mass
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn accumulated_force(&self) -> Vec3 {
        self.accumulated_force
    }

    fn use_gravity(&self) -> bool {
        self.use_gravity
    }

    fn drag(&self) -> f32 {
        self.drag
    }
}

/// Global inputs to one prediction: the world gravity and the fixed step.
///
/// # Fields
/// * `gravity` - Gravity vector in m/s², applied only to bodies that opt in
/// * `fixed_timestep` - Duration of one physics step in seconds
/// * `apply_drag` - Whether to scale the result by the drag multiplier
#[derive(Reflect, Clone, Copy, Debug, PartialEq)]
pub struct PredictionParams {
    pub gravity: Vec3,
    pub fixed_timestep: f32,
    pub apply_drag: bool,
}

impl Default for PredictionParams {
    /// Earth gravity, 50 Hz step, drag applied.
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_timestep: 0.02,
            apply_drag: true,
        }
    }
}

impl PredictionParams {
    pub fn new(gravity: Vec3, fixed_timestep: f32) -> Self {
        Self {
            gravity,
            fixed_timestep,
            apply_drag: true,
        }
    }

    /// Builder pattern: toggle drag
    pub fn with_drag(mut self, apply_drag: bool) -> Self {
        self.apply_drag = apply_drag;
        self
    }
}

/// Identifies one registered post-physics callback.
///
/// Returned by [`PostPhysicsExt::add_post_physics_callback`](crate::scheduling::PostPhysicsExt::add_post_physics_callback)
/// and accepted by the cancel methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PostPhysicsHandle(pub(crate) SystemId);

impl PostPhysicsHandle {
    /// The one-shot system backing this callback.
    pub fn system_id(&self) -> SystemId {
        self.0
    }
}

/// Why a post-physics callback stopped running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum CallbackEndReason {
    /// The host entity no longer exists.
    HostDespawned,
    /// The callback was cancelled through its handle.
    Cancelled,
}
