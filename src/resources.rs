//! Global resources: prediction settings and the post-physics callback registry.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::CallbackError;
use crate::types::{CallbackEndReason, PostPhysicsHandle};

/// Global configuration for velocity prediction.
///
/// # Fields
/// * `enabled` - Master switch for the prediction system
/// * `apply_drag` - Scale predictions by the body's linear drag multiplier
/// * `apply_accumulated_forces` - Hand [`AccumulatedForce`](crate::components::AccumulatedForce) to the physics engine each step (the buffer is cleared either way)
/// * `debug_draw` - Draw predicted velocities with gizmos
/// * `debug_scale` - Seconds of travel drawn per velocity arrow
///
/// # Example
/// ```
/// use bevy_step_hooks::resources::PredictionConfig;
///
/// let config = PredictionConfig {
///     apply_drag: false,
///     debug_draw: true,
///     ..Default::default()
/// };
/// assert!(config.enabled);
/// ```
#[derive(Resource, Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct PredictionConfig {
    pub enabled: bool,
    pub apply_drag: bool,
    pub apply_accumulated_forces: bool,
    pub debug_draw: bool,
    pub debug_scale: f32,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            apply_drag: true,
            apply_accumulated_forces: true,
            debug_draw: false,
            debug_scale: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Registration {
    handle: PostPhysicsHandle,
    host: Entity,
    ending: Option<CallbackEndReason>,
}

/// Registry of callbacks run once per fixed step after physics.
///
/// Entries are kept in registration order. A callback that has been
/// cancelled, or whose host is gone, stays here flagged as ending until the
/// runner finalizes it at the end of its next pass.
#[derive(Resource, Default, Debug)]
pub struct PostPhysicsCallbacks {
    registrations: Vec<Registration>,
    ticks: u64,
}

impl PostPhysicsCallbacks {
    pub(crate) fn insert(&mut self, host: Entity, handle: PostPhysicsHandle) {
        self.registrations.push(Registration {
            handle,
            host,
            ending: None,
        });
    }

    /// Flag a callback to stop. It will not run again.
    ///
    /// # Returns
    /// The host the callback was bound to
    pub(crate) fn cancel(&mut self, handle: PostPhysicsHandle) -> Result<Entity, CallbackError> {
        let registration = self
            .registrations
            .iter_mut()
            .find(|r| r.handle == handle)
            .ok_or(CallbackError::UnknownHandle(handle))?;

        if registration.ending.is_some() {
            return Err(CallbackError::AlreadyEnded {
                handle,
                host: registration.host,
            });
        }

        registration.ending = Some(CallbackEndReason::Cancelled);
        Ok(registration.host)
    }

    pub(crate) fn mark_host_despawned(&mut self, handle: PostPhysicsHandle) {
        if let Some(registration) = self
            .registrations
            .iter_mut()
            .find(|r| r.handle == handle && r.ending.is_none())
        {
            registration.ending = Some(CallbackEndReason::HostDespawned);
        }
    }

    /// Callbacks due to run this pass, in registration order.
    pub(crate) fn active(&self) -> Vec<(PostPhysicsHandle, Entity)> {
        self.registrations
            .iter()
            .filter(|r| r.ending.is_none())
            .map(|r| (r.handle, r.host))
            .collect()
    }

    /// Remove every ending registration and return it with its reason.
    pub(crate) fn drain_ended(&mut self) -> Vec<(PostPhysicsHandle, Entity, CallbackEndReason)> {
        let mut ended = Vec::new();
        self.registrations.retain(|r| match r.ending {
            Some(reason) => {
                ended.push((r.handle, r.host, reason));
                false
            }
            None => true,
        });
        ended
    }

    pub(crate) fn begin_tick(&mut self) {
        self.ticks += 1;
    }

    /// Whether the callback will run on the next fixed step.
    pub fn is_registered(&self, handle: PostPhysicsHandle) -> bool {
        self.registrations
            .iter()
            .any(|r| r.handle == handle && r.ending.is_none())
    }

    /// Host entity of a live callback.
    pub fn host_of(&self, handle: PostPhysicsHandle) -> Option<Entity> {
        self.registrations
            .iter()
            .find(|r| r.handle == handle && r.ending.is_none())
            .map(|r| r.host)
    }

    /// Number of live callbacks.
    pub fn len(&self) -> usize {
        self.registrations
            .iter()
            .filter(|r| r.ending.is_none())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of post-physics passes the runner has made.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(world: &mut World) -> (PostPhysicsHandle, PostPhysicsHandle) {
        let a = world.register_system(|| {});
        let b = world.register_system(|| {});
        (PostPhysicsHandle(a), PostPhysicsHandle(b))
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: PredictionConfig =
            serde_json::from_str(r#"{ "apply_drag": false, "debug_scale": 0.5 }"#).unwrap();

        assert_eq!(
            config,
            PredictionConfig {
                apply_drag: false,
                debug_scale: 0.5,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_config_survives_serialization() {
        let config = PredictionConfig {
            enabled: false,
            apply_accumulated_forces: false,
            debug_draw: true,
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"apply_accumulated_forces\":false"));
        assert_eq!(serde_json::from_str::<PredictionConfig>(&json).unwrap(), config);
    }

    #[test]
    fn test_cancel_flags_once() {
        let mut world = World::new();
        let host = world.spawn_empty().id();
        let (a, b) = handles(&mut world);

        let mut registry = PostPhysicsCallbacks::default();
        registry.insert(host, a);
        registry.insert(host, b);
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.cancel(a), Ok(host));
        assert!(!registry.is_registered(a));
        assert!(registry.is_registered(b));
        assert_eq!(
            registry.cancel(a),
            Err(CallbackError::AlreadyEnded { handle: a, host })
        );

        let ended = registry.drain_ended();
        assert_eq!(ended, vec![(a, host, CallbackEndReason::Cancelled)]);
        assert_eq!(registry.cancel(a), Err(CallbackError::UnknownHandle(a)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_active_keeps_registration_order() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();
        let (a, b) = handles(&mut world);

        let mut registry = PostPhysicsCallbacks::default();
        registry.insert(second, b);
        registry.insert(first, a);

        assert_eq!(registry.active(), vec![(b, second), (a, first)]);

        registry.mark_host_despawned(b);
        assert_eq!(registry.active(), vec![(a, first)]);
        assert_eq!(registry.host_of(b), None);
        assert_eq!(registry.host_of(a), Some(first));
    }
}
