//! Registration API for post-physics callbacks.
//!
//! A callback is any Bevy system taking no input. It is registered as a
//! one-shot system and run by
//! [`run_post_physics_callbacks`](crate::systems::callbacks::run_post_physics_callbacks)
//! in `FixedLast`, i.e. once per fixed step after avian has stepped the
//! simulation and written that step's collision messages in `FixedPostUpdate`.
//!
//! The callback is bound to a host entity and stops for good once the host is
//! despawned or the handle is cancelled.

use bevy::prelude::*;

use crate::error::CallbackError;
use crate::resources::PostPhysicsCallbacks;
use crate::types::PostPhysicsHandle;

/// Post-physics callback registration on [`World`].
pub trait PostPhysicsExt {
    /// Run `callback` once per fixed step, after physics, while `host` exists.
    ///
    /// Registration takes effect from the next post-physics pass.
    ///
    /// # Example
    /// ```
    /// use bevy::prelude::*;
    /// use bevy_step_hooks::prelude::*;
    ///
    /// let mut world = World::new();
    /// let host = world.spawn_empty().id();
    /// let handle = world.add_post_physics_callback(host, || info!("physics step done"));
    /// assert!(world.resource::<PostPhysicsCallbacks>().is_registered(handle));
    /// ```
    fn add_post_physics_callback<M>(
        &mut self,
        host: Entity,
        callback: impl IntoSystem<(), (), M> + 'static,
    ) -> PostPhysicsHandle;

    /// Stop a callback permanently.
    ///
    /// # Returns
    /// The host entity the callback was bound to, or an error when the handle
    /// is unknown or already ended.
    fn cancel_post_physics_callback(
        &mut self,
        handle: PostPhysicsHandle,
    ) -> Result<Entity, CallbackError>;
}

impl PostPhysicsExt for World {
    fn add_post_physics_callback<M>(
        &mut self,
        host: Entity,
        callback: impl IntoSystem<(), (), M> + 'static,
    ) -> PostPhysicsHandle {
        let handle = PostPhysicsHandle(self.register_system(callback));
        self.get_resource_or_init::<PostPhysicsCallbacks>()
            .insert(host, handle);
        debug!("registered post-physics callback {:?} on {}", handle, host);
        handle
    }

    fn cancel_post_physics_callback(
        &mut self,
        handle: PostPhysicsHandle,
    ) -> Result<Entity, CallbackError> {
        let Some(mut registry) = self.get_resource_mut::<PostPhysicsCallbacks>() else {
            return Err(CallbackError::UnknownHandle(handle));
        };
        registry.cancel(handle)
    }
}

/// Deferred post-physics callback registration on [`Commands`].
pub trait PostPhysicsCommandsExt {
    /// Deferred form of [`PostPhysicsExt::add_post_physics_callback`].
    ///
    /// The handle is valid immediately; the registration is applied with the
    /// other queued commands.
    fn add_post_physics_callback<M>(
        &mut self,
        host: Entity,
        callback: impl IntoSystem<(), (), M> + 'static,
    ) -> PostPhysicsHandle;

    /// Deferred form of [`PostPhysicsExt::cancel_post_physics_callback`].
    ///
    /// Failures are logged rather than returned.
    fn cancel_post_physics_callback(&mut self, handle: PostPhysicsHandle);
}

impl PostPhysicsCommandsExt for Commands<'_, '_> {
    fn add_post_physics_callback<M>(
        &mut self,
        host: Entity,
        callback: impl IntoSystem<(), (), M> + 'static,
    ) -> PostPhysicsHandle {
        let handle = PostPhysicsHandle(self.register_system(callback));
        self.queue(move |world: &mut World| {
            world
                .get_resource_or_init::<PostPhysicsCallbacks>()
                .insert(host, handle);
            debug!("registered post-physics callback {:?} on {}", handle, host);
        });
        handle
    }

    fn cancel_post_physics_callback(&mut self, handle: PostPhysicsHandle) {
        self.queue(move |world: &mut World| {
            if let Err(err) = world.cancel_post_physics_callback(handle) {
                warn!("{err}");
            }
        });
    }
}
