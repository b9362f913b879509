//! Post-physics callback runner.

use bevy::prelude::*;

use crate::events::PostPhysicsCallbackEnded;
use crate::resources::PostPhysicsCallbacks;

/// Run every live post-physics callback once.
///
/// Scheduled in `FixedLast`, so it runs exactly once per fixed step and after
/// `FixedPostUpdate`, where avian steps the simulation and writes collision
/// messages.
///
/// Callbacks registered during this pass first run on the next one. A callback
/// whose host was despawned, even by an earlier callback in the same pass, is
/// skipped and finalized. Finalizing unregisters the one-shot system and
/// writes [`PostPhysicsCallbackEnded`].
pub fn run_post_physics_callbacks(world: &mut World) {
    let pending = {
        let Some(mut registry) = world.get_resource_mut::<PostPhysicsCallbacks>() else {
            return;
        };
        registry.begin_tick();
        registry.active()
    };

    for (handle, host) in pending {
        // Cancelled by an earlier callback this pass.
        if !world.resource::<PostPhysicsCallbacks>().is_registered(handle) {
            continue;
        }

        if world.get_entity(host).is_err() {
            world
                .resource_mut::<PostPhysicsCallbacks>()
                .mark_host_despawned(handle);
            continue;
        }

        if let Err(err) = world.run_system(handle.system_id()) {
            warn!("post-physics callback {:?} on {} failed to run: {}", handle, host, err);
        }
    }

    finalize_ended_callbacks(world);
}

/// Remove ended registrations, release their systems and announce them.
fn finalize_ended_callbacks(world: &mut World) {
    let ended = world.resource_mut::<PostPhysicsCallbacks>().drain_ended();

    for (handle, host, reason) in ended {
        if let Err(err) = world.unregister_system(handle.system_id()) {
            debug!("post-physics callback {:?} was already unregistered: {}", handle, err);
        }
        debug!("post-physics callback {:?} on {} ended: {:?}", handle, host, reason);
        world.write_message(PostPhysicsCallbackEnded {
            handle,
            host,
            reason,
        });
    }
}
