//! Messages written by the post-physics callback runner.
//!
//! Note: In Bevy 0.18, buffered events use the `Message` trait instead of `Event`.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::types::{CallbackEndReason, PostPhysicsHandle};

/// Written once when a post-physics callback stops for good.
///
/// # Fields
/// * `handle` - The handle returned at registration
/// * `host` - Entity the callback was bound to
/// * `reason` - Host despawn or explicit cancellation
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PostPhysicsCallbackEnded {
    pub handle: PostPhysicsHandle,
    pub host: Entity,
    pub reason: CallbackEndReason,
}
