//! Persistent entity marker component.
//!
//! Entities with the [`Persistent`] component survive a game reset. Observers
//! are spawned with it so they keep listening after the scene is rebuilt.

use bevy_ecs::prelude::Component;

/// Tag component used to mark entities that should persist across resets.
#[derive(Component, Clone, Debug)]
pub struct Persistent;
