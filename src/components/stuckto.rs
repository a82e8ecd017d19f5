//! Component for attaching an entity's position to another entity.
//!
//! When an entity has the [`StuckTo`] component, a system will update its
//! position to follow the target entity's position plus an offset.
//!
//! Rolled-up collectibles carry this component: it is how a katamari owns the
//! transform of everything it absorbed. Removing it hands the transform back.

use bevy_ecs::prelude::{Component, Entity};
use glam::DVec3;

/// Component that makes an entity follow another entity's position.
///
/// When attached to an entity, the `stuck_to_entity_system` will update
/// this entity's `MapPosition` to match the target's position plus the offset.
#[derive(Debug, Clone, Component)]
pub struct StuckTo {
    /// The entity to follow.
    pub target: Entity,
    /// Offset from the target's position.
    pub offset: DVec3,
}

impl StuckTo {
    /// Create a new StuckTo component with no offset.
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            offset: DVec3::ZERO,
        }
    }

    /// Set the offset from the target's position.
    pub fn with_offset(mut self, offset: DVec3) -> Self {
        self.offset = offset;
        self
    }
}
