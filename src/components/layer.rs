//! Collision layer tag.
//!
//! Contact handling branches on an entity's [`CollisionLayer`]:
//! climbable terrain can raise the katamari's contact count, absorbed
//! objects never re-enter contact logic, ignored objects are skipped by the
//! contact detector altogether.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CollisionLayer {
    #[default]
    Default,
    /// Terrain the katamari can scale within the stair-climb band.
    Climbable,
    /// Rolled up into a katamari.
    Absorbed,
    /// Non-interactive scenery.
    Ignored,
}

impl CollisionLayer {
    /// Whether contacts with this layer are dropped before any handling.
    pub fn skips_contact(self) -> bool {
        matches!(self, Self::Absorbed | Self::Ignored)
    }
}
