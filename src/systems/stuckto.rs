//! System for handling entities stuck to other entities.
//!
//! This system updates the position of entities with the [`StuckTo`] component
//! to follow their target entity's position.
//!
//! Everything a katamari rolls up is stuck to it, so this runs right after
//! movement and before contacts are detected: absorbed objects are already in
//! place when the next contact set is computed.
//!
//! # Related
//!
//! - [`StuckTo`](crate::components::stuckto::StuckTo) – the attachment component
//! - [`crate::systems::contact`] – inserts and removes `StuckTo` on attach/detach

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::stuckto::StuckTo;

/// Updates positions of entities with `StuckTo` to follow their targets.
///
/// Followers whose target has no position (or was despawned) stay where they
/// are.
pub fn stuck_to_entity_system(
    mut followers: Query<(&StuckTo, &mut MapPosition)>,
    targets: Query<&MapPosition, Without<StuckTo>>,
) {
    for (stuck_to, mut follower_pos) in followers.iter_mut() {
        if let Ok(target_pos) = targets.get(stuck_to.target) {
            follower_pos.pos = target_pos.pos + stuck_to.offset;
        }
    }
}
