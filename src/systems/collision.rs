//! Contact detection and penetration response.
//!
//! The katamari is a sphere; everything else it can touch carries a
//! [`BoxCollider`]. Each tick [`contact_detector`] tests every katamari against
//! every collider, diffs the overlapping pairs against [`ActiveContacts`] and
//! triggers:
//! - [`ContactBegin`] for pairs that started touching this tick
//! - [`ContactEnd`] for pairs that stopped touching
//!
//! Entities on a layer that skips contact logic, and bodies with collision
//! detection disabled, never produce contacts.
//!
//! [`resolve_penetration`] keeps the sphere out of terrain and out of
//! collectibles too heavy to roll up, so those can be pushed against and
//! climbed. It runs before detection and only cancels `velocity`; contacts
//! report the body's `approach_velocity`, so a head-on hit keeps its speed.
use bevy_ecs::prelude::*;
use glam::DVec3;
use rustc_hash::FxHashSet;

use crate::components::boxcollider::BoxCollider;
use crate::components::collectible::Collectible;
use crate::components::katamari::Katamari;
use crate::components::layer::CollisionLayer;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::events::collision::{ContactBegin, ContactBounds, ContactEnd};
use crate::resources::activecontacts::ActiveContacts;

/// Distance within which a sphere resting against a box still counts as
/// touching it.
pub const CONTACT_SKIN: f64 = 0.02;

/// Velocity a body arrived with this tick, before any penetration response.
fn velocity_of(body: Option<&RigidBody>) -> DVec3 {
    match body {
        Some(body) if !body.kinematic => body.approach_velocity,
        _ => DVec3::ZERO,
    }
}

fn takes_part(layer: Option<&CollisionLayer>, body: Option<&RigidBody>) -> bool {
    let layer = layer.copied().unwrap_or_default();
    if layer.skips_contact() {
        return false;
    }
    body.is_none_or(|body| body.detect_collisions)
}

pub fn contact_detector(
    mut commands: Commands,
    mut contacts: ResMut<ActiveContacts>,
    katamaris: Query<(Entity, &Katamari, &MapPosition, Option<&RigidBody>)>,
    others: Query<
        (
            Entity,
            &MapPosition,
            &BoxCollider,
            Option<&RigidBody>,
            Option<&CollisionLayer>,
        ),
        Without<Katamari>,
    >,
) {
    let mut current: FxHashSet<(Entity, Entity)> = FxHashSet::default();

    for (katamari_entity, katamari, katamari_pos, katamari_body) in katamaris.iter() {
        let reach = katamari.radius() + CONTACT_SKIN;
        for (other, position, collider, body, layer) in others.iter() {
            if !takes_part(layer, body) {
                continue;
            }
            if !collider.overlaps_sphere(position.pos, katamari_pos.pos, reach) {
                continue;
            }
            current.insert((katamari_entity, other));
            if contacts.contains(katamari_entity, other) {
                continue;
            }
            commands.trigger(ContactBegin {
                katamari: katamari_entity,
                other,
                relative_velocity: velocity_of(katamari_body) - velocity_of(body),
                bounds: ContactBounds {
                    center_y: position.pos.y + collider.offset.y,
                    half_height: collider.half_extents.y,
                },
            });
        }
    }

    for (katamari, other) in contacts.replace(current) {
        commands.trigger(ContactEnd { katamari, other });
    }
}

/// Push each katamari out of solid boxes and cancel the velocity driving it in.
///
/// Solid means terrain (anything without a [`Collectible`]) or a collectible the
/// katamari is still too light to roll up.
pub fn resolve_penetration(
    mut katamaris: Query<(&Katamari, &mut MapPosition, &mut RigidBody)>,
    solids: Query<
        (
            &MapPosition,
            &BoxCollider,
            Option<&Collectible>,
            Option<&CollisionLayer>,
            Option<&RigidBody>,
        ),
        Without<Katamari>,
    >,
) {
    for (katamari, mut position, mut body) in katamaris.iter_mut() {
        if body.kinematic {
            continue;
        }
        let radius = katamari.radius();
        for (solid_pos, collider, collectible, layer, solid_body) in solids.iter() {
            if !takes_part(layer, solid_body) {
                continue;
            }
            if collectible.is_some_and(|c| katamari.can_roll_up(c.mass)) {
                continue;
            }

            let (min, max) = collider.aabb(solid_pos.pos);
            let center = position.pos;
            let closest = center.clamp(min, max);
            let offset = center - closest;
            let distance = offset.length();
            if distance >= radius {
                continue;
            }

            let inside = distance <= f64::EPSILON && collider.contains_point(solid_pos.pos, center);
            let normal = if inside {
                // center inside the box: lift it onto the top face
                position.pos.y = max.y + radius;
                DVec3::Y
            } else {
                let normal = offset / distance;
                position.pos += normal * (radius - distance);
                normal
            };

            let into = body.velocity.dot(normal);
            if into < 0.0 {
                body.velocity -= normal * into;
            }
        }
    }
}
