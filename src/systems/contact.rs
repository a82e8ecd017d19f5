//! Katamari contact handling.
//!
//! Observers reacting to contacts reported by the physics side:
//! - [`on_contact_begin`] classifies a new contact (absorb, shed, climb or
//!   ignore) and applies the result to the entities involved
//! - [`on_contact_end`] releases a climbable surface
//!
//! The bookkeeping itself lives on [`Katamari`]; this module only turns what
//! it reports into component changes and bus notices.
//!
//! # Absorbing
//!
//! A free collectible lighter than `mass * roll_up_max_ratio` is rolled up:
//! it is marked collected, tagged [`CollisionLayer::Absorbed`], stuck to the
//! katamari flush with the grown surface and announced on the `attach`
//! channel. If it still sticks out past the new radius it loses its
//! [`RigidBody`] (irregular); otherwise its body turns kinematic and stops
//! colliding.
//!
//! # Shedding
//!
//! A hit against a collectible too heavy to roll up knocks loose the most
//! recently absorbed objects, one per [`SHED_SPEED_PER_OBJECT`] of impact
//! speed above [`SHED_MIN_IMPACT_SPEED`].
//!
//! [`SHED_SPEED_PER_OBJECT`]: crate::components::katamari::SHED_SPEED_PER_OBJECT
//! [`SHED_MIN_IMPACT_SPEED`]: crate::components::katamari::SHED_MIN_IMPACT_SPEED

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::DVec3;
use log::{debug, warn};

use crate::components::collectible::Collectible;
use crate::components::katamari::{GeometryUpdate, Katamari};
use crate::components::layer::CollisionLayer;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::stuckto::StuckTo;
use crate::events::collision::{ContactBegin, ContactEnd};
use crate::events::notices::CollectibleNotice;
use crate::events::render::ConsolidateMeshes;
use crate::resources::notificationbus::NotificationBus;
use crate::systems::movement::free_body;

type KatamariQuery<'w, 's> = Query<'w, 's, (&'static mut Katamari, &'static MapPosition), Without<Collectible>>;
type CollectibleQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Collectible,
        &'static mut MapPosition,
        Option<&'static mut RigidBody>,
    ),
    Without<Katamari>,
>;

pub fn on_contact_begin(
    trigger: On<ContactBegin>,
    mut commands: Commands,
    mut bus: ResMut<NotificationBus>,
    mut katamaris: KatamariQuery,
    mut collectibles: CollectibleQuery,
    layers: Query<&CollisionLayer>,
) {
    let contact = *trigger.event();

    let layer = layers.get(contact.other).copied().unwrap_or_default();
    if layer.skips_contact() {
        return;
    }
    let Ok((mut katamari, katamari_pos)) = katamaris.get_mut(contact.katamari) else {
        return;
    };
    let center = katamari_pos.pos;

    bus.contact.publish(&contact);

    let hit = collectibles.get(contact.other).ok().map(|(c, _, _)| *c);
    if let Some(hit) = hit {
        if katamari.can_roll_up(hit.mass) {
            if !hit.collected {
                absorb_collectible(
                    &mut commands,
                    &mut bus,
                    contact.katamari,
                    &mut katamari,
                    center,
                    contact.other,
                    &mut collectibles,
                );
            }
        } else {
            shed(
                &mut commands,
                &mut bus,
                contact.katamari,
                &mut katamari,
                contact.relative_velocity.length(),
                &mut collectibles,
            );
        }
        return;
    }

    if layer == CollisionLayer::Climbable
        && katamari.begin_climb(contact.other, contact.bounds.top(), center.y)
    {
        debug!(
            "Katamari {:?} climbing {:?} (contacts: {})",
            contact.katamari,
            contact.other,
            katamari.contact_count()
        );
    }
}

pub fn on_contact_end(trigger: On<ContactEnd>, mut katamaris: Query<&mut Katamari>) {
    let contact = trigger.event();
    if let Ok(mut katamari) = katamaris.get_mut(contact.katamari) {
        if katamari.end_climb(contact.other) {
            debug!(
                "Katamari {:?} released {:?} (contacts: {})",
                contact.katamari,
                contact.other,
                katamari.contact_count()
            );
        }
    }
}

fn absorb_collectible(
    commands: &mut Commands,
    bus: &mut NotificationBus,
    katamari_entity: Entity,
    katamari: &mut Katamari,
    center: DVec3,
    entity: Entity,
    collectibles: &mut CollectibleQuery,
) {
    let Ok((mut collectible, mut position, body)) = collectibles.get_mut(entity) else {
        return;
    };

    collectible.collected = true;
    let update = katamari.absorb(entity, collectible.volume, collectible.mass);

    // sit flush against the grown surface, along the old center-to-object line
    let direction = (position.pos - center).try_normalize().unwrap_or(DVec3::Y);
    let offset = direction * katamari.radius();
    position.pos = center + offset;

    commands.entity(entity).insert((
        StuckTo::new(katamari_entity).with_offset(offset),
        CollisionLayer::Absorbed,
    ));

    bus.attach.publish(&CollectibleNotice {
        katamari: katamari_entity,
        collectible: entity,
        volume: collectible.volume,
        mass: collectible.mass,
        radius: katamari.radius(),
    });

    if collectible.is_irregular(katamari.radius()) {
        commands.entity(entity).remove::<RigidBody>();
        katamari.mark_irregular(entity, collectible.size_metric);
        debug!(
            "Katamari {:?} absorbed irregular {:?} (size {:.3} > radius {:.3})",
            katamari_entity,
            entity,
            collectible.size_metric,
            katamari.radius()
        );
    } else {
        match body {
            Some(mut body) => {
                body.freeze();
                body.detect_collisions = false;
                body.velocity = DVec3::ZERO;
            }
            None => {
                commands
                    .entity(entity)
                    .insert(RigidBody::passenger(collectible.body_mass()));
            }
        }
        debug!(
            "Katamari {:?} absorbed {:?} (radius {:.3}, mass {:.3})",
            katamari_entity,
            entity,
            katamari.radius(),
            katamari.mass()
        );
    }

    apply_geometry_update(commands, katamari_entity, katamari, update, collectibles);
}

fn shed(
    commands: &mut Commands,
    bus: &mut NotificationBus,
    katamari_entity: Entity,
    katamari: &mut Katamari,
    impact_speed: f64,
    collectibles: &mut CollectibleQuery,
) {
    let count = Katamari::shed_budget(impact_speed, katamari.absorbed().len());
    if count > 0 {
        debug!(
            "Katamari {:?} hit at {:.2}, shedding {} object(s)",
            katamari_entity, impact_speed, count
        );
    }
    for _ in 0..count {
        let Some(top) = katamari.last_absorbed() else {
            break;
        };
        detach_collectible(commands, bus, katamari_entity, katamari, top, collectibles);
    }
}

/// Split `entity` off the katamari and give it its own physics back.
///
/// Does nothing when `entity` is not absorbed.
fn detach_collectible(
    commands: &mut Commands,
    bus: &mut NotificationBus,
    katamari_entity: Entity,
    katamari: &mut Katamari,
    entity: Entity,
    collectibles: &mut CollectibleQuery,
) {
    let Some(data) = collectibles.get(entity).ok().map(|(c, _, _)| *c) else {
        if katamari.is_absorbed(entity) {
            warn!(
                "Absorbed entity {:?} no longer exists; dropping it from katamari {:?}",
                entity, katamari_entity
            );
            katamari.detach(entity, 0.0, 0.0);
        }
        return;
    };

    let Some(update) = katamari.detach(entity, data.volume, data.mass) else {
        return;
    };

    commands
        .entity(entity)
        .remove::<StuckTo>()
        .insert((free_body(data.body_mass()), CollisionLayer::Default));

    bus.detach.publish(&CollectibleNotice {
        katamari: katamari_entity,
        collectible: entity,
        volume: data.volume,
        mass: data.mass,
        radius: katamari.radius(),
    });
    debug!(
        "Katamari {:?} lost {:?} (radius {:.3}, mass {:.3})",
        katamari_entity,
        entity,
        katamari.radius(),
        katamari.mass()
    );

    apply_geometry_update(commands, katamari_entity, katamari, update, collectibles);
}

/// Re-add kinematic bodies to promoted objects and fire the consolidation hook.
fn apply_geometry_update(
    commands: &mut Commands,
    katamari_entity: Entity,
    katamari: &Katamari,
    update: GeometryUpdate,
    collectibles: &CollectibleQuery,
) {
    for promoted in update.promoted {
        let mass = collectibles
            .get(promoted)
            .map(|(c, _, _)| c.body_mass())
            .unwrap_or(1.0);
        commands.entity(promoted).insert(RigidBody::passenger(mass));
        debug!(
            "Katamari {:?} outgrew {:?}; it rides as a regular object now",
            katamari_entity, promoted
        );
    }
    if update.consolidate {
        commands.trigger(ConsolidateMeshes {
            katamari: katamari_entity,
            absorbed: katamari.absorbed().len(),
        });
    }
}
