//! Session setup, scene spawning and the per-tick schedule.
//!
//! A session is a [`World`] prepared by [`setup_world`] and advanced one tick
//! at a time by [`step`] with the [`Schedule`] from [`build_schedule`].
//! [`reset_game`] throws the scene away and builds a fresh one in the same
//! world.
//!
//! Observers are spawned with [`Persistent`] so they survive resets; every
//! other entity belongs to the scene.

use std::f64::consts::TAU;

use bevy_ecs::prelude::*;
use glam::DVec3;
use log::{debug, info};

use crate::components::boxcollider::BoxCollider;
use crate::components::collectible::Collectible;
use crate::components::katamari::Katamari;
use crate::components::layer::CollisionLayer;
use crate::components::mapposition::MapPosition;
use crate::components::persistent::Persistent;
use crate::events::notices::ResetGame;
use crate::events::render::log_consolidate_meshes;
use crate::resources::activecontacts::ActiveContacts;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamemodel::GameModel;
use crate::resources::input::ActiveInput;
use crate::resources::notificationbus::NotificationBus;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::{contact_detector, resolve_penetration};
use crate::systems::contact::{on_contact_begin, on_contact_end};
use crate::systems::input::katamari_input_system;
use crate::systems::movement::{free_body, ground_probe, movement};
use crate::systems::objectives::update_objectives;
use crate::systems::stuckto::stuck_to_entity_system;
use crate::systems::time::update_world_time;

/// Collectibles are scattered in a ring between these distances from the origin.
const SCATTER_MIN_DISTANCE: f64 = 2.0;
const SCATTER_MAX_DISTANCE: f64 = 20.0;
/// Edge length range of scattered collectibles; farther ones are bigger.
const COLLECTIBLE_MIN_EDGE: f64 = 0.12;
const COLLECTIBLE_MAX_EDGE: f64 = 1.4;

/// Insert resources, register observers and spawn the first scene.
///
/// The active input source starts idle; publish on the bus's
/// `input_changed` channel to replace it.
pub fn setup_world(world: &mut World, config: &GameConfig) {
    world.insert_resource(config.clone());
    world.insert_resource(WorldTime::default());
    world.insert_resource(GameModel::new(config.target_radius));
    world.insert_resource(NotificationBus::new());
    world.insert_resource(ActiveContacts::default());
    world.insert_resource(ActiveInput::default());

    world.spawn((Observer::new(on_contact_begin), Persistent));
    world.spawn((Observer::new(on_contact_end), Persistent));
    world.spawn((Observer::new(log_consolidate_meshes), Persistent));
    // Ensure the observers are registered before any system triggers events.
    world.flush();

    spawn_scene(world, config);
    connect_listeners(world);

    info!(
        "Session ready: seed {}, {} collectibles, target radius {}",
        config.seed, config.collectibles, config.target_radius
    );
}

/// Systems run every tick, in order.
pub fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            katamari_input_system,
            ground_probe,
            movement,
            resolve_penetration,
            stuck_to_entity_system,
            contact_detector,
            update_objectives,
        )
            .chain(),
    );
    update
}

/// Advance the session by one tick of `dt` seconds.
pub fn step(world: &mut World, schedule: &mut Schedule, dt: f64) {
    update_world_time(world, dt);
    schedule.run(world);
    world.clear_trackers();
}

/// Throw away the scene and start over.
///
/// Listeners hear [`ResetGame`] first; the bus is then torn down, so anything
/// that wants notices from the new session has to subscribe again.
pub fn reset_game(world: &mut World) {
    info!("Resetting game");
    {
        let mut bus = world.resource_mut::<NotificationBus>();
        bus.reset_game.publish(&ResetGame);
        bus.teardown();
    }
    world.resource_mut::<ActiveInput>().mark_disconnected();

    let doomed: Vec<Entity> = world
        .query_filtered::<Entity, Without<Persistent>>()
        .iter(world)
        .collect();
    debug!("Despawning {} scene entities", doomed.len());
    for entity in doomed {
        world.despawn(entity);
    }
    world.flush();

    let config = world.resource::<GameConfig>().clone();
    world.insert_resource(WorldTime::default());
    world.insert_resource(GameModel::new(config.target_radius));
    world.resource_mut::<ActiveContacts>().clear();

    spawn_scene(world, &config);
    connect_listeners(world);
}

/// Reconnect the input source and the built-in log listeners to the bus.
fn connect_listeners(world: &mut World) {
    world.resource_scope(|world, mut bus: Mut<NotificationBus>| {
        world.resource_mut::<ActiveInput>().connect(&mut bus);
        register_log_listeners(&mut bus);
    });
}

/// Subscribe listeners that narrate the session in the log.
pub fn register_log_listeners(bus: &mut NotificationBus) {
    bus.objectives_updated.subscribe(|model| {
        debug!(
            "Objectives: {} collected, radius {:.3} ({:.0}%)",
            model.collected,
            model.radius,
            model.progress() * 100.0
        );
    });
    bus.reset_game.subscribe(|_| info!("Game reset requested"));
    bus.input_changed
        .subscribe(|input| debug!("Input source announced: {}", input.name()));
}

/// Spawn the katamari, terrain and seeded collectibles.
pub fn spawn_scene(world: &mut World, config: &GameConfig) -> Entity {
    let katamari = Katamari::new(config.katamari_radius, config.katamari_density)
        .with_tuning(config.tuning);
    let body = free_body(katamari.mass());
    let katamari_entity = world
        .spawn((
            MapPosition::new(0.0, katamari.radius(), 0.0),
            body,
            katamari,
        ))
        .id();

    spawn_terrain(world);
    spawn_collectibles(world, config);

    katamari_entity
}

/// Spawn a terrain box standing on the ground at `footprint`.
fn spawn_box(world: &mut World, footprint: DVec3, size: DVec3, layer: CollisionLayer) -> Entity {
    let collider =
        BoxCollider::new(size.x, size.y, size.z).with_offset(DVec3::new(0.0, size.y * 0.5, 0.0));
    world
        .spawn((MapPosition::from_vec(footprint), collider, layer))
        .id()
}

/// A staircase to the east, a wall too tall to climb to the north and a
/// fence that is only scenery.
fn spawn_terrain(world: &mut World) {
    // steps
    for i in 0..5u32 {
        let height = 0.3 * f64::from(i + 1);
        let footprint = DVec3::new(6.0 + 2.0 * f64::from(i), 0.0, 0.0);
        spawn_box(world, footprint, DVec3::new(2.0, height, 4.0), CollisionLayer::Climbable);
    }

    // wall
    spawn_box(
        world,
        DVec3::new(0.0, 0.0, -14.0),
        DVec3::new(12.0, 6.0, 1.0),
        CollisionLayer::Climbable,
    );

    // fence
    spawn_box(
        world,
        DVec3::new(-14.0, 0.0, 0.0),
        DVec3::new(0.2, 1.0, 10.0),
        CollisionLayer::Ignored,
    );
}

fn spawn_collectibles(world: &mut World, config: &GameConfig) {
    let mut rng = fastrand::Rng::with_seed(config.seed);

    for _ in 0..config.collectibles {
        let angle = rng.f64() * TAU;
        let reach = rng.f64();
        let distance = SCATTER_MIN_DISTANCE + reach * (SCATTER_MAX_DISTANCE - SCATTER_MIN_DISTANCE);

        let edge = COLLECTIBLE_MIN_EDGE
            + (COLLECTIBLE_MAX_EDGE - COLLECTIBLE_MIN_EDGE) * reach * (0.5 + 0.5 * rng.f64());
        // one in five is a stick: long and thin, so it sticks out when absorbed
        let size = if rng.usize(0..5) == 0 {
            DVec3::new(edge * 2.5, edge * 0.3, edge * 0.3)
        } else {
            DVec3::new(edge, edge * (0.6 + 0.4 * rng.f64()), edge)
        };
        let density = 0.5 + rng.f64();

        spawn_collectible(
            world,
            DVec3::new(angle.cos() * distance, size.y * 0.5, angle.sin() * distance),
            size,
            density,
        );
    }

    // a boulder far too heavy to roll up early on
    spawn_collectible(world, DVec3::new(-8.0, 1.0, 8.0), DVec3::splat(2.0), 3.0);
}

/// Spawn a box-shaped collectible resting on the ground.
pub fn spawn_collectible(world: &mut World, center: DVec3, size: DVec3, density: f64) -> Entity {
    let collider = BoxCollider::new(size.x, size.y, size.z);
    let collectible = Collectible::new(collider.volume(), density, collider.longest_edge());
    world
        .spawn((
            MapPosition::from_vec(center),
            collider,
            free_body(collectible.body_mass()),
            CollisionLayer::Default,
            collectible,
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig {
            collectibles: 12,
            ..GameConfig::new()
        }
    }

    #[test]
    fn test_scene_is_seeded() {
        let positions = |seed| {
            let mut world = World::new();
            setup_world(&mut world, &GameConfig { seed, ..config() });
            let mut query = world.query::<(&Collectible, &MapPosition)>();
            let mut out: Vec<DVec3> = query.iter(&world).map(|(_, p)| p.pos).collect();
            out.sort_by(|a, b| a.x.total_cmp(&b.x));
            out
        };
        assert_eq!(positions(3), positions(3));
        assert_ne!(positions(3), positions(4));
    }

    #[test]
    fn test_setup_spawns_one_katamari_resting_on_ground() {
        let mut world = World::new();
        setup_world(&mut world, &config());
        let mut query = world.query::<(&Katamari, &MapPosition)>();
        let (katamari, position) = query.single(&world).unwrap();
        assert!((position.pos.y - katamari.radius()).abs() < 1e-12);

        let mut collectibles = world.query::<&Collectible>();
        // scattered ones plus the boulder
        assert_eq!(collectibles.iter(&world).count(), 13);
        assert!(world.resource::<ActiveInput>().is_connected());
    }

    #[test]
    fn test_idle_session_stays_put() {
        let mut world = World::new();
        setup_world(&mut world, &config());
        let mut schedule = build_schedule();
        for _ in 0..30 {
            step(&mut world, &mut schedule, 1.0 / 60.0);
        }
        let model = world.resource::<GameModel>();
        assert_eq!(model.collected, 0);
        assert_eq!(model.ticks, 30);
        assert!(!model.victory);
    }
}
