//! Katamari integration tests: absorbing, shedding, climbing, irregular
//! promotion and mesh consolidation, driven through contact events on a world.

use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::DVec3;

use klonamari::components::collectible::Collectible;
use klonamari::components::katamari::{Katamari, KatamariTuning, radius_for_volume, sphere_volume};
use klonamari::components::layer::CollisionLayer;
use klonamari::components::mapposition::MapPosition;
use klonamari::components::persistent::Persistent;
use klonamari::components::rigidbody::RigidBody;
use klonamari::components::stuckto::StuckTo;
use klonamari::events::collision::{ContactBegin, ContactBounds, ContactEnd};
use klonamari::events::render::ConsolidateMeshes;
use klonamari::resources::activecontacts::ActiveContacts;
use klonamari::resources::notificationbus::NotificationBus;
use klonamari::systems::contact::{on_contact_begin, on_contact_end};
use klonamari::systems::movement::free_body;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(NotificationBus::new());
    world.insert_resource(ActiveContacts::default());
    world.spawn((Observer::new(on_contact_begin), Persistent));
    world.spawn((Observer::new(on_contact_end), Persistent));
    world.flush();
    world
}

/// Katamari of density 1 with exactly `mass`, resting at the origin.
fn spawn_katamari(world: &mut World, mass: f64) -> Entity {
    spawn_katamari_with(world, Katamari::new(radius_for_volume(mass), 1.0))
}

fn spawn_katamari_with(world: &mut World, katamari: Katamari) -> Entity {
    let radius = katamari.radius();
    let mass = katamari.mass();
    world
        .spawn((katamari, MapPosition::new(0.0, radius, 0.0), RigidBody::dynamic(mass)))
        .id()
}

fn spawn_collectible(world: &mut World, at: DVec3, volume: f64, density: f64, size: f64) -> Entity {
    let collectible = Collectible::new(volume, density, size);
    world
        .spawn((
            collectible,
            MapPosition::from_vec(at),
            free_body(collectible.body_mass()),
            CollisionLayer::Default,
        ))
        .id()
}

fn spawn_surface(world: &mut World, layer: CollisionLayer) -> Entity {
    world.spawn((MapPosition::new(3.0, 0.0, 0.0), layer)).id()
}

fn touch(world: &mut World, katamari: Entity, other: Entity, speed: f64, top: f64) {
    world.trigger(ContactBegin {
        katamari,
        other,
        relative_velocity: DVec3::new(speed, 0.0, 0.0),
        bounds: ContactBounds {
            center_y: top * 0.5,
            half_height: top * 0.5,
        },
    });
    world.flush();
}

fn release(world: &mut World, katamari: Entity, other: Entity) {
    world.trigger(ContactEnd { katamari, other });
    world.flush();
}

fn katamari(world: &World, entity: Entity) -> &Katamari {
    world.get::<Katamari>(entity).unwrap()
}

// ==================== ABSORBING ====================

#[test]
fn light_collectible_is_rolled_up() {
    let mut world = make_world();
    let k = spawn_katamari(&mut world, 100.0);
    let c = spawn_collectible(&mut world, DVec3::new(5.0, 0.5, 0.0), 20.0, 1.0, 0.5);

    touch(&mut world, k, c, 0.0, 1.0);

    let body = katamari(&world, k);
    assert!(approx_eq(body.mass(), 120.0));
    assert!(approx_eq(body.volume(), 120.0));
    assert_eq!(body.absorbed(), &[c]);
    let radius = body.radius();
    let center = DVec3::new(0.0, radius_for_volume(100.0), 0.0);

    assert!(world.get::<Collectible>(c).unwrap().collected);
    assert_eq!(*world.get::<CollisionLayer>(c).unwrap(), CollisionLayer::Absorbed);
    let stuck = world.get::<StuckTo>(c).unwrap();
    assert_eq!(stuck.target, k);
    assert!(approx_eq(stuck.offset.length(), radius));
    // flush with the grown surface
    let pos = world.get::<MapPosition>(c).unwrap().pos;
    assert!(approx_eq(pos.distance(center), radius));

    let rb = world.get::<RigidBody>(c).unwrap();
    assert!(rb.kinematic);
    assert!(!rb.detect_collisions);
}

#[test]
fn heavy_collectible_is_never_rolled_up() {
    let mut world = make_world();
    let k = spawn_katamari(&mut world, 100.0);
    let c = spawn_collectible(&mut world, DVec3::new(5.0, 0.5, 0.0), 30.0, 1.0, 0.5);

    for speed in [0.0, 7.0, 100.0] {
        touch(&mut world, k, c, speed, 1.0);
    }

    assert!(approx_eq(katamari(&world, k).mass(), 100.0));
    assert!(katamari(&world, k).absorbed().is_empty());
    assert!(!world.get::<Collectible>(c).unwrap().collected);
    assert!(world.get::<StuckTo>(c).is_none());
}

#[test]
fn collected_object_is_not_absorbed_twice() {
    let mut world = make_world();
    let k = spawn_katamari(&mut world, 100.0);
    let c = spawn_collectible(&mut world, DVec3::new(5.0, 0.5, 0.0), 2.0, 1.0, 0.5);

    touch(&mut world, k, c, 0.0, 1.0);
    // an absorbed object never re-enters contact handling
    touch(&mut world, k, c, 0.0, 1.0);
    world.entity_mut(c).insert(CollisionLayer::Default);
    touch(&mut world, k, c, 0.0, 1.0);

    assert!(approx_eq(katamari(&world, k).mass(), 102.0));
    assert_eq!(katamari(&world, k).absorbed().len(), 1);
}

#[test]
fn every_contact_reaches_the_bus() {
    let mut world = make_world();
    let seen = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&seen);
    world
        .resource_mut::<NotificationBus>()
        .contact
        .subscribe(move |_| *sink.lock().unwrap() += 1);

    let k = spawn_katamari(&mut world, 100.0);
    let light = spawn_collectible(&mut world, DVec3::X, 2.0, 1.0, 0.5);
    let heavy = spawn_collectible(&mut world, DVec3::Z, 50.0, 1.0, 2.0);
    let wall = spawn_surface(&mut world, CollisionLayer::Default);
    let ghost = spawn_surface(&mut world, CollisionLayer::Ignored);

    touch(&mut world, k, light, 0.0, 1.0);
    touch(&mut world, k, heavy, 0.0, 1.0);
    touch(&mut world, k, wall, 0.0, 1.0);
    touch(&mut world, k, ghost, 0.0, 1.0);
    // absorbed now
    touch(&mut world, k, light, 0.0, 1.0);

    assert_eq!(*seen.lock().unwrap(), 3);
}

// ==================== SHEDDING ====================

fn katamari_with_three(world: &mut World) -> (Entity, Vec<Entity>) {
    let k = spawn_katamari(world, 100.0);
    let carried: Vec<Entity> = (0..3)
        .map(|i| spawn_collectible(world, DVec3::new(2.0, 0.5, i as f64), 1.0, 1.0, 0.3))
        .collect();
    for c in &carried {
        touch(world, k, *c, 0.0, 1.0);
    }
    assert_eq!(katamari(world, k).absorbed().len(), 3);
    (k, carried)
}

#[test]
fn hard_hit_sheds_three_in_lifo_order() {
    let mut world = make_world();
    let (k, carried) = katamari_with_three(&mut world);
    let order = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&order);
    world
        .resource_mut::<NotificationBus>()
        .detach
        .subscribe(move |notice| sink.lock().unwrap().push(notice.collectible));

    let boulder = spawn_collectible(&mut world, DVec3::new(-3.0, 1.0, 0.0), 50.0, 1.0, 3.0);
    // 15 -> 11 -> 7 -> 3
    touch(&mut world, k, boulder, 15.0, 2.0);

    assert_eq!(*order.lock().unwrap(), vec![carried[2], carried[1], carried[0]]);
    let body = katamari(&world, k);
    assert!(body.absorbed().is_empty());
    assert!(approx_eq(body.mass(), 100.0));
    assert!(approx_eq(body.volume(), 100.0));
    assert!(approx_eq(body.radius(), radius_for_volume(100.0)));

    for c in carried {
        assert!(world.get::<StuckTo>(c).is_none());
        assert_eq!(*world.get::<CollisionLayer>(c).unwrap(), CollisionLayer::Default);
        let rb = world.get::<RigidBody>(c).unwrap();
        assert!(!rb.kinematic);
        assert!(rb.detect_collisions);
        assert!(approx_eq(rb.mass, 1.0));
        // shed objects stay collected
        assert!(world.get::<Collectible>(c).unwrap().collected);
    }
}

#[test]
fn shedding_stops_below_seven() {
    let mut world = make_world();
    let (k, carried) = katamari_with_three(&mut world);
    let boulder = spawn_collectible(&mut world, DVec3::new(-3.0, 1.0, 0.0), 50.0, 1.0, 3.0);

    touch(&mut world, k, boulder, 6.99, 2.0);
    assert_eq!(katamari(&world, k).absorbed().len(), 3);

    // 11 -> 7 -> 3
    touch(&mut world, k, boulder, 11.0, 2.0);
    assert_eq!(katamari(&world, k).absorbed(), &[carried[0]]);
}

#[test]
fn shed_object_is_not_rolled_up_again() {
    let mut world = make_world();
    let (k, carried) = katamari_with_three(&mut world);
    let boulder = spawn_collectible(&mut world, DVec3::new(-3.0, 1.0, 0.0), 50.0, 1.0, 3.0);
    touch(&mut world, k, boulder, 7.0, 2.0);
    assert_eq!(katamari(&world, k).absorbed().len(), 2);

    touch(&mut world, k, carried[2], 0.0, 1.0);
    assert_eq!(katamari(&world, k).absorbed().len(), 2);
}

// ==================== CLIMBING ====================

#[test]
fn climb_contacts_pair_up() {
    let mut world = make_world();
    let k = spawn_katamari_with(&mut world, Katamari::new(1.0, 1.0));
    let radius = katamari(&world, k).radius();
    let walls: Vec<Entity> = (0..4)
        .map(|_| spawn_surface(&mut world, CollisionLayer::Climbable))
        .collect();

    for w in &walls {
        touch(&mut world, k, *w, 0.0, radius * 1.5);
    }
    assert_eq!(katamari(&world, k).contact_count(), 4);

    for w in walls.iter().rev() {
        release(&mut world, k, *w);
    }
    assert_eq!(katamari(&world, k).contact_count(), 0);

    // unmatched end is ignored
    release(&mut world, k, walls[0]);
    assert_eq!(katamari(&world, k).contact_count(), 0);
}

#[test]
fn only_climbable_terrain_inside_the_band_counts() {
    let mut world = make_world();
    let k = spawn_katamari_with(&mut world, Katamari::new(1.0, 1.0));
    let plain = spawn_surface(&mut world, CollisionLayer::Default);
    let tall = spawn_surface(&mut world, CollisionLayer::Climbable);
    let flat = spawn_surface(&mut world, CollisionLayer::Climbable);
    let pebble = spawn_collectible(&mut world, DVec3::X, 0.01, 1.0, 0.1);

    touch(&mut world, k, plain, 0.0, 1.0);
    // bottom at 0, band ends at 2.15
    touch(&mut world, k, tall, 0.0, 2.2);
    touch(&mut world, k, flat, 0.0, 0.0);
    touch(&mut world, k, pebble, 0.0, 1.0);
    assert_eq!(katamari(&world, k).contact_count(), 0);
}

// ==================== GEOMETRY ====================

#[test]
fn irregular_object_rejoins_physics_when_outgrown() {
    let mut world = make_world();
    let k = spawn_katamari_with(&mut world, Katamari::new(1.0, 1.0));
    let stick = spawn_collectible(&mut world, DVec3::new(2.0, 0.2, 0.0), 0.05, 1.0, 1.5);

    touch(&mut world, k, stick, 0.0, 1.0);
    assert!(katamari(&world, k).is_irregular(stick));
    assert!(world.get::<RigidBody>(stick).is_none());
    assert!(world.get::<StuckTo>(stick).is_some());

    // light but bulky: grows the radius past 1.5
    let needed = sphere_volume(1.5) - katamari(&world, k).volume() + 0.01;
    let pillow = spawn_collectible(&mut world, DVec3::new(-2.0, 0.5, 0.0), needed, 0.05, 1.0);
    touch(&mut world, k, pillow, 0.0, 1.0);

    let body = katamari(&world, k);
    assert!(body.radius() >= 1.5);
    assert!(!body.is_irregular(stick));
    assert!(body.is_absorbed(stick));
    let rb = world.get::<RigidBody>(stick).unwrap();
    assert!(rb.kinematic);
    assert!(!rb.detect_collisions);
}

#[test]
fn consolidation_hook_fires_at_threshold() {
    let mut world = make_world();
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&fired);
    world.add_observer(move |trigger: On<ConsolidateMeshes>| {
        sink.lock().unwrap().push(trigger.event().absorbed);
    });
    world.flush();

    let k = spawn_katamari_with(
        &mut world,
        Katamari::new(1.0, 1.0).with_tuning(KatamariTuning {
            consolidation_threshold: 3,
            ..KatamariTuning::default()
        }),
    );
    for i in 0..5 {
        let c = spawn_collectible(&mut world, DVec3::new(2.0, 0.1, i as f64), 0.01, 1.0, 0.1);
        touch(&mut world, k, c, 0.0, 1.0);
    }

    // checked before the newest object joins the stack
    assert_eq!(*fired.lock().unwrap(), vec![4, 5]);
}
