//! Objectives tracking.
//!
//! Mirrors the katamari's state into [`GameModel`] at the end of every tick
//! and tells listeners about it:
//! - `objectives_updated` whenever the collected count or radius changed
//! - `victory` once, the first time the radius reaches the target
use bevy_ecs::prelude::*;
use log::info;

use crate::components::katamari::Katamari;
use crate::resources::gamemodel::GameModel;
use crate::resources::notificationbus::NotificationBus;
use crate::resources::worldtime::WorldTime;

pub fn update_objectives(
    mut model: ResMut<GameModel>,
    mut bus: ResMut<NotificationBus>,
    time: Res<WorldTime>,
    query: Query<&Katamari>,
) {
    model.elapsed = time.elapsed;
    model.ticks = time.frame_count;

    let Some(katamari) = query.iter().next() else {
        return;
    };

    let collected = katamari.absorbed().len();
    let changed = collected != model.collected
        || katamari.radius() != model.radius
        || katamari.mass() != model.mass;
    if !changed {
        return;
    }

    model.collected = collected;
    model.radius = katamari.radius();
    model.mass = katamari.mass();
    bus.objectives_updated.publish(&model);

    if !model.victory && model.target_reached() {
        model.victory = true;
        info!(
            "Victory: radius {:.3} reached target {:.3} after {} ticks",
            model.radius, model.target_radius, model.ticks
        );
        bus.victory.publish(&model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn world(target_radius: f64) -> (World, Arc<Mutex<Vec<&'static str>>>) {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(GameModel::new(target_radius));

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = NotificationBus::new();
        let updated = Arc::clone(&log);
        bus.objectives_updated
            .subscribe(move |_| updated.lock().unwrap().push("updated"));
        let victory = Arc::clone(&log);
        bus.victory
            .subscribe(move |_| victory.lock().unwrap().push("victory"));
        world.insert_resource(bus);
        (world, log)
    }

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(update_objectives);
        schedule.run(world);
    }

    #[test]
    fn test_publishes_only_on_change() {
        let (mut world, log) = world(10.0);
        world.spawn(Katamari::new(1.0, 1.0));
        run(&mut world);
        run(&mut world);
        assert_eq!(*log.lock().unwrap(), vec!["updated"]);
        assert!(!world.resource::<GameModel>().victory);
    }

    #[test]
    fn test_victory_fires_once() {
        let (mut world, log) = world(0.9);
        let e = world.spawn(Katamari::new(1.0, 1.0)).id();
        let pebble = world.spawn_empty().id();
        run(&mut world);
        assert!(world.resource::<GameModel>().victory);

        world
            .get_mut::<Katamari>(e)
            .unwrap()
            .absorb(pebble, 1.0, 0.1);
        run(&mut world);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["updated", "victory", "updated"]
        );
    }

    #[test]
    fn test_no_katamari_keeps_clock() {
        let (mut world, log) = world(1.0);
        world.resource_mut::<WorldTime>().frame_count = 5;
        run(&mut world);
        assert_eq!(world.resource::<GameModel>().ticks, 5);
        assert!(log.lock().unwrap().is_empty());
    }
}
