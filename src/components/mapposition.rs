use bevy_ecs::prelude::Component;
use glam::DVec3;

/// World-space position (center) of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: DVec3,
}

impl MapPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            pos: DVec3::new(x, y, z),
        }
    }

    pub fn from_vec(pos: DVec3) -> Self {
        Self { pos }
    }
}
