//! Contact events delivered by the physics collaborator.
//!
//! The physics side triggers [`ContactBegin`] when something starts touching a
//! katamari and [`ContactEnd`] when it stops. Observers in
//! [`crate::systems::contact`] classify each contact (absorb, climb or
//! ignore). Begin/end for the same pair always come in that order, within
//! one tick, before the next input step.
use bevy_ecs::prelude::*;
use glam::DVec3;

/// Vertical extent of the touched object's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactBounds {
    pub center_y: f64,
    pub half_height: f64,
}

impl ContactBounds {
    /// World-space elevation of the top of the touched object.
    pub fn top(&self) -> f64 {
        self.center_y + self.half_height
    }
}

/// Fired when `other` starts touching `katamari`.
#[derive(Event, Debug, Clone, Copy)]
pub struct ContactBegin {
    pub katamari: Entity,
    pub other: Entity,
    /// Velocity of the katamari relative to `other`; its length is the impact speed.
    pub relative_velocity: DVec3,
    pub bounds: ContactBounds,
}

/// Fired when `other` stops touching `katamari`.
#[derive(Event, Debug, Clone, Copy)]
pub struct ContactEnd {
    pub katamari: Entity,
    pub other: Entity,
}
