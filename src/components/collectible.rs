//! Objects a katamari can roll up.
//!
//! A [`Collectible`] contributes its volume and mass to a katamari once
//! absorbed. The `collected` flag guards against absorbing the same object
//! twice; it stays set after a collectible is shed, so a lost object is never
//! rolled up again.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Collectible {
    pub volume: f64,
    pub density: f64,
    pub mass: f64,
    /// Bounding size compared against the katamari radius.
    pub size_metric: f64,
    pub collected: bool,
}

impl Collectible {
    pub fn new(volume: f64, density: f64, size_metric: f64) -> Self {
        Self {
            volume,
            density,
            mass: volume * density,
            size_metric,
            collected: false,
        }
    }

    /// An absorbed object is irregular while it sticks out further than the
    /// katamari is wide.
    pub fn is_irregular(&self, radius: f64) -> bool {
        Self::sticks_out(self.size_metric, radius)
    }

    /// Whether an object of `size_metric` sticks out of a body of `radius`.
    /// At exactly the radius it no longer does.
    pub fn sticks_out(size_metric: f64, radius: f64) -> bool {
        size_metric > radius
    }

    /// Mass of the independent body restored when the object is shed.
    pub fn body_mass(&self) -> f64 {
        self.volume * self.density
    }
}
