//! The rolling, growing sphere.
//!
//! [`Katamari`] owns the body's physical state (volume, mass, radius), the
//! stack of absorbed collectibles, the subset of those that are still
//! irregular, and the contact counter used to tell rolling from climbing.
//!
//! Everything here is pure bookkeeping: methods never touch the ECS world.
//! They return what changed ([`GeometryUpdate`], [`MotionRequest`]) and the
//! observers in [`crate::systems::contact`] turn that into commands on other
//! entities.
//!
//! # Invariants
//! - `radius == cbrt(3 * volume / (4 * PI))`
//! - mass only changes through [`Katamari::absorb`] and [`Katamari::detach`]
//! - every irregular entry is also in the absorbed stack
//! - the contact count equals the number of climbable surfaces being touched

use std::f64::consts::PI;

use bevy_ecs::prelude::{Component, Entity};
use glam::DVec3;
use log::warn;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::components::collectible::Collectible;

/// Impact speed at or above which a hit on an unabsorbable object sheds.
pub const SHED_MIN_IMPACT_SPEED: f64 = 7.0;
/// Impact speed spent per shed object.
pub const SHED_SPEED_PER_OBJECT: f64 = 4.0;

/// Input components at or below this magnitude count as "no input".
const INPUT_DEADZONE: f64 = f64::EPSILON;

/// Volume of a sphere of the given radius.
pub fn sphere_volume(radius: f64) -> f64 {
    4.0 / 3.0 * PI * radius.powi(3)
}

/// Radius of a sphere of the given volume.
pub fn radius_for_volume(volume: f64) -> f64 {
    (3.0 * volume / (4.0 * PI)).cbrt()
}

/// Handling constants of a katamari.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KatamariTuning {
    /// Objects lighter than `mass * roll_up_max_ratio` get rolled up.
    pub roll_up_max_ratio: f64,
    pub torque_mult: f64,
    pub force_mult: f64,
    pub airborne_force_mult: f64,
    pub upward_force_mult: f64,
    /// Walls can be scaled up to `stair_climb_ratio * radius` above the
    /// sphere's bottom. Anything taller stops the climb.
    pub stair_climb_ratio: f64,
    /// Absorbed count at which the renderer is asked to merge meshes.
    pub consolidation_threshold: usize,
}

impl Default for KatamariTuning {
    fn default() -> Self {
        Self {
            roll_up_max_ratio: 0.25,
            torque_mult: 1500.0,
            force_mult: 500.0,
            airborne_force_mult: 250.0,
            upward_force_mult: 1000.0,
            stair_climb_ratio: 2.15,
            consolidation_threshold: 40,
        }
    }
}

/// Force and torque the physics engine should apply this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionRequest {
    pub force: DVec3,
    pub torque: DVec3,
}

/// Side effects produced by a geometry recalculation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryUpdate {
    /// Irregular objects the katamari has outgrown, in back-to-front order.
    /// Each needs a non-colliding kinematic body again.
    pub promoted: SmallVec<[Entity; 4]>,
    /// The absorbed count reached the consolidation threshold.
    pub consolidate: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct IrregularEntry {
    entity: Entity,
    size_metric: f64,
}

#[derive(Component, Clone, Debug)]
pub struct Katamari {
    pub tuning: KatamariTuning,
    /// Density of the sphere itself; only the initial mass depends on it.
    pub density: f64,
    /// Set each tick by the ground probe.
    pub grounded: bool,
    volume: f64,
    mass: f64,
    radius: f64,
    contact_count: u32,
    touching_climbables: FxHashSet<Entity>,
    absorbed: Vec<Entity>,
    irregular: Vec<IrregularEntry>,
}

impl Katamari {
    pub fn new(radius: f64, density: f64) -> Self {
        let volume = sphere_volume(radius);
        Self {
            tuning: KatamariTuning::default(),
            density,
            grounded: false,
            volume,
            mass: density * volume,
            radius: radius_for_volume(volume),
            contact_count: 0,
            touching_climbables: FxHashSet::default(),
            absorbed: Vec::new(),
            irregular: Vec::new(),
        }
    }

    pub fn with_tuning(mut self, tuning: KatamariTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn contact_count(&self) -> u32 {
        self.contact_count
    }

    /// Absorbed collectibles, oldest first.
    pub fn absorbed(&self) -> &[Entity] {
        &self.absorbed
    }

    pub fn last_absorbed(&self) -> Option<Entity> {
        self.absorbed.last().copied()
    }

    pub fn is_absorbed(&self, entity: Entity) -> bool {
        self.absorbed.contains(&entity)
    }

    pub fn is_irregular(&self, entity: Entity) -> bool {
        self.irregular.iter().any(|entry| entry.entity == entity)
    }

    pub fn irregular_count(&self) -> usize {
        self.irregular.len()
    }

    /// Whether something of `mass` is light enough to roll up.
    pub fn can_roll_up(&self, mass: f64) -> bool {
        mass < self.mass * self.tuning.roll_up_max_ratio
    }

    /// Translate a movement vector into a force/torque request.
    ///
    /// `input` components are expected in `[-1, 1]`: `x` lateral, `y` yaw,
    /// `z` forward. While pressed against a climbable surface any lateral or
    /// forward input also pushes the body upward, which is what lets it scale
    /// walls instead of stalling against them.
    pub fn motion_request(&self, input: DVec3, elapsed: f64) -> MotionRequest {
        let forward = input.z * elapsed;
        let lateral = input.x * elapsed;
        let mut upward = 0.0;

        if (forward.abs() > INPUT_DEADZONE || lateral.abs() > INPUT_DEADZONE)
            && self.contact_count > 0
        {
            upward += elapsed * self.tuning.upward_force_mult;
        }

        let torque_mult = self.tuning.torque_mult * self.mass;
        let force_mult = self.mass
            * if self.grounded {
                self.tuning.force_mult
            } else {
                self.tuning.airborne_force_mult
            };

        MotionRequest {
            torque: DVec3::new(
                forward * torque_mult,
                input.y * torque_mult * elapsed,
                -lateral * torque_mult,
            ),
            force: DVec3::new(lateral * force_mult, upward, forward * force_mult),
        }
    }

    /// Merge a collectible into the body.
    ///
    /// Totals grow first, geometry is recomputed, then the entity goes on top
    /// of the absorbed stack. Absorbing an entity twice is a no-op.
    pub fn absorb(&mut self, entity: Entity, volume: f64, mass: f64) -> GeometryUpdate {
        if self.is_absorbed(entity) {
            return GeometryUpdate::default();
        }
        self.volume += volume;
        self.mass += mass;
        let update = self.recalculate_geometry();
        self.absorbed.push(entity);
        update
    }

    /// Track an absorbed entity that still sticks out past the radius.
    pub fn mark_irregular(&mut self, entity: Entity, size_metric: f64) {
        if self.is_absorbed(entity) && !self.is_irregular(entity) {
            self.irregular.push(IrregularEntry {
                entity,
                size_metric,
            });
        }
    }

    /// Split a collectible off the body.
    ///
    /// Returns `None` (and changes nothing) when `entity` is not absorbed.
    pub fn detach(&mut self, entity: Entity, volume: f64, mass: f64) -> Option<GeometryUpdate> {
        let index = self.absorbed.iter().position(|e| *e == entity)?;
        self.absorbed.remove(index);
        self.irregular.retain(|entry| entry.entity != entity);

        self.volume -= volume;
        let update = self.recalculate_geometry();
        self.mass -= mass;
        Some(update)
    }

    /// Recompute the radius from the volume and promote irregular objects the
    /// body has outgrown.
    pub fn recalculate_geometry(&mut self) -> GeometryUpdate {
        self.radius = radius_for_volume(self.volume);

        let mut promoted = SmallVec::new();
        for i in (0..self.irregular.len()).rev() {
            if !Collectible::sticks_out(self.irregular[i].size_metric, self.radius) {
                promoted.push(self.irregular.remove(i).entity);
            }
        }

        GeometryUpdate {
            promoted,
            consolidate: self.absorbed.len() >= self.tuning.consolidation_threshold,
        }
    }

    /// Number of objects a hit at `impact_speed` knocks loose when
    /// `available` objects are absorbed.
    pub fn shed_budget(impact_speed: f64, available: usize) -> usize {
        let mut speed = impact_speed;
        let mut count = 0;
        while speed >= SHED_MIN_IMPACT_SPEED && count < available {
            count += 1;
            speed -= SHED_SPEED_PER_OBJECT;
        }
        count
    }

    /// Register contact with climbable terrain whose top sits at `contact_top`.
    ///
    /// Counts only when the top is above the sphere's bottom and inside the
    /// stair-climb band. Returns whether the contact was counted.
    pub fn begin_climb(&mut self, surface: Entity, contact_top: f64, center_y: f64) -> bool {
        let bottom = center_y - self.radius;
        let in_band = contact_top > bottom
            && contact_top < bottom + self.tuning.stair_climb_ratio * self.radius;
        if in_band && self.touching_climbables.insert(surface) {
            self.contact_count += 1;
            true
        } else {
            false
        }
    }

    /// Release a counted climbable surface. Unknown surfaces are ignored.
    pub fn end_climb(&mut self, surface: Entity) -> bool {
        if !self.touching_climbables.remove(&surface) {
            return false;
        }
        if self.contact_count == 0 {
            warn!(
                "Katamari contact count would go negative releasing {:?}; clamped to zero",
                surface
            );
        } else {
            self.contact_count -= 1;
        }
        true
    }
}
