//! Rigid body component with multiple named acceleration forces.
//!
//! The [`RigidBody`] component stands in for the physics engine's body: it
//! stores velocity, named acceleration forces, the force/torque requested this
//! tick and the mutable properties the accretion logic flips on absorbed
//! objects (mass, `kinematic`, `detect_collisions`).
//!
//! A kinematic body is skipped by the movement system; its position is
//! driven externally (e.g. by [`StuckTo`](super::stuckto::StuckTo)).

use bevy_ecs::prelude::Component;
use glam::DVec3;
use rustc_hash::FxHashMap;

/// Physics body owned by the physics collaborator.
///
/// # Fields
/// - `velocity` - Current velocity in world units per second
/// - `approach_velocity` - Velocity at the end of the last integration step,
///   before penetration response cancelled any part of it; contacts report this
/// - `angular_velocity` - Spin in radians per second, fed by requested torque
/// - `forces` - Named acceleration forces, summed every step
/// - `friction` - Velocity damping factor (0.0 = no friction, higher = more drag)
/// - `max_speed` - Optional maximum speed clamp
/// - `mass` - Mass used to turn requested force into acceleration
/// - `kinematic` - When true, movement system skips all calculations for this entity
/// - `detect_collisions` - When false, the contact detector ignores this entity
#[derive(Component, Clone, Debug)]
pub struct RigidBody {
    pub velocity: DVec3,
    pub approach_velocity: DVec3,
    pub angular_velocity: DVec3,
    pub forces: FxHashMap<String, DVec3>,
    pub friction: f64,
    pub max_speed: Option<f64>,
    pub mass: f64,
    pub kinematic: bool,
    pub detect_collisions: bool,
    pending_force: DVec3,
    pending_torque: DVec3,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Create a dynamic, colliding RigidBody of unit mass at rest.
    pub fn new() -> Self {
        Self {
            velocity: DVec3::ZERO,
            approach_velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            forces: FxHashMap::default(),
            friction: 0.0,
            max_speed: None,
            mass: 1.0,
            kinematic: false,
            detect_collisions: true,
            pending_force: DVec3::ZERO,
            pending_torque: DVec3::ZERO,
        }
    }

    /// Independent, colliding body of the given mass.
    pub fn dynamic(mass: f64) -> Self {
        Self {
            mass,
            ..Self::new()
        }
    }

    /// Non-colliding kinematic body whose position is driven by a parent.
    pub fn passenger(mass: f64) -> Self {
        Self {
            mass,
            kinematic: true,
            detect_collisions: false,
            ..Self::new()
        }
    }

    /// Set damping and speed clamp.
    ///
    /// # Arguments
    /// * `friction` - Velocity damping (0.0 = none, ~5.0 = responsive, ~10.0 = heavy)
    /// * `max_speed` - Optional velocity magnitude limit
    pub fn with_physics(mut self, friction: f64, max_speed: Option<f64>) -> Self {
        self.friction = friction;
        self.max_speed = max_speed;
        self
    }

    /// Add or update a named acceleration force.
    pub fn add_force(&mut self, name: &str, value: DVec3) {
        self.forces.insert(name.to_string(), value);
    }

    /// Sum of all named acceleration forces.
    pub fn total_acceleration(&self) -> DVec3 {
        self.forces.values().fold(DVec3::ZERO, |total, force| total + *force)
    }

    /// Queue a force for the next integration step.
    pub fn apply_force(&mut self, force: DVec3) {
        self.pending_force += force;
    }

    /// Queue a torque for the next integration step.
    pub fn apply_torque(&mut self, torque: DVec3) {
        self.pending_torque += torque;
    }

    /// Force and torque queued since the last integration step.
    pub fn pending(&self) -> (DVec3, DVec3) {
        (self.pending_force, self.pending_torque)
    }

    /// Drain the queued force and torque.
    pub fn take_pending(&mut self) -> (DVec3, DVec3) {
        let pending = (self.pending_force, self.pending_torque);
        self.pending_force = DVec3::ZERO;
        self.pending_torque = DVec3::ZERO;
        pending
    }

    /// Stop integrating this body; its position is driven externally.
    pub fn freeze(&mut self) {
        self.kinematic = true;
    }
}
