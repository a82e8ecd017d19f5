//! Integrate rigid bodies and probe the ground.
//!
//! This is the headless stand-in for a physics engine: enough dynamics to roll
//! a sphere around a flat world, not a solver.
//!
//! Per tick and per non-kinematic body:
//! 1. acceleration = named forces + queued force / mass
//! 2. velocity += acceleration * dt, then friction and the speed clamp
//! 3. position += velocity * dt, clamped so the body rests on `y = 0`
//! 4. the resulting velocity is kept as `approach_velocity`, which the contact
//!    detector reports after penetration response has cancelled the inward part
//!
//! Queued force/torque is drained for every body, kinematic ones included,
//! so nothing carries over once a body is frozen.
use bevy_ecs::prelude::*;
use glam::DVec3;

use crate::components::boxcollider::BoxCollider;
use crate::components::katamari::Katamari;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

/// Name of the gravity force registered on free bodies.
pub const GRAVITY_FORCE: &str = "gravity";
pub const GRAVITY: DVec3 = DVec3::new(0.0, -9.81, 0.0);
/// Elevation of the ground plane.
pub const GROUND_LEVEL: f64 = 0.0;
/// Extra reach of the ground probe below the sphere's bottom.
pub const GROUND_PROBE_MARGIN: f64 = 0.01;
/// Floor for masses used as divisors.
const MIN_MASS: f64 = 1e-6;
/// Damping applied to angular velocity each second.
const ANGULAR_DAMPING: f64 = 2.0;

/// A dynamic, colliding body under gravity with light rolling friction.
pub fn free_body(mass: f64) -> RigidBody {
    let mut rb = RigidBody::dynamic(mass).with_physics(0.8, Some(40.0));
    rb.add_force(GRAVITY_FORCE, GRAVITY);
    rb
}

fn damp(value: DVec3, rate: f64, dt: f64) -> DVec3 {
    value * (1.0 - rate * dt).max(0.0)
}

pub fn movement(
    mut query: Query<(
        &mut MapPosition,
        &mut RigidBody,
        Option<&Katamari>,
        Option<&BoxCollider>,
    )>,
    time: Res<WorldTime>,
) {
    let dt = time.delta;
    for (mut position, mut rigidbody, katamari, collider) in query.iter_mut() {
        let (force, torque) = rigidbody.take_pending();
        if rigidbody.kinematic {
            continue;
        }

        let mass = rigidbody.mass.max(MIN_MASS);
        let acceleration = rigidbody.total_acceleration() + force / mass;
        rigidbody.velocity += acceleration * dt;
        rigidbody.angular_velocity += torque / mass * dt;

        if rigidbody.friction > 0.0 {
            let friction = rigidbody.friction;
            rigidbody.velocity = damp(rigidbody.velocity, friction, dt);
        }
        rigidbody.angular_velocity = damp(rigidbody.angular_velocity, ANGULAR_DAMPING, dt);

        if let Some(max_speed) = rigidbody.max_speed {
            rigidbody.velocity = rigidbody.velocity.clamp_length_max(max_speed);
        }

        position.pos += rigidbody.velocity * dt;

        // rest on the ground plane
        let floor = match (katamari, collider) {
            (Some(katamari), _) => GROUND_LEVEL + katamari.radius(),
            (None, Some(collider)) => GROUND_LEVEL + collider.half_extents.y - collider.offset.y,
            (None, None) => GROUND_LEVEL,
        };
        if position.pos.y < floor {
            position.pos.y = floor;
            if rigidbody.velocity.y < 0.0 {
                rigidbody.velocity.y = 0.0;
            }
        }
        rigidbody.approach_velocity = rigidbody.velocity;
    }
}

/// Set `grounded` on every katamari whose bottom is within the probe margin
/// of the ground plane.
pub fn ground_probe(mut query: Query<(&mut Katamari, &MapPosition)>) {
    for (mut katamari, position) in query.iter_mut() {
        let bottom = position.pos.y - katamari.radius();
        let grounded = bottom <= GROUND_LEVEL + GROUND_PROBE_MARGIN;
        if katamari.grounded != grounded {
            katamari.grounded = grounded;
        }
    }
}
