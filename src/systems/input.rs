//! Movement input system.
//!
//! Once per tick, before physics runs:
//! - swap in a provider announced on the bus's `input_changed` channel
//! - sample the active provider and clamp each component to `[-1, 1]`
//! - turn the vector into a force/torque request and queue it on the body
use bevy_ecs::prelude::*;
use glam::DVec3;

use crate::components::katamari::Katamari;
use crate::components::rigidbody::RigidBody;
use crate::resources::input::ActiveInput;
use crate::resources::worldtime::WorldTime;

pub fn katamari_input_system(
    mut active: ResMut<ActiveInput>,
    time: Res<WorldTime>,
    mut query: Query<(&Katamari, &mut RigidBody)>,
) {
    active.apply_pending();
    let source = active.current();

    for (katamari, mut rigidbody) in query.iter_mut() {
        let movement = source
            .movement(time.frame_count, katamari)
            .clamp(DVec3::NEG_ONE, DVec3::ONE);
        let request = katamari.motion_request(movement, time.delta);

        // absorption changes the body's mass between ticks
        rigidbody.mass = katamari.mass();
        rigidbody.apply_force(request.force);
        rigidbody.apply_torque(request.torque);
    }
}
