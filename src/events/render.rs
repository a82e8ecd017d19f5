//! Hooks into the rendering collaborator.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

/// Ask the renderer to merge the meshes of everything a katamari carries.
///
/// Fire-and-forget: the accretion logic does not wait for or read any result.
#[derive(Event, Debug, Clone, Copy)]
pub struct ConsolidateMeshes {
    pub katamari: Entity,
    pub absorbed: usize,
}

/// Default observer used when no renderer is attached.
pub fn log_consolidate_meshes(trigger: On<ConsolidateMeshes>) {
    let event = trigger.event();
    debug!(
        "Consolidate meshes requested for {:?} ({} absorbed)",
        event.katamari, event.absorbed
    );
}
