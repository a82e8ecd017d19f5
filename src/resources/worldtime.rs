use bevy_ecs::prelude::Resource;

/// Simulation clock. `delta` is the scaled length of the current tick.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f64,
    pub delta: f64,
    pub time_scale: f64,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}
