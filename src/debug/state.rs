#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
#[derive(Resource, Debug, Clone)]
pub struct DebugState {
    pub log_interval: f32,
    pub time_accum: f32,
    pub frame_counter: u64,
    pub forced_level_loads: u32,
    pub collision_toggles: u32,
}

#[cfg(feature = "debug")]
impl Default for DebugState {
    fn default() -> Self {
        Self {
            log_interval: 1.0,
            time_accum: 0.0,
            frame_counter: 0,
            forced_level_loads: 0,
            collision_toggles: 0,
        }
    }
}
