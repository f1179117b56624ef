#[cfg(feature = "debug")]
use super::state::DebugState;
#[cfg(feature = "debug")]
use crate::core::level::loader::LoadLevel;
#[cfg(feature = "debug")]
use crate::core::level::registry::{CurrentLevel, LevelRegistry};
#[cfg(feature = "debug")]
use crate::gameplay::flight::CollisionsEnabled;
#[cfg(feature = "debug")]
use crate::interaction::inputmap::types::{actions, InputMap};
#[cfg(feature = "debug")]
use bevy::prelude::*;

/// Cheat keys. A forced level load wins over a collision toggle pressed in the same frame.
#[cfg(feature = "debug")]
pub fn debug_key_input_system(
    input_map: Option<Res<InputMap>>,
    registry: Res<LevelRegistry>,
    current: Res<CurrentLevel>,
    mut collisions: ResMut<CollisionsEnabled>,
    mut loads: EventWriter<LoadLevel>,
    mut state: ResMut<DebugState>,
) {
    let Some(input_map) = input_map else {
        return;
    };
    if input_map.just_pressed(actions::DEBUG_NEXT_LEVEL) {
        let next = registry.next_index(current.index);
        state.forced_level_loads += 1;
        info!(
            target: "debug",
            "DEBUG_NEXT_LEVEL from={} to={} frame={}",
            current.index, next, state.frame_counter
        );
        loads.write(LoadLevel(next));
        return;
    }
    if input_map.just_pressed(actions::DEBUG_TOGGLE_COLLISIONS) {
        collisions.0 = !collisions.0;
        state.collision_toggles += 1;
        info!(
            target: "debug",
            "DEBUG_COLLISIONS enabled={} frame={}",
            collisions.0, state.frame_counter
        );
    }
}
