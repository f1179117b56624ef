#[cfg(feature = "debug")]
use super::state::DebugState;
#[cfg(feature = "debug")]
use crate::core::components::{Rocket, ThrustFeedback};
#[cfg(feature = "debug")]
use crate::core::level::registry::CurrentLevel;
#[cfg(feature = "debug")]
use crate::gameplay::flight::{CollisionsEnabled, FlightState};
#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use bevy_rapier2d::prelude::Velocity;

#[cfg(feature = "debug")]
pub fn debug_logging_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    current: Res<CurrentLevel>,
    collisions: Res<CollisionsEnabled>,
    q_rocket: Query<(&FlightState, &Transform, Option<&Velocity>, &ThrustFeedback), With<Rocket>>,
) {
    state.frame_counter += 1;
    state.time_accum += time.delta_secs();
    if state.time_accum < state.log_interval {
        return;
    }
    state.time_accum = 0.0;
    let Ok((flight, tf, vel, feedback)) = q_rocket.single() else {
        info!(
            target: "debug",
            "FLIGHT frame={} t={:.3}s level={} rocket=none forced_loads={}",
            state.frame_counter,
            time.elapsed_secs(),
            current.index,
            state.forced_level_loads
        );
        return;
    };
    let v = vel.map_or(Vec2::ZERO, |v| v.linvel);
    info!(
        target: "debug",
        "FLIGHT frame={} t={:.3}s level={} state={:?} pos=({:.2},{:.2}) vel=({:.2},{:.2}) thrust={} collisions={} forced_loads={} toggles={}",
        state.frame_counter,
        time.elapsed_secs(),
        current.index,
        flight,
        tf.translation.x,
        tf.translation.y,
        v.x,
        v.y,
        feedback.active,
        collisions.0,
        state.forced_level_loads,
        state.collision_toggles
    );
}
