pub mod state;
pub mod systems;

use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::system::system_order::{OutcomeSet, PrePhysicsSet};

pub use state::{CollisionsEnabled, FlightOutcome, FlightState, OutcomeKind};
pub use systems::{handle_rocket_collisions, respond_to_rotate_input, respond_to_thrust_input};

/// Per-frame rocket control plus collision-driven outcomes. Only runs while a level is live.
pub struct FlightControllerPlugin;

impl Plugin for FlightControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollisionsEnabled>()
            .add_event::<FlightOutcome>()
            .add_systems(
                Update,
                (respond_to_thrust_input, respond_to_rotate_input)
                    .in_set(PrePhysicsSet)
                    .run_if(in_state(AppState::Playing)),
            )
            .add_systems(
                Update,
                handle_rocket_collisions
                    .in_set(OutcomeSet)
                    .run_if(in_state(AppState::Playing)),
            );
    }
}
