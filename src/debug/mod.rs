//! Debug module: cheat keys and periodic flight logging.
//! Built only when compiled with `--features debug` (on by default).

#[cfg(feature = "debug")]
pub mod keys; // pub for testing
#[cfg(feature = "debug")]
mod logging;
#[cfg(feature = "debug")]
mod state;

#[cfg(feature = "debug")]
pub use state::DebugState;

#[cfg(feature = "debug")]
use crate::app::state::AppState;
#[cfg(feature = "debug")]
use crate::core::system::system_order::PrePhysicsSet;
#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DebugKeysSet;

#[cfg(feature = "debug")]
pub struct DebugPlugin;
#[cfg(feature = "debug")]
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        use keys::debug_key_input_system;
        use logging::debug_logging_system;

        app.init_resource::<DebugState>()
            .configure_sets(Update, DebugKeysSet.before(PrePhysicsSet))
            .add_systems(
                Update,
                debug_key_input_system
                    .in_set(DebugKeysSet)
                    .run_if(in_state(AppState::Playing)),
            )
            .add_systems(Update, debug_logging_system);
        info!(target: "debug", "Debug keys enabled");
    }
}

#[cfg(not(feature = "debug"))]
pub struct DebugPlugin;
#[cfg(not(feature = "debug"))]
impl bevy::prelude::Plugin for DebugPlugin {
    fn build(&self, _app: &mut bevy::prelude::App) {}
}
