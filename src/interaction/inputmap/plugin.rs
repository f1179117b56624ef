use bevy::prelude::*;

use super::parse::{parse_input_toml, DEFAULT_INPUT_TOML};
use super::systems::system_evaluate_bindings;
use super::types::InputMap;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct InputActionUpdateSet;

pub struct InputActionsPlugin;

impl Plugin for InputActionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputMap>()
            .configure_sets(PreUpdate, InputActionUpdateSet)
            .add_systems(PreStartup, load_initial_input_map)
            .add_systems(
                PreUpdate,
                system_evaluate_bindings.in_set(InputActionUpdateSet),
            );
    }
}

pub fn input_config_path() -> String {
    std::env::var("INPUT_CONFIG_PATH").unwrap_or_else(|_| "assets/config/input.toml".into())
}

fn load_initial_input_map(mut commands: Commands) {
    let path = input_config_path();
    #[cfg(target_arch = "wasm32")]
    let raw: String = DEFAULT_INPUT_TOML.to_string();
    #[cfg(not(target_arch = "wasm32"))]
    let raw: String = std::fs::read_to_string(&path).unwrap_or_else(|e| {
        warn!(target: "input", "Input map {path} unreadable ({e}); using built-in bindings");
        DEFAULT_INPUT_TOML.to_string()
    });
    let parsed = parse_input_toml(&raw, cfg!(feature = "debug"));
    for e in &parsed.errors {
        error!(target: "input", "INPUT MAP ERROR: {e}");
    }
    info!(
        target: "input",
        "Input map loaded: {} actions, {} bindings",
        parsed.input_map.actions.len(),
        parsed.input_map.bindings.len()
    );
    commands.insert_resource(parsed.input_map);
}
