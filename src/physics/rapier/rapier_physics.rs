use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

/// Wraps Rapier setup: world units are meters, gravity comes from `physics.gravity_y`.
pub struct PhysicsSetupPlugin;

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        let debug_render = app
            .world()
            .get_resource::<GameConfig>()
            .is_some_and(|c| c.physics.rapier_debug);
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .add_systems(Update, configure_gravity);
        if debug_render {
            app.add_plugins(RapierDebugRenderPlugin::default());
        }
    }
}

/// The Rapier context (and its configuration component) is spawned by the plugin's own
/// startup system, so gravity is applied the first frame the configuration is visible.
fn configure_gravity(
    game_cfg: Res<GameConfig>,
    mut q_cfg: Query<&mut RapierConfiguration, Added<RapierConfiguration>>,
) {
    for mut rapier_cfg in &mut q_cfg {
        rapier_cfg.gravity = Vect::new(0.0, game_cfg.physics.gravity_y);
        info!(target: "physics", "Rapier gravity set to (0, {:.2})", game_cfg.physics.gravity_y);
    }
}
