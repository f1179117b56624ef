// This file is part of Rocket Lander.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::config::{ConfigLoadReport, GameConfig};
use crate::core::level::loader::LevelLoaderPlugin;
use crate::core::level::registry::{CurrentLevel, LevelRegistry};
use crate::core::system::system_order::{FeedbackSet, OutcomeSet, PrePhysicsSet};
use crate::debug::DebugPlugin;
use crate::gameplay::feedback::FlightFeedbackPlugin;
use crate::gameplay::flight::FlightControllerPlugin;
use crate::gameplay::transition::LevelTransitionPlugin;
#[cfg(feature = "debug")]
use crate::interaction::inputmap::hot_reload::InputMapHotReloadPlugin;
use crate::interaction::inputmap::plugin::InputActionsPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use crate::rendering::camera::camera::CameraPlugin;

/// Expects `GameConfig` to be inserted before the plugin is added; the level loader reads it
/// during build to pick the starting level.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            warn!(target: "config", "GamePlugin: no GameConfig inserted; using defaults");
            app.insert_resource(GameConfig::default());
        }
        app.init_state::<AppState>()
            .configure_sets(Update, (PrePhysicsSet, OutcomeSet, FeedbackSet).chain())
            .add_plugins((
                CameraPlugin,
                PhysicsSetupPlugin,
                InputActionsPlugin,
                LevelLoaderPlugin,
                FlightControllerPlugin,
                LevelTransitionPlugin,
                FlightFeedbackPlugin,
                DebugPlugin,
                AutoClosePlugin,
                #[cfg(feature = "debug")]
                InputMapHotReloadPlugin,
            ))
            .add_systems(Startup, log_startup_summary);
    }
}

fn log_startup_summary(
    cfg: Res<GameConfig>,
    report: Option<Res<ConfigLoadReport>>,
    registry: Res<LevelRegistry>,
    current: Res<CurrentLevel>,
) {
    if let Some(report) = report {
        if !report.used.is_empty() {
            info!(target: "config", "Config layers: {}", report.used.join(", "));
        }
        for e in &report.errors {
            warn!(target: "config", "Config load: {e}");
        }
    }
    let r = &cfg.rocket;
    info!(
        target: "startup",
        "Rocket Lander: levels={} start={} rcs_thrust={} main_thrust={} load_delay={}s gravity={} debug={}",
        registry.len(),
        current.index,
        r.rcs_thrust,
        r.main_thrust,
        r.level_load_delay,
        cfg.physics.gravity_y,
        cfg!(feature = "debug")
    );
    for w in cfg.validate() {
        warn!(target: "config", "CONFIG WARNING: {w}");
    }
}
