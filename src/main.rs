use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;

use rocket_lander::core::config::ConfigLoadReport;
use rocket_lander::core::level::RequestedLevel;
use rocket_lander::{GameConfig, GamePlugin};

#[derive(Parser, Debug)]
#[command(author, version, about = "2D rocket lander", long_about = None)]
struct Cli {
    /// Start level (registry index or id). Overrides LEVEL_INDEX and `start_level`.
    #[arg(long)]
    level: Option<String>,
    /// Base config; a sibling `<name>.local.ron` is layered on top when present.
    #[arg(long, default_value = "assets/config/game.ron")]
    config: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let mut layers = vec![cli.config.clone()];
    let local = cli.config.with_extension("local.ron");
    if local.exists() {
        layers.push(local);
    }
    let (cfg, used, errors) = GameConfig::load_layered(&layers);

    App::new()
        .insert_resource(cfg.clone())
        .insert_resource(ConfigLoadReport { used, errors })
        .insert_resource(RequestedLevel(cli.level))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(GamePlugin)
        .run();
}
