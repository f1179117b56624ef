use bevy::prelude::*;
use bevy::render::camera::ScalingMode;

use crate::core::config::GameConfig;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera);
    }
}

/// Levels are authored in meters; one meter spans `pixels_per_meter` window pixels.
pub fn camera_projection(cfg: &GameConfig) -> Projection {
    let ppm = cfg.camera.pixels_per_meter.max(f32::EPSILON);
    Projection::Orthographic(OrthographicProjection {
        scaling_mode: ScalingMode::WindowSize,
        scale: 1.0 / ppm,
        ..OrthographicProjection::default_2d()
    })
}

fn setup_camera(mut commands: Commands, cfg: Res<GameConfig>) {
    commands.spawn((Camera2d, camera_projection(&cfg)));
}
