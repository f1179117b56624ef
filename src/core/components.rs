use bevy::prelude::*;
use serde::Deserialize;

/// Marker for the player-controlled rocket (dynamic rigid body + collider).
#[derive(Component, Debug, Default)]
pub struct Rocket;

/// Every root entity spawned for a level carries this; the loader despawns them on (re)load.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct LevelEntity;

/// Collision category of level geometry. Colliders without a tag behave as hazards.
#[derive(Component, Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "PascalCase")]
pub enum SurfaceTag {
    /// Safe to touch (launch pad).
    Friendly,
    /// Landing target; touching it completes the level.
    Finish,
    #[default]
    Hazard,
}

impl SurfaceTag {
    pub fn display_color(self) -> Color {
        match self {
            SurfaceTag::Friendly => Color::srgb(0.25, 0.45, 0.85),
            SurfaceTag::Finish => Color::srgb(0.2, 0.8, 0.3),
            SurfaceTag::Hazard => Color::srgb(0.55, 0.5, 0.45),
        }
    }
}

/// Logical main-engine feedback flag; audio and particle systems follow it.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ThrustFeedback {
    pub active: bool,
}
