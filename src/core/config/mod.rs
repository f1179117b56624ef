pub mod config;

pub use config::{
    BurstParticlesConfig, CameraConfig, ColorDef, ConfigLoadReport, FeedbackConfig, GameConfig, PhysicsConfig,
    RocketConfig, StreamParticlesConfig, Vec2Def, WindowConfig,
};
