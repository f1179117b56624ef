use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Rocket Lander".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Screen pixels per world meter (orthographic scale is its inverse).
    pub pixels_per_meter: f32,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: 28.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity_y: f32,
    pub rapier_debug: bool,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: -9.81,
            rapier_debug: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Vec2Def {
    pub x: f32,
    pub y: f32,
}
impl From<Vec2Def> for Vec2 {
    fn from(v: Vec2Def) -> Self {
        Vec2::new(v.x, v.y)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ColorDef {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}
impl From<ColorDef> for Color {
    fn from(c: ColorDef) -> Self {
        Color::srgb(c.r, c.g, c.b)
    }
}

/// Flight tuning for the player's rocket. Read once at startup.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RocketConfig {
    /// Rotation rate in degrees per second.
    pub rcs_thrust: f32,
    /// Main engine force magnitude; scaled by frame time each frame.
    pub main_thrust: f32,
    /// Seconds between a landing/crash and the level transition.
    pub level_load_delay: f32,
    pub mass: f32,
    pub size: Vec2Def,
    pub linear_damping: f32,
}
impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            rcs_thrust: 200.0,
            main_thrust: 1000.0,
            level_load_delay: 2.0,
            mass: 1.0,
            size: Vec2Def { x: 1.0, y: 3.0 },
            linear_damping: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StreamParticlesConfig {
    /// Particles per second while the emitter is active.
    pub rate: f32,
    pub speed: f32,
    pub spread_deg: f32,
    pub lifetime: f32,
    pub size: f32,
    pub color: ColorDef,
}
impl Default for StreamParticlesConfig {
    fn default() -> Self {
        Self {
            rate: 120.0,
            speed: 8.0,
            spread_deg: 18.0,
            lifetime: 0.45,
            size: 0.25,
            color: ColorDef {
                r: 1.0,
                g: 0.6,
                b: 0.15,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BurstParticlesConfig {
    pub count: usize,
    pub speed: f32,
    pub lifetime: f32,
    pub size: f32,
    pub color: ColorDef,
}
impl Default for BurstParticlesConfig {
    fn default() -> Self {
        Self {
            count: 80,
            speed: 6.0,
            lifetime: 1.5,
            size: 0.3,
            color: ColorDef {
                r: 0.3,
                g: 1.0,
                b: 0.4,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FeedbackConfig {
    pub engine_clip: String,
    pub success_clip: String,
    pub death_clip: String,
    pub engine_volume: f32,
    pub engine_particles: StreamParticlesConfig,
    pub success_particles: BurstParticlesConfig,
    pub death_particles: BurstParticlesConfig,
}
impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            engine_clip: "audio/main_engine.ogg".into(),
            success_clip: "audio/level_complete.ogg".into(),
            death_clip: "audio/death_explosion.ogg".into(),
            engine_volume: 0.6,
            engine_particles: StreamParticlesConfig::default(),
            success_particles: BurstParticlesConfig::default(),
            death_particles: BurstParticlesConfig {
                count: 120,
                speed: 10.0,
                lifetime: 1.2,
                size: 0.35,
                color: ColorDef {
                    r: 1.0,
                    g: 0.25,
                    b: 0.1,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub physics: PhysicsConfig,
    pub rocket: RocketConfig,
    pub feedback: FeedbackConfig,
    /// Level index used when neither CLI nor env request a level.
    pub start_level: usize,
}

/// Which config layers were applied at startup and what went wrong reading the others.
/// Logged once the log plugin is up, since loading happens before the app exists.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConfigLoadReport {
    pub used: Vec<String>,
    pub errors: Vec<String>,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Merge several RON files (later files override earlier keys) into one config.
    /// Returns the config, the paths actually used, and any read/parse errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let existing = bm.iter_mut().find(|(ek, _)| **ek == k).map(|(_, ev)| ev);
                        match existing {
                            Some(ev) => merge_value(ev, v),
                            None => {
                                bm.insert(k, v);
                            }
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        } else if self.window.auto_close > 0.0 && self.window.auto_close < 0.01 {
            w.push(format!(
                "window.autoClose {} very small; closes almost immediately",
                self.window.auto_close
            ));
        }
        if self.camera.pixels_per_meter <= 0.0 {
            w.push("camera.pixels_per_meter must be > 0".into());
        }
        if self.physics.gravity_y > 0.0 {
            w.push(format!(
                "physics.gravity_y is positive ({}); the rocket will fall upwards",
                self.physics.gravity_y
            ));
        }
        let r = &self.rocket;
        if r.rcs_thrust <= 0.0 {
            w.push(format!(
                "rocket.rcs_thrust {} must be > 0 or the rocket cannot turn",
                r.rcs_thrust
            ));
        }
        if r.main_thrust <= 0.0 {
            w.push(format!(
                "rocket.main_thrust {} must be > 0 or the rocket cannot lift off",
                r.main_thrust
            ));
        }
        if r.level_load_delay < 0.0 {
            w.push(format!(
                "rocket.level_load_delay {} negative -> transitions fire immediately",
                r.level_load_delay
            ));
        }
        if r.mass <= 0.0 {
            w.push("rocket.mass must be > 0".into());
        }
        if r.size.x <= 0.0 || r.size.y <= 0.0 {
            w.push("rocket.size components must be > 0".into());
        }
        // Thrust applied this frame is main_thrust * dt; compare against weight at 60 fps.
        let weight = r.mass * self.physics.gravity_y.abs();
        if r.main_thrust / 60.0 <= weight {
            w.push(format!(
                "rocket.main_thrust {} cannot overcome weight {:.2} at 60 fps",
                r.main_thrust, weight
            ));
        }
        if !(0.0..=1.0).contains(&self.feedback.engine_volume) {
            w.push(format!(
                "feedback.engine_volume {} outside 0..1",
                self.feedback.engine_volume
            ));
        }
        let ep = &self.feedback.engine_particles;
        if ep.rate < 0.0 || ep.lifetime <= 0.0 {
            w.push("feedback.engine_particles needs rate >= 0 and lifetime > 0".into());
        }
        for (label, burst) in [
            ("success_particles", &self.feedback.success_particles),
            ("death_particles", &self.feedback.death_particles),
        ] {
            if burst.lifetime <= 0.0 {
                w.push(format!("feedback.{label}.lifetime must be > 0"));
            }
            if burst.count > 5_000 {
                w.push(format!(
                    "feedback.{label}.count {} very high; performance may suffer",
                    burst.count
                ));
            }
        }
        w
    }
}
