//! Audio and particle presentation of the flight state.
//!
//! Everything here follows gameplay data (`ThrustFeedback`, `FlightOutcome`) and never writes
//! back into it, so the game runs identically with audio missing or under `MinimalPlugins`.
use bevy::audio::Volume;
use bevy::prelude::*;
use rand::Rng;

use crate::core::components::{LevelEntity, Rocket, ThrustFeedback};
use crate::core::config::{BurstParticlesConfig, GameConfig};
use crate::core::system::system_order::FeedbackSet;
use crate::gameplay::flight::{FlightOutcome, OutcomeKind};

const PARTICLE_Z: f32 = 15.0;

#[derive(Resource, Debug, Clone)]
pub struct FeedbackAssets {
    pub engine: Handle<AudioSource>,
    pub success: Handle<AudioSource>,
    pub death: Handle<AudioSource>,
}

/// Looping main-engine sound bound to one rocket.
#[derive(Component, Debug, Clone, Copy)]
pub struct EngineAudio {
    pub rocket: Entity,
}

/// Fractional particle budget carried between frames for the exhaust stream.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ExhaustEmitter {
    pub accumulator: f32,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Particle {
    pub velocity: Vec2,
    pub age: f32,
    pub lifetime: f32,
}

pub struct FlightFeedbackPlugin;

impl Plugin for FlightFeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_feedback_assets).add_systems(
            Update,
            (
                attach_rocket_feedback,
                sync_engine_audio,
                emit_exhaust_particles,
                react_to_outcomes,
                update_particles,
            )
                .chain()
                .in_set(FeedbackSet),
        );
    }
}

fn load_feedback_assets(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    asset_server: Option<Res<AssetServer>>,
) {
    let Some(asset_server) = asset_server else {
        info!(target: "feedback", "No AssetServer; audio feedback disabled");
        return;
    };
    let fb = &cfg.feedback;
    commands.insert_resource(FeedbackAssets {
        engine: asset_server.load(fb.engine_clip.clone()),
        success: asset_server.load(fb.success_clip.clone()),
        death: asset_server.load(fb.death_clip.clone()),
    });
    info!(
        target: "feedback",
        "Feedback clips requested: engine={} success={} death={}",
        fb.engine_clip,
        fb.success_clip,
        fb.death_clip
    );
}

pub fn attach_rocket_feedback(mut commands: Commands, q_new: Query<Entity, Added<Rocket>>) {
    for rocket in &q_new {
        commands.entity(rocket).insert(ExhaustEmitter::default());
    }
}

/// Engine loop exists exactly while thrust feedback is active. Each thrust start spawns a
/// fresh player so the clip restarts from the beginning; stopping despawns it.
pub fn sync_engine_audio(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    assets: Option<Res<FeedbackAssets>>,
    q_rockets: Query<(Entity, &ThrustFeedback), (With<Rocket>, Changed<ThrustFeedback>)>,
    q_audio: Query<(Entity, &EngineAudio)>,
) {
    for (rocket, feedback) in &q_rockets {
        for (e, engine) in &q_audio {
            if engine.rocket == rocket {
                commands.entity(e).despawn();
            }
        }
        if !feedback.active {
            continue;
        }
        let Some(assets) = assets.as_ref() else {
            continue;
        };
        commands.spawn((
            Name::new("EngineAudio"),
            LevelEntity,
            EngineAudio { rocket },
            AudioPlayer::new(assets.engine.clone()),
            PlaybackSettings::LOOP.with_volume(Volume::Linear(cfg.feedback.engine_volume)),
        ));
    }
}

pub fn emit_exhaust_particles(
    mut commands: Commands,
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut q: Query<(&ThrustFeedback, &Transform, &mut ExhaustEmitter), With<Rocket>>,
) {
    let stream = &cfg.feedback.engine_particles;
    let half_len = cfg.rocket.size.y * 0.5;
    let mut rng = rand::thread_rng();
    for (feedback, transform, mut emitter) in &mut q {
        if !feedback.active {
            emitter.accumulator = 0.0;
            continue;
        }
        emitter.accumulator += stream.rate * time.delta_secs();
        let count = emitter.accumulator.floor();
        emitter.accumulator -= count;
        let down = (transform.rotation * Vec3::NEG_Y).truncate();
        let nozzle = transform.translation.truncate() + down * half_len;
        let spread = stream.spread_deg.to_radians();
        for _ in 0..count as usize {
            let angle = if spread > 0.0 {
                rng.gen_range(-spread..spread)
            } else {
                0.0
            };
            let dir = Vec2::from_angle(angle).rotate(down);
            let speed = stream.speed * rng.gen_range(0.7..=1.0);
            spawn_particle(
                &mut commands,
                nozzle,
                dir * speed,
                stream.lifetime,
                stream.size,
                stream.color.into(),
            );
        }
    }
}

/// One-shot sound plus a particle burst at the rocket's position for each outcome.
pub fn react_to_outcomes(
    mut commands: Commands,
    mut outcomes: EventReader<FlightOutcome>,
    cfg: Res<GameConfig>,
    assets: Option<Res<FeedbackAssets>>,
) {
    for outcome in outcomes.read() {
        let (clip, burst) = match outcome.kind {
            OutcomeKind::Success => (
                assets.as_ref().map(|a| a.success.clone()),
                &cfg.feedback.success_particles,
            ),
            OutcomeKind::Failure => (
                assets.as_ref().map(|a| a.death.clone()),
                &cfg.feedback.death_particles,
            ),
        };
        if let Some(clip) = clip {
            commands.spawn((
                Name::new("OutcomeAudio"),
                AudioPlayer::new(clip),
                PlaybackSettings::DESPAWN,
            ));
        }
        spawn_burst(&mut commands, outcome.position, burst);
        debug!(
            target: "feedback",
            "Outcome {:?} burst of {} at ({:.1},{:.1})",
            outcome.kind,
            burst.count,
            outcome.position.x,
            outcome.position.y
        );
    }
}

fn spawn_burst(commands: &mut Commands, origin: Vec2, burst: &BurstParticlesConfig) {
    let mut rng = rand::thread_rng();
    for _ in 0..burst.count {
        let dir = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
        let speed = burst.speed * rng.gen_range(0.3..=1.0);
        spawn_particle(
            commands,
            origin,
            dir * speed,
            burst.lifetime,
            burst.size,
            burst.color.into(),
        );
    }
}

fn spawn_particle(
    commands: &mut Commands,
    pos: Vec2,
    velocity: Vec2,
    lifetime: f32,
    size: f32,
    color: Color,
) {
    commands.spawn((
        LevelEntity,
        Particle {
            velocity,
            age: 0.0,
            lifetime,
        },
        Sprite::from_color(color, Vec2::splat(size)),
        Transform::from_xyz(pos.x, pos.y, PARTICLE_Z),
    ));
}

/// Ballistic drift with linear fade; particles despawn at the end of their lifetime.
pub fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Particle, &mut Transform, &mut Sprite)>,
) {
    let dt = time.delta_secs();
    for (e, mut p, mut tf, mut sprite) in &mut q {
        p.age += dt;
        if p.age >= p.lifetime {
            commands.entity(e).despawn();
            continue;
        }
        tf.translation += (p.velocity * dt).extend(0.0);
        let alpha = 1.0 - p.age / p.lifetime;
        sprite.color.set_alpha(alpha);
    }
}
