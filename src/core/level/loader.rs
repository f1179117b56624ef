use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::app::state::AppState;
use crate::core::components::{LevelEntity, Rocket, ThrustFeedback};
use crate::core::config::GameConfig;
use crate::core::system::system_order::OutcomeSet;
use crate::gameplay::flight::FlightState;

use super::embedded_levels::select_level_source;
use super::layout::BlockDef;
use super::registry::{requested_level_from_env, CurrentLevel, LevelRegistry, RequestedLevel};

const BLOCK_Z: f32 = 10.0;
const ROCKET_Z: f32 = 20.0;

/// Request to load a level index immediately (reload when equal to the current index).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLevel(pub usize);

/// Plugin owning level data and the Loading -> Playing transition.
///
/// Inserts `LevelRegistry` / `CurrentLevel` during build unless the app already provides them
/// (tests install hand-built registries).
pub struct LevelLoaderPlugin;

impl Plugin for LevelLoaderPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<LevelRegistry>() {
            let source = select_level_source();
            let registry = match LevelRegistry::load_with_fallback(source.as_ref()) {
                Ok((registry, warnings)) => {
                    for w in warnings {
                        warn!(target: "level", "LevelLoader: {w}");
                    }
                    registry
                }
                Err(e) => {
                    error!(target: "level", "LevelLoader: FAILED to load level registry: {e}");
                    LevelRegistry::default()
                }
            };
            info!(
                target: "level",
                "LevelLoader: mode={:?} levels={}",
                source.mode(),
                registry.len()
            );
            app.insert_resource(registry);
        }
        if !app.world().contains_resource::<CurrentLevel>() {
            let requested = app
                .world()
                .get_resource::<RequestedLevel>()
                .and_then(|r| r.0.clone())
                .or_else(requested_level_from_env);
            let configured = app
                .world()
                .get_resource::<GameConfig>()
                .map_or(0, |c| c.start_level);
            let registry = app.world().resource::<LevelRegistry>();
            let (index, warning) = registry.resolve_start(requested.as_deref(), configured);
            if let Some(w) = warning {
                warn!(target: "level", "LevelLoader: {w}");
            }
            app.insert_resource(CurrentLevel { index });
        }
        app.add_event::<LoadLevel>()
            .add_systems(
                OnEnter(AppState::Loading),
                (despawn_level_entities, spawn_current_level).chain(),
            )
            .add_systems(
                Update,
                apply_load_requests
                    .after(OutcomeSet)
                    .run_if(in_state(AppState::Playing)),
            );
    }
}

pub fn despawn_level_entities(mut commands: Commands, q: Query<Entity, With<LevelEntity>>) {
    let mut count = 0usize;
    for e in &q {
        commands.entity(e).despawn();
        count += 1;
    }
    if count > 0 {
        debug!(target: "level", "LevelLoader: despawned {count} level entities");
    }
}

pub fn spawn_current_level(
    mut commands: Commands,
    registry: Res<LevelRegistry>,
    current: Res<CurrentLevel>,
    cfg: Res<GameConfig>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(level) = registry.get(current.index) else {
        error!(
            target: "level",
            "LevelLoader: level index {} unavailable ({} levels); staying in Loading",
            current.index,
            registry.len()
        );
        return;
    };
    for (i, block) in level.layout.blocks.iter().enumerate() {
        spawn_block(&mut commands, &level.id, i, block);
    }
    spawn_rocket(&mut commands, &cfg, level.layout.spawn.into());
    info!(
        target: "level",
        "LevelLoader: loaded level {} '{}' ({}) blocks={}",
        current.index,
        level.id,
        level.layout.name,
        level.layout.blocks.len()
    );
    next_state.set(AppState::Playing);
}

fn spawn_block(commands: &mut Commands, level_id: &str, i: usize, block: &BlockDef) {
    let half = block.half_extents();
    commands.spawn((
        Name::new(format!("{level_id}:Block{i}")),
        LevelEntity,
        block.tag,
        RigidBody::Fixed,
        Collider::cuboid(half.x, half.y),
        Sprite::from_color(block.tag.display_color(), half * 2.0),
        block.transform(BLOCK_Z),
    ));
}

/// Spawn the player's rocket at `pos` with a fresh `FlightState::Alive`.
pub fn spawn_rocket(commands: &mut Commands, cfg: &GameConfig, pos: Vec2) -> Entity {
    let r = &cfg.rocket;
    let size = Vec2::from(r.size);
    commands
        .spawn((
            Name::new("Rocket"),
            LevelEntity,
            Rocket,
            FlightState::Alive,
            ThrustFeedback::default(),
            (
                RigidBody::Dynamic,
                Collider::cuboid(size.x * 0.5, size.y * 0.5),
                ColliderMassProperties::Mass(r.mass),
                Velocity::zero(),
                ExternalForce::default(),
                Damping {
                    linear_damping: r.linear_damping,
                    angular_damping: 0.0,
                },
                ActiveEvents::COLLISION_EVENTS,
            ),
            Sprite::from_color(Color::srgb(0.85, 0.85, 0.9), size),
            Transform::from_xyz(pos.x, pos.y, ROCKET_Z),
        ))
        .id()
}

/// Last request in a frame wins; indices past the end restart at level 0.
pub fn apply_load_requests(
    mut requests: EventReader<LoadLevel>,
    registry: Res<LevelRegistry>,
    mut current: ResMut<CurrentLevel>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(LoadLevel(requested)) = requests.read().last().copied() else {
        return;
    };
    let index = if requested < registry.len() { requested } else { 0 };
    if index == current.index {
        info!(target: "level", "LevelLoader: reloading level {index}");
    } else {
        info!(target: "level", "LevelLoader: switching level {} -> {index}", current.index);
    }
    current.index = index;
    next_state.set(AppState::Loading);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::SurfaceTag;
    use crate::core::level::embedded_levels::EmbeddedLevelSource;
    use bevy::state::app::StatesPlugin;

    fn loader_app(start: usize) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        let (registry, _) = LevelRegistry::load(&EmbeddedLevelSource).unwrap();
        app.insert_resource(registry)
            .insert_resource(CurrentLevel { index: start })
            .insert_resource(GameConfig::default())
            .init_state::<AppState>()
            .add_plugins(LevelLoaderPlugin);
        app
    }

    fn rocket_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<Rocket>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn startup_spawns_level_and_enters_playing() {
        let mut app = loader_app(0);
        app.update();
        app.update();
        assert_eq!(rocket_count(&mut app), 1);
        let finish = app
            .world_mut()
            .query::<&SurfaceTag>()
            .iter(app.world())
            .filter(|t| **t == SurfaceTag::Finish)
            .count();
        assert_eq!(finish, 1);
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Playing
        );
    }

    #[test]
    fn load_request_replaces_level_entities() {
        let mut app = loader_app(0);
        app.update();
        app.update();
        let before = app
            .world_mut()
            .query_filtered::<Entity, With<LevelEntity>>()
            .iter(app.world())
            .count();
        app.world_mut().send_event(LoadLevel(1));
        for _ in 0..3 {
            app.update();
        }
        assert_eq!(app.world().resource::<CurrentLevel>().index, 1);
        assert_eq!(rocket_count(&mut app), 1, "old rocket despawned, new one spawned");
        let after = app
            .world_mut()
            .query_filtered::<Entity, With<LevelEntity>>()
            .iter(app.world())
            .count();
        let chimney = app.world().resource::<LevelRegistry>().levels[1].layout.blocks.len();
        assert_eq!(after, chimney + 1);
        assert_ne!(before, after);
    }

    #[test]
    fn out_of_range_request_restarts() {
        let mut app = loader_app(2);
        app.update();
        app.update();
        app.world_mut().send_event(LoadLevel(99));
        app.update();
        assert_eq!(app.world().resource::<CurrentLevel>().index, 0);
    }
}
