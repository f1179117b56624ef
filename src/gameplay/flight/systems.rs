use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::components::{Rocket, SurfaceTag, ThrustFeedback};
use crate::core::config::GameConfig;
use crate::core::level::registry::{CurrentLevel, LevelRegistry};
use crate::gameplay::transition::PendingTransition;
use crate::interaction::inputmap::types::{actions, InputMap};

use super::state::{
    rotation_direction, rotation_this_frame, thrust_force, CollisionsEnabled, FlightOutcome,
    FlightState, OutcomeKind,
};

/// Main engine: thrust along the nose while the action is held, otherwise cut the engine.
pub fn respond_to_thrust_input(
    time: Res<Time>,
    input_map: Res<InputMap>,
    cfg: Res<GameConfig>,
    mut q: Query<
        (
            &FlightState,
            &Transform,
            &mut ExternalForce,
            &mut ThrustFeedback,
        ),
        With<Rocket>,
    >,
) {
    let thrusting = input_map.pressed(actions::THRUST);
    let dt = time.delta_secs();
    for (state, transform, mut force, mut feedback) in &mut q {
        if !state.is_alive() {
            continue;
        }
        if thrusting {
            force.force = thrust_force(transform.rotation, cfg.rocket.main_thrust, dt);
        } else {
            force.force = Vec2::ZERO;
        }
        feedback.set_if_neq(ThrustFeedback { active: thrusting });
    }
}

/// Manual rotation overrides physics spin: angular velocity is cleared every alive frame.
pub fn respond_to_rotate_input(
    time: Res<Time>,
    input_map: Res<InputMap>,
    cfg: Res<GameConfig>,
    mut q: Query<(&FlightState, &mut Transform, &mut Velocity), With<Rocket>>,
) {
    let direction = rotation_direction(
        input_map.pressed(actions::ROTATE_LEFT),
        input_map.pressed(actions::ROTATE_RIGHT),
    );
    let angle = rotation_this_frame(direction, cfg.rocket.rcs_thrust, time.delta_secs());
    for (state, mut transform, mut velocity) in &mut q {
        if !state.is_alive() {
            continue;
        }
        velocity.angvel = 0.0;
        if angle != 0.0 {
            transform.rotate_z(angle);
        }
    }
}

/// Rapier contact starts between the rocket and level geometry drive the outcome machine.
#[allow(clippy::too_many_arguments)]
pub fn handle_rocket_collisions(
    mut commands: Commands,
    mut collisions: EventReader<CollisionEvent>,
    collisions_enabled: Res<CollisionsEnabled>,
    cfg: Res<GameConfig>,
    registry: Res<LevelRegistry>,
    current: Res<CurrentLevel>,
    mut q_rocket: Query<
        (
            &mut FlightState,
            &mut ExternalForce,
            &mut ThrustFeedback,
            &Transform,
        ),
        With<Rocket>,
    >,
    q_tags: Query<&SurfaceTag>,
    mut outcomes: EventWriter<FlightOutcome>,
) {
    for ev in collisions.read() {
        let CollisionEvent::Started(e1, e2, _flags) = ev else {
            continue;
        };
        let (rocket, other) = if q_rocket.contains(*e1) {
            (*e1, *e2)
        } else if q_rocket.contains(*e2) {
            (*e2, *e1)
        } else {
            continue;
        };
        let Ok((mut state, mut force, mut feedback, transform)) = q_rocket.get_mut(rocket) else {
            continue;
        };
        let tag = q_tags.get(other).ok().copied();
        let Some(kind) = state.collision_outcome(collisions_enabled.0, tag) else {
            continue;
        };

        *state = kind.resulting_state();
        force.force = Vec2::ZERO;
        feedback.set_if_neq(ThrustFeedback { active: false });
        let target = match kind {
            OutcomeKind::Success => registry.next_index(current.index),
            OutcomeKind::Failure => current.index,
        };
        commands.insert_resource(PendingTransition::new(target, cfg.rocket.level_load_delay));
        let position = transform.translation.truncate();
        info!(
            target: "flight",
            "Rocket {:?} -> {:?} (hit {:?} tag={:?}); level {} in {:.1}s",
            rocket,
            *state,
            other,
            tag,
            target,
            cfg.rocket.level_load_delay
        );
        outcomes.write(FlightOutcome {
            rocket,
            kind,
            position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::embedded_levels::EmbeddedLevelSource;
    use crate::interaction::inputmap::parse::{parse_input_toml, DEFAULT_INPUT_TOML};
    use crate::interaction::inputmap::systems::system_evaluate_bindings;
    use bevy::time::TimeUpdateStrategy;
    use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(20);

    fn flight_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
        app.insert_resource(ButtonInput::<KeyCode>::default());
        app.insert_resource(parse_input_toml(DEFAULT_INPUT_TOML, true).input_map);
        app.insert_resource(GameConfig::default());
        let (registry, _) = LevelRegistry::load(&EmbeddedLevelSource).unwrap();
        app.insert_resource(registry);
        app.insert_resource(CurrentLevel { index: 0 });
        app.init_resource::<CollisionsEnabled>();
        app.add_event::<CollisionEvent>();
        app.add_event::<FlightOutcome>();
        app.add_systems(PreUpdate, system_evaluate_bindings);
        app.add_systems(
            Update,
            (
                respond_to_thrust_input,
                respond_to_rotate_input,
                handle_rocket_collisions,
            )
                .chain(),
        );
        app
    }

    fn spawn_rocket(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Rocket,
                FlightState::Alive,
                ThrustFeedback::default(),
                Transform::default(),
                ExternalForce::default(),
                Velocity::zero(),
            ))
            .id()
    }

    fn press(app: &mut App, key: KeyCode) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(key);
    }

    fn release(app: &mut App, key: KeyCode) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .release(key);
    }

    fn collide(app: &mut App, a: Entity, b: Entity) {
        app.world_mut()
            .send_event(CollisionEvent::Started(a, b, CollisionEventFlags::empty()));
    }

    fn outcome_count(app: &App) -> usize {
        let events = app.world().resource::<Events<FlightOutcome>>();
        events.get_cursor().read(events).count()
    }

    fn state(app: &App, e: Entity) -> FlightState {
        *app.world().get::<FlightState>(e).unwrap()
    }

    #[test]
    fn thrust_feedback_tracks_input_same_frame() {
        let mut app = flight_app();
        let rocket = spawn_rocket(&mut app);
        app.update();
        press(&mut app, KeyCode::Space);
        app.update();
        assert!(app.world().get::<ThrustFeedback>(rocket).unwrap().active);
        let force = app.world().get::<ExternalForce>(rocket).unwrap().force;
        assert!(force.y > 0.0 && force.x.abs() < 1e-4, "force {force:?}");
        let expected = 1000.0 * FRAME.as_secs_f32();
        assert!((force.y - expected).abs() < 1e-3, "force {force:?}");

        release(&mut app, KeyCode::Space);
        app.update();
        assert!(!app.world().get::<ThrustFeedback>(rocket).unwrap().active);
        assert_eq!(app.world().get::<ExternalForce>(rocket).unwrap().force, Vec2::ZERO);
    }

    #[test]
    fn rotation_sign_and_spin_reset() {
        let mut app = flight_app();
        let rocket = spawn_rocket(&mut app);
        app.world_mut().get_mut::<Velocity>(rocket).unwrap().angvel = 3.0;
        app.update();
        assert_eq!(app.world().get::<Velocity>(rocket).unwrap().angvel, 0.0);
        let untouched = app.world().get::<Transform>(rocket).unwrap().rotation;
        assert!(untouched.angle_between(Quat::IDENTITY) < 1e-6);

        press(&mut app, KeyCode::KeyA);
        app.update();
        let (_, _, z_left) = app
            .world()
            .get::<Transform>(rocket)
            .unwrap()
            .rotation
            .to_euler(EulerRot::XYZ);
        let expected = (200.0 * FRAME.as_secs_f32()).to_radians();
        assert!((z_left - expected).abs() < 1e-4, "z {z_left}");

        release(&mut app, KeyCode::KeyA);
        press(&mut app, KeyCode::KeyD);
        app.update();
        app.update();
        let (_, _, z_right) = app
            .world()
            .get::<Transform>(rocket)
            .unwrap()
            .rotation
            .to_euler(EulerRot::XYZ);
        assert!((z_right + expected).abs() < 1e-4, "z {z_right}");
    }

    #[test]
    fn finish_transitions_once_and_schedules_next_level() {
        let mut app = flight_app();
        let rocket = spawn_rocket(&mut app);
        let pad = app.world_mut().spawn(SurfaceTag::Finish).id();
        let rock = app.world_mut().spawn(SurfaceTag::Hazard).id();
        app.update();
        collide(&mut app, pad, rocket);
        collide(&mut app, rocket, rock);
        app.update();
        assert_eq!(state(&app, rocket), FlightState::NextLevel);
        assert_eq!(outcome_count(&app), 1);
        let pending = app.world().resource::<PendingTransition>();
        assert_eq!(pending.target, 1);
    }

    #[test]
    fn hazard_and_untagged_kill() {
        let mut app = flight_app();
        let rocket = spawn_rocket(&mut app);
        let wall = app.world_mut().spawn_empty().id();
        app.update();
        collide(&mut app, rocket, wall);
        app.update();
        assert_eq!(state(&app, rocket), FlightState::Dying);
        assert_eq!(app.world().resource::<PendingTransition>().target, 0);

        let pad = app.world_mut().spawn(SurfaceTag::Finish).id();
        collide(&mut app, rocket, pad);
        app.update();
        assert_eq!(state(&app, rocket), FlightState::Dying, "terminal state is sticky");
    }

    #[test]
    fn friendly_is_harmless() {
        let mut app = flight_app();
        let rocket = spawn_rocket(&mut app);
        let pad = app.world_mut().spawn(SurfaceTag::Friendly).id();
        app.update();
        collide(&mut app, rocket, pad);
        app.update();
        assert_eq!(state(&app, rocket), FlightState::Alive);
        assert!(!app.world().contains_resource::<PendingTransition>());
    }

    #[test]
    fn disabled_collisions_keep_rocket_alive() {
        let mut app = flight_app();
        let rocket = spawn_rocket(&mut app);
        let rock = app.world_mut().spawn(SurfaceTag::Hazard).id();
        app.world_mut().resource_mut::<CollisionsEnabled>().0 = false;
        app.update();
        collide(&mut app, rocket, rock);
        app.update();
        assert_eq!(state(&app, rocket), FlightState::Alive);
    }

    #[test]
    fn terminal_rocket_ignores_controls() {
        let mut app = flight_app();
        let rocket = spawn_rocket(&mut app);
        let rock = app.world_mut().spawn(SurfaceTag::Hazard).id();
        press(&mut app, KeyCode::Space);
        app.update();
        collide(&mut app, rocket, rock);
        app.update();
        assert_eq!(state(&app, rocket), FlightState::Dying);
        assert!(!app.world().get::<ThrustFeedback>(rocket).unwrap().active);
        press(&mut app, KeyCode::KeyA);
        app.update();
        assert_eq!(app.world().get::<ExternalForce>(rocket).unwrap().force, Vec2::ZERO);
        assert!(!app.world().get::<ThrustFeedback>(rocket).unwrap().active);
        let rot = app.world().get::<Transform>(rocket).unwrap().rotation;
        assert!(rot.angle_between(Quat::IDENTITY) < 1e-6);
        // toggling collisions now changes nothing observable
        app.world_mut().resource_mut::<CollisionsEnabled>().0 = false;
        app.update();
        assert_eq!(state(&app, rocket), FlightState::Dying);
    }

    #[test]
    fn last_level_success_wraps_to_first() {
        let mut app = flight_app();
        app.insert_resource(CurrentLevel { index: 2 });
        let rocket = spawn_rocket(&mut app);
        let pad = app.world_mut().spawn(SurfaceTag::Finish).id();
        app.update();
        collide(&mut app, rocket, pad);
        app.update();
        assert_eq!(app.world().resource::<PendingTransition>().target, 0);
    }
}
