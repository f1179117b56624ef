use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::CollisionEvent;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

use rocket_lander::core::level::embedded_levels::EmbeddedLevelSource;
use rocket_lander::core::level::{CurrentLevel, LevelLoaderPlugin, LevelRegistry, LoadLevel};
use rocket_lander::core::system::system_order::{FeedbackSet, OutcomeSet, PrePhysicsSet};
use rocket_lander::gameplay::flight::FlightControllerPlugin;
use rocket_lander::gameplay::transition::{LevelTransitionPlugin, PendingTransition};
use rocket_lander::interaction::inputmap::plugin::InputActionsPlugin;
use rocket_lander::{AppState, FlightState, GameConfig, Rocket, SurfaceTag};

const FRAME_MS: u64 = 100;

fn game_app(start: usize, delay: f32) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(FRAME_MS)));
    app.insert_resource(ButtonInput::<KeyCode>::default());
    let mut cfg = GameConfig::default();
    cfg.rocket.level_load_delay = delay;
    app.insert_resource(cfg);
    let (registry, _) = LevelRegistry::load(&EmbeddedLevelSource).expect("embedded levels");
    app.insert_resource(registry);
    app.insert_resource(CurrentLevel { index: start });
    app.add_event::<CollisionEvent>();
    app.init_state::<AppState>()
        .configure_sets(Update, (PrePhysicsSet, OutcomeSet, FeedbackSet).chain())
        .add_plugins((
            InputActionsPlugin,
            LevelLoaderPlugin,
            FlightControllerPlugin,
            LevelTransitionPlugin,
        ));
    app.update();
    app.update();
    app
}

fn rocket(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<Rocket>>()
        .single(app.world())
        .expect("exactly one rocket")
}

fn block(app: &mut App, tag: SurfaceTag) -> Entity {
    app.world_mut()
        .query::<(Entity, &SurfaceTag)>()
        .iter(app.world())
        .find(|(_, t)| **t == tag)
        .map(|(e, _)| e)
        .expect("block with tag")
}

fn touch(app: &mut App, tag: SurfaceTag) -> Entity {
    let r = rocket(app);
    let other = block(app, tag);
    app.world_mut()
        .send_event(CollisionEvent::Started(r, other, CollisionEventFlags::empty()));
    app.update();
    r
}

fn run_secs(app: &mut App, secs: f32) {
    let frames = (secs * 1000.0 / FRAME_MS as f32).ceil() as usize;
    for _ in 0..frames {
        app.update();
    }
}

#[test]
fn landing_advances_after_delay() {
    let mut app = game_app(0, 1.0);
    let old = touch(&mut app, SurfaceTag::Finish);
    assert_eq!(
        *app.world().get::<FlightState>(old).unwrap(),
        FlightState::NextLevel
    );
    run_secs(&mut app, 0.5);
    assert_eq!(app.world().resource::<CurrentLevel>().index, 0, "still waiting");

    run_secs(&mut app, 1.0);
    assert_eq!(app.world().resource::<CurrentLevel>().index, 1);
    assert!(app.world().get_entity(old).is_err(), "old rocket despawned");
    let fresh = rocket(&mut app);
    assert_eq!(
        *app.world().get::<FlightState>(fresh).unwrap(),
        FlightState::Alive
    );
    assert!(!app.world().contains_resource::<PendingTransition>());
}

#[test]
fn crash_reloads_same_level() {
    let mut app = game_app(1, 0.3);
    let old = touch(&mut app, SurfaceTag::Hazard);
    assert_eq!(
        *app.world().get::<FlightState>(old).unwrap(),
        FlightState::Dying
    );
    run_secs(&mut app, 1.0);
    assert_eq!(app.world().resource::<CurrentLevel>().index, 1);
    let fresh = rocket(&mut app);
    assert_ne!(fresh, old);
    assert_eq!(
        *app.world().get::<FlightState>(fresh).unwrap(),
        FlightState::Alive
    );
}

#[test]
fn final_level_wraps_to_first() {
    let mut app = game_app(2, 0.2);
    touch(&mut app, SurfaceTag::Finish);
    run_secs(&mut app, 1.0);
    assert_eq!(app.world().resource::<CurrentLevel>().index, 0);
}

#[test]
fn friendly_pad_changes_nothing() {
    let mut app = game_app(0, 0.2);
    let r = touch(&mut app, SurfaceTag::Friendly);
    run_secs(&mut app, 1.0);
    assert_eq!(rocket(&mut app), r);
    assert_eq!(*app.world().get::<FlightState>(r).unwrap(), FlightState::Alive);
    assert_eq!(app.world().resource::<CurrentLevel>().index, 0);
}

#[test]
fn delay_starts_after_the_outcome_frame() {
    let mut app = game_app(0, 0.25);
    touch(&mut app, SurfaceTag::Hazard);
    assert!(app.world().contains_resource::<PendingTransition>());
    app.update();
    app.update();
    assert!(
        app.world().contains_resource::<PendingTransition>(),
        "0.2s elapsed of a 0.25s delay"
    );
    app.update();
    assert!(!app.world().contains_resource::<PendingTransition>());
}

#[test]
fn forced_load_cancels_pending_reload() {
    let mut app = game_app(0, 1.0);
    touch(&mut app, SurfaceTag::Hazard);
    assert_eq!(app.world().resource::<PendingTransition>().target, 0);

    app.world_mut().send_event(LoadLevel(2));
    run_secs(&mut app, 0.3);
    assert!(!app.world().contains_resource::<PendingTransition>());
    assert_eq!(app.world().resource::<CurrentLevel>().index, 2);

    run_secs(&mut app, 1.5);
    assert_eq!(
        app.world().resource::<CurrentLevel>().index,
        2,
        "the cancelled reload of level 0 never fires"
    );
    let fresh = rocket(&mut app);
    assert_eq!(*app.world().get::<FlightState>(fresh).unwrap(), FlightState::Alive);
}
