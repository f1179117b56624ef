use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::level::loader::LoadLevel;
use crate::core::system::system_order::OutcomeSet;
use crate::gameplay::flight::handle_rocket_collisions;

/// A level load waiting for its delay to elapse. At most one exists; the outcome that
/// scheduled it is terminal so nothing can schedule a second one for the same rocket.
#[derive(Resource, Debug, Clone)]
pub struct PendingTransition {
    pub target: usize,
    pub timer: Timer,
}

impl PendingTransition {
    pub fn new(target: usize, delay_secs: f32) -> Self {
        Self {
            target,
            timer: Timer::from_seconds(delay_secs.max(0.0), TimerMode::Once),
        }
    }
}

pub struct LevelTransitionPlugin;

impl Plugin for LevelTransitionPlugin {
    fn build(&self, app: &mut App) {
        // The frame that schedules a transition does not count toward its delay.
        app.add_systems(
            Update,
            tick_pending_transition
                .in_set(OutcomeSet)
                .before(handle_rocket_collisions)
                .run_if(in_state(AppState::Playing)),
        )
        .add_systems(OnEnter(AppState::Loading), clear_pending_transition);
    }
}

pub fn tick_pending_transition(
    mut commands: Commands,
    time: Res<Time>,
    pending: Option<ResMut<PendingTransition>>,
    mut loads: EventWriter<LoadLevel>,
) {
    let Some(mut pending) = pending else {
        return;
    };
    if !pending.timer.tick(time.delta()).finished() {
        return;
    }
    debug!(target: "level", "Transition: delay elapsed, loading level {}", pending.target);
    loads.write(LoadLevel(pending.target));
    commands.remove_resource::<PendingTransition>();
}

/// Any load (scheduled or forced from the debug keys) supersedes a pending one.
pub fn clear_pending_transition(mut commands: Commands, pending: Option<Res<PendingTransition>>) {
    if pending.is_some() {
        commands.remove_resource::<PendingTransition>();
    }
}
