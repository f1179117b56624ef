use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::gameplay::flight::{FlightOutcome, OutcomeKind};

/// Exit deadline for unattended runs (`window.autoClose` seconds, 0 disables).
#[derive(Resource, Deref, DerefMut)]
pub struct AutoCloseTimer(pub Timer);

/// Landings and crashes seen this run; reported when the app is asked to exit.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionTally {
    pub landings: u32,
    pub crashes: u32,
}

pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionTally>()
            .add_systems(Startup, setup_autoclose)
            .add_systems(Update, (tally_outcomes, check_autoclose).chain());
    }
}

fn setup_autoclose(mut commands: Commands, cfg: Res<GameConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(target: "session", "AutoClose: will exit after {secs} seconds");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

pub fn tally_outcomes(mut outcomes: EventReader<FlightOutcome>, mut tally: ResMut<SessionTally>) {
    for outcome in outcomes.read() {
        match outcome.kind {
            OutcomeKind::Success => tally.landings += 1,
            OutcomeKind::Failure => tally.crashes += 1,
        }
    }
}

fn check_autoclose(
    time: Res<Time>,
    timer: Option<ResMut<AutoCloseTimer>>,
    tally: Res<SessionTally>,
    mut ev_exit: EventWriter<AppExit>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    if timer.tick(time.delta()).just_finished() {
        info!(
            target: "session",
            "AutoClose: timer finished (landings={} crashes={}), requesting app exit",
            tally.landings,
            tally.crashes
        );
        ev_exit.write(AppExit::Success);
    }
}
