use bevy::prelude::*;

use crate::core::components::SurfaceTag;

/// Per-level rocket state. Starts `Alive`; `Dying` and `NextLevel` are terminal until the
/// level is reloaded (which respawns the rocket with a fresh state).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlightState {
    #[default]
    Alive,
    Dying,
    NextLevel,
}

/// Debug toggle: when false, collisions never change the flight state.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Deref, DerefMut)]
pub struct CollisionsEnabled(pub bool);

impl Default for CollisionsEnabled {
    fn default() -> Self {
        Self(true)
    }
}

/// Result of a collision that ended the flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    Failure,
}

impl OutcomeKind {
    pub fn resulting_state(self) -> FlightState {
        match self {
            OutcomeKind::Success => FlightState::NextLevel,
            OutcomeKind::Failure => FlightState::Dying,
        }
    }
}

/// Emitted once when the rocket lands on a Finish block or crashes.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FlightOutcome {
    pub rocket: Entity,
    pub kind: OutcomeKind,
    pub position: Vec2,
}

impl FlightState {
    pub fn is_alive(self) -> bool {
        self == FlightState::Alive
    }

    /// Outcome of touching a surface. `None` means the contact is ignored: not alive,
    /// collisions disabled, or a friendly surface. Untagged surfaces count as hazards.
    pub fn collision_outcome(
        self,
        collisions_enabled: bool,
        tag: Option<SurfaceTag>,
    ) -> Option<OutcomeKind> {
        if !self.is_alive() || !collisions_enabled {
            return None;
        }
        match tag.unwrap_or_default() {
            SurfaceTag::Friendly => None,
            SurfaceTag::Finish => Some(OutcomeKind::Success),
            SurfaceTag::Hazard => Some(OutcomeKind::Failure),
        }
    }
}

/// -1, 0 or +1 rotation direction (counter-clockwise positive). Left is checked first.
pub fn rotation_direction(left: bool, right: bool) -> f32 {
    if left {
        1.0
    } else if right {
        -1.0
    } else {
        0.0
    }
}

/// Signed rotation for this frame in radians; `rcs_thrust` is degrees per second.
pub fn rotation_this_frame(direction: f32, rcs_thrust: f32, dt: f32) -> f32 {
    direction * (rcs_thrust * dt).to_radians()
}

/// Thrust along the body's local up axis, scaled by frame time.
pub fn thrust_force(rotation: Quat, main_thrust: f32, dt: f32) -> Vec2 {
    (rotation * Vec3::Y).truncate() * (main_thrust * dt)
}
