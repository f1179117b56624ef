use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Action names the game reads. Bindings live in `assets/config/input.toml`.
pub mod actions {
    pub const THRUST: &str = "Thrust";
    pub const ROTATE_LEFT: &str = "RotateLeft";
    pub const ROTATE_RIGHT: &str = "RotateRight";
    pub const DEBUG_NEXT_LEVEL: &str = "DebugNextLevel";
    pub const DEBUG_TOGGLE_COLLISIONS: &str = "DebugToggleCollisions";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub u16); // internal index (array position)

#[derive(Debug, Clone)]
pub struct ActionMeta {
    pub id: ActionId,
    pub name: String,
    pub description: String,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

impl ActionState {
    /// Advance to `pressed_now`, deriving the edge flags from the previous frame.
    pub fn advance(&mut self, pressed_now: bool) {
        self.just_pressed = pressed_now && !self.pressed;
        self.just_released = !pressed_now && self.pressed;
        self.pressed = pressed_now;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawBindingToken {
    Key(KeyCode),
    MouseBtn(MouseButton),
}

/// A chord of tokens that must all be held, optionally for `hold_secs` before it counts.
#[derive(Debug, Clone)]
pub struct Binding {
    pub id: u32,
    pub action: ActionId,
    pub tokens: SmallVec<[RawBindingToken; 2]>,
    pub hold_secs: f32,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BindingRuntime {
    pub active: bool,
    pub hold_elapsed: f32,
}

#[derive(Resource, Debug, Default)]
pub struct InputMap {
    pub actions: Vec<ActionMeta>,
    pub name_to_id: HashMap<String, ActionId>,
    pub bindings: Vec<Binding>,
    pub bindings_runtime: Vec<BindingRuntime>,
    pub states: Vec<ActionState>,
}

impl InputMap {
    pub fn get_state(&self, name: &str) -> Option<&ActionState> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.states.get(id.0 as usize))
    }

    pub fn pressed(&self, name: &str) -> bool {
        self.get_state(name).is_some_and(|s| s.pressed)
    }

    pub fn just_pressed(&self, name: &str) -> bool {
        self.get_state(name).is_some_and(|s| s.just_pressed)
    }

    pub fn just_released(&self, name: &str) -> bool {
        self.get_state(name).is_some_and(|s| s.just_released)
    }

    /// Copy per-action state from `prev` for every action name both maps define, so a key
    /// held across a reload does not report a second press.
    pub fn carry_states_from(&mut self, prev: &InputMap) {
        for (name, id) in &self.name_to_id {
            if let (Some(dst), Some(src)) = (self.states.get_mut(id.0 as usize), prev.get_state(name)) {
                *dst = *src;
            }
        }
    }

    pub fn bindings_for(&self, name: &str) -> impl Iterator<Item = &Binding> {
        let id = self.name_to_id.get(name).copied();
        self.bindings.iter().filter(move |b| Some(b.action) == id)
    }
}
