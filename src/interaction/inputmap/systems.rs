//! Systems for input action evaluation.
use super::types::*;
use bevy::prelude::*;

/// Evaluate every binding chord against the raw device state, then fold bindings into
/// per-action pressed / just_pressed / just_released flags.
pub fn system_evaluate_bindings(
    time: Res<Time>,
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mouse_buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut input_map: ResMut<InputMap>,
) {
    let dt = time.delta_secs();
    let map = &mut *input_map;
    if map.bindings_runtime.len() < map.bindings.len() {
        map.bindings_runtime
            .resize(map.bindings.len(), BindingRuntime::default());
    }

    let token_active = |token: &RawBindingToken| match token {
        RawBindingToken::Key(k) => keyboard.as_ref().is_some_and(|kb| kb.pressed(*k)),
        RawBindingToken::MouseBtn(b) => mouse_buttons.as_ref().is_some_and(|mb| mb.pressed(*b)),
    };

    let mut action_pressed = vec![false; map.states.len()];
    for binding in &map.bindings {
        let rt = &mut map.bindings_runtime[binding.id as usize];
        if binding.tokens.iter().all(|t| token_active(t)) {
            if rt.active {
                rt.hold_elapsed += dt;
            } else {
                rt.active = true;
                rt.hold_elapsed = 0.0;
            }
        } else {
            rt.active = false;
            rt.hold_elapsed = 0.0;
        }
        let meets_hold = binding.hold_secs <= 0.0 || rt.hold_elapsed >= binding.hold_secs;
        if rt.active && meets_hold {
            if let Some(p) = action_pressed.get_mut(binding.action.0 as usize) {
                *p = true;
            }
        }
    }

    for (state, pressed_now) in map.states.iter_mut().zip(action_pressed) {
        state.advance(pressed_now);
    }
}
