use super::types::*;
use bevy::prelude::*;
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Bindings shipped with the game; used when the config file cannot be read.
pub const DEFAULT_INPUT_TOML: &str = include_str!("../../../assets/config/input.toml");

#[derive(Debug, Default)]
pub struct ParsedInputConfig {
    pub input_map: InputMap,
    pub errors: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ActionDecl {
    description: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct DebugSection {
    bindings: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, serde::Deserialize)]
struct RootToml {
    actions: Option<BTreeMap<String, ActionDecl>>,
    bindings: Option<BTreeMap<String, Vec<String>>>,
    debug: Option<DebugSection>,
}

/// Parse an action map. `debug_layer` merges `[debug.bindings]` on top of `[bindings]`.
/// Problems are collected rather than aborting so one bad binding does not drop the rest.
pub fn parse_input_toml(raw: &str, debug_layer: bool) -> ParsedInputConfig {
    let mut result = ParsedInputConfig::default();
    let root: RootToml = match toml::from_str(raw) {
        Ok(r) => r,
        Err(e) => {
            result.errors.push(format!("Top-level parse: {e}"));
            return result;
        }
    };

    let mut actions: Vec<ActionMeta> = Vec::new();
    let mut name_to_id = HashMap::new();
    for (name, decl) in root.actions.unwrap_or_default() {
        if !validate_action_name(&name) {
            result
                .errors
                .push(format!("Invalid action name '{name}': must be PascalCase"));
            continue;
        }
        let id = ActionId(actions.len() as u16);
        actions.push(ActionMeta {
            id,
            name: name.clone(),
            description: decl.description.unwrap_or_default(),
        });
        name_to_id.insert(name, id);
    }

    let mut input_map = InputMap {
        states: vec![ActionState::default(); actions.len()],
        actions,
        name_to_id,
        ..Default::default()
    };

    let mut all_bindings: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (k, v) in root.bindings.unwrap_or_default() {
        all_bindings.entry(k).or_default().extend(v);
    }
    if debug_layer {
        for (k, v) in root.debug.and_then(|d| d.bindings).unwrap_or_default() {
            all_bindings.entry(k).or_default().extend(v);
        }
    }

    for (action_name, list) in all_bindings {
        let Some(action) = input_map.name_to_id.get(&action_name).copied() else {
            result
                .errors
                .push(format!("Binding references unknown action '{action_name}'"));
            continue;
        };
        for spec in &list {
            match parse_binding(spec) {
                Ok((tokens, hold_secs)) => {
                    let id = input_map.bindings.len() as u32;
                    input_map.bindings.push(Binding {
                        id,
                        action,
                        tokens,
                        hold_secs,
                    });
                }
                Err(err) => result
                    .errors
                    .push(format!("[binding {action_name} '{spec}'] {err}")),
            }
        }
    }
    input_map.bindings_runtime = vec![BindingRuntime::default(); input_map.bindings.len()];
    result.input_map = input_map;
    result
}

fn validate_action_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

fn parse_binding(spec: &str) -> Result<(SmallVec<[RawBindingToken; 2]>, f32), String> {
    let mut tokens: SmallVec<[RawBindingToken; 2]> = SmallVec::new();
    let mut hold: f32 = 0.0;
    let mut seen: HashSet<RawBindingToken> = HashSet::new();
    for part in spec.split('+') {
        let p = part.trim();
        if p.is_empty() {
            continue;
        }
        let token_str = if let Some(rest) = p.strip_prefix("hold>") {
            let (secs_str, after) = rest
                .split_once(':')
                .ok_or_else(|| format!("Malformed hold qualifier '{p}': missing ':'"))?;
            hold = secs_str
                .parse::<f32>()
                .map_err(|_| format!("Invalid hold seconds '{secs_str}'"))?;
            after
        } else {
            p
        };
        let token = parse_token(token_str)?;
        if !seen.insert(token) {
            return Err(format!("Duplicate token in chord: {token:?}"));
        }
        tokens.push(token);
    }
    if tokens.is_empty() {
        return Err("Empty binding".into());
    }
    Ok((tokens, hold))
}

fn parse_token(s: &str) -> Result<RawBindingToken, String> {
    if let Some(rest) = s.strip_prefix("Key:") {
        return parse_keycode(rest).map(RawBindingToken::Key);
    }
    if let Some(rest) = s.strip_prefix("Mouse:") {
        return match rest {
            "Left" => Ok(RawBindingToken::MouseBtn(MouseButton::Left)),
            "Right" => Ok(RawBindingToken::MouseBtn(MouseButton::Right)),
            "Middle" => Ok(RawBindingToken::MouseBtn(MouseButton::Middle)),
            other => Err(format!("Unknown mouse button '{other}'")),
        };
    }
    Err(format!("Unrecognized token '{s}'"))
}

fn parse_keycode(name: &str) -> Result<KeyCode, String> {
    let kc = match name {
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ControlLeft" => KeyCode::ControlLeft,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "A" | "KeyA" => KeyCode::KeyA,
        "C" | "KeyC" => KeyCode::KeyC,
        "D" | "KeyD" => KeyCode::KeyD,
        "E" | "KeyE" => KeyCode::KeyE,
        "L" | "KeyL" => KeyCode::KeyL,
        "Q" | "KeyQ" => KeyCode::KeyQ,
        "R" | "KeyR" => KeyCode::KeyR,
        "S" | "KeyS" => KeyCode::KeyS,
        "W" | "KeyW" => KeyCode::KeyW,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        other => return Err(format!("Unsupported KeyCode '{other}' (extend parser)")),
    };
    Ok(kc)
}
