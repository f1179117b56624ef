use bevy::prelude::*;

/// High-level app lifecycle state.
/// Loading -> Playing -> (level outcome) -> Loading -> ...
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// Transitional state while (re)loading `CurrentLevel`.
    #[default]
    Loading,
    /// Active level; the rocket may be alive, dying or celebrating.
    Playing,
}
