pub mod embedded_levels;
pub mod layout;
pub mod loader;
pub mod registry;

pub use layout::{BlockDef, LevelLayout};
pub use loader::{LevelLoaderPlugin, LoadLevel};
pub use registry::{CurrentLevel, LevelRegistry, RequestedLevel};
