//! Embedded / Disk dual-mode level sourcing.
//!
//! Compilation Mode Summary:
//! - `wasm32` target: always uses embedded levels (no runtime FS IO) regardless of feature flags.
//! - Native + feature `embedded_levels`: forces embedded mode (mirrors wasm behavior).
//! - Native default (no feature): disk mode, falling back to the embedded copy when
//!   the registry cannot be read.
//!
//! Adding a new level requires a registry entry plus an `EMBEDDED_FILES` line here.

use std::path::{Path, PathBuf};

pub const REGISTRY_FILE: &str = "registry.ron";

/// Compile-time copies of `assets/levels/*`, keyed by file name.
pub const EMBEDDED_FILES: &[(&str, &str)] = &[
    (
        REGISTRY_FILE,
        include_str!("../../../assets/levels/registry.ron"),
    ),
    (
        "first_hop.ron",
        include_str!("../../../assets/levels/first_hop.ron"),
    ),
    (
        "chimney.ron",
        include_str!("../../../assets/levels/chimney.ron"),
    ),
    (
        "overhang.ron",
        include_str!("../../../assets/levels/overhang.ron"),
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSourceMode {
    Embedded,
    Disk,
}

/// Where registry and layout text come from.
pub trait LevelSource {
    fn mode(&self) -> LevelSourceMode;
    fn read(&self, file: &str) -> Result<String, String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedLevelSource;

impl LevelSource for EmbeddedLevelSource {
    fn mode(&self) -> LevelSourceMode {
        LevelSourceMode::Embedded
    }

    fn read(&self, file: &str) -> Result<String, String> {
        EMBEDDED_FILES
            .iter()
            .find(|(name, _)| *name == file)
            .map(|(_, txt)| (*txt).to_string())
            .ok_or_else(|| format!("embedded level file '{file}' not found"))
    }
}

#[derive(Debug, Clone)]
pub struct DiskLevelSource {
    pub base: PathBuf,
}

impl DiskLevelSource {
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
        }
    }

    /// `<CARGO_MANIFEST_DIR or .>/assets/levels`
    pub fn from_manifest_dir() -> Self {
        let crate_root = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
        Self::new(PathBuf::from(crate_root).join("assets").join("levels"))
    }
}

impl LevelSource for DiskLevelSource {
    fn mode(&self) -> LevelSourceMode {
        LevelSourceMode::Disk
    }

    fn read(&self, file: &str) -> Result<String, String> {
        let path = self.base.join(file);
        std::fs::read_to_string(&path).map_err(|e| format!("read {}: {e}", path.display()))
    }
}

/// Pick the source for this build.
pub fn select_level_source() -> Box<dyn LevelSource> {
    if cfg!(any(target_arch = "wasm32", feature = "embedded_levels")) {
        Box::new(EmbeddedLevelSource)
    } else {
        Box::new(DiskLevelSource::from_manifest_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_registry_present() {
        let txt = EmbeddedLevelSource.read(REGISTRY_FILE).expect("registry");
        assert!(txt.contains("first_hop"));
    }

    #[test]
    fn embedded_missing_file_errors() {
        assert!(EmbeddedLevelSource.read("nope.ron").is_err());
    }

    #[test]
    fn disk_reads_from_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ron"), "hello").unwrap();
        let src = DiskLevelSource::new(dir.path());
        assert_eq!(src.read("a.ron").unwrap(), "hello");
        assert!(src.read("b.ron").unwrap_err().contains("b.ron"));
    }
}
