use bevy::prelude::*;
use serde::Deserialize;

use super::embedded_levels::{EmbeddedLevelSource, LevelSource, LevelSourceMode, REGISTRY_FILE};
use super::layout::LevelLayout;

#[derive(Debug, Deserialize, Clone)]
pub struct LevelEntry {
    pub id: String,
    pub file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistryFile {
    pub version: u32,
    pub levels: Vec<LevelEntry>,
}

#[derive(Debug, Clone)]
pub struct RegisteredLevel {
    pub id: String,
    pub layout: LevelLayout,
}

/// Ordered, fully parsed level list. Position in the list is the level index.
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelRegistry {
    pub levels: Vec<RegisteredLevel>,
}

/// Level requested from the command line (index or id); resolved by the loader plugin.
#[derive(Resource, Debug, Clone, Default)]
pub struct RequestedLevel(pub Option<String>);

/// Index of the level currently loaded (or being loaded).
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentLevel {
    pub index: usize,
}

/// Target of a "next level" request: the following index, or 0 after the last level.
pub fn next_level_index(current: usize, count: usize) -> usize {
    if count > 0 && current < count - 1 {
        current + 1
    } else {
        0
    }
}

impl LevelRegistry {
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RegisteredLevel> {
        self.levels.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.id == id)
    }

    pub fn next_index(&self, current: usize) -> usize {
        next_level_index(current, self.len())
    }

    /// Read the registry and every listed layout. Layouts that fail to load are skipped
    /// and reported in the returned warnings; an unusable registry is an error.
    pub fn load(source: &dyn LevelSource) -> Result<(Self, Vec<String>), String> {
        let txt = source.read(REGISTRY_FILE)?;
        let file: RegistryFile =
            ron::from_str(&txt).map_err(|e| format!("parse registry: {e}"))?;
        if file.version != 1 {
            return Err(format!(
                "LevelRegistry version {} unsupported (expected 1)",
                file.version
            ));
        }
        let mut warnings = Vec::new();
        let mut levels = Vec::with_capacity(file.levels.len());
        for entry in file.levels {
            if levels.iter().any(|l: &RegisteredLevel| l.id == entry.id) {
                warnings.push(format!("duplicate level id '{}' skipped", entry.id));
                continue;
            }
            match source
                .read(&entry.file)
                .and_then(|txt| LevelLayout::parse(&txt, &entry.file))
            {
                Ok(layout) => {
                    warnings.extend(layout.validate());
                    levels.push(RegisteredLevel {
                        id: entry.id,
                        layout,
                    });
                }
                Err(e) => warnings.push(format!("level '{}' skipped: {e}", entry.id)),
            }
        }
        if levels.is_empty() {
            return Err("LevelRegistry has no loadable levels".into());
        }
        Ok((Self { levels }, warnings))
    }

    /// Like [`LevelRegistry::load`], but a failing disk source falls back to the embedded levels.
    pub fn load_with_fallback(source: &dyn LevelSource) -> Result<(Self, Vec<String>), String> {
        match Self::load(source) {
            Ok(ok) => Ok(ok),
            Err(e) if source.mode() == LevelSourceMode::Disk => {
                let (reg, mut warnings) = Self::load(&EmbeddedLevelSource)?;
                warnings.insert(0, format!("{e}; using embedded levels"));
                Ok((reg, warnings))
            }
            Err(e) => Err(e),
        }
    }

    /// Starting level precedence: explicit request (index or id) > configured start index > 0.
    /// Out-of-range or unknown requests produce a warning and fall through.
    pub fn resolve_start(
        &self,
        requested: Option<&str>,
        configured: usize,
    ) -> (usize, Option<String>) {
        let mut warning = None;
        if let Some(req) = requested.map(str::trim).filter(|s| !s.is_empty()) {
            let by_index = req.parse::<usize>().ok().filter(|i| *i < self.len());
            if let Some(i) = by_index.or_else(|| self.index_of(req)) {
                return (i, None);
            }
            warning = Some(format!(
                "requested level '{req}' not found ({} levels)",
                self.len()
            ));
        }
        if configured < self.len() {
            return (configured, warning);
        }
        let msg = format!(
            "start_level {configured} out of range ({} levels); using 0",
            self.len()
        );
        (0, Some(warning.map_or(msg.clone(), |w| format!("{w}; {msg}"))))
    }
}

/// Level request from the environment (`LEVEL_INDEX`), used when no CLI request exists.
pub fn requested_level_from_env() -> Option<String> {
    std::env::var("LEVEL_INDEX")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::embedded_levels::DiskLevelSource;

    fn three_levels() -> LevelRegistry {
        let (reg, _) = LevelRegistry::load(&EmbeddedLevelSource).expect("embedded registry");
        assert_eq!(reg.len(), 3);
        reg
    }

    #[test]
    fn next_index_wraps_after_last() {
        assert_eq!(next_level_index(0, 3), 1);
        assert_eq!(next_level_index(1, 3), 2);
        assert_eq!(next_level_index(2, 3), 0);
        assert_eq!(next_level_index(0, 1), 0);
        assert_eq!(next_level_index(0, 0), 0);
        // index beyond the list (stale) restarts too
        assert_eq!(next_level_index(5, 3), 0);
    }

    #[test]
    fn resolve_prefers_request() {
        let reg = three_levels();
        assert_eq!(reg.resolve_start(Some("2"), 0), (2, None));
        assert_eq!(reg.resolve_start(Some("chimney"), 0), (1, None));
        assert_eq!(reg.resolve_start(None, 1), (1, None));
    }

    #[test]
    fn resolve_falls_back_with_warning() {
        let reg = three_levels();
        let (idx, warn) = reg.resolve_start(Some("9"), 1);
        assert_eq!(idx, 1);
        assert!(warn.unwrap().contains("'9'"));
        let (idx, warn) = reg.resolve_start(None, 10);
        assert_eq!(idx, 0);
        assert!(warn.unwrap().contains("out of range"));
    }

    #[test]
    fn broken_level_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let registry = r#"(version: 1, levels: [
            (id: "ok", file: "ok.ron"),
            (id: "bad", file: "bad.ron"),
            (id: "missing", file: "missing.ron"),
        ])"#;
        let ok = r#"(version: 1, name: "Ok", spawn: (x: 0.0, y: 5.0), blocks: [
            (center: (x: 0.0, y: 0.0), size: (x: 4.0, y: 1.0), tag: Friendly),
            (center: (x: 9.0, y: 0.0), size: (x: 4.0, y: 1.0), tag: Finish),
        ])"#;
        std::fs::write(dir.path().join(REGISTRY_FILE), registry).unwrap();
        std::fs::write(dir.path().join("ok.ron"), ok).unwrap();
        std::fs::write(dir.path().join("bad.ron"), "(version: 1,").unwrap();
        let (reg, warnings) = LevelRegistry::load(&DiskLevelSource::new(dir.path())).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.levels[0].id, "ok");
        assert_eq!(warnings.len(), 2, "{warnings:?}");
    }

    #[test]
    fn disk_failure_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let (reg, warnings) =
            LevelRegistry::load_with_fallback(&DiskLevelSource::new(dir.path())).unwrap();
        assert_eq!(reg.len(), 3);
        assert!(warnings[0].contains("using embedded levels"));
    }
}
