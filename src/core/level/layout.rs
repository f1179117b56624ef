use bevy::prelude::*;
use serde::Deserialize;

use crate::core::components::SurfaceTag;
use crate::core::config::Vec2Def;

/// Axis-aligned box before rotation, in world meters.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BlockDef {
    pub center: Vec2Def,
    pub size: Vec2Def,
    #[serde(default)]
    pub rotation_deg: f32,
    #[serde(default)]
    pub tag: SurfaceTag,
}

impl BlockDef {
    pub fn transform(&self, z: f32) -> Transform {
        Transform {
            translation: Vec3::new(self.center.x, self.center.y, z),
            rotation: Quat::from_rotation_z(self.rotation_deg.to_radians()),
            scale: Vec3::ONE,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.size.x, self.size.y) * 0.5
    }

    /// Point containment test honoring the block rotation.
    pub fn contains(&self, p: Vec2) -> bool {
        let local = Quat::from_rotation_z(-self.rotation_deg.to_radians())
            * (p - Vec2::from(self.center)).extend(0.0);
        let h = self.half_extents();
        local.x.abs() <= h.x && local.y.abs() <= h.y
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LevelLayout {
    pub version: u32,
    pub name: String,
    /// Rocket start position (collider center).
    pub spawn: Vec2Def,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

impl LevelLayout {
    /// Parse a layout RON document; `label` names the source in error messages.
    pub fn parse(txt: &str, label: &str) -> Result<Self, String> {
        let layout: LevelLayout =
            ron::from_str(txt).map_err(|e| format!("parse layout {label}: {e}"))?;
        if layout.version != 1 {
            return Err(format!(
                "layout {label}: version {} unsupported (expected 1)",
                layout.version
            ));
        }
        Ok(layout)
    }

    pub fn count_tag(&self, tag: SurfaceTag) -> usize {
        self.blocks.iter().filter(|b| b.tag == tag).count()
    }

    /// Soft problems that still allow the level to be played.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.count_tag(SurfaceTag::Finish) == 0 {
            w.push(format!("level '{}' has no Finish block; it cannot be completed", self.name));
        }
        if self.count_tag(SurfaceTag::Friendly) == 0 {
            w.push(format!("level '{}' has no Friendly launch pad", self.name));
        }
        for (i, b) in self.blocks.iter().enumerate() {
            if b.size.x <= 0.0 || b.size.y <= 0.0 {
                w.push(format!(
                    "level '{}' block {i} has non-positive size ({}, {})",
                    self.name, b.size.x, b.size.y
                ));
            }
        }
        let spawn = Vec2::from(self.spawn);
        if let Some(i) = self.blocks.iter().position(|b| b.contains(spawn)) {
            w.push(format!(
                "level '{}' spawn ({}, {}) lies inside block {i}",
                self.name, spawn.x, spawn.y
            ));
        }
        w
    }
}
