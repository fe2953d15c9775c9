//=========================================================================
// Level Configuration
//=========================================================================
//
// Serialized level content. A catalog is a TOML document with one
// `[[levels]]` table per level and one `[[levels.pieces]]` table per
// piece:
//
//   [[levels]]
//   number = 1
//   positional_leniency = 0.45
//
//   [[levels.pieces]]
//   name = "corner"
//   shape = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]]
//   start = { x = 2.0, y = -1.5, angle = 30.0 }
//   target = { x = -0.5, y = 0.5 }
//
// Poses are relative to the level's puzzle container; angles are in
// degrees.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::path::Path;

use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::error::ConfigError;
use crate::core::geometry::{Polygon, Pose};

//=== Defaults ============================================================

pub const DEFAULT_POSITIONAL_LENIENCY: f32 = 0.45;
pub const DEFAULT_ROTATIONAL_LENIENCY: f32 = 0.1;

fn default_positional_leniency() -> f32 {
    DEFAULT_POSITIONAL_LENIENCY
}

fn default_rotational_leniency() -> f32 {
    DEFAULT_ROTATIONAL_LENIENCY
}

//=== PoseConfig ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    pub x: f32,
    pub y: f32,
    /// Degrees, counter-clockwise.
    pub angle: f32,
}

impl PoseConfig {
    pub fn to_pose(self) -> Pose {
        Pose::from_angle(Vec2::new(self.x, self.y), self.angle.to_radians())
    }
}

//=== PieceConfig =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceConfig {
    pub name: String,
    /// Local-space outline, counter-clockwise.
    pub shape: Vec<[f32; 2]>,
    pub start: PoseConfig,
    #[serde(default)]
    pub target: PoseConfig,
}

impl PieceConfig {
    pub fn polygon(&self) -> Polygon {
        Polygon::new(self.shape.iter().map(|&[x, y]| Vec2::new(x, y)).collect())
    }
}

//=== LevelConfig =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub number: u32,

    /// Max per-axis distance from target, in world units.
    #[serde(default = "default_positional_leniency")]
    pub positional_leniency: f32,

    /// Max deviation of the rotation quaternion's z component.
    #[serde(default = "default_rotational_leniency")]
    pub rotational_leniency: f32,

    #[serde(default)]
    pub shuffle_on_load: bool,

    #[serde(default)]
    pub shuffle_seed: u64,

    #[serde(default)]
    pub pieces: Vec<PieceConfig>,
}

//=== LevelCatalog ========================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelCatalog {
    #[serde(default)]
    pub levels: Vec<LevelConfig>,
}

impl LevelCatalog {
    /// Parses and validates a catalog.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let catalog: Self = toml::from_str(source)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&source)?;
        info!("Loaded {} levels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn get(&self, number: u32) -> Option<&LevelConfig> {
        self.levels.iter().find(|l| l.number == number)
    }

    pub fn contains(&self, number: u32) -> bool {
        self.get(number).is_some()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for level in &self.levels {
            if !seen.insert(level.number) {
                return Err(ConfigError::DuplicateLevel {
                    number: level.number,
                });
            }
            if let Some(piece) = level.pieces.iter().find(|p| p.shape.len() < 3) {
                return Err(ConfigError::DegenerateShape {
                    level: level.number,
                    piece: piece.name.clone(),
                });
            }
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_LEVELS: &str = r#"
        [[levels]]
        number = 1

        [[levels.pieces]]
        name = "left"
        shape = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]]
        start = { x = 2.0, y = 1.0, angle = 90.0 }

        [[levels]]
        number = 2
        positional_leniency = 0.2
        rotational_leniency = 0.05
        shuffle_on_load = true
        shuffle_seed = 9

        [[levels.pieces]]
        name = "tri"
        shape = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]
        start = { x = -1.0 }
        target = { x = 0.5, y = 0.5, angle = -45.0 }
    "#;

    #[test]
    fn parses_catalog_with_defaults() {
        let catalog = LevelCatalog::from_toml_str(TWO_LEVELS).unwrap();
        assert_eq!(catalog.len(), 2);

        let first = catalog.get(1).unwrap();
        assert_eq!(first.positional_leniency, DEFAULT_POSITIONAL_LENIENCY);
        assert_eq!(first.rotational_leniency, DEFAULT_ROTATIONAL_LENIENCY);
        assert!(!first.shuffle_on_load);
        assert_eq!(first.shuffle_seed, 0);
        assert_eq!(first.pieces[0].target, PoseConfig::default());

        let second = catalog.get(2).unwrap();
        assert_eq!(second.positional_leniency, 0.2);
        assert!(second.shuffle_on_load);
        assert_eq!(second.shuffle_seed, 9);
        assert_eq!(second.pieces[0].start.y, 0.0);
    }

    #[test]
    fn pose_angle_is_degrees() {
        let pose = PoseConfig { x: 1.0, y: 2.0, angle: 90.0 }.to_pose();
        assert_eq!(pose.position, Vec2::new(1.0, 2.0));
        assert!((pose.angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn lookup_misses_unknown_number() {
        let catalog = LevelCatalog::from_toml_str(TWO_LEVELS).unwrap();
        assert!(catalog.contains(2));
        assert!(!catalog.contains(3));
        assert!(catalog.get(0).is_none());
    }

    #[test]
    fn duplicate_numbers_rejected() {
        let err = LevelCatalog::from_toml_str("[[levels]]\nnumber = 1\n[[levels]]\nnumber = 1\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLevel { number: 1 }));
    }

    #[test]
    fn degenerate_shape_rejected() {
        let err = LevelCatalog::from_toml_str(
            "[[levels]]\nnumber = 4\n[[levels.pieces]]\nname = \"line\"\n\
             shape = [[0.0, 0.0], [1.0, 0.0]]\nstart = {}\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateShape { level: 4, .. }));
    }

    #[test]
    fn empty_document_is_empty_catalog() {
        let catalog = LevelCatalog::from_toml_str("").unwrap();
        assert!(catalog.is_empty());
    }
}
