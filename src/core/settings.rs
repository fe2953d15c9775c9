//=========================================================================
// Puzzle Settings
//=========================================================================
//
// Gameplay tuning loaded from TOML. Every field has a default, so an
// empty document is valid.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::cheats::{default_cheat_codes, CheatCode};
use crate::core::drag::DragSettings;
use crate::core::error::ConfigError;
use crate::core::game_state::{ActionRequest, GameAction, DEFAULT_COMPLETION_DELAY};
use crate::core::input::KeyCode;

//=== PuzzleSettings ======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleSettings {
    pub drag: DragSettings,

    /// Seconds between the last snap and the completion check.
    pub completion_delay: f32,

    pub pause_key: KeyCode,

    /// Enables the cheat console in release builds.
    pub cheats_enabled: bool,
    pub cheat_codes: Vec<CheatCode>,

    /// Performed once on the first tick.
    pub start_action: ActionRequest,

    /// Requests the next level as soon as one is completed.
    pub auto_advance: bool,

    /// World units from the view center to the top edge.
    pub viewport_half_height: f32,
}

impl Default for PuzzleSettings {
    fn default() -> Self {
        Self {
            drag: DragSettings::default(),
            completion_delay: DEFAULT_COMPLETION_DELAY,
            pause_key: KeyCode::Escape,
            cheats_enabled: false,
            cheat_codes: default_cheat_codes(),
            start_action: ActionRequest::with_level(GameAction::StartLevel, 1),
            auto_advance: false,
            viewport_half_height: 5.0,
        }
    }
}

impl PuzzleSettings {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&source)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
