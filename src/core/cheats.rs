//=========================================================================
// Cheats
//=========================================================================
//
// Typed debug commands. The console collects text between Enter presses
// and publishes one CheatEvent per matching code.
//
//   typed text ─> buffer ─(Enter)─> match codes ─> CheatEvent
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::game_state::GameAction;
use crate::core::input::{KeyCode, StateTracker};
use crate::core::message_bus::EventBus;

//=== Types ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheatCommand {
    #[default]
    None,
    /// Every release snaps, regardless of distance or angle.
    AutoSnap,
}

/// One configured code and what it triggers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheatCode {
    pub code: String,
    pub action: GameAction,
    pub command: CheatCommand,
}

impl CheatCode {
    pub fn new(code: &str, action: GameAction, command: CheatCommand) -> Self {
        Self {
            code: code.to_string(),
            action,
            command,
        }
    }

    fn matches(&self, input: &str) -> bool {
        !self.code.is_empty() && self.code.eq_ignore_ascii_case(input)
    }
}

/// Published when a typed code matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheatEvent {
    pub action: GameAction,
    pub command: CheatCommand,
}

/// Codes available when the settings do not override them.
pub fn default_cheat_codes() -> Vec<CheatCode> {
    vec![
        CheatCode::new("autosnap", GameAction::None, CheatCommand::AutoSnap),
        CheatCode::new("skip", GameAction::LoadNextLevel, CheatCommand::None),
        CheatCode::new("restart", GameAction::RestartLevel, CheatCommand::None),
        CheatCode::new("menu", GameAction::EnterMainMenu, CheatCommand::None),
    ]
}

//=== CheatConsole ========================================================

pub struct CheatConsole {
    codes: Vec<CheatCode>,
    buffer: String,
    enabled: bool,
}

impl CheatConsole {
    /// Active in debug builds, or when `force_enabled` is set.
    pub fn new(codes: Vec<CheatCode>, force_enabled: bool) -> Self {
        let enabled = cfg!(debug_assertions) || force_enabled;
        if enabled {
            info!("Cheat console enabled with {} codes", codes.len());
        }
        Self {
            codes,
            buffer: String::new(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Text typed since the last submit.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Reads this frame's typed text and submits on Enter. Returns the
    /// number of events published.
    pub fn update(&mut self, input: &StateTracker, bus: &EventBus) -> usize {
        if !self.enabled {
            return 0;
        }

        self.buffer
            .extend(input.typed_text().chars().filter(|c| !c.is_control()));

        if !input.is_key_pressed(KeyCode::Enter) {
            return 0;
        }

        let command = std::mem::take(&mut self.buffer);
        self.submit(command.trim(), bus)
    }

    fn submit(&self, command: &str, bus: &EventBus) -> usize {
        let mut published = 0;
        for cheat in self.codes.iter().filter(|c| c.matches(command)) {
            info!("Cheat '{}' entered", cheat.code);
            bus.publish(CheatEvent {
                action: cheat.action,
                command: cheat.command,
            });
            published += 1;
        }

        if published == 0 && !command.is_empty() {
            debug!("No cheat matches '{}'", command);
        }
        published
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
