//=========================================================================
// Game Action & Game State
//=========================================================================
//
// Actions are momentary intents; states are the durable mode an action
// leaves the game in. The mapping between them is a fixed table.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== GameAction ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameAction {
    /// Sentinel, never performed.
    #[default]
    None,
    EnterMainMenu,
    StartLevel,
    PauseGame,
    ResumeGame,
    RestartLevel,
    LoadNextLevel,
    CompleteLevel,
    BeatGame,
}

impl GameAction {
    /// Every performable action (excludes the sentinel).
    pub const ALL: [GameAction; 8] = [
        GameAction::EnterMainMenu,
        GameAction::StartLevel,
        GameAction::PauseGame,
        GameAction::ResumeGame,
        GameAction::RestartLevel,
        GameAction::LoadNextLevel,
        GameAction::CompleteLevel,
        GameAction::BeatGame,
    ];

    /// State this action leads to, or `None` when it leaves the state as is.
    pub fn resulting_state(self) -> Option<GameState> {
        match self {
            GameAction::EnterMainMenu => Some(GameState::InMenu),
            GameAction::StartLevel
            | GameAction::ResumeGame
            | GameAction::RestartLevel
            | GameAction::LoadNextLevel => Some(GameState::Running),
            GameAction::PauseGame => Some(GameState::Paused),
            GameAction::CompleteLevel | GameAction::BeatGame | GameAction::None => None,
        }
    }
}

//=== GameState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Sentinel, never set.
    #[default]
    None,
    InMenu,
    Running,
    Paused,
    Loading,
}

//=== ActionRequest =======================================================

/// Request to perform an action, tagged with an optional level number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionRequest {
    pub action: GameAction,
    pub level: Option<u32>,
}

impl ActionRequest {
    pub fn new(action: GameAction) -> Self {
        Self { action, level: None }
    }

    pub fn with_level(action: GameAction, level: u32) -> Self {
        Self {
            action,
            level: Some(level),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_table_matches_design() {
        let expected = [
            (GameAction::EnterMainMenu, Some(GameState::InMenu)),
            (GameAction::StartLevel, Some(GameState::Running)),
            (GameAction::PauseGame, Some(GameState::Paused)),
            (GameAction::ResumeGame, Some(GameState::Running)),
            (GameAction::RestartLevel, Some(GameState::Running)),
            (GameAction::LoadNextLevel, Some(GameState::Running)),
            (GameAction::CompleteLevel, None),
            (GameAction::BeatGame, None),
        ];

        for (action, state) in expected {
            assert_eq!(action.resulting_state(), state, "{:?}", action);
        }
        assert_eq!(GameAction::ALL.len(), expected.len());
    }

    #[test]
    fn sentinel_has_no_state() {
        assert_eq!(GameAction::None.resulting_state(), None);
        assert_eq!(GameAction::default(), GameAction::None);
        assert_eq!(GameState::default(), GameState::None);
    }

    #[test]
    fn request_deserializes_from_toml() {
        let req: ActionRequest = toml::from_str("action = \"start_level\"\nlevel = 2").unwrap();
        assert_eq!(req, ActionRequest::with_level(GameAction::StartLevel, 2));
    }
}
