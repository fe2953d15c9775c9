//=========================================================================
// Game Events
//=========================================================================
//
// Topics published by the state machine and by its UI collaborators.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{GameAction, GameState};

//=== Published by the state machine ======================================

/// Every performed action, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameActionEvent {
    pub action: GameAction,
    pub level: Option<u32>,
}

/// Emitted only when the state actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStateChanged {
    pub old: GameState,
    pub new: GameState,
    pub level: Option<u32>,
}

//=== Consumed by the state machine =======================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEventKind {
    None,
    /// Opens a menu; handled by the menu collaborator.
    Ui,
    /// Carries a game action.
    GameAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiInteraction {
    Enter,
    Click,
    Up,
    Exit,
}

/// Pointer interaction with a UI button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiInteract {
    pub kind: UiEventKind,
    pub interaction: UiInteraction,
    pub action: GameAction,
    pub level: Option<u32>,
}

impl UiInteract {
    /// A click on a button that performs `action`.
    pub fn click(action: GameAction, level: Option<u32>) -> Self {
        Self {
            kind: UiEventKind::GameAction,
            interaction: UiInteraction::Click,
            action,
            level,
        }
    }
}

/// The level loader ran out of levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatLastLevel;
