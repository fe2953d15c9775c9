//=========================================================================
// Game State
//=========================================================================
//
// Actions, states, the events that carry them, and the machine that
// owns the current value.
//
//=========================================================================

//=== Module Declarations =================================================

mod events;
mod state_machine;
mod types;

//=== Public API ==========================================================

pub use events::{
    BeatLastLevel, GameActionEvent, GameStateChanged, UiEventKind, UiInteract, UiInteraction,
};
pub use state_machine::{GameStateMachine, DEFAULT_COMPLETION_DELAY};
pub use types::{ActionRequest, GameAction, GameState};
