//=========================================================================
// Prelude
//=========================================================================
//
// Re-exports the types most callers need.
//
// Usage:
//   use paper_puzzle::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};

// Headless simulation and configuration
pub use crate::core::error::{ConfigError, PlatformError, PuzzleError};
pub use crate::core::level::{LevelCatalog, LevelConfig, PieceConfig, PoseConfig};
pub use crate::core::settings::PuzzleSettings;
pub use crate::core::simulation::Simulation;

// Game flow
pub use crate::core::game_state::{
    ActionRequest, GameAction, GameActionEvent, GameState, GameStateChanged, UiInteract,
};

// Pieces
pub use crate::core::piece::{PieceAction, PieceActionKind, PieceHandle};

// Input
pub use crate::core::input::{InputEvent, KeyCode, MouseButton};

// Message bus
pub use crate::core::message_bus::{EventBus, Inbox};
