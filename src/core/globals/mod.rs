//=========================================================================
// Global Simulation State
//=========================================================================
//
// Separates systems (logic components) from context (shared data).
//
// Architecture:
//   PuzzleSystems: drag, state machine, level director, cheat console
//   GlobalContext: bus, input state, viewport
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod puzzle_systems;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
pub use puzzle_systems::PuzzleSystems;
