//=========================================================================
// Input
//=========================================================================
//
// Input vocabulary and the per-frame state the simulation queries.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, MouseButton};
pub use state_tracker::StateTracker;
