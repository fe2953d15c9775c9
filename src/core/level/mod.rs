//=========================================================================
// Level
//=========================================================================
//
// Level content (TOML), its runtime instance, and the director that
// swaps instances in response to game actions.
//
//=========================================================================

//=== Module Declarations =================================================

mod config;
mod data;
mod director;

//=== Public API ==========================================================

pub use config::{
    LevelCatalog, LevelConfig, PieceConfig, PoseConfig, DEFAULT_POSITIONAL_LENIENCY,
    DEFAULT_ROTATIONAL_LENIENCY,
};
pub use data::LevelData;
pub use director::{LevelChange, LevelDirector, LevelEvent};
