//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages the platform thread sends to the core thread.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Input gathered between two redraws.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// New inner size in physical pixels.
    Resized { width: u32, height: u32 },

    WindowClosed,
}
