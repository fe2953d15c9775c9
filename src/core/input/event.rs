//=========================================================================
// Input Events
//=========================================================================
//
// Platform-neutral input vocabulary shared by the platform thread and the
// simulation.
//
// Event flow:
//   winit ─> InputProcessor ─> InputEvent ─> channel ─> StateTracker
//
// Discrete events (keys, buttons, text) keep their order. Continuous
// events (cursor, wheel) are coalesced per frame by the platform buffer.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== MouseButton =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Side, thumb and macro buttons.
    Other,
}

//=== KeyCode =============================================================

/// Physical key location, independent of keyboard layout.
///
/// Serialized in snake_case so settings files can name keys
/// (`pause_key = "escape"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    Space,
    /// Submits the cheat console.
    Enter,
    /// Default pause key.
    Escape,
    Tab,
    Backspace,
    Delete,

    Unidentified,
}

//=== InputEvent ==========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },
    MouseButtonDown { button: MouseButton },
    MouseButtonUp { button: MouseButton },

    /// Cursor position in screen pixels, top-left origin.
    MouseMoved { x: f32, y: f32 },

    /// Wheel movement in lines; positive is away from the user.
    MouseWheel { delta: f32 },

    /// One character of typed text.
    Text(char),

    Unidentified,
}

impl InputEvent {
    /// Cursor and wheel events, which the platform coalesces per frame.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::MouseMoved { .. } | Self::MouseWheel { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
