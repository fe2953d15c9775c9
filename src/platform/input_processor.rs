//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit window events into engine InputEvents.
//
//   winit event ─> InputProcessor ─> InputEvent(s) ─> InputBuffer
//
// Key presses also yield their typed characters as Text events, so the
// cheat console sees text in the same order as the key edges. Unmapped
// physical keys still produce text.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, MouseButton};

//=== Constants ===========================================================

/// Pixels of trackpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f32 = 40.0;

//=== InputProcessor ======================================================

#[derive(Debug, Default)]
pub(crate) struct InputProcessor;

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self
    }

    //--- Keyboard ---------------------------------------------------------

    /// Key edge (if the key is mapped) followed by any typed characters.
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if let PhysicalKey::Code(code) = key_event.physical_key {
            let key = KeyCode::from(code);
            if key != KeyCode::Unidentified && !key_event.repeat {
                events.push(key_transition(key, key_event.state));
            }
        }

        if key_event.state == ElementState::Pressed {
            if let Some(text) = &key_event.text {
                events.extend(text_events(text));
            }
        }

        events
    }

    //--- Mouse ------------------------------------------------------------

    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> InputEvent {
        let button = MouseButton::from(button);
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button },
            ElementState::Released => InputEvent::MouseButtonUp { button },
        }
    }

    pub(crate) fn process_mouse_move(&self, x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }

    pub(crate) fn process_wheel(&self, delta: MouseScrollDelta) -> InputEvent {
        InputEvent::MouseWheel {
            delta: wheel_lines(delta),
        }
    }
}

//=== Conversions =========================================================

fn key_transition(key: KeyCode, state: ElementState) -> InputEvent {
    match state {
        ElementState::Pressed => InputEvent::KeyDown { key },
        ElementState::Released => InputEvent::KeyUp { key },
    }
}

fn text_events(text: &str) -> impl Iterator<Item = InputEvent> + '_ {
    text.chars().map(InputEvent::Text)
}

/// Vertical wheel movement in lines, positive away from the user.
fn wheel_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
    }
}

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            W::Digit0 => KeyCode::Digit0,
            W::Digit1 => KeyCode::Digit1,
            W::Digit2 => KeyCode::Digit2,
            W::Digit3 => KeyCode::Digit3,
            W::Digit4 => KeyCode::Digit4,
            W::Digit5 => KeyCode::Digit5,
            W::Digit6 => KeyCode::Digit6,
            W::Digit7 => KeyCode::Digit7,
            W::Digit8 => KeyCode::Digit8,
            W::Digit9 => KeyCode::Digit9,

            W::KeyA => KeyCode::KeyA,
            W::KeyB => KeyCode::KeyB,
            W::KeyC => KeyCode::KeyC,
            W::KeyD => KeyCode::KeyD,
            W::KeyE => KeyCode::KeyE,
            W::KeyF => KeyCode::KeyF,
            W::KeyG => KeyCode::KeyG,
            W::KeyH => KeyCode::KeyH,
            W::KeyI => KeyCode::KeyI,
            W::KeyJ => KeyCode::KeyJ,
            W::KeyK => KeyCode::KeyK,
            W::KeyL => KeyCode::KeyL,
            W::KeyM => KeyCode::KeyM,
            W::KeyN => KeyCode::KeyN,
            W::KeyO => KeyCode::KeyO,
            W::KeyP => KeyCode::KeyP,
            W::KeyQ => KeyCode::KeyQ,
            W::KeyR => KeyCode::KeyR,
            W::KeyS => KeyCode::KeyS,
            W::KeyT => KeyCode::KeyT,
            W::KeyU => KeyCode::KeyU,
            W::KeyV => KeyCode::KeyV,
            W::KeyW => KeyCode::KeyW,
            W::KeyX => KeyCode::KeyX,
            W::KeyY => KeyCode::KeyY,
            W::KeyZ => KeyCode::KeyZ,

            W::ArrowUp => KeyCode::ArrowUp,
            W::ArrowDown => KeyCode::ArrowDown,
            W::ArrowLeft => KeyCode::ArrowLeft,
            W::ArrowRight => KeyCode::ArrowRight,

            W::Space => KeyCode::Space,
            W::Enter | W::NumpadEnter => KeyCode::Enter,
            W::Escape => KeyCode::Escape,
            W::Tab => KeyCode::Tab,
            W::Backspace => KeyCode::Backspace,
            W::Delete => KeyCode::Delete,

            _ => KeyCode::Unidentified,
        }
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
