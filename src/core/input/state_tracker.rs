//=========================================================================
// State Tracker
//=========================================================================
//
// Held keys and buttons plus the per-frame edges, pointer, wheel and
// text that the puzzle reads each tick.
//
// Frame lifecycle: clear() → process_events() → finalize_frame() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, MouseButton};

//=== StateTracker ========================================================

#[derive(Debug, Default)]
pub struct StateTracker {
    //--- Persistent ------------------------------------------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: (f32, f32),

    //--- Per Frame -------------------------------------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    scroll_delta: f32,
    text: String,

    mouse_delta: (f32, f32),
    frame_start_position: (f32, f32),
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Drops the previous frame's edges, wheel and text.
    pub(crate) fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.scroll_delta = 0.0;
        self.text.clear();
        self.frame_start_position = self.mouse_position;
    }

    pub(crate) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    pub(crate) fn finalize_frame(&mut self) {
        self.mouse_delta = (
            self.mouse_position.0 - self.frame_start_position.0,
            self.mouse_position.1 - self.frame_start_position.1,
        );
        if self.scroll_delta != 0.0 || !self.text.is_empty() {
            trace!(
                target: "platform::input",
                "Frame input: scroll {:.2}, text {:?}",
                self.scroll_delta,
                self.text
            );
        }
    }

    fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key } => {
                if self.keys_down.insert(*key) {
                    self.keys_pressed.insert(*key);
                }
            }
            InputEvent::KeyUp { key } => {
                if self.keys_down.remove(key) {
                    self.keys_released.insert(*key);
                }
            }
            InputEvent::MouseButtonDown { button } => {
                if self.buttons_down.insert(*button) {
                    self.buttons_pressed.insert(*button);
                }
            }
            InputEvent::MouseButtonUp { button } => {
                if self.buttons_down.remove(button) {
                    self.buttons_released.insert(*button);
                }
            }
            InputEvent::MouseMoved { x, y } => self.mouse_position = (*x, *y),
            InputEvent::MouseWheel { delta } => self.scroll_delta += delta,
            InputEvent::Text(c) => self.text.push(*c),
            InputEvent::Unidentified => {}
        }
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Up → down this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Characters typed this frame, in order.
    pub fn typed_text(&self) -> &str {
        &self.text
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Screen pixels, top-left origin.
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    /// Wheel lines accumulated this frame.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn frame(tracker: &mut StateTracker, events: &[InputEvent]) {
        tracker.clear();
        tracker.process_events(events);
        tracker.finalize_frame();
    }

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key }
    }

    fn key_up(key: KeyCode) -> InputEvent {
        InputEvent::KeyUp { key }
    }

    fn press(button: MouseButton) -> InputEvent {
        InputEvent::MouseButtonDown { button }
    }

    fn release(button: MouseButton) -> InputEvent {
        InputEvent::MouseButtonUp { button }
    }

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    #[test]
    fn key_pressed_only_on_transition_frame() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[key_down(KeyCode::Escape)]);
        assert!(tracker.is_key_pressed(KeyCode::Escape));
        assert!(tracker.is_key_down(KeyCode::Escape));

        frame(&mut tracker, &[]);
        assert!(!tracker.is_key_pressed(KeyCode::Escape));
        assert!(tracker.is_key_down(KeyCode::Escape));

        frame(&mut tracker, &[key_up(KeyCode::Escape)]);
        assert!(tracker.is_key_released(KeyCode::Escape));
        assert!(!tracker.is_key_down(KeyCode::Escape));
    }

    #[test]
    fn tap_within_one_frame_reports_both_edges() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[key_down(KeyCode::Enter), key_up(KeyCode::Enter)]);

        assert!(tracker.is_key_pressed(KeyCode::Enter));
        assert!(tracker.is_key_released(KeyCode::Enter));
        assert!(!tracker.is_key_down(KeyCode::Enter));
    }

    #[test]
    fn repeated_key_down_is_not_a_new_press() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[key_down(KeyCode::KeyA)]);
        frame(&mut tracker, &[key_down(KeyCode::KeyA)]);
        assert!(!tracker.is_key_pressed(KeyCode::KeyA));
    }

    #[test]
    fn spurious_key_up_ignored() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[key_up(KeyCode::KeyZ)]);
        assert!(!tracker.is_key_released(KeyCode::KeyZ));
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    #[test]
    fn button_edges_and_hold() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[press(MouseButton::Left)]);
        assert!(tracker.is_button_pressed(MouseButton::Left));

        frame(&mut tracker, &[]);
        assert!(tracker.is_button_down(MouseButton::Left));
        assert!(!tracker.is_button_pressed(MouseButton::Left));

        frame(&mut tracker, &[release(MouseButton::Left)]);
        assert!(tracker.is_button_released(MouseButton::Left));
        assert!(!tracker.is_button_down(MouseButton::Left));
    }

    #[test]
    fn mouse_delta_per_frame() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[InputEvent::MouseMoved { x: 100.0, y: 100.0 }]);
        assert_eq!(tracker.mouse_delta(), (100.0, 100.0));

        frame(&mut tracker, &[InputEvent::MouseMoved { x: 150.0, y: 120.0 }]);
        assert_eq!(tracker.mouse_delta(), (50.0, 20.0));
        assert_eq!(tracker.mouse_position(), (150.0, 120.0));

        frame(&mut tracker, &[]);
        assert_eq!(tracker.mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn scroll_accumulates_within_frame_and_resets() {
        let mut tracker = StateTracker::new();

        frame(
            &mut tracker,
            &[
                InputEvent::MouseWheel { delta: 1.0 },
                InputEvent::MouseWheel { delta: 0.5 },
            ],
        );
        assert_eq!(tracker.scroll_delta(), 1.5);

        frame(&mut tracker, &[]);
        assert_eq!(tracker.scroll_delta(), 0.0);
    }

    //=====================================================================
    // Text Tests
    //=====================================================================

    #[test]
    fn typed_text_is_per_frame() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[InputEvent::Text('h'), InputEvent::Text('i')]);
        assert_eq!(tracker.typed_text(), "hi");

        frame(&mut tracker, &[]);
        assert_eq!(tracker.typed_text(), "");
    }

    #[test]
    fn unidentified_events_ignored() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::Unidentified]);
        assert_eq!(tracker.mouse_position(), (0.0, 0.0));
        assert_eq!(tracker.scroll_delta(), 0.0);
    }
}
