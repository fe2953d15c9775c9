//=========================================================================
// Global Context
//=========================================================================
//
// Shared per-simulation data the puzzle systems read and write:
// - bus: the event bus every component publishes on
// - input_state: keys, buttons, pointer, wheel and text for this frame
// - viewport: camera used to map the pointer into world space
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::geometry::{pointer_world_position, Viewport};
use crate::core::input::{InputEvent, StateTracker};
use crate::core::message_bus::EventBus;

//=== GlobalContext =======================================================

pub struct GlobalContext {
    pub bus: EventBus,

    pub input_state: StateTracker,

    pub viewport: Viewport,

    /// Input batches received since the last tick. Consumed by
    /// `begin_frame`.
    pub(crate) frame_events: Vec<Vec<InputEvent>>,
}

impl GlobalContext {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            bus: EventBus::new(),
            input_state: StateTracker::new(),
            viewport,
            frame_events: Vec::new(),
        }
    }

    /// Queues one batch of platform input for the next tick.
    pub fn push_input(&mut self, batch: Vec<InputEvent>) {
        if !batch.is_empty() {
            self.frame_events.push(batch);
        }
    }

    /// Folds queued input into the state tracker.
    pub(crate) fn begin_frame(&mut self) {
        self.input_state.clear();
        for batch in self.frame_events.drain(..) {
            self.input_state.process_events(&batch);
        }
        self.input_state.finalize_frame();
    }

    /// Pointer in world space.
    pub fn pointer_world(&self) -> Vec2 {
        pointer_world_position(&self.input_state, &self.viewport)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
