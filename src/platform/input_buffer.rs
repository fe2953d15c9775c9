//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-redraw staging area on the platform thread.
//
// - discrete: key/button edges and text, in order; an edge identical to
//   the previous one is dropped, text never is
// - cursor: only the last position survives
// - wheel: lines are summed so no scroll is lost between redraws
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    cursor: Option<(f32, f32)>,
    wheel: f32,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        Self {
            discrete: Vec::with_capacity(64),
            cursor: None,
            wheel: 0.0,
        }
    }

    /// Routes `event` to the discrete queue or the coalesced slots.
    pub(crate) fn push(&mut self, event: InputEvent) {
        if event.is_continuous() {
            self.push_continuous(event);
        } else {
            self.push_discrete(event);
        }
    }

    fn push_discrete(&mut self, event: InputEvent) {
        let duplicate_edge =
            !matches!(event, InputEvent::Text(_)) && self.discrete.last() == Some(&event);
        if !duplicate_edge {
            self.discrete.push(event);
        }
    }

    fn push_continuous(&mut self, event: InputEvent) {
        match event {
            InputEvent::MouseMoved { x, y } => self.cursor = Some((x, y)),
            InputEvent::MouseWheel { delta } => self.wheel += delta,
            _ => {}
        }
    }

    /// Takes everything buffered. `None` when nothing happened.
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }

        let discrete = std::mem::take(&mut self.discrete);
        let mut continuous = Vec::with_capacity(2);
        if let Some((x, y)) = self.cursor.take() {
            continuous.push(InputEvent::MouseMoved { x, y });
        }
        if self.wheel != 0.0 {
            continuous.push(InputEvent::MouseWheel { delta: self.wheel });
            self.wheel = 0.0;
        }
        Some((discrete, continuous))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.cursor.is_none() && self.wheel == 0.0
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
