//=========================================================================
// Event Collector
//=========================================================================
//
// Core-side receiver. Drains the platform channel once per tick, keeps
// input batches in arrival order and remembers only the latest resize.
//
//   Receiver<PlatformEvent> → collect_frame() → batches + resize → TickControl
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== Constants ===========================================================

/// Upper bound on messages drained per tick; the rest wait for the next.
const MAX_EVENTS_PER_FRAME: usize = 100;

//=== TickControl =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    input_batches: Vec<Vec<InputEvent>>,
    resized: Option<(u32, u32)>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            input_batches: Vec::with_capacity(4),
            resized: None,
        }
    }

    /// Drains pending messages. `Exit` on window close or disconnect.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    drained += 1;
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!("Event queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Input batches collected since the last take, oldest first.
    pub(crate) fn take_batches(&mut self) -> Vec<Vec<InputEvent>> {
        std::mem::take(&mut self.input_batches)
    }

    /// Latest window size reported since the last take.
    pub(crate) fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.resized.take()
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Inputs { discrete, continuous } => {
                if !discrete.is_empty() {
                    self.input_batches.push(discrete);
                }
                if !continuous.is_empty() {
                    self.input_batches.push(continuous);
                }
                TickControl::Continue
            }
            PlatformEvent::Resized { width, height } => {
                debug!("Resize received: {}x{}", width, height);
                self.resized = Some((width, height));
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
