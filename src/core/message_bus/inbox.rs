//=========================================================================
// Inbox
//=========================================================================
//
// Buffering subscription for components that consume messages during
// their own update step instead of inside a bus handler.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::{Message, Subscription};

//=== Inbox ===============================================================

/// Collects every message of type `M` delivered by the bus.
///
/// Created with [`EventBus::inbox`](super::EventBus::inbox). Unregisters
/// itself when dropped.
pub struct Inbox<M: Message> {
    buffer: Rc<RefCell<Vec<M>>>,
    _subscription: Subscription,
}

impl<M: Message> Inbox<M> {
    pub(super) fn new(buffer: Rc<RefCell<Vec<M>>>, subscription: Subscription) -> Self {
        Self {
            buffer,
            _subscription: subscription,
        }
    }

    /// Takes all buffered messages in delivery order.
    pub fn drain(&self) -> Vec<M> {
        std::mem::take(&mut *self.buffer.borrow_mut())
    }

    /// Discards all buffered messages.
    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }

    /// Returns the number of buffered messages.
    pub fn len(&self) -> usize {
        self.buffer.borrow().len()
    }

    /// Returns true if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }
}

//=========================================================================
// Tests
//=========================================================================
