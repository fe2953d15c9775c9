//=========================================================================
// Topic Slot Trait
//=========================================================================
//
// Type-erased trait for per-message-type handler lists that preserves
// registration order while allowing storage in a HashMap without
// concrete type knowledge.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::{EventBus, Message};

//=== SubscriptionId ======================================================

/// Identifies one registered handler. Ids are unique per bus and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(super) u64);

//=== Handler =============================================================

/// Shared handler slot. Delivery snapshots these so handlers may
/// subscribe or unsubscribe while a message is being delivered.
pub(super) type Handler<M> = Rc<RefCell<dyn FnMut(&M, &EventBus)>>;

//=== TopicSlot ===========================================================

/// Type-erased operations on a topic's handler list.
pub(super) trait TopicSlot {
    /// Removes a handler. Returns `true` if it was registered.
    fn remove(&mut self, id: SubscriptionId) -> bool;

    /// Returns `true` if the handler is still registered.
    fn contains(&self, id: SubscriptionId) -> bool;

    /// Returns the number of registered handlers.
    fn len(&self) -> usize;

    /// Returns true if no handler is registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Downcasts to `&dyn Any` for type-specific operations.
    fn as_any(&self) -> &dyn Any;

    /// Downcasts to `&mut dyn Any` for type-specific operations.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=== Topic ===============================================================

/// Ordered handler list for one message type.
pub(super) struct Topic<M: Message> {
    pub(super) handlers: Vec<(SubscriptionId, Handler<M>)>,
}

impl<M: Message> Topic<M> {
    pub(super) fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    pub(super) fn push(&mut self, id: SubscriptionId, handler: Handler<M>) {
        self.handlers.push((id, handler));
    }

    /// Clones the handler list in registration order.
    pub(super) fn snapshot(&self) -> Vec<(SubscriptionId, Handler<M>)> {
        self.handlers.clone()
    }
}

impl<M: Message> TopicSlot for Topic<M> {
    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        // Vec::retain keeps relative order of the survivors
        self.handlers.retain(|(existing, _)| *existing != id);
        before != self.handlers.len()
    }

    fn contains(&self, id: SubscriptionId) -> bool {
        self.handlers.iter().any(|(existing, _)| *existing == id)
    }

    fn len(&self) -> usize {
        self.handlers.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================
