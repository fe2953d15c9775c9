//=========================================================================
// Event Bus
//=========================================================================
//
// Typed publish/subscribe registry for the simulation thread.
//
// Architecture:
//   Components → publish<M>() → pending FIFO
//                                   ↓
//   Coordinator ────────────→ flush() at tick boundaries
//                                   ↓
//   HashMap<TypeId, Topic<M>> → handlers in registration order
//
// Pattern: subscribe (RAII guard) → publish → flush → drop guard
//
// Handlers never run inside `publish`, so a component may publish while
// it is mutably borrowed. Messages published by a handler during a flush
// are delivered later in the same flush.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::inbox::Inbox;
use super::topic::{Handler, SubscriptionId, Topic, TopicSlot};

//=== Public API ==========================================================

/// Marker trait for types that can be sent through the EventBus.
///
/// Automatically implemented for all `'static` types. The bus lives on the
/// simulation thread, so messages do not need to be `Send`.
pub trait Message: 'static {}

// Blanket implementation
impl<T: 'static> Message for T {}

/// Upper bound on deliveries in one flush. Reaching it means handlers keep
/// publishing in response to each other.
const MAX_DELIVERIES_PER_FLUSH: usize = 4096;

type Delivery = Box<dyn FnOnce(&EventBus)>;

struct BusInner {
    topics: RefCell<HashMap<TypeId, Box<dyn TopicSlot>>>,
    pending: RefCell<VecDeque<Delivery>>,
    next_id: Cell<u64>,
    flushing: Cell<bool>,
}

//=========================================================================

/// Handle to a single-threaded publish/subscribe registry.
///
/// Cloning the handle is cheap and every clone refers to the same registry.
/// Components receive a handle at construction instead of reaching for a
/// global instance.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<BusInner>,
}

impl EventBus {
    /// Creates a new bus with no topics.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(BusInner {
                topics: RefCell::new(HashMap::new()),
                pending: RefCell::new(VecDeque::new()),
                next_id: Cell::new(0),
                flushing: Cell::new(false),
            }),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a handler for messages of type `M`.
    ///
    /// Handlers for one topic run in registration order. The handler stays
    /// registered for as long as the returned [`Subscription`] is alive.
    #[must_use = "dropping the Subscription immediately unregisters the handler"]
    pub fn subscribe<M, F>(&self, handler: F) -> Subscription
    where
        M: Message,
        F: FnMut(&M, &EventBus) + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let handler: Handler<M> = Rc::new(RefCell::new(handler));

        let mut topics = self.inner.topics.borrow_mut();
        let slot = topics
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Topic::<M>::new()));

        if let Some(topic) = slot.as_any_mut().downcast_mut::<Topic<M>>() {
            topic.push(id, handler);
        }

        trace!("Subscribed handler {:?} to {}", id, std::any::type_name::<M>());

        Subscription {
            bus: Rc::downgrade(&self.inner),
            topic: TypeId::of::<M>(),
            id: Some(id),
        }
    }

    /// Registers a buffering handler that stores a copy of every `M`.
    ///
    /// Used by components that process messages inside their own update,
    /// where they have access to other systems.
    pub fn inbox<M: Message + Clone>(&self) -> Inbox<M> {
        let buffer = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&buffer);

        let subscription = self.subscribe::<M, _>(move |msg, _| {
            sink.borrow_mut().push(msg.clone());
        });

        Inbox::new(buffer, subscription)
    }

    //--- Message Operations -----------------------------------------------

    /// Queues a message for delivery on the next [`flush`](Self::flush).
    pub fn publish<M: Message>(&self, msg: M) {
        self.inner
            .pending
            .borrow_mut()
            .push_back(Box::new(move |bus: &EventBus| bus.deliver(&msg)));
    }

    /// Delivers every queued message in FIFO order.
    ///
    /// Returns the number of messages delivered. Calling `flush` from inside
    /// a handler is a no-op; the outer flush picks up anything queued.
    pub fn flush(&self) -> usize {
        if self.inner.flushing.replace(true) {
            return 0;
        }

        let mut delivered = 0;

        while delivered < MAX_DELIVERIES_PER_FLUSH {
            // Release the queue borrow before running handlers
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(delivery) = next else {
                break;
            };

            delivery(self);
            delivered += 1;
        }

        if delivered >= MAX_DELIVERIES_PER_FLUSH && self.pending() > 0 {
            warn!(
                "Event flush stopped after {} deliveries with {} still pending",
                delivered,
                self.pending()
            );
        }

        self.inner.flushing.set(false);
        delivered
    }

    //--- Query API --------------------------------------------------------

    /// Returns the number of messages waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// Returns the number of handlers registered for `M`.
    pub fn subscriber_count<M: Message>(&self) -> usize {
        self.inner
            .topics
            .borrow()
            .get(&TypeId::of::<M>())
            .map(|slot| slot.len())
            .unwrap_or(0)
    }

    //--- Internal Helpers -------------------------------------------------

    fn deliver<M: Message>(&self, msg: &M) {
        let handlers = {
            let topics = self.inner.topics.borrow();
            match topics
                .get(&TypeId::of::<M>())
                .and_then(|slot| slot.as_any().downcast_ref::<Topic<M>>())
            {
                Some(topic) => topic.snapshot(),
                None => return,
            }
        };

        for (id, handler) in handlers {
            // An earlier handler may have dropped this subscription
            if !self.is_registered::<M>(id) {
                continue;
            }

            match handler.try_borrow_mut() {
                Ok(mut handler) => (*handler)(msg, self),
                Err(_) => warn!(
                    "Handler {:?} for {} is already running, skipping",
                    id,
                    std::any::type_name::<M>()
                ),
            }
        }
    }

    fn is_registered<M: Message>(&self, id: SubscriptionId) -> bool {
        self.inner
            .topics
            .borrow()
            .get(&TypeId::of::<M>())
            .map(|slot| slot.contains(id))
            .unwrap_or(false)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

//=== Subscription ========================================================

/// RAII registration guard returned by [`EventBus::subscribe`].
///
/// Dropping the guard (or calling [`cancel`](Self::cancel)) removes the
/// handler, so registration lasts exactly as long as the owning component.
#[derive(Debug)]
pub struct Subscription {
    bus: Weak<BusInner>,
    topic: TypeId,
    id: Option<SubscriptionId>,
}

impl Subscription {
    /// Returns the handler id, or `None` once cancelled.
    pub fn id(&self) -> Option<SubscriptionId> {
        self.id
    }

    /// Returns `true` while the handler is registered on a live bus.
    pub fn is_active(&self) -> bool {
        let (Some(id), Some(inner)) = (self.id, self.bus.upgrade()) else {
            return false;
        };
        let active = inner
            .topics
            .try_borrow()
            .map(|topics| topics.get(&self.topic).map(|s| s.contains(id)).unwrap_or(false))
            .unwrap_or(true);
        active
    }

    /// Unregisters the handler now. Later calls do nothing.
    pub fn cancel(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        let Some(inner) = self.bus.upgrade() else {
            return;
        };

        match inner.topics.try_borrow_mut() {
            Ok(mut topics) => {
                if let Some(slot) = topics.get_mut(&self.topic) {
                    slot.remove(id);
                }
            }
            Err(_) => warn!("Could not unregister handler {:?}: topics are busy", id),
        };
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

//=========================================================================
// Tests
//=========================================================================
