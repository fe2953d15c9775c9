//=========================================================================
// Message Bus
//=========================================================================
//
// Typed publish/subscribe used by every puzzle component to talk to the
// others without holding references to them.
//
// Architecture:
//   EventBus (Rc handle)
//     ├─ topics: HashMap<TypeId, Box<dyn TopicSlot>>
//     └─ pending: VecDeque<delivery>
//
// Flow:
//   subscribe() → Subscription guard
//   publish()   → pending
//   flush()     → handlers (registration order) / Inbox buffers
//
//=========================================================================

//=== Module Declarations =================================================

mod event_bus;
mod inbox;
mod topic;

//=== Public API ==========================================================

pub use event_bus::{EventBus, Message, Subscription};
pub use inbox::Inbox;
pub use topic::SubscriptionId;
