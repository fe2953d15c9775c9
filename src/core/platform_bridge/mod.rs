//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the windowing thread and the core thread:
// - `interface`: the messages crossing the channel
// - `event_collector`: core-side draining and batching
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::PlatformEvent;
