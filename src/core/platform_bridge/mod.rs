//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the window thread and the scene's logic thread.
//
// Components:
// - `interface`: message and error types that cross the boundary
// - `event_collector`: logic-side draining of the channel per tick
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::PlatformEvent;

//=== Public API ==========================================================

pub use interface::PlatformError;
