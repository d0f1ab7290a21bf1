//! State-changed signals and the pub/sub plumbing that carries them.
//!
//! Mutators never redraw anything themselves. They publish a [`ShopEvent`] once the new
//! state is persisted; whatever renders the storefront subscribes and redraws the
//! [`View`]s the event names.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::{ShopEvent, View};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
