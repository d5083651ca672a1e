//! Event dispatch core for simulation and game servers.
//!
//! Components publish typed events through a dispatcher; other components
//! subscribe by name and receive them on a deterministic, priority-ordered,
//! delay-honoring timeline driven by [`EventDispatcher::tick`].

pub mod event;

// Re-export the key public types for easier use by embedding applications.
pub use event::dispatcher::{create_dispatcher, EventDispatcher, SharedEventDispatcher};
pub use event::error::{EventError, EventResult};
pub use event::manager::{DefaultEventManager, EventManager};
pub use event::types::{EventType, ListenerType, SimpleEvent, WILDCARD_IDENT, WILDCARD_NAME};
pub use event::{BoxedEvent, Event, EventCallback, EventData, EventListener, ListenerCallback};
