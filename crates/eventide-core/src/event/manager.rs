use std::sync::Arc;

use async_trait::async_trait;

use crate::event::dispatcher::SharedEventDispatcher;
use crate::event::types::{EventType, ListenerType};
use crate::event::{BoxedEvent, EventListener};

/// Event manager interface: the dispatcher's full operation surface as a
/// trait, for embedders that wire components against an abstraction rather
/// than the concrete dispatcher.
#[async_trait]
pub trait EventManager: Send + Sync {
    /// Register a listener for an event type.
    async fn connect(&self, event_type: EventType, listener: EventListener);

    /// Remove a listener from one event type.
    async fn disconnect(&self, event_type: &EventType, listener_type: &ListenerType);

    /// Remove a listener from every event type.
    async fn disconnect_from_all(&self, listener_type: &ListenerType);

    /// Enqueue an event for delivery on a later tick.
    async fn notify(&self, event: Option<BoxedEvent>);

    /// Deliver an event immediately, bypassing the queue.
    async fn deliver(&self, event: Option<BoxedEvent>) -> bool;

    /// Advance the clock and deliver everything that has become due.
    async fn tick(&self, new_time: u64) -> bool;

    /// Whether any events are waiting in the queue.
    async fn has_events(&self) -> bool;

    /// The current logical time in milliseconds.
    async fn current_timestep(&self) -> u64;

    /// Snapshot of the listeners registered for an event type.
    async fn listeners(&self, event_type: &EventType) -> Vec<EventListener>;

    /// Event types with at least one registered listener.
    async fn registered_events(&self) -> Vec<EventType>;
}

/// Default implementation of [`EventManager`] backed by a
/// [`SharedEventDispatcher`].
#[derive(Clone, Debug)]
pub struct DefaultEventManager {
    dispatcher: Arc<SharedEventDispatcher>,
}

impl DefaultEventManager {
    pub fn new() -> Self {
        Self {
            dispatcher: Arc::new(SharedEventDispatcher::new()),
        }
    }

    /// Create a manager whose dispatcher is synchronized to an external
    /// clock.
    pub fn with_timestamp(current_time: u64) -> Self {
        Self {
            dispatcher: Arc::new(SharedEventDispatcher::with_timestamp(current_time)),
        }
    }

    /// The underlying dispatcher handle, for embedders that share it
    /// directly.
    pub fn dispatcher(&self) -> &Arc<SharedEventDispatcher> {
        &self.dispatcher
    }
}

#[async_trait]
impl EventManager for DefaultEventManager {
    async fn connect(&self, event_type: EventType, listener: EventListener) {
        self.dispatcher.connect(event_type, listener).await
    }

    async fn disconnect(&self, event_type: &EventType, listener_type: &ListenerType) {
        self.dispatcher.disconnect(event_type, listener_type).await
    }

    async fn disconnect_from_all(&self, listener_type: &ListenerType) {
        self.dispatcher.disconnect_from_all(listener_type).await
    }

    async fn notify(&self, event: Option<BoxedEvent>) {
        self.dispatcher.notify(event).await
    }

    async fn deliver(&self, event: Option<BoxedEvent>) -> bool {
        self.dispatcher.deliver(event).await
    }

    async fn tick(&self, new_time: u64) -> bool {
        self.dispatcher.tick(new_time).await
    }

    async fn has_events(&self) -> bool {
        self.dispatcher.has_events().await
    }

    async fn current_timestep(&self) -> u64 {
        self.dispatcher.current_timestep().await
    }

    async fn listeners(&self, event_type: &EventType) -> Vec<EventListener> {
        self.dispatcher.listeners(event_type).await
    }

    async fn registered_events(&self) -> Vec<EventType> {
        self.dispatcher.registered_events().await
    }
}

impl Default for DefaultEventManager {
    fn default() -> Self {
        Self::new()
    }
}
