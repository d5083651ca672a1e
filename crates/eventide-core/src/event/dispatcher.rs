use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::event::queue::EventQueue;
use crate::event::registry::ListenerRegistry;
use crate::event::types::{EventType, ListenerType};
use crate::event::{BoxedEvent, EventListener};

//--------------------------------------------------
// EventDispatcher (internal, wrapped by SharedEventDispatcher)
//--------------------------------------------------

/// The dispatch core: listener registry, pending-event queue, and the
/// logical clock they are coordinated by.
///
/// All state is plain and single-threaded; concurrent embedders go through
/// [`SharedEventDispatcher`], which serializes every operation. A listener
/// that panics unwinds out of [`deliver`](EventDispatcher::deliver) or
/// [`tick`](EventDispatcher::tick); the event in flight is dropped, the
/// registry and queue stay intact.
pub struct EventDispatcher {
    registry: ListenerRegistry,
    queue: EventQueue,
    current_time: u64,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("registry", &self.registry)
            .field("queue", &self.queue)
            .field("current_time", &self.current_time)
            .finish()
    }
}

impl EventDispatcher {
    /// Create a dispatcher with the clock at 0.
    pub fn new() -> Self {
        Self::with_timestamp(0)
    }

    /// Create a dispatcher synchronized to an external clock.
    pub fn with_timestamp(current_time: u64) -> Self {
        Self {
            registry: ListenerRegistry::new(),
            queue: EventQueue::new(),
            current_time,
        }
    }

    /// Register `listener` for `event_type`. Connecting to the wildcard
    /// event type subscribes the listener to every delivery.
    pub fn connect(&mut self, event_type: EventType, listener: EventListener) {
        self.registry.connect(event_type, listener);
    }

    /// Remove a listener from one event type. No-op when absent.
    pub fn disconnect(&mut self, event_type: &EventType, listener_type: &ListenerType) {
        self.registry.disconnect(event_type, listener_type);
    }

    /// Remove a listener from every event type.
    pub fn disconnect_from_all(&mut self, listener_type: &ListenerType) {
        self.registry.disconnect_from_all(listener_type);
    }

    /// Stamp `event` with the current time and enqueue it for delivery on
    /// a later [`tick`](EventDispatcher::tick). `None` is a no-op.
    pub fn notify(&mut self, event: Option<BoxedEvent>) {
        if let Some(event) = event {
            self.enqueue(event);
        }
    }

    /// Deliver `event` to its listeners immediately, bypassing the queue.
    ///
    /// Returns `false` for `None`, `true` otherwise; delivery to zero
    /// listeners still counts as delivered. A chained successor is
    /// enqueued, not delivered; it goes out on a subsequent tick.
    pub fn deliver(&mut self, event: Option<BoxedEvent>) -> bool {
        let Some(mut event) = event else {
            return false;
        };
        event.data_mut().set_timestamp(self.current_time);
        self.dispatch(event);
        true
    }

    /// Advance the clock to `new_time` and deliver every queued event
    /// whose weight has become due, in weight order.
    ///
    /// Returns `false` and changes nothing when `new_time` is behind the
    /// current timestep; the clock is monotonic and a regression is a
    /// caller bug.
    pub fn tick(&mut self, new_time: u64) -> bool {
        if new_time < self.current_time {
            log::warn!(
                "rejecting tick to {} behind current timestep {}",
                new_time,
                self.current_time
            );
            return false;
        }
        self.current_time = new_time;

        // Chained successors enqueued mid-drain re-enter the queue with
        // the current timestamp, so a zero-weight chain drains in the same
        // tick. Chains are finite: `next` is owned, cycles cannot form.
        while let Some(event) = self.queue.pop_due(self.current_time) {
            self.dispatch(event);
        }
        true
    }

    /// Whether any events are waiting in the queue.
    pub fn has_events(&self) -> bool {
        !self.queue.is_empty()
    }

    /// The dispatcher's current logical time in milliseconds.
    pub fn current_timestep(&self) -> u64 {
        self.current_time
    }

    /// Snapshot of the listeners registered for `event_type`.
    pub fn listeners(&self, event_type: &EventType) -> Vec<EventListener> {
        self.registry.listeners(event_type)
    }

    /// Event types with at least one registered listener, in ascending
    /// ident order.
    pub fn registered_events(&self) -> Vec<EventType> {
        self.registry.registered_events()
    }

    fn enqueue(&mut self, mut event: BoxedEvent) {
        event.data_mut().set_timestamp(self.current_time);
        log::trace!(
            "queueing {} event, weight {}",
            event.event_type(),
            event.weight()
        );
        self.queue.push(event);
    }

    /// Delivery protocol for an already-stamped event: type-specific
    /// listeners in registration order, then the wildcard bucket, no
    /// short-circuit; consumption; then the chained successor, if any,
    /// re-enters the queue.
    fn dispatch(&mut self, mut event: BoxedEvent) {
        let mut targets = self.registry.listeners(event.event_type());
        if !event.event_type().is_wildcard() {
            targets.extend(self.registry.listeners(&EventType::wildcard()));
        }
        log::trace!(
            "delivering {} event to {} listener(s)",
            event.event_type(),
            targets.len()
        );

        let mut handled = true;
        for listener in &targets {
            handled &= (listener.callback)(event.as_ref());
        }

        event.consume(handled);

        if let Some(next) = event.data_mut().take_next() {
            self.enqueue(next);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------
// SharedEventDispatcher (public async surface)
//--------------------------------------------------

/// Thread-safe shared dispatcher.
///
/// All operations are serialized onto one logical stream through a single
/// async mutex, so registry mutations, enqueues, and listener invocations
/// never interleave. Each method returns a future the caller blocks on to
/// observe completion and the result; from synchronous code, use
/// `tokio::runtime::Handle::block_on`. Clones share state.
#[derive(Clone)]
pub struct SharedEventDispatcher {
    inner: Arc<Mutex<EventDispatcher>>,
}

impl fmt::Debug for SharedEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEventDispatcher").finish_non_exhaustive()
    }
}

impl SharedEventDispatcher {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventDispatcher::new())),
        }
    }

    pub fn with_timestamp(current_time: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventDispatcher::with_timestamp(current_time))),
        }
    }

    pub async fn connect(&self, event_type: EventType, listener: EventListener) {
        self.inner.lock().await.connect(event_type, listener);
    }

    pub async fn disconnect(&self, event_type: &EventType, listener_type: &ListenerType) {
        self.inner.lock().await.disconnect(event_type, listener_type);
    }

    pub async fn disconnect_from_all(&self, listener_type: &ListenerType) {
        self.inner.lock().await.disconnect_from_all(listener_type);
    }

    pub async fn notify(&self, event: Option<BoxedEvent>) {
        self.inner.lock().await.notify(event);
    }

    pub async fn deliver(&self, event: Option<BoxedEvent>) -> bool {
        self.inner.lock().await.deliver(event)
    }

    pub async fn tick(&self, new_time: u64) -> bool {
        self.inner.lock().await.tick(new_time)
    }

    pub async fn has_events(&self) -> bool {
        self.inner.lock().await.has_events()
    }

    pub async fn current_timestep(&self) -> u64 {
        self.inner.lock().await.current_timestep()
    }

    pub async fn listeners(&self, event_type: &EventType) -> Vec<EventListener> {
        self.inner.lock().await.listeners(event_type)
    }

    pub async fn registered_events(&self) -> Vec<EventType> {
        self.inner.lock().await.registered_events()
    }
}

impl Default for SharedEventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a new shared event dispatcher instance.
pub fn create_dispatcher() -> SharedEventDispatcher {
    SharedEventDispatcher::new()
}
