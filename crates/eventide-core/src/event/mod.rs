pub mod dispatcher;
pub mod error;
pub mod manager;
pub mod queue;
pub mod registry;
pub mod types;

use std::fmt;
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::event::error::{EventError, EventResult};
use crate::event::types::EventType;

/// Type for boxed events owned by whoever currently holds them: the
/// producer before `notify`, the queue while enqueued, the dispatcher
/// during delivery.
pub type BoxedEvent = Box<dyn Event>;

/// Completion callback attached to an event at construction, invoked once
/// after successful consumption.
pub type EventCallback = Arc<dyn Fn() + Send + Sync>;

/// Listener callable. Returns `true` when the event was handled; `false`
/// means the listener rejected or failed to handle it.
pub type ListenerCallback = Arc<dyn Fn(&dyn Event) -> bool + Send + Sync>;

/// A registered listener: a stable identity plus the callable invoked on
/// delivery. A given listener type appears at most once per event type.
#[derive(Clone)]
pub struct EventListener {
    pub listener_type: types::ListenerType,
    pub callback: ListenerCallback,
}

impl EventListener {
    pub fn new<F>(listener_type: types::ListenerType, callback: F) -> Self
    where
        F: Fn(&dyn Event) -> bool + Send + Sync + 'static,
    {
        Self {
            listener_type,
            callback: Arc::new(callback),
        }
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("listener_type", &self.listener_type)
            .finish_non_exhaustive()
    }
}

/// State common to every event: type, subject, scheduling fields, the
/// optional chained successor and the optional completion callback.
///
/// Concrete event types embed one of these and hand it back through
/// [`Event::data`] / [`Event::data_mut`].
pub struct EventData {
    event_type: EventType,
    subject: u64,
    timestamp: u64,
    delay_ms: u64,
    priority: i32,
    next: Option<BoxedEvent>,
    callback: Option<EventCallback>,
}

impl EventData {
    /// Create event state for `event_type` concerning `subject`, to be
    /// delivered `delay_ms` milliseconds after it is enqueued. The
    /// timestamp stays 0 until the dispatcher stamps it.
    pub fn new(event_type: EventType, subject: u64, delay_ms: u64) -> Self {
        Self {
            event_type,
            subject,
            timestamp: 0,
            delay_ms,
            priority: 0,
            next: None,
            callback: None,
        }
    }

    /// Same as [`EventData::new`] with a completion callback invoked once
    /// after the event is successfully consumed.
    pub fn with_callback<F>(event_type: EventType, subject: u64, delay_ms: u64, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut data = Self::new(event_type, subject, delay_ms);
        data.callback = Some(Arc::new(callback));
        data
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn subject(&self) -> u64 {
        self.subject
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Stamping is the dispatcher's job; producers observe a timestamp of 0
    /// until the event has been enqueued or delivered.
    pub(crate) fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Adjust the scheduling priority. Negative values deliver earlier.
    /// Has no effect once the event has been enqueued (ownership has moved
    /// to the dispatcher by then).
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn next(&self) -> Option<&BoxedEvent> {
        self.next.as_ref()
    }

    /// Chain a successor event, enqueued after this event is delivered.
    pub fn set_next(&mut self, next: BoxedEvent) {
        self.next = Some(next);
    }

    pub(crate) fn take_next(&mut self) -> Option<BoxedEvent> {
        self.next.take()
    }

    pub(crate) fn callback(&self) -> Option<&EventCallback> {
        self.callback.as_ref()
    }

    /// Composite scheduling weight: `timestamp + delay + priority`,
    /// saturating at the `u64` bounds.
    pub fn weight(&self) -> u64 {
        self.timestamp
            .saturating_add(self.delay_ms)
            .saturating_add_signed(self.priority as i64)
    }
}

impl fmt::Debug for EventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventData")
            .field("event_type", &self.event_type)
            .field("subject", &self.subject)
            .field("timestamp", &self.timestamp)
            .field("delay_ms", &self.delay_ms)
            .field("priority", &self.priority)
            .field("chained", &self.next.is_some())
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Core event trait.
///
/// Concrete event types supply their shared state through `data`/`data_mut`
/// and customize behavior through the three hooks; the wire framing and the
/// consumption protocol are provided methods so every event serializes and
/// completes the same way.
pub trait Event: fmt::Debug + Send + Sync {
    /// Shared event state.
    fn data(&self) -> &EventData;

    /// Mutable shared event state.
    fn data_mut(&mut self) -> &mut EventData;

    /// Append this event's payload bytes after the type ident.
    fn on_serialize(&self, out: &mut BytesMut);

    /// Consume this event's payload bytes. The type ident has already been
    /// read and verified.
    fn on_deserialize(&mut self, buf: &mut Bytes) -> EventResult<()>;

    /// Decide whether consumption succeeded. `handled` is the AND of all
    /// listener results. Returning `true` fires the completion callback.
    fn on_consume(&self, handled: bool) -> bool;

    /// Discriminator used for dispatch.
    fn event_type(&self) -> &EventType {
        self.data().event_type()
    }

    /// Scheduling weight of this event. See [`EventData::weight`].
    fn weight(&self) -> u64 {
        self.data().weight()
    }

    /// Write the 32-bit type ident followed by the payload bytes.
    fn serialize(&self, out: &mut BytesMut) {
        out.put_u32_le(self.event_type().ident());
        self.on_serialize(out);
    }

    /// Read and verify the 32-bit type ident, then hand the remainder to
    /// the payload hook. On error the event is left unmodified.
    fn deserialize(&mut self, buf: &mut Bytes) -> EventResult<()> {
        let size = buf.remaining();
        if size < 4 {
            return Err(EventError::BufferTooShort { size, need: 4 });
        }
        let expected = self.event_type().ident();
        let found = buf.get_u32_le();
        if found != expected {
            return Err(EventError::IdentMismatch { expected, found });
        }
        self.on_deserialize(buf)
    }

    /// Invoked by the dispatcher after all listeners have run. When the
    /// consumption hook accepts, the completion callback fires exactly once.
    fn consume(&self, handled: bool) {
        if self.on_consume(handled) {
            if let Some(callback) = self.data().callback() {
                callback();
            }
        }
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
