mod registry_tests;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::event::error::{EventError, EventResult};
use crate::event::types::{EventType, ListenerType};
use crate::event::{Event, EventData, EventListener};

/// Test event with a small integer payload.
#[derive(Debug)]
pub(crate) struct MockEvent {
    data: EventData,
    some_event_val: i32,
}

impl MockEvent {
    pub fn new(subject: u64, delay_ms: u64) -> Self {
        Self {
            data: EventData::new(EventType::new("mock_event"), subject, delay_ms),
            some_event_val: 0,
        }
    }

    pub fn with_callback<F>(subject: u64, delay_ms: u64, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            data: EventData::with_callback(EventType::new("mock_event"), subject, delay_ms, callback),
            some_event_val: 0,
        }
    }

    pub fn some_event_val(&self) -> i32 {
        self.some_event_val
    }

    pub fn set_some_event_val(&mut self, some_event_val: i32) {
        self.some_event_val = some_event_val;
    }
}

impl Event for MockEvent {
    fn data(&self) -> &EventData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut EventData {
        &mut self.data
    }

    fn on_serialize(&self, out: &mut BytesMut) {
        out.put_i32_le(self.some_event_val);
    }

    fn on_deserialize(&mut self, buf: &mut Bytes) -> EventResult<()> {
        let size = buf.remaining();
        if size < 4 {
            return Err(EventError::BufferTooShort { size, need: 4 });
        }
        self.some_event_val = buf.get_i32_le();
        Ok(())
    }

    fn on_consume(&self, _handled: bool) -> bool {
        true
    }
}

/// A listener that records whether it was ever invoked.
pub(crate) struct MockListener {
    triggered: Arc<AtomicBool>,
}

impl MockListener {
    pub fn new() -> Self {
        Self {
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// An [`EventListener`] registration for this mock under `name`.
    pub fn listener(&self, name: &str) -> EventListener {
        let triggered = Arc::clone(&self.triggered);
        EventListener::new(ListenerType::new(name), move |_event| {
            triggered.store(true, Ordering::SeqCst);
            true
        })
    }
}
