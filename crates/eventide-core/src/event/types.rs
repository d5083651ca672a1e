use std::fmt;
use std::hash::{Hash, Hasher};

use bytes::{Bytes, BytesMut};

use crate::event::error::EventResult;
use crate::event::{Event, EventData};

/// Name of the reserved wildcard event type. Listeners connected to it
/// receive every delivered event regardless of the event's own type.
pub const WILDCARD_NAME: &str = "*";

/// Ident of the wildcard event type: `crc32(b"*")`. Reserved; no other
/// name may occupy it.
pub const WILDCARD_IDENT: u32 = 0x09B9_265B;

/// Stable 32-bit ident of a human-readable name (IEEE CRC-32).
fn hash_name(name: &str) -> u32 {
    crc32fast::hash(name.as_bytes())
}

/// Identifies a kind of event. Constructed ad-hoc from a name at any call
/// site; equality, hashing, and ordering derive from the 32-bit ident
/// alone, so comparisons never touch the name string.
#[derive(Debug, Clone)]
pub struct EventType {
    name: String,
    ident: u32,
}

impl EventType {
    /// Construct from a name.
    ///
    /// # Panics
    ///
    /// Panics when a non-wildcard name hashes to the reserved wildcard
    /// ident. Such a name cannot be dispatched unambiguously and indicates
    /// a programming error.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let ident = hash_name(&name);
        assert!(
            ident != WILDCARD_IDENT || name == WILDCARD_NAME,
            "event type name {name:?} collides with the reserved wildcard ident"
        );
        Self { name, ident }
    }

    /// The reserved wildcard event type.
    pub fn wildcard() -> Self {
        Self {
            name: WILDCARD_NAME.to_string(),
            ident: WILDCARD_IDENT,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.ident == WILDCARD_IDENT
    }

    /// The name this type was constructed from. Retained for diagnostics
    /// only; identity lives in the ident.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ident(&self) -> u32 {
        self.ident
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.ident == other.ident
    }
}

impl Eq for EventType {}

impl PartialOrd for EventType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ident.cmp(&other.ident)
    }
}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ident.hash(state);
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Identifies a registered listener within an event type's listener list.
/// Same hashing contract as [`EventType`].
#[derive(Debug, Clone)]
pub struct ListenerType {
    name: String,
    ident: u32,
}

impl ListenerType {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let ident = hash_name(&name);
        Self { name, ident }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ident(&self) -> u32 {
        self.ident
    }
}

impl PartialEq for ListenerType {
    fn eq(&self, other: &Self) -> bool {
        self.ident == other.ident
    }
}

impl Eq for ListenerType {}

impl Hash for ListenerType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ident.hash(state);
    }
}

impl fmt::Display for ListenerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A payload-less event used for plain signaling. Serialization carries
/// only the type ident, and consumption always succeeds.
#[derive(Debug)]
pub struct SimpleEvent {
    data: EventData,
}

impl SimpleEvent {
    pub fn new(event_type: EventType, subject: u64, delay_ms: u64) -> Self {
        Self {
            data: EventData::new(event_type, subject, delay_ms),
        }
    }

    pub fn with_callback<F>(event_type: EventType, subject: u64, delay_ms: u64, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            data: EventData::with_callback(event_type, subject, delay_ms, callback),
        }
    }
}

impl Event for SimpleEvent {
    fn data(&self) -> &EventData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut EventData {
        &mut self.data
    }

    fn on_serialize(&self, _out: &mut BytesMut) {}

    fn on_deserialize(&mut self, _buf: &mut Bytes) -> EventResult<()> {
        Ok(())
    }

    fn on_consume(&self, _handled: bool) -> bool {
        true
    }
}
