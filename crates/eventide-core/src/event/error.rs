//! Event system error types.
//!
//! Errors here are assertion-class: they indicate a programming error in
//! the embedding application (malformed buffers handed to
//! [`Event::deserialize`](crate::event::Event::deserialize)), not a runtime
//! condition the dispatcher recovers from. Scheduling-level conditions such
//! as a clock regression or a null event are reported through return
//! values on the dispatcher itself.

use thiserror::Error;

/// Shorthand for results in the event system.
pub type EventResult<T> = std::result::Result<T, EventError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    /// The buffer is too short to hold an event header.
    #[error("invalid event buffer: {size} bytes, need at least {need}")]
    BufferTooShort { size: usize, need: usize },

    /// The buffer's type ident does not match the receiving event.
    #[error("invalid event buffer: ident {found:#010x} does not match expected {expected:#010x}")]
    IdentMismatch { expected: u32, found: u32 },
}
