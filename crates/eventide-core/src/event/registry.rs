use std::collections::BTreeMap;
use std::fmt;

use crate::event::types::{EventType, ListenerType};
use crate::event::EventListener;

/// Maps event types to their ordered listener lists.
///
/// Keyed by ident (the `EventType` ordering), so enumeration order is a
/// deterministic function of the idents involved and never of insertion
/// order. Within a single event type, listeners keep registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: BTreeMap<EventType, Vec<EventListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to `event_type`'s list. Re-registering an already
    /// present listener type replaces its callable in place, preserving the
    /// original position.
    pub fn connect(&mut self, event_type: EventType, listener: EventListener) {
        let entries = self.listeners.entry(event_type).or_default();
        match entries
            .iter_mut()
            .find(|entry| entry.listener_type == listener.listener_type)
        {
            Some(entry) => *entry = listener,
            None => entries.push(listener),
        }
    }

    /// Remove `listener_type` from `event_type`'s list. No-op when absent.
    pub fn disconnect(&mut self, event_type: &EventType, listener_type: &ListenerType) {
        if let Some(entries) = self.listeners.get_mut(event_type) {
            entries.retain(|entry| entry.listener_type != *listener_type);
            if entries.is_empty() {
                self.listeners.remove(event_type);
            }
        }
    }

    /// Remove `listener_type` from every event type's list.
    pub fn disconnect_from_all(&mut self, listener_type: &ListenerType) {
        self.listeners.retain(|_, entries| {
            entries.retain(|entry| entry.listener_type != *listener_type);
            !entries.is_empty()
        });
    }

    /// Snapshot of the listeners registered for `event_type`, in
    /// registration order. Stable across a single delivery.
    pub fn listeners(&self, event_type: &EventType) -> Vec<EventListener> {
        self.listeners
            .get(event_type)
            .map(|entries| entries.to_vec())
            .unwrap_or_default()
    }

    /// Event types with at least one registered listener, in ascending
    /// ident order.
    pub fn registered_events(&self) -> Vec<EventType> {
        self.listeners.keys().cloned().collect()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listener_count: usize = self.listeners.values().map(|entries| entries.len()).sum();
        f.debug_struct("ListenerRegistry")
            .field("event_types", &self.listeners.len())
            .field("listeners", &listener_count)
            .finish()
    }
}
