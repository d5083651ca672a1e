use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::event::registry::ListenerRegistry;
use crate::event::tests::{MockEvent, MockListener};
use crate::event::types::{EventType, ListenerType};
use crate::event::EventListener;

#[test]
fn test_connect_listener_to_event() {
    let mut registry = ListenerRegistry::new();
    let listener = MockListener::new();

    registry.connect(EventType::new("test_event"), listener.listener("MockListener"));

    let listeners = registry.listeners(&EventType::new("test_event"));
    assert_eq!(listeners.len(), 1);
    assert_eq!(listeners[0].listener_type, ListenerType::new("MockListener"));
}

#[test]
fn test_connect_listener_to_two_events() {
    let mut registry = ListenerRegistry::new();
    let listener = MockListener::new();

    registry.connect(EventType::new("test_event1"), listener.listener("MockListener"));
    registry.connect(EventType::new("test_event2"), listener.listener("MockListener"));

    assert_eq!(registry.listeners(&EventType::new("test_event1")).len(), 1);
    assert_eq!(registry.listeners(&EventType::new("test_event2")).len(), 1);
}

#[test]
fn test_connect_two_listeners_preserves_registration_order() {
    let mut registry = ListenerRegistry::new();
    let listener1 = MockListener::new();
    let listener2 = MockListener::new();

    registry.connect(EventType::new("test_event"), listener1.listener("MockListener"));
    registry.connect(EventType::new("test_event"), listener2.listener("MockListenerAlt"));

    let listeners = registry.listeners(&EventType::new("test_event"));
    assert_eq!(listeners.len(), 2);
    assert_eq!(listeners[0].listener_type, ListenerType::new("MockListener"));
    assert_eq!(listeners[1].listener_type, ListenerType::new("MockListenerAlt"));
}

#[test]
fn test_reconnect_replaces_callable_in_place() {
    let mut registry = ListenerRegistry::new();
    let calls = Arc::new(AtomicU32::new(0));

    let first = Arc::clone(&calls);
    registry.connect(
        EventType::new("test_event"),
        EventListener::new(ListenerType::new("MockListener"), move |_| {
            first.fetch_add(1, Ordering::SeqCst);
            true
        }),
    );
    registry.connect(
        EventType::new("test_event"),
        EventListener::new(ListenerType::new("Tail"), |_| true),
    );

    // Re-register the same listener type with a new callable.
    let second = Arc::clone(&calls);
    registry.connect(
        EventType::new("test_event"),
        EventListener::new(ListenerType::new("MockListener"), move |_| {
            second.fetch_add(100, Ordering::SeqCst);
            true
        }),
    );

    let listeners = registry.listeners(&EventType::new("test_event"));
    assert_eq!(listeners.len(), 2, "re-registration must not grow the list");
    assert_eq!(
        listeners[0].listener_type,
        ListenerType::new("MockListener"),
        "re-registration must keep the original position"
    );

    let event = MockEvent::new(0, 0);
    (listeners[0].callback)(&event);
    assert_eq!(calls.load(Ordering::SeqCst), 100, "old callable must be gone");
}

#[test]
fn test_disconnect_listener_from_event() {
    let mut registry = ListenerRegistry::new();
    let listener1 = MockListener::new();
    let listener2 = MockListener::new();

    registry.connect(EventType::new("test_event"), listener1.listener("MockListener"));
    registry.connect(EventType::new("test_event"), listener2.listener("MockListenerAlt"));
    assert_eq!(registry.listeners(&EventType::new("test_event")).len(), 2);

    registry.disconnect(&EventType::new("test_event"), &ListenerType::new("MockListener"));

    let listeners = registry.listeners(&EventType::new("test_event"));
    assert_eq!(listeners.len(), 1);
    assert_eq!(listeners[0].listener_type, ListenerType::new("MockListenerAlt"));
}

#[test]
fn test_disconnect_absent_listener_is_noop() {
    let mut registry = ListenerRegistry::new();
    registry.disconnect(&EventType::new("test_event"), &ListenerType::new("MockListener"));
    assert!(registry.listeners(&EventType::new("test_event")).is_empty());
}

#[test]
fn test_disconnect_from_all_events() {
    let mut registry = ListenerRegistry::new();
    let listener1 = MockListener::new();
    let listener2 = MockListener::new();

    registry.connect(EventType::new("test_event1"), listener1.listener("MockListener"));
    registry.connect(EventType::new("test_event1"), listener2.listener("MockListenerAlt"));
    registry.connect(EventType::new("test_event2"), listener1.listener("MockListener"));
    registry.connect(EventType::new("test_event2"), listener2.listener("MockListenerAlt"));

    registry.disconnect_from_all(&ListenerType::new("MockListener"));

    let listeners1 = registry.listeners(&EventType::new("test_event1"));
    let listeners2 = registry.listeners(&EventType::new("test_event2"));
    assert_eq!(listeners1.len(), 1);
    assert_eq!(listeners2.len(), 1);
    assert_eq!(listeners1[0].listener_type, ListenerType::new("MockListenerAlt"));
    assert_eq!(listeners2[0].listener_type, ListenerType::new("MockListenerAlt"));
}

#[test]
fn test_registered_events_enumerates_in_ident_order() {
    let mut registry = ListenerRegistry::new();
    let listener = MockListener::new();

    registry.connect(EventType::new("test_event1"), listener.listener("MockListener"));
    registry.connect(EventType::new("test_event2"), listener.listener("MockListener"));
    registry.connect(EventType::new("test_event3"), listener.listener("MockListener"));

    let event_types = registry.registered_events();
    assert_eq!(event_types.len(), 3);

    // Order follows ident bucketing, not insertion: test_event3 hashes
    // below test_event2.
    assert_eq!(event_types[0], EventType::new("test_event1"));
    assert_eq!(event_types[1], EventType::new("test_event3"));
    assert_eq!(event_types[2], EventType::new("test_event2"));

    let idents: Vec<u32> = event_types.iter().map(|t| t.ident()).collect();
    let mut sorted = idents.clone();
    sorted.sort();
    assert_eq!(idents, sorted);
}

#[test]
fn test_registered_events_prunes_emptied_types() {
    let mut registry = ListenerRegistry::new();
    let listener = MockListener::new();

    registry.connect(EventType::new("test_event1"), listener.listener("MockListener"));
    registry.connect(EventType::new("test_event2"), listener.listener("MockListener"));
    registry.disconnect(&EventType::new("test_event1"), &ListenerType::new("MockListener"));

    let event_types = registry.registered_events();
    assert_eq!(event_types, vec![EventType::new("test_event2")]);
}
