//! Tests for the connection registry and the bot directory.

use strictly_arena::{BotDirectory, ConnectionRegistry, Notifier};

#[test]
fn test_registry_delivers_to_registered_player() {
    let registry = ConnectionRegistry::new();
    let mut rx = registry.register("x");

    registry.send_to("x", "hello").expect("Send");
    assert_eq!(rx.try_recv().expect("Message queued"), "hello");
    assert!(registry.is_connected("x"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_registry_rejects_unknown_player() {
    let registry = ConnectionRegistry::new();
    assert!(registry.send_to("ghost", "hello").is_err());
}

#[test]
fn test_unregister_is_idempotent() {
    let registry = ConnectionRegistry::new();
    let _rx = registry.register("x");
    assert!(registry.unregister("x"));
    assert!(!registry.unregister("x"));
    assert!(registry.is_empty());
    assert!(registry.send_to("x", "late").is_err());
}

#[test]
fn test_closed_receiver_is_a_send_error() {
    let registry = ConnectionRegistry::new();
    drop(registry.register("x"));
    assert!(registry.send_to("x", "hello").is_err());
}

#[test]
fn test_send_to_all_skips_failures() {
    let registry = ConnectionRegistry::new();
    let mut a = registry.register("a");
    let mut b = registry.register("b");

    let recipients = ["a".to_string(), "gone".to_string(), "b".to_string()];
    registry.send_to_all(&recipients, "round over");

    assert_eq!(a.try_recv().expect("a notified"), "round over");
    assert_eq!(b.try_recv().expect("b notified"), "round over");
}

#[test]
fn test_broadcast_reaches_everyone() {
    let registry = ConnectionRegistry::new();
    let mut a = registry.register("a");
    let mut b = registry.register("b");

    registry.broadcast("server restarting");

    assert_eq!(a.try_recv().expect("a notified"), "server restarting");
    assert_eq!(b.try_recv().expect("b notified"), "server restarting");
}

#[test]
fn test_bot_list_is_capped_and_ordered() {
    let mut bots = BotDirectory::new(2);
    bots.register("1", "one");
    bots.register("2", "two");
    bots.register("3", "three");

    assert_eq!(bots.list_recent(), ["two (2)", "three (3)"]);

    bots.register("2", "deux");
    assert_eq!(bots.list_recent(), ["three (3)", "deux (2)"]);
    assert_eq!(bots.name_of("2"), Some("deux"));
}

#[test]
fn test_bot_unregister() {
    let mut bots = BotDirectory::new(10);
    bots.register("1", "one");
    assert_eq!(bots.unregister("1").as_deref(), Some("one"));
    assert_eq!(bots.unregister("1"), None);
    assert!(bots.list_recent().is_empty());
}
