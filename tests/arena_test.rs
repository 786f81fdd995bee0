//! End-to-end tests for the arena: connect, play, disconnect.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use strictly_arena::{
    Arena, ArenaConfig, ConnectionRegistry, INVALID_CHOICE, NOT_SEATED, Notifier, NotifyError,
    PlayerId, RockPaperScissors,
};

/// Notifier that records every message per player.
#[derive(Debug, Default)]
struct RecordingNotifier {
    inbox: Mutex<HashMap<PlayerId, Vec<String>>>,
    offline: Mutex<Vec<PlayerId>>,
}

impl RecordingNotifier {
    fn messages(&self, player: &str) -> Vec<String> {
        self.inbox
            .lock()
            .expect("Inbox lock")
            .get(player)
            .cloned()
            .unwrap_or_default()
    }

    fn last(&self, player: &str) -> String {
        self.messages(player).pop().unwrap_or_default()
    }

    fn clear(&self) {
        self.inbox.lock().expect("Inbox lock").clear();
    }

    fn go_offline(&self, player: &str) {
        self.offline.lock().expect("Offline lock").push(player.to_string());
    }
}

impl Notifier for RecordingNotifier {
    fn send_to(&self, player: &str, text: &str) -> Result<(), NotifyError> {
        if self.offline.lock().expect("Offline lock").iter().any(|p| p == player) {
            return Err(NotifyError::new(format!("{player} is offline")));
        }
        self.inbox
            .lock()
            .expect("Inbox lock")
            .entry(player.to_string())
            .or_default()
            .push(text.to_string());
        Ok(())
    }

    fn connected(&self) -> Vec<PlayerId> {
        self.inbox.lock().expect("Inbox lock").keys().cloned().collect()
    }
}

fn arena(continuous: bool) -> (Arena<RockPaperScissors, RecordingNotifier>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let config = ArenaConfig::default().with_continuous_play(continuous);
    (
        Arena::new(RockPaperScissors, notifier.clone(), &config),
        notifier,
    )
}

#[test]
fn test_first_arrival_waits() {
    let (arena, notifier) = arena(true);
    let session = arena.handle_connect("x").expect("Placed");

    assert_eq!(
        notifier.messages("x"),
        [
            format!("Game {session}: Welcome! You are Player x."),
            format!("Game {session}: Waiting for more players to start the game..."),
        ]
    );
}

#[test]
fn test_second_arrival_starts_game_for_both() {
    let (arena, notifier) = arena(true);
    let session = arena.handle_connect("x").expect("x placed");
    assert_eq!(arena.handle_connect("y").as_ref(), Some(&session));

    let start = format!(
        "Game {session}: Game is starting. Please play 'rock', 'paper', or 'scissors'."
    );
    assert_eq!(notifier.last("x"), start);
    assert_eq!(notifier.last("y"), start);
    assert_eq!(
        notifier.messages("y")[0],
        format!("Game {session}: Welcome! You are Player y.")
    );
}

#[test]
fn test_scenario_rock_beats_scissors() {
    let (arena, notifier) = arena(false);
    let session = arena.handle_connect("x").expect("x placed");
    arena.handle_connect("y").expect("y placed");

    arena.handle_message("x", "rock");
    assert_eq!(
        notifier.last("x"),
        format!("Game {session}: You played rock. Waiting for your opponent...")
    );

    arena.handle_message("y", "  Scissors ");
    assert_eq!(notifier.last("x"), "Game over. You win. Opponent chose scissors.");
    assert_eq!(notifier.last("y"), "Game over. You lose. Opponent chose rock.");

    arena.with_directory(|directory| {
        assert!(directory.session(&session).is_none());
        assert_eq!(directory.session_count(), 0);
    });
}

#[test]
fn test_scenario_resubmission_overwrites() {
    let (arena, notifier) = arena(false);
    arena.handle_connect("x").expect("x placed");
    arena.handle_connect("y").expect("y placed");

    arena.handle_message("x", "rock");
    arena.handle_message("x", "paper");
    assert!(
        !notifier.last("x").starts_with("Game over"),
        "One player's repeated moves never resolve the round"
    );

    arena.handle_message("y", "rock");
    assert_eq!(notifier.last("x"), "Game over. You win. Opponent chose rock.");
    assert_eq!(notifier.last("y"), "Game over. You lose. Opponent chose paper.");
}

#[test]
fn test_continuous_play_starts_next_round() {
    let (arena, notifier) = arena(true);
    let first = arena.handle_connect("x").expect("x placed");
    arena.handle_connect("y").expect("y placed");
    notifier.clear();

    arena.handle_message("x", "paper");
    arena.handle_message("y", "paper");

    let next = arena
        .with_directory(|directory| directory.session_of("x").cloned())
        .expect("x re-seated");
    assert_ne!(next, first);

    let x_messages = notifier.messages("x");
    assert!(x_messages.contains(&"Game over. You draw. Opponent chose paper.".to_string()));
    assert_eq!(
        x_messages.last().cloned(),
        Some(format!(
            "Game {next}: Game is starting. Please play 'rock', 'paper', or 'scissors'."
        ))
    );
}

#[test]
fn test_invalid_move_changes_nothing() {
    let (arena, notifier) = arena(true);
    let session = arena.handle_connect("x").expect("x placed");
    arena.handle_connect("y").expect("y placed");

    arena.handle_message("x", "lizard");
    assert_eq!(notifier.last("x"), INVALID_CHOICE);
    arena.with_directory(|directory| {
        assert_eq!(directory.session(&session).map(|s| s.move_count()), Some(0));
    });
}

#[test]
fn test_move_while_waiting_is_refused() {
    let (arena, notifier) = arena(true);
    arena.handle_connect("x").expect("x placed");

    arena.handle_message("x", "rock");
    assert_eq!(
        notifier.last("x"),
        "The game has not started yet. Waiting for an opponent..."
    );
}

#[test]
fn test_move_from_unseated_player() {
    let (arena, notifier) = arena(true);
    arena.handle_message("nobody", "rock");
    assert_eq!(notifier.last("nobody"), NOT_SEATED);
}

#[test]
fn test_scenario_disconnect_requeues_opponent() {
    let (arena, notifier) = arena(true);
    let session = arena.handle_connect("x").expect("x placed");
    arena.handle_connect("y").expect("y placed");
    notifier.clear();

    arena.handle_disconnect("x");

    let y_messages = notifier.messages("y");
    assert_eq!(
        y_messages[0],
        format!("Game {session}: Player x has left the game. Waiting for a new opponent...")
    );
    arena.with_directory(|directory| {
        assert!(directory.session(&session).is_none());
        let requeued = directory.session_of("y").cloned().expect("y re-seated");
        assert_eq!(directory.waiting_sessions(), [requeued.clone()]);
        assert_eq!(directory.players_in(&requeued), ["y"]);
        assert_eq!(directory.session_count(), 1);
    });

    arena.handle_disconnect("x");
    arena.with_directory(|directory| assert_eq!(directory.session_count(), 1));

    let fresh = arena.handle_connect("z").expect("z placed");
    arena.with_directory(|directory| {
        assert_eq!(directory.session_of("y"), Some(&fresh), "z joins y");
    });
}

#[test]
fn test_disconnect_in_single_round_mode_leaves_opponent_unseated() {
    let (arena, notifier) = arena(false);
    let session = arena.handle_connect("x").expect("x placed");
    arena.handle_connect("y").expect("y placed");

    arena.handle_disconnect("y");

    assert_eq!(
        notifier.last("x"),
        format!("Game {session}: Player y has left the game. Reconnect to play again.")
    );
    arena.with_directory(|directory| {
        assert_eq!(directory.session_count(), 0);
        assert_eq!(directory.session_of("x"), None);
    });
}

#[test]
fn test_notifier_failure_does_not_affect_state() {
    let (arena, notifier) = arena(false);
    arena.handle_connect("x").expect("x placed");
    arena.handle_connect("y").expect("y placed");
    notifier.go_offline("y");

    arena.handle_message("x", "rock");
    arena.handle_message("y", "scissors");

    assert_eq!(notifier.last("x"), "Game over. You win. Opponent chose scissors.");
    arena.with_directory(|directory| assert_eq!(directory.session_count(), 0));
}

#[test]
fn test_bot_registration_and_listing() {
    let (arena, notifier) = arena(true);
    arena.handle_connect("x").expect("x placed");

    arena.handle_message("x", "register as Rocky");
    assert_eq!(notifier.last("x"), "Registered as Rocky.");

    arena.handle_message("x", "who's connected?");
    assert_eq!(notifier.last("x"), "Recent Connected bots: Rocky (x)");

    arena.handle_disconnect("x");
    arena.handle_connect("y").expect("y placed");
    arena.handle_message("y", "Who's connected?");
    assert_eq!(notifier.last("y"), "Recent Connected bots: ");
}

#[test]
fn test_direct_message_through_registry() {
    let registry = Arc::new(ConnectionRegistry::new());
    let arena = Arena::new(RockPaperScissors, registry.clone(), &ArenaConfig::default());

    let sender = "0b6c2b4e-54b5-4a8e-9d7f-2f4c1c7b9a10";
    let receiver = "6f1e8a57-3c2d-4b9e-8f0a-1d2c3b4a5e6f";
    let mut sender_rx = registry.register(sender);
    let mut receiver_rx = registry.register(receiver);

    arena.handle_message(sender, &format!("@{receiver} good game"));
    assert_eq!(
        receiver_rx.try_recv().expect("Direct message delivered"),
        format!("from: {sender}, message: good game")
    );

    registry.unregister(receiver);
    arena.handle_message(sender, &format!("@{receiver} still there?"));
    assert_eq!(
        sender_rx.try_recv().expect("Failure reported to sender"),
        format!("Unable to reach {receiver}.")
    );
}

#[test]
fn test_time_query() {
    let (arena, notifier) = arena(true);
    arena.handle_message("x", "What's the time?");
    assert!(notifier.last("x").starts_with("The time is "));
}
