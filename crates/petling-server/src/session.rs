//! Session registry and command dispatch
//!
//! The session manager owns one [`PetState`] per connected client and is the
//! only place that mutates them. It is fully synchronous with an injected
//! [`Clock`], so every rule here is testable with a [`ManualClock`] and no
//! real timers or sockets.
//!
//! Ordering rule: a command always tick-applies the decay owed since the
//! last interaction *before* its own effect, so the total order is
//! decay-then-command, never command-then-stale-decay.
//!
//! [`ManualClock`]: petling_core::ManualClock

use crate::error::{Error, Result};
use petling_core::{tick, Clock, PetState};
use petling_proto::{Command, Event};
use std::collections::HashMap;
use std::fmt;

/// Process-unique session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The server-side binding of one connection to one pet
#[derive(Debug)]
pub struct Session {
    pet: PetState,
}

impl Session {
    /// The pet owned by this session
    pub fn pet(&self) -> &PetState {
        &self.pet
    }
}

/// What a handled frame asks the transport to do
#[derive(Debug)]
pub struct CommandOutcome {
    /// Replies for the issuing client, in send order
    pub events: Vec<Event>,
    /// Close the connection once the replies are flushed
    pub close: bool,
}

impl CommandOutcome {
    fn reply(events: Vec<Event>) -> Self {
        Self {
            events,
            close: false,
        }
    }
}

/// Registry of live sessions, keyed by [`SessionId`]
///
/// Identifiers are unique for the process lifetime. Sessions are created on
/// connect and dropped on disconnect; nothing persists.
pub struct SessionManager<C: Clock> {
    clock: C,
    next_id: u64,
    sessions: HashMap<SessionId, Session>,
}

impl<C: Clock> SessionManager<C> {
    /// Create an empty registry driven by `clock`
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            sessions: HashMap::new(),
        }
    }

    /// The injected clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are live
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The pet behind `id`, if the session is live
    pub fn pet(&self, id: SessionId) -> Option<&PetState> {
        self.sessions.get(&id).map(Session::pet)
    }

    /// Open a session with a freshly adopted pet
    pub fn connect(&mut self) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        let pet = PetState::new(self.clock.now_millis());
        self.sessions.insert(id, Session { pet });
        id
    }

    /// Drop a session; safe to call again after it is gone
    pub fn disconnect(&mut self, id: SessionId) {
        self.sessions.remove(&id);
    }

    /// Handle one inbound frame from `id`
    ///
    /// Returns [`Error::UnknownSession`] when the session is already gone
    /// (a disconnect race); callers drop the frame without answering.
    /// Malformed frames and domain rejections answer with a 400 status and
    /// leave the pet untouched.
    pub fn handle_line(&mut self, id: SessionId, line: &str) -> Result<CommandOutcome> {
        let now = self.clock.now_millis();
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(Error::UnknownSession(id))?;

        let command = match Command::decode(line) {
            Ok(command) => command,
            Err(err) => {
                // Frame never touched the pet; answer and keep the session
                return Ok(CommandOutcome::reply(vec![Event::status(
                    400,
                    err.to_string(),
                    None,
                )]));
            }
        };

        // Settle the decay owed since the last interaction first
        tick(&mut session.pet, now);

        let outcome = match command {
            Command::Connect => CommandOutcome::reply(vec![
                Event::update(&session.pet),
                Event::status(200, "Connected successfully", Some(Command::Connect)),
            ]),
            Command::Feed => {
                session.pet.feed();
                CommandOutcome::reply(vec![
                    Event::update(&session.pet),
                    Event::status(200, "Fed the pet successfully", Some(Command::Feed)),
                ])
            }
            Command::Coffee => match session.pet.give_coffee() {
                Ok(()) => CommandOutcome::reply(vec![
                    Event::update(&session.pet),
                    Event::status(200, "Served coffee successfully", Some(Command::Coffee)),
                ]),
                Err(err) => CommandOutcome::reply(vec![Event::status(
                    400,
                    err.to_string(),
                    Some(Command::Coffee),
                )]),
            },
            Command::Disconnect => CommandOutcome {
                events: vec![Event::status(
                    200,
                    "Disconnected successfully",
                    Some(Command::Disconnect),
                )],
                close: true,
            },
        };
        Ok(outcome)
    }

    /// Apply decay to every live session and collect the unconditional
    /// snapshot pushes, so all connected observers converge on server time
    ///
    /// Results are ordered by session id for deterministic delivery.
    pub fn tick_all(&mut self) -> Vec<(SessionId, Event)> {
        let now = self.clock.now_millis();
        let mut pushes: Vec<(SessionId, Event)> = self
            .sessions
            .iter_mut()
            .map(|(id, session)| {
                tick(&mut session.pet, now);
                (*id, Event::update(&session.pet))
            })
            .collect();
        pushes.sort_by_key(|(id, _)| *id);
        pushes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petling_core::{ManualClock, Mood};
    use petling_proto::Snapshot;

    fn manager() -> SessionManager<ManualClock> {
        SessionManager::new(ManualClock::new(0))
    }

    fn expect_update(event: &Event) -> Snapshot {
        match event {
            Event::Update(snapshot) => *snapshot,
            other => panic!("expected update, got {other:?}"),
        }
    }

    fn expect_status(event: &Event) -> (u16, &str, Option<&str>) {
        match event {
            Event::Status {
                code,
                message,
                action,
            } => (*code, message.as_str(), action.as_deref()),
            other => panic!("expected status, got {other:?}"),
        }
    }

    #[test]
    fn test_connect_creates_fresh_pet() {
        let mut manager = manager();
        let id = manager.connect();
        let pet = manager.pet(id).unwrap();
        assert_eq!(pet.hunger, 100.0);
        assert_eq!(pet.happiness, 100.0);
        assert_eq!(pet.sleepiness, 0.0);
        assert_eq!(pet.mood, Mood::Normal);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let mut manager = manager();
        let first = manager.connect();
        let second = manager.connect();
        manager.disconnect(first);
        let third = manager.connect();
        assert_ne!(first, second);
        assert_ne!(first, third);
        assert_ne!(second, third);
    }

    #[test]
    fn test_connect_command_replies_update_then_status() {
        let mut manager = manager();
        let id = manager.connect();
        let outcome = manager.handle_line(id, "CONNECT").unwrap();
        assert_eq!(outcome.events.len(), 2);
        assert!(!outcome.close);

        let snapshot = expect_update(&outcome.events[0]);
        assert_eq!(snapshot.hunger, 100);

        let (code, _, action) = expect_status(&outcome.events[1]);
        assert_eq!(code, 200);
        assert_eq!(action, Some("CONNECT"));
    }

    #[test]
    fn test_feed_on_fresh_pet_stays_clamped() {
        let mut manager = manager();
        let id = manager.connect();
        let outcome = manager.handle_line(id, "FEED").unwrap();

        let snapshot = expect_update(&outcome.events[0]);
        assert_eq!(snapshot.hunger, 100);
        assert_eq!(snapshot.happiness, 100);

        let (code, _, action) = expect_status(&outcome.events[1]);
        assert_eq!(code, 200);
        assert_eq!(action, Some("FEED"));
    }

    #[test]
    fn test_decay_is_applied_before_the_command() {
        let mut manager = manager();
        let id = manager.connect();

        // 50 seconds pass untouched, then a feed arrives: the snapshot must
        // account for the decay first (100 - 10) and the meal second (+20,
        // clamped at 100)
        manager.clock().advance(50_000);
        let outcome = manager.handle_line(id, "FEED").unwrap();
        let snapshot = expect_update(&outcome.events[0]);
        assert_eq!(snapshot.hunger, 100);

        // Same span again without the feed shows the decay alone
        manager.clock().advance(50_000);
        let outcome = manager.handle_line(id, "CONNECT").unwrap();
        let snapshot = expect_update(&outcome.events[0]);
        assert_eq!(snapshot.hunger, 90);
    }

    #[test]
    fn test_coffee_rejected_when_wide_awake() {
        let mut manager = manager();
        let id = manager.connect();
        let before = manager.pet(id).unwrap().clone();

        let outcome = manager.handle_line(id, "COFFEE").unwrap();
        assert_eq!(outcome.events.len(), 1);
        let (code, message, action) = expect_status(&outcome.events[0]);
        assert_eq!(code, 400);
        assert!(message.contains("already awake"));
        assert_eq!(action, Some("COFFEE"));

        let after = manager.pet(id).unwrap();
        assert_eq!(after.hunger, before.hunger);
        assert_eq!(after.happiness, before.happiness);
        assert_eq!(after.sleepiness, before.sleepiness);
    }

    #[test]
    fn test_coffee_perks_up_a_drowsy_pet() {
        let mut manager = manager();
        let id = manager.connect();

        // Ten minutes idle: sleepiness reaches 60
        manager.clock().advance(600_000);
        let outcome = manager.handle_line(id, "COFFEE").unwrap();
        let snapshot = expect_update(&outcome.events[0]);
        assert_eq!(snapshot.sleepiness, 30);
        let (code, _, _) = expect_status(&outcome.events[1]);
        assert_eq!(code, 200);
    }

    #[test]
    fn test_unknown_action_answers_400() {
        let mut manager = manager();
        let id = manager.connect();
        let before = manager.pet(id).unwrap().clone();

        let outcome = manager.handle_line(id, "SNUGGLE").unwrap();
        let (code, message, _) = expect_status(&outcome.events[0]);
        assert_eq!(code, 400);
        assert_eq!(message, "Unknown action: SNUGGLE");

        // Malformed frames never mutate state, not even the decay clock
        let after = manager.pet(id).unwrap();
        assert_eq!(after.last_update, before.last_update);
    }

    #[test]
    fn test_disconnect_command_requests_close() {
        let mut manager = manager();
        let id = manager.connect();
        let outcome = manager.handle_line(id, "DISCONNECT").unwrap();
        assert!(outcome.close);
        let (code, _, action) = expect_status(&outcome.events[0]);
        assert_eq!(code, 200);
        assert_eq!(action, Some("DISCONNECT"));
    }

    #[test]
    fn test_unknown_session_is_benign() {
        let mut manager = manager();
        let id = manager.connect();
        manager.disconnect(id);
        let err = manager.handle_line(id, "FEED").unwrap_err();
        assert!(matches!(err, Error::UnknownSession(_)));
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let mut manager = manager();
        let id = manager.connect();
        manager.disconnect(id);
        manager.disconnect(id);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_tick_all_pushes_to_every_session() {
        let mut manager = manager();
        let first = manager.connect();
        let second = manager.connect();

        manager.clock().advance(10_000);
        let pushes = manager.tick_all();
        assert_eq!(pushes.len(), 2);
        assert_eq!(pushes[0].0, first);
        assert_eq!(pushes[1].0, second);
        for (_, event) in &pushes {
            let snapshot = expect_update(event);
            assert_eq!(snapshot.hunger, 98);
            assert_eq!(snapshot.sleepiness, 1);
        }

        // A second tick at the same instant pushes unchanged snapshots
        let pushes = manager.tick_all();
        let snapshot = expect_update(&pushes[0].1);
        assert_eq!(snapshot.hunger, 98);
    }

    #[test]
    fn test_tick_all_skips_disconnected_sessions() {
        let mut manager = manager();
        let first = manager.connect();
        let second = manager.connect();
        manager.disconnect(first);

        let pushes = manager.tick_all();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].0, second);
    }
}
