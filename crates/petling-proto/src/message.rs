//! Typed commands, events, and snapshots

use petling_core::{Mood, PetState};
use serde::{Deserialize, Serialize};

/// Client-to-server command
///
/// Commands carry no payload beyond the action tag; petting, sleep, and
/// movement are client-local and have no protocol representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Open a session and request the initial snapshot
    Connect,
    /// Feed the pet
    Feed,
    /// Serve coffee to the pet
    Coffee,
    /// Close the session cleanly
    Disconnect,
}

impl Command {
    /// The uppercase wire token for this command
    pub fn token(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Feed => "FEED",
            Command::Coffee => "COFFEE",
            Command::Disconnect => "DISCONNECT",
        }
    }
}

/// The full stat-and-mood tuple pushed to a client
///
/// Stats travel as integers, floor-truncated from the f64 model values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub hunger: i64,
    pub happiness: i64,
    pub sleepiness: i64,
    pub mood: Mood,
}

impl Snapshot {
    /// Capture the wire view of a pet
    pub fn of(pet: &PetState) -> Self {
        Self {
            hunger: pet.hunger.floor() as i64,
            happiness: pet.happiness.floor() as i64,
            sleepiness: pet.sleepiness.floor() as i64,
            mood: pet.mood,
        }
    }
}

/// Server-to-client event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Authoritative snapshot push (replies and periodic pushes alike)
    Update(Snapshot),
    /// Outcome of a command, or a protocol-level rejection
    Status {
        /// 200 on success, 400 on rejection, 500 on server fault
        code: u16,
        /// Human-readable description
        message: String,
        /// Echo of the triggering action token, when there is one
        action: Option<String>,
    },
}

impl Event {
    /// A status event echoing the command that triggered it
    pub fn status(code: u16, message: impl Into<String>, action: Option<Command>) -> Self {
        Event::Status {
            code,
            message: message.into(),
            action: action.map(|cmd| cmd.token().to_string()),
        }
    }

    /// An update event carrying the wire view of `pet`
    pub fn update(pet: &PetState) -> Self {
        Event::Update(Snapshot::of(pet))
    }
}
