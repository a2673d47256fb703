//! Predictive pet client and server reconciliation
//!
//! Two modes, one decay law:
//!
//! - **Local**: no authoritative channel. The client runs the shared tick
//!   engine against its own pet at whatever cadence the caller drives
//!   [`PetClient::advance`] (reference: every second), and interactions
//!   apply directly.
//! - **Connected**: the server owns the truth. `FEED`/`COFFEE` are encoded
//!   into the outbox instead of being applied locally; their visible effect
//!   arrives with the server's echo, so nothing is ever applied twice.
//!   Inbound `UPDATE` snapshots *replace* the local stats outright -
//!   last-writer-wins, no blending - because both sides run the same
//!   deterministic law and are already close.
//!
//! Petting, sleep, and walking have no protocol representation and always
//! stay local, whatever the link state.

use crate::error::Result;
use petling_core::{tick, Clock, PetState, STAT_MAX};
use petling_proto::{Command, Event, Snapshot};
use std::collections::VecDeque;

/// Whether an authoritative channel is available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// No server: local predictive simulation
    Local,
    /// Server connected: it owns the stats
    Connected,
}

/// A user gesture from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Feed the pet (server-backed while connected)
    Feed,
    /// Serve coffee (server-backed while connected)
    Coffee,
    /// Pet the pet (always local)
    Pet,
    /// Toggle sleep (always local)
    ToggleSleep,
}

/// A message for the presentation layer to toast or log
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub code: u16,
    pub message: String,
    pub action: Option<String>,
}

/// The client's view of one pet
pub struct PetClient<C: Clock> {
    clock: C,
    pet: PetState,
    link: Link,
    outbox: VecDeque<String>,
}

impl<C: Clock> PetClient<C> {
    /// Create a client in local predictive mode with a fresh pet
    pub fn new(clock: C) -> Self {
        let now = clock.now_millis();
        Self {
            clock,
            pet: PetState::new(now),
            link: Link::Local,
            outbox: VecDeque::new(),
        }
    }

    /// The locally known pet state (predicted or last reconciled)
    pub fn pet_state(&self) -> &PetState {
        &self.pet
    }

    /// Current link state
    pub fn link(&self) -> Link {
        self.link
    }

    /// Whether an authoritative channel is available
    pub fn is_connected(&self) -> bool {
        self.link == Link::Connected
    }

    /// The injected clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Advance the local predictive simulation
    ///
    /// A no-op while connected: between server pushes the stats stay at the
    /// last authoritative values rather than drifting ahead of them.
    pub fn advance(&mut self) {
        if self.link == Link::Local {
            tick(&mut self.pet, self.clock.now_millis());
        }
    }

    /// The transport came up: hand over authority and greet the server
    pub fn on_connected(&mut self) {
        self.link = Link::Connected;
        self.outbox.push_back(Command::Connect.encode());
    }

    /// The transport dropped: fall back to local prediction
    ///
    /// The decay clock keeps its last-snapshot mark, so the first local
    /// `advance` accounts for the whole gap since the server last spoke.
    pub fn on_disconnected(&mut self) {
        self.link = Link::Local;
    }

    /// Ask the server for a clean goodbye
    pub fn request_disconnect(&mut self) {
        if self.link == Link::Connected {
            self.outbox.push_back(Command::Disconnect.encode());
        }
    }

    /// Apply a user gesture
    ///
    /// Returns a notice when the gesture is rejected locally (coffee on a
    /// wide-awake pet in local mode); server-side rejections arrive later
    /// through [`PetClient::on_frame`].
    pub fn interact(&mut self, interaction: Interaction) -> Option<Notice> {
        match interaction {
            Interaction::Pet => {
                self.settle();
                self.pet.pet();
                None
            }
            Interaction::ToggleSleep => {
                self.settle();
                self.pet.toggle_sleep();
                None
            }
            Interaction::Feed => match self.link {
                Link::Connected => {
                    self.outbox.push_back(Command::Feed.encode());
                    None
                }
                Link::Local => {
                    self.settle();
                    self.pet.feed();
                    None
                }
            },
            Interaction::Coffee => match self.link {
                Link::Connected => {
                    self.outbox.push_back(Command::Coffee.encode());
                    None
                }
                Link::Local => {
                    self.settle();
                    match self.pet.give_coffee() {
                        Ok(()) => None,
                        Err(err) => Some(Notice {
                            code: 400,
                            message: err.to_string(),
                            action: Some(Command::Coffee.token().to_string()),
                        }),
                    }
                }
            },
        }
    }

    /// Movement side-channel from the presentation layer
    ///
    /// Walking makes sleepiness build faster; a sleeping pet stays put.
    pub fn set_walking(&mut self, walking: bool) {
        self.settle();
        self.pet.walking = walking && !self.pet.sleeping;
    }

    /// Handle one inbound frame from the server
    ///
    /// Snapshots replace the local stats; status events surface as notices.
    pub fn on_frame(&mut self, frame: &str) -> Result<Option<Notice>> {
        match Event::decode(frame)? {
            Event::Update(snapshot) => {
                self.apply_snapshot(snapshot);
                Ok(None)
            }
            Event::Status {
                code,
                message,
                action,
            } => Ok(Some(Notice {
                code,
                message,
                action,
            })),
        }
    }

    /// Next encoded frame waiting for the transport, oldest first
    pub fn poll_outgoing(&mut self) -> Option<String> {
        self.outbox.pop_front()
    }

    /// Pending decay in local mode, so command effects always land on
    /// settled stats (decay-then-command, same order as the server)
    fn settle(&mut self) {
        if self.link == Link::Local {
            tick(&mut self.pet, self.clock.now_millis());
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.pet.hunger = (snapshot.hunger as f64).clamp(0.0, STAT_MAX);
        self.pet.happiness = (snapshot.happiness as f64).clamp(0.0, STAT_MAX);
        self.pet.sleepiness = (snapshot.sleepiness as f64).clamp(0.0, STAT_MAX);
        self.pet.mood = snapshot.mood;
        // The replaced stats are valid as-of now; restart decay from here
        self.pet.last_update = self.clock.now_millis();
        if self.pet.sleeping {
            // Sleep is client-local and still outranks the server's mood
            self.pet.recompute_mood();
        }
    }
}
