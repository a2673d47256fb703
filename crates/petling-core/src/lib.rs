//! Petling Core - the shared virtual-pet state model
//!
//! This crate is the single source of the decay and mood rules. Both the
//! authoritative server (`petling-server`) and the predictive client
//! (`petling-client`) consume it, so the two simulations can never drift.
//!
//! - [`PetState`] / [`Mood`] - the decaying-needs state machine
//! - [`Clock`] / [`tick`] - injectable time and the elapsed-time decay driver

mod clock;
mod error;
mod pet;

pub use clock::{tick, Clock, ManualClock, Millis, WallClock};
pub use error::{Error, Result};
pub use pet::{Mood, PetState, STAT_MAX};
