//! Petling Client - predictive simulation and reconciliation
//!
//! Runs the shared decay law from `petling-core` against a locally owned pet
//! whenever no server is reachable, forwards server-backed commands while
//! one is, and reconciles by replacing local stats with authoritative
//! snapshots (last-writer-wins, no interpolation).
//!
//! The presentation layer sits on the other side of [`PetClient`]: it feeds
//! gestures in as [`Interaction`]s, drains wire frames from
//! [`PetClient::poll_outgoing`], and renders [`Notice`]s and the pet state.

mod client;
mod error;

pub use client::{Interaction, Link, Notice, PetClient};
pub use error::{Error, Result};
