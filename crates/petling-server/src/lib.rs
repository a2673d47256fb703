//! Petling Server - authoritative session tracking over a line protocol
//!
//! One pet per connected client, tracked server-side as the source of truth.
//! Clients send `CONNECT`/`FEED`/`COFFEE`/`DISCONNECT` frames; the server
//! answers each one and additionally pushes an unsolicited `UPDATE` snapshot
//! every fixed period so all observers converge on server time.
//!
//! ## Key components
//!
//! - [`SessionManager`]: synchronous registry + dispatch, injectable clock
//! - [`serve`]: the line-delimited TCP front end
//! - [`ServerConfig`]: RON-backed runtime configuration
//!
//! The decay and mood rules themselves live in `petling-core`; this crate
//! never reimplements them.

mod config;
mod error;
mod net;
mod session;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use net::serve;
pub use session::{CommandOutcome, Session, SessionId, SessionManager};
