//! Petling Proto - the pipe-and-colon wire protocol
//!
//! One text message per frame: `ACTION|KEY1:VALUE1|KEY2:VALUE2|...`
//!
//! Client-to-server actions: `CONNECT`, `FEED`, `COFFEE`, `DISCONNECT`
//! (no parameters). Server-to-client actions:
//!
//! ```text
//! UPDATE|hunger:<int>|happiness:<int>|sleepiness:<int>|status:<normal|happi|slumber>
//! STATUS|code:<200|400|500>|message:<text>|action:<echo, optional>
//! ```
//!
//! Stat values are floor-truncated integers; mood tokens are lowercase. The
//! typed [`Command`] and [`Event`] enums are the only things the rest of the
//! workspace touches; framing stays inside this crate.

mod codec;
mod error;
mod message;

pub use error::{Error, Result};
pub use message::{Command, Event, Snapshot};
