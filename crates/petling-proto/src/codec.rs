//! Encoding and decoding of the line format
//!
//! One message per frame: `ACTION|KEY1:VALUE1|KEY2:VALUE2|...`
//!
//! Parameter pairs split on the first `:` only, so message text may contain
//! colons. Commands take no parameters; any pairs present must still be
//! well-formed.

use crate::error::{Error, Result};
use crate::message::{Command, Event, Snapshot};
use petling_core::Mood;
use std::fmt::Write;

/// Split a frame into its action tag and `key:value` pairs
fn split_frame(frame: &str) -> Result<(&str, Vec<(&str, &str)>)> {
    let mut parts = frame.split('|');
    let action = match parts.next() {
        Some(action) if !action.is_empty() => action,
        _ => return Err(Error::EmptyFrame),
    };
    let mut params = Vec::new();
    for part in parts {
        let (key, value) = part
            .split_once(':')
            .ok_or_else(|| Error::MalformedParam(part.to_string()))?;
        params.push((key, value));
    }
    Ok((action, params))
}

fn lookup<'a>(params: &[(&'a str, &'a str)], key: &'static str) -> Result<&'a str> {
    params
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .ok_or(Error::MissingParam(key))
}

fn parse_int(params: &[(&str, &str)], key: &'static str) -> Result<i64> {
    let value = lookup(params, key)?;
    value.parse().map_err(|_| Error::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

impl Command {
    /// Encode this command as one wire frame
    pub fn encode(&self) -> String {
        self.token().to_string()
    }

    /// Decode a wire frame into a command
    pub fn decode(frame: &str) -> Result<Self> {
        let (action, _params) = split_frame(frame)?;
        match action {
            "CONNECT" => Ok(Command::Connect),
            "FEED" => Ok(Command::Feed),
            "COFFEE" => Ok(Command::Coffee),
            "DISCONNECT" => Ok(Command::Disconnect),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

impl Event {
    /// Encode this event as one wire frame
    pub fn encode(&self) -> String {
        match self {
            Event::Update(snapshot) => format!(
                "UPDATE|hunger:{}|happiness:{}|sleepiness:{}|status:{}",
                snapshot.hunger, snapshot.happiness, snapshot.sleepiness, snapshot.mood
            ),
            Event::Status {
                code,
                message,
                action,
            } => {
                let mut frame = format!("STATUS|code:{code}|message:{message}");
                if let Some(action) = action {
                    let _ = write!(frame, "|action:{action}");
                }
                frame
            }
        }
    }

    /// Decode a wire frame into an event
    pub fn decode(frame: &str) -> Result<Self> {
        let (action, params) = split_frame(frame)?;
        match action {
            "UPDATE" => {
                let mood_token = lookup(&params, "status")?;
                let mood = Mood::from_token(mood_token)
                    .ok_or_else(|| Error::UnknownMood(mood_token.to_string()))?;
                Ok(Event::Update(Snapshot {
                    hunger: parse_int(&params, "hunger")?,
                    happiness: parse_int(&params, "happiness")?,
                    sleepiness: parse_int(&params, "sleepiness")?,
                    mood,
                }))
            }
            "STATUS" => {
                let code = parse_int(&params, "code")?;
                let code = u16::try_from(code).map_err(|_| Error::InvalidNumber {
                    key: "code",
                    value: code.to_string(),
                })?;
                Ok(Event::Status {
                    code,
                    message: lookup(&params, "message")?.to_string(),
                    action: lookup(&params, "action").ok().map(str::to_string),
                })
            }
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_round_trip() {
        for cmd in [
            Command::Connect,
            Command::Feed,
            Command::Coffee,
            Command::Disconnect,
        ] {
            assert_eq!(Command::decode(&cmd.encode()).unwrap(), cmd);
        }
    }

    #[test]
    fn test_unknown_action() {
        let err = Command::decode("SNUGGLE").unwrap_err();
        assert_eq!(err.to_string(), "Unknown action: SNUGGLE");
    }

    #[test]
    fn test_empty_frame() {
        assert!(matches!(Command::decode(""), Err(Error::EmptyFrame)));
        assert!(matches!(Event::decode(""), Err(Error::EmptyFrame)));
    }

    #[test]
    fn test_malformed_parameter() {
        let err = Command::decode("FEED|portion").unwrap_err();
        assert!(matches!(err, Error::MalformedParam(_)));
    }

    #[test]
    fn test_update_round_trip() {
        let snapshot = Snapshot {
            hunger: 55,
            happiness: 80,
            sleepiness: 10,
            mood: Mood::Happy,
        };
        let frame = Event::Update(snapshot).encode();
        assert_eq!(frame, "UPDATE|hunger:55|happiness:80|sleepiness:10|status:happi");
        assert_eq!(Event::decode(&frame).unwrap(), Event::Update(snapshot));
    }

    #[test]
    fn test_update_rejects_bad_mood() {
        let frame = "UPDATE|hunger:55|happiness:80|sleepiness:10|status:grumpy";
        assert!(matches!(Event::decode(frame), Err(Error::UnknownMood(_))));
    }

    #[test]
    fn test_update_requires_all_stats() {
        let frame = "UPDATE|hunger:55|status:normal";
        assert!(matches!(
            Event::decode(frame),
            Err(Error::MissingParam("happiness"))
        ));
    }

    #[test]
    fn test_status_round_trip_with_action() {
        let event = Event::status(200, "Fed the pet successfully", Some(Command::Feed));
        let frame = event.encode();
        assert_eq!(
            frame,
            "STATUS|code:200|message:Fed the pet successfully|action:FEED"
        );
        assert_eq!(Event::decode(&frame).unwrap(), event);
    }

    #[test]
    fn test_status_without_action() {
        let event = Event::status(400, "Unknown action: SNUGGLE", None);
        let frame = event.encode();
        assert_eq!(frame, "STATUS|code:400|message:Unknown action: SNUGGLE");
        assert_eq!(Event::decode(&frame).unwrap(), event);
    }

    #[test]
    fn test_status_message_may_contain_colons() {
        let frame = "STATUS|code:400|message:Invalid value for code: abc";
        match Event::decode(frame).unwrap() {
            Event::Status { message, .. } => {
                assert_eq!(message, "Invalid value for code: abc");
            }
            other => panic!("expected status, got {other:?}"),
        }
    }

    #[test]
    fn test_snapshot_floors_stats() {
        let mut pet = petling_core::PetState::new(0);
        pet.hunger = 55.9;
        pet.happiness = 80.1;
        pet.sleepiness = 10.5;
        pet.recompute_mood();
        let snapshot = Snapshot::of(&pet);
        assert_eq!(snapshot.hunger, 55);
        assert_eq!(snapshot.happiness, 80);
        assert_eq!(snapshot.sleepiness, 10);
        assert_eq!(snapshot.mood, Mood::Happy);
    }
}
