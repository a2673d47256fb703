//! Time source abstraction and the elapsed-time tick engine
//!
//! All decay is a pure function of `(state, now)`: the tick engine measures
//! the gap since `last_update`, applies it as decay, and advances the mark.
//! Time itself is injected through the [`Clock`] trait so that sessions can
//! be driven by a [`ManualClock`] in tests instead of wall-clock sleeps.

use crate::pet::PetState;
use std::cell::Cell;

/// Milliseconds since some fixed origin (the Unix epoch for [`WallClock`])
pub type Millis = u64;

/// An injectable source of the current time
pub trait Clock {
    /// The current time in milliseconds
    fn now_millis(&self) -> Millis;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now_millis(&self) -> Millis {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A settable clock for tests and deterministic runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }

    /// Move forward by `delta_ms`
    pub fn advance(&self, delta_ms: Millis) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> Millis {
        self.now.get()
    }
}

/// Apply the decay owed since `state.last_update` and advance the mark
///
/// Elapsed time is never negative: a wall clock that jumps backwards yields
/// zero elapsed seconds, and `last_update` never moves backwards either, so
/// skew can neither double-apply decay nor forget it. Calling this twice at
/// the same instant changes nothing.
pub fn tick(state: &mut PetState, now: Millis) {
    let elapsed_ms = now.saturating_sub(state.last_update);
    if elapsed_ms > 0 {
        state.apply_decay(elapsed_ms as f64 / 1000.0);
    }
    state.last_update = state.last_update.max(now);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_applies_elapsed_decay() {
        let mut pet = PetState::new(1_000);
        tick(&mut pet, 11_000);
        assert!((pet.hunger - 98.0).abs() < 1e-9);
        assert_eq!(pet.last_update, 11_000);
    }

    #[test]
    fn test_tick_at_same_instant_is_noop() {
        let mut pet = PetState::new(5_000);
        tick(&mut pet, 5_000);
        let snapshot = pet.clone();
        tick(&mut pet, 5_000);
        assert_eq!(pet.hunger, snapshot.hunger);
        assert_eq!(pet.happiness, snapshot.happiness);
        assert_eq!(pet.sleepiness, snapshot.sleepiness);
        assert_eq!(pet.last_update, 5_000);
    }

    #[test]
    fn test_backwards_clock_is_treated_as_zero() {
        let mut pet = PetState::new(10_000);
        tick(&mut pet, 4_000);
        assert_eq!(pet.hunger, 100.0);
        // The mark stays put so the skewed interval is never re-applied
        assert_eq!(pet.last_update, 10_000);

        tick(&mut pet, 15_000);
        assert!((pet.hunger - 99.0).abs() < 1e-9);
        assert_eq!(pet.last_update, 15_000);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_millis(), 100);
        clock.advance(50);
        assert_eq!(clock.now_millis(), 150);
        clock.set(30);
        assert_eq!(clock.now_millis(), 30);
    }
}
