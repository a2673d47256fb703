//! Pet state model
//!
//! The decaying-needs state machine shared by the authoritative server and
//! the predictive client. All stat math lives here, in one place, so the two
//! sides can never drift apart.
//!
//! Stats are bounded to `[0, 100]`:
//! - `hunger` drains toward 0 over time and is raised by feeding
//! - `happiness` drains toward 0, faster while hungry or drowsy
//! - `sleepiness` builds while awake (faster while walking) and burns off
//!   quickly during sleep
//!
//! The derived `Mood` is recomputed after every mutation and is never
//! independently stale.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for all stats
pub const STAT_MAX: f64 = 100.0;

/// Below this hunger the pet counts as starving (mood and happiness drain)
const HUNGRY_BELOW: f64 = 30.0;
/// Above this sleepiness the pet counts as drowsy (mood and happiness drain)
const DROWSY_ABOVE: f64 = 70.0;
/// Above this happiness the pet beams
const CHEERFUL_ABOVE: f64 = 70.0;

// Decay law: one stat point per N seconds (divisors), or points per second
// (multipliers) for sleep recovery.
const HUNGER_DRAIN_SECS: f64 = 5.0;
const DROWSE_GAIN_SECS: f64 = 10.0;
const WALK_DROWSE_GAIN_SECS: f64 = 20.0;
const SLEEP_RECOVERY_PER_SEC: f64 = 5.0;
const UNHAPPY_DRAIN_SECS: f64 = 3.0;
const CONTENT_DRAIN_SECS: f64 = 10.0;

// Interaction effects
const FEED_HUNGER: f64 = 20.0;
const FEED_HAPPINESS: f64 = 10.0;
const PET_HAPPINESS: f64 = 5.0;
const COFFEE_SLEEPINESS: f64 = 30.0;
const COFFEE_HAPPINESS: f64 = 5.0;

/// Derived mood, a pure function of the stats and the sleep flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mood {
    /// Nothing special going on
    #[default]
    Normal,
    /// Happiness is high
    Happy,
    /// Asleep, drowsy, or starving
    Slumber,
}

impl Mood {
    /// The lowercase wire token for this mood
    pub fn token(&self) -> &'static str {
        match self {
            Mood::Normal => "normal",
            Mood::Happy => "happi",
            Mood::Slumber => "slumber",
        }
    }

    /// Parse a wire token back into a mood
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "normal" => Some(Mood::Normal),
            "happi" => Some(Mood::Happy),
            "slumber" => Some(Mood::Slumber),
            _ => None,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The complete state of one pet
///
/// `last_update` is the instant (in milliseconds) the stats are valid as-of;
/// all decay is computed from the gap between `last_update` and now by the
/// tick engine in [`crate::clock`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetState {
    /// Fullness, 0 is starving
    pub hunger: f64,
    /// Contentment, 0 is miserable
    pub happiness: f64,
    /// Drowsiness, 0 is fully awake
    pub sleepiness: f64,
    /// Derived mood (recomputed after every mutation)
    pub mood: Mood,
    /// While true, sleepiness burns off instead of building
    pub sleeping: bool,
    /// Presentation-owned motion flag; walking builds sleepiness faster
    pub walking: bool,
    /// Milliseconds timestamp the stats are valid as-of
    pub last_update: u64,
}

impl PetState {
    /// A freshly adopted pet: full, delighted, wide awake
    pub fn new(now_millis: u64) -> Self {
        Self {
            hunger: STAT_MAX,
            happiness: STAT_MAX,
            sleepiness: 0.0,
            mood: Mood::Normal,
            sleeping: false,
            walking: false,
            last_update: now_millis,
        }
    }

    /// Apply `elapsed_secs` of decay to all stats
    ///
    /// Zero elapsed time is a strict no-op. The happiness drain rate is
    /// evaluated against the hunger and sleepiness values *after* their own
    /// decay for this interval.
    pub fn apply_decay(&mut self, elapsed_secs: f64) {
        if elapsed_secs <= 0.0 {
            return;
        }

        self.hunger = (self.hunger - elapsed_secs / HUNGER_DRAIN_SECS).max(0.0);

        if self.sleeping {
            self.sleepiness = (self.sleepiness - elapsed_secs * SLEEP_RECOVERY_PER_SEC).max(0.0);
            if self.sleepiness <= 0.0 {
                // Fully rested: wake up on its own
                self.sleeping = false;
            }
        } else {
            let mut gain = elapsed_secs / DROWSE_GAIN_SECS;
            if self.walking {
                gain += elapsed_secs / WALK_DROWSE_GAIN_SECS;
            }
            self.sleepiness = (self.sleepiness + gain).min(STAT_MAX);
        }

        let drain = if self.hunger < HUNGRY_BELOW || self.sleepiness > DROWSY_ABOVE {
            elapsed_secs / UNHAPPY_DRAIN_SECS
        } else {
            elapsed_secs / CONTENT_DRAIN_SECS
        };
        self.happiness = (self.happiness - drain).max(0.0);

        self.recompute_mood();
    }

    /// Feed the pet: +20 hunger, +10 happiness
    pub fn feed(&mut self) {
        self.hunger = (self.hunger + FEED_HUNGER).min(STAT_MAX);
        self.happiness = (self.happiness + FEED_HAPPINESS).min(STAT_MAX);
        self.recompute_mood();
    }

    /// Pet the pet: +5 happiness, nothing else
    pub fn pet(&mut self) {
        self.happiness = (self.happiness + PET_HAPPINESS).min(STAT_MAX);
        self.recompute_mood();
    }

    /// Serve coffee: -30 sleepiness, +5 happiness
    ///
    /// Rejected without any mutation when sleepiness is already zero.
    pub fn give_coffee(&mut self) -> Result<()> {
        if self.sleepiness <= 0.0 {
            return Err(Error::AlreadyAwake);
        }
        self.sleepiness = (self.sleepiness - COFFEE_SLEEPINESS).max(0.0);
        self.happiness = (self.happiness + COFFEE_HAPPINESS).min(STAT_MAX);
        self.recompute_mood();
        Ok(())
    }

    /// Put the pet to sleep, or wake it up
    ///
    /// Falling asleep halts any walking (movement is a presentation concern
    /// signalled through the `walking` flag). Waking clears sleepiness
    /// entirely.
    pub fn toggle_sleep(&mut self) {
        if self.sleeping {
            self.sleeping = false;
            self.sleepiness = 0.0;
        } else {
            self.sleeping = true;
            self.walking = false;
        }
        self.recompute_mood();
    }

    /// Recompute the derived mood
    ///
    /// Precedence, first match wins:
    /// 1. sleeping or sleepiness > 70 => Slumber
    /// 2. hunger < 30                 => Slumber
    /// 3. happiness > 70              => Happy
    /// 4. otherwise                   => Normal
    pub fn recompute_mood(&mut self) {
        self.mood = if self.sleeping || self.sleepiness > DROWSY_ABOVE {
            Mood::Slumber
        } else if self.hunger < HUNGRY_BELOW {
            Mood::Slumber
        } else if self.happiness > CHEERFUL_ABOVE {
            Mood::Happy
        } else {
            Mood::Normal
        };
    }
}

impl Default for PetState {
    fn default() -> Self {
        Self::new(0)
    }
}
