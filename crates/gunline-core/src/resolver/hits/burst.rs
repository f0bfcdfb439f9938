//! Jam tables for multi-shot autocannons.
//!
//! The check reads the natural to-hit roll and the number of shots the mode
//! *selected*, not the number actually fired after ammo ran short.

use serde::{Deserialize, Serialize};

/// Jam behavior of a burst family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JamTable {
    /// Ultra autocannon: jams on a natural 2 in ultra mode.
    Ultra,
    /// Rotary autocannon: 2-4 shots jam on 2, 5-6 shots jam on 3 or less.
    Rotary,
    /// Standard autocannon rapid fire: jams on 4 or less, explodes on 2.
    RapidFire,
}

/// Result of a jam check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JamResult {
    /// The weapon fires normally.
    Clear,
    /// The weapon jams after firing.
    Jammed,
    /// The weapon is destroyed.
    Exploded,
}

impl JamTable {
    /// Highest natural roll that jams at `selected` shots, or 0 if the mode
    /// cannot jam.
    #[must_use]
    pub fn threshold(self, selected: u32) -> u32 {
        match self {
            JamTable::Ultra if selected >= 2 => 2,
            JamTable::Rotary if selected >= 5 => 3,
            JamTable::Rotary if selected >= 2 => 2,
            JamTable::RapidFire if selected >= 2 => 4,
            _ => 0,
        }
    }

    /// Checks the natural to-hit `roll` against the table for `selected`
    /// shots. Attacks with no roll (automatic results) never jam.
    #[must_use]
    pub fn check(self, selected: u32, roll: Option<u32>) -> JamResult {
        let Some(roll) = roll else {
            return JamResult::Clear;
        };
        if self == JamTable::RapidFire && selected >= 2 && roll <= 2 {
            return JamResult::Exploded;
        }
        if roll <= self.threshold(selected) {
            JamResult::Jammed
        } else {
            JamResult::Clear
        }
    }
}
