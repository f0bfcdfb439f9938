//! To-hit results supplied by the host.
//!
//! The engine never computes hit probability. It receives a finished
//! [`ToHitResult`] per attack and reads the outcome, margin, range band,
//! hit-table side and a few situational flags from it.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;

/// Range band the attack was made at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RangeBand {
    /// Short range.
    Short,
    /// Medium range.
    Medium,
    /// Long range.
    Long,
    /// Beyond long range.
    Extreme,
    /// Beyond extreme range.
    LineOfSight,
}

impl RangeBand {
    /// Whether the band lies beyond long range.
    #[must_use]
    pub fn beyond_long(self) -> bool {
        self >= RangeBand::Extreme
    }

    /// Whether the band lies beyond extreme range.
    #[must_use]
    pub fn beyond_extreme(self) -> bool {
        self == RangeBand::LineOfSight
    }

    /// Index into a four-entry short/medium/long/extreme table. Bands past
    /// extreme read the extreme entry.
    #[must_use]
    pub fn table_index(self) -> usize {
        match self {
            RangeBand::Short => 0,
            RangeBand::Medium => 1,
            RangeBand::Long => 2,
            RangeBand::Extreme | RangeBand::LineOfSight => 3,
        }
    }
}

/// Which side of the target the attack strikes; selects the hit-location
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HitSide {
    /// Front arc.
    #[default]
    Front,
    /// Rear arc.
    Rear,
    /// Left side.
    Left,
    /// Right side.
    Right,
}

/// How the to-hit number was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToHitOutcome {
    /// A roll was made against a target number.
    Rolled,
    /// Hits without a roll (adjacent immobile target, etc.).
    AutomaticSuccess,
    /// Misses without a roll.
    AutomaticFailure,
    /// The attack cannot be made at all.
    Impossible,
}

bitflags! {
    /// Situational modifiers that reach the cluster table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Situation: u8 {
        /// Target is not the attacker's primary target.
        const SECONDARY_TARGET = 1 << 0;
        /// Attacker is inside hostile ECM.
        const ECM_AFFECTED = 1 << 1;
        /// Target's point defense engaged the salvo.
        const POINT_DEFENSE = 1 << 2;
        /// Target is inside a building.
        const IN_BUILDING = 1 << 3;
    }
}

/// Finished to-hit computation for one attack.
///
/// # Example
///
/// ```
/// use gunline_core::to_hit::{RangeBand, ToHitResult};
///
/// let th = ToHitResult::rolled(8, 11).at_range(RangeBand::Long);
/// assert!(th.is_hit());
/// assert_eq!(th.margin, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToHitResult {
    /// How the attack was resolved.
    pub outcome: ToHitOutcome,
    /// Target number, when rolled.
    pub target_number: i32,
    /// Natural 2d6 attack roll, when one was made.
    pub roll: Option<u32>,
    /// Roll minus target number. Negative on a miss.
    pub margin: i32,
    /// Side of the target struck.
    pub side: HitSide,
    /// Range band.
    pub range: RangeBand,
    /// Situational cluster modifiers.
    pub situation: Situation,
}

impl ToHitResult {
    /// A rolled attack.
    #[must_use]
    pub fn rolled(target_number: i32, roll: u32) -> Self {
        Self {
            outcome: ToHitOutcome::Rolled,
            target_number,
            roll: Some(roll),
            margin: i32::try_from(roll).unwrap_or(i32::MAX) - target_number,
            side: HitSide::Front,
            range: RangeBand::Short,
            situation: Situation::empty(),
        }
    }

    fn unrolled(outcome: ToHitOutcome) -> Self {
        Self {
            outcome,
            target_number: 0,
            roll: None,
            margin: 0,
            side: HitSide::Front,
            range: RangeBand::Short,
            situation: Situation::empty(),
        }
    }

    /// An automatic hit.
    #[must_use]
    pub fn automatic_success() -> Self {
        Self::unrolled(ToHitOutcome::AutomaticSuccess)
    }

    /// An automatic miss.
    #[must_use]
    pub fn automatic_failure() -> Self {
        Self::unrolled(ToHitOutcome::AutomaticFailure)
    }

    /// An attack that cannot be made.
    #[must_use]
    pub fn impossible() -> Self {
        Self::unrolled(ToHitOutcome::Impossible)
    }

    /// Sets the range band.
    #[must_use]
    pub fn at_range(mut self, range: RangeBand) -> Self {
        self.range = range;
        self
    }

    /// Sets the side struck.
    #[must_use]
    pub fn from_side(mut self, side: HitSide) -> Self {
        self.side = side;
        self
    }

    /// Adds situational flags.
    #[must_use]
    pub fn with(mut self, situation: Situation) -> Self {
        self.situation |= situation;
        self
    }

    /// Sets the natural roll on an automatic result (used by jam checks).
    #[must_use]
    pub fn with_roll(mut self, roll: u32) -> Self {
        self.roll = Some(roll);
        self
    }

    /// Whether the attack hits.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        match self.outcome {
            ToHitOutcome::AutomaticSuccess => true,
            ToHitOutcome::Rolled => self.margin >= 0,
            ToHitOutcome::AutomaticFailure | ToHitOutcome::Impossible => false,
        }
    }

    /// Whether the attack hit without a roll.
    #[must_use]
    pub fn is_automatic_success(&self) -> bool {
        self.outcome == ToHitOutcome::AutomaticSuccess
    }

    /// Margin of success for a hit; 0 for misses and automatic hits.
    #[must_use]
    pub fn margin_of_success(&self) -> u32 {
        if self.outcome == ToHitOutcome::Rolled {
            self.margin.max(0).unsigned_abs()
        } else {
            0
        }
    }

    /// Glancing blow: a rolled hit with margin exactly 0.
    #[must_use]
    pub fn is_glancing(&self, rules: &RulesConfig) -> bool {
        rules.glancing_blows && self.outcome == ToHitOutcome::Rolled && self.margin == 0
    }

    /// Direct blow: a rolled hit with margin 3 or more. Returns the bonus
    /// step count `floor(margin / 3)`.
    #[must_use]
    pub fn direct_blow(&self, rules: &RulesConfig) -> Option<u32> {
        let mos = self.margin_of_success();
        (rules.direct_blows && self.outcome == ToHitOutcome::Rolled && mos >= 3).then_some(mos / 3)
    }
}
