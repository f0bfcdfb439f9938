//! Hit-count policies.
//!
//! A policy turns a finished to-hit result into a number of effective hits:
//!
//! - [`HitPolicy::Fixed`]: one hit, whatever the margin
//! - [`HitPolicy::Cluster`]: rack weapons on the cluster table
//! - [`HitPolicy::Burst`]: multi-shot autocannons, one table entry per shot
//!   fired
//!
//! Damage per hit is filled in afterwards by the damage policy; the two are
//! combined into a [`HitOutcome`].

pub mod burst;
pub mod cluster;

use serde::{Deserialize, Serialize};
use tracing::trace;

pub use burst::{JamResult, JamTable};
pub use cluster::{cluster_hits, cluster_modifier, ClusterSpec};

use crate::config::RulesConfig;
use crate::dice::Dice;
use crate::to_hit::ToHitResult;

/// How hits are counted for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitPolicy {
    /// Exactly one hit.
    Fixed,
    /// Cluster table over the weapon's rack.
    Cluster(ClusterSpec),
    /// Multi-shot fire; the shots fired form the rack and the jam table is
    /// checked before damage.
    Burst(JamTable),
}

/// Which path produced the hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitPath {
    /// Fixed single hit.
    Fixed,
    /// Rolled on the cluster table.
    Table,
    /// Every projectile hit without a roll.
    AllHit,
    /// The whole salvo landed as one lump (conventional infantry).
    Lump,
    /// The attack missed.
    Miss,
}

/// Audit side-channel: how the count was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitAudit {
    /// Path taken.
    pub path: HitPath,
    /// Net cluster modifier applied (0 off the table path).
    pub modifier: i32,
    /// Raw 2d6 cluster roll, if one was made.
    pub roll: Option<u32>,
}

/// Hit count before damage is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitCount {
    /// Effective hits.
    pub hits: u32,
    /// Projectiles the count was drawn from.
    pub rack: u32,
    /// Hits grouped per location roll.
    pub group: u32,
    /// The hits came from a salvo rather than a single projectile.
    pub salvo: bool,
    /// How the count was reached.
    pub audit: HitAudit,
}

impl HitCount {
    /// A miss.
    #[must_use]
    pub fn miss() -> Self {
        Self {
            hits: 0,
            rack: 0,
            group: 1,
            salvo: false,
            audit: HitAudit {
                path: HitPath::Miss,
                modifier: 0,
                roll: None,
            },
        }
    }

    fn fixed() -> Self {
        Self {
            hits: 1,
            rack: 1,
            group: 1,
            salvo: false,
            audit: HitAudit {
                path: HitPath::Fixed,
                modifier: 0,
                roll: None,
            },
        }
    }

    fn lump(rack: u32) -> Self {
        Self {
            hits: 1,
            rack,
            group: 1,
            salvo: true,
            audit: HitAudit {
                path: HitPath::Lump,
                modifier: 0,
                roll: None,
            },
        }
    }

    /// Whether the lump path was taken.
    #[must_use]
    pub fn is_lump(&self) -> bool {
        self.audit.path == HitPath::Lump
    }
}

/// Hit count, damage per hit and audit for one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitOutcome {
    /// Effective hits.
    pub hits: u32,
    /// Damage each hit deals.
    pub damage_per_hit: u32,
    /// The cluster table was consulted.
    pub cluster_table: bool,
    /// The hits came from a salvo.
    pub salvo: bool,
    /// Hits grouped per location roll.
    pub group: u32,
    /// How the count was reached.
    pub audit: HitAudit,
}

impl HitOutcome {
    /// Combines a hit count with the damage each hit deals.
    #[must_use]
    pub fn new(count: HitCount, damage_per_hit: u32) -> Self {
        Self {
            hits: count.hits,
            damage_per_hit,
            cluster_table: count.audit.path == HitPath::Table,
            salvo: count.salvo,
            group: count.group.max(1),
            audit: count.audit,
        }
    }

    /// Total damage across all hits.
    #[must_use]
    pub fn total_damage(&self) -> u32 {
        self.hits * self.damage_per_hit
    }
}

/// What a hit policy needs to know about the attack.
#[derive(Debug, Clone, Copy)]
pub struct HitInput<'a> {
    /// To-hit result.
    pub to_hit: &'a ToHitResult,
    /// Optional rules.
    pub rules: &'a RulesConfig,
    /// Missiles or pellets per salvo.
    pub rack: u32,
    /// Shots actually fired (burst weapons).
    pub shots_fired: u32,
    /// Linked Artemis fire control.
    pub artemis: bool,
    /// Attacker has the cluster-hitter ability.
    pub cluster_hitter: bool,
    /// Target is conventional infantry.
    pub lump: bool,
}

impl HitPolicy {
    /// Counts hits. Draws at most one 2d6 from `dice`.
    pub fn count(&self, input: &HitInput<'_>, dice: &mut dyn Dice) -> HitCount {
        if !input.to_hit.is_hit() {
            return HitCount::miss();
        }
        let count = match self {
            HitPolicy::Fixed => HitCount::fixed(),
            HitPolicy::Cluster(spec) => spec.count(input, dice),
            HitPolicy::Burst(_) => burst_hits(input, dice),
        };
        trace!(hits = count.hits, path = ?count.audit.path, modifier = count.audit.modifier, "hit count");
        count
    }
}

fn burst_hits(input: &HitInput<'_>, dice: &mut dyn Dice) -> HitCount {
    let shots = input.shots_fired;
    if input.lump {
        return HitCount::lump(shots);
    }
    if shots <= 1 {
        return HitCount::fixed();
    }
    if input.to_hit.is_automatic_success() {
        return HitCount {
            hits: shots,
            rack: shots,
            group: 1,
            salvo: true,
            audit: HitAudit {
                path: HitPath::AllHit,
                modifier: 0,
                roll: None,
            },
        };
    }
    let modifier = i32::from(input.cluster_hitter);
    let roll = dice.roll_2d6();
    HitCount {
        hits: cluster_hits(shots, apply_modifier(roll, modifier)),
        rack: shots,
        group: 1,
        salvo: true,
        audit: HitAudit {
            path: HitPath::Table,
            modifier,
            roll: Some(roll),
        },
    }
}

/// Roll plus modifier, clamped to the 2-12 table.
#[must_use]
pub fn apply_modifier(roll: u32, modifier: i32) -> u32 {
    let total = i64::from(roll) + i64::from(modifier);
    u32::try_from(total.clamp(2, 12)).unwrap_or(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    fn input<'a>(to_hit: &'a ToHitResult, rules: &'a RulesConfig) -> HitInput<'a> {
        HitInput {
            to_hit,
            rules,
            rack: 1,
            shots_fired: 1,
            artemis: false,
            cluster_hitter: false,
            lump: false,
        }
    }

    mod fixed_tests {
        use super::*;

        #[test]
        fn fixed_is_one_hit_at_any_margin() {
            let rules = RulesConfig::all_optional();
            for roll in 2..=12 {
                let th = ToHitResult::rolled(2, roll);
                let count = HitPolicy::Fixed.count(&input(&th, &rules), &mut ScriptedDice::default());
                assert_eq!(count.hits, 1);
                assert_eq!(count.audit.path, HitPath::Fixed);
            }
        }

        #[test]
        fn miss_is_zero_hits() {
            let rules = RulesConfig::default();
            let th = ToHitResult::rolled(9, 5);
            let count = HitPolicy::Fixed.count(&input(&th, &rules), &mut ScriptedDice::default());
            assert_eq!(count.hits, 0);
            assert_eq!(count.audit.path, HitPath::Miss);
        }
    }

    mod burst_tests {
        use super::*;

        #[test]
        fn burst_rolls_shots_fired_on_table() {
            let rules = RulesConfig::default();
            let th = ToHitResult::rolled(6, 8);
            let hit = HitInput {
                shots_fired: 4,
                ..input(&th, &rules)
            };
            let mut dice = ScriptedDice::new([3, 4]);
            let count = HitPolicy::Burst(JamTable::Rotary).count(&hit, &mut dice);
            // rack 4, roll 7
            assert_eq!(count.hits, 3);
            assert_eq!(count.audit.roll, Some(7));
            assert!(count.salvo);
        }

        #[test]
        fn single_shot_burst_is_fixed() {
            let rules = RulesConfig::default();
            let th = ToHitResult::rolled(6, 8);
            let count = HitPolicy::Burst(JamTable::Ultra)
                .count(&input(&th, &rules), &mut ScriptedDice::default());
            assert_eq!(count.hits, 1);
            assert_eq!(count.audit.path, HitPath::Fixed);
        }

        #[test]
        fn burst_against_infantry_is_lump() {
            let rules = RulesConfig::default();
            let th = ToHitResult::rolled(6, 8);
            let hit = HitInput {
                shots_fired: 2,
                lump: true,
                ..input(&th, &rules)
            };
            let count = HitPolicy::Burst(JamTable::Ultra).count(&hit, &mut ScriptedDice::default());
            assert!(count.is_lump());
            assert_eq!(count.rack, 2);
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn outcome_flags_table_use() {
            let count = HitCount {
                hits: 12,
                rack: 20,
                group: 5,
                salvo: true,
                audit: HitAudit {
                    path: HitPath::Table,
                    modifier: 0,
                    roll: Some(7),
                },
            };
            let outcome = HitOutcome::new(count, 1);
            assert!(outcome.cluster_table);
            assert_eq!(outcome.total_damage(), 12);
        }

        #[test]
        fn modifier_clamps_to_table() {
            assert_eq!(apply_modifier(2, -4), 2);
            assert_eq!(apply_modifier(11, 4), 12);
            assert_eq!(apply_modifier(7, 2), 9);
        }
    }
}
