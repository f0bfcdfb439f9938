//! Cluster hits table.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{apply_modifier, HitAudit, HitCount, HitInput, HitPath};
use crate::dice::Dice;
use crate::to_hit::{RangeBand, Situation};

/// Hits by rack size, one column per 2d6 result from 2 to 12.
const CLUSTER_TABLE: [(u32, [u32; 11]); 30] = [
    (2, [1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2]),
    (3, [1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3]),
    (4, [1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4]),
    (5, [1, 2, 2, 3, 3, 3, 3, 4, 4, 5, 5]),
    (6, [2, 2, 3, 3, 4, 4, 4, 5, 5, 6, 6]),
    (7, [2, 2, 3, 4, 4, 4, 4, 6, 6, 7, 7]),
    (8, [3, 3, 4, 4, 5, 5, 5, 6, 6, 8, 8]),
    (9, [3, 3, 4, 5, 5, 5, 5, 7, 7, 9, 9]),
    (10, [3, 3, 4, 6, 6, 6, 6, 8, 8, 10, 10]),
    (11, [4, 4, 5, 7, 7, 7, 7, 9, 9, 11, 11]),
    (12, [4, 4, 5, 8, 8, 8, 8, 10, 10, 12, 12]),
    (13, [4, 4, 5, 8, 8, 8, 8, 11, 11, 13, 13]),
    (14, [5, 5, 6, 9, 9, 9, 9, 11, 11, 14, 14]),
    (15, [5, 5, 6, 9, 9, 9, 9, 12, 12, 15, 15]),
    (16, [5, 5, 7, 10, 10, 10, 10, 13, 13, 16, 16]),
    (17, [5, 5, 7, 10, 10, 10, 10, 14, 14, 17, 17]),
    (18, [6, 6, 8, 11, 11, 11, 11, 14, 14, 18, 18]),
    (19, [6, 6, 8, 11, 11, 11, 11, 15, 15, 19, 19]),
    (20, [6, 6, 9, 12, 12, 12, 12, 16, 16, 20, 20]),
    (21, [7, 7, 9, 13, 13, 13, 13, 17, 17, 21, 21]),
    (22, [7, 7, 9, 14, 14, 14, 14, 18, 18, 22, 22]),
    (23, [7, 7, 10, 15, 15, 15, 15, 19, 19, 23, 23]),
    (24, [8, 8, 10, 16, 16, 16, 16, 20, 20, 24, 24]),
    (25, [8, 8, 10, 16, 16, 16, 16, 21, 21, 25, 25]),
    (26, [9, 9, 11, 17, 17, 17, 17, 21, 21, 26, 26]),
    (27, [9, 9, 11, 17, 17, 17, 17, 22, 22, 27, 27]),
    (28, [9, 9, 11, 17, 17, 17, 17, 23, 23, 28, 28]),
    (29, [10, 10, 12, 18, 18, 18, 18, 23, 23, 29, 29]),
    (30, [10, 10, 12, 18, 18, 18, 18, 24, 24, 30, 30]),
    (40, [12, 12, 18, 24, 24, 24, 24, 32, 32, 40, 40]),
];

/// Hits scored by a rack of `rack` projectiles on a modified roll.
///
/// The roll is clamped to 2-12. Racks larger than (or missing from) the
/// table are split greedily into table entries, largest first, all read on
/// the same roll.
///
/// # Example
///
/// ```
/// use gunline_core::resolver::hits::cluster_hits;
///
/// assert_eq!(cluster_hits(20, 7), 12);
/// assert_eq!(cluster_hits(5, 12), 5);
/// assert_eq!(cluster_hits(45, 7), 27);
/// ```
#[must_use]
pub fn cluster_hits(rack: u32, roll: u32) -> u32 {
    let column = (roll.clamp(2, 12) - 2) as usize;
    let mut remaining = rack;
    let mut hits = 0;
    while remaining > 0 {
        if remaining == 1 {
            hits += 1;
            break;
        }
        match CLUSTER_TABLE.iter().rev().find(|(size, _)| *size <= remaining) {
            Some((size, row)) => {
                hits += row[column];
                remaining -= size;
            }
            None => {
                hits += remaining;
                break;
            }
        }
    }
    hits
}

/// Cluster behavior of a rack weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterSpec {
    /// Hits grouped per location roll.
    pub group: u32,
    /// Streak launcher: every missile hits once the attack hits.
    pub streak: bool,
    /// The family takes the short/long range-bracket modifier.
    pub range_modifier: bool,
}

impl ClusterSpec {
    /// Plain rack grouping `group` hits per location roll.
    #[must_use]
    pub const fn grouped(group: u32) -> Self {
        Self {
            group,
            streak: false,
            range_modifier: false,
        }
    }

    /// Marks the rack as a streak launcher.
    #[must_use]
    pub const fn streak(mut self) -> Self {
        self.streak = true;
        self
    }

    /// Applies the range-bracket modifier.
    #[must_use]
    pub const fn with_range_modifier(mut self) -> Self {
        self.range_modifier = true;
        self
    }

    pub(super) fn count(&self, input: &HitInput<'_>, dice: &mut dyn Dice) -> HitCount {
        let rack = input.rack;
        if input.lump {
            return HitCount {
                group: self.group,
                ..HitCount::lump(rack)
            };
        }
        if self.streak || input.to_hit.is_automatic_success() {
            return HitCount {
                hits: all_hit(rack, input),
                rack,
                group: self.group,
                salvo: true,
                audit: HitAudit {
                    path: HitPath::AllHit,
                    modifier: 0,
                    roll: None,
                },
            };
        }
        let modifier = cluster_modifier(self, input);
        let roll = dice.roll_2d6();
        let hits = cluster_hits(rack, apply_modifier(roll, modifier));
        trace!(rack, roll, modifier, hits, "cluster roll");
        HitCount {
            hits,
            rack,
            group: self.group,
            salvo: true,
            audit: HitAudit {
                path: HitPath::Table,
                modifier,
                roll: Some(roll),
            },
        }
    }
}

fn all_hit(rack: u32, input: &HitInput<'_>) -> u32 {
    if !input.rules.cluster_range_reduction {
        return rack;
    }
    let band = input.to_hit.range;
    if band.beyond_extreme() {
        rack.div_ceil(2)
    } else if band.beyond_long() {
        (rack * 3).div_ceil(4)
    } else {
        rack
    }
}

/// Net cluster-table modifier for a rack attack.
#[must_use]
pub fn cluster_modifier(spec: &ClusterSpec, input: &HitInput<'_>) -> i32 {
    let situation = input.to_hit.situation;
    let mut modifier = 0;
    if input.artemis && !situation.contains(Situation::ECM_AFFECTED) {
        modifier += 2;
    }
    if spec.range_modifier {
        modifier += match input.to_hit.range {
            RangeBand::Short => 2,
            RangeBand::Medium => 0,
            RangeBand::Long | RangeBand::Extreme | RangeBand::LineOfSight => -2,
        };
    }
    if situation.contains(Situation::SECONDARY_TARGET) {
        modifier -= 1;
    }
    if situation.contains(Situation::POINT_DEFENSE) {
        modifier -= 2;
    }
    if let Some(steps) = input.to_hit.direct_blow(input.rules) {
        modifier += 2 * i32::try_from(steps).unwrap_or(0);
    }
    if input.to_hit.is_glancing(input.rules) {
        modifier -= 4;
    }
    if input.cluster_hitter {
        modifier += 1;
    }
    modifier
}
