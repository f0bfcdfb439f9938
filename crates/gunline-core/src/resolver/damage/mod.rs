//! Damage policies.
//!
//! Each weapon family has its own pipeline and its own rounding points:
//!
//! 1. range-band adjustment
//! 2. direct-blow bonus, or the infantry class conversion against
//!    conventional infantry
//! 3. glancing-blow multiplier, last
//!
//! Every intermediate value is an integer. Steps that multiply by a fraction
//! round down; infantry conversion and glancing blows against infantry round
//! up. Rack families take range and blows on the cluster table instead, and
//! bays compute one aggregate attack value.

pub mod bay;
pub mod infantry;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::hits::HitCount;
use crate::config::RulesConfig;
use crate::dice::Dice;
use crate::entity::EntityId;
use crate::report::ReportEntry;
use crate::to_hit::{RangeBand, ToHitResult};
use crate::weapon::{Munition, WeaponSpec};

/// Damage pipeline for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamagePolicy {
    /// Lasers and PPCs.
    Energy,
    /// Pulse lasers.
    Pulse,
    /// Variable-speed pulse lasers: damage by band, flat direct-blow bonus.
    VariableSpeedPulse,
    /// Autocannons, Gauss rifles and the default direct-fire variant.
    Ballistic,
    /// Missiles and cluster shot: per-projectile damage.
    Cluster,
    /// Weapon bays: one aggregate attack value.
    Bay,
    /// Base damage with no range or blow adjustment.
    Flat,
    /// No damage (EMP, inferno).
    None,
}

/// What the damage pipeline needs to know about the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageTarget {
    /// Conventional infantry; damage goes through class conversion.
    pub conventional_infantry: bool,
    /// Mechanized platoon.
    pub mechanized: bool,
    /// Capital-scale craft.
    pub capital_scale: bool,
    /// Target is in building cover.
    pub in_building: bool,
}

/// Inputs to a damage policy.
#[derive(Debug, Clone, Copy)]
pub struct DamageInput<'a> {
    /// Weapon data.
    pub spec: &'a WeaponSpec,
    /// Bay members; empty for single weapons.
    pub bay: &'a [WeaponSpec],
    /// Shots or bay members actually fired.
    pub fired: u32,
    /// Munition loaded.
    pub munition: Munition,
    /// To-hit result.
    pub to_hit: &'a ToHitResult,
    /// Optional rules.
    pub rules: &'a RulesConfig,
    /// Target profile.
    pub target: DamageTarget,
    /// Unit reports are about.
    pub subject: EntityId,
}

/// Damage per hit plus any entries the pipeline reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageResult {
    /// Damage each hit deals.
    pub per_hit: u32,
    /// Pipeline entries (bay attack value, capital conversion).
    pub entries: Vec<ReportEntry>,
}

impl DamagePolicy {
    /// Damage each of `count`'s hits deals.
    pub fn per_hit(&self, input: &DamageInput<'_>, count: &HitCount, dice: &mut dyn Dice) -> DamageResult {
        let mut entries = Vec::new();
        let per_hit = match self {
            DamagePolicy::None => 0,
            DamagePolicy::Flat => {
                let base = input.spec.damage;
                if input.target.conventional_infantry {
                    infantry::convert(base, input.spec.infantry_class, &input.target, dice)
                } else {
                    base
                }
            }
            DamagePolicy::Cluster => cluster_damage(input, count, dice),
            DamagePolicy::Bay => bay::attack_value(
                input.bay,
                input.fired as usize,
                input.munition,
                input.to_hit.is_glancing(input.rules),
                &input.target,
                input.subject,
                &mut entries,
            ),
            DamagePolicy::Energy
            | DamagePolicy::Pulse
            | DamagePolicy::VariableSpeedPulse
            | DamagePolicy::Ballistic => self.direct_damage(input, count, dice),
        };
        trace!(policy = ?self, per_hit, "damage per hit");
        DamageResult { per_hit, entries }
    }

    fn range_adjusted(self, spec: &WeaponSpec, band: RangeBand, rules: &RulesConfig) -> u32 {
        let long = rules.extended_range && band.beyond_long();
        let extreme = rules.line_of_sight_range && band.beyond_extreme();
        let mut d = spec.damage;
        match self {
            DamagePolicy::Energy => {
                if long {
                    d = d.saturating_sub(1);
                }
                if extreme {
                    d = d * 3 / 4;
                }
            }
            DamagePolicy::Pulse => {
                if long {
                    d /= 2;
                }
                if extreme {
                    d /= 3;
                }
            }
            DamagePolicy::VariableSpeedPulse => {
                if let Some(table) = spec.damage_by_range {
                    d = table[band.table_index()];
                }
            }
            DamagePolicy::Ballistic => {
                if long {
                    d = d * 3 / 4;
                }
                if extreme {
                    d /= 2;
                }
            }
            DamagePolicy::Cluster | DamagePolicy::Bay | DamagePolicy::Flat | DamagePolicy::None => {}
        }
        d
    }

    fn direct_damage(self, input: &DamageInput<'_>, count: &HitCount, dice: &mut dyn Dice) -> u32 {
        let to_hit = input.to_hit;
        let rules = input.rules;
        let ranged = self.range_adjusted(input.spec, to_hit.range, rules);
        let steps = to_hit.direct_blow(rules).unwrap_or(0);
        let glancing = to_hit.is_glancing(rules);

        if input.target.conventional_infantry {
            let lump = if count.is_lump() { ranged * count.rack } else { ranged };
            let class = input.spec.infantry_class_for(input.munition).shifted(steps);
            let converted = infantry::convert(lump, class, &input.target, dice);
            return if glancing { converted.div_ceil(2) } else { converted };
        }

        let cap = ranged * 2;
        let mut d = if self == DamagePolicy::VariableSpeedPulse {
            if steps > 0 {
                (ranged + vsp_bonus(to_hit.range)).min(cap)
            } else {
                ranged
            }
        } else {
            (ranged + steps).min(cap)
        };
        if glancing {
            d /= 2;
        }
        trace!(ranged, steps, glancing, d, "direct damage");
        d
    }
}

fn vsp_bonus(band: RangeBand) -> u32 {
    match band {
        RangeBand::Short => 3,
        RangeBand::Medium => 2,
        RangeBand::Long => 1,
        RangeBand::Extreme | RangeBand::LineOfSight => 0,
    }
}

fn cluster_damage(input: &DamageInput<'_>, count: &HitCount, dice: &mut dyn Dice) -> u32 {
    let per_projectile = if input.munition == Munition::Cluster {
        1
    } else {
        input.spec.damage
    };
    if !count.is_lump() {
        return per_projectile;
    }
    let steps = input.to_hit.direct_blow(input.rules).unwrap_or(0);
    let class = input.spec.infantry_class_for(input.munition).shifted(steps);
    infantry::convert(per_projectile * count.rack, class, &input.target, dice)
}
