//! Effect application: turning hits into state changes.
//!
//! - [`ammo`]: shot-by-shot ammunition draw with reload and truncation
//! - [`location`]: hit-location tables per unit kind and side
//! - [`critical`]: critical-hit checks after structure damage
//! - [`secondary`]: fire and EMP hooks that follow damage
//!
//! Everything here mutates through [`StateMutator`] and returns the report
//! entries it produced.

pub mod ammo;
pub mod critical;
pub mod location;
pub mod secondary;

use tracing::trace;

use super::hits::HitOutcome;
use super::mutate::{DamageFlags, MutationOutcome, StateMutator};
use super::registry::LocationRule;
use crate::config::RulesConfig;
use crate::dice::Dice;
use crate::entity::{EntityId, Location};
use crate::error::StateError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::to_hit::HitSide;

/// Where and how a hit outcome lands.
#[derive(Debug, Clone, Copy)]
pub struct HitApplication<'a> {
    /// Unit struck.
    pub target: EntityId,
    /// Hits and damage per hit.
    pub outcome: &'a HitOutcome,
    /// Side facing the attacker.
    pub side: HitSide,
    /// Location rule of the variant.
    pub rule: LocationRule,
    /// Declared location for designated attacks.
    pub designated: Option<Location>,
    /// Modifier to every critical roll.
    pub crit_modifier: i32,
    /// Optional rules.
    pub rules: &'a RulesConfig,
}

/// Applies the hits group by group, each group to its own rolled location,
/// with critical checks after structure damage.
///
/// Stops early once the target is destroyed. Everything applied so far is
/// recorded in `out`, including when a later group fails.
///
/// # Errors
///
/// Propagates mutator lookup failures.
pub fn apply_hits(
    state: &mut GameState,
    hit: &HitApplication<'_>,
    dice: &mut dyn Dice,
    out: &mut MutationOutcome,
) -> Result<(), StateError> {
    let per_hit = hit.outcome.damage_per_hit;
    if hit.outcome.hits == 0 || per_hit == 0 {
        return Ok(());
    }
    let group = hit.outcome.group.max(1);
    let mut remaining = hit.outcome.hits;
    while remaining > 0 {
        let n = remaining.min(group);
        remaining -= n;

        let unit = state
            .arena
            .get(hit.target)
            .ok_or(StateError::UnknownEntity(hit.target))?;
        if unit.is_destroyed() {
            break;
        }
        let takes_criticals = unit.kind().takes_criticals();
        let Some(struck) = location::choose(
            unit,
            hit.side,
            hit.rule,
            hit.designated,
            hit.rules,
            dice,
            &mut out.entries,
        ) else {
            break;
        };
        trace!(location = %struck.location, n, per_hit, "applying hit group");

        let flags = if struck.rear {
            DamageFlags::REAR
        } else {
            DamageFlags::empty()
        };
        let damage = state.apply_damage(hit.target, struck.location, n * per_hit, flags)?;
        let mut checks: Vec<Location> = Vec::new();
        for loc in &damage.structure_hits {
            if !checks.contains(loc) {
                checks.push(*loc);
            }
        }
        out.merge(damage);
        if !takes_criticals {
            continue;
        }

        if struck.through_armor {
            out.entries.push(
                ReportEntry::new(MessageId::ThroughArmorCritical)
                    .subject(hit.target)
                    .param(struck.location)
                    .indent(2),
            );
            out.merge(critical::check(state, hit.target, struck.location, hit.crit_modifier, dice)?);
        }
        for loc in checks {
            out.merge(critical::check(state, hit.target, loc, hit.crit_modifier, dice)?);
        }
    }
    Ok(())
}
