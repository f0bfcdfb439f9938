//! Critical-hit checks.

use tracing::{trace, warn};

use crate::dice::Dice;
use crate::entity::{Abilities, ArmorTraits, EntityId, Location, LocationState, UnitKind};
use crate::error::StateError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::resolver::mutate::{CriticalEffect, MutationOutcome, StateMutator};

/// Attempts at finding a hittable slot before the critical is lost.
const SLOT_REROLLS: u32 = 10;

/// Net modifier to the 2d6 critical roll.
#[must_use]
pub fn critical_modifier(traits: ArmorTraits, abilities: Abilities) -> i32 {
    let mut modifier = 0;
    if traits.contains(ArmorTraits::HARDENED) {
        modifier -= 2;
    }
    if traits.contains(ArmorTraits::REACTIVE) {
        modifier -= 1;
    }
    if abilities.contains(Abilities::CRIT_SEEKER) {
        modifier += 1;
    }
    modifier
}

/// Criticals scored by a modified roll.
#[must_use]
pub const fn criticals_for(total: i32) -> u32 {
    match total {
        i32::MIN..=7 => 0,
        8 | 9 => 1,
        10 | 11 => 2,
        _ => 3,
    }
}

/// Rolls a critical check against `location` and applies what it scores.
///
/// # Errors
///
/// Propagates mutator lookup failures.
pub fn check(
    state: &mut GameState,
    target: EntityId,
    location: Location,
    modifier: i32,
    dice: &mut dyn Dice,
) -> Result<MutationOutcome, StateError> {
    let mut out = MutationOutcome::default();
    let unit = state.arena.get(target).ok_or(StateError::UnknownEntity(target))?;
    if unit.is_destroyed() || !unit.has_intact(location) {
        return Ok(out);
    }
    let kind = unit.kind();

    let roll = dice.roll_2d6();
    let total = i32::try_from(roll).unwrap_or(0) + modifier;
    let count = criticals_for(total);
    out.entries.push(
        ReportEntry::new(MessageId::CriticalCheck)
            .subject(target)
            .param(location)
            .param(roll)
            .param(total)
            .indent(2),
    );
    trace!(%target, %location, roll, total, count, "critical check");
    if count == 0 {
        out.entries.push(ReportEntry::new(MessageId::NoCritical).subject(target).indent(2));
        return Ok(out);
    }
    if count == 3 && kind == UnitKind::Mek && location.can_be_blown_off() {
        out.merge(state.apply_critical(target, location, CriticalEffect::BlowOff)?);
        return Ok(out);
    }

    for _ in 0..count {
        let unit = state.arena.get(target).ok_or(StateError::UnknownEntity(target))?;
        if unit.is_destroyed() || !unit.has_intact(location) {
            break;
        }
        let Some(slots) = unit.location(location) else {
            break;
        };
        let Some(index) = pick_slot(slots, dice) else {
            out.entries.push(
                ReportEntry::new(MessageId::NoCriticalSlots)
                    .subject(target)
                    .param(location)
                    .indent(2),
            );
            break;
        };
        out.merge(state.apply_critical(target, location, CriticalEffect::Slot(index))?);
    }
    Ok(out)
}

/// Rolls for a hittable slot: one d6 for up to six slots, otherwise a d6
/// for the half and a d6 within it. Misses are rerolled a bounded number of
/// times; `None` once they run out or when nothing is left to hit.
fn pick_slot(state: &LocationState, dice: &mut dyn Dice) -> Option<usize> {
    let slots = &state.slots;
    if !slots.iter().any(|s| s.is_hittable()) {
        return None;
    }
    for _ in 0..SLOT_REROLLS {
        let index = if slots.len() <= 6 {
            dice.roll_d6(1) as usize - 1
        } else {
            let half = if dice.roll_d6(1) <= 3 { 0 } else { 6 };
            half + dice.roll_d6(1) as usize - 1
        };
        if slots.get(index).is_some_and(|s| s.is_hittable()) {
            return Some(index);
        }
    }
    warn!(rerolls = SLOT_REROLLS, "critical slot rerolls exhausted");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::entity::{MountCondition, Unit};
    use crate::weapon::catalog;
    use gunline_board::Board;

    fn mek_state() -> (GameState, EntityId) {
        let mut state = GameState::new(Board::new(8, 8));
        let id = state.arena.spawn(Unit::new(UnitKind::Mek, "M"));
        (state, id)
    }

    mod table_tests {
        use super::*;

        #[test]
        fn thresholds() {
            assert_eq!(criticals_for(7), 0);
            assert_eq!(criticals_for(8), 1);
            assert_eq!(criticals_for(11), 2);
            assert_eq!(criticals_for(14), 3);
            assert_eq!(criticals_for(-3), 0);
        }

        #[test]
        fn modifiers_stack() {
            assert_eq!(critical_modifier(ArmorTraits::HARDENED, Abilities::CRIT_SEEKER), -1);
            assert_eq!(
                critical_modifier(ArmorTraits::HARDENED | ArmorTraits::REACTIVE, Abilities::empty()),
                -3
            );
        }
    }

    mod check_tests {
        use super::*;

        #[test]
        fn low_roll_scores_nothing() {
            let (mut state, id) = mek_state();
            let mut dice = ScriptedDice::new([3, 4]);
            let out = check(&mut state, id, Location::CenterTorso, 0, &mut dice).unwrap();
            assert!(out.entries.iter().any(|e| e.message == MessageId::NoCritical));
        }

        #[test]
        fn one_critical_hits_a_slot() {
            let (mut state, id) = mek_state();
            let laser = state
                .arena
                .get_mut(id)
                .unwrap()
                .add_mount(catalog::medium_laser(), Location::LeftArm);
            // 8 -> one critical; slot 5 is the laser
            let mut dice = ScriptedDice::new([4, 4, 5]);
            check(&mut state, id, Location::LeftArm, 0, &mut dice).unwrap();
            let unit = state.arena.get(id).unwrap();
            assert_eq!(unit.mount(laser).unwrap().condition, MountCondition::Destroyed);
        }

        #[test]
        fn exhausted_rerolls_score_nothing() {
            let (mut state, id) = mek_state();
            let unit = state.arena.get_mut(id).unwrap();
            let laser = unit.add_mount(catalog::medium_laser(), Location::LeftArm);
            for slot in &mut unit.location_mut(Location::LeftArm).unwrap().slots {
                if matches!(slot.kind, crate::entity::SlotKind::Actuator) {
                    slot.hit = true;
                }
            }
            // 8 -> one critical; every slot roll lands past the five slots
            let mut dice = ScriptedDice::new([4, 4].into_iter().chain([6; 10]));
            let out = check(&mut state, id, Location::LeftArm, 0, &mut dice).unwrap();
            assert!(out.entries.iter().any(|e| e.message == MessageId::NoCriticalSlots));
            assert_ne!(
                state.arena.get(id).unwrap().mount(laser).unwrap().condition,
                MountCondition::Destroyed
            );
            assert!(dice.is_exhausted());
        }

        #[test]
        fn hardened_armor_can_negate() {
            let (mut state, id) = mek_state();
            let mut dice = ScriptedDice::new([4, 5]);
            let out = check(&mut state, id, Location::LeftArm, -2, &mut dice).unwrap();
            assert!(out.entries.iter().any(|e| e.message == MessageId::NoCritical));
        }

        #[test]
        fn limb_blown_off_on_twelve() {
            let (mut state, id) = mek_state();
            let mut dice = ScriptedDice::new([6, 6]);
            let out = check(&mut state, id, Location::RightLeg, 0, &mut dice).unwrap();
            assert!(out.entries.iter().any(|e| e.message == MessageId::LocationBlownOff));
            assert!(!state.arena.get(id).unwrap().has_intact(Location::RightLeg));
        }

        #[test]
        fn torso_takes_three_criticals_on_twelve() {
            let (mut state, id) = mek_state();
            // ten slots: half die then slot die, three times
            let mut dice = ScriptedDice::new([6, 6, 1, 1, 1, 2, 1, 3]);
            let out = check(&mut state, id, Location::CenterTorso, 0, &mut dice).unwrap();
            assert!(out.unit_destroyed);
            assert_eq!(state.arena.get(id).unwrap().engine_hits, 3);
        }

        #[test]
        fn location_without_slots_reports_it() {
            let mut state = GameState::new(Board::new(8, 8));
            let id = state.arena.spawn(
                Unit::new(UnitKind::Mek, "M").with_location(Location::LeftArm, LocationState::new(5, 5)),
            );
            let mut dice = ScriptedDice::new([5, 5]);
            let out = check(&mut state, id, Location::LeftArm, 0, &mut dice).unwrap();
            assert!(out.entries.iter().any(|e| e.message == MessageId::NoCriticalSlots));
        }

        #[test]
        fn hit_slots_are_rerolled() {
            let (mut state, id) = mek_state();
            let mut dice = ScriptedDice::new([4, 4, 1, 1]);
            check(&mut state, id, Location::Head, 0, &mut dice).unwrap();
            // life support taken; a second check rerolls slot 1 onto sensors
            let mut dice = ScriptedDice::new([4, 4, 1, 2]);
            let out = check(&mut state, id, Location::Head, 0, &mut dice).unwrap();
            assert!(out
                .entries
                .iter()
                .any(|e| e.message == MessageId::CriticalHit && e.params.get(1).is_some_and(|p| p.to_string() == "sensors")));
        }
    }
}
