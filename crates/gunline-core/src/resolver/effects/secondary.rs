//! Fire and electromagnetic effects that follow damage.

use gunline_board::{BoardOracle, HexCoord};
use tracing::debug;

use super::critical;
use crate::dice::Dice;
use crate::entity::{Abilities, EntityId, Location, StatusFlags, UnitKind};
use crate::error::StateError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::resolver::mutate::{MutationOutcome, StateMutator};
use crate::resolver::registry::HookFlags;

/// Heat an inferno missile adds to a Mek.
const INFERNO_HEAT: u32 = 2;

/// Runs the hooks in `flags` after `hits` hits landed on `target` in `hex`.
///
/// # Errors
///
/// Propagates mutator lookup failures.
pub fn apply(
    state: &mut GameState,
    flags: HookFlags,
    target: Option<EntityId>,
    hex: HexCoord,
    hits: u32,
    dice: &mut dyn Dice,
) -> Result<MutationOutcome, StateError> {
    let mut out = MutationOutcome::default();
    if hits == 0 {
        return Ok(out);
    }
    if flags.contains(HookFlags::INFERNO) {
        inferno(state, target, hex, hits, &mut out)?;
    }
    if flags.contains(HookFlags::IGNITION_ROLL) {
        ignition_roll(state, hex, dice, &mut out);
    }
    if flags.contains(HookFlags::EMP) {
        if let Some(target) = target {
            emp(state, target, dice, &mut out)?;
        }
    }
    Ok(out)
}

fn inferno(
    state: &mut GameState,
    target: Option<EntityId>,
    hex: HexCoord,
    hits: u32,
    out: &mut MutationOutcome,
) -> Result<(), StateError> {
    if state.environment.vacuum {
        out.entries.push(ReportEntry::new(MessageId::VacuumNoFire).param(hex).indent(1));
        return Ok(());
    }
    if let Some(id) = target {
        let unit = state.arena.get(id).ok_or(StateError::UnknownEntity(id))?;
        if !unit.is_destroyed() {
            if unit.kind() == UnitKind::Mek {
                let heat = hits * INFERNO_HEAT;
                state.add_heat(id, i32::try_from(heat).unwrap_or(i32::MAX))?;
                out.entries.push(
                    ReportEntry::new(MessageId::InfernoHeat)
                        .subject(id)
                        .param(hits)
                        .param(heat)
                        .indent(1),
                );
            } else {
                state.set_status(id, StatusFlags::ON_FIRE, true)?;
                out.entries.push(ReportEntry::new(MessageId::TargetSetAlight).subject(id).indent(1));
            }
        }
    }
    if state.board.ignite(hex) {
        out.entries.push(ReportEntry::new(MessageId::TerrainIgnited).param(hex).indent(1));
    }
    Ok(())
}

fn ignition_roll(state: &mut GameState, hex: HexCoord, dice: &mut dyn Dice, out: &mut MutationOutcome) {
    if state.environment.vacuum {
        out.entries.push(ReportEntry::new(MessageId::VacuumNoFire).param(hex).indent(1));
        return;
    }
    let Some(target) = state.board.terrain(hex).ignition_target() else {
        return;
    };
    if state.board.is_on_fire(hex) {
        return;
    }
    let roll = dice.roll_2d6();
    out.entries.push(
        ReportEntry::new(MessageId::IgnitionRoll)
            .param(hex)
            .param(roll)
            .param(target)
            .indent(1),
    );
    if roll >= target && state.board.ignite(hex) {
        out.entries.push(ReportEntry::new(MessageId::TerrainIgnited).param(hex).indent(1));
    } else {
        out.entries.push(ReportEntry::new(MessageId::IgnitionFailed).param(hex).indent(1));
    }
}

fn emp(
    state: &mut GameState,
    target: EntityId,
    dice: &mut dyn Dice,
    out: &mut MutationOutcome,
) -> Result<(), StateError> {
    let unit = state.arena.get(target).ok_or(StateError::UnknownEntity(target))?;
    if unit.is_destroyed() {
        return Ok(());
    }
    let kind = unit.kind();
    let legless = kind == UnitKind::Mek
        && !(unit.has_intact(Location::LeftLeg) && unit.has_intact(Location::RightLeg));
    let armor_traits = unit.armor_traits;

    let roll = dice.roll_2d6();
    out.entries.push(
        ReportEntry::new(MessageId::EmpRoll)
            .subject(target)
            .param(roll)
            .indent(1),
    );

    match roll {
        0..=6 => out.entries.push(ReportEntry::new(MessageId::EmpNoEffect).subject(target).indent(1)),
        7 | 8 => {
            state.set_status(target, StatusFlags::INTERFERENCE, true)?;
            out.entries.push(ReportEntry::new(MessageId::EmpInterference).subject(target).indent(1));
        }
        _ if kind.is_infantry() => {
            state.set_status(target, StatusFlags::STUNNED, true)?;
            out.entries.push(ReportEntry::new(MessageId::EmpStunned).subject(target).indent(1));
        }
        _ => {
            state.set_status(target, StatusFlags::SHUTDOWN, true)?;
            out.entries.push(ReportEntry::new(MessageId::EmpShutdown).subject(target).indent(1));
            if legless {
                state.set_status(target, StatusFlags::PRONE, true)?;
                out.entries.push(ReportEntry::new(MessageId::ShutdownCollapse).subject(target).indent(1));
                debug!(%target, "shutdown collapse");
                let modifier = critical::critical_modifier(armor_traits, Abilities::empty());
                out.merge(critical::check(state, target, Location::CenterTorso, modifier, dice)?);
            }
        }
    }
    Ok(())
}
