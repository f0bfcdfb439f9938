//! Attach/detach attacks: grapples and Battle Armor swarms.

use tracing::debug;

use crate::dice::Dice;
use crate::entity::EntityId;
use crate::error::StateError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::resolver::mutate::{MutationOutcome, StateMutator};
use crate::to_hit::ToHitResult;
use crate::weapon::FiringMode;

/// 2d6 a swarming squad needs to let go.
const SWARM_DETACH_TARGET: u32 = 7;

fn missed(attacker: EntityId) -> ReportEntry {
    ReportEntry::new(MessageId::AttackMissed).subject(attacker).indent(1)
}

/// Grapple attach or detach.
///
/// # Errors
///
/// Unknown attacker or target.
pub fn grapple(
    mode: FiringMode,
    attacker: EntityId,
    target: EntityId,
    to_hit: &ToHitResult,
    state: &mut GameState,
) -> Result<MutationOutcome, StateError> {
    let mut out = MutationOutcome::default();
    let linked = |state: &GameState, id: EntityId| {
        state
            .arena
            .get(id)
            .map(|u| u.grappled_with)
            .ok_or(StateError::UnknownEntity(id))
    };

    if mode == FiringMode::Detach {
        match state.unlink_grapple(attacker)? {
            Some(partner) => out.entries.push(
                ReportEntry::new(MessageId::GrappleReleased)
                    .subject(attacker)
                    .param(partner)
                    .indent(1),
            ),
            None => out.entries.push(ReportEntry::new(MessageId::NotGrappled).subject(attacker).indent(1)),
        }
        return Ok(out);
    }

    if linked(&*state, attacker)?.is_some() || linked(&*state, target)?.is_some() {
        out.entries.push(
            ReportEntry::new(MessageId::AlreadyGrappled)
                .subject(attacker)
                .param(target)
                .indent(1),
        );
        return Ok(out);
    }
    if !to_hit.is_hit() {
        out.entries.push(missed(attacker));
        return Ok(out);
    }
    state.link_grapple(attacker, target)?;
    debug!(%attacker, %target, "grapple attached");
    out.entries.push(
        ReportEntry::new(MessageId::GrappleAttached)
            .subject(attacker)
            .param(target)
            .indent(1),
    );
    Ok(out)
}

/// Swarm attach or detach.
///
/// # Errors
///
/// Unknown attacker or target.
pub fn swarm(
    mode: FiringMode,
    attacker: EntityId,
    target: EntityId,
    to_hit: &ToHitResult,
    state: &mut GameState,
    dice: &mut dyn Dice,
) -> Result<MutationOutcome, StateError> {
    let mut out = MutationOutcome::default();
    let current = state
        .arena
        .get(attacker)
        .ok_or(StateError::UnknownEntity(attacker))?
        .swarming;

    if mode == FiringMode::Detach {
        let Some(swarmed) = current else {
            out.entries.push(ReportEntry::new(MessageId::NotSwarming).subject(attacker).indent(1));
            return Ok(out);
        };
        let roll = dice.roll_2d6();
        out.entries.push(
            ReportEntry::new(MessageId::SwarmDetachRoll)
                .subject(attacker)
                .param(roll)
                .param(SWARM_DETACH_TARGET)
                .indent(1),
        );
        if roll >= SWARM_DETACH_TARGET {
            state.unlink_swarm(attacker)?;
            out.entries.push(
                ReportEntry::new(MessageId::SwarmDetached)
                    .subject(attacker)
                    .param(swarmed)
                    .indent(1),
            );
        } else {
            out.entries.push(ReportEntry::new(MessageId::SwarmHolds).subject(attacker).indent(1));
        }
        return Ok(out);
    }

    if let Some(swarmed) = current {
        out.entries.push(
            ReportEntry::new(MessageId::AlreadySwarming)
                .subject(attacker)
                .param(swarmed)
                .indent(1),
        );
        return Ok(out);
    }
    if !to_hit.is_hit() {
        out.entries.push(missed(attacker));
        return Ok(out);
    }
    state.link_swarm(attacker, target)?;
    out.entries.push(
        ReportEntry::new(MessageId::SwarmAttached)
            .subject(attacker)
            .param(target)
            .indent(1),
    );
    Ok(out)
}
