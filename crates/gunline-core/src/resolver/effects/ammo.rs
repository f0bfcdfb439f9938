//! Ammunition draw.

use tracing::debug;

use crate::entity::{BinId, EntityId};
use crate::error::StateError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::resolver::mutate::StateMutator;
use crate::weapon::{AmmoFamily, Munition};

/// Rounds drawn for one attack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmmoDraw {
    /// Shots that actually fire.
    pub fired: u32,
    /// Entries describing consumption, reloads and truncation.
    pub entries: Vec<ReportEntry>,
}

/// Draws up to `requested` rounds, one at a time, starting from `bin`.
///
/// When the current bin runs dry the lowest-numbered compatible bin that
/// still holds rounds takes over. If none is left the burst is cut short.
///
/// # Errors
///
/// Unknown attacker or bin.
pub fn draw(
    state: &mut GameState,
    attacker: EntityId,
    family: AmmoFamily,
    munition: Munition,
    bin: BinId,
    requested: u32,
) -> Result<AmmoDraw, StateError> {
    let mut draw = AmmoDraw::default();
    let mut current = bin;
    let mut from_current = 0;
    while draw.fired < requested {
        let left = shots_in(state, attacker, current)?;
        if left == 0 {
            let Some(next) = reload_candidate(state, attacker, family, munition)? else {
                draw.entries.push(
                    ReportEntry::new(MessageId::BurstTruncated)
                        .subject(attacker)
                        .param(draw.fired)
                        .param(requested)
                        .indent(1),
                );
                debug!(%attacker, fired = draw.fired, requested, "burst truncated");
                break;
            };
            flush(&mut draw, state, attacker, current, from_current)?;
            draw.entries.push(
                ReportEntry::new(MessageId::AmmoReloaded)
                    .subject(attacker)
                    .param(current.to_string())
                    .param(next.to_string())
                    .indent(1),
            );
            current = next;
            from_current = 0;
            continue;
        }
        state.consume_ammo(attacker, current, 1)?;
        from_current += 1;
        draw.fired += 1;
    }
    flush(&mut draw, state, attacker, current, from_current)?;
    Ok(draw)
}

fn shots_in(state: &GameState, unit: EntityId, bin: BinId) -> Result<u32, StateError> {
    state
        .arena
        .get(unit)
        .ok_or(StateError::UnknownEntity(unit))?
        .bin(bin)
        .map(|b| b.shots)
        .ok_or(StateError::UnknownBin(unit, bin))
}

fn reload_candidate(
    state: &GameState,
    unit: EntityId,
    family: AmmoFamily,
    munition: Munition,
) -> Result<Option<BinId>, StateError> {
    Ok(state
        .arena
        .get(unit)
        .ok_or(StateError::UnknownEntity(unit))?
        .bins()
        .find(|b| b.is_compatible(family, munition) && b.shots > 0)
        .map(|b| b.id))
}

fn flush(
    draw: &mut AmmoDraw,
    state: &GameState,
    unit: EntityId,
    bin: BinId,
    used: u32,
) -> Result<(), StateError> {
    if used > 0 {
        draw.entries.push(
            ReportEntry::new(MessageId::AmmoConsumed)
                .subject(unit)
                .param(bin.to_string())
                .param(used)
                .param(shots_in(state, unit, bin)?)
                .indent(1),
        );
    }
    Ok(())
}
