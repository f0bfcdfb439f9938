//! Attacks on a hex rather than a unit: fire suppression and smoke.

use gunline_board::{BoardOracle, HexCoord, SmokeDensity};

use crate::entity::{StatusFlags, UnitKind};
use crate::error::StateError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::resolver::context::AttackContext;
use crate::resolver::mutate::{MutationOutcome, StateMutator};
use crate::weapon::Munition;

/// Turns delivered smoke lingers.
pub const SMOKE_TURNS: u8 = 3;

/// Heat coolant draws from each Mek in the hex.
const COOLANT_HEAT: u32 = 3;

/// Puts out the fire in the target hex and on everyone standing in it.
///
/// # Errors
///
/// Propagates mutator lookup failures.
pub fn suppress_fire(
    ctx: &AttackContext,
    state: &mut GameState,
) -> Result<MutationOutcome, StateError> {
    let mut out = MutationOutcome::default();
    let hex = ctx.target_hex;
    let message = if state.board.extinguish(hex) {
        MessageId::FireExtinguished
    } else {
        MessageId::NoFireToExtinguish
    };
    out.entries.push(ReportEntry::new(message).subject(ctx.attacker).param(hex).indent(1));

    let coolant = ctx.munition() == Munition::Coolant;
    for id in state.arena.units_at(hex) {
        let unit = state.arena.get(id).ok_or(StateError::UnknownEntity(id))?;
        let burning = unit.status.contains(StatusFlags::ON_FIRE);
        let cooled = if coolant && unit.kind() == UnitKind::Mek {
            unit.heat.min(COOLANT_HEAT)
        } else {
            0
        };
        if burning {
            state.set_status(id, StatusFlags::ON_FIRE, false)?;
            out.entries.push(ReportEntry::new(MessageId::OccupantExtinguished).subject(id).indent(2));
        }
        if cooled > 0 {
            let heat = state.add_heat(id, -i32::try_from(cooled).unwrap_or(0))?;
            out.entries.push(
                ReportEntry::new(MessageId::CoolantApplied)
                    .subject(id)
                    .param(cooled)
                    .param(heat)
                    .indent(2),
            );
        }
    }
    Ok(out)
}

/// Fills the target hex with smoke.
pub fn deliver_smoke(ctx: &AttackContext, state: &mut GameState) -> MutationOutcome {
    let mut out = MutationOutcome::default();
    screen(state, ctx, ctx.target_hex, &mut out);
    out
}

/// Smoke one hex and report everyone it screens.
pub(super) fn screen(state: &mut GameState, ctx: &AttackContext, hex: HexCoord, out: &mut MutationOutcome) {
    state.board.deliver_smoke(hex, SmokeDensity::Light, SMOKE_TURNS);
    out.entries.push(
        ReportEntry::new(MessageId::SmokeDelivered)
            .subject(ctx.attacker)
            .param(hex)
            .indent(1),
    );
    for id in state.arena.units_at(hex) {
        out.entries.push(
            ReportEntry::new(MessageId::OccupantScreened)
                .subject(id)
                .param(hex)
                .indent(2),
        );
    }
}
