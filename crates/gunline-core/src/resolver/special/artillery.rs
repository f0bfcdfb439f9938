//! Area-effect artillery.

use gunline_board::{BlastPattern, BoardOracle, Direction, HexCoord};
use tracing::debug;

use super::environment::screen;
use crate::config::RulesConfig;
use crate::dice::Dice;
use crate::error::StateError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::resolver::context::AttackContext;
use crate::resolver::effects::{self, HitApplication};
use crate::resolver::hits::{HitAudit, HitOutcome, HitPath};
use crate::resolver::mutate::MutationOutcome;
use crate::resolver::registry::LocationRule;
use crate::to_hit::{HitSide, ToHitResult};
use crate::weapon::Munition;

/// Area damage is applied in clusters of this size.
const AREA_GROUP: u32 = 5;

/// Lands the shell, scattering it on a miss, and applies its payload.
///
/// # Errors
///
/// Propagates mutator lookup failures.
pub fn resolve(
    ctx: &AttackContext,
    to_hit: &ToHitResult,
    rules: &RulesConfig,
    state: &mut GameState,
    dice: &mut dyn Dice,
) -> Result<MutationOutcome, StateError> {
    let mut out = MutationOutcome::default();
    let impact = if to_hit.is_hit() {
        ctx.target_hex
    } else {
        scatter(ctx, to_hit, dice, &mut out)
    };

    if !state.board.contains(impact) {
        out.entries.push(
            ReportEntry::new(MessageId::ArtilleryOffBoard)
                .subject(ctx.attacker)
                .param(impact)
                .indent(1),
        );
        return Ok(out);
    }

    let spec = &ctx.mount.spec;
    if ctx.munition() == Munition::Smoke {
        for (hex, _) in BlastPattern::artillery(impact, 0, 0).hexes_on(&state.board) {
            screen(state, ctx, hex, &mut out);
        }
        return Ok(out);
    }

    out.entries.push(
        ReportEntry::new(MessageId::ArtilleryImpact)
            .subject(ctx.attacker)
            .param(impact)
            .indent(1),
    );
    let pattern = BlastPattern::artillery(impact, spec.damage, spec.splash);
    for (hex, damage) in pattern.hexes_on(&state.board) {
        if damage == 0 {
            continue;
        }
        for occupant in state.arena.units_at(hex) {
            out.entries.push(
                ReportEntry::new(MessageId::AreaDamage)
                    .subject(occupant)
                    .param(hex)
                    .param(damage)
                    .indent(1),
            );
            let outcome = area_hits(damage);
            let hit = HitApplication {
                target: occupant,
                outcome: &outcome,
                side: HitSide::Front,
                rule: LocationRule::Rolled,
                designated: None,
                crit_modifier: 0,
                rules,
            };
            effects::apply_hits(state, &hit, dice, &mut out)?;
        }
    }
    Ok(out)
}

fn scatter(
    ctx: &AttackContext,
    to_hit: &ToHitResult,
    dice: &mut dyn Dice,
    out: &mut MutationOutcome,
) -> HexCoord {
    let distance = to_hit.margin.unsigned_abs().max(1);
    let direction = Direction::from_d6(dice.roll_d6(1));
    let landed = ctx.target_hex.translated(direction, distance);
    debug!(from = %ctx.target_hex, to = %landed, distance, "artillery scatter");
    out.entries.push(
        ReportEntry::new(MessageId::ArtilleryScatter)
            .subject(ctx.attacker)
            .param(ctx.target_hex)
            .param(direction)
            .param(distance)
            .param(landed)
            .indent(1),
    );
    landed
}

/// Area damage as one-point hits grouped five to a location roll.
fn area_hits(damage: u32) -> HitOutcome {
    HitOutcome {
        hits: damage,
        damage_per_hit: 1,
        cluster_table: false,
        salvo: true,
        group: AREA_GROUP,
        audit: HitAudit {
            path: HitPath::AllHit,
            modifier: 0,
            roll: None,
        },
    }
}
