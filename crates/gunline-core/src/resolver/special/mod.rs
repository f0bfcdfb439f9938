//! Special-case resolutions that never compute hits or damage per weapon.
//!
//! Each case runs its own complete logic after the shared preconditions
//! have passed and the weapon has fired, and always ends the resolution in
//! the `Aborted` phase.

pub mod artillery;
pub mod environment;
pub mod marking;
pub mod toggle;

use tracing::trace;

use super::context::AttackContext;
use super::mutate::MutationOutcome;
use super::registry::SpecialCase;
use crate::config::RulesConfig;
use crate::dice::Dice;
use crate::error::StateError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::to_hit::ToHitResult;

use marking::Mark;

impl SpecialCase {
    /// Whether the case needs a unit as its target.
    #[must_use]
    pub const fn needs_unit_target(self) -> bool {
        matches!(
            self,
            SpecialCase::Tag | SpecialCase::Narc | SpecialCase::Grapple | SpecialCase::Swarm
        )
    }
}

/// Runs a special case.
///
/// # Errors
///
/// Propagates mutator lookup failures.
pub fn resolve(
    case: SpecialCase,
    ctx: &AttackContext,
    to_hit: &ToHitResult,
    rules: &RulesConfig,
    state: &mut GameState,
    dice: &mut dyn Dice,
) -> Result<MutationOutcome, StateError> {
    trace!(?case, "special case");
    let target = ctx.target.map(|t| t.id);
    let unit_target = match (case.needs_unit_target(), target) {
        (true, None) => {
            let mut out = MutationOutcome::default();
            out.entries.push(
                ReportEntry::new(MessageId::TargetRequired)
                    .subject(ctx.attacker)
                    .indent(1),
            );
            return Ok(out);
        }
        (_, t) => t,
    };

    match (case, unit_target) {
        (SpecialCase::Artillery, _) => artillery::resolve(ctx, to_hit, rules, state, dice),
        (SpecialCase::Tag, Some(t)) => marking::mark(Mark::Tag, ctx.attacker, t, to_hit, state),
        (SpecialCase::Narc, Some(t)) => marking::mark(Mark::Narc, ctx.attacker, t, to_hit, state),
        (SpecialCase::Grapple, Some(t)) => toggle::grapple(ctx.key.mode, ctx.attacker, t, to_hit, state),
        (SpecialCase::Swarm, Some(t)) => toggle::swarm(ctx.key.mode, ctx.attacker, t, to_hit, state, dice),
        (SpecialCase::FireSuppression | SpecialCase::SmokeDelivery, _) if !to_hit.is_hit() => {
            let mut out = MutationOutcome::default();
            out.entries.push(
                ReportEntry::new(MessageId::AttackMissed)
                    .subject(ctx.attacker)
                    .indent(1),
            );
            Ok(out)
        }
        (SpecialCase::FireSuppression, _) => environment::suppress_fire(ctx, state),
        (SpecialCase::SmokeDelivery, _) => Ok(environment::deliver_smoke(ctx, state)),
        (SpecialCase::Tag | SpecialCase::Narc | SpecialCase::Grapple | SpecialCase::Swarm, None) => {
            Ok(MutationOutcome::default())
        }
    }
}
