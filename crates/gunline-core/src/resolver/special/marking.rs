//! Designation attacks: TAG and Narc.

use crate::entity::{EntityId, StatusFlags};
use crate::error::StateError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::resolver::mutate::{MutationOutcome, StateMutator};
use crate::to_hit::ToHitResult;

/// What a marking attack leaves on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// TAG laser designation.
    Tag,
    /// Narc homing pod.
    Narc,
}

impl Mark {
    const fn flag(self) -> StatusFlags {
        match self {
            Mark::Tag => StatusFlags::TAG_DESIGNATED,
            Mark::Narc => StatusFlags::NARC_ATTACHED,
        }
    }

    const fn message(self) -> MessageId {
        match self {
            Mark::Tag => MessageId::TargetDesignated,
            Mark::Narc => MessageId::NarcAttached,
        }
    }
}

/// Marks `target` on a hit.
///
/// # Errors
///
/// Unknown target.
pub fn mark(
    mark: Mark,
    attacker: EntityId,
    target: EntityId,
    to_hit: &ToHitResult,
    state: &mut GameState,
) -> Result<MutationOutcome, StateError> {
    let mut out = MutationOutcome::default();
    if !to_hit.is_hit() {
        out.entries.push(ReportEntry::new(MessageId::AttackMissed).subject(attacker).indent(1));
        return Ok(out);
    }
    state.set_status(target, mark.flag(), true)?;
    out.entries.push(
        ReportEntry::new(mark.message())
            .subject(target)
            .param(attacker)
            .indent(1),
    );
    Ok(out)
}
