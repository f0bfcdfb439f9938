//! Weapon-bay attack value.

use tracing::trace;

use super::DamageTarget;
use crate::entity::EntityId;
use crate::report::{MessageId, ReportEntry};
use crate::weapon::{Munition, WeaponSpec};

/// Attack value of a bay firing its first `fired` members.
///
/// Members are summed, then cluster munitions take ×0.6 and glancing
/// blows ×0.5, each rounded down, once for the whole bay. A capital-scale
/// target converts the result to capital damage, rounding half up.
pub fn attack_value(
    members: &[WeaponSpec],
    fired: usize,
    munition: Munition,
    glancing: bool,
    target: &DamageTarget,
    subject: EntityId,
    entries: &mut Vec<ReportEntry>,
) -> u32 {
    let mut av: u32 = members.iter().take(fired).map(|m| m.damage).sum();
    if munition == Munition::Cluster {
        av = av * 6 / 10;
    }
    if glancing {
        av /= 2;
    }
    entries.push(
        ReportEntry::new(MessageId::BayAttackValue)
            .subject(subject)
            .param(av)
            .indent(1),
    );
    if target.capital_scale {
        let capital = (av + 5) / 10;
        entries.push(
            ReportEntry::new(MessageId::CapitalConversion)
                .subject(subject)
                .param(av)
                .param(capital)
                .indent(1),
        );
        av = capital;
    }
    trace!(fired, av, "bay attack value");
    av
}
