//! Per-attack resolution state machine.
//!
//! ```text
//! Declared ─┬─> ChecksPassed ─┬─> HitsComputed ─> DamageApplied ─┐
//!           │                 └─> Aborted ───────────────────────┤
//!           └─> ChecksFailed ────────────────────────────────────┴─> Done
//! ```
//!
//! A [`ResolutionState`] is created when `resolve` starts and consumed into
//! a [`Resolution`] when it ends. It never re-enters an earlier phase.

use serde::{Deserialize, Serialize};

use super::hits::HitOutcome;
use crate::error::StateError;
use crate::report::{MessageId, Report, ReportEntry};

/// Phase of one attack resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Attack declared; nothing checked yet.
    Declared,
    /// Preconditions and pre-fire checks passed.
    ChecksPassed,
    /// A precondition or malfunction stopped the attack before damage.
    ChecksFailed,
    /// Hit count and per-hit damage known.
    HitsComputed,
    /// Damage and secondary effects applied.
    DamageApplied,
    /// A special case did its own work outside the hit/damage pipeline.
    Aborted,
    /// Resolution finished.
    Done,
}

impl Phase {
    /// Whether `next` may follow `self`.
    #[must_use]
    pub fn can_advance_to(self, next: Phase) -> bool {
        use Phase::{Aborted, ChecksFailed, ChecksPassed, DamageApplied, Declared, Done, HitsComputed};
        matches!(
            (self, next),
            (Declared, ChecksPassed | ChecksFailed)
                | (ChecksPassed, HitsComputed | Aborted)
                | (HitsComputed, DamageApplied)
                | (ChecksFailed | DamageApplied | Aborted, Done)
        )
    }

    /// Whether the phase ends the work of a resolution (only `Done` may
    /// follow).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Phase::ChecksFailed | Phase::DamageApplied | Phase::Aborted
        )
    }
}

/// Mutable scratch space owned by one resolution.
#[derive(Debug)]
pub struct ResolutionState {
    phase: Phase,
    path: Vec<Phase>,
    report: Report,
    hits: Option<HitOutcome>,
    /// Shots actually fired.
    pub shots_fired: u32,
    /// Rounds removed from bins.
    pub ammo_consumed: u32,
    /// Heat added to the attacker.
    pub heat_generated: u32,
    /// The target was destroyed during this resolution.
    pub target_destroyed: bool,
}

impl ResolutionState {
    /// A fresh resolution in [`Phase::Declared`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Declared,
            path: vec![Phase::Declared],
            report: Report::new(),
            hits: None,
            shots_fired: 0,
            ammo_consumed: 0,
            heat_generated: 0,
            target_destroyed: false,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Moves to `next`.
    ///
    /// # Panics
    ///
    /// Panics on an illegal transition. A resolution that tries to go back
    /// or skip ahead is a programming error.
    pub fn advance(&mut self, next: Phase) {
        assert!(
            self.phase.can_advance_to(next),
            "illegal resolution transition {:?} -> {:?}",
            self.phase,
            next
        );
        self.phase = next;
        self.path.push(next);
    }

    /// Whether the resolution has finished.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Asserts the resolution may still mutate state.
    ///
    /// # Panics
    ///
    /// Panics once the resolution is done.
    pub fn ensure_active(&self) {
        assert!(!self.is_done(), "resolution already done");
    }

    /// Appends a report entry.
    ///
    /// # Panics
    ///
    /// Panics once the resolution is done.
    pub fn push(&mut self, entry: ReportEntry) {
        self.ensure_active();
        self.report.push(entry);
    }

    /// Appends several report entries.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = ReportEntry>) {
        self.ensure_active();
        self.report.extend(entries);
    }

    /// The report so far.
    #[must_use]
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Records the hit outcome.
    pub fn set_hits(&mut self, hits: HitOutcome) {
        self.hits = Some(hits);
    }

    /// Unwraps a mutator result, reporting a rejection instead of failing.
    pub fn absorb<T>(&mut self, result: Result<T, StateError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!(error = %e, "state mutation rejected");
                self.push(ReportEntry::new(MessageId::StateRejected).param(e.to_string()));
                None
            }
        }
    }

    /// Moves to [`Phase::Done`] and packages the outcome.
    ///
    /// # Panics
    ///
    /// Panics unless the current phase is terminal.
    #[must_use]
    pub fn finish(mut self) -> Resolution {
        let outcome = self.phase;
        self.advance(Phase::Done);
        Resolution {
            report: self.report,
            outcome,
            path: self.path,
            hits: self.hits,
            shots_fired: self.shots_fired,
            ammo_consumed: self.ammo_consumed,
            heat_generated: self.heat_generated,
            target_destroyed: self.target_destroyed,
        }
    }
}

impl Default for ResolutionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one finished resolution produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Ordered report entries.
    pub report: Report,
    /// Last phase before `Done`: `ChecksFailed`, `DamageApplied` or
    /// `Aborted`.
    pub outcome: Phase,
    /// Every phase visited, in order.
    pub path: Vec<Phase>,
    /// Hit count and per-hit damage, for attacks that reached the hit step.
    pub hits: Option<HitOutcome>,
    /// Shots actually fired.
    pub shots_fired: u32,
    /// Rounds removed from bins.
    pub ammo_consumed: u32,
    /// Heat added to the attacker.
    pub heat_generated: u32,
    /// The target unit ended the resolution destroyed.
    pub target_destroyed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod transition_tests {
        use super::*;

        #[test]
        fn standard_path() {
            let mut rs = ResolutionState::new();
            rs.advance(Phase::ChecksPassed);
            rs.advance(Phase::HitsComputed);
            rs.advance(Phase::DamageApplied);
            let res = rs.finish();
            assert_eq!(res.outcome, Phase::DamageApplied);
            assert_eq!(
                res.path,
                vec![
                    Phase::Declared,
                    Phase::ChecksPassed,
                    Phase::HitsComputed,
                    Phase::DamageApplied,
                    Phase::Done
                ]
            );
        }

        #[test]
        fn special_path() {
            let mut rs = ResolutionState::new();
            rs.advance(Phase::ChecksPassed);
            rs.advance(Phase::Aborted);
            assert_eq!(rs.finish().outcome, Phase::Aborted);
        }

        #[test]
        #[should_panic(expected = "illegal resolution transition")]
        fn cannot_go_back() {
            let mut rs = ResolutionState::new();
            rs.advance(Phase::ChecksPassed);
            rs.advance(Phase::Declared);
        }

        #[test]
        #[should_panic(expected = "illegal resolution transition")]
        fn failed_checks_skip_damage() {
            let mut rs = ResolutionState::new();
            rs.advance(Phase::ChecksFailed);
            rs.advance(Phase::HitsComputed);
        }

        #[test]
        #[should_panic(expected = "illegal resolution transition")]
        fn finish_requires_terminal_phase() {
            let rs = ResolutionState::new();
            let _ = rs.finish();
        }

        #[test]
        fn terminal_phases() {
            assert!(Phase::ChecksFailed.is_terminal());
            assert!(Phase::Aborted.is_terminal());
            assert!(!Phase::HitsComputed.is_terminal());
            assert!(!Phase::Done.is_terminal());
        }
    }

    mod report_tests {
        use super::*;
        use crate::entity::EntityId;

        #[test]
        fn absorb_reports_rejections() {
            let mut rs = ResolutionState::new();
            let v: Option<u32> = rs.absorb(Err(StateError::UnknownEntity(EntityId::new(9))));
            assert!(v.is_none());
            assert!(rs.report().contains(MessageId::StateRejected));
            assert_eq!(rs.absorb(Ok(3)), Some(3));
        }
    }
}
