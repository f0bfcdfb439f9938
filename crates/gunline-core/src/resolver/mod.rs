//! Attack resolution.
//!
//! [`AttackResolver`] takes one declared attack and its to-hit result and
//! drives it through the phase machine in [`state`]:
//!
//! 1. Shared preconditions ([`AttackContext::capture`])
//! 2. Variant selection by `(category, munition, mode)` ([`registry`])
//! 3. Pre-fire checks: feed faults, Streak lock, ammo draw, jams, heat
//! 4. Hit count ([`hits`]) and per-hit damage ([`damage`])
//! 5. Locations, criticals and secondary effects ([`effects`])
//!
//! Special cases ([`special`]) leave the pipeline after step 3.
//!
//! # Invariants
//!
//! - Every state change goes through [`StateMutator`]
//! - Dice are drawn in a fixed order, so a seeded run replays exactly
//! - A mutator rejection is reported, never propagated as a failure
//!
//! # Example
//!
//! ```
//! use gunline_board::{Board, HexCoord};
//! use gunline_core::config::RulesConfig;
//! use gunline_core::dice::ScriptedDice;
//! use gunline_core::entity::{Location, Unit, UnitKind};
//! use gunline_core::game::GameState;
//! use gunline_core::resolver::{AttackResolver, Phase};
//! use gunline_core::to_hit::ToHitResult;
//! use gunline_core::weapon::catalog;
//! use gunline_core::{AttackDeclaration, AttackTarget};
//!
//! let mut state = GameState::new(Board::new(10, 10));
//! let mut mek = Unit::new(UnitKind::Mek, "Hunchback").at(HexCoord::new(1, 1));
//! let laser = mek.add_mount(catalog::medium_laser(), Location::RightArm);
//! let attacker = state.arena.spawn(mek);
//! let target = state
//!     .arena
//!     .spawn(Unit::new(UnitKind::Mek, "Locust").at(HexCoord::new(4, 4)));
//!
//! let resolver = AttackResolver::standard(RulesConfig::default()).unwrap();
//! let decl = AttackDeclaration::new(1, attacker, AttackTarget::Entity(target), laser);
//! // Hit on 8 against 6; location roll 7 (centre torso).
//! let mut dice = ScriptedDice::new([4, 3]);
//! let resolution = resolver.resolve(&decl, &ToHitResult::rolled(6, 8), &mut state, &mut dice);
//!
//! assert_eq!(resolution.outcome, Phase::DamageApplied);
//! assert_eq!(resolution.heat_generated, 3);
//! ```

pub mod context;
pub mod damage;
pub mod effects;
pub mod hits;
pub mod mutate;
pub mod registry;
pub mod special;
pub mod state;

use std::collections::BTreeSet;

use tracing::{debug, debug_span, trace};

pub use context::{AttackContext, MountSnapshot, TargetSnapshot};
pub use damage::{DamageInput, DamagePolicy, DamageResult, DamageTarget};
pub use hits::{HitAudit, HitCount, HitInput, HitOutcome, HitPath, HitPolicy};
pub use mutate::{CriticalEffect, DamageFlags, MutationOutcome, StateMutator};
pub use registry::{
    EffectHooks, HookFlags, LocationRule, SpecialCase, StandardVariant, Variant, VariantKind,
    VariantRegistry, VariantRegistryBuilder,
};
pub use state::{Phase, Resolution, ResolutionState};

use crate::attack::{AttackDeclaration, AttackTarget};
use crate::config::RulesConfig;
use crate::dice::Dice;
use crate::entity::{Abilities, MountCondition};
use crate::error::RegistryError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::to_hit::ToHitResult;
use effects::ammo::{self, AmmoDraw};
use effects::critical::critical_modifier;
use effects::{secondary, HitApplication};
use hits::{JamResult, JamTable};

/// Highest feed-check roll that faults.
const FEED_FAULT_MAX: u32 = 4;

/// Resolves declared attacks against a [`GameState`].
///
/// Holds no per-attack state; one resolver can serve a whole game.
#[derive(Debug, Clone)]
pub struct AttackResolver {
    registry: VariantRegistry,
    rules: RulesConfig,
}

impl AttackResolver {
    /// A resolver over an already-validated registry.
    #[must_use]
    pub fn new(registry: VariantRegistry, rules: RulesConfig) -> Self {
        Self { registry, rules }
    }

    /// A resolver over the rule-book registry.
    ///
    /// # Errors
    ///
    /// Returns the registry's validation error. The rule-book table is
    /// total, so this only fails if it is edited inconsistently.
    pub fn standard(rules: RulesConfig) -> Result<Self, RegistryError> {
        Ok(Self::new(VariantRegistry::standard()?, rules))
    }

    /// Optional rules in force.
    #[must_use]
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// The variant registry.
    #[must_use]
    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    /// Resolves one attack, mutating `state` and drawing from `dice`.
    ///
    /// Never fails: a failed precondition ends the attack in
    /// [`Phase::ChecksFailed`] with the cause in the report.
    ///
    /// # Panics
    ///
    /// Panics if `decl.id` was already resolved against `state`.
    pub fn resolve(
        &self,
        decl: &AttackDeclaration,
        to_hit: &ToHitResult,
        state: &mut GameState,
        dice: &mut dyn Dice,
    ) -> Resolution {
        let span = debug_span!(
            "resolve",
            attack = decl.id.0,
            attacker = %decl.attacker,
            weapon = %decl.mount
        );
        let _enter = span.enter();
        assert!(state.mark_resolved(decl.id), "attack {} resolved twice", decl.id);

        let mut rs = ResolutionState::new();
        rs.push(
            ReportEntry::new(MessageId::AttackDeclared)
                .subject(decl.attacker)
                .param(decl.id.0)
                .param(decl.mount.to_string())
                .param(target_param(decl.target)),
        );
        self.run(decl, to_hit, state, dice, &mut rs);

        if let Some(target) = decl.target_entity() {
            rs.target_destroyed = state.arena.get(target).is_some_and(|u| u.is_destroyed());
        }
        let resolution = rs.finish();
        debug!(
            outcome = ?resolution.outcome,
            shots = resolution.shots_fired,
            heat = resolution.heat_generated,
            "attack resolved"
        );
        resolution
    }

    /// Resolves attacks in order against the same state and dice. Later
    /// attacks see everything earlier ones did.
    ///
    /// # Panics
    ///
    /// Panics if two declarations share an attack id, or if any of them was
    /// already resolved against `state`.
    pub fn resolve_sequence(
        &self,
        attacks: &[(AttackDeclaration, ToHitResult)],
        state: &mut GameState,
        dice: &mut dyn Dice,
    ) -> Vec<Resolution> {
        let mut seen = BTreeSet::new();
        for (decl, _) in attacks {
            assert!(seen.insert(decl.id), "attack {} declared twice", decl.id);
        }
        attacks
            .iter()
            .map(|(decl, to_hit)| self.resolve(decl, to_hit, state, dice))
            .collect()
    }

    fn run(
        &self,
        decl: &AttackDeclaration,
        to_hit: &ToHitResult,
        state: &mut GameState,
        dice: &mut dyn Dice,
        rs: &mut ResolutionState,
    ) {
        let ctx = match AttackContext::capture(decl, to_hit, state, &self.rules) {
            Ok(ctx) => ctx,
            Err(cause) => {
                debug!(cause = cause.message.name(), "precondition failed");
                rs.push(cause);
                rs.advance(Phase::ChecksFailed);
                return;
            }
        };
        let Some(variant) = self.registry.lookup(&ctx.key).copied() else {
            rs.push(
                ReportEntry::new(MessageId::IllegalAmmo)
                    .subject(ctx.attacker)
                    .param(ctx.munition().to_string())
                    .indent(1),
            );
            rs.advance(Phase::ChecksFailed);
            return;
        };
        trace!(variant = variant.name, key = ?ctx.key, "variant selected");

        match variant.kind {
            VariantKind::Special(case) => self.run_special(case, &ctx, to_hit, state, dice, rs),
            VariantKind::Standard(standard) => {
                self.run_standard(&standard, decl, &ctx, to_hit, state, dice, rs);
            }
        }
    }

    fn run_special(
        &self,
        case: SpecialCase,
        ctx: &AttackContext,
        to_hit: &ToHitResult,
        state: &mut GameState,
        dice: &mut dyn Dice,
        rs: &mut ResolutionState,
    ) {
        if case.needs_unit_target() && ctx.target.is_none() {
            rs.push(target_required(ctx));
            rs.advance(Phase::ChecksFailed);
            return;
        }
        let fired = match fire(ctx, 1, state, rs) {
            Some(fired) if fired > 0 => fired,
            _ => {
                rs.push(out_of_ammo(ctx));
                rs.advance(Phase::ChecksFailed);
                return;
            }
        };
        rs.shots_fired = fired;
        add_heat(ctx, fired, state, rs);
        rs.advance(Phase::ChecksPassed);

        let outcome = special::resolve(case, ctx, to_hit, &self.rules, state, dice);
        if let Some(outcome) = rs.absorb(outcome) {
            rs.extend(outcome.entries);
        }
        rs.advance(Phase::Aborted);
    }

    #[allow(clippy::too_many_arguments, clippy::too_many_lines)]
    fn run_standard(
        &self,
        variant: &StandardVariant,
        decl: &AttackDeclaration,
        ctx: &AttackContext,
        to_hit: &ToHitResult,
        state: &mut GameState,
        dice: &mut dyn Dice,
        rs: &mut ResolutionState,
    ) {
        let Some(target) = ctx.target else {
            rs.push(target_required(ctx));
            rs.advance(Phase::ChecksFailed);
            return;
        };
        let spec = &ctx.mount.spec;

        if self.rules.ammo_feed_checks && ctx.mount.feed_damaged && spec.uses_ammo() {
            let roll = dice.roll_2d6();
            rs.push(
                ReportEntry::new(MessageId::FeedCheck)
                    .subject(ctx.attacker)
                    .param(ctx.weapon_name())
                    .param(roll)
                    .indent(1),
            );
            if roll <= FEED_FAULT_MAX {
                fire(ctx, 1, state, rs);
                let turns = u8::try_from(dice.roll_d6(1).div_ceil(2)).unwrap_or(u8::MAX);
                let jam = MountCondition::Jammed { turns: Some(turns) };
                let jammed = state.set_mount_condition(ctx.attacker, ctx.mount.id, jam);
                rs.absorb(jammed);
                debug!(weapon = ctx.weapon_name(), turns, "feed fault");
                rs.push(
                    ReportEntry::new(MessageId::FeedFault)
                        .subject(ctx.attacker)
                        .param(ctx.weapon_name())
                        .param(turns)
                        .indent(1),
                );
                rs.advance(Phase::ChecksFailed);
                return;
            }
        }

        if let HitPolicy::Cluster(cluster) = variant.hits {
            if cluster.streak && !to_hit.is_hit() {
                rs.push(
                    ReportEntry::new(MessageId::StreakNoLock)
                        .subject(ctx.attacker)
                        .param(ctx.weapon_name())
                        .indent(1),
                );
                rs.advance(Phase::ChecksPassed);
                rs.set_hits(HitOutcome::new(HitCount::miss(), 0));
                rs.advance(Phase::HitsComputed);
                rs.advance(Phase::DamageApplied);
                return;
            }
        }

        let selected = match variant.hits {
            HitPolicy::Burst(_) => decl.mode.shots(),
            _ if !ctx.mount.bay.is_empty() => u32::try_from(ctx.mount.bay.len()).unwrap_or(u32::MAX),
            _ => 1,
        };
        let fired = match fire(ctx, selected, state, rs) {
            Some(fired) if fired > 0 => fired,
            _ => {
                rs.push(out_of_ammo(ctx));
                rs.advance(Phase::ChecksFailed);
                return;
            }
        };
        rs.shots_fired = fired;

        if let HitPolicy::Burst(table) = variant.hits {
            if jam_check(table, selected, ctx, to_hit, fired, state, rs) {
                return;
            }
        }
        add_heat(ctx, fired, state, rs);
        rs.advance(Phase::ChecksPassed);

        let input = HitInput {
            to_hit,
            rules: &self.rules,
            rack: spec.rack_size,
            shots_fired: fired,
            artemis: ctx.mount.artemis,
            cluster_hitter: ctx.abilities.contains(Abilities::CLUSTER_HITTER),
            lump: target.kind.is_conventional_infantry(),
        };
        let count = variant.hits.count(&input, dice);

        if !to_hit.is_hit() {
            rs.push(
                ReportEntry::new(MessageId::AttackMissed)
                    .subject(ctx.attacker)
                    .param(target.id)
                    .indent(1),
            );
            rs.set_hits(HitOutcome::new(count, 0));
            rs.advance(Phase::HitsComputed);
            rs.advance(Phase::DamageApplied);
            return;
        }

        rs.push(
            ReportEntry::new(MessageId::AttackHit)
                .subject(ctx.attacker)
                .param(target.id)
                .param(ctx.weapon_name())
                .indent(1),
        );
        if to_hit.is_glancing(&self.rules) {
            rs.push(ReportEntry::new(MessageId::GlancingBlow).subject(ctx.attacker).indent(2));
        }
        if let Some(steps) = to_hit.direct_blow(&self.rules) {
            rs.push(
                ReportEntry::new(MessageId::DirectBlow)
                    .subject(ctx.attacker)
                    .param(steps)
                    .indent(2),
            );
        }
        rs.extend(hit_path_entry(ctx, &count));

        let damage_input = DamageInput {
            spec,
            bay: &ctx.mount.bay,
            fired,
            munition: ctx.munition(),
            to_hit,
            rules: &self.rules,
            target: ctx.damage_target(),
            subject: target.id,
        };
        let damage = variant.damage.per_hit(&damage_input, &count, dice);
        rs.extend(damage.entries);
        let outcome = HitOutcome::new(count, damage.per_hit);
        rs.push(
            ReportEntry::new(MessageId::HitsScored)
                .subject(target.id)
                .param(outcome.hits)
                .param(outcome.damage_per_hit)
                .param(outcome.total_damage())
                .indent(1),
        );
        rs.set_hits(outcome);
        rs.advance(Phase::HitsComputed);

        let application = HitApplication {
            target: target.id,
            outcome: &outcome,
            side: to_hit.side,
            rule: variant.hooks.location,
            designated: ctx.designated,
            crit_modifier: critical_modifier(target.armor_traits, ctx.abilities),
            rules: &self.rules,
        };
        let mut applied = MutationOutcome::default();
        let result = effects::apply_hits(state, &application, dice, &mut applied);
        rs.extend(applied.entries);
        rs.absorb(result);
        let hooks = secondary::apply(
            state,
            variant.hooks.flags,
            Some(target.id),
            target.position,
            outcome.hits,
            dice,
        );
        if let Some(hooks) = rs.absorb(hooks) {
            rs.extend(hooks.entries);
        }
        rs.advance(Phase::DamageApplied);
    }
}

/// Draws `requested` rounds if the weapon feeds from a bin. Weapons without
/// ammo always fire everything requested. `None` if the draw was rejected.
fn fire(
    ctx: &AttackContext,
    requested: u32,
    state: &mut GameState,
    rs: &mut ResolutionState,
) -> Option<u32> {
    let (Some(family), Some(bin)) = (ctx.mount.spec.ammo, ctx.bin) else {
        return Some(requested);
    };
    let AmmoDraw { fired, entries } =
        rs.absorb(ammo::draw(state, ctx.attacker, family, ctx.munition(), bin, requested))?;
    rs.extend(entries);
    rs.ammo_consumed += fired;
    Some(fired)
}

/// Heat for `fired` shots. Bays count the members that fired.
fn add_heat(ctx: &AttackContext, fired: u32, state: &mut GameState, rs: &mut ResolutionState) {
    let heat = if ctx.mount.bay.is_empty() {
        ctx.mount.spec.heat * fired
    } else {
        let members = usize::try_from(fired).unwrap_or(usize::MAX);
        ctx.mount.bay.iter().take(members).map(|m| m.heat).sum()
    };
    if heat == 0 {
        return;
    }
    let delta = i32::try_from(heat).unwrap_or(i32::MAX);
    if let Some(total) = rs.absorb(state.add_heat(ctx.attacker, delta)) {
        rs.heat_generated += heat;
        rs.push(
            ReportEntry::new(MessageId::HeatGenerated)
                .subject(ctx.attacker)
                .param(heat)
                .param(total)
                .indent(1),
        );
    }
}

/// Runs the jam table after the burst fired. Returns `true` when the
/// attack ended in `ChecksFailed`.
fn jam_check(
    table: JamTable,
    selected: u32,
    ctx: &AttackContext,
    to_hit: &ToHitResult,
    fired: u32,
    state: &mut GameState,
    rs: &mut ResolutionState,
) -> bool {
    match table.check(selected, to_hit.roll) {
        JamResult::Clear => false,
        JamResult::Jammed => {
            let jam = MountCondition::Jammed { turns: None };
            rs.absorb(state.set_mount_condition(ctx.attacker, ctx.mount.id, jam));
            debug!(weapon = ctx.weapon_name(), selected, "weapon jammed");
            rs.push(
                ReportEntry::new(MessageId::WeaponJammed)
                    .subject(ctx.attacker)
                    .param(ctx.weapon_name())
                    .indent(1),
            );
            add_heat(ctx, fired, state, rs);
            rs.advance(Phase::ChecksFailed);
            true
        }
        JamResult::Exploded => {
            rs.absorb(state.set_mount_condition(ctx.attacker, ctx.mount.id, MountCondition::Destroyed));
            debug!(weapon = ctx.weapon_name(), "weapon exploded");
            rs.push(
                ReportEntry::new(MessageId::WeaponExploded)
                    .subject(ctx.attacker)
                    .param(ctx.weapon_name())
                    .indent(1),
            );
            let blast = state.explode_equipment(ctx.attacker, ctx.mount.location, ctx.mount.spec.damage);
            if let Some(blast) = rs.absorb(blast) {
                rs.extend(blast.entries);
            }
            rs.advance(Phase::ChecksFailed);
            true
        }
    }
}

/// The entry naming how the hit count was reached, if any.
fn hit_path_entry(ctx: &AttackContext, count: &HitCount) -> Option<ReportEntry> {
    let entry = match count.audit.path {
        HitPath::Table => ReportEntry::new(MessageId::ClusterRoll)
            .param(count.audit.roll.unwrap_or(0))
            .param(count.audit.modifier)
            .param(count.hits)
            .param(count.rack),
        HitPath::AllHit => ReportEntry::new(MessageId::AllShotsHit).param(count.hits),
        HitPath::Lump => ReportEntry::new(MessageId::LumpHit).param(count.rack),
        HitPath::Fixed | HitPath::Miss => return None,
    };
    Some(entry.subject(ctx.attacker).indent(2))
}

fn target_param(target: AttackTarget) -> crate::report::ReportParam {
    match target {
        AttackTarget::Entity(id) => id.into(),
        AttackTarget::Hex(hex) => hex.into(),
    }
}

fn target_required(ctx: &AttackContext) -> ReportEntry {
    ReportEntry::new(MessageId::TargetRequired)
        .subject(ctx.attacker)
        .param(ctx.weapon_name())
        .indent(1)
}

fn out_of_ammo(ctx: &AttackContext) -> ReportEntry {
    ReportEntry::new(MessageId::OutOfAmmo)
        .subject(ctx.attacker)
        .param(ctx.weapon_name())
        .indent(1)
}
