//! Precondition checks and the attack snapshot.
//!
//! [`AttackContext::capture`] runs every shared precondition and copies
//! what the rest of the resolution needs out of the game state. Nothing
//! after it re-reads the attacker, mount or target data it captured.

use gunline_board::{BoardOracle, HexCoord};

use super::damage::DamageTarget;
use crate::attack::{AttackDeclaration, AttackTarget};
use crate::config::RulesConfig;
use crate::entity::{
    Abilities, ArmorTraits, BinId, EntityId, Location, MountCondition, MountId, Unit, UnitKind,
};
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};
use crate::to_hit::{Situation, ToHitOutcome, ToHitResult};
use crate::weapon::{FiringMode, Munition, VariantKey, WeaponSpec};

/// Target unit data captured before the first mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSnapshot {
    /// Target id.
    pub id: EntityId,
    /// Target kind.
    pub kind: UnitKind,
    /// Mechanized platoon.
    pub mechanized: bool,
    /// Capital-scale craft.
    pub capital_scale: bool,
    /// Armor traits (critical chance).
    pub armor_traits: ArmorTraits,
    /// Hex the target stands in.
    pub position: HexCoord,
}

/// Weapon mount data captured before the first mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSnapshot {
    /// Mount id.
    pub id: MountId,
    /// Weapon data.
    pub spec: WeaponSpec,
    /// Bay members.
    pub bay: Vec<WeaponSpec>,
    /// Installed location.
    pub location: Location,
    /// Ammo feed is damaged.
    pub feed_damaged: bool,
    /// Linked Artemis.
    pub artemis: bool,
}

/// Everything a resolution reads about its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackContext {
    /// Attacking unit.
    pub attacker: EntityId,
    /// Attacker kind.
    pub attacker_kind: UnitKind,
    /// Attacking pilot's abilities.
    pub abilities: Abilities,
    /// Target unit, for unit-targeted attacks.
    pub target: Option<TargetSnapshot>,
    /// Hex the attack is aimed at.
    pub target_hex: HexCoord,
    /// Target is in building cover.
    pub in_building: bool,
    /// Weapon fired.
    pub mount: MountSnapshot,
    /// Variant lookup key.
    pub key: VariantKey,
    /// First bin to draw from, for ammo weapons.
    pub bin: Option<BinId>,
    /// Declared location, if any.
    pub designated: Option<Location>,
}

impl AttackContext {
    /// Checks the shared preconditions and snapshots the attack.
    ///
    /// # Errors
    ///
    /// Returns the report entry naming the first failed precondition, in
    /// this order: attacker, mount, firing mode, target, to-hit, ammo.
    pub fn capture(
        decl: &AttackDeclaration,
        to_hit: &ToHitResult,
        state: &GameState,
        rules: &RulesConfig,
    ) -> Result<Self, ReportEntry> {
        let fail = |message: MessageId| ReportEntry::new(message).subject(decl.attacker).indent(1);

        let attacker = state
            .arena
            .get(decl.attacker)
            .ok_or_else(|| fail(MessageId::AttackerMissing))?;
        if !attacker.is_operational() {
            return Err(fail(MessageId::AttackerInoperable));
        }

        let mount = attacker
            .mount(decl.mount)
            .ok_or_else(|| fail(MessageId::MountMissing).param(decl.mount.to_string()))?;
        match mount.condition {
            MountCondition::Ready => {}
            MountCondition::Destroyed => {
                return Err(fail(MessageId::MountDestroyed).param(mount.spec.name.as_str()));
            }
            MountCondition::Jammed { .. } => {
                return Err(fail(MessageId::MountJammed).param(mount.spec.name.as_str()));
            }
        }

        let category = mount.spec.category;
        let mode_allowed = category.legal_modes().contains(&decl.mode)
            && (decl.mode != FiringMode::RapidFire || rules.rapid_fire_autocannons);
        if !mode_allowed {
            return Err(fail(MessageId::ModeNotAllowed).param(decl.mode.to_string()));
        }

        let (target, target_hex) = match decl.target {
            AttackTarget::Entity(id) => {
                let unit = state
                    .arena
                    .get(id)
                    .ok_or_else(|| fail(MessageId::TargetMissing).param(id))?;
                if unit.is_destroyed() {
                    return Err(fail(MessageId::TargetDestroyed).param(id));
                }
                (Some(snapshot(unit)), unit.position)
            }
            AttackTarget::Hex(hex) => (None, hex),
        };

        if to_hit.outcome == ToHitOutcome::Impossible {
            return Err(fail(MessageId::AttackImpossible));
        }

        let (bin, munition) = select_ammo(decl, attacker, &mount.spec).map_err(fail)?;
        let key = VariantKey::new(category, munition, decl.mode);
        if !key.is_legal() {
            return Err(fail(MessageId::IllegalAmmo).param(munition.to_string()));
        }

        let in_building = to_hit.situation.contains(Situation::IN_BUILDING)
            || (target.is_some() && state.board.terrain(target_hex).is_building());

        Ok(Self {
            attacker: decl.attacker,
            attacker_kind: attacker.kind(),
            abilities: attacker.pilot.abilities,
            target,
            target_hex,
            in_building,
            mount: MountSnapshot {
                id: mount.id,
                spec: mount.spec.clone(),
                bay: mount.bay.clone(),
                location: mount.location,
                feed_damaged: mount.feed_damaged,
                artemis: mount.artemis,
            },
            key,
            bin,
            designated: decl.designated_location,
        })
    }

    /// Target profile for the damage pipeline.
    #[must_use]
    pub fn damage_target(&self) -> DamageTarget {
        self.target.map_or(DamageTarget::default(), |t| DamageTarget {
            conventional_infantry: t.kind.is_conventional_infantry(),
            mechanized: t.mechanized,
            capital_scale: t.capital_scale,
            in_building: self.in_building,
        })
    }

    /// Munition loaded.
    #[must_use]
    pub fn munition(&self) -> Munition {
        self.key.munition
    }

    /// Weapon name for logs and reports.
    #[must_use]
    pub fn weapon_name(&self) -> &str {
        &self.mount.spec.name
    }
}

fn snapshot(unit: &Unit) -> TargetSnapshot {
    TargetSnapshot {
        id: unit.id(),
        kind: unit.kind(),
        mechanized: unit.mechanized,
        capital_scale: unit.capital_scale,
        armor_traits: unit.armor_traits,
        position: unit.position,
    }
}

/// Picks the bin to fire from: the declared one, then the mount's linked
/// one, then the first compatible bin that still has rounds.
fn select_ammo(
    decl: &AttackDeclaration,
    attacker: &Unit,
    spec: &WeaponSpec,
) -> Result<(Option<BinId>, Munition), MessageId> {
    let Some(family) = spec.ammo else {
        return Ok((None, Munition::None));
    };
    let linked = decl
        .ammo
        .or_else(|| attacker.mount(decl.mount).and_then(|m| m.ammo));
    let bin = match linked {
        Some(id) => attacker.bin(id).ok_or(MessageId::IllegalAmmo)?,
        None => attacker
            .bins()
            .find(|b| b.family == family && b.shots > 0)
            .ok_or(MessageId::OutOfAmmo)?,
    };
    if bin.family != family || !spec.category.legal_munitions().contains(&bin.munition) {
        return Err(MessageId::IllegalAmmo);
    }
    if attacker.rounds_available(family, bin.munition) == 0 {
        return Err(MessageId::OutOfAmmo);
    }
    Ok((Some(bin.id), bin.munition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::StatusFlags;
    use crate::weapon::{catalog, AmmoFamily};
    use gunline_board::{Board, Terrain};

    struct Setup {
        state: GameState,
        attacker: EntityId,
        target: EntityId,
        laser: MountId,
        lrm: MountId,
    }

    fn setup() -> Setup {
        let mut state = GameState::new(Board::new(16, 17));
        let mut mek = Unit::new(UnitKind::Mek, "Attacker").at(HexCoord::new(2, 2));
        let laser = mek.add_mount(catalog::medium_laser(), Location::RightArm);
        let lrm = mek.add_mount(catalog::lrm(10), Location::LeftTorso);
        let bin = mek.add_bin(AmmoFamily::Lrm(10), Munition::Standard, 12, 10, Location::LeftTorso);
        mek.link_ammo(lrm, bin);
        let attacker = state.arena.spawn(mek);
        let target = state
            .arena
            .spawn(Unit::new(UnitKind::Mek, "Target").at(HexCoord::new(5, 5)));
        Setup {
            state,
            attacker,
            target,
            laser,
            lrm,
        }
    }

    fn decl(s: &Setup, mount: MountId) -> AttackDeclaration {
        AttackDeclaration::new(1, s.attacker, AttackTarget::Entity(s.target), mount)
    }

    fn capture(s: &Setup, d: &AttackDeclaration) -> Result<AttackContext, MessageId> {
        AttackContext::capture(d, &ToHitResult::rolled(8, 9), &s.state, &RulesConfig::default())
            .map_err(|e| e.message)
    }

    mod precondition_tests {
        use super::*;

        #[test]
        fn valid_attack_captures() {
            let s = setup();
            let ctx = capture(&s, &decl(&s, s.laser)).unwrap();
            assert_eq!(ctx.key.munition, Munition::None);
            assert_eq!(ctx.target_hex, HexCoord::new(5, 5));
            assert_eq!(ctx.target.unwrap().id, s.target);
        }

        #[test]
        fn missing_attacker() {
            let s = setup();
            let d = AttackDeclaration::new(1, EntityId::new(99), AttackTarget::Entity(s.target), s.laser);
            assert_eq!(capture(&s, &d).unwrap_err(), MessageId::AttackerMissing);
        }

        #[test]
        fn shut_down_attacker() {
            let mut s = setup();
            s.state.arena.get_mut(s.attacker).unwrap().status.insert(StatusFlags::SHUTDOWN);
            assert_eq!(capture(&s, &decl(&s, s.laser)).unwrap_err(), MessageId::AttackerInoperable);
        }

        #[test]
        fn jammed_and_destroyed_mounts() {
            let mut s = setup();
            let unit = s.state.arena.get_mut(s.attacker).unwrap();
            unit.mount_mut(s.laser).unwrap().condition = MountCondition::Jammed { turns: Some(1) };
            unit.mount_mut(s.lrm).unwrap().condition = MountCondition::Destroyed;
            assert_eq!(capture(&s, &decl(&s, s.laser)).unwrap_err(), MessageId::MountJammed);
            assert_eq!(capture(&s, &decl(&s, s.lrm)).unwrap_err(), MessageId::MountDestroyed);
            assert_eq!(capture(&s, &decl(&s, MountId(42))).unwrap_err(), MessageId::MountMissing);
        }

        #[test]
        fn destroyed_target() {
            let mut s = setup();
            s.state.arena.get_mut(s.target).unwrap().status.insert(StatusFlags::DESTROYED);
            assert_eq!(capture(&s, &decl(&s, s.laser)).unwrap_err(), MessageId::TargetDestroyed);
        }

        #[test]
        fn impossible_to_hit() {
            let s = setup();
            let err = AttackContext::capture(
                &decl(&s, s.laser),
                &ToHitResult::impossible(),
                &s.state,
                &RulesConfig::default(),
            )
            .unwrap_err();
            assert_eq!(err.message, MessageId::AttackImpossible);
        }

        #[test]
        fn illegal_mode() {
            let s = setup();
            let d = decl(&s, s.laser).with_mode(FiringMode::Ultra);
            assert_eq!(capture(&s, &d).unwrap_err(), MessageId::ModeNotAllowed);
        }

        #[test]
        fn rapid_fire_needs_rule() {
            let mut s = setup();
            let ac = s
                .state
                .arena
                .get_mut(s.attacker)
                .unwrap()
                .add_mount(catalog::ac5(), Location::RightTorso);
            s.state
                .arena
                .get_mut(s.attacker)
                .unwrap()
                .add_bin(AmmoFamily::Autocannon(5), Munition::Standard, 20, 5, Location::RightTorso);
            let d = decl(&s, ac).with_mode(FiringMode::RapidFire);
            assert_eq!(capture(&s, &d).unwrap_err(), MessageId::ModeNotAllowed);
            let rules = RulesConfig {
                rapid_fire_autocannons: true,
                ..RulesConfig::default()
            };
            assert!(AttackContext::capture(&d, &ToHitResult::rolled(8, 9), &s.state, &rules).is_ok());
        }
    }

    mod ammo_tests {
        use super::*;

        #[test]
        fn linked_bin_is_used() {
            let s = setup();
            let ctx = capture(&s, &decl(&s, s.lrm)).unwrap();
            assert_eq!(ctx.bin, Some(BinId(1)));
            assert_eq!(ctx.munition(), Munition::Standard);
        }

        #[test]
        fn empty_bins_abort() {
            let mut s = setup();
            s.state.arena.get_mut(s.attacker).unwrap().bin_mut(BinId(1)).unwrap().shots = 0;
            assert_eq!(capture(&s, &decl(&s, s.lrm)).unwrap_err(), MessageId::OutOfAmmo);
        }

        #[test]
        fn wrong_family_is_illegal() {
            let mut s = setup();
            let unit = s.state.arena.get_mut(s.attacker).unwrap();
            let srm_bin = unit.add_bin(AmmoFamily::Srm(6), Munition::Inferno, 15, 12, Location::LeftTorso);
            let d = decl(&s, s.lrm).with_ammo(srm_bin);
            assert_eq!(capture(&s, &d).unwrap_err(), MessageId::IllegalAmmo);
        }

        #[test]
        fn unlinked_weapon_finds_a_bin() {
            let mut s = setup();
            let unit = s.state.arena.get_mut(s.attacker).unwrap();
            let srm = unit.add_mount(catalog::srm(6), Location::RightTorso);
            unit.add_bin(AmmoFamily::Srm(6), Munition::Inferno, 15, 12, Location::RightTorso);
            let ctx = capture(&s, &decl(&s, srm)).unwrap();
            assert_eq!(ctx.munition(), Munition::Inferno);
        }
    }

    mod snapshot_tests {
        use super::*;

        #[test]
        fn building_terrain_gives_cover() {
            let mut s = setup();
            s.state
                .board
                .set_terrain(HexCoord::new(5, 5), Terrain::Building { cf: 30 })
                .unwrap();
            let ctx = capture(&s, &decl(&s, s.laser)).unwrap();
            assert!(ctx.in_building);
            assert!(ctx.damage_target().in_building);
        }

        #[test]
        fn hex_target_has_no_unit() {
            let s = setup();
            let d = AttackDeclaration::new(1, s.attacker, AttackTarget::Hex(HexCoord::new(3, 3)), s.laser);
            let ctx = capture(&s, &d).unwrap();
            assert!(ctx.target.is_none());
            assert_eq!(ctx.damage_target(), DamageTarget::default());
        }
    }
}
