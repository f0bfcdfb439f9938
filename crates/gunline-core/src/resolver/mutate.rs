//! The state-mutation boundary.
//!
//! Every change the engine makes to units goes through [`StateMutator`].
//! Each call names its target, location and magnitude, applies atomically,
//! and returns the report entries describing what happened. Lookups that
//! fail return a [`StateError`]; rule outcomes never do.

use bitflags::bitflags;
use tracing::{debug, trace};

use crate::arena::Arena;
use crate::entity::{
    BinId, EntityId, Location, MountCondition, MountId, SlotKind, StatusFlags, Unit, UnitKind,
};
use crate::error::StateError;
use crate::game::GameState;
use crate::report::{MessageId, ReportEntry};

bitflags! {
    /// How damage is applied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DamageFlags: u8 {
        /// Strike rear armor where the location has it.
        const REAR = 1 << 0;
        /// Skip armor entirely (internal explosions).
        const INTERNAL = 1 << 1;
    }
}

/// What a critical hit does to a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalEffect {
    /// Destroys the slot at this index.
    Slot(usize),
    /// Blows the whole location off.
    BlowOff,
}

/// Result of a damage or critical mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Entries describing the mutation, in order.
    pub entries: Vec<ReportEntry>,
    /// Locations whose internal structure took damage, in order.
    pub structure_hits: Vec<Location>,
    /// Locations destroyed by this mutation.
    pub destroyed_locations: Vec<Location>,
    /// The unit was destroyed by this mutation.
    pub unit_destroyed: bool,
}

impl MutationOutcome {
    /// Appends another outcome.
    pub fn merge(&mut self, other: MutationOutcome) {
        self.entries.extend(other.entries);
        self.structure_hits.extend(other.structure_hits);
        self.destroyed_locations.extend(other.destroyed_locations);
        self.unit_destroyed |= other.unit_destroyed;
    }
}

/// Scope-constrained mutations of the shared game state.
pub trait StateMutator {
    /// Applies `amount` damage to `location`, armor first, then structure,
    /// transferring excess where the unit kind allows.
    ///
    /// # Errors
    ///
    /// Unknown entity or location.
    fn apply_damage(
        &mut self,
        target: EntityId,
        location: Location,
        amount: u32,
        flags: DamageFlags,
    ) -> Result<MutationOutcome, StateError>;

    /// Applies one critical effect.
    ///
    /// # Errors
    ///
    /// Unknown entity or location, or a slot index past the location's
    /// slots.
    fn apply_critical(
        &mut self,
        target: EntityId,
        location: Location,
        effect: CriticalEffect,
    ) -> Result<MutationOutcome, StateError>;

    /// Destroys a unit outright.
    ///
    /// # Errors
    ///
    /// Unknown entity.
    fn destroy_entity(&mut self, target: EntityId) -> Result<MutationOutcome, StateError>;

    /// Explodes equipment inside `location`: `damage` to internal structure.
    ///
    /// # Errors
    ///
    /// Unknown entity or location.
    fn explode_equipment(
        &mut self,
        target: EntityId,
        location: Location,
        damage: u32,
    ) -> Result<MutationOutcome, StateError>;

    /// Removes `n` rounds from a bin and returns what is left.
    ///
    /// # Errors
    ///
    /// Unknown entity or bin.
    ///
    /// # Panics
    ///
    /// Panics if the bin holds fewer than `n` rounds.
    fn consume_ammo(&mut self, unit: EntityId, bin: BinId, n: u32) -> Result<u32, StateError>;

    /// Adds (or with a negative delta removes) heat, saturating at zero.
    /// Returns the new heat.
    ///
    /// # Errors
    ///
    /// Unknown entity.
    fn add_heat(&mut self, unit: EntityId, delta: i32) -> Result<u32, StateError>;

    /// Sets a mount's condition.
    ///
    /// # Errors
    ///
    /// Unknown entity or mount.
    fn set_mount_condition(
        &mut self,
        unit: EntityId,
        mount: MountId,
        condition: MountCondition,
    ) -> Result<(), StateError>;

    /// Sets or clears status flags.
    ///
    /// # Errors
    ///
    /// Unknown entity.
    fn set_status(&mut self, unit: EntityId, flags: StatusFlags, on: bool) -> Result<(), StateError>;

    /// Links two units in a grapple.
    ///
    /// # Errors
    ///
    /// Unknown entity.
    fn link_grapple(&mut self, a: EntityId, b: EntityId) -> Result<(), StateError>;

    /// Breaks `unit`'s grapple. Returns the former partner.
    ///
    /// # Errors
    ///
    /// Unknown entity.
    fn unlink_grapple(&mut self, unit: EntityId) -> Result<Option<EntityId>, StateError>;

    /// Attaches a swarming squad to its target.
    ///
    /// # Errors
    ///
    /// Unknown entity.
    fn link_swarm(&mut self, swarmer: EntityId, target: EntityId) -> Result<(), StateError>;

    /// Detaches a swarming squad. Returns the former target.
    ///
    /// # Errors
    ///
    /// Unknown entity.
    fn unlink_swarm(&mut self, swarmer: EntityId) -> Result<Option<EntityId>, StateError>;
}

fn unit_mut(arena: &mut Arena, id: EntityId) -> Result<&mut Unit, StateError> {
    arena.get_mut(id).ok_or(StateError::UnknownEntity(id))
}

impl StateMutator for GameState {
    fn apply_damage(
        &mut self,
        target: EntityId,
        location: Location,
        amount: u32,
        flags: DamageFlags,
    ) -> Result<MutationOutcome, StateError> {
        let mut out = MutationOutcome::default();
        let unit = unit_mut(&mut self.arena, target)?;
        out.entries.push(
            ReportEntry::new(MessageId::DamageToLocation)
                .subject(target)
                .param(location)
                .param(amount)
                .indent(1),
        );
        damage_unit(unit, location, amount, flags, &mut out)?;
        if out.unit_destroyed {
            release_links(&mut self.arena, target);
        }
        Ok(out)
    }

    fn apply_critical(
        &mut self,
        target: EntityId,
        location: Location,
        effect: CriticalEffect,
    ) -> Result<MutationOutcome, StateError> {
        let mut out = MutationOutcome::default();
        let unit = unit_mut(&mut self.arena, target)?;
        match effect {
            CriticalEffect::BlowOff => {
                if !unit.has_intact(location) {
                    return Err(StateError::UnknownLocation(target, location));
                }
                out.entries.push(
                    ReportEntry::new(MessageId::LocationBlownOff)
                        .subject(target)
                        .param(location)
                        .indent(2),
                );
                destroy_location(unit, location, &mut out);
            }
            CriticalEffect::Slot(index) => critical_slot(unit, location, index, &mut out)?,
        }
        if out.unit_destroyed {
            release_links(&mut self.arena, target);
        }
        Ok(out)
    }

    fn destroy_entity(&mut self, target: EntityId) -> Result<MutationOutcome, StateError> {
        let mut out = MutationOutcome::default();
        mark_destroyed(unit_mut(&mut self.arena, target)?, &mut out);
        release_links(&mut self.arena, target);
        Ok(out)
    }

    fn explode_equipment(
        &mut self,
        target: EntityId,
        location: Location,
        damage: u32,
    ) -> Result<MutationOutcome, StateError> {
        let mut out = MutationOutcome::default();
        let unit = unit_mut(&mut self.arena, target)?;
        damage_unit(unit, location, damage, DamageFlags::INTERNAL, &mut out)?;
        if out.unit_destroyed {
            release_links(&mut self.arena, target);
        }
        Ok(out)
    }

    fn consume_ammo(&mut self, unit: EntityId, bin: BinId, n: u32) -> Result<u32, StateError> {
        let b = unit_mut(&mut self.arena, unit)?
            .bin_mut(bin)
            .ok_or(StateError::UnknownBin(unit, bin))?;
        b.consume(n);
        trace!(%unit, %bin, n, left = b.shots, "ammo consumed");
        Ok(b.shots)
    }

    fn add_heat(&mut self, unit: EntityId, delta: i32) -> Result<u32, StateError> {
        let u = unit_mut(&mut self.arena, unit)?;
        let heat = (i64::from(u.heat) + i64::from(delta)).clamp(0, i64::from(u32::MAX));
        u.heat = u32::try_from(heat).unwrap_or(u32::MAX);
        Ok(u.heat)
    }

    fn set_mount_condition(
        &mut self,
        unit: EntityId,
        mount: MountId,
        condition: MountCondition,
    ) -> Result<(), StateError> {
        unit_mut(&mut self.arena, unit)?
            .mount_mut(mount)
            .ok_or(StateError::UnknownMount(unit, mount))?
            .condition = condition;
        Ok(())
    }

    fn set_status(&mut self, unit: EntityId, flags: StatusFlags, on: bool) -> Result<(), StateError> {
        unit_mut(&mut self.arena, unit)?.status.set(flags, on);
        Ok(())
    }

    fn link_grapple(&mut self, a: EntityId, b: EntityId) -> Result<(), StateError> {
        if self.arena.get(b).is_none() {
            return Err(StateError::UnknownEntity(b));
        }
        for (unit, partner) in [(a, b), (b, a)] {
            let u = unit_mut(&mut self.arena, unit)?;
            u.grappled_with = Some(partner);
            u.status.insert(StatusFlags::GRAPPLED);
        }
        Ok(())
    }

    fn unlink_grapple(&mut self, unit: EntityId) -> Result<Option<EntityId>, StateError> {
        let u = unit_mut(&mut self.arena, unit)?;
        let partner = u.grappled_with.take();
        u.status.remove(StatusFlags::GRAPPLED);
        if let Some(p) = partner.and_then(|p| self.arena.get_mut(p)) {
            p.grappled_with = None;
            p.status.remove(StatusFlags::GRAPPLED);
        }
        Ok(partner)
    }

    fn link_swarm(&mut self, swarmer: EntityId, target: EntityId) -> Result<(), StateError> {
        unit_mut(&mut self.arena, target)?.status.insert(StatusFlags::SWARMED);
        unit_mut(&mut self.arena, swarmer)?.swarming = Some(target);
        Ok(())
    }

    fn unlink_swarm(&mut self, swarmer: EntityId) -> Result<Option<EntityId>, StateError> {
        let former = unit_mut(&mut self.arena, swarmer)?.swarming.take();
        if let Some(t) = former {
            clear_swarmed_if_free(&mut self.arena, t);
        }
        Ok(former)
    }
}

fn damage_unit(
    unit: &mut Unit,
    location: Location,
    amount: u32,
    flags: DamageFlags,
    out: &mut MutationOutcome,
) -> Result<(), StateError> {
    let id = unit.id();
    let kind = unit.kind();
    let mut loc = location;
    let mut remaining = amount;
    while remaining > 0 && !unit.is_destroyed() {
        let state = unit
            .location_mut(loc)
            .ok_or(StateError::UnknownLocation(id, loc))?;
        if state.destroyed {
            match transfer_target(kind, loc) {
                Some(next) => {
                    out.entries.push(
                        ReportEntry::new(MessageId::DamageTransferred)
                            .subject(id)
                            .param(loc)
                            .param(next)
                            .param(remaining)
                            .indent(2),
                    );
                    loc = next;
                    continue;
                }
                None => break,
            }
        }

        if !flags.contains(DamageFlags::INTERNAL) {
            let armor = match state.rear_armor.as_mut() {
                Some(rear) if flags.contains(DamageFlags::REAR) => rear,
                _ => &mut state.armor,
            };
            let absorbed = remaining.min(*armor);
            if absorbed > 0 {
                *armor -= absorbed;
                remaining -= absorbed;
                out.entries.push(
                    ReportEntry::new(MessageId::ArmorAbsorbed)
                        .subject(id)
                        .param(loc)
                        .param(absorbed)
                        .param(*armor)
                        .indent(2),
                );
            }
        }
        if remaining == 0 {
            break;
        }

        let taken = remaining.min(state.structure);
        state.structure -= taken;
        remaining -= taken;
        if taken > 0 {
            out.structure_hits.push(loc);
            out.entries.push(
                ReportEntry::new(MessageId::StructureDamaged)
                    .subject(id)
                    .param(loc)
                    .param(taken)
                    .param(state.structure)
                    .indent(2),
            );
        }
        if state.structure == 0 {
            destroy_location(unit, loc, out);
        }
    }
    Ok(())
}

/// Where excess damage goes once `location` is gone.
fn transfer_target(kind: UnitKind, location: Location) -> Option<Location> {
    match kind {
        UnitKind::Mek => location.mek_transfer(),
        _ => None,
    }
}

fn destroy_location(unit: &mut Unit, location: Location, out: &mut MutationOutcome) {
    let id = unit.id();
    let Some(state) = unit.location_mut(location) else {
        return;
    };
    if state.destroyed {
        return;
    }
    state.destroyed = true;
    state.armor = 0;
    state.structure = 0;
    if let Some(rear) = state.rear_armor.as_mut() {
        *rear = 0;
    }
    out.destroyed_locations.push(location);
    out.entries.push(
        ReportEntry::new(MessageId::LocationDestroyed)
            .subject(id)
            .param(location)
            .indent(2),
    );

    let lost: Vec<MountId> = unit
        .mounts()
        .filter(|m| m.location == location)
        .map(|m| m.id)
        .collect();
    for mount in lost {
        if let Some(m) = unit.mount_mut(mount) {
            m.condition = MountCondition::Destroyed;
        }
    }

    match (unit.kind(), location) {
        (UnitKind::Mek, Location::Head | Location::CenterTorso) => mark_destroyed(unit, out),
        (UnitKind::Mek, Location::LeftTorso) => destroy_location(unit, Location::LeftArm, out),
        (UnitKind::Mek, Location::RightTorso) => destroy_location(unit, Location::RightArm, out),
        (UnitKind::Mek, _) | (UnitKind::Vehicle, Location::Turret) => {}
        (UnitKind::BattleArmor, _) => {
            let left = unit.surviving_troopers().len();
            out.entries.push(
                ReportEntry::new(MessageId::TroopersLost)
                    .subject(id)
                    .param(location)
                    .param(u32::try_from(left).unwrap_or(u32::MAX))
                    .indent(2),
            );
            if left == 0 {
                mark_destroyed(unit, out);
            }
        }
        (UnitKind::Vehicle | UnitKind::ConventionalInfantry | UnitKind::Aerospace, _) => {
            mark_destroyed(unit, out);
        }
    }
}

fn mark_destroyed(unit: &mut Unit, out: &mut MutationOutcome) {
    if unit.is_destroyed() {
        return;
    }
    unit.status.insert(StatusFlags::DESTROYED);
    out.unit_destroyed = true;
    out.entries.push(
        ReportEntry::new(MessageId::UnitDestroyed)
            .subject(unit.id())
            .param(unit.name.as_str())
            .indent(1),
    );
    debug!(unit = %unit.id(), "unit destroyed");
}

fn critical_slot(
    unit: &mut Unit,
    location: Location,
    index: usize,
    out: &mut MutationOutcome,
) -> Result<(), StateError> {
    let id = unit.id();
    let slot = unit
        .location_mut(location)
        .and_then(|l| l.slots.get_mut(index))
        .ok_or(StateError::UnknownLocation(id, location))?;
    slot.hit = true;
    let kind = slot.kind;
    out.entries.push(
        ReportEntry::new(MessageId::CriticalHit)
            .subject(id)
            .param(location)
            .param(kind.label())
            .indent(2),
    );
    match kind {
        SlotKind::Weapon(mount) => {
            if let Some(m) = unit.mount_mut(mount) {
                m.condition = MountCondition::Destroyed;
            }
        }
        SlotKind::Ammo(bin) => {
            let damage = unit.bin_mut(bin).map_or(0, |b| {
                let damage = b.shots * b.damage_per_shot;
                b.shots = 0;
                damage
            });
            out.entries.push(
                ReportEntry::new(MessageId::AmmoExplosion)
                    .subject(id)
                    .param(location)
                    .param(bin.to_string())
                    .param(damage)
                    .indent(2),
            );
            if damage > 0 {
                damage_unit(unit, location, damage, DamageFlags::INTERNAL, out)?;
            }
        }
        SlotKind::Engine => {
            unit.engine_hits = unit.engine_hits.saturating_add(1);
            out.entries.push(
                ReportEntry::new(MessageId::EngineHit)
                    .subject(id)
                    .param(unit.engine_hits)
                    .indent(2),
            );
            if unit.engine_hits >= 3 {
                mark_destroyed(unit, out);
            }
        }
        SlotKind::Gyro => {
            unit.gyro_hits = unit.gyro_hits.saturating_add(1);
            out.entries.push(
                ReportEntry::new(MessageId::GyroHit)
                    .subject(id)
                    .param(unit.gyro_hits)
                    .indent(2),
            );
            if unit.gyro_hits >= 2 {
                unit.status.insert(StatusFlags::IMMOBILE | StatusFlags::PRONE);
            }
        }
        SlotKind::Cockpit => {
            out.entries.push(ReportEntry::new(MessageId::CrewKilled).subject(id).indent(2));
            mark_destroyed(unit, out);
        }
        SlotKind::Empty
        | SlotKind::Sensors
        | SlotKind::LifeSupport
        | SlotKind::Actuator
        | SlotKind::HeatSink => {}
    }
    Ok(())
}

/// Clears every grapple and swarm link touching a destroyed unit.
fn release_links(arena: &mut Arena, id: EntityId) {
    let mut swarmed_targets = Vec::new();
    if let Some(unit) = arena.get_mut(id) {
        if let Some(partner) = unit.grappled_with.take() {
            unit.status.remove(StatusFlags::GRAPPLED);
            if let Some(p) = arena.get_mut(partner) {
                p.grappled_with = None;
                p.status.remove(StatusFlags::GRAPPLED);
            }
        }
    }
    if let Some(unit) = arena.get_mut(id) {
        if let Some(target) = unit.swarming.take() {
            swarmed_targets.push(target);
        }
    }
    let ids: Vec<EntityId> = arena.entity_ids_sorted().collect();
    for other in ids {
        if let Some(u) = arena.get_mut(other) {
            if u.swarming == Some(id) {
                u.swarming = None;
            }
        }
    }
    for target in swarmed_targets {
        clear_swarmed_if_free(arena, target);
    }
}

fn clear_swarmed_if_free(arena: &mut Arena, target: EntityId) {
    let still_swarmed = arena
        .units_sorted()
        .any(|u| u.swarming == Some(target) && !u.is_destroyed());
    if !still_swarmed {
        if let Some(t) = arena.get_mut(target) {
            t.status.remove(StatusFlags::SWARMED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::LocationState;
    use crate::weapon::{catalog, AmmoFamily, Munition};
    use gunline_board::Board;

    fn state_with(unit: Unit) -> (GameState, EntityId) {
        let mut state = GameState::new(Board::new(10, 10));
        let id = state.arena.spawn(unit);
        (state, id)
    }

    fn unit(state: &GameState, id: EntityId) -> &Unit {
        state.arena.get(id).unwrap()
    }

    mod damage_tests {
        use super::*;

        #[test]
        fn armor_absorbs_first() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            let out = state
                .apply_damage(id, Location::LeftArm, 5, DamageFlags::empty())
                .unwrap();
            let arm = unit(&state, id).location(Location::LeftArm).unwrap();
            assert_eq!(arm.armor, 7);
            assert_eq!(arm.structure, 8);
            assert!(out.structure_hits.is_empty());
        }

        #[test]
        fn rear_armor_is_separate() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            state
                .apply_damage(id, Location::CenterTorso, 10, DamageFlags::REAR)
                .unwrap();
            let ct = unit(&state, id).location(Location::CenterTorso).unwrap();
            assert_eq!(ct.armor, 20);
            assert_eq!(ct.rear_armor, Some(0));
            assert_eq!(ct.structure, 14);
        }

        #[test]
        fn excess_transfers_inward() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            // arm holds 12 + 8; 25 leaves 5 for the left torso
            let out = state
                .apply_damage(id, Location::LeftArm, 25, DamageFlags::empty())
                .unwrap();
            let u = unit(&state, id);
            assert!(!u.has_intact(Location::LeftArm));
            assert_eq!(u.location(Location::LeftTorso).unwrap().armor, 10);
            assert_eq!(out.destroyed_locations, vec![Location::LeftArm]);
            assert!(out.entries.iter().any(|e| e.message == MessageId::DamageTransferred));
        }

        #[test]
        fn damage_to_destroyed_location_transfers() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            state.apply_damage(id, Location::LeftArm, 20, DamageFlags::empty()).unwrap();
            state.apply_damage(id, Location::LeftArm, 4, DamageFlags::empty()).unwrap();
            assert_eq!(unit(&state, id).location(Location::LeftTorso).unwrap().armor, 11);
        }

        #[test]
        fn side_torso_takes_its_arm() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            let mount = state
                .arena
                .get_mut(id)
                .unwrap()
                .add_mount(catalog::medium_laser(), Location::RightArm);
            let out = state
                .apply_damage(id, Location::RightTorso, 27, DamageFlags::INTERNAL)
                .unwrap();
            let u = unit(&state, id);
            assert!(!u.has_intact(Location::RightTorso));
            assert!(!u.has_intact(Location::RightArm));
            assert_eq!(u.mount(mount).unwrap().condition, MountCondition::Destroyed);
            assert_eq!(out.destroyed_locations, vec![Location::RightTorso, Location::RightArm]);
            // 15 excess carried into the centre torso structure
            assert_eq!(u.location(Location::CenterTorso).unwrap().structure, 1);
            assert!(!u.is_destroyed());
        }

        #[test]
        fn head_destruction_kills_mek() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            let out = state.apply_damage(id, Location::Head, 12, DamageFlags::empty()).unwrap();
            assert!(out.unit_destroyed);
            assert!(unit(&state, id).is_destroyed());
        }

        #[test]
        fn vehicle_turret_loss_only_disables_turret() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Vehicle, "Tank"));
            let gun = state
                .arena
                .get_mut(id)
                .unwrap()
                .add_mount(catalog::ac10(), Location::Turret);
            let out = state.apply_damage(id, Location::Turret, 30, DamageFlags::empty()).unwrap();
            let u = unit(&state, id);
            assert!(!out.unit_destroyed);
            assert_eq!(u.mount(gun).unwrap().condition, MountCondition::Destroyed);
            assert!(!u.is_destroyed());
        }

        #[test]
        fn vehicle_side_loss_destroys_vehicle() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Vehicle, "Tank"));
            let out = state.apply_damage(id, Location::Left, 19, DamageFlags::empty()).unwrap();
            assert!(out.unit_destroyed);
        }

        #[test]
        fn platoon_loses_troopers() {
            let (mut state, id) = state_with(Unit::new(UnitKind::ConventionalInfantry, "Rifles"));
            state.apply_damage(id, Location::Platoon, 10, DamageFlags::empty()).unwrap();
            assert_eq!(unit(&state, id).location(Location::Platoon).unwrap().structure, 18);
            let out = state.apply_damage(id, Location::Platoon, 30, DamageFlags::empty()).unwrap();
            assert!(out.unit_destroyed);
        }

        #[test]
        fn battle_armor_dies_with_last_trooper() {
            let (mut state, id) =
                state_with(Unit::new(UnitKind::BattleArmor, "Elementals").with_troopers(2, 3));
            let out = state.apply_damage(id, Location::Trooper(1), 10, DamageFlags::empty()).unwrap();
            assert!(!out.unit_destroyed);
            assert!(out.entries.iter().any(|e| e.message == MessageId::TroopersLost));
            let out = state.apply_damage(id, Location::Trooper(2), 4, DamageFlags::empty()).unwrap();
            assert!(out.unit_destroyed);
        }

        #[test]
        fn unknown_location_is_an_error() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            assert_eq!(
                state.apply_damage(id, Location::Turret, 1, DamageFlags::empty()),
                Err(StateError::UnknownLocation(id, Location::Turret))
            );
            assert_eq!(
                state.apply_damage(EntityId::new(77), Location::Head, 1, DamageFlags::empty()),
                Err(StateError::UnknownEntity(EntityId::new(77)))
            );
        }
    }

    mod critical_tests {
        use super::*;

        #[test]
        fn ammo_slot_explodes() {
            let mut mek = Unit::new(UnitKind::Mek, "T");
            mek.add_bin(AmmoFamily::Lrm(20), Munition::Standard, 2, 20, Location::LeftTorso);
            let (mut state, id) = state_with(mek);
            // the bin is the third slot after two heat sinks
            let out = state
                .apply_critical(id, Location::LeftTorso, CriticalEffect::Slot(2))
                .unwrap();
            assert!(out.entries.iter().any(|e| e.message == MessageId::AmmoExplosion));
            let u = unit(&state, id);
            assert_eq!(u.bin(BinId(1)).unwrap().shots, 0);
            assert!(!u.has_intact(Location::LeftTorso));
            assert!(u.is_destroyed());
        }

        #[test]
        fn third_engine_hit_destroys() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            for slot in 0..2 {
                let out = state
                    .apply_critical(id, Location::CenterTorso, CriticalEffect::Slot(slot))
                    .unwrap();
                assert!(!out.unit_destroyed);
            }
            let out = state
                .apply_critical(id, Location::CenterTorso, CriticalEffect::Slot(2))
                .unwrap();
            assert!(out.unit_destroyed);
            assert_eq!(unit(&state, id).engine_hits, 3);
        }

        #[test]
        fn second_gyro_hit_immobilizes() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            state.apply_critical(id, Location::CenterTorso, CriticalEffect::Slot(3)).unwrap();
            state.apply_critical(id, Location::CenterTorso, CriticalEffect::Slot(4)).unwrap();
            assert!(unit(&state, id).status.contains(StatusFlags::IMMOBILE | StatusFlags::PRONE));
        }

        #[test]
        fn weapon_slot_destroys_mount() {
            let mut mek = Unit::new(UnitKind::Mek, "T");
            let laser = mek.add_mount(catalog::medium_laser(), Location::RightArm);
            let (mut state, id) = state_with(mek);
            state.apply_critical(id, Location::RightArm, CriticalEffect::Slot(4)).unwrap();
            assert_eq!(unit(&state, id).mount(laser).unwrap().condition, MountCondition::Destroyed);
        }

        #[test]
        fn head_blown_off_kills() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            let out = state.apply_critical(id, Location::Head, CriticalEffect::BlowOff).unwrap();
            assert!(out.unit_destroyed);
        }

        #[test]
        fn cockpit_kills_crew() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            let out = state.apply_critical(id, Location::Head, CriticalEffect::Slot(2)).unwrap();
            assert!(out.entries.iter().any(|e| e.message == MessageId::CrewKilled));
            assert!(out.unit_destroyed);
        }

        #[test]
        fn slot_out_of_range_is_an_error() {
            let (mut state, id) = state_with(
                Unit::new(UnitKind::Mek, "T").with_location(Location::LeftArm, LocationState::new(1, 1)),
            );
            assert!(state.apply_critical(id, Location::LeftArm, CriticalEffect::Slot(0)).is_err());
        }
    }

    mod link_tests {
        use super::*;

        #[test]
        fn grapple_links_both_and_destruction_releases() {
            let mut state = GameState::new(Board::new(10, 10));
            let a = state.arena.spawn(Unit::new(UnitKind::Mek, "A"));
            let b = state.arena.spawn(Unit::new(UnitKind::Mek, "B"));
            state.link_grapple(a, b).unwrap();
            assert_eq!(unit(&state, b).grappled_with, Some(a));
            state.destroy_entity(a).unwrap();
            let partner = unit(&state, b);
            assert_eq!(partner.grappled_with, None);
            assert!(!partner.status.contains(StatusFlags::GRAPPLED));
        }

        #[test]
        fn unlink_grapple_returns_partner() {
            let mut state = GameState::new(Board::new(10, 10));
            let a = state.arena.spawn(Unit::new(UnitKind::Mek, "A"));
            let b = state.arena.spawn(Unit::new(UnitKind::Mek, "B"));
            state.link_grapple(a, b).unwrap();
            assert_eq!(state.unlink_grapple(b).unwrap(), Some(a));
            assert_eq!(unit(&state, a).grappled_with, None);
            assert_eq!(state.unlink_grapple(b).unwrap(), None);
        }

        #[test]
        fn swarm_sets_and_clears_flag() {
            let mut state = GameState::new(Board::new(10, 10));
            let ba = state.arena.spawn(Unit::new(UnitKind::BattleArmor, "BA"));
            let mek = state.arena.spawn(Unit::new(UnitKind::Mek, "M"));
            state.link_swarm(ba, mek).unwrap();
            assert!(unit(&state, mek).status.contains(StatusFlags::SWARMED));
            assert_eq!(state.unlink_swarm(ba).unwrap(), Some(mek));
            assert!(!unit(&state, mek).status.contains(StatusFlags::SWARMED));
        }
    }

    mod resource_tests {
        use super::*;

        #[test]
        fn heat_saturates_at_zero() {
            let (mut state, id) = state_with(Unit::new(UnitKind::Mek, "T"));
            assert_eq!(state.add_heat(id, 5).unwrap(), 5);
            assert_eq!(state.add_heat(id, -9).unwrap(), 0);
        }

        #[test]
        fn ammo_counts_down() {
            let mut mek = Unit::new(UnitKind::Mek, "T");
            let bin = mek.add_bin(AmmoFamily::Autocannon(5), Munition::Standard, 3, 5, Location::RightTorso);
            let (mut state, id) = state_with(mek);
            assert_eq!(state.consume_ammo(id, bin, 2).unwrap(), 1);
            assert_eq!(
                state.consume_ammo(id, BinId(9), 1),
                Err(StateError::UnknownBin(id, BinId(9)))
            );
        }
    }
}
