//! Units that take part in weapon attacks.
//!
//! - [`EntityId`]: unique identifier assigned by the roster
//! - [`UnitKind`]: classification that picks location layout, hit tables and
//!   damage rules
//! - [`Unit`]: the full per-unit state the resolution engine reads and
//!   mutates
//!
//! # Example
//!
//! ```
//! use gunline_core::entity::{Location, Unit, UnitKind};
//! use gunline_core::weapon::catalog;
//!
//! let mut mek = Unit::new(UnitKind::Mek, "Hunchback");
//! let ac = mek.add_mount(catalog::ac10(), Location::RightTorso);
//!
//! assert_eq!(mek.kind(), UnitKind::Mek);
//! assert!(mek.mount(ac).is_some());
//! assert_eq!(mek.locations().count(), 8);
//! ```

pub mod components;

use std::collections::BTreeMap;
use std::fmt;

use gunline_board::HexCoord;
use serde::{Deserialize, Serialize};

pub use components::{
    Abilities, AmmoBin, ArmorTraits, BinId, CriticalSlot, Location, LocationState,
    MountCondition, MountId, Pilot, SlotKind, StatusFlags, WeaponMount,
};

use crate::weapon::{AmmoFamily, Munition, WeaponSpec};

/// Unique identifier for a unit.
///
/// Entity IDs are ordered by their numeric value, which gives the roster a
/// deterministic iteration order.
///
/// # Example
///
/// ```
/// use gunline_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Unit classification.
///
/// Determines the location layout, which hit-location table applies, how
/// destroyed locations propagate, and whether infantry damage conversion is
/// used.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum UnitKind {
    /// BattleMek.
    Mek,
    /// Combat vehicle.
    Vehicle,
    /// Conventional (unarmored) infantry platoon.
    ConventionalInfantry,
    /// Battle Armor squad.
    BattleArmor,
    /// Aerospace fighter or large craft.
    Aerospace,
}

impl UnitKind {
    /// Default location layout: `(location, armor, rear armor, structure,
    /// slots)`.
    #[must_use]
    pub fn locations(self) -> Vec<(Location, LocationState)> {
        use SlotKind as S;
        match self {
            UnitKind::Mek => vec![
                (
                    Location::Head,
                    LocationState::new(9, 3).with_slots(&[
                        S::LifeSupport,
                        S::Sensors,
                        S::Cockpit,
                        S::Empty,
                        S::Sensors,
                        S::LifeSupport,
                    ]),
                ),
                (
                    Location::CenterTorso,
                    LocationState::new(20, 16).with_rear(8).with_slots(&[
                        S::Engine,
                        S::Engine,
                        S::Engine,
                        S::Gyro,
                        S::Gyro,
                        S::Gyro,
                        S::Gyro,
                        S::Engine,
                        S::Engine,
                        S::Engine,
                    ]),
                ),
                (
                    Location::LeftTorso,
                    LocationState::new(15, 12)
                        .with_rear(5)
                        .with_slots(&[S::HeatSink, S::HeatSink]),
                ),
                (
                    Location::RightTorso,
                    LocationState::new(15, 12)
                        .with_rear(5)
                        .with_slots(&[S::HeatSink, S::HeatSink]),
                ),
                (
                    Location::LeftArm,
                    LocationState::new(12, 8).with_slots(&[S::Actuator; 4]),
                ),
                (
                    Location::RightArm,
                    LocationState::new(12, 8).with_slots(&[S::Actuator; 4]),
                ),
                (
                    Location::LeftLeg,
                    LocationState::new(16, 12).with_slots(&[S::Actuator; 4]),
                ),
                (
                    Location::RightLeg,
                    LocationState::new(16, 12).with_slots(&[S::Actuator; 4]),
                ),
            ],
            UnitKind::Vehicle => vec![
                (
                    Location::Front,
                    LocationState::new(20, 4).with_slots(&[S::Cockpit, S::Sensors]),
                ),
                (Location::Left, LocationState::new(15, 4)),
                (Location::Right, LocationState::new(15, 4)),
                (
                    Location::Rear,
                    LocationState::new(10, 4).with_slots(&[S::Engine]),
                ),
                (Location::Turret, LocationState::new(12, 4)),
            ],
            UnitKind::ConventionalInfantry => vec![(Location::Platoon, LocationState::new(0, 28))],
            UnitKind::BattleArmor => (1..=4)
                .map(|n| (Location::Trooper(n), LocationState::new(8, 1)))
                .collect(),
            UnitKind::Aerospace => vec![
                (
                    Location::Nose,
                    LocationState::new(20, 8).with_slots(&[S::Cockpit, S::Sensors]),
                ),
                (Location::LeftWing, LocationState::new(16, 8)),
                (Location::RightWing, LocationState::new(16, 8)),
                (
                    Location::Aft,
                    LocationState::new(12, 8).with_slots(&[S::Engine, S::Engine, S::Engine]),
                ),
            ],
        }
    }

    /// Whether damage against this kind goes through infantry conversion.
    #[must_use]
    pub const fn is_conventional_infantry(self) -> bool {
        matches!(self, UnitKind::ConventionalInfantry)
    }

    /// Whether this kind is any sort of infantry (conventional or armored).
    #[must_use]
    pub const fn is_infantry(self) -> bool {
        matches!(self, UnitKind::ConventionalInfantry | UnitKind::BattleArmor)
    }

    /// Whether critical-hit checks are rolled for this kind.
    #[must_use]
    pub const fn takes_criticals(self) -> bool {
        !self.is_infantry()
    }
}

/// A unit on the board.
///
/// Fields the resolution engine mutates (armor, structure, status, heat,
/// ammo) are reached through the [`StateMutator`](crate::resolver::StateMutator)
/// implementation on [`GameState`](crate::game::GameState); direct field
/// access is for setup and inspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    id: EntityId,
    kind: UnitKind,
    /// Display name.
    pub name: String,
    /// Hex the unit occupies.
    pub position: HexCoord,
    locations: BTreeMap<Location, LocationState>,
    mounts: BTreeMap<MountId, WeaponMount>,
    bins: BTreeMap<BinId, AmmoBin>,
    /// Current heat.
    pub heat: u32,
    /// Engine critical hits taken.
    pub engine_hits: u8,
    /// Gyro critical hits taken.
    pub gyro_hits: u8,
    /// Pilot or crew.
    pub pilot: Pilot,
    /// Status conditions.
    pub status: StatusFlags,
    /// Armor construction traits.
    pub armor_traits: ArmorTraits,
    /// Conventional infantry with vehicles (double damage).
    pub mechanized: bool,
    /// Capital-scale craft; bay damage is converted on hit.
    pub capital_scale: bool,
    /// Unit this one is grappled with.
    pub grappled_with: Option<EntityId>,
    /// Unit this Battle Armor squad is swarming.
    pub swarming: Option<EntityId>,
}

impl Unit {
    /// A unit with the default location layout for `kind`.
    ///
    /// The id is a placeholder until the unit is spawned into a
    /// [`Arena`](crate::arena::Arena).
    #[must_use]
    pub fn new(kind: UnitKind, name: &str) -> Self {
        Self {
            id: EntityId::new(u64::MAX),
            kind,
            name: name.to_owned(),
            position: HexCoord::new(0, 0),
            locations: kind.locations().into_iter().collect(),
            mounts: BTreeMap::new(),
            bins: BTreeMap::new(),
            heat: 0,
            engine_hits: 0,
            gyro_hits: 0,
            pilot: Pilot::default(),
            status: StatusFlags::empty(),
            armor_traits: ArmorTraits::empty(),
            mechanized: false,
            capital_scale: false,
            grappled_with: None,
            swarming: None,
        }
    }

    /// Places the unit at `hex`.
    #[must_use]
    pub fn at(mut self, hex: HexCoord) -> Self {
        self.position = hex;
        self
    }

    /// Replaces the pilot.
    #[must_use]
    pub fn with_pilot(mut self, pilot: Pilot) -> Self {
        self.pilot = pilot;
        self
    }

    /// Sets armor traits.
    #[must_use]
    pub fn with_armor_traits(mut self, traits: ArmorTraits) -> Self {
        self.armor_traits = traits;
        self
    }

    /// Replaces one location's state, adding it if absent.
    #[must_use]
    pub fn with_location(mut self, location: Location, state: LocationState) -> Self {
        self.locations.insert(location, state);
        self
    }

    /// Removes a location, e.g. the turret of a turretless vehicle.
    #[must_use]
    pub fn without_location(mut self, location: Location) -> Self {
        self.locations.remove(&location);
        self
    }

    /// Sets the number of Battle Armor troopers and their armor.
    #[must_use]
    pub fn with_troopers(mut self, count: u8, armor: u32) -> Self {
        self.locations
            .retain(|loc, _| !matches!(loc, Location::Trooper(_)));
        for n in 1..=count {
            self.locations
                .insert(Location::Trooper(n), LocationState::new(armor, 1));
        }
        self
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    /// Unit identifier.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Unit kind.
    #[must_use]
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Whether the unit is destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.status.contains(StatusFlags::DESTROYED)
    }

    /// Whether the unit can make attacks: not destroyed, shut down or
    /// stunned.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        !self
            .status
            .intersects(StatusFlags::DESTROYED | StatusFlags::SHUTDOWN | StatusFlags::STUNNED)
    }

    /// Installs a weapon and adds its critical slot. Returns the new mount id.
    pub fn add_mount(&mut self, spec: WeaponSpec, location: Location) -> MountId {
        let id = MountId(next_key(self.mounts.keys().map(|m| m.0)));
        self.mounts
            .insert(id, WeaponMount::new(id, spec, location));
        if let Some(loc) = self.locations.get_mut(&location) {
            loc.slots.push(CriticalSlot::new(SlotKind::Weapon(id)));
        }
        id
    }

    /// Installs a weapon bay with the given member weapons.
    pub fn add_bay(&mut self, spec: WeaponSpec, members: Vec<WeaponSpec>, location: Location) -> MountId {
        let id = self.add_mount(spec, location);
        if let Some(mount) = self.mounts.get_mut(&id) {
            mount.bay = members;
        }
        id
    }

    /// Adds an ammo bin and its critical slot. Returns the new bin id.
    pub fn add_bin(
        &mut self,
        family: AmmoFamily,
        munition: Munition,
        shots: u32,
        damage_per_shot: u32,
        location: Location,
    ) -> BinId {
        let id = BinId(next_key(self.bins.keys().map(|b| b.0)));
        self.bins.insert(
            id,
            AmmoBin {
                id,
                family,
                munition,
                shots,
                damage_per_shot,
                location,
            },
        );
        if let Some(loc) = self.locations.get_mut(&location) {
            loc.slots.push(CriticalSlot::new(SlotKind::Ammo(id)));
        }
        id
    }

    /// Links `mount` to draw from `bin`. Unknown ids are ignored.
    pub fn link_ammo(&mut self, mount: MountId, bin: BinId) {
        if self.bins.contains_key(&bin) {
            if let Some(m) = self.mounts.get_mut(&mount) {
                m.ammo = Some(bin);
            }
        }
    }

    /// A weapon mount.
    #[must_use]
    pub fn mount(&self, id: MountId) -> Option<&WeaponMount> {
        self.mounts.get(&id)
    }

    /// A weapon mount, mutably.
    pub fn mount_mut(&mut self, id: MountId) -> Option<&mut WeaponMount> {
        self.mounts.get_mut(&id)
    }

    /// All mounts in id order.
    pub fn mounts(&self) -> impl Iterator<Item = &WeaponMount> {
        self.mounts.values()
    }

    /// An ammo bin.
    #[must_use]
    pub fn bin(&self, id: BinId) -> Option<&AmmoBin> {
        self.bins.get(&id)
    }

    /// An ammo bin, mutably.
    pub fn bin_mut(&mut self, id: BinId) -> Option<&mut AmmoBin> {
        self.bins.get_mut(&id)
    }

    /// All bins in id order.
    pub fn bins(&self) -> impl Iterator<Item = &AmmoBin> {
        self.bins.values()
    }

    /// Total rounds across all bins compatible with `family`/`munition`.
    #[must_use]
    pub fn rounds_available(&self, family: AmmoFamily, munition: Munition) -> u32 {
        self.bins
            .values()
            .filter(|b| b.is_compatible(family, munition))
            .map(|b| b.shots)
            .sum()
    }

    /// State of a location.
    #[must_use]
    pub fn location(&self, location: Location) -> Option<&LocationState> {
        self.locations.get(&location)
    }

    /// State of a location, mutably.
    pub fn location_mut(&mut self, location: Location) -> Option<&mut LocationState> {
        self.locations.get_mut(&location)
    }

    /// All locations in order.
    pub fn locations(&self) -> impl Iterator<Item = (&Location, &LocationState)> {
        self.locations.iter()
    }

    /// Whether `location` exists and is intact.
    #[must_use]
    pub fn has_intact(&self, location: Location) -> bool {
        self.locations.get(&location).is_some_and(|l| !l.destroyed)
    }

    /// Battle Armor troopers still alive, in order.
    #[must_use]
    pub fn surviving_troopers(&self) -> Vec<Location> {
        self.locations
            .iter()
            .filter(|(loc, state)| matches!(loc, Location::Trooper(_)) && !state.destroyed)
            .map(|(loc, _)| *loc)
            .collect()
    }

    /// Total armor plus structure over all intact locations.
    #[must_use]
    pub fn total_durability(&self) -> u32 {
        self.locations
            .values()
            .filter(|l| !l.destroyed)
            .map(|l| l.armor + l.rear_armor.unwrap_or(0) + l.structure)
            .sum()
    }
}

fn next_key(existing: impl Iterator<Item = u16>) -> u16 {
    existing.max().map_or(1, |m| m.saturating_add(1))
}
