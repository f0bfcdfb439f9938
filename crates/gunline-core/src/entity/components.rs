//! Component structs that make up a unit.
//!
//! These hold the per-unit state the resolution engine reads and the bounded
//! subset it mutates: armor, structure, critical slots, weapon mounts, ammo
//! bins and status flags.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::weapon::{AmmoFamily, Munition, WeaponSpec};

// =============================================================================
// Locations
// =============================================================================

/// A hit location on a unit.
///
/// Which locations exist depends on the unit kind; see
/// [`UnitKind::locations`](super::UnitKind::locations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    /// Mek head.
    Head,
    /// Mek centre torso.
    CenterTorso,
    /// Mek left torso.
    LeftTorso,
    /// Mek right torso.
    RightTorso,
    /// Mek left arm.
    LeftArm,
    /// Mek right arm.
    RightArm,
    /// Mek left leg.
    LeftLeg,
    /// Mek right leg.
    RightLeg,
    /// Vehicle front.
    Front,
    /// Vehicle left side.
    Left,
    /// Vehicle right side.
    Right,
    /// Vehicle rear.
    Rear,
    /// Vehicle turret.
    Turret,
    /// Conventional infantry platoon (the whole unit).
    Platoon,
    /// Battle Armor trooper, numbered from 1.
    Trooper(u8),
    /// Aerospace nose.
    Nose,
    /// Aerospace left wing.
    LeftWing,
    /// Aerospace right wing.
    RightWing,
    /// Aerospace aft.
    Aft,
}

impl Location {
    /// Whether this location carries separate rear armor on a Mek.
    #[must_use]
    pub const fn has_rear_armor(self) -> bool {
        matches!(
            self,
            Location::CenterTorso | Location::LeftTorso | Location::RightTorso
        )
    }

    /// Whether a 12+ critical roll blows this location off instead of
    /// rolling three criticals.
    #[must_use]
    pub const fn can_be_blown_off(self) -> bool {
        matches!(
            self,
            Location::Head
                | Location::LeftArm
                | Location::RightArm
                | Location::LeftLeg
                | Location::RightLeg
        )
    }

    /// Whether this is a Mek leg.
    #[must_use]
    pub const fn is_leg(self) -> bool {
        matches!(self, Location::LeftLeg | Location::RightLeg)
    }

    /// Where excess Mek damage goes once this location is gone.
    #[must_use]
    pub const fn mek_transfer(self) -> Option<Location> {
        match self {
            Location::LeftArm | Location::LeftLeg => Some(Location::LeftTorso),
            Location::RightArm | Location::RightLeg => Some(Location::RightTorso),
            Location::LeftTorso | Location::RightTorso => Some(Location::CenterTorso),
            _ => None,
        }
    }

    /// Short label used in reports.
    #[must_use]
    pub fn abbreviation(self) -> String {
        match self {
            Location::Head => "HD".into(),
            Location::CenterTorso => "CT".into(),
            Location::LeftTorso => "LT".into(),
            Location::RightTorso => "RT".into(),
            Location::LeftArm => "LA".into(),
            Location::RightArm => "RA".into(),
            Location::LeftLeg => "LL".into(),
            Location::RightLeg => "RL".into(),
            Location::Front => "FR".into(),
            Location::Left => "LS".into(),
            Location::Right => "RS".into(),
            Location::Rear => "RR".into(),
            Location::Turret => "TU".into(),
            Location::Platoon => "PL".into(),
            Location::Trooper(n) => format!("T{n}"),
            Location::Nose => "NOS".into(),
            Location::LeftWing => "LWG".into(),
            Location::RightWing => "RWG".into(),
            Location::Aft => "AFT".into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.abbreviation())
    }
}

// =============================================================================
// Critical slots
// =============================================================================

/// Identifier of a weapon mount, unique within its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MountId(pub u16);

/// Identifier of an ammo bin, unique within its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BinId(pub u16);

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mount#{}", self.0)
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bin#{}", self.0)
    }
}

/// What occupies a critical slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// Nothing; rerolled on a critical hit.
    Empty,
    /// A weapon mount.
    Weapon(MountId),
    /// An ammo bin.
    Ammo(BinId),
    /// Engine; the third hit destroys the unit.
    Engine,
    /// Gyro; the second hit leaves the unit immobile.
    Gyro,
    /// Cockpit or crew compartment; a hit kills the crew.
    Cockpit,
    /// Sensors.
    Sensors,
    /// Life support.
    LifeSupport,
    /// Limb actuator.
    Actuator,
    /// Heat sink.
    HeatSink,
}

impl SlotKind {
    /// Short label used in reports.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            SlotKind::Empty => "empty".into(),
            SlotKind::Weapon(id) => id.to_string(),
            SlotKind::Ammo(id) => id.to_string(),
            SlotKind::Engine => "engine".into(),
            SlotKind::Gyro => "gyro".into(),
            SlotKind::Cockpit => "cockpit".into(),
            SlotKind::Sensors => "sensors".into(),
            SlotKind::LifeSupport => "life support".into(),
            SlotKind::Actuator => "actuator".into(),
            SlotKind::HeatSink => "heat sink".into(),
        }
    }
}

/// One critical slot and whether it has already been hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriticalSlot {
    /// Slot contents.
    pub kind: SlotKind,
    /// Already destroyed by an earlier critical.
    pub hit: bool,
}

impl CriticalSlot {
    /// An undamaged slot.
    #[must_use]
    pub const fn new(kind: SlotKind) -> Self {
        Self { kind, hit: false }
    }

    /// Whether a critical hit can land here.
    #[must_use]
    pub const fn is_hittable(&self) -> bool {
        !self.hit && !matches!(self.kind, SlotKind::Empty)
    }
}

// =============================================================================
// Location state
// =============================================================================

/// Armor, structure and critical slots of one location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationState {
    /// Front (or only) armor.
    pub armor: u32,
    /// Rear armor, for Mek torsos.
    pub rear_armor: Option<u32>,
    /// Internal structure (troopers for a platoon).
    pub structure: u32,
    /// The location has been destroyed or blown off.
    pub destroyed: bool,
    /// Critical slots in table order.
    pub slots: Vec<CriticalSlot>,
}

impl LocationState {
    /// A location with front armor and structure only.
    #[must_use]
    pub fn new(armor: u32, structure: u32) -> Self {
        Self {
            armor,
            rear_armor: None,
            structure,
            destroyed: false,
            slots: Vec::new(),
        }
    }

    /// Adds rear armor.
    #[must_use]
    pub fn with_rear(mut self, rear: u32) -> Self {
        self.rear_armor = Some(rear);
        self
    }

    /// Appends critical slots.
    #[must_use]
    pub fn with_slots(mut self, kinds: &[SlotKind]) -> Self {
        self.slots.extend(kinds.iter().copied().map(CriticalSlot::new));
        self
    }

    /// Whether any slot can still take a critical hit.
    #[must_use]
    pub fn has_hittable_slots(&self) -> bool {
        self.slots.iter().any(CriticalSlot::is_hittable)
    }
}

// =============================================================================
// Status
// =============================================================================

bitflags! {
    /// Status conditions on a unit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StatusFlags: u32 {
        /// Unit is destroyed; no longer a legal target or attacker.
        const DESTROYED = 1 << 0;
        /// Unit is shut down.
        const SHUTDOWN = 1 << 1;
        /// Electronics interference (EMP).
        const INTERFERENCE = 1 << 2;
        /// Crew or troopers stunned.
        const STUNNED = 1 << 3;
        /// Unit is burning.
        const ON_FIRE = 1 << 4;
        /// Designated by TAG this turn.
        const TAG_DESIGNATED = 1 << 5;
        /// Carries an attached Narc pod.
        const NARC_ATTACHED = 1 << 6;
        /// Battle Armor is swarming this unit.
        const SWARMED = 1 << 7;
        /// Locked in a grapple.
        const GRAPPLED = 1 << 8;
        /// Unit is prone.
        const PRONE = 1 << 9;
        /// Unit cannot move.
        const IMMOBILE = 1 << 10;
    }
}

bitflags! {
    /// Armor construction traits that modify critical chances.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ArmorTraits: u8 {
        /// Hardened armor, -2 to critical chance.
        const HARDENED = 1 << 0;
        /// Reactive armor, -1 to critical chance.
        const REACTIVE = 1 << 1;
    }
}

bitflags! {
    /// Pilot special abilities relevant to weapon attacks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Abilities: u8 {
        /// +1 to critical chance rolls caused by this pilot's attacks.
        const CRIT_SEEKER = 1 << 0;
        /// +1 to cluster rolls.
        const CLUSTER_HITTER = 1 << 1;
    }
}

/// Pilot or crew skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pilot {
    /// Gunnery skill (used by the to-hit oracle, carried for reports).
    pub gunnery: u8,
    /// Piloting skill.
    pub piloting: u8,
    /// Special abilities.
    pub abilities: Abilities,
}

impl Default for Pilot {
    fn default() -> Self {
        Self {
            gunnery: 4,
            piloting: 5,
            abilities: Abilities::empty(),
        }
    }
}

// =============================================================================
// Weapons and ammunition
// =============================================================================

/// Operational state of a weapon mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MountCondition {
    /// Ready to fire.
    #[default]
    Ready,
    /// Jammed. `turns` is `None` until cleared externally, otherwise the
    /// number of turns before it clears itself.
    Jammed {
        /// Turns until the jam clears on its own.
        turns: Option<u8>,
    },
    /// Destroyed; can never fire again.
    Destroyed,
}

/// A weapon installed on a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponMount {
    /// Mount identifier.
    pub id: MountId,
    /// Weapon data. For a bay, the bay-level data.
    pub spec: WeaponSpec,
    /// Member weapons of a bay; empty for single weapons.
    pub bay: Vec<WeaponSpec>,
    /// Location the weapon is installed in.
    pub location: Location,
    /// Linked ammo bin, if the weapon uses ammo.
    pub ammo: Option<BinId>,
    /// Operational state.
    pub condition: MountCondition,
    /// The ammo feed is damaged; every shot needs a feed check.
    pub feed_damaged: bool,
    /// Linked Artemis fire control (+2 cluster rolls unless ECM-affected).
    pub artemis: bool,
}

impl WeaponMount {
    /// A ready mount with no ammo link.
    #[must_use]
    pub fn new(id: MountId, spec: WeaponSpec, location: Location) -> Self {
        Self {
            id,
            spec,
            bay: Vec::new(),
            location,
            ammo: None,
            condition: MountCondition::Ready,
            feed_damaged: false,
            artemis: false,
        }
    }

    /// Whether the mount can fire.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.condition, MountCondition::Ready)
    }

    /// Heat generated per shot. Bays sum their members.
    #[must_use]
    pub fn heat_per_shot(&self) -> u32 {
        if self.bay.is_empty() {
            self.spec.heat
        } else {
            self.bay.iter().map(|m| m.heat).sum()
        }
    }
}

/// A bin of ammunition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmmoBin {
    /// Bin identifier.
    pub id: BinId,
    /// Launcher/gun family this ammo fits.
    pub family: AmmoFamily,
    /// Munition type loaded.
    pub munition: Munition,
    /// Rounds remaining.
    pub shots: u32,
    /// Damage each remaining round contributes to an explosion.
    pub damage_per_shot: u32,
    /// Location the bin is stored in.
    pub location: Location,
}

impl AmmoBin {
    /// Whether this bin can feed a weapon of `family` with `munition`.
    #[must_use]
    pub fn is_compatible(&self, family: AmmoFamily, munition: Munition) -> bool {
        self.family == family && self.munition == munition
    }

    /// Removes `n` rounds.
    ///
    /// # Panics
    ///
    /// Panics if the bin holds fewer than `n` rounds. Ammo never goes
    /// negative; callers cap requests at what is available.
    pub fn consume(&mut self, n: u32) {
        assert!(
            n <= self.shots,
            "ammo underflow: {} has {} rounds, {} requested",
            self.id,
            self.shots,
            n
        );
        self.shots -= n;
    }
}
