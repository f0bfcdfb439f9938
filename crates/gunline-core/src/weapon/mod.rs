//! Weapon taxonomy: categories, munitions, firing modes and weapon data.
//!
//! The resolution engine never matches on weapon names. Everything it needs
//! to choose a variant is the triple `(category, munition, mode)`, held in a
//! [`VariantKey`]. Each category declares which munitions and modes are
//! legal for it; the variant registry must cover every legal triple.

pub mod catalog;

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Broad weapon family. Selects the resolution variant together with the
/// munition and firing mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum WeaponCategory {
    /// Standard lasers, PPCs.
    Energy,
    /// Pulse lasers.
    Pulse,
    /// Variable-speed pulse lasers.
    VariableSpeedPulse,
    /// Flamers.
    Flamer,
    /// Standard autocannons.
    Autocannon,
    /// Gauss rifles.
    Gauss,
    /// Ultra autocannons.
    UltraAutocannon,
    /// Rotary autocannons.
    RotaryAutocannon,
    /// LB-X autocannons.
    LbxAutocannon,
    /// Hyper-assault Gauss rifles.
    HyperAssaultGauss,
    /// Long-range missile racks.
    Lrm,
    /// Short-range missile racks.
    Srm,
    /// Medium-range missile racks.
    Mrm,
    /// Streak SRM racks.
    StreakSrm,
    /// Electromagnetic pulse weapons.
    Emp,
    /// Capital-scale weapon bays.
    Bay,
    /// Mines and other designated-location charges.
    Mine,
    /// Battle Armor anti-Mek leg attack.
    LegAttack,
    /// Artillery.
    Artillery,
    /// Target acquisition gear.
    Tag,
    /// Narc missile beacons.
    Narc,
    /// Grappling equipment.
    Grapple,
    /// Battle Armor swarm attack.
    Swarm,
    /// Fluid guns (coolant, water).
    FluidGun,
}

impl WeaponCategory {
    /// Munitions that are legal for this category. Weapons without ammo
    /// use [`Munition::None`].
    #[must_use]
    pub fn legal_munitions(self) -> &'static [Munition] {
        use Munition as M;
        use WeaponCategory as C;
        match self {
            C::Energy
            | C::Pulse
            | C::VariableSpeedPulse
            | C::Flamer
            | C::Emp
            | C::LegAttack
            | C::Tag
            | C::Grapple
            | C::Swarm => &[M::None],
            C::Autocannon
            | C::Gauss
            | C::UltraAutocannon
            | C::RotaryAutocannon
            | C::HyperAssaultGauss
            | C::Mrm
            | C::StreakSrm
            | C::Mine
            | C::Narc => &[M::Standard],
            C::LbxAutocannon => &[M::Standard, M::Cluster],
            C::Bay => &[M::None, M::Standard, M::Cluster],
            C::Lrm => &[M::Standard, M::Incendiary, M::Smoke],
            C::Srm => &[M::Standard, M::Inferno],
            C::Artillery => &[M::Standard, M::Smoke],
            C::FluidGun => &[M::Coolant, M::Water],
        }
    }

    /// Firing modes that are legal for this category.
    #[must_use]
    pub fn legal_modes(self) -> &'static [FiringMode] {
        use FiringMode as F;
        match self {
            WeaponCategory::Autocannon => &[F::Single, F::RapidFire],
            WeaponCategory::UltraAutocannon => &[F::Single, F::Ultra],
            WeaponCategory::RotaryAutocannon => &[
                F::Rotary(1),
                F::Rotary(2),
                F::Rotary(3),
                F::Rotary(4),
                F::Rotary(5),
                F::Rotary(6),
            ],
            WeaponCategory::Grapple | WeaponCategory::Swarm => &[F::Attach, F::Detach],
            _ => &[F::Single],
        }
    }

    /// Whether the category resolves as a plain direct-fire attack when no
    /// explicit variant is registered for it.
    #[must_use]
    pub const fn is_direct_fire(self) -> bool {
        matches!(
            self,
            WeaponCategory::Energy
                | WeaponCategory::Pulse
                | WeaponCategory::VariableSpeedPulse
                | WeaponCategory::Flamer
                | WeaponCategory::Autocannon
                | WeaponCategory::Gauss
                | WeaponCategory::UltraAutocannon
                | WeaponCategory::RotaryAutocannon
                | WeaponCategory::LbxAutocannon
        )
    }

    /// Every legal `(category, munition, mode)` triple across all categories.
    pub fn legal_keys() -> impl Iterator<Item = VariantKey> {
        WeaponCategory::iter().flat_map(|category| {
            category.legal_munitions().iter().flat_map(move |&munition| {
                category
                    .legal_modes()
                    .iter()
                    .map(move |&mode| VariantKey::new(category, munition, mode))
            })
        })
    }
}

/// Ammunition type loaded in a bin.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Munition {
    /// The weapon uses no ammunition.
    None,
    /// Standard rounds.
    Standard,
    /// LB-X cluster shot.
    Cluster,
    /// SRM inferno.
    Inferno,
    /// Incendiary missiles.
    Incendiary,
    /// Smoke.
    Smoke,
    /// Fluid gun coolant.
    Coolant,
    /// Fluid gun water.
    Water,
}

/// Firing mode selected for an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FiringMode {
    /// One shot.
    Single,
    /// Ultra autocannon double-rate fire.
    Ultra,
    /// Rotary autocannon firing `n` shots (1-6).
    Rotary(u8),
    /// Standard autocannon rapid fire (two shots).
    RapidFire,
    /// Grapple or swarm: establish the link.
    Attach,
    /// Grapple or swarm: break the link.
    Detach,
}

impl FiringMode {
    /// Shots selected by this mode.
    #[must_use]
    pub fn shots(self) -> u32 {
        match self {
            FiringMode::Ultra | FiringMode::RapidFire => 2,
            FiringMode::Rotary(n) => u32::from(n),
            FiringMode::Single | FiringMode::Attach | FiringMode::Detach => 1,
        }
    }
}

impl fmt::Display for FiringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiringMode::Single => f.write_str("single"),
            FiringMode::Ultra => f.write_str("ultra"),
            FiringMode::Rotary(n) => write!(f, "rotary x{n}"),
            FiringMode::RapidFire => f.write_str("rapid fire"),
            FiringMode::Attach => f.write_str("attach"),
            FiringMode::Detach => f.write_str("detach"),
        }
    }
}

/// Lookup key for a resolution variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantKey {
    /// Weapon category.
    pub category: WeaponCategory,
    /// Munition loaded, or [`Munition::None`].
    pub munition: Munition,
    /// Firing mode.
    pub mode: FiringMode,
}

impl VariantKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(category: WeaponCategory, munition: Munition, mode: FiringMode) -> Self {
        Self {
            category,
            munition,
            mode,
        }
    }

    /// Whether the munition and mode are both legal for the category.
    #[must_use]
    pub fn is_legal(&self) -> bool {
        self.category.legal_munitions().contains(&self.munition)
            && self.category.legal_modes().contains(&self.mode)
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.category, self.munition, self.mode)
    }
}

/// Which bins fit which launcher. Size-specific families carry the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AmmoFamily {
    /// Standard autocannon of the given class.
    Autocannon(u8),
    /// Ultra autocannon.
    Ultra(u8),
    /// Rotary autocannon.
    Rotary(u8),
    /// LB-X autocannon.
    Lbx(u8),
    /// Gauss rifle.
    Gauss,
    /// Hyper-assault Gauss rifle.
    Hag(u8),
    /// LRM rack.
    Lrm(u8),
    /// SRM rack.
    Srm(u8),
    /// MRM rack.
    Mrm(u8),
    /// Streak SRM rack.
    StreakSrm(u8),
    /// Narc pods.
    Narc,
    /// Arrow IV missiles.
    ArrowIv,
    /// Fluid gun tank.
    FluidGun,
    /// Mine charges.
    Mine,
}

/// How damage converts against conventional infantry.
///
/// Variants are ordered; a direct blow shifts the class toward the end.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum InfantryDamageClass {
    /// `damage / 10`.
    DirectFire,
    /// `damage / 10 + 1`.
    ClusterBallistic,
    /// `damage / 10 + 2`.
    Pulse,
    /// `damage / 5`.
    ClusterMissile,
    /// `damage / 5 + 1d6`.
    ClusterMissile1D6,
    /// `damage / 5 + 2d6`.
    ClusterMissile2D6,
    /// `1d6`.
    Burst1D6,
    /// `2d6`.
    Burst2D6,
    /// `3d6`.
    Burst3D6,
}

impl InfantryDamageClass {
    /// The class `steps` places later, stopping at the last class.
    #[must_use]
    pub fn shifted(self, steps: u32) -> Self {
        let all: Vec<_> = InfantryDamageClass::iter().collect();
        let index = all.iter().position(|c| *c == self).unwrap_or(0);
        let target = (index + steps as usize).min(all.len() - 1);
        all[target]
    }
}

/// Static data for one weapon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Display name.
    pub name: String,
    /// Category; selects the resolution variant.
    pub category: WeaponCategory,
    /// Damage per hit. For racks and cluster shot this is per missile or
    /// pellet; for artillery it is impact-hex damage.
    pub damage: u32,
    /// Damage by range band (short, medium, long, extreme) for weapons whose
    /// damage falls off with range.
    pub damage_by_range: Option<[u32; 4]>,
    /// Missiles or pellets per salvo; 1 for single-projectile weapons.
    pub rack_size: u32,
    /// Heat per shot.
    pub heat: u32,
    /// Ammo family, if the weapon uses ammo.
    pub ammo: Option<AmmoFamily>,
    /// Conversion class against conventional infantry.
    pub infantry_class: InfantryDamageClass,
    /// Damage to hexes adjacent to the impact hex (artillery).
    pub splash: u32,
}

impl WeaponSpec {
    /// A direct-fire weapon with no ammo.
    #[must_use]
    pub fn new(name: &str, category: WeaponCategory, damage: u32, heat: u32) -> Self {
        Self {
            name: name.to_owned(),
            category,
            damage,
            damage_by_range: None,
            rack_size: 1,
            heat,
            ammo: None,
            infantry_class: InfantryDamageClass::DirectFire,
            splash: 0,
        }
    }

    /// Sets the ammo family.
    #[must_use]
    pub fn with_ammo(mut self, family: AmmoFamily) -> Self {
        self.ammo = Some(family);
        self
    }

    /// Sets the rack size.
    #[must_use]
    pub fn with_rack(mut self, rack: u32) -> Self {
        self.rack_size = rack;
        self
    }

    /// Sets the infantry conversion class.
    #[must_use]
    pub fn with_infantry_class(mut self, class: InfantryDamageClass) -> Self {
        self.infantry_class = class;
        self
    }

    /// Infantry class for this weapon firing `munition`. Cluster shot
    /// always converts as cluster ballistic.
    #[must_use]
    pub fn infantry_class_for(&self, munition: Munition) -> InfantryDamageClass {
        if munition == Munition::Cluster {
            InfantryDamageClass::ClusterBallistic
        } else {
            self.infantry_class
        }
    }

    /// Whether the weapon draws from an ammo bin.
    #[must_use]
    pub fn uses_ammo(&self) -> bool {
        self.ammo.is_some()
    }
}
