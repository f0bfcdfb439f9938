//! Variant registry: `(category, munition, mode)` to resolution strategy.
//!
//! Every legal key maps to exactly one [`Variant`]. Keys of direct-fire
//! categories may be left unregistered and fall back to the default
//! variant; every other legal key must be registered explicitly. These
//! rules are checked once, when the registry is built, so a lookup of a
//! legal key can never fail at resolution time.
//!
//! # Example
//!
//! ```
//! use gunline_core::resolver::registry::VariantRegistry;
//! use gunline_core::weapon::{FiringMode, Munition, VariantKey, WeaponCategory};
//!
//! let registry = VariantRegistry::standard().unwrap();
//! let key = VariantKey::new(WeaponCategory::Srm, Munition::Inferno, FiringMode::Single);
//! assert_eq!(registry.lookup(&key).unwrap().name, "inferno");
//!
//! // Unlisted direct-fire keys fall back to the default variant.
//! let key = VariantKey::new(WeaponCategory::Gauss, Munition::Standard, FiringMode::Single);
//! assert_eq!(registry.lookup(&key).unwrap().name, "direct_fire");
//! ```

use std::collections::{BTreeMap, BTreeSet};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::damage::DamagePolicy;
use super::hits::{ClusterSpec, HitPolicy, JamTable};
use crate::error::RegistryError;
use crate::weapon::{FiringMode, Munition, VariantKey, WeaponCategory};

bitflags! {
    /// Secondary effects a standard variant triggers after damage.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct HookFlags: u8 {
        /// Inferno: sets the target alight and ignites the hex.
        const INFERNO = 1 << 0;
        /// Rolls to ignite the target hex.
        const IGNITION_ROLL = 1 << 1;
        /// Rolls for electronics interference or shutdown.
        const EMP = 1 << 2;
    }
}

/// How hit locations are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocationRule {
    /// Rolled on the side's hit table.
    #[default]
    Rolled,
    /// The declared location; rolled when none was declared.
    Designated,
    /// The leg table: right or left leg, retargeted if one is gone.
    LegTable,
}

/// Effects attached to a standard variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EffectHooks {
    /// Secondary effects.
    pub flags: HookFlags,
    /// Location selection.
    pub location: LocationRule,
}

/// A variant that goes through hits, damage and effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StandardVariant {
    /// Hit-count policy.
    pub hits: HitPolicy,
    /// Damage policy.
    pub damage: DamagePolicy,
    /// Effect hooks.
    pub hooks: EffectHooks,
}

/// Attack categories that bypass the hit/damage pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialCase {
    /// Area-effect artillery with scatter on a miss.
    Artillery,
    /// TAG designation.
    Tag,
    /// Narc pod attachment.
    Narc,
    /// Grapple attach/detach.
    Grapple,
    /// Battle Armor swarm attach/detach.
    Swarm,
    /// Fluid-gun fire suppression.
    FireSuppression,
    /// Smoke delivery to a hex.
    SmokeDelivery,
}

/// Strategy for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantKind {
    /// Standard pipeline.
    Standard(StandardVariant),
    /// Special-case resolver.
    Special(SpecialCase),
}

/// A named resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    /// Stable name used in logs and tests.
    pub name: &'static str,
    /// Strategy.
    pub kind: VariantKind,
}

impl Variant {
    /// A standard variant with rolled locations and no hooks.
    #[must_use]
    pub const fn standard(name: &'static str, hits: HitPolicy, damage: DamagePolicy) -> Self {
        Self {
            name,
            kind: VariantKind::Standard(StandardVariant {
                hits,
                damage,
                hooks: EffectHooks {
                    flags: HookFlags::empty(),
                    location: LocationRule::Rolled,
                },
            }),
        }
    }

    /// A special-case variant.
    #[must_use]
    pub const fn special(name: &'static str, case: SpecialCase) -> Self {
        Self {
            name,
            kind: VariantKind::Special(case),
        }
    }

    /// Adds hook flags to a standard variant.
    #[must_use]
    pub fn with_hooks(mut self, flags: HookFlags) -> Self {
        if let VariantKind::Standard(ref mut v) = self.kind {
            v.hooks.flags |= flags;
        }
        self
    }

    /// Sets the location rule of a standard variant.
    #[must_use]
    pub fn locating(mut self, rule: LocationRule) -> Self {
        if let VariantKind::Standard(ref mut v) = self.kind {
            v.hooks.location = rule;
        }
        self
    }

    /// The variant used for unlisted direct-fire keys.
    #[must_use]
    pub const fn direct_fire() -> Self {
        Self::standard("direct_fire", HitPolicy::Fixed, DamagePolicy::Ballistic)
    }

    fn is_plain_direct_fire(&self) -> bool {
        matches!(
            self.kind,
            VariantKind::Standard(StandardVariant {
                hits: HitPolicy::Fixed,
                ..
            })
        )
    }
}

/// Collects registrations; [`build`](Self::build) validates them.
#[derive(Debug, Default)]
pub struct VariantRegistryBuilder {
    entries: Vec<(VariantKey, Variant)>,
}

impl VariantRegistryBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `variant` for `key`.
    pub fn register(&mut self, key: VariantKey, variant: Variant) -> &mut Self {
        self.entries.push((key, variant));
        self
    }

    /// Registers `variant` for `category`/`munition` in every legal mode.
    pub fn register_all_modes(
        &mut self,
        category: WeaponCategory,
        munition: Munition,
        variant: Variant,
    ) -> &mut Self {
        for &mode in category.legal_modes() {
            self.register(VariantKey::new(category, munition, mode), variant);
        }
        self
    }

    /// Validates the registrations.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Duplicate`] if a key was registered twice
    /// - [`RegistryError::IllegalKey`] if a key is not legal for its category
    /// - [`RegistryError::DefaultNotDirectFire`] if `default` is not a
    ///   fixed-hit standard variant
    /// - [`RegistryError::Missing`] if a legal key of a category that is not
    ///   direct-fire has no registration
    pub fn build(self, default: Variant) -> Result<VariantRegistry, RegistryError> {
        let mut variants = BTreeMap::new();
        for (key, variant) in self.entries {
            if variants.insert(key, variant).is_some() {
                return Err(RegistryError::Duplicate(key));
            }
        }
        if let Some(key) = variants.keys().find(|k| !k.is_legal()) {
            return Err(RegistryError::IllegalKey(*key));
        }
        if !default.is_plain_direct_fire() {
            return Err(RegistryError::DefaultNotDirectFire);
        }
        let registered: BTreeSet<_> = variants.keys().copied().collect();
        if let Some(key) = WeaponCategory::legal_keys()
            .find(|k| !registered.contains(k) && !k.category.is_direct_fire())
        {
            return Err(RegistryError::Missing(key));
        }
        tracing::debug!(variants = variants.len(), "variant registry built");
        Ok(VariantRegistry { variants, default })
    }
}

/// Validated, total mapping from legal keys to variants.
#[derive(Debug, Clone)]
pub struct VariantRegistry {
    variants: BTreeMap<VariantKey, Variant>,
    default: Variant,
}

impl VariantRegistry {
    /// The rule-book registrations.
    ///
    /// # Errors
    ///
    /// Never in practice; the table is checked by the same rules as any
    /// other registry.
    pub fn standard() -> Result<Self, RegistryError> {
        use DamagePolicy as D;
        use FiringMode as F;
        use Munition as M;
        use WeaponCategory as C;

        let key = VariantKey::new;
        let mut b = VariantRegistryBuilder::new();

        b.register(key(C::Energy, M::None, F::Single), Variant::standard("energy", HitPolicy::Fixed, D::Energy))
            .register(key(C::Pulse, M::None, F::Single), Variant::standard("pulse", HitPolicy::Fixed, D::Pulse))
            .register(
                key(C::VariableSpeedPulse, M::None, F::Single),
                Variant::standard("variable_speed_pulse", HitPolicy::Fixed, D::VariableSpeedPulse),
            )
            .register(
                key(C::Flamer, M::None, F::Single),
                Variant::standard("flamer", HitPolicy::Fixed, D::Energy).with_hooks(HookFlags::IGNITION_ROLL),
            )
            .register(
                key(C::Emp, M::None, F::Single),
                Variant::standard("emp", HitPolicy::Fixed, D::None).with_hooks(HookFlags::EMP),
            );

        // Multi-shot autocannons
        b.register(
            key(C::Autocannon, M::Standard, F::RapidFire),
            Variant::standard("rapid_fire", HitPolicy::Burst(JamTable::RapidFire), D::Ballistic),
        )
        .register(
            key(C::UltraAutocannon, M::Standard, F::Ultra),
            Variant::standard("ultra", HitPolicy::Burst(JamTable::Ultra), D::Ballistic),
        )
        .register_all_modes(
            C::RotaryAutocannon,
            M::Standard,
            Variant::standard("rotary", HitPolicy::Burst(JamTable::Rotary), D::Ballistic),
        );

        // Racks and cluster shot
        let missiles = |name, spec| Variant::standard(name, HitPolicy::Cluster(spec), D::Cluster);
        b.register(key(C::LbxAutocannon, M::Cluster, F::Single), missiles("lbx_cluster", ClusterSpec::grouped(1)))
            .register(
                key(C::HyperAssaultGauss, M::Standard, F::Single),
                missiles("hag", ClusterSpec::grouped(5).with_range_modifier()),
            )
            .register(key(C::Lrm, M::Standard, F::Single), missiles("lrm", ClusterSpec::grouped(5)))
            .register(
                key(C::Lrm, M::Incendiary, F::Single),
                missiles("lrm_incendiary", ClusterSpec::grouped(5)).with_hooks(HookFlags::IGNITION_ROLL),
            )
            .register(key(C::Srm, M::Standard, F::Single), missiles("srm", ClusterSpec::grouped(1)))
            .register(
                key(C::Srm, M::Inferno, F::Single),
                Variant::standard("inferno", HitPolicy::Cluster(ClusterSpec::grouped(1)), D::None)
                    .with_hooks(HookFlags::INFERNO),
            )
            .register(key(C::Mrm, M::Standard, F::Single), missiles("mrm", ClusterSpec::grouped(5)))
            .register(
                key(C::StreakSrm, M::Standard, F::Single),
                missiles("streak", ClusterSpec::grouped(1).streak()),
            );

        // Bays, fixed-location and leg attacks
        for munition in [M::None, M::Standard, M::Cluster] {
            b.register(key(C::Bay, munition, F::Single), Variant::standard("bay", HitPolicy::Fixed, D::Bay));
        }
        b.register(
            key(C::Mine, M::Standard, F::Single),
            Variant::standard("mine", HitPolicy::Fixed, D::Flat).locating(LocationRule::Designated),
        )
        .register(
            key(C::LegAttack, M::None, F::Single),
            Variant::standard("leg_attack", HitPolicy::Fixed, D::Flat).locating(LocationRule::LegTable),
        );

        // Special cases
        b.register(key(C::Artillery, M::Standard, F::Single), Variant::special("artillery", SpecialCase::Artillery))
            .register(key(C::Artillery, M::Smoke, F::Single), Variant::special("artillery_smoke", SpecialCase::Artillery))
            .register(key(C::Lrm, M::Smoke, F::Single), Variant::special("smoke_delivery", SpecialCase::SmokeDelivery))
            .register(key(C::Tag, M::None, F::Single), Variant::special("tag", SpecialCase::Tag))
            .register(key(C::Narc, M::Standard, F::Single), Variant::special("narc", SpecialCase::Narc))
            .register_all_modes(C::Grapple, M::None, Variant::special("grapple", SpecialCase::Grapple))
            .register_all_modes(C::Swarm, M::None, Variant::special("swarm", SpecialCase::Swarm))
            .register(
                key(C::FluidGun, M::Coolant, F::Single),
                Variant::special("coolant", SpecialCase::FireSuppression),
            )
            .register(
                key(C::FluidGun, M::Water, F::Single),
                Variant::special("water", SpecialCase::FireSuppression),
            );

        b.build(Variant::direct_fire())
    }

    /// Variant for `key`: its registration, or the default for an unlisted
    /// direct-fire key. `None` only for illegal keys.
    #[must_use]
    pub fn lookup(&self, key: &VariantKey) -> Option<&Variant> {
        if !key.is_legal() {
            return None;
        }
        self.variants
            .get(key)
            .or_else(|| key.category.is_direct_fire().then_some(&self.default))
    }

    /// Number of explicit registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether nothing is registered explicitly.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// The default direct-fire variant.
    #[must_use]
    pub fn default_variant(&self) -> &Variant {
        &self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod standard_table_tests {
        use super::*;

        #[test]
        fn standard_registry_builds() {
            let registry = VariantRegistry::standard().unwrap();
            assert!(!registry.is_empty());
        }

        #[test]
        fn every_legal_key_resolves() {
            let registry = VariantRegistry::standard().unwrap();
            for key in WeaponCategory::legal_keys() {
                assert!(registry.lookup(&key).is_some(), "{key}");
            }
        }

        #[test]
        fn illegal_key_does_not_resolve() {
            let registry = VariantRegistry::standard().unwrap();
            let key = VariantKey::new(WeaponCategory::Energy, Munition::Inferno, FiringMode::Single);
            assert!(registry.lookup(&key).is_none());
        }

        #[test]
        fn single_mode_burst_weapons_use_default() {
            let registry = VariantRegistry::standard().unwrap();
            let key = VariantKey::new(
                WeaponCategory::UltraAutocannon,
                Munition::Standard,
                FiringMode::Single,
            );
            assert_eq!(registry.lookup(&key).unwrap().name, "direct_fire");
        }

        #[test]
        fn hooks_are_attached() {
            let registry = VariantRegistry::standard().unwrap();
            let key = VariantKey::new(WeaponCategory::Flamer, Munition::None, FiringMode::Single);
            let VariantKind::Standard(v) = registry.lookup(&key).unwrap().kind else {
                panic!("flamer should be standard");
            };
            assert!(v.hooks.flags.contains(HookFlags::IGNITION_ROLL));

            let key = VariantKey::new(WeaponCategory::Mine, Munition::Standard, FiringMode::Single);
            let VariantKind::Standard(v) = registry.lookup(&key).unwrap().kind else {
                panic!("mine should be standard");
            };
            assert_eq!(v.hooks.location, LocationRule::Designated);
        }
    }

    mod validation_tests {
        use super::*;

        fn tag_key() -> VariantKey {
            VariantKey::new(WeaponCategory::Tag, Munition::None, FiringMode::Single)
        }

        #[test]
        fn duplicate_rejected() {
            let mut b = VariantRegistryBuilder::new();
            b.register(tag_key(), Variant::special("tag", SpecialCase::Tag))
                .register(tag_key(), Variant::special("tag2", SpecialCase::Tag));
            assert_eq!(
                b.build(Variant::direct_fire()).unwrap_err(),
                RegistryError::Duplicate(tag_key())
            );
        }

        #[test]
        fn illegal_key_rejected() {
            let key = VariantKey::new(WeaponCategory::Tag, Munition::Smoke, FiringMode::Single);
            let mut b = VariantRegistryBuilder::new();
            b.register(key, Variant::special("tag", SpecialCase::Tag));
            assert_eq!(
                b.build(Variant::direct_fire()).unwrap_err(),
                RegistryError::IllegalKey(key)
            );
        }

        #[test]
        fn missing_key_rejected() {
            let b = VariantRegistryBuilder::new();
            assert!(matches!(
                b.build(Variant::direct_fire()),
                Err(RegistryError::Missing(_))
            ));
        }

        #[test]
        fn default_must_be_fixed_hit() {
            let b = VariantRegistryBuilder::new();
            let err = b
                .build(Variant::special("tag", SpecialCase::Tag))
                .unwrap_err();
            assert_eq!(err, RegistryError::DefaultNotDirectFire);
        }
    }
}
