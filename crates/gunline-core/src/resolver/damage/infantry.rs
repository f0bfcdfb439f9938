//! Damage against conventional infantry.
//!
//! Infantry take damage through a per-class table instead of the general
//! pipeline. Each class has its own formula; the result is rounded up, then
//! doubled for mechanized platoons and halved (rounding up) for platoons in
//! building cover.

use tracing::trace;

use super::DamageTarget;
use crate::dice::Dice;
use crate::weapon::InfantryDamageClass;

/// Raw class damage before platoon modifiers. Burst classes roll dice.
pub fn class_damage(damage: u32, class: InfantryDamageClass, dice: &mut dyn Dice) -> u32 {
    use InfantryDamageClass as C;
    match class {
        C::DirectFire => damage.div_ceil(10),
        C::ClusterBallistic => damage.div_ceil(10) + 1,
        C::Pulse => damage.div_ceil(10) + 2,
        C::ClusterMissile => damage.div_ceil(5),
        C::ClusterMissile1D6 => damage.div_ceil(5) + dice.roll_d6(1),
        C::ClusterMissile2D6 => damage.div_ceil(5) + dice.roll_d6(2),
        C::Burst1D6 => dice.roll_d6(1),
        C::Burst2D6 => dice.roll_d6(2),
        C::Burst3D6 => dice.roll_d6(3),
    }
}

/// Damage a platoon actually takes from `damage` points of `class`.
pub fn convert(
    damage: u32,
    class: InfantryDamageClass,
    target: &DamageTarget,
    dice: &mut dyn Dice,
) -> u32 {
    let mut converted = class_damage(damage, class, dice);
    if target.mechanized {
        converted *= 2;
    }
    if target.in_building {
        converted = converted.div_ceil(2);
    }
    trace!(damage, ?class, converted, "infantry conversion");
    converted
}
