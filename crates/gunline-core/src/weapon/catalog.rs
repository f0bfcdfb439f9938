//! Rule-book weapons.
//!
//! A small reference catalog used by tests, benches and examples. Loading
//! full equipment data is the host application's job.

use super::{AmmoFamily, InfantryDamageClass, WeaponCategory, WeaponSpec};

/// Medium laser: 5 damage, 3 heat.
#[must_use]
pub fn medium_laser() -> WeaponSpec {
    WeaponSpec::new("Medium Laser", WeaponCategory::Energy, 5, 3)
}

/// Large laser: 8 damage, 8 heat.
#[must_use]
pub fn large_laser() -> WeaponSpec {
    WeaponSpec::new("Large Laser", WeaponCategory::Energy, 8, 8)
}

/// Particle projector cannon: 10 damage, 10 heat.
#[must_use]
pub fn ppc() -> WeaponSpec {
    WeaponSpec::new("PPC", WeaponCategory::Energy, 10, 10)
}

/// Medium pulse laser.
#[must_use]
pub fn medium_pulse_laser() -> WeaponSpec {
    WeaponSpec::new("Medium Pulse Laser", WeaponCategory::Pulse, 6, 4)
        .with_infantry_class(InfantryDamageClass::Pulse)
}

/// Medium variable-speed pulse laser. Damage drops with each range band.
#[must_use]
pub fn medium_vsp_laser() -> WeaponSpec {
    let mut spec = WeaponSpec::new(
        "Medium VSP Laser",
        WeaponCategory::VariableSpeedPulse,
        7,
        7,
    )
    .with_infantry_class(InfantryDamageClass::Pulse);
    spec.damage_by_range = Some([7, 5, 3, 2]);
    spec
}

/// Flamer.
#[must_use]
pub fn flamer() -> WeaponSpec {
    WeaponSpec::new("Flamer", WeaponCategory::Flamer, 2, 3)
        .with_infantry_class(InfantryDamageClass::Burst2D6)
}

/// Autocannon/5.
#[must_use]
pub fn ac5() -> WeaponSpec {
    WeaponSpec::new("AC/5", WeaponCategory::Autocannon, 5, 1).with_ammo(AmmoFamily::Autocannon(5))
}

/// Autocannon/10.
#[must_use]
pub fn ac10() -> WeaponSpec {
    WeaponSpec::new("AC/10", WeaponCategory::Autocannon, 10, 3)
        .with_ammo(AmmoFamily::Autocannon(10))
}

/// Ultra AC/5.
#[must_use]
pub fn ultra_ac5() -> WeaponSpec {
    WeaponSpec::new("Ultra AC/5", WeaponCategory::UltraAutocannon, 5, 1)
        .with_ammo(AmmoFamily::Ultra(5))
}

/// Rotary AC/5.
#[must_use]
pub fn rotary_ac5() -> WeaponSpec {
    WeaponSpec::new("Rotary AC/5", WeaponCategory::RotaryAutocannon, 5, 1)
        .with_ammo(AmmoFamily::Rotary(5))
}

/// LB 10-X autocannon. Fires a single slug or 10 cluster pellets.
#[must_use]
pub fn lb10x_ac() -> WeaponSpec {
    WeaponSpec::new("LB 10-X AC", WeaponCategory::LbxAutocannon, 10, 2)
        .with_ammo(AmmoFamily::Lbx(10))
        .with_rack(10)
}

/// Gauss rifle.
#[must_use]
pub fn gauss_rifle() -> WeaponSpec {
    WeaponSpec::new("Gauss Rifle", WeaponCategory::Gauss, 15, 1).with_ammo(AmmoFamily::Gauss)
}

/// Hyper-assault Gauss rifle 20.
#[must_use]
pub fn hag20() -> WeaponSpec {
    WeaponSpec::new("HAG/20", WeaponCategory::HyperAssaultGauss, 1, 4)
        .with_ammo(AmmoFamily::Hag(20))
        .with_rack(20)
        .with_infantry_class(InfantryDamageClass::ClusterBallistic)
}

/// LRM rack of the given size.
#[must_use]
pub fn lrm(rack: u8) -> WeaponSpec {
    let heat = match rack {
        0..=5 => 2,
        6..=10 => 4,
        11..=15 => 5,
        _ => 6,
    };
    WeaponSpec::new(&format!("LRM {rack}"), WeaponCategory::Lrm, 1, heat)
        .with_ammo(AmmoFamily::Lrm(rack))
        .with_rack(u32::from(rack))
        .with_infantry_class(InfantryDamageClass::ClusterMissile)
}

/// SRM rack of the given size.
#[must_use]
pub fn srm(rack: u8) -> WeaponSpec {
    let heat = match rack {
        0..=2 => 2,
        3..=4 => 3,
        _ => 4,
    };
    WeaponSpec::new(&format!("SRM {rack}"), WeaponCategory::Srm, 2, heat)
        .with_ammo(AmmoFamily::Srm(rack))
        .with_rack(u32::from(rack))
        .with_infantry_class(InfantryDamageClass::ClusterMissile)
}

/// Streak SRM rack of the given size.
#[must_use]
pub fn streak_srm(rack: u8) -> WeaponSpec {
    WeaponSpec::new(
        &format!("Streak SRM {rack}"),
        WeaponCategory::StreakSrm,
        2,
        u32::from(rack).div_ceil(2).max(2),
    )
    .with_ammo(AmmoFamily::StreakSrm(rack))
    .with_rack(u32::from(rack))
    .with_infantry_class(InfantryDamageClass::ClusterMissile)
}

/// MRM rack of the given size.
#[must_use]
pub fn mrm(rack: u8) -> WeaponSpec {
    WeaponSpec::new(
        &format!("MRM {rack}"),
        WeaponCategory::Mrm,
        1,
        u32::from(rack) / 5,
    )
    .with_ammo(AmmoFamily::Mrm(rack))
    .with_rack(u32::from(rack))
    .with_infantry_class(InfantryDamageClass::ClusterMissile)
}

/// EMP cannon. Deals no damage; rolls for shutdown.
#[must_use]
pub fn emp_cannon() -> WeaponSpec {
    WeaponSpec::new("EMP Cannon", WeaponCategory::Emp, 0, 10)
}

/// A mine charge dealing `damage` to the designated location.
#[must_use]
pub fn mine(damage: u32) -> WeaponSpec {
    WeaponSpec::new("Mine", WeaponCategory::Mine, damage, 0).with_ammo(AmmoFamily::Mine)
}

/// Battle Armor leg attack.
#[must_use]
pub fn leg_attack() -> WeaponSpec {
    WeaponSpec::new("Leg Attack", WeaponCategory::LegAttack, 4, 0)
}

/// Arrow IV artillery missile: 20 in the impact hex, 10 adjacent.
#[must_use]
pub fn arrow_iv() -> WeaponSpec {
    let mut spec =
        WeaponSpec::new("Arrow IV", WeaponCategory::Artillery, 20, 10).with_ammo(AmmoFamily::ArrowIv);
    spec.splash = 10;
    spec
}

/// Target acquisition gear.
#[must_use]
pub fn tag() -> WeaponSpec {
    WeaponSpec::new("TAG", WeaponCategory::Tag, 0, 0)
}

/// Narc missile beacon.
#[must_use]
pub fn narc() -> WeaponSpec {
    WeaponSpec::new("Narc Beacon", WeaponCategory::Narc, 0, 0).with_ammo(AmmoFamily::Narc)
}

/// Grappling claw.
#[must_use]
pub fn grapple() -> WeaponSpec {
    WeaponSpec::new("Grapple", WeaponCategory::Grapple, 0, 0)
}

/// Battle Armor swarm attack.
#[must_use]
pub fn swarm() -> WeaponSpec {
    WeaponSpec::new("Swarm", WeaponCategory::Swarm, 0, 0)
}

/// Fluid gun.
#[must_use]
pub fn fluid_gun() -> WeaponSpec {
    WeaponSpec::new("Fluid Gun", WeaponCategory::FluidGun, 0, 0).with_ammo(AmmoFamily::FluidGun)
}

/// Bay-level data for a bay of energy weapons. Members carry the damage.
#[must_use]
pub fn laser_bay() -> WeaponSpec {
    WeaponSpec::new("Laser Bay", WeaponCategory::Bay, 0, 0)
}

/// Bay-level data for a bay of LRM 20 racks sharing ammo. Members carry
/// their bay attack value as damage.
#[must_use]
pub fn lrm_bay() -> WeaponSpec {
    WeaponSpec::new("LRM 20 Bay", WeaponCategory::Bay, 0, 0).with_ammo(AmmoFamily::Lrm(20))
}

/// Bay-level data for a bay of LB 10-X autocannons.
#[must_use]
pub fn lbx_bay() -> WeaponSpec {
    WeaponSpec::new("LB 10-X Bay", WeaponCategory::Bay, 0, 0).with_ammo(AmmoFamily::Lbx(10))
}
