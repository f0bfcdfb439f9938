//! Hit-location tables.

use tracing::trace;

use crate::config::RulesConfig;
use crate::dice::Dice;
use crate::entity::{Location, Unit, UnitKind};
use crate::report::{MessageId, ReportEntry};
use crate::resolver::registry::LocationRule;
use crate::to_hit::HitSide;

use Location as L;

/// 2d6 tables indexed by `roll - 2`.
type Table = [Location; 11];

const MEK_FRONT: Table = [L::CenterTorso, L::RightArm, L::RightArm, L::RightLeg, L::RightTorso, L::CenterTorso, L::LeftTorso, L::LeftLeg, L::LeftArm, L::LeftArm, L::Head];
const MEK_LEFT: Table = [L::LeftTorso, L::LeftLeg, L::LeftArm, L::LeftArm, L::LeftLeg, L::LeftTorso, L::CenterTorso, L::RightTorso, L::RightArm, L::RightLeg, L::Head];
const MEK_RIGHT: Table = [L::RightTorso, L::RightLeg, L::RightArm, L::RightArm, L::RightLeg, L::RightTorso, L::CenterTorso, L::LeftTorso, L::LeftArm, L::LeftLeg, L::Head];

const VEHICLE_FRONT: Table = [L::Front, L::Front, L::Front, L::Right, L::Front, L::Front, L::Front, L::Left, L::Turret, L::Turret, L::Turret];
const VEHICLE_LEFT: Table = [L::Left, L::Left, L::Left, L::Front, L::Left, L::Left, L::Left, L::Rear, L::Turret, L::Turret, L::Turret];
const VEHICLE_RIGHT: Table = [L::Right, L::Right, L::Right, L::Rear, L::Right, L::Right, L::Right, L::Front, L::Turret, L::Turret, L::Turret];
const VEHICLE_REAR: Table = [L::Rear, L::Rear, L::Rear, L::Left, L::Rear, L::Rear, L::Rear, L::Right, L::Turret, L::Turret, L::Turret];

const AERO_NOSE: Table = [L::Nose, L::RightWing, L::RightWing, L::Nose, L::Nose, L::Nose, L::Nose, L::Nose, L::LeftWing, L::LeftWing, L::Nose];
const AERO_LEFT: Table = [L::Nose, L::LeftWing, L::LeftWing, L::Nose, L::LeftWing, L::LeftWing, L::LeftWing, L::Aft, L::Aft, L::LeftWing, L::Nose];
const AERO_RIGHT: Table = [L::Nose, L::RightWing, L::RightWing, L::Nose, L::RightWing, L::RightWing, L::RightWing, L::Aft, L::Aft, L::RightWing, L::Nose];
const AERO_AFT: Table = [L::Aft, L::RightWing, L::RightWing, L::Aft, L::Aft, L::Aft, L::Aft, L::Aft, L::LeftWing, L::LeftWing, L::Aft];

/// Battle Armor trooper rerolls before falling back to the first survivor.
const TROOPER_REROLLS: u32 = 5;

/// A chosen hit location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitLocation {
    /// Location struck.
    pub location: Location,
    /// Strikes rear armor.
    pub rear: bool,
    /// A natural 2 on a Mek table: roll for a critical through armor.
    pub through_armor: bool,
}

impl HitLocation {
    fn at(location: Location) -> Self {
        Self {
            location,
            rear: false,
            through_armor: false,
        }
    }
}

/// Chooses where one group of hits lands.
///
/// Returns `None` only for a unit with nothing left to hit.
pub fn choose(
    unit: &Unit,
    side: HitSide,
    rule: LocationRule,
    designated: Option<Location>,
    rules: &RulesConfig,
    dice: &mut dyn Dice,
    entries: &mut Vec<ReportEntry>,
) -> Option<HitLocation> {
    let chosen = match (unit.kind(), rule) {
        (_, LocationRule::Designated) if designated.is_some_and(|l| unit.location(l).is_some()) => {
            designated.map(HitLocation::at)
        }
        (UnitKind::Mek, LocationRule::LegTable) => Some(leg(unit, dice, entries)),
        (UnitKind::Mek, _) => Some(mek(side, rules, dice)),
        (UnitKind::Vehicle, _) => Some(vehicle(unit, side, dice)),
        (UnitKind::Aerospace, _) => Some(HitLocation::at(aerospace(side, dice))),
        (UnitKind::ConventionalInfantry, _) => Some(HitLocation::at(Location::Platoon)),
        (UnitKind::BattleArmor, _) => trooper(unit, dice).map(HitLocation::at),
    };
    trace!(?chosen, "hit location");
    chosen
}

fn table_roll(table: &Table, dice: &mut dyn Dice) -> (Location, u32) {
    let roll = dice.roll_2d6().clamp(2, 12);
    (table[(roll - 2) as usize], roll)
}

fn mek(side: HitSide, rules: &RulesConfig, dice: &mut dyn Dice) -> HitLocation {
    let table = match side {
        HitSide::Front | HitSide::Rear => &MEK_FRONT,
        HitSide::Left => &MEK_LEFT,
        HitSide::Right => &MEK_RIGHT,
    };
    let (location, roll) = table_roll(table, dice);
    HitLocation {
        location,
        rear: side == HitSide::Rear && location.has_rear_armor(),
        through_armor: roll == 2 && rules.floating_crits,
    }
}

fn leg(unit: &Unit, dice: &mut dyn Dice, entries: &mut Vec<ReportEntry>) -> HitLocation {
    let rolled = if dice.roll_d6(1) <= 3 {
        Location::RightLeg
    } else {
        Location::LeftLeg
    };
    let other = if rolled == Location::RightLeg {
        Location::LeftLeg
    } else {
        Location::RightLeg
    };
    if !unit.has_intact(rolled) && unit.has_intact(other) {
        entries.push(
            ReportEntry::new(MessageId::LegRetargeted)
                .subject(unit.id())
                .param(rolled)
                .param(other)
                .indent(1),
        );
        return HitLocation::at(other);
    }
    HitLocation::at(rolled)
}

fn vehicle(unit: &Unit, side: HitSide, dice: &mut dyn Dice) -> HitLocation {
    let table = match side {
        HitSide::Front => &VEHICLE_FRONT,
        HitSide::Left => &VEHICLE_LEFT,
        HitSide::Right => &VEHICLE_RIGHT,
        HitSide::Rear => &VEHICLE_REAR,
    };
    let (location, _) = table_roll(table, dice);
    // a missing turret falls through to the side facing the attacker
    if location == Location::Turret && !unit.has_intact(Location::Turret) {
        return HitLocation::at(table[5]);
    }
    HitLocation::at(location)
}

fn aerospace(side: HitSide, dice: &mut dyn Dice) -> Location {
    let table = match side {
        HitSide::Front => &AERO_NOSE,
        HitSide::Left => &AERO_LEFT,
        HitSide::Right => &AERO_RIGHT,
        HitSide::Rear => &AERO_AFT,
    };
    table_roll(table, dice).0
}

fn trooper(unit: &Unit, dice: &mut dyn Dice) -> Option<Location> {
    let survivors = unit.surviving_troopers();
    let first = *survivors.first()?;
    if survivors.len() == 1 {
        return Some(first);
    }
    for _ in 0..TROOPER_REROLLS {
        let n = u8::try_from(dice.roll_d6(1)).unwrap_or(1);
        if survivors.contains(&Location::Trooper(n)) {
            return Some(Location::Trooper(n));
        }
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::entity::LocationState;

    fn pick(unit: &Unit, side: HitSide, rule: LocationRule, faces: &[u32]) -> (Option<HitLocation>, Vec<ReportEntry>) {
        let mut dice = ScriptedDice::new(faces.iter().copied());
        let mut entries = Vec::new();
        let hit = choose(unit, side, rule, None, &RulesConfig::default(), &mut dice, &mut entries);
        assert!(dice.is_exhausted());
        (hit, entries)
    }

    mod mek_tests {
        use super::*;

        #[test]
        fn front_table() {
            let mek = Unit::new(UnitKind::Mek, "M");
            let (hit, _) = pick(&mek, HitSide::Front, LocationRule::Rolled, &[3, 4]);
            assert_eq!(hit.unwrap().location, Location::CenterTorso);
            let (hit, _) = pick(&mek, HitSide::Front, LocationRule::Rolled, &[6, 6]);
            assert_eq!(hit.unwrap().location, Location::Head);
        }

        #[test]
        fn natural_two_floats_a_critical() {
            let mek = Unit::new(UnitKind::Mek, "M");
            let (hit, _) = pick(&mek, HitSide::Left, LocationRule::Rolled, &[1, 1]);
            let hit = hit.unwrap();
            assert_eq!(hit.location, Location::LeftTorso);
            assert!(hit.through_armor);
        }

        #[test]
        fn no_floating_crit_without_the_rule() {
            let mek = Unit::new(UnitKind::Mek, "M");
            let mut dice = ScriptedDice::new([1, 1]);
            let rules = RulesConfig {
                floating_crits: false,
                ..RulesConfig::default()
            };
            let hit = choose(&mek, HitSide::Front, LocationRule::Rolled, None, &rules, &mut dice, &mut Vec::new());
            assert!(!hit.unwrap().through_armor);
        }

        #[test]
        fn rear_hits_torso_rear_armor_only() {
            let mek = Unit::new(UnitKind::Mek, "M");
            let (hit, _) = pick(&mek, HitSide::Rear, LocationRule::Rolled, &[3, 3]);
            assert!(hit.unwrap().rear);
            let (hit, _) = pick(&mek, HitSide::Rear, LocationRule::Rolled, &[5, 5]);
            let hit = hit.unwrap();
            assert_eq!(hit.location, Location::LeftArm);
            assert!(!hit.rear);
        }

        #[test]
        fn leg_table_retargets() {
            let mek = Unit::new(UnitKind::Mek, "M").with_location(
                Location::RightLeg,
                LocationState {
                    destroyed: true,
                    ..LocationState::new(0, 0)
                },
            );
            let (hit, entries) = pick(&mek, HitSide::Front, LocationRule::LegTable, &[2]);
            assert_eq!(hit.unwrap().location, Location::LeftLeg);
            assert_eq!(entries[0].message, MessageId::LegRetargeted);
        }

        #[test]
        fn designated_skips_the_roll() {
            let mek = Unit::new(UnitKind::Mek, "M");
            let mut dice = ScriptedDice::default();
            let hit = choose(
                &mek,
                HitSide::Front,
                LocationRule::Designated,
                Some(Location::LeftLeg),
                &RulesConfig::default(),
                &mut dice,
                &mut Vec::new(),
            );
            assert_eq!(hit.unwrap().location, Location::LeftLeg);
        }
    }

    mod other_kind_tests {
        use super::*;

        #[test]
        fn missing_turret_falls_to_side() {
            let tank = Unit::new(UnitKind::Vehicle, "T").with_location(
                Location::Turret,
                LocationState {
                    destroyed: true,
                    ..LocationState::new(0, 0)
                },
            );
            let (hit, _) = pick(&tank, HitSide::Left, LocationRule::Rolled, &[6, 5]);
            assert_eq!(hit.unwrap().location, Location::Left);
        }

        #[test]
        fn turretless_vehicle_falls_to_front() {
            let tank = Unit::new(UnitKind::Vehicle, "T").without_location(Location::Turret);
            let (hit, _) = pick(&tank, HitSide::Front, LocationRule::Rolled, &[6, 6]);
            assert_eq!(hit.unwrap().location, Location::Front);
        }

        #[test]
        fn infantry_is_always_platoon() {
            let inf = Unit::new(UnitKind::ConventionalInfantry, "I");
            let (hit, _) = pick(&inf, HitSide::Rear, LocationRule::Rolled, &[]);
            assert_eq!(hit.unwrap().location, Location::Platoon);
        }

        #[test]
        fn battle_armor_rerolls_dead_troopers() {
            let ba = Unit::new(UnitKind::BattleArmor, "BA").with_troopers(3, 5);
            let (hit, _) = pick(&ba, HitSide::Front, LocationRule::Rolled, &[6, 2]);
            assert_eq!(hit.unwrap().location, Location::Trooper(2));
        }

        #[test]
        fn battle_armor_falls_back_to_first_survivor() {
            let ba = Unit::new(UnitKind::BattleArmor, "BA").with_troopers(2, 5);
            let (hit, _) = pick(&ba, HitSide::Front, LocationRule::Rolled, &[6, 6, 6, 6, 6]);
            assert_eq!(hit.unwrap().location, Location::Trooper(1));
        }

        #[test]
        fn aerospace_aft() {
            let fighter = Unit::new(UnitKind::Aerospace, "F");
            let (hit, _) = pick(&fighter, HitSide::Rear, LocationRule::Rolled, &[3, 4]);
            assert_eq!(hit.unwrap().location, Location::Aft);
        }
    }
}
