//! Test helper functions for setting up duels and inspecting the result.

use gunline_board::{Board, HexCoord};

use crate::config::RulesConfig;
use crate::entity::{BinId, EntityId, Location, MountId, Unit, UnitKind};
use crate::game::GameState;
use crate::resolver::{AttackResolver, Resolution};
use crate::weapon::{Munition, WeaponSpec};

// =============================================================================
// Scenario Setup
// =============================================================================

/// One attacker and one target on an open 16x17 board.
pub struct Duel {
    /// Shared state.
    pub state: GameState,
    /// Attacking Mek at (2, 2).
    pub attacker: EntityId,
    /// Target at (6, 6).
    pub target: EntityId,
}

/// Routes `tracing` output through the test harness. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// A Mek attacker facing a target of `kind`.
pub fn duel(kind: UnitKind) -> Duel {
    init_tracing();
    let mut state = GameState::new(Board::new(16, 17));
    let attacker = state
        .arena
        .spawn(Unit::new(UnitKind::Mek, "Attacker").at(HexCoord::new(2, 2)));
    let target = state
        .arena
        .spawn(Unit::new(kind, "Target").at(HexCoord::new(6, 6)));
    Duel {
        state,
        attacker,
        target,
    }
}

/// Resolver over the rule-book registry.
pub fn resolver(rules: RulesConfig) -> AttackResolver {
    AttackResolver::standard(rules).expect("rule-book registry is total")
}

// =============================================================================
// Loadout
// =============================================================================

fn unit_mut(state: &mut GameState, id: EntityId) -> &mut Unit {
    state.arena.get_mut(id).expect("unit exists")
}

/// Mounts a weapon that needs no ammo.
pub fn arm(state: &mut GameState, unit: EntityId, spec: WeaponSpec, location: Location) -> MountId {
    unit_mut(state, unit).add_mount(spec, location)
}

/// Mounts an ammo weapon with one linked standard bin of `shots` rounds.
pub fn arm_with_ammo(
    state: &mut GameState,
    unit: EntityId,
    spec: WeaponSpec,
    shots: u32,
    location: Location,
) -> (MountId, BinId) {
    let family = spec.ammo.expect("weapon uses ammo");
    let per_shot = spec.damage.max(1);
    let u = unit_mut(state, unit);
    let mount = u.add_mount(spec, location);
    let bin = u.add_bin(family, Munition::Standard, shots, per_shot, location);
    u.link_ammo(mount, bin);
    (mount, bin)
}

// =============================================================================
// Inspection
// =============================================================================

/// A copy of the unit as it is now.
pub fn snapshot(state: &GameState, id: EntityId) -> Unit {
    state.arena.get(id).expect("unit exists").clone()
}

/// Rounds left across every bin the unit carries.
pub fn rounds(state: &GameState, id: EntityId) -> u32 {
    state
        .arena
        .get(id)
        .expect("unit exists")
        .bins()
        .map(|b| b.shots)
        .sum()
}

/// Armor plus structure left across the unit.
pub fn durability(state: &GameState, id: EntityId) -> u32 {
    state.arena.get(id).expect("unit exists").total_durability()
}

/// Armor left at one location.
pub fn armor(state: &GameState, id: EntityId, location: Location) -> u32 {
    state
        .arena
        .get(id)
        .and_then(|u| u.location(location))
        .map(|l| l.armor)
        .expect("location exists")
}

/// Serialized resolutions, for byte-for-byte comparison.
pub fn to_json(resolutions: &[Resolution]) -> String {
    serde_json::to_string(resolutions).expect("resolutions serialize")
}
