//! Arena module: the unit roster.
//!
//! The Arena holds every unit taking part in a battle. It provides:
//! - Unit storage with deterministic iteration order (`BTreeMap`)
//! - Occupancy queries by hex
//! - Unit lifecycle (spawn/despawn)
//!
//! Entity IDs are monotonically increasing, and the `BTreeMap`'s natural
//! ordering guarantees consistent iteration across platforms. Area attacks
//! that hit every occupant of a hex rely on this order.
//!
//! # Example
//!
//! ```
//! use gunline_board::HexCoord;
//! use gunline_core::arena::Arena;
//! use gunline_core::entity::{Unit, UnitKind};
//!
//! let mut arena = Arena::new();
//! let a = arena.spawn(Unit::new(UnitKind::Mek, "Atlas").at(HexCoord::new(3, 3)));
//! let b = arena.spawn(Unit::new(UnitKind::Vehicle, "Demolisher").at(HexCoord::new(3, 3)));
//!
//! assert_eq!(arena.units_at(HexCoord::new(3, 3)), vec![a, b]);
//! ```

use std::collections::BTreeMap;

use gunline_board::HexCoord;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Unit};

/// Roster of all units in a battle.
///
/// # Determinism
///
/// Storage is a `BTreeMap` keyed by [`EntityId`]; iterating always yields
/// units in id order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Unit storage with deterministic iteration order.
    units: BTreeMap<EntityId, Unit>,
}

impl Arena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            units: BTreeMap::new(),
        }
    }

    /// Adds a unit and assigns it a fresh id.
    ///
    /// # Returns
    ///
    /// The unique ID assigned to the unit.
    pub fn spawn(&mut self, mut unit: Unit) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        unit.set_id(id);
        self.units.insert(id, unit);
        id
    }

    /// Removes a unit from the arena.
    ///
    /// Destroyed units normally stay in the roster flagged as destroyed;
    /// despawning is for units leaving the battle entirely.
    pub fn despawn(&mut self, id: EntityId) -> Option<Unit> {
        self.units.remove(&id)
    }

    /// Returns a unit by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Returns a unit by ID, mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Unit IDs in deterministic (sorted) order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.units.keys().copied()
    }

    /// Units in deterministic (sorted by ID) order.
    pub fn units_sorted(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.values()
    }

    /// IDs of every non-destroyed unit standing in `hex`, sorted.
    #[must_use]
    pub fn units_at(&self, hex: HexCoord) -> Vec<EntityId> {
        self.units
            .values()
            .filter(|u| u.position == hex && !u.is_destroyed())
            .map(Unit::id)
            .collect()
    }

    /// Returns the number of units in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.units.len()
    }

    /// Returns true if the arena has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
