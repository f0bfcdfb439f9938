//! Shared game state the resolution engine reads and mutates.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use gunline_board::{hash_board_into, Board};
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::attack::AttackId;

/// Battlefield conditions that change how effects resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Environment {
    /// No atmosphere: nothing ignites.
    pub vacuum: bool,
    /// Current game turn.
    pub turn: u32,
}

/// Roster, board and environment.
///
/// Attacks resolve against `&mut GameState` one at a time; later attacks
/// see what earlier attacks changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// All units.
    pub arena: Arena,
    /// The map.
    pub board: Board,
    /// Battlefield conditions.
    pub environment: Environment,
    /// Attacks already resolved against this state.
    #[serde(default)]
    resolved: BTreeSet<AttackId>,
}

impl GameState {
    /// A state with an empty roster on `board`.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            arena: Arena::new(),
            board,
            environment: Environment::default(),
            resolved: BTreeSet::new(),
        }
    }

    /// Records `id` as resolved. Returns `false` if it already was.
    pub fn mark_resolved(&mut self, id: AttackId) -> bool {
        self.resolved.insert(id)
    }

    /// Whether `id` has been resolved against this state.
    #[must_use]
    pub fn is_resolved(&self, id: AttackId) -> bool {
        self.resolved.contains(&id)
    }

    /// Deterministic digest of the whole state.
    ///
    /// Used by replay tests: identical inputs and dice must produce identical
    /// digests.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.arena.hash(&mut hasher);
        self.environment.hash(&mut hasher);
        self.resolved.hash(&mut hasher);
        hash_board_into(&self.board, &mut hasher);
        hasher.finish()
    }
}
