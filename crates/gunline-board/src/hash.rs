//! State hashing for determinism verification.
//!
//! Two boards that went through identical operations must produce identical
//! hashes. Replays compare these digests instead of whole boards.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::board::Board;

/// Compute a deterministic hash of board state.
///
/// Includes dimensions, the generation seed and every stored hex in
/// coordinate order.
#[must_use]
pub fn hash_board(board: &Board) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_board_into(board, &mut hasher);
    hasher.finish()
}

/// Feed board state into an existing hasher.
///
/// Lets a caller fold the board into a larger state digest.
pub fn hash_board_into<H: Hasher>(board: &Board, hasher: &mut H) {
    board.width().hash(hasher);
    board.height().hash(hasher);
    board.seed().hash(hasher);
    for (coord, hex) in board.iter() {
        coord.hash(hasher);
        hex.hash(hasher);
    }
}
