//! # Gunline Board
//!
//! Hex board substrate for weapon-attack resolution.
//!
//! The board is the terrain collaborator the resolution engine talks to. It
//! answers read-only queries (what terrain is here, is it burning, is it on
//! the map) and accepts a small set of explicit mutations (ignite,
//! extinguish, deliver smoke). It knows nothing about units or weapons.
//!
//! - **Coordinates**: flat-topped hexes in odd-q offset layout ([`HexCoord`])
//! - **Terrain**: ignition numbers and hex conditions ([`Terrain`], [`HexFlags`])
//! - **Blasts**: ring geometry for area-effect weapons ([`BlastPattern`])
//! - **Hashing**: deterministic state digests for replay checks
//!
//! ## Quick Start
//!
//! ```
//! use gunline_board::{Board, BoardOracle, HexCoord, SmokeDensity, Terrain};
//!
//! let mut board = Board::new(16, 17);
//! let hex = HexCoord::new(4, 5);
//! board.set_terrain(hex, Terrain::HeavyWoods).unwrap();
//!
//! assert!(board.ignite(hex));
//! assert!(board.is_on_fire(hex));
//!
//! board.deliver_smoke(hex, SmokeDensity::Heavy, 3);
//! assert_eq!(board.smoke(hex), Some(SmokeDensity::Heavy));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blast;
pub mod board;
pub mod coord;
pub mod error;
pub mod hash;
pub mod terrain;

// Re-exports for convenience
pub use blast::BlastPattern;
pub use board::{Board, BoardOracle};
pub use coord::{Direction, HexCoord};
pub use error::BoardError;
pub use hash::{hash_board, hash_board_into};
pub use terrain::{Hex, HexFlags, SmokeDensity, Terrain};
