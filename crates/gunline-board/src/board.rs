//! The board and the oracle interface the resolution engine consumes.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::coord::HexCoord;
use crate::error::BoardError;
use crate::terrain::{Hex, HexFlags, SmokeDensity, Terrain};

/// Terrain collaborator used during attack resolution.
///
/// Queries are read-only. The three mutations are the only board changes an
/// attack may cause; each returns whether the board actually changed so the
/// caller can report it.
///
/// # Invariants
///
/// - Queries on off-board hexes answer as if the hex were empty clear ground
///   that cannot be changed.
/// - Mutations on off-board hexes return `false` and change nothing.
pub trait BoardOracle {
    /// Whether `hex` lies on the board.
    fn contains(&self, hex: HexCoord) -> bool;

    /// Base terrain at `hex`.
    fn terrain(&self, hex: HexCoord) -> Terrain;

    /// Whether a fire is burning at `hex`.
    fn is_on_fire(&self, hex: HexCoord) -> bool;

    /// Current smoke at `hex`.
    fn smoke(&self, hex: HexCoord) -> Option<SmokeDensity>;

    /// Starts a fire. Returns `true` if a new fire was started; terrain that
    /// cannot burn or is already burning returns `false`.
    fn ignite(&mut self, hex: HexCoord) -> bool;

    /// Puts a fire out. Returns `true` if there was a fire.
    fn extinguish(&mut self, hex: HexCoord) -> bool;

    /// Fills `hex` with smoke for `turns` turns. Denser smoke replaces
    /// lighter smoke; the longer duration wins. Returns `true` if the hex
    /// changed.
    fn deliver_smoke(&mut self, hex: HexCoord, density: SmokeDensity, turns: u8) -> bool;
}

/// Rectangular hex board.
///
/// Only hexes that differ from empty clear ground are stored. Storage is a
/// `BTreeMap` so iteration and hashing are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: u32,
    height: u32,
    hexes: BTreeMap<HexCoord, Hex>,
    seed: Option<u64>,
}

impl Board {
    /// An empty board of clear terrain.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            hexes: BTreeMap::new(),
            seed: None,
        }
    }

    /// A board with terrain scattered deterministically from `seed`.
    ///
    /// Roughly a third of hexes get woods, rough ground, water or a building.
    #[must_use]
    pub fn generate(width: u32, height: u32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut board = Self::new(width, height);
        board.seed = Some(seed);

        for col in 0..width {
            for row in 0..height {
                let terrain = match rng.gen_range(0..12u8) {
                    0 | 1 => Terrain::LightWoods,
                    2 => Terrain::HeavyWoods,
                    3 => Terrain::Rough,
                    4 if rng.gen_bool(0.5) => Terrain::Water,
                    5 if rng.gen_bool(0.3) => Terrain::Building {
                        cf: rng.gen_range(10..=90),
                    },
                    _ => continue,
                };
                let hex = HexCoord::new(col as i32, row as i32);
                board.hexes.insert(hex, Hex::of(terrain));
            }
        }
        board
    }

    /// Board width in hexes.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Board height in hexes.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Seed used by [`Board::generate`], if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The stored hex at `hex`, or a default clear hex.
    #[must_use]
    pub fn hex(&self, hex: HexCoord) -> Hex {
        self.hexes.get(&hex).copied().unwrap_or_default()
    }

    /// Iterates over all non-default hexes in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (&HexCoord, &Hex)> {
        self.hexes.iter()
    }

    /// Sets the base terrain of a hex.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OffBoard`] if `hex` is outside the board.
    pub fn set_terrain(&mut self, hex: HexCoord, terrain: Terrain) -> Result<(), BoardError> {
        if !self.contains(hex) {
            return Err(BoardError::OffBoard(hex, self.width, self.height));
        }
        self.hexes.entry(hex).or_default().terrain = terrain;
        Ok(())
    }

    /// Ages smoke by one turn, clearing hexes whose smoke runs out.
    pub fn advance_turn(&mut self) {
        for hex in self.hexes.values_mut() {
            if hex.smoke_turns > 0 {
                hex.smoke_turns -= 1;
                if hex.smoke_turns == 0 {
                    hex.flags
                        .remove(HexFlags::LIGHT_SMOKE | HexFlags::HEAVY_SMOKE);
                }
            }
        }
    }
}

impl BoardOracle for Board {
    fn contains(&self, hex: HexCoord) -> bool {
        hex.col >= 0
            && hex.row >= 0
            && (hex.col as u32) < self.width
            && (hex.row as u32) < self.height
    }

    fn terrain(&self, hex: HexCoord) -> Terrain {
        self.hex(hex).terrain
    }

    fn is_on_fire(&self, hex: HexCoord) -> bool {
        self.hex(hex).flags.contains(HexFlags::ON_FIRE)
    }

    fn smoke(&self, hex: HexCoord) -> Option<SmokeDensity> {
        self.hex(hex).smoke()
    }

    fn ignite(&mut self, hex: HexCoord) -> bool {
        if !self.contains(hex) || !self.terrain(hex).is_flammable() || self.is_on_fire(hex) {
            return false;
        }
        trace!(%hex, "fire started");
        self.hexes.entry(hex).or_default().flags.insert(HexFlags::ON_FIRE);
        true
    }

    fn extinguish(&mut self, hex: HexCoord) -> bool {
        match self.hexes.get_mut(&hex) {
            Some(h) if h.flags.contains(HexFlags::ON_FIRE) => {
                h.flags.remove(HexFlags::ON_FIRE);
                h.flags.insert(HexFlags::SCORCHED);
                trace!(%hex, "fire extinguished");
                true
            }
            _ => false,
        }
    }

    fn deliver_smoke(&mut self, hex: HexCoord, density: SmokeDensity, turns: u8) -> bool {
        if !self.contains(hex) || turns == 0 {
            return false;
        }
        let entry = self.hexes.entry(hex).or_default();
        let before = *entry;
        let current = entry.smoke();
        if current.map_or(true, |c| density >= c) {
            entry
                .flags
                .remove(HexFlags::LIGHT_SMOKE | HexFlags::HEAVY_SMOKE);
            entry.flags.insert(match density {
                SmokeDensity::Light => HexFlags::LIGHT_SMOKE,
                SmokeDensity::Heavy => HexFlags::HEAVY_SMOKE,
            });
        }
        entry.smoke_turns = entry.smoke_turns.max(turns);
        *entry != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod query_tests {
        use super::*;

        #[test]
        fn contains_respects_bounds() {
            let board = Board::new(4, 3);
            assert!(board.contains(HexCoord::new(0, 0)));
            assert!(board.contains(HexCoord::new(3, 2)));
            assert!(!board.contains(HexCoord::new(4, 0)));
            assert!(!board.contains(HexCoord::new(0, 3)));
            assert!(!board.contains(HexCoord::new(-1, 0)));
        }

        #[test]
        fn unknown_hex_is_clear() {
            let board = Board::new(4, 4);
            assert_eq!(board.terrain(HexCoord::new(1, 1)), Terrain::Clear);
            assert!(!board.is_on_fire(HexCoord::new(1, 1)));
            assert_eq!(board.smoke(HexCoord::new(1, 1)), None);
        }

        #[test]
        fn set_terrain_off_board_fails() {
            let mut board = Board::new(4, 4);
            let err = board
                .set_terrain(HexCoord::new(9, 9), Terrain::Water)
                .unwrap_err();
            assert_eq!(err, BoardError::OffBoard(HexCoord::new(9, 9), 4, 4));
        }
    }

    mod fire_tests {
        use super::*;

        #[test]
        fn ignite_woods() {
            let mut board = Board::new(8, 8);
            let hex = HexCoord::new(2, 2);
            board.set_terrain(hex, Terrain::LightWoods).unwrap();
            assert!(board.ignite(hex));
            assert!(board.is_on_fire(hex));
            // Already burning
            assert!(!board.ignite(hex));
        }

        #[test]
        fn clear_ground_does_not_burn() {
            let mut board = Board::new(8, 8);
            assert!(!board.ignite(HexCoord::new(2, 2)));
        }

        #[test]
        fn extinguish_leaves_scorch() {
            let mut board = Board::new(8, 8);
            let hex = HexCoord::new(2, 2);
            board.set_terrain(hex, Terrain::HeavyWoods).unwrap();
            board.ignite(hex);
            assert!(board.extinguish(hex));
            assert!(!board.is_on_fire(hex));
            assert!(board.hex(hex).flags.contains(HexFlags::SCORCHED));
            assert!(!board.extinguish(hex));
        }
    }

    mod smoke_tests {
        use super::*;

        #[test]
        fn heavy_replaces_light() {
            let mut board = Board::new(8, 8);
            let hex = HexCoord::new(1, 1);
            assert!(board.deliver_smoke(hex, SmokeDensity::Light, 2));
            assert!(board.deliver_smoke(hex, SmokeDensity::Heavy, 1));
            assert_eq!(board.smoke(hex), Some(SmokeDensity::Heavy));
            assert_eq!(board.hex(hex).smoke_turns, 2);
        }

        #[test]
        fn light_does_not_thin_heavy() {
            let mut board = Board::new(8, 8);
            let hex = HexCoord::new(1, 1);
            board.deliver_smoke(hex, SmokeDensity::Heavy, 3);
            assert!(!board.deliver_smoke(hex, SmokeDensity::Light, 1));
            assert_eq!(board.smoke(hex), Some(SmokeDensity::Heavy));
        }

        #[test]
        fn smoke_decays() {
            let mut board = Board::new(8, 8);
            let hex = HexCoord::new(1, 1);
            board.deliver_smoke(hex, SmokeDensity::Light, 1);
            board.advance_turn();
            assert_eq!(board.smoke(hex), None);
        }

        #[test]
        fn off_board_smoke_is_ignored() {
            let mut board = Board::new(8, 8);
            assert!(!board.deliver_smoke(HexCoord::new(-1, 3), SmokeDensity::Heavy, 3));
        }
    }

    mod generate_tests {
        use super::*;

        #[test]
        fn same_seed_same_board() {
            assert_eq!(Board::generate(16, 17, 7), Board::generate(16, 17, 7));
        }

        #[test]
        fn generated_hexes_stay_on_board() {
            let board = Board::generate(10, 12, 99);
            assert!(board.iter().all(|(c, _)| board.contains(*c)));
            assert_eq!(board.seed(), Some(99));
        }
    }
}
