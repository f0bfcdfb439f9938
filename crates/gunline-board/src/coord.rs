//! Hex coordinates and directions.
//!
//! Hexes are flat-topped and addressed by `(col, row)` in odd-q offset layout:
//! odd columns are shifted half a hex down. Distance and neighbour math is
//! done in cube space and converted back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six hex-side directions, clockwise from north.
///
/// The discriminant matches the scatter die: a d6 face `n` maps to
/// `Direction::from_d6(n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Straight up the map.
    North = 0,
    /// Upper right.
    NorthEast = 1,
    /// Lower right.
    SouthEast = 2,
    /// Straight down the map.
    South = 3,
    /// Lower left.
    SouthWest = 4,
    /// Upper left.
    NorthWest = 5,
}

impl Direction {
    /// All directions in clockwise order.
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// Maps a d6 face (1-6) onto a direction. Faces outside the range wrap.
    #[must_use]
    pub fn from_d6(face: u32) -> Self {
        Self::ALL[((face.max(1) - 1) % 6) as usize]
    }

    /// Cube-space step for this direction as `(x, y, z)`.
    #[must_use]
    const fn cube_step(self) -> (i32, i32, i32) {
        match self {
            Direction::North => (0, 1, -1),
            Direction::NorthEast => (1, 0, -1),
            Direction::SouthEast => (1, -1, 0),
            Direction::South => (0, -1, 1),
            Direction::SouthWest => (-1, 0, 1),
            Direction::NorthWest => (-1, 1, 0),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub fn opposite(self) -> Self {
        Self::ALL[(self as usize + 3) % 6]
    }
}

/// A hex address on the board.
///
/// Coordinates are signed so that scatter can land off the map; use
/// [`crate::BoardOracle::contains`] to check.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    /// Column (x).
    pub col: i32,
    /// Row (y).
    pub row: i32,
}

impl HexCoord {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    fn to_cube(self) -> (i32, i32, i32) {
        let x = self.col;
        let z = self.row - (self.col - (self.col & 1)) / 2;
        (x, -x - z, z)
    }

    fn from_cube(x: i32, z: i32) -> Self {
        Self {
            col: x,
            row: z + (x - (x & 1)) / 2,
        }
    }

    /// Hex distance between two coordinates.
    #[must_use]
    pub fn distance(self, other: HexCoord) -> u32 {
        let (ax, ay, az) = self.to_cube();
        let (bx, by, bz) = other.to_cube();
        let d = (ax - bx).abs().max((ay - by).abs()).max((az - bz).abs());
        d.unsigned_abs()
    }

    /// The adjacent hex in `direction`.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> HexCoord {
        self.translated(direction, 1)
    }

    /// The hex `distance` steps away in a straight line along `direction`.
    #[must_use]
    pub fn translated(self, direction: Direction, distance: u32) -> HexCoord {
        let (x, _, z) = self.to_cube();
        let (dx, _, dz) = direction.cube_step();
        let n = i32::try_from(distance).unwrap_or(i32::MAX);
        Self::from_cube(x + dx * n, z + dz * n)
    }

    /// The six neighbours in clockwise order starting north.
    #[must_use]
    pub fn neighbors(self) -> [HexCoord; 6] {
        Direction::ALL.map(|d| self.neighbor(d))
    }

    /// All hexes exactly `radius` steps away, starting from the
    /// south-west corner of the ring. Radius 0 is the hex itself.
    #[must_use]
    pub fn ring(self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![self];
        }
        let mut out = Vec::with_capacity(6 * radius as usize);
        let mut cursor = self.translated(Direction::SouthWest, radius);
        for direction in Direction::ALL {
            for _ in 0..radius {
                out.push(cursor);
                cursor = cursor.neighbor(direction);
            }
        }
        out
    }
}

impl fmt::Debug for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexCoord({}, {})", self.col, self.row)
    }
}

impl fmt::Display for HexCoord {
    /// Board-style four-digit label, `0405` for column 4 row 5.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.col, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let c = HexCoord::new(3, 7);
        assert_eq!(c.distance(c), 0);
    }

    #[test]
    fn neighbors_are_distance_one() {
        for c in [HexCoord::new(2, 2), HexCoord::new(3, 2), HexCoord::new(0, 0)] {
            for n in c.neighbors() {
                assert_eq!(c.distance(n), 1, "{c:?} -> {n:?}");
            }
        }
    }

    #[test]
    fn north_is_row_minus_one() {
        assert_eq!(HexCoord::new(4, 4).neighbor(Direction::North), HexCoord::new(4, 3));
        assert_eq!(HexCoord::new(5, 4).neighbor(Direction::South), HexCoord::new(5, 5));
    }

    #[test]
    fn odd_column_offsets() {
        // Flat-topped odd-q: odd columns sit half a hex lower.
        assert_eq!(HexCoord::new(4, 4).neighbor(Direction::NorthEast), HexCoord::new(5, 3));
        assert_eq!(HexCoord::new(5, 4).neighbor(Direction::NorthEast), HexCoord::new(6, 4));
    }

    #[test]
    fn translated_distance_matches() {
        let c = HexCoord::new(8, 8);
        for d in Direction::ALL {
            assert_eq!(c.distance(c.translated(d, 4)), 4);
        }
    }

    #[test]
    fn ring_sizes() {
        let c = HexCoord::new(10, 10);
        assert_eq!(c.ring(0), vec![c]);
        assert_eq!(c.ring(1).len(), 6);
        assert_eq!(c.ring(2).len(), 12);
        assert!(c.ring(2).iter().all(|h| c.distance(*h) == 2));
    }

    #[test]
    fn direction_from_d6() {
        assert_eq!(Direction::from_d6(1), Direction::North);
        assert_eq!(Direction::from_d6(4), Direction::South);
        assert_eq!(Direction::from_d6(6), Direction::NorthWest);
        assert_eq!(Direction::North.opposite(), Direction::South);
    }

    #[test]
    fn display_is_board_label() {
        assert_eq!(HexCoord::new(4, 5).to_string(), "0405");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn distance_is_symmetric(a in -20i32..40, b in -20i32..40, c in -20i32..40, d in -20i32..40) {
                let x = HexCoord::new(a, b);
                let y = HexCoord::new(c, d);
                prop_assert_eq!(x.distance(y), y.distance(x));
            }

            #[test]
            fn step_and_back_is_identity(col in -20i32..40, row in -20i32..40, face in 1u32..=6, n in 0u32..8) {
                let start = HexCoord::new(col, row);
                let dir = Direction::from_d6(face);
                let there = start.translated(dir, n);
                prop_assert_eq!(there.translated(dir.opposite(), n), start);
                prop_assert_eq!(start.distance(there), n);
            }
        }
    }
}
