//! Blast patterns: the area-of-effect primitive.
//!
//! A blast describes a centre hex and how much damage each ring around it
//! receives. Area-effect weapons build a pattern and walk its hexes; the
//! board itself is not touched.

use serde::{Deserialize, Serialize};

use crate::board::BoardOracle;
use crate::coord::HexCoord;

/// Damage falling off ring by ring from a centre hex.
///
/// `ring_damage[0]` applies to the centre hex, `ring_damage[1]` to the six
/// adjacent hexes, and so on. Rings with zero damage still count as part of
/// the pattern (smoke and similar payloads use them).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastPattern {
    /// Impact hex.
    pub center: HexCoord,
    /// Damage per ring, centre first.
    pub ring_damage: Vec<u32>,
}

impl BlastPattern {
    /// A pattern with explicit per-ring damage.
    #[must_use]
    pub fn new(center: HexCoord, ring_damage: Vec<u32>) -> Self {
        Self {
            center,
            ring_damage,
        }
    }

    /// Standard artillery shape: `center` damage in the impact hex and
    /// `splash` in the adjacent ring.
    #[must_use]
    pub fn artillery(center: HexCoord, damage: u32, splash: u32) -> Self {
        Self::new(center, vec![damage, splash])
    }

    /// Outermost ring index.
    #[must_use]
    pub fn radius(&self) -> u32 {
        u32::try_from(self.ring_damage.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// Damage at `hex`, or 0 outside the pattern.
    #[must_use]
    pub fn damage_at(&self, hex: HexCoord) -> u32 {
        let distance = self.center.distance(hex) as usize;
        self.ring_damage.get(distance).copied().unwrap_or(0)
    }

    /// Every `(hex, damage)` in the pattern that lies on `board`, centre
    /// first and then ring by ring in clockwise order.
    #[must_use]
    pub fn hexes_on<B: BoardOracle + ?Sized>(&self, board: &B) -> Vec<(HexCoord, u32)> {
        (0..=self.radius())
            .flat_map(|r| {
                let damage = self.ring_damage[r as usize];
                self.center.ring(r).into_iter().map(move |h| (h, damage))
            })
            .filter(|(h, _)| board.contains(*h))
            .collect()
    }
}
