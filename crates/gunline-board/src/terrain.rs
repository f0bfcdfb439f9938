//! Terrain types and per-hex conditions.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Base terrain of a hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground.
    #[default]
    Clear,
    /// Paved surface; does not burn.
    Pavement,
    /// Broken ground.
    Rough,
    /// Light woods.
    LightWoods,
    /// Heavy woods.
    HeavyWoods,
    /// Standing water; never burns.
    Water,
    /// A building with the given construction factor.
    Building {
        /// Construction factor (structure points).
        cf: u32,
    },
}

impl Terrain {
    /// 2d6 target number to start a fire here, or `None` if the terrain
    /// cannot burn.
    ///
    /// Woods 5+/7+, buildings by construction: light (CF ≤ 15) 7+, medium
    /// (≤ 40) 8+, heavier 10+.
    #[must_use]
    pub const fn ignition_target(self) -> Option<u32> {
        match self {
            Terrain::LightWoods => Some(5),
            Terrain::HeavyWoods => Some(7),
            Terrain::Building { cf } if cf <= 15 => Some(7),
            Terrain::Building { cf } if cf <= 40 => Some(8),
            Terrain::Building { .. } => Some(10),
            Terrain::Clear | Terrain::Pavement | Terrain::Rough | Terrain::Water => None,
        }
    }

    /// Whether anything in this terrain can burn.
    #[must_use]
    pub const fn is_flammable(self) -> bool {
        self.ignition_target().is_some()
    }

    /// Whether this is a building hex.
    #[must_use]
    pub const fn is_building(self) -> bool {
        matches!(self, Terrain::Building { .. })
    }
}

/// Smoke thickness in a hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SmokeDensity {
    /// +1 to-hit through.
    Light,
    /// +2 to-hit through, blocks line of sight at range.
    Heavy,
}

bitflags! {
    /// Transient hex conditions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct HexFlags: u8 {
        /// A fire is burning here.
        const ON_FIRE = 1 << 0;
        /// Light smoke.
        const LIGHT_SMOKE = 1 << 1;
        /// Heavy smoke.
        const HEAVY_SMOKE = 1 << 2;
        /// The hex has been scorched by a fire that went out.
        const SCORCHED = 1 << 3;
    }
}

/// A single hex: terrain plus its current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hex {
    /// Base terrain.
    pub terrain: Terrain,
    /// Current conditions.
    pub flags: HexFlags,
    /// Turns of smoke remaining; 0 when clear.
    pub smoke_turns: u8,
}

impl Hex {
    /// A hex of the given terrain with no conditions.
    #[must_use]
    pub fn of(terrain: Terrain) -> Self {
        Self {
            terrain,
            ..Self::default()
        }
    }

    /// Current smoke, heaviest first.
    #[must_use]
    pub fn smoke(&self) -> Option<SmokeDensity> {
        if self.flags.contains(HexFlags::HEAVY_SMOKE) {
            Some(SmokeDensity::Heavy)
        } else if self.flags.contains(HexFlags::LIGHT_SMOKE) {
            Some(SmokeDensity::Light)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignition_targets() {
        assert_eq!(Terrain::LightWoods.ignition_target(), Some(5));
        assert_eq!(Terrain::HeavyWoods.ignition_target(), Some(7));
        assert_eq!(Terrain::Building { cf: 15 }.ignition_target(), Some(7));
        assert_eq!(Terrain::Building { cf: 40 }.ignition_target(), Some(8));
        assert_eq!(Terrain::Building { cf: 90 }.ignition_target(), Some(10));
        assert_eq!(Terrain::Water.ignition_target(), None);
        assert!(!Terrain::Clear.is_flammable());
    }

    #[test]
    fn smoke_prefers_heavy() {
        let mut hex = Hex::of(Terrain::Clear);
        assert_eq!(hex.smoke(), None);
        hex.flags.insert(HexFlags::LIGHT_SMOKE | HexFlags::HEAVY_SMOKE);
        assert_eq!(hex.smoke(), Some(SmokeDensity::Heavy));
    }

    #[test]
    fn hex_is_serializable() {
        let hex = Hex::of(Terrain::Building { cf: 30 });
        let json = serde_json::to_string(&hex).unwrap();
        let back: Hex = serde_json::from_str(&json).unwrap();
        assert_eq!(hex, back);
    }
}
