//! Attack declarations.

use std::fmt;

use gunline_board::HexCoord;
use serde::{Deserialize, Serialize};

use crate::entity::{BinId, EntityId, Location, MountId};
use crate::weapon::FiringMode;

/// Identifier of one declared attack, unique within a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttackId(pub u32);

impl fmt::Display for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attack#{}", self.0)
    }
}

/// What an attack is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackTarget {
    /// A unit.
    Entity(EntityId),
    /// A hex (artillery, smoke, fire suppression).
    Hex(HexCoord),
}

/// A declared weapon attack. Immutable once resolution starts.
///
/// # Example
///
/// ```
/// use gunline_core::attack::{AttackDeclaration, AttackTarget};
/// use gunline_core::entity::{EntityId, MountId};
/// use gunline_core::weapon::FiringMode;
///
/// let decl = AttackDeclaration::new(1, EntityId::new(1), AttackTarget::Entity(EntityId::new(2)), MountId(1))
///     .with_mode(FiringMode::Ultra);
/// assert_eq!(decl.mode, FiringMode::Ultra);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackDeclaration {
    /// Attack identifier.
    pub id: AttackId,
    /// Attacking unit.
    pub attacker: EntityId,
    /// Target.
    pub target: AttackTarget,
    /// Weapon mount used.
    pub mount: MountId,
    /// Bin to draw from; `None` uses the mount's linked bin.
    pub ammo: Option<BinId>,
    /// Firing mode.
    pub mode: FiringMode,
    /// Location the attack must strike (mines, called shots).
    pub designated_location: Option<Location>,
}

impl AttackDeclaration {
    /// A single-mode attack using the mount's linked ammo.
    #[must_use]
    pub fn new(id: u32, attacker: EntityId, target: AttackTarget, mount: MountId) -> Self {
        Self {
            id: AttackId(id),
            attacker,
            target,
            mount,
            ammo: None,
            mode: FiringMode::Single,
            designated_location: None,
        }
    }

    /// Sets the firing mode.
    #[must_use]
    pub fn with_mode(mut self, mode: FiringMode) -> Self {
        self.mode = mode;
        self
    }

    /// Draws from a specific bin.
    #[must_use]
    pub fn with_ammo(mut self, bin: BinId) -> Self {
        self.ammo = Some(bin);
        self
    }

    /// Designates the location struck.
    #[must_use]
    pub fn at_location(mut self, location: Location) -> Self {
        self.designated_location = Some(location);
        self
    }

    /// Target unit, if the attack targets one.
    #[must_use]
    pub fn target_entity(&self) -> Option<EntityId> {
        match self.target {
            AttackTarget::Entity(id) => Some(id),
            AttackTarget::Hex(_) => None,
        }
    }
}
