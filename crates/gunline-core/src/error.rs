//! Error types.
//!
//! Rule outcomes (misses, jams, empty bins) are never errors; they are
//! report entries. These types cover startup configuration and lookups at
//! the state-mutation boundary.

use crate::entity::{BinId, EntityId, Location, MountId};
use crate::weapon::VariantKey;

/// Variant registry could not be built.
///
/// Raised once at startup; a registry that exists is total.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two variants were registered for the same key.
    #[error("variant {0} registered twice")]
    Duplicate(VariantKey),

    /// A legal key has no variant and its category is not direct-fire.
    #[error("no variant registered for {0}")]
    Missing(VariantKey),

    /// A variant was registered for a munition or mode the category does not
    /// allow.
    #[error("variant registered for illegal key {0}")]
    IllegalKey(VariantKey),

    /// The fallback variant must resolve as a single direct-fire hit.
    #[error("default variant must be a fixed-hit direct-fire variant")]
    DefaultNotDirectFire,
}

/// Rules configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML did not parse or had unknown keys.
    #[error("failed to parse rules config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The options parsed but contradict each other.
    #[error("invalid rules config: {0}")]
    Invalid(String),
}

/// A mutation referenced something that does not exist.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// No unit with this id.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    /// The unit has no such location.
    #[error("entity {0} has no location {1}")]
    UnknownLocation(EntityId, Location),

    /// The unit has no such mount.
    #[error("entity {0} has no {1}")]
    UnknownMount(EntityId, MountId),

    /// The unit has no such bin.
    #[error("entity {0} has no {1}")]
    UnknownBin(EntityId, BinId),
}
