//! Optional-rules switchboard.
//!
//! Every optional rule the engine knows about is a boolean here. The host
//! builds one `RulesConfig` per game, either in code or from TOML:
//!
//! ```
//! use gunline_core::config::RulesConfig;
//!
//! let rules = RulesConfig::from_toml_str(
//!     "extended_range = true\ndirect_blows = true\n",
//! ).unwrap();
//! assert!(rules.extended_range);
//! assert!(rules.direct_blows);
//! assert!(rules.floating_crits);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Optional rules in force for a game.
///
/// Missing keys take their [`Default`] value; unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct RulesConfig {
    /// Attacks beyond long range (extreme band) are allowed and take the
    /// per-family beyond-long damage step.
    pub extended_range: bool,
    /// Attacks beyond extreme range (line-of-sight band) take the
    /// per-family beyond-extreme damage step. Requires `extended_range`.
    pub line_of_sight_range: bool,
    /// Margin of 3+ adds bonus damage (or cluster modifier).
    pub direct_blows: bool,
    /// Margin of exactly 0 reduces damage (or cluster modifier).
    pub glancing_blows: bool,
    /// "All shots hit" racks lose missiles beyond long range.
    pub cluster_range_reduction: bool,
    /// A natural 2 on a Mek hit-location roll is a through-armor critical
    /// chance.
    pub floating_crits: bool,
    /// Standard autocannons may use rapid-fire mode.
    pub rapid_fire_autocannons: bool,
    /// Mounts with a damaged feed roll for a feed fault before firing.
    pub ammo_feed_checks: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            extended_range: false,
            line_of_sight_range: false,
            direct_blows: false,
            glancing_blows: false,
            cluster_range_reduction: false,
            floating_crits: true,
            rapid_fire_autocannons: false,
            ammo_feed_checks: true,
        }
    }
}

impl RulesConfig {
    /// Every optional rule switched on.
    #[must_use]
    pub fn all_optional() -> Self {
        Self {
            extended_range: true,
            line_of_sight_range: true,
            direct_blows: true,
            glancing_blows: true,
            cluster_range_reduction: true,
            floating_crits: true,
            rapid_fire_autocannons: true,
            ammo_feed_checks: true,
        }
    }

    /// Parses rules from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, wrong types or
    /// unknown keys, and [`ConfigError::Invalid`] if the options contradict
    /// each other.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let rules: Self = toml::from_str(s)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Checks option dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `line_of_sight_range` is on
    /// without `extended_range`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.line_of_sight_range && !self.extended_range {
            return Err(ConfigError::Invalid(
                "line_of_sight_range requires extended_range".into(),
            ));
        }
        Ok(())
    }
}
