//! # Gunline Core
//!
//! Deterministic weapon-attack resolution for a hex-based armored combat
//! game.
//!
//! Given a declared attack and the to-hit result computed elsewhere, the
//! engine decides how many hits land, how much damage each deals, where it
//! goes, and what else happens: ammunition draw, heat, jams, criticals,
//! fire, EMP, artillery scatter, grapples and swarms. Every step is
//! reported as a structured [`report::ReportEntry`].
//!
//! ## Architecture
//!
//! - **Registry**: `(category, munition, mode)` selects a variant, a
//!   composition of hit-count policy, damage policy and effect hooks
//! - **Resolver**: [`resolver::AttackResolver`] drives one attack through
//!   a linear phase machine
//! - **Mutators**: all state changes go through [`resolver::StateMutator`]
//! - **Dice**: the only source of randomness, seedable for replay
//!
//! ## Usage
//!
//! ```
//! use gunline_board::{Board, HexCoord};
//! use gunline_core::dice::SeededDice;
//! use gunline_core::entity::{Location, Unit, UnitKind};
//! use gunline_core::weapon::catalog;
//! use gunline_core::{
//!     AttackDeclaration, AttackResolver, AttackTarget, GameState, RulesConfig, ToHitResult,
//! };
//!
//! let mut state = GameState::new(Board::new(16, 17));
//! let mut mek = Unit::new(UnitKind::Mek, "Wolverine").at(HexCoord::new(2, 2));
//! let ppc = mek.add_mount(catalog::ppc(), Location::RightArm);
//! let attacker = state.arena.spawn(mek);
//! let target = state
//!     .arena
//!     .spawn(Unit::new(UnitKind::Vehicle, "Bulldog").at(HexCoord::new(6, 4)));
//!
//! let resolver = AttackResolver::standard(RulesConfig::default()).unwrap();
//! let decl = AttackDeclaration::new(1, attacker, AttackTarget::Entity(target), ppc);
//! let mut dice = SeededDice::new(7);
//! let result = resolver.resolve(&decl, &ToHitResult::rolled(7, 9), &mut state, &mut dice);
//!
//! assert_eq!(result.heat_generated, 10);
//! assert_eq!(result.hits.map(|h| h.total_damage()), Some(10));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arena;
pub mod attack;
pub mod config;
pub mod dice;
pub mod entity;
pub mod error;
pub mod game;
pub mod report;
pub mod resolver;
pub mod to_hit;
pub mod weapon;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use attack::{AttackDeclaration, AttackId, AttackTarget};
pub use config::RulesConfig;
pub use dice::{Dice, ScriptedDice, SeededDice};
pub use error::{ConfigError, RegistryError, StateError};
pub use game::GameState;
pub use report::{MessageId, Report, ReportEntry};
pub use resolver::{AttackResolver, Phase, Resolution};
pub use to_hit::ToHitResult;

pub use gunline_board;
