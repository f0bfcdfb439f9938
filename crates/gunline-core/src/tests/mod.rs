//! Crate-level scenario and determinism tests.
//!
//! - `determinism.rs`: same seed and inputs give byte-identical reports and
//!   identical state digests
//! - `integration.rs`: end-to-end attacks through the public resolver
//! - `helpers.rs`: duel setup and inspection utilities

mod determinism;
mod helpers;

pub use helpers::*;
