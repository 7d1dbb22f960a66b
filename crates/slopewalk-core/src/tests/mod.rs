//! Cross-module tests of the motion pipeline.
//!
//! - `scenarios.rs`: single-tick behavior against scripted contacts, and walks
//!   over real terrain
//! - `determinism.rs`: identical inputs give bit-identical worlds
//! - `properties.rs`: `proptest` checks of the invariants every tick must keep
//! - `helpers.rs`: scripted oracles, terrain fixtures and body setup

mod helpers;

pub use helpers::*;
