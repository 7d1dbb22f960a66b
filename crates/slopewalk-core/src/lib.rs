//! # Slopewalk Core
//!
//! Deterministic fixed-step slope-following motion for 2D kinematic bodies.
//!
//! Each tick, a body moves along the ground it stands on, climbs slopes up to a
//! configured angle, is stopped by walls and steeper slopes, slides along
//! overhangs and steep faces, sticks to the ground when walking over crests,
//! and leaves ledges on a continuous trajectory. All collision knowledge comes
//! from a [`scree::SweepOracle`]; this crate only decides what to do with the
//! contacts it reports.
//!
//! ## Architecture
//!
//! - **State**: [`MotionState`] and the [`classifier`] that produces it
//! - **Resolvers**: the per-tick pipeline in [`resolver`]
//! - **Body**: [`MotionBody::step`] runs one tick and returns a [`TickReport`]
//! - **World**: [`World`] steps many bodies in parallel, with optional [`Driver`]s
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use slopewalk_core::scree::{BodyShape, Terrain};
//! use slopewalk_core::{Environment, MotionBody, MotionConfig};
//!
//! // Flat ground, then a 30 degree ramp
//! let mut terrain = Terrain::new();
//! terrain
//!     .add_polyline(&[Vec2::new(-10.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.77)])
//!     .unwrap();
//!
//! let mut body = MotionBody::new(Vec2::new(-3.0, 0.6), BodyShape::square(0.5));
//! let (config, env) = (MotionConfig::default(), Environment::default());
//! body.set_horizontal_velocity(4.0);
//! for _ in 0..90 {
//!     body.step(&terrain, &config, &env);
//! }
//!
//! assert!(body.grounded());
//! assert!(body.position().y > 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export scree for shapes, terrain and the oracle contract
pub use scree;

pub mod body;
pub mod classifier;
pub mod config;
pub mod driver;
pub mod hash;
pub mod position;
pub mod report;
pub mod resolver;
pub mod simulation;
pub mod state;

#[cfg(test)]
mod tests;

pub use body::MotionBody;
pub use classifier::classify;
pub use config::{ConfigError, Environment, MotionConfig};
pub use driver::{Command, Driver, DriverContext};
pub use hash::hash_world;
pub use report::{TickEvents, TickReport};
pub use simulation::{BodyId, World, WorldError};
pub use state::{MotionState, SurfaceKind};
