//! Batch world stepping many bodies against one oracle.
//!
//! Bodies never collide with each other, only with the static world behind
//! the [`SweepOracle`], so every body's tick is independent. [`World::step`]
//! exploits that:
//!
//! 1. **DRIVE**: run each body's [`Driver`] and apply its commands
//! 2. **MOVE**: step every body in parallel
//! 3. **COLLECT**: gather reports in [`BodyId`] order and advance the tick
//!
//! # Determinism
//!
//! - Bodies are stored in a `BTreeMap`, so iteration follows ID order
//! - Each body's tick reads only its own state and the immutable oracle
//! - Reports are sorted by ID before they are returned
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use scree::{BodyShape, Terrain};
//! use slopewalk_core::body::MotionBody;
//! use slopewalk_core::config::Environment;
//! use slopewalk_core::simulation::World;
//!
//! let mut terrain = Terrain::new();
//! terrain.add_polyline(&[Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0)]).unwrap();
//!
//! let mut world = World::new(terrain, Environment::default()).unwrap();
//! let id = world.spawn(MotionBody::new(Vec2::new(0.0, 1.0), BodyShape::square(0.5))).unwrap();
//!
//! for _ in 0..60 {
//!     world.step();
//! }
//!
//! assert_eq!(world.tick(), 60);
//! assert!(world.get(id).unwrap().grounded());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use rayon::prelude::*;
use scree::{BodyShape, SweepOracle};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::body::MotionBody;
use crate::config::{ConfigError, Environment, MotionConfig};
use crate::driver::{Command, Driver, DriverContext};
use crate::report::TickReport;

// =============================================================================
// BodyId
// =============================================================================

/// Identifier of a body in a [`World`].
///
/// IDs are handed out in increasing order and never reused.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(u64);

impl BodyId {
    /// Raw ID value.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyId({})", self.0)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Errors raised when populating or commanding a [`World`].
#[derive(Debug, Error)]
pub enum WorldError {
    /// Environment or body configuration failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Shape has a non-positive or non-finite size
    #[error("invalid body shape {0:?}")]
    InvalidShape(BodyShape),
    /// Spawn position is NaN or infinite
    #[error("spawn position {0:?} is not finite")]
    NonFinitePosition(Vec2),
    /// No body with this ID
    #[error("no body with id {0}")]
    UnknownBody(BodyId),
    /// Command carries NaN or infinity
    #[error("command {0:?} is not finite")]
    NonFiniteCommand(Command),
}

// =============================================================================
// World
// =============================================================================

struct Slot {
    body: MotionBody,
    config: MotionConfig,
    driver: Option<Arc<dyn Driver>>,
}

/// A set of bodies moving against one static oracle.
pub struct World<O> {
    oracle: O,
    env: Environment,
    default_config: MotionConfig,
    bodies: BTreeMap<BodyId, Slot>,
    next_id: u64,
    tick: u64,
}

impl<O> fmt::Debug for World<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("env", &self.env)
            .field("bodies", &self.bodies.len())
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl<O: SweepOracle + Sync> World<O> {
    /// Create an empty world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Config`] if `env` fails validation.
    pub fn new(oracle: O, env: Environment) -> Result<Self, WorldError> {
        env.validate()?;
        Ok(Self {
            oracle,
            env,
            default_config: MotionConfig::default(),
            bodies: BTreeMap::new(),
            next_id: 0,
            tick: 0,
        })
    }

    /// Builder: tuning used by [`spawn`](Self::spawn).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Config`] if `config` fails validation.
    pub fn with_default_config(mut self, config: MotionConfig) -> Result<Self, WorldError> {
        config.validate()?;
        self.default_config = config;
        Ok(self)
    }

    /// Add a body with the world's default tuning.
    ///
    /// # Errors
    ///
    /// See [`spawn_with`](Self::spawn_with).
    pub fn spawn(&mut self, body: MotionBody) -> Result<BodyId, WorldError> {
        let config = self.default_config.clone();
        self.spawn_with(body, config, None)
    }

    /// Add a body with its own tuning and an optional driver.
    ///
    /// # Errors
    ///
    /// Rejects invalid shapes, non-finite positions and invalid tuning.
    pub fn spawn_with(
        &mut self,
        body: MotionBody,
        config: MotionConfig,
        driver: Option<Arc<dyn Driver>>,
    ) -> Result<BodyId, WorldError> {
        if !body.shape().is_valid() {
            return Err(WorldError::InvalidShape(body.shape()));
        }
        if !body.position().is_finite() {
            return Err(WorldError::NonFinitePosition(body.position()));
        }
        config.validate()?;

        let id = BodyId(self.next_id);
        self.next_id += 1;
        debug!(%id, position = ?body.position(), driver = driver.as_ref().map(|d| d.name()), "body spawned");
        self.bodies.insert(id, Slot { body, config, driver });
        Ok(id)
    }

    /// Remove a body, returning it.
    pub fn despawn(&mut self, id: BodyId) -> Option<MotionBody> {
        self.bodies.remove(&id).map(|slot| slot.body)
    }

    /// Look up a body.
    #[must_use]
    pub fn get(&self, id: BodyId) -> Option<&MotionBody> {
        self.bodies.get(&id).map(|slot| &slot.body)
    }

    /// Look up a body for mutation between ticks.
    #[must_use]
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut MotionBody> {
        self.bodies.get_mut(&id).map(|slot| &mut slot.body)
    }

    /// Tuning of a body.
    #[must_use]
    pub fn config(&self, id: BodyId) -> Option<&MotionConfig> {
        self.bodies.get(&id).map(|slot| &slot.config)
    }

    /// Apply a command to a body right away.
    ///
    /// # Errors
    ///
    /// Unknown IDs and non-finite commands are rejected.
    pub fn command(&mut self, id: BodyId, command: Command) -> Result<(), WorldError> {
        if !command.is_finite() {
            return Err(WorldError::NonFiniteCommand(command));
        }
        let slot = self.bodies.get_mut(&id).ok_or(WorldError::UnknownBody(id))?;
        command.apply(&mut slot.body);
        Ok(())
    }

    /// Bodies in ID order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &MotionBody)> {
        self.bodies.iter().map(|(id, slot)| (*id, &slot.body))
    }

    /// Number of bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the world has no bodies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Ticks completed so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Shared environment.
    #[must_use]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// The oracle bodies move against.
    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Run one tick for every body. Returns reports in ID order.
    pub fn step(&mut self) -> Vec<(BodyId, TickReport)> {
        let tick = self.tick;
        let oracle = &self.oracle;
        let env = &self.env;

        let mut reports: Vec<(BodyId, TickReport)> = self
            .bodies
            .par_iter_mut()
            .map(|(id, slot)| {
                if let Some(driver) = &slot.driver {
                    let ctx = DriverContext { body: *id, tick };
                    for command in driver.commands(&ctx, &slot.body) {
                        if command.is_finite() {
                            command.apply(&mut slot.body);
                        } else {
                            warn!(%id, driver = driver.name(), ?command, "dropped non-finite command");
                        }
                    }
                }
                (*id, slot.body.step(oracle, &slot.config, env))
            })
            .collect();

        // Sort for determinism
        reports.sort_by_key(|(id, _)| *id);
        self.tick += 1;
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scree::Terrain;

    fn flat_world() -> World<Terrain> {
        let mut terrain = Terrain::new();
        terrain
            .add_polyline(&[Vec2::new(-100.0, 0.0), Vec2::new(100.0, 0.0)])
            .unwrap();
        World::new(terrain, Environment::default()).unwrap()
    }

    struct Walker(f32);

    impl Driver for Walker {
        fn name(&self) -> &str {
            "walker"
        }

        fn commands(&self, _ctx: &DriverContext, _body: &MotionBody) -> Vec<Command> {
            vec![Command::SetHorizontalVelocity(self.0)]
        }
    }

    struct Broken;

    impl Driver for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn commands(&self, _ctx: &DriverContext, _body: &MotionBody) -> Vec<Command> {
            vec![Command::SetVelocity(Vec2::new(f32::NAN, 0.0))]
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn ids_are_monotonic_and_not_reused() {
            let mut world = flat_world();
            let a = world.spawn(MotionBody::new(Vec2::new(0.0, 1.0), BodyShape::default())).unwrap();
            let b = world.spawn(MotionBody::new(Vec2::new(2.0, 1.0), BodyShape::default())).unwrap();
            assert!(a < b);
            assert!(world.despawn(a).is_some());
            let c = world.spawn(MotionBody::new(Vec2::new(4.0, 1.0), BodyShape::default())).unwrap();
            assert!(b < c);
            assert_eq!(world.len(), 2);
            assert!(world.get(a).is_none());
        }

        #[test]
        fn rejects_bad_spawns() {
            let mut world = flat_world();
            let bad_shape = MotionBody::new(Vec2::ZERO, BodyShape::Circle { radius: 0.0 });
            assert!(matches!(world.spawn(bad_shape), Err(WorldError::InvalidShape(_))));

            let bad_pos = MotionBody::new(Vec2::new(f32::NAN, 0.0), BodyShape::default());
            assert!(matches!(world.spawn(bad_pos), Err(WorldError::NonFinitePosition(_))));

            let config = MotionConfig {
                max_climbable_slope_angle: 95.0,
                ..Default::default()
            };
            let body = MotionBody::new(Vec2::ZERO, BodyShape::default());
            assert!(matches!(world.spawn_with(body, config, None), Err(WorldError::Config(_))));
            assert!(world.is_empty());
        }

        #[test]
        fn rejects_bad_environment() {
            let env = Environment::with_dt(-1.0);
            assert!(World::new(Terrain::new(), env).is_err());
        }

        #[test]
        fn body_id_debug() {
            assert_eq!(format!("{:?}", BodyId(42)), "BodyId(42)");
        }
    }

    mod command_tests {
        use super::*;

        #[test]
        fn command_applies_immediately() {
            let mut world = flat_world();
            let id = world.spawn(MotionBody::new(Vec2::ZERO, BodyShape::default())).unwrap();
            world.command(id, Command::SetVelocity(Vec2::new(1.0, 2.0))).unwrap();
            assert_eq!(world.get(id).unwrap().velocity(), Vec2::new(1.0, 2.0));
        }

        #[test]
        fn command_errors() {
            let mut world = flat_world();
            let id = world.spawn(MotionBody::new(Vec2::ZERO, BodyShape::default())).unwrap();
            assert!(matches!(
                world.command(BodyId(99), Command::AddVelocity(Vec2::ONE)),
                Err(WorldError::UnknownBody(_))
            ));
            assert!(matches!(
                world.command(id, Command::SetHorizontalVelocity(f32::INFINITY)),
                Err(WorldError::NonFiniteCommand(_))
            ));
        }
    }

    mod step_tests {
        use super::*;

        #[test]
        fn reports_in_id_order_and_tick_advances() {
            let mut world = flat_world();
            for i in 0..8 {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f32 * 3.0;
                world.spawn(MotionBody::new(Vec2::new(x, 1.0), BodyShape::default())).unwrap();
            }
            let reports = world.step();
            assert_eq!(reports.len(), 8);
            assert!(reports.windows(2).all(|w| w[0].0 < w[1].0));
            assert_eq!(world.tick(), 1);
        }

        #[test]
        fn driver_runs_before_motion() {
            let mut world = flat_world();
            let body = MotionBody::new(Vec2::new(0.0, 0.51), BodyShape::square(0.5));
            let id = world
                .spawn_with(body, MotionConfig::default(), Some(Arc::new(Walker(6.0))))
                .unwrap();
            let reports = world.step();
            let report = reports[0].1;
            assert!((report.displacement().x - 0.1).abs() < 1e-4);
            assert_eq!(world.get(id).unwrap().velocity().x, 6.0);
        }

        #[test]
        fn non_finite_driver_commands_are_dropped() {
            let mut world = flat_world();
            let body = MotionBody::new(Vec2::new(0.0, 0.51), BodyShape::square(0.5));
            let id = world
                .spawn_with(body, MotionConfig::default(), Some(Arc::new(Broken)))
                .unwrap();
            world.step();
            assert!(world.get(id).unwrap().velocity().is_finite());
        }
    }
}
