//! Test helpers for setting up oracles, terrain and bodies.

use std::sync::Mutex;

use glam::Vec2;
use scree::{BodyShape, Contact, SweepOracle, SweepQuery, Terrain};

use crate::body::MotionBody;
use crate::classifier::classify;
use crate::config::{Environment, MotionConfig};

/// Default slope limit used throughout the tests.
pub const MAX_ANGLE: f32 = 45.0;

/// Tick length with easy arithmetic.
pub const DT: f32 = 0.1;

/// Install a tracing subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Environment with [`DT`] ticks.
pub fn env() -> Environment {
    Environment::with_dt(DT)
}

/// Default tuning.
pub fn config() -> MotionConfig {
    MotionConfig::default()
}

// =============================================================================
// Geometry
// =============================================================================

/// Normal of ground rising to the right at `degrees`.
pub fn rising(degrees: f32) -> Vec2 {
    let r = degrees.to_radians();
    Vec2::new(-r.sin(), r.cos())
}

/// Normal of ground falling to the right at `degrees`.
pub fn falling(degrees: f32) -> Vec2 {
    let r = degrees.to_radians();
    Vec2::new(r.sin(), r.cos())
}

/// Normal at `degrees` from up, facing left (`-x`) for angles in `(0, 180)`.
pub fn facing_left(degrees: f32) -> Vec2 {
    rising(degrees)
}

/// Normal at `degrees` from up, facing right (`+x`) for angles in `(0, 180)`.
pub fn facing_right(degrees: f32) -> Vec2 {
    falling(degrees)
}

pub fn assert_vec_near(actual: Vec2, expected: Vec2, tolerance: f32) {
    assert!(
        (actual - expected).length() <= tolerance,
        "expected {expected:?}, got {actual:?} (tolerance {tolerance})"
    );
}

// =============================================================================
// Oracles
// =============================================================================

/// Oracle that answers by query direction and records every query.
///
/// Queries whose direction matches no rule get no contacts.
#[derive(Default)]
pub struct ScriptedOracle {
    rules: Vec<(Vec2, Vec<Contact>)>,
    log: Mutex<Vec<SweepQuery>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `contacts` for sweeps along `direction` (normalized here).
    pub fn on(mut self, direction: Vec2, contacts: Vec<Contact>) -> Self {
        self.rules.push((direction.normalize(), contacts));
        self
    }

    /// Every query made so far, in order.
    pub fn queries(&self) -> Vec<SweepQuery> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }
}

impl SweepOracle for ScriptedOracle {
    fn sweep(&self, query: &SweepQuery) -> Vec<Contact> {
        self.log.lock().unwrap().push(*query);
        self.rules
            .iter()
            .find(|(dir, _)| dir.abs_diff_eq(query.direction, 1e-4))
            .map(|(_, contacts)| contacts.clone())
            .unwrap_or_default()
    }
}

// =============================================================================
// Terrain fixtures
// =============================================================================

/// Flat ground at `y = 0` from `x = -100` to `x = 100`.
pub fn flat_terrain() -> Terrain {
    let mut terrain = Terrain::new();
    terrain
        .add_polyline(&[Vec2::new(-100.0, 0.0), Vec2::new(100.0, 0.0)])
        .unwrap();
    terrain
}

/// Flat ground up to `x = 0`, then a ramp rising at `degrees` for 20 units.
pub fn ramp_terrain(degrees: f32) -> Terrain {
    let rise = degrees.to_radians().tan() * 20.0;
    let mut terrain = Terrain::new();
    terrain
        .add_polyline(&[
            Vec2::new(-50.0, 0.0),
            Vec2::ZERO,
            Vec2::new(20.0, rise),
            Vec2::new(70.0, rise),
        ])
        .unwrap();
    terrain
}

/// A symmetric hill: up at `degrees` to a crest at `x = 10`, then down again.
pub fn crest_terrain(degrees: f32) -> Terrain {
    let rise = degrees.to_radians().tan() * 10.0;
    let mut terrain = Terrain::new();
    terrain
        .add_polyline(&[
            Vec2::new(-50.0, 0.0),
            Vec2::ZERO,
            Vec2::new(10.0, rise),
            Vec2::new(20.0, 0.0),
            Vec2::new(70.0, 0.0),
        ])
        .unwrap();
    terrain
}

/// A plateau at `y = 0` up to `x = 0`, then a slope falling at `degrees` for
/// 20 units, then flat again.
pub fn plateau_terrain(degrees: f32) -> Terrain {
    let drop = degrees.to_radians().tan() * 20.0;
    let mut terrain = Terrain::new();
    terrain
        .add_polyline(&[
            Vec2::new(-50.0, 0.0),
            Vec2::ZERO,
            Vec2::new(20.0, -drop),
            Vec2::new(70.0, -drop),
        ])
        .unwrap();
    terrain
}

/// Flat ground ending at a drop: `y = 0` up to `x = 0`, then `y = -10`.
pub fn ledge_terrain() -> Terrain {
    let mut terrain = Terrain::new();
    terrain
        .add_polyline(&[Vec2::new(-50.0, 0.0), Vec2::ZERO])
        .unwrap();
    terrain
        .add_polyline(&[Vec2::new(0.0, -10.0), Vec2::new(50.0, -10.0)])
        .unwrap();
    terrain
}

// =============================================================================
// Bodies
// =============================================================================

/// Unit box (half extent 0.5).
pub fn unit_box() -> BodyShape {
    BodyShape::square(0.5)
}

/// Box body at `position`, already classified onto ground with `normal`.
pub fn grounded_body(position: Vec2, normal: Vec2, velocity: Vec2) -> MotionBody {
    let mut body = MotionBody::new(position, unit_box()).with_velocity(velocity);
    body.state = classify(&body.state, Some(normal), MAX_ANGLE);
    body
}

/// Box body resting on flat ground at `x`, grounded and consistent.
pub fn resting_on_flat(x: f32) -> MotionBody {
    grounded_body(Vec2::new(x, 0.51), Vec2::Y, Vec2::ZERO)
}

/// Step `body` `ticks` times.
pub fn run<O: SweepOracle + ?Sized>(
    body: &mut MotionBody,
    oracle: &O,
    config: &MotionConfig,
    env: &Environment,
    ticks: usize,
) {
    for _ in 0..ticks {
        body.step(oracle, config, env);
    }
}
