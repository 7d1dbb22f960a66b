//! Kinematic body and the per-tick pipeline.
//!
//! A [`MotionBody`] owns everything that changes from tick to tick: its staged
//! position, velocity and ground state. The collision shape and query filter
//! are fixed at spawn. [`MotionBody::step`] runs one fixed tick against a
//! [`SweepOracle`] and returns a [`TickReport`].
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use scree::{BodyShape, Terrain};
//! use slopewalk_core::body::MotionBody;
//! use slopewalk_core::config::{Environment, MotionConfig};
//!
//! let mut terrain = Terrain::new();
//! terrain.add_polyline(&[Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0)]).unwrap();
//!
//! let mut body = MotionBody::new(Vec2::new(0.0, 2.0), BodyShape::square(0.5));
//! let (config, env) = (MotionConfig::default(), Environment::default());
//! for _ in 0..120 {
//!     body.step(&terrain, &config, &env);
//! }
//! assert!(body.grounded());
//! assert!((body.position().y - 0.51).abs() < 0.02);
//! ```

use glam::Vec2;
use scree::{BodyShape, QueryFilter, SweepOracle};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{Environment, MotionConfig};
use crate::position::StagedPosition;
use crate::report::{TickEvents, TickReport};
use crate::resolver::{downslope, great_slope, horizontal, snap, vertical, SweepContext};
use crate::state::{MotionState, SurfaceKind};

/// A body moved by slope-following kinematics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionBody {
    shape: BodyShape,
    filter: QueryFilter,
    pub(crate) position: StagedPosition,
    pub(crate) velocity: Vec2,
    pub(crate) state: MotionState,
}

impl MotionBody {
    /// Spawn an airborne body at rest.
    #[must_use]
    pub fn new(position: Vec2, shape: BodyShape) -> Self {
        Self {
            shape,
            filter: QueryFilter::default(),
            position: StagedPosition::new(position),
            velocity: Vec2::ZERO,
            state: MotionState::airborne(),
        }
    }

    /// Builder: collide against a different set of layers.
    #[must_use]
    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Builder: start with a velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Committed position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position.committed()
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Whether the body stands on climbable ground.
    #[must_use]
    pub fn grounded(&self) -> bool {
        self.state.grounded
    }

    /// Angle of the current ground, or `-1` while airborne.
    #[must_use]
    pub fn slope_angle(&self) -> f32 {
        self.state.slope_angle
    }

    /// Full ground-contact snapshot.
    #[must_use]
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Kind of surface currently touched.
    #[must_use]
    pub fn surface(&self, max_climbable_slope_angle: f32) -> SurfaceKind {
        self.state.surface(max_climbable_slope_angle)
    }

    /// Collision shape.
    #[must_use]
    pub fn shape(&self) -> BodyShape {
        self.shape
    }

    /// Layers and triggers this body collides with.
    #[must_use]
    pub fn filter(&self) -> QueryFilter {
        self.filter
    }

    // =========================================================================
    // Mutation between ticks
    // =========================================================================

    /// Replace the velocity.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Replace only the horizontal velocity (walking input).
    pub fn set_horizontal_velocity(&mut self, vx: f32) {
        self.velocity.x = vx;
    }

    /// Add an impulse to the velocity (jumps, knockback).
    pub fn add_velocity(&mut self, delta: Vec2) {
        self.velocity += delta;
    }

    /// Move instantly to `position`, dropping any ground contact.
    pub fn teleport(&mut self, position: Vec2) {
        self.position.reset(position);
        self.state = MotionState::airborne();
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advance the body by one fixed tick.
    ///
    /// Stages run in a fixed order: great-slope clamp, downslope adjustment,
    /// horizontal resolve, gravity, vertical resolve, slope snap, commit. The
    /// committed position changes only at the very end.
    pub fn step<O: SweepOracle + ?Sized>(
        &mut self,
        oracle: &O,
        config: &MotionConfig,
        env: &Environment,
    ) -> TickReport {
        debug_assert!(!self.position.is_dirty(), "tick started with uncommitted motion");
        let start = self.position.committed();
        let was_grounded = self.state.grounded;
        let dt = env.tick_duration;
        let ctx = SweepContext::new(oracle, config, env, self.shape, self.filter);
        let mut events = TickEvents::empty();

        if great_slope::clamp(self.state.unclimbable_normal, &mut self.velocity) {
            events.insert(TickEvents::GREAT_SLOPE_CLAMPED);
        }

        let adjusted = downslope::adjust(self.state.ground_following_dir, self.velocity.x, config);
        if adjusted.guarded {
            events.insert(TickEvents::DOWNSLOPE_GUARDED);
        }
        let movement = adjusted.direction * (self.velocity.x * dt);
        let horizontal = horizontal::resolve(&ctx, self, movement, &mut events);

        self.velocity += env.gravity * (config.gravity_multiplier * dt);
        let vertical_travel = vertical::resolve(
            &ctx,
            self,
            self.velocity.y * dt,
            horizontal.moving_into_climbable,
            &mut events,
        );

        let heading = if self.velocity.x < 0.0 { -1.0 } else { 1.0 };
        snap::snap_to_slope(&ctx, self, adjusted.direction * heading, &mut events);

        match (was_grounded, self.state.grounded) {
            (false, true) => {
                debug!(angle = self.state.slope_angle, "landed");
                events.insert(TickEvents::LANDED);
            }
            (true, false) => events.insert(TickEvents::LEFT_GROUND),
            _ => {}
        }

        self.position.commit();
        let end = self.position.committed();
        trace!(?start, ?end, ?events, "tick committed");

        TickReport {
            events,
            horizontal_travel: horizontal.travel,
            vertical_travel,
            start,
            end,
        }
    }
}
