//! Resolver steps of the per-tick motion pipeline.
//!
//! Each step takes the body's current velocity and ground state, issues at most
//! one sweep through a [`SweepContext`], and writes back a resolved velocity,
//! ground state, and proposed position.
//!
//! # Pipeline
//!
//! The steps run in this order inside [`MotionBody::step`](crate::body::MotionBody::step):
//!
//! 1. [`great_slope::clamp`]: push away from a steep surface while falling
//! 2. [`downslope::adjust`]: rescale the ground-following direction downhill
//! 3. [`horizontal::resolve`]: move along the ground, react to what is hit
//! 4. gravity integration
//! 5. [`vertical::resolve`]: fall or rise, gain or lose ground
//! 6. [`snap::snap_to_slope`]: undo false "airborne" at crests
//!
//! # Invariants
//!
//! - Horizontal resolution finishes before vertical resolution begins; its
//!   climbable latch travels to the vertical step as a plain argument.
//! - Every resolved travel distance lies in `[0, requested]`.
//! - Resolvers only touch the proposed position; committing is the body's job.

pub mod downslope;
pub mod great_slope;
pub mod horizontal;
pub mod snap;
pub mod vertical;

use glam::Vec2;
use scree::{BodyShape, Contact, QueryFilter, SweepOracle, SweepQuery};

use crate::config::{Environment, MotionConfig};

/// Everything a resolver needs besides the body itself.
pub struct SweepContext<'a, O: ?Sized> {
    oracle: &'a O,
    /// Tuning for the body being resolved
    pub config: &'a MotionConfig,
    /// World gravity, tick length and contact offset
    pub env: &'a Environment,
    shape: BodyShape,
    filter: QueryFilter,
}

impl<'a, O: SweepOracle + ?Sized> SweepContext<'a, O> {
    /// Bundle an oracle with the tuning and shape of one body.
    #[must_use]
    pub fn new(
        oracle: &'a O,
        config: &'a MotionConfig,
        env: &'a Environment,
        shape: BodyShape,
        filter: QueryFilter,
    ) -> Self {
        Self {
            oracle,
            config,
            env,
            shape,
            filter,
        }
    }

    /// Sweep the body's shape from `origin`.
    #[must_use]
    pub fn sweep(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Vec<Contact> {
        self.oracle.sweep(&SweepQuery {
            origin,
            shape: self.shape,
            direction,
            max_distance,
            filter: self.filter,
        })
    }

    /// Gap kept between the body and any surface.
    #[must_use]
    pub fn contact_epsilon(&self) -> f32 {
        self.env.contact_epsilon
    }
}

/// Whether a surface faces against the direction of travel.
#[must_use]
pub fn opposes(normal: Vec2, movement: Vec2) -> bool {
    normal.dot(movement) < 0.0
}

/// Shorten `travel` so the body stops `epsilon` short of a contact.
///
/// The result never exceeds `travel` and never goes below zero.
#[must_use]
pub fn clamp_travel(travel: f32, contact_distance: f32, epsilon: f32) -> f32 {
    let clamped = travel.min((contact_distance - epsilon).max(0.0));
    debug_assert!(clamped >= 0.0, "resolved travel went negative: {clamped}");
    clamped
}

/// Remove the part of `velocity` pointing into a surface with normal `normal`.
///
/// Returns whether anything was removed. Velocity leaving the surface is kept.
pub fn remove_into_surface(velocity: &mut Vec2, normal: Vec2) -> bool {
    let projection = velocity.dot(normal);
    if projection < 0.0 {
        *velocity -= normal * projection;
        true
    } else {
        false
    }
}
