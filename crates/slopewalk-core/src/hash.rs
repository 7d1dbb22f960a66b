//! Determinism hashing.
//!
//! Two runs with the same inputs must produce bit-identical bodies. Hashing
//! the raw float bits (rather than comparing with a tolerance) catches any
//! divergence, including `-0.0` versus `0.0`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec2;

use crate::body::MotionBody;
use crate::simulation::World;

fn hash_vec2<H: Hasher>(v: Vec2, hasher: &mut H) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
}

/// Feed every field of `body` that a tick can change into `hasher`.
pub fn hash_body<H: Hasher>(body: &MotionBody, hasher: &mut H) {
    let state = body.state();
    hash_vec2(body.position(), hasher);
    hash_vec2(body.velocity(), hasher);
    hash_vec2(state.ground_normal(), hasher);
    hash_vec2(state.ground_following_dir(), hasher);
    hash_vec2(state.prev_ground_following_dir(), hasher);
    hash_vec2(state.unclimbable_normal(), hasher);
    state.slope_angle().to_bits().hash(hasher);
    state.prev_slope_angle().to_bits().hash(hasher);
    state.grounded().hash(hasher);
    state.last_x_travel_distance().to_bits().hash(hasher);
}

/// Hash the tick counter and every body, in ID order.
#[must_use]
pub fn hash_world<O>(world: &World<O>) -> u64
where
    O: scree::SweepOracle + Sync,
{
    let mut hasher = DefaultHasher::new();
    world.tick().hash(&mut hasher);
    for (id, body) in world.bodies() {
        id.hash(&mut hasher);
        hash_body(body, &mut hasher);
    }
    hasher.finish()
}
