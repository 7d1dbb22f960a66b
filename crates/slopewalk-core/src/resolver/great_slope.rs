//! Great-slope clamp.
//!
//! A body resting against a surface too steep to stand on would otherwise hang
//! there: gravity pulls it into the slope and the vertical step cancels that
//! motion. While falling, force enough horizontal speed away from the slope to
//! ride straight down along it.

use glam::Vec2;
use tracing::trace;

use crate::config::MIN_FOLLOW_X;
use crate::state::following_dir;

/// Apply the clamp to `velocity`. Returns whether `velocity.x` was changed.
pub fn clamp(unclimbable_normal: Vec2, velocity: &mut Vec2) -> bool {
    if unclimbable_normal == Vec2::ZERO || velocity.y > 0.0 {
        return false;
    }

    let along = following_dir(unclimbable_normal);
    if along.y.abs() < MIN_FOLLOW_X {
        return false;
    }
    let min_speed = (velocity.y * along.x / along.y).abs();

    let forced = if unclimbable_normal.x > 0.0 && velocity.x < min_speed {
        min_speed
    } else if unclimbable_normal.x < 0.0 && velocity.x > -min_speed {
        -min_speed
    } else {
        return false;
    };

    trace!(from = velocity.x, to = forced, "great-slope clamp");
    velocity.x = forced;
    true
}
