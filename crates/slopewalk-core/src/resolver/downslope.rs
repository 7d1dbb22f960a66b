//! Downslope velocity adjustment.
//!
//! Walking downhill along a unit ground-following direction covers less
//! horizontal ground per tick than walking on the flat. With speed preservation
//! on, the direction is rescaled so its horizontal component is exactly one;
//! otherwise it is scaled by a fixed multiplier.

use glam::Vec2;
use tracing::debug;

use crate::config::{MotionConfig, DOWNSLOPE_EPSILON, MIN_FOLLOW_X};

/// Result of [`adjust`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownslopeAdjustment {
    /// Direction to move along this tick
    pub direction: Vec2,
    /// The rescale was skipped because the direction was near vertical
    pub guarded: bool,
}

/// Adjust `following_dir` for travel at horizontal speed `velocity_x`.
///
/// Uphill and flat travel is returned unchanged. When preserving speed and the
/// direction's horizontal component is below [`MIN_FOLLOW_X`], the direction
/// is returned unchanged with `guarded` set rather than dividing by it.
#[must_use]
pub fn adjust(following_dir: Vec2, velocity_x: f32, config: &MotionConfig) -> DownslopeAdjustment {
    let unchanged = DownslopeAdjustment {
        direction: following_dir,
        guarded: false,
    };

    if following_dir.y * velocity_x >= -DOWNSLOPE_EPSILON {
        return unchanged;
    }

    if !config.preserve_x_vel_downslope {
        return DownslopeAdjustment {
            direction: following_dir * config.downslope_vel_multiplier,
            guarded: false,
        };
    }

    if following_dir.x.abs() < MIN_FOLLOW_X {
        debug!(?following_dir, "downslope rescale skipped on near-vertical direction");
        return DownslopeAdjustment {
            guarded: true,
            ..unchanged
        };
    }

    DownslopeAdjustment {
        direction: following_dir * (1.0 / following_dir.x),
        guarded: false,
    }
}
