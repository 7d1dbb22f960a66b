//! Ground state of a body and surface geometry helpers.
//!
//! [`MotionState`] is the snapshot the classifier produces every time the body
//! touches (or loses) a surface. It is read by every resolver, but only
//! [`classify`](crate::classifier::classify) creates new values of it.
//!
//! # Invariant
//!
//! Exactly one of the following holds:
//! - grounded, on a climbable normal, no unclimbable normal
//! - airborne: slope angle [`AIRBORNE_SLOPE_ANGLE`], up normal, no unclimbable normal
//! - ungrounded against a non-zero unclimbable normal, up normal
//!
//! See [`MotionState::is_consistent`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slope angle reported while no surface supports the body.
pub const AIRBORNE_SLOPE_ANGLE: f32 = -1.0;

/// Angles within this many degrees of 0 count as flat, of 90 as vertical.
const ANGLE_TOLERANCE_DEGREES: f32 = 0.01;

/// Angle in degrees between `normal` and the up axis, in `[0, 180]`.
///
/// A zero vector yields `0.0`.
#[must_use]
pub fn slope_angle(normal: Vec2) -> f32 {
    let Some(n) = normal.try_normalize() else {
        return 0.0;
    };
    n.dot(Vec2::Y).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Direction along a surface with the given normal.
///
/// For an upward-facing surface this points toward `+x`, so multiplying by a
/// signed horizontal speed yields travel along the surface.
#[must_use]
pub fn following_dir(normal: Vec2) -> Vec2 {
    Vec2::new(normal.y, -normal.x)
}

// =============================================================================
// SurfaceKind
// =============================================================================

/// What kind of surface a normal (or the current state) represents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// No supporting surface
    Airborne,
    /// Level ground
    Flat,
    /// Walkable incline
    ClimbableSlope,
    /// Too steep to walk, but still facing up
    UnclimbableSlope,
    /// Vertical surface
    Wall,
    /// Surface facing down
    Overhang,
}

impl SurfaceKind {
    /// Classify a contact normal against the slope limit.
    #[must_use]
    pub fn from_normal(normal: Vec2, max_climbable_slope_angle: f32) -> Self {
        Self::from_angle(slope_angle(normal), max_climbable_slope_angle)
    }

    /// Classify a slope angle (degrees from up) against the slope limit.
    #[must_use]
    pub fn from_angle(angle: f32, max_climbable_slope_angle: f32) -> Self {
        if angle < 0.0 {
            Self::Airborne
        } else if angle <= ANGLE_TOLERANCE_DEGREES {
            Self::Flat
        } else if angle <= max_climbable_slope_angle {
            Self::ClimbableSlope
        } else if angle < 90.0 - ANGLE_TOLERANCE_DEGREES {
            Self::UnclimbableSlope
        } else if angle <= 90.0 + ANGLE_TOLERANCE_DEGREES {
            Self::Wall
        } else {
            Self::Overhang
        }
    }

    /// Whether bodies can stand on this surface.
    #[must_use]
    pub fn is_ground(self) -> bool {
        matches!(self, Self::Flat | Self::ClimbableSlope)
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Airborne => write!(f, "airborne"),
            Self::Flat => write!(f, "flat"),
            Self::ClimbableSlope => write!(f, "climbable slope"),
            Self::UnclimbableSlope => write!(f, "unclimbable slope"),
            Self::Wall => write!(f, "wall"),
            Self::Overhang => write!(f, "overhang"),
        }
    }
}

// =============================================================================
// MotionState
// =============================================================================

/// Ground-contact snapshot of one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub(crate) ground_normal: Vec2,
    pub(crate) ground_following_dir: Vec2,
    pub(crate) prev_ground_following_dir: Vec2,
    pub(crate) unclimbable_normal: Vec2,
    pub(crate) slope_angle: f32,
    pub(crate) prev_slope_angle: f32,
    pub(crate) grounded: bool,
    pub(crate) last_x_travel_distance: f32,
}

impl MotionState {
    /// State of a freshly spawned body touching nothing.
    #[must_use]
    pub fn airborne() -> Self {
        Self {
            ground_normal: Vec2::Y,
            ground_following_dir: Vec2::X,
            prev_ground_following_dir: Vec2::X,
            unclimbable_normal: Vec2::ZERO,
            slope_angle: AIRBORNE_SLOPE_ANGLE,
            prev_slope_angle: AIRBORNE_SLOPE_ANGLE,
            grounded: false,
            last_x_travel_distance: 0.0,
        }
    }

    /// Normal of the supporting climbable surface, or up.
    #[must_use]
    pub fn ground_normal(&self) -> Vec2 {
        self.ground_normal
    }

    /// Direction along the current ground.
    #[must_use]
    pub fn ground_following_dir(&self) -> Vec2 {
        self.ground_following_dir
    }

    /// Ground-following direction from the previous classification.
    #[must_use]
    pub fn prev_ground_following_dir(&self) -> Vec2 {
        self.prev_ground_following_dir
    }

    /// Normal of a touched steep surface or overhang, zero if none.
    #[must_use]
    pub fn unclimbable_normal(&self) -> Vec2 {
        self.unclimbable_normal
    }

    /// Degrees between the ground normal and up; [`AIRBORNE_SLOPE_ANGLE`] when airborne.
    #[must_use]
    pub fn slope_angle(&self) -> f32 {
        self.slope_angle
    }

    /// Slope angle from the previous classification.
    #[must_use]
    pub fn prev_slope_angle(&self) -> f32 {
        self.prev_slope_angle
    }

    /// Whether the body stands on climbable ground.
    #[must_use]
    pub fn grounded(&self) -> bool {
        self.grounded
    }

    /// Whether no surface supports the body.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_airborne(&self) -> bool {
        self.slope_angle == AIRBORNE_SLOPE_ANGLE
    }

    /// Horizontal distance the body actually moved on its last tick.
    #[must_use]
    pub fn last_x_travel_distance(&self) -> f32 {
        self.last_x_travel_distance
    }

    /// Kind of surface currently touched.
    #[must_use]
    pub fn surface(&self, max_climbable_slope_angle: f32) -> SurfaceKind {
        SurfaceKind::from_angle(self.slope_angle, max_climbable_slope_angle)
    }

    /// Check the three-way state invariant.
    #[must_use]
    pub fn is_consistent(&self, max_climbable_slope_angle: f32) -> bool {
        let on_ground = self.grounded
            && self.slope_angle >= 0.0
            && self.slope_angle <= max_climbable_slope_angle
            && self.unclimbable_normal == Vec2::ZERO;
        let airborne = !self.grounded
            && self.is_airborne()
            && self.ground_normal == Vec2::Y
            && self.unclimbable_normal == Vec2::ZERO;
        let against_steep = !self.grounded
            && self.slope_angle > max_climbable_slope_angle
            && self.unclimbable_normal != Vec2::ZERO
            && self.ground_normal == Vec2::Y;
        u8::from(on_ground) + u8::from(airborne) + u8::from(against_steep) == 1
    }

    pub(crate) fn record_x_travel(&mut self, distance: f32) {
        self.last_x_travel_distance = distance;
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::airborne()
    }
}
