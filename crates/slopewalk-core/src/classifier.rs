//! Ground-state classifier.
//!
//! Maps the surface a body just touched (or the absence of one) to the next
//! [`MotionState`]. Every call shifts the current slope angle and following
//! direction into the `prev_*` fields first, so the previous values always
//! describe the previous classification rather than anything mid-tick.

use glam::Vec2;
use tracing::trace;

use crate::config::GROUNDING_BIAS;
use crate::state::{following_dir, slope_angle, MotionState, AIRBORNE_SLOPE_ANGLE};

/// Compute the state after touching `contact` (`None` for "no contact").
///
/// A zero normal is treated as no contact.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use slopewalk_core::classifier::classify;
/// use slopewalk_core::state::MotionState;
///
/// let landed = classify(&MotionState::airborne(), Some(Vec2::Y), 45.0);
/// assert!(landed.grounded());
/// assert_eq!(landed.prev_slope_angle(), -1.0);
/// ```
#[must_use]
pub fn classify(current: &MotionState, contact: Option<Vec2>, max_climbable_slope_angle: f32) -> MotionState {
    let mut next = current.clone();
    next.prev_slope_angle = current.slope_angle;
    next.prev_ground_following_dir = current.ground_following_dir;

    match contact.and_then(Vec2::try_normalize) {
        None => {
            next.slope_angle = AIRBORNE_SLOPE_ANGLE;
            next.grounded = false;
            next.ground_normal = Vec2::Y;
            next.ground_following_dir = Vec2::X;
            next.unclimbable_normal = Vec2::ZERO;
        }
        Some(normal) => {
            let angle = slope_angle(normal);
            next.slope_angle = angle;
            if angle <= max_climbable_slope_angle {
                next.grounded = true;
                next.ground_normal = normal;
                next.ground_following_dir = following_dir(normal);
                next.unclimbable_normal = Vec2::ZERO;
            } else {
                next.grounded = false;
                next.ground_normal = Vec2::Y;
                next.ground_following_dir = Vec2::X;
                next.unclimbable_normal = normal;
            }
        }
    }

    trace!(
        from = current.slope_angle,
        to = next.slope_angle,
        grounded = next.grounded,
        "ground state reclassified"
    );
    debug_assert!(next.is_consistent(max_climbable_slope_angle));
    next
}

/// Reclassify `state` in place, forcing the grounding bias on climbable ground.
///
/// Returns whether the new state is grounded.
pub(crate) fn reclassify(
    state: &mut MotionState,
    velocity: &mut Vec2,
    contact: Option<Vec2>,
    max_climbable_slope_angle: f32,
) -> bool {
    *state = classify(state, contact, max_climbable_slope_angle);
    if state.grounded {
        velocity.y = GROUNDING_BIAS;
    }
    state.grounded
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: f32 = 45.0;

    fn normal_at(degrees: f32) -> Vec2 {
        let r = degrees.to_radians();
        Vec2::new(-r.sin(), r.cos())
    }

    mod no_contact_tests {
        use super::*;

        #[test]
        fn becomes_airborne() {
            let grounded = classify(&MotionState::airborne(), Some(normal_at(20.0)), MAX);
            let next = classify(&grounded, None, MAX);
            assert_eq!(next.slope_angle(), AIRBORNE_SLOPE_ANGLE);
            assert!(!next.grounded());
            assert_eq!(next.ground_normal(), Vec2::Y);
            assert_eq!(next.ground_following_dir(), Vec2::X);
            assert_eq!(next.unclimbable_normal(), Vec2::ZERO);
        }

        #[test]
        fn zero_normal_counts_as_no_contact() {
            let grounded = classify(&MotionState::airborne(), Some(Vec2::Y), MAX);
            let next = classify(&grounded, Some(Vec2::ZERO), MAX);
            assert!(next.is_airborne());
        }
    }

    mod climbable_tests {
        use super::*;

        #[test]
        fn flat_ground() {
            let next = classify(&MotionState::airborne(), Some(Vec2::Y), MAX);
            assert!(next.grounded());
            assert!(next.slope_angle().abs() < 1e-4);
            assert_eq!(next.ground_following_dir(), Vec2::X);
        }

        #[test]
        fn slope_sets_following_dir() {
            let n = normal_at(30.0);
            let next = classify(&MotionState::airborne(), Some(n), MAX);
            assert!(next.grounded());
            assert!((next.slope_angle() - 30.0).abs() < 1e-3);
            assert!((next.ground_following_dir() - following_dir(n)).length() < 1e-6);
            assert_eq!(next.unclimbable_normal(), Vec2::ZERO);
        }

        #[test]
        fn limit_angle_is_climbable() {
            let next = classify(&MotionState::airborne(), Some(normal_at(44.99)), MAX);
            assert!(next.grounded());
        }

        #[test]
        fn unnormalized_normal_is_normalized() {
            let next = classify(&MotionState::airborne(), Some(Vec2::new(0.0, 5.0)), MAX);
            assert_eq!(next.ground_normal(), Vec2::Y);
        }
    }

    mod unclimbable_tests {
        use super::*;

        #[test]
        fn steep_slope_records_unclimbable_normal() {
            let n = normal_at(60.0);
            let next = classify(&MotionState::airborne(), Some(n), MAX);
            assert!(!next.grounded());
            assert_eq!(next.ground_normal(), Vec2::Y);
            assert_eq!(next.ground_following_dir(), Vec2::X);
            assert!((next.unclimbable_normal() - n).length() < 1e-6);
            assert!(next.is_consistent(MAX));
        }
    }

    mod history_tests {
        use super::*;

        #[test]
        fn prev_values_come_from_previous_call() {
            let n1 = normal_at(20.0);
            let n2 = normal_at(-10.0);
            let first = classify(&MotionState::airborne(), Some(n1), MAX);
            let second = classify(&first, Some(n2), MAX);
            assert!((second.prev_slope_angle() - first.slope_angle()).abs() < 1e-6);
            assert_eq!(second.prev_ground_following_dir(), first.ground_following_dir());
        }

        #[test]
        fn last_x_travel_survives_classification() {
            let mut state = MotionState::airborne();
            state.record_x_travel(0.25);
            let next = classify(&state, Some(Vec2::Y), MAX);
            assert_eq!(next.last_x_travel_distance(), 0.25);
        }
    }

    mod reclassify_tests {
        use super::*;

        #[test]
        fn landing_forces_grounding_bias_regardless_of_sign() {
            for vy in [-12.0, 0.0, 3.0] {
                let mut state = MotionState::airborne();
                let mut velocity = Vec2::new(1.0, vy);
                assert!(reclassify(&mut state, &mut velocity, Some(Vec2::Y), MAX));
                assert_eq!(velocity.y, GROUNDING_BIAS);
                assert_eq!(velocity.x, 1.0);
            }
        }

        #[test]
        fn steep_contact_leaves_velocity_alone() {
            let mut state = MotionState::airborne();
            let mut velocity = Vec2::new(1.0, -4.0);
            assert!(!reclassify(&mut state, &mut velocity, Some(normal_at(70.0)), MAX));
            assert_eq!(velocity, Vec2::new(1.0, -4.0));
        }
    }
}
