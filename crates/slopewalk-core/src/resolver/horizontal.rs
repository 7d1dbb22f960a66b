//! Horizontal resolver.
//!
//! Moves the body along its (possibly downslope-adjusted) ground-following
//! direction and reacts to every opposing surface the sweep reports:
//!
//! | Surface                       | Reaction                                   |
//! |-------------------------------|--------------------------------------------|
//! | flat or climbable             | adopt it as ground, latch for vertical step |
//! | unclimbable slope or wall     | zero `velocity.x`                          |
//! | overhang                      | slide along a vertically dampened normal   |
//!
//! Every opposing contact also shortens the move so the body stops
//! `contact_epsilon` short of it.

use glam::Vec2;
use scree::SweepOracle;
use tracing::{debug, trace};

use super::{clamp_travel, opposes, remove_into_surface, SweepContext};
use crate::body::MotionBody;
use crate::classifier::reclassify;
use crate::report::TickEvents;
use crate::state::SurfaceKind;

/// Result of [`resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HorizontalOutcome {
    /// Distance actually moved
    pub travel: f32,
    /// The move ran into climbable ground this tick
    ///
    /// Passed to the vertical step, which then keeps the ground state this
    /// step established instead of reclassifying from its own contacts.
    pub moving_into_climbable: bool,
}

/// Resolve the horizontal displacement `movement` for this tick.
///
/// Moves no longer than `min_move_distance` are skipped entirely: no sweep, no
/// reclassification, and a recorded travel distance of zero.
pub fn resolve<O: SweepOracle + ?Sized>(
    ctx: &SweepContext<'_, O>,
    body: &mut MotionBody,
    movement: Vec2,
    events: &mut TickEvents,
) -> HorizontalOutcome {
    let requested = movement.length();
    if requested <= ctx.config.min_move_distance {
        body.state.record_x_travel(0.0);
        events.insert(TickEvents::MOVE_SKIPPED);
        return HorizontalOutcome::default();
    }

    let direction = movement / requested;
    let epsilon = ctx.contact_epsilon();
    let max_angle = ctx.config.max_climbable_slope_angle;
    let contacts = ctx.sweep(body.position.proposed(), direction, requested + epsilon);

    let mut outcome = HorizontalOutcome {
        travel: requested,
        moving_into_climbable: false,
    };

    for contact in contacts.iter().filter(|c| opposes(c.normal, movement)) {
        let surface = SurfaceKind::from_normal(contact.normal, max_angle);
        match surface {
            SurfaceKind::Flat | SurfaceKind::ClimbableSlope => {
                reclassify(&mut body.state, &mut body.velocity, Some(contact.normal), max_angle);
                outcome.moving_into_climbable = true;
                events.insert(TickEvents::CLIMB_REDIRECTED);
            }
            SurfaceKind::UnclimbableSlope | SurfaceKind::Wall => {
                debug!(%surface, normal = ?contact.normal, "horizontal move blocked");
                body.velocity.x = 0.0;
                events.insert(TickEvents::WALL_BLOCKED);
            }
            SurfaceKind::Overhang => {
                let mut dampened = contact.normal;
                dampened.y *= ctx.config.velocity_resolution_constant;
                if remove_into_surface(&mut body.velocity, dampened) {
                    events.insert(TickEvents::OVERHANG_SLID);
                }
            }
            // Angles from a normal are never negative
            SurfaceKind::Airborne => {}
        }
        outcome.travel = clamp_travel(outcome.travel, contact.distance, epsilon);
    }

    trace!(requested, travel = outcome.travel, "horizontal resolved");
    body.state.record_x_travel(outcome.travel);
    body.position.translate(direction * outcome.travel);
    outcome
}
