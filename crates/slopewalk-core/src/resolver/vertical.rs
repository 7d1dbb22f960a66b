//! Vertical resolver.
//!
//! Sweeps straight up or down by this tick's vertical displacement (plus a
//! small extra margin) and decides whether the body has ground under it.
//!
//! Unless the horizontal step already latched onto climbable ground, the
//! contacts found here drive the ground state: nothing found means airborne,
//! an upward-facing surface is classified as ground or steep slope, and a
//! ceiling stops upward motion. Independently of the latch, velocity pointing
//! into a too-steep surface is removed so the body slides along it.

use glam::Vec2;
use scree::SweepOracle;
use tracing::{debug, trace};

use super::{clamp_travel, opposes, remove_into_surface, SweepContext};
use crate::body::MotionBody;
use crate::classifier::reclassify;
use crate::config::VERTICAL_SWEEP_MARGIN;
use crate::report::TickEvents;
use crate::state::slope_angle;

/// Resolve the vertical displacement `displacement` for this tick.
///
/// A zero displacement sweeps downward. Returns the distance actually moved.
pub fn resolve<O: SweepOracle + ?Sized>(
    ctx: &SweepContext<'_, O>,
    body: &mut MotionBody,
    displacement: f32,
    moving_into_climbable: bool,
    events: &mut TickEvents,
) -> f32 {
    let requested = displacement.abs();
    let direction = if displacement > 0.0 { Vec2::Y } else { Vec2::NEG_Y };
    let epsilon = ctx.contact_epsilon();
    let max_angle = ctx.config.max_climbable_slope_angle;

    let contacts = ctx.sweep(
        body.position.proposed(),
        direction,
        requested + VERTICAL_SWEEP_MARGIN + epsilon,
    );

    if !moving_into_climbable && contacts.is_empty() {
        reclassify(&mut body.state, &mut body.velocity, None, max_angle);
    }

    let mut travel = requested;
    for contact in contacts.iter().filter(|c| opposes(c.normal, direction)) {
        if !moving_into_climbable {
            if slope_angle(contact.normal) < 90.0 {
                reclassify(&mut body.state, &mut body.velocity, Some(contact.normal), max_angle);
            } else {
                debug!(normal = ?contact.normal, "ceiling hit");
                body.velocity.y = 0.0;
                reclassify(&mut body.state, &mut body.velocity, None, max_angle);
                events.insert(TickEvents::CEILING_HIT);
            }
        }

        if body.state.slope_angle > max_angle && remove_into_surface(&mut body.velocity, contact.normal) {
            events.insert(TickEvents::STEEP_PROJECTED);
        }

        travel = clamp_travel(travel, contact.distance, epsilon);
    }

    trace!(requested, travel, grounded = body.state.grounded, "vertical resolved");
    body.position.translate(direction * travel);
    travel
}
