//! Slope snap.
//!
//! Walking over a crest from one slope onto another leaves the body a sliver
//! above the new surface, so the vertical step reports "airborne" for a tick.
//! The snap lowers the body by up to `contact_epsilon + SNAP_SETTLE_DEPTH`,
//! stopping `contact_epsilon` short of anything below so it never starts the
//! next sweep inside the terrain, and then sweeps back along the direction it
//! just travelled. A climbable surface with a different orientation found
//! there is adopted as the new ground. When the back sweep's nearest hit does
//! not qualify, the surface found below is tried the same way.
//!
//! Otherwise the body has really walked off a ledge, and its vertical velocity
//! inherits the old slope's rise so it leaves on a continuous trajectory.

use glam::Vec2;
use scree::{Contact, SweepOracle};
use tracing::debug;

use super::{clamp_travel, SweepContext};
use crate::body::MotionBody;
use crate::classifier::reclassify;
use crate::config::{DIRECTION_TOLERANCE, SNAP_SETTLE_DEPTH};
use crate::report::TickEvents;
use crate::state::{following_dir, slope_angle};

/// Result of [`snap_to_slope`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapOutcome {
    /// Conditions for a snap were not met; nothing changed
    NotNeeded,
    /// Body was placed back on ground, moving `distance` along the back sweep
    Snapped {
        /// Distance moved along the back sweep (zero when the surface below was adopted)
        distance: f32,
    },
    /// No new ground found; position restored, exit velocity coupled to the old slope
    Released,
}

/// Whether the body just became airborne in a way a snap could undo.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn should_snap(body: &MotionBody, y_vel_threshold: f32) -> bool {
    let state = &body.state;
    state.slope_angle != state.prev_slope_angle
        && state.is_airborne()
        && body.velocity.y <= y_vel_threshold
}

/// Nearest contact with a usable normal, as `(distance, unit normal)`.
fn nearest(contacts: &[Contact]) -> Option<(f32, Vec2)> {
    contacts
        .iter()
        .filter_map(|c| c.normal.try_normalize().map(|n| (c.distance, n)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
}

/// Whether `normal` is climbable ground oriented differently from the ground
/// the body just left.
fn is_new_ground(body: &MotionBody, normal: Vec2, max_angle: f32) -> bool {
    let changed = !following_dir(normal).abs_diff_eq(body.state.prev_ground_following_dir, DIRECTION_TOLERANCE);
    slope_angle(normal) <= max_angle && changed
}

/// Try to put the body back on a slope it just crossed onto.
///
/// `directed_move` is the ground-following direction used this tick, signed by
/// the direction of horizontal travel; the back sweep runs opposite to it.
pub fn snap_to_slope<O: SweepOracle + ?Sized>(
    ctx: &SweepContext<'_, O>,
    body: &mut MotionBody,
    directed_move: Vec2,
    events: &mut TickEvents,
) -> SnapOutcome {
    if !should_snap(body, ctx.config.slope_snap_y_vel_threshold) {
        return SnapOutcome::NotNeeded;
    }

    let epsilon = ctx.contact_epsilon();
    let max_angle = ctx.config.max_climbable_slope_angle;
    let saved = body.position.proposed();

    let depth = epsilon + SNAP_SETTLE_DEPTH;
    let below = nearest(&ctx.sweep(saved, Vec2::NEG_Y, depth));
    let drop = below.map_or(depth, |(distance, _)| clamp_travel(depth, distance, epsilon));
    body.position.translate(Vec2::new(0.0, -drop));

    if let Some(back) = (-directed_move).try_normalize() {
        let contacts = ctx.sweep(
            body.position.proposed(),
            back,
            body.state.last_x_travel_distance + epsilon,
        );
        if let Some((distance, normal)) = nearest(&contacts) {
            if distance >= 0.0 && is_new_ground(body, normal, max_angle) {
                let distance = (distance - epsilon).max(0.0);
                body.position.translate(back * distance);
                reclassify(&mut body.state, &mut body.velocity, Some(normal), max_angle);
                debug!(distance, angle = body.state.slope_angle, "snapped onto slope");
                events.insert(TickEvents::SNAPPED);
                return SnapOutcome::Snapped { distance };
            }
        }
    }

    if let Some((_, normal)) = below.filter(|&(_, n)| is_new_ground(body, n, max_angle)) {
        reclassify(&mut body.state, &mut body.velocity, Some(normal), max_angle);
        debug!(drop, angle = body.state.slope_angle, "snapped onto surface below");
        events.insert(TickEvents::SNAPPED);
        return SnapOutcome::Snapped { distance: 0.0 };
    }

    body.position.set_proposed(saved);
    body.velocity.y += body.state.prev_ground_following_dir.y * body.velocity.x;
    debug!(vy = body.velocity.y, "left ground over ledge");
    events.insert(TickEvents::LEDGE_RELEASED);
    SnapOutcome::Released
}
