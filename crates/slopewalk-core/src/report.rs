//! Per-tick telemetry.
//!
//! [`MotionBody::step`](crate::body::MotionBody::step) returns a [`TickReport`]
//! describing what happened: which branches of the resolvers fired and how far
//! the body actually travelled. Gameplay code reads it for landing sounds,
//! wall-bump effects and the like; tests read it to assert on behavior.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Things that happened during one tick.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TickEvents: u16 {
        /// Went from ungrounded to grounded
        const LANDED = 1 << 0;
        /// Went from grounded to ungrounded
        const LEFT_GROUND = 1 << 1;
        /// Horizontal move ran into climbable ground and adopted it
        const CLIMB_REDIRECTED = 1 << 2;
        /// Horizontal move hit a wall or unclimbable slope; `velocity.x` zeroed
        const WALL_BLOCKED = 1 << 3;
        /// Horizontal move slid velocity along an overhang
        const OVERHANG_SLID = 1 << 4;
        /// Vertical move struck a ceiling; `velocity.y` zeroed
        const CEILING_HIT = 1 << 5;
        /// Vertical move removed velocity pointing into a steep surface
        const STEEP_PROJECTED = 1 << 6;
        /// Slope snap put the body back on ground
        const SNAPPED = 1 << 7;
        /// Slope snap found nothing; exit velocity coupled to the old slope
        const LEDGE_RELEASED = 1 << 8;
        /// Great-slope clamp forced horizontal speed away from a steep surface
        const GREAT_SLOPE_CLAMPED = 1 << 9;
        /// Downslope speed preservation was skipped on a near-vertical direction
        const DOWNSLOPE_GUARDED = 1 << 10;
        /// Horizontal move was below the minimum and skipped
        const MOVE_SKIPPED = 1 << 11;
    }
}

/// Outcome of one tick for one body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Events raised this tick
    pub events: TickEvents,
    /// Distance travelled by the horizontal step
    pub horizontal_travel: f32,
    /// Distance travelled by the vertical step
    pub vertical_travel: f32,
    /// Committed position before the tick
    pub start: Vec2,
    /// Committed position after the tick
    pub end: Vec2,
}

impl TickReport {
    /// Net displacement over the tick.
    #[must_use]
    pub fn displacement(&self) -> Vec2 {
        self.end - self.start
    }

    /// Shorthand for `self.events.contains(event)`.
    #[must_use]
    pub fn has(&self, event: TickEvents) -> bool {
        self.events.contains(event)
    }
}
