//! Per-tick input hooks.
//!
//! A [`Driver`] is attached to a body in a [`World`](crate::simulation::World)
//! and runs once per tick before the body moves. It reads the body's committed
//! state and emits [`Command`]s, which are applied in emission order.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use slopewalk_core::body::MotionBody;
//! use slopewalk_core::driver::{Command, Driver, DriverContext};
//!
//! /// Walks right, jumping whenever it stands on ground.
//! struct Hopper;
//!
//! impl Driver for Hopper {
//!     fn name(&self) -> &str {
//!         "hopper"
//!     }
//!
//!     fn commands(&self, _ctx: &DriverContext, body: &MotionBody) -> Vec<Command> {
//!         let mut out = vec![Command::SetHorizontalVelocity(3.0)];
//!         if body.grounded() {
//!             out.push(Command::AddVelocity(Vec2::new(0.0, 5.0)));
//!         }
//!         out
//!     }
//! }
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::body::MotionBody;
use crate::simulation::BodyId;

/// A velocity change requested before a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replace the whole velocity
    SetVelocity(Vec2),
    /// Replace only the horizontal component
    SetHorizontalVelocity(f32),
    /// Add to the velocity
    AddVelocity(Vec2),
}

impl Command {
    /// Apply to `body`.
    pub fn apply(self, body: &mut MotionBody) {
        match self {
            Self::SetVelocity(v) => body.set_velocity(v),
            Self::SetHorizontalVelocity(vx) => body.set_horizontal_velocity(vx),
            Self::AddVelocity(dv) => body.add_velocity(dv),
        }
    }

    /// Whether every value carried by the command is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::SetVelocity(v) | Self::AddVelocity(v) => v.is_finite(),
            Self::SetHorizontalVelocity(vx) => vx.is_finite(),
        }
    }
}

/// What a driver knows about the tick it runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverContext {
    /// Body being driven
    pub body: BodyId,
    /// Tick about to run
    pub tick: u64,
}

/// Per-tick hook that steers a body.
///
/// Drivers of different bodies run in parallel, so they must be `Send + Sync`
/// and must not depend on call order between bodies.
pub trait Driver: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Commands to apply before this tick's motion.
    fn commands(&self, ctx: &DriverContext, body: &MotionBody) -> Vec<Command>;
}
