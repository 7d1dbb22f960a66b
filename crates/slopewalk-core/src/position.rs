//! Two-phase body position.
//!
//! A tick works on a scratch `proposed` position and publishes it once, at the
//! end, with [`StagedPosition::commit`]. Anything outside the tick (other
//! bodies, gameplay readers, determinism hashes) only ever sees `committed`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Committed position plus the in-flight proposal for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StagedPosition {
    committed: Vec2,
    proposed: Vec2,
}

impl StagedPosition {
    /// Start at `position` with nothing in flight.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            committed: position,
            proposed: position,
        }
    }

    /// Last published position.
    #[must_use]
    pub fn committed(&self) -> Vec2 {
        self.committed
    }

    /// Position being built up by the current tick.
    #[must_use]
    pub fn proposed(&self) -> Vec2 {
        self.proposed
    }

    /// Whether the proposal differs from the committed position.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.committed != self.proposed
    }

    /// Move the proposal.
    pub fn translate(&mut self, delta: Vec2) {
        self.proposed += delta;
    }

    /// Replace the proposal (used to restore a saved position).
    pub fn set_proposed(&mut self, position: Vec2) {
        self.proposed = position;
    }

    /// Drop the proposal and start again from the committed position.
    pub fn discard(&mut self) {
        self.proposed = self.committed;
    }

    /// Publish the proposal. Returns the displacement since the last commit.
    pub fn commit(&mut self) -> Vec2 {
        let delta = self.proposed - self.committed;
        self.committed = self.proposed;
        delta
    }

    /// Teleport: set both positions at once.
    pub fn reset(&mut self, position: Vec2) {
        *self = Self::new(position);
    }
}

impl Default for StagedPosition {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}
