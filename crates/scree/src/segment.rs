//! Terrain segments.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Aabb, CollisionLayers};

/// Index of a segment inside a [`Terrain`](crate::Terrain).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentId(u32);

impl SegmentId {
    /// Creates a new `SegmentId` from a raw index.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentId({})", self.0)
    }
}

/// A two-sided line segment of solid (or trigger) geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint
    pub a: Vec2,
    /// Second endpoint
    pub b: Vec2,
    /// Layers this segment lives on
    pub layers: CollisionLayers,
    /// Triggers are reported only to queries that ask for them
    pub trigger: bool,
}

impl Segment {
    /// Solid terrain segment from `a` to `b`.
    #[must_use]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            a,
            b,
            layers: CollisionLayers::TERRAIN,
            trigger: false,
        }
    }

    /// Set the layers.
    #[must_use]
    pub fn with_layers(mut self, layers: CollisionLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Mark the segment as a trigger.
    #[must_use]
    pub fn as_trigger(mut self) -> Self {
        self.trigger = true;
        self
    }

    /// Vector from `a` to `b`.
    #[must_use]
    pub fn edge(&self) -> Vec2 {
        self.b - self.a
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.edge().length()
    }

    /// Unit normal on the left of `a -> b`.
    ///
    /// Polylines built left to right therefore face up.
    #[must_use]
    pub fn left_normal(&self) -> Vec2 {
        self.edge().perp().normalize_or_zero()
    }

    /// Closest point on the segment to `point`.
    #[must_use]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let edge = self.edge();
        let len_sq = edge.length_squared();
        if len_sq <= f32::EPSILON {
            return self.a;
        }
        let t = ((point - self.a).dot(edge) / len_sq).clamp(0.0, 1.0);
        self.a + edge * t
    }

    /// Bounding box of the segment.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.a, self.b)
    }
}
