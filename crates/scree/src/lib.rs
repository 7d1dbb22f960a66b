//! # Scree
//!
//! Static 2D terrain substrate and sweep queries for kinematic bodies.
//!
//! Scree represents walkable ground as a soup of line segments and answers a
//! single kind of question: *if this shape moved from here along that direction,
//! which surfaces would it touch, and how far away are they?* That question is
//! the collision-query oracle a kinematic motion resolver is built on.
//!
//! - **Oracle contract**: [`SweepOracle`], [`SweepQuery`], [`Contact`]
//! - **Filtering**: [`CollisionLayers`] masks and trigger segments
//! - **Shapes**: axis-aligned boxes and circles ([`BodyShape`])
//! - **Terrain**: [`Terrain`] with polyline builders and a broad-phase prefilter
//! - **Generation**: [`generate_hills`] for seeded, reproducible test worlds
//!
//! ## Quick Start
//!
//! ```
//! use glam::Vec2;
//! use scree::{BodyShape, QueryFilter, SweepOracle, SweepQuery, Terrain};
//!
//! let mut terrain = Terrain::new();
//! terrain
//!     .add_polyline(&[Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0)])
//!     .unwrap();
//!
//! let query = SweepQuery {
//!     origin: Vec2::new(0.0, 1.0),
//!     shape: BodyShape::square(0.5),
//!     direction: Vec2::NEG_Y,
//!     max_distance: 2.0,
//!     filter: QueryFilter::default(),
//! };
//!
//! let hits = terrain.sweep(&query);
//! assert_eq!(hits.len(), 1);
//! assert!((hits[0].distance - 0.5).abs() < 1e-5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cast;
pub mod contact;
pub mod generate;
pub mod layers;
pub mod segment;
pub mod shape;
pub mod terrain;

// Re-exports for convenience
pub use contact::{Contact, QueryFilter, SweepOracle, SweepQuery};
pub use generate::{generate_hills, HillsConfig};
pub use layers::CollisionLayers;
pub use segment::{Segment, SegmentId};
pub use shape::BodyShape;
pub use terrain::{Terrain, TerrainError};

use glam::Vec2;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// An inverted box that any `include` call will overwrite.
    pub const EMPTY: Self = Self {
        min: Vec2::splat(f32::INFINITY),
        max: Vec2::splat(f32::NEG_INFINITY),
    };

    /// Create bounds from min/max corners.
    #[must_use]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest box containing both points.
    #[must_use]
    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Grow the box so it contains `point`.
    pub fn include(&mut self, point: Vec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow the box so it contains `other`.
    pub fn merge(&mut self, other: &Aabb) {
        self.include(other.min);
        self.include(other.max);
    }

    /// Pad every side by `amount`.
    #[must_use]
    pub fn expanded(&self, amount: Vec2) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }

    /// Whether the box has never been grown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Check if two boxes overlap (touching counts).
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Check if a point is inside the box.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
