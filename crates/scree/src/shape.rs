//! Body shapes that can be swept through the terrain.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Aabb;

/// Shape of a swept body, centered on the query origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    /// Axis-aligned box
    Box {
        /// Half width and half height
        half_extents: Vec2,
    },
    /// Circle
    Circle {
        /// Radius
        radius: f32,
    },
}

impl BodyShape {
    /// Square box with the given half extent.
    #[must_use]
    pub fn square(half_extent: f32) -> Self {
        Self::Box {
            half_extents: Vec2::splat(half_extent),
        }
    }

    /// Half extents of the shape's bounding box.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Self::Box { half_extents } => half_extents,
            Self::Circle { radius } => Vec2::splat(radius),
        }
    }

    /// Bounding box of the shape swept from `origin` by `translation`.
    #[must_use]
    pub fn swept_aabb(&self, origin: Vec2, translation: Vec2) -> Aabb {
        let half = self.half_extents();
        let mut aabb = Aabb::from_points(origin, origin + translation);
        aabb.min -= half;
        aabb.max += half;
        aabb
    }

    /// Whether every dimension is finite and strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Box { half_extents } => {
                half_extents.is_finite() && half_extents.x > 0.0 && half_extents.y > 0.0
            }
            Self::Circle { radius } => radius.is_finite() && radius > 0.0,
        }
    }
}

impl Default for BodyShape {
    fn default() -> Self {
        Self::Box {
            half_extents: Vec2::new(0.25, 0.5),
        }
    }
}
