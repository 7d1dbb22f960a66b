//! Collision layer masks.
//!
//! Every segment lives on one or more layers and every query carries a mask.
//! A segment is visible to a query when the two share at least one bit.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Layers a segment belongs to, or a query collides with.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        /// Solid level geometry
        const TERRAIN = 1 << 0;
        /// Geometry that only some bodies collide with (one-off props, gates)
        const PROPS = 1 << 1;
        /// Geometry reserved for designer-defined uses
        const CUSTOM = 1 << 2;
    }
}

impl CollisionLayers {
    /// Whether a segment on `self` is visible to a query masked with `mask`.
    #[must_use]
    pub fn collides_with(self, mask: CollisionLayers) -> bool {
        self.intersects(mask)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::TERRAIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_terrain() {
        assert_eq!(CollisionLayers::default(), CollisionLayers::TERRAIN);
    }

    #[test]
    fn collision_requires_shared_bit() {
        let segment = CollisionLayers::TERRAIN | CollisionLayers::PROPS;
        assert!(segment.collides_with(CollisionLayers::PROPS));
        assert!(!CollisionLayers::CUSTOM.collides_with(CollisionLayers::TERRAIN));
        assert!(!segment.collides_with(CollisionLayers::empty()));
    }
}
