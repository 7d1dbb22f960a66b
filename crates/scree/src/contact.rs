//! The sweep oracle contract.
//!
//! A [`SweepOracle`] answers "what would this shape touch if it moved from
//! `origin` along `direction` for at most `max_distance`?". Motion code depends
//! only on this trait, never on how the geometry is stored.
//!
//! # Contract
//!
//! - Every surface the shape would touch within `max_distance` is reported once.
//! - Contacts come back in no particular order.
//! - A shape that already overlaps a surface reports it at distance `0.0`,
//!   with the reverse of the sweep direction as its normal.
//! - `normal` is a unit vector pointing out of the surface, toward the body.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{BodyShape, CollisionLayers};

/// One surface touched by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Unit surface normal, facing the swept body
    pub normal: Vec2,
    /// Travel distance along the sweep direction until first touch
    pub distance: f32,
}

impl Contact {
    /// Create a contact.
    #[must_use]
    pub fn new(normal: Vec2, distance: f32) -> Self {
        Self { normal, distance }
    }
}

/// Which segments a query can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Only segments sharing a bit with this mask are reported
    pub mask: CollisionLayers,
    /// Whether trigger segments are reported
    pub include_triggers: bool,
}

impl QueryFilter {
    /// Filter that sees every layer but no triggers.
    #[must_use]
    pub fn all_solid() -> Self {
        Self {
            mask: CollisionLayers::all(),
            include_triggers: false,
        }
    }

    /// Whether a segment on `layers` with the given trigger flag passes.
    #[must_use]
    pub fn accepts(&self, layers: CollisionLayers, trigger: bool) -> bool {
        (self.include_triggers || !trigger) && layers.collides_with(self.mask)
    }
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            mask: CollisionLayers::TERRAIN,
            include_triggers: false,
        }
    }
}

/// A shape cast request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepQuery {
    /// Center of the shape at the start of the sweep
    pub origin: Vec2,
    /// Shape being swept
    pub shape: BodyShape,
    /// Unit direction of travel
    pub direction: Vec2,
    /// Furthest distance to look
    pub max_distance: f32,
    /// Layer and trigger filtering
    pub filter: QueryFilter,
}

/// Geometric query service used by motion resolvers.
pub trait SweepOracle {
    /// Report every surface touched by sweeping `query.shape`.
    fn sweep(&self, query: &SweepQuery) -> Vec<Contact>;
}

impl<T: SweepOracle + ?Sized> SweepOracle for &T {
    fn sweep(&self, query: &SweepQuery) -> Vec<Contact> {
        (**self).sweep(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_rejects_triggers_by_default() {
        let filter = QueryFilter::default();
        assert!(filter.accepts(CollisionLayers::TERRAIN, false));
        assert!(!filter.accepts(CollisionLayers::TERRAIN, true));
        assert!(!filter.accepts(CollisionLayers::PROPS, false));
    }

    #[test]
    fn filter_all_solid_sees_every_layer() {
        let filter = QueryFilter::all_solid();
        assert!(filter.accepts(CollisionLayers::PROPS, false));
        assert!(filter.accepts(CollisionLayers::CUSTOM, false));
    }

    #[test]
    fn contact_is_serializable() {
        let contact = Contact::new(Vec2::Y, 0.25);
        let json = serde_json::to_string(&contact).unwrap();
        let back: Contact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, contact);
    }
}
