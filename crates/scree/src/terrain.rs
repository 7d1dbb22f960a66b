//! Terrain: a static segment soup answering sweep queries.
//!
//! Segments are kept in insertion order, each with a cached bounding box. A
//! sweep first rejects segments whose box misses the swept box of the query
//! shape, then runs the narrow-phase cast on the rest.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::cast::cast_shape;
use crate::contact::{Contact, SweepOracle, SweepQuery};
use crate::{Aabb, CollisionLayers, Segment, SegmentId};

/// Shortest segment the terrain accepts.
pub const MIN_SEGMENT_LENGTH: f32 = 1.0e-4;

/// Errors raised while building terrain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    /// An endpoint was NaN or infinite
    #[error("segment endpoint {0:?} is not finite")]
    NonFinite(Vec2),
    /// Both endpoints (nearly) coincide
    #[error("segment from {a:?} to {b:?} is too short")]
    Degenerate {
        /// First endpoint
        a: Vec2,
        /// Second endpoint
        b: Vec2,
    },
    /// A polyline needs at least two points
    #[error("polyline needs at least 2 points, got {0}")]
    PolylineTooShort(usize),
}

/// Static 2D collision geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Terrain {
    segments: Vec<Segment>,
    #[serde(skip)]
    boxes: Vec<Aabb>,
    #[serde(skip)]
    bounds: Aabb,
}

impl Terrain {
    /// Create empty terrain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build terrain from a list of segments.
    ///
    /// # Errors
    ///
    /// Returns the first [`TerrainError`] raised by [`Terrain::add_segment`].
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Result<Self, TerrainError> {
        let mut terrain = Self::new();
        for segment in segments {
            terrain.add_segment(segment)?;
        }
        Ok(terrain)
    }

    /// Add one segment.
    ///
    /// # Errors
    ///
    /// Rejects non-finite endpoints and segments shorter than
    /// [`MIN_SEGMENT_LENGTH`].
    pub fn add_segment(&mut self, segment: Segment) -> Result<SegmentId, TerrainError> {
        for point in [segment.a, segment.b] {
            if !point.is_finite() {
                return Err(TerrainError::NonFinite(point));
            }
        }
        if segment.length() < MIN_SEGMENT_LENGTH {
            return Err(TerrainError::Degenerate {
                a: segment.a,
                b: segment.b,
            });
        }

        let id = SegmentId::new(u32::try_from(self.segments.len()).unwrap_or(u32::MAX));
        let aabb = segment.aabb();
        self.bounds.merge(&aabb);
        self.boxes.push(aabb);
        self.segments.push(segment);
        Ok(id)
    }

    /// Add a connected run of terrain segments on [`CollisionLayers::TERRAIN`].
    ///
    /// Points ordered left to right produce upward-facing ground.
    ///
    /// # Errors
    ///
    /// Fails on fewer than two points or on any invalid segment. Segments added
    /// before the failing one stay in the terrain.
    pub fn add_polyline(&mut self, points: &[Vec2]) -> Result<Vec<SegmentId>, TerrainError> {
        self.add_polyline_on(points, CollisionLayers::TERRAIN)
    }

    /// Like [`Terrain::add_polyline`], on the given layers.
    ///
    /// # Errors
    ///
    /// See [`Terrain::add_polyline`].
    pub fn add_polyline_on(
        &mut self,
        points: &[Vec2],
        layers: CollisionLayers,
    ) -> Result<Vec<SegmentId>, TerrainError> {
        if points.len() < 2 {
            return Err(TerrainError::PolylineTooShort(points.len()));
        }
        points
            .windows(2)
            .map(|pair| self.add_segment(Segment::new(pair[0], pair[1]).with_layers(layers)))
            .collect()
    }

    /// All segments in insertion order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Look up a segment.
    #[must_use]
    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the terrain has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Bounds of all segments.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Recompute cached boxes; needed after deserializing.
    pub fn rebuild_cache(&mut self) {
        self.boxes = self.segments.iter().map(Segment::aabb).collect();
        self.bounds = Aabb::EMPTY;
        for aabb in &self.boxes {
            self.bounds.merge(aabb);
        }
    }

    /// Highest solid ground directly under (or at) `x`, if any.
    #[must_use]
    pub fn height_at(&self, x: f32) -> Option<f32> {
        self.segments
            .iter()
            .filter(|s| !s.trigger && s.a.x.min(s.b.x) <= x && x <= s.a.x.max(s.b.x))
            .filter_map(|s| {
                let dx = s.b.x - s.a.x;
                if dx.abs() < f32::EPSILON {
                    Some(s.a.y.max(s.b.y))
                } else {
                    Some(s.a.y + (x - s.a.x) / dx * (s.b.y - s.a.y))
                }
            })
            .reduce(f32::max)
    }
}

impl SweepOracle for Terrain {
    fn sweep(&self, query: &SweepQuery) -> Vec<Contact> {
        let swept = query
            .shape
            .swept_aabb(query.origin, query.direction * query.max_distance);

        let mut contacts = Vec::new();
        // Fall back to a linear scan when the cache is stale (fresh from serde)
        let cached = self.boxes.len() == self.segments.len();
        for (i, segment) in self.segments.iter().enumerate() {
            if !query.filter.accepts(segment.layers, segment.trigger) {
                continue;
            }
            let aabb = if cached { self.boxes[i] } else { segment.aabb() };
            if !aabb.intersects(&swept) {
                continue;
            }
            if let Some(hit) = cast_shape(
                &query.shape,
                query.origin,
                query.direction,
                query.max_distance,
                segment,
            ) {
                contacts.push(Contact::new(hit.normal, hit.distance));
            }
        }

        trace!(
            origin = ?query.origin,
            direction = ?query.direction,
            max_distance = query.max_distance,
            hits = contacts.len(),
            "terrain sweep"
        );
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BodyShape, QueryFilter};

    fn query(origin: Vec2, direction: Vec2, max_distance: f32) -> SweepQuery {
        SweepQuery {
            origin,
            shape: BodyShape::square(0.5),
            direction,
            max_distance,
            filter: QueryFilter::default(),
        }
    }

    mod build_tests {
        use super::*;

        #[test]
        fn rejects_degenerate_segment() {
            let mut terrain = Terrain::new();
            let err = terrain
                .add_segment(Segment::new(Vec2::ONE, Vec2::ONE))
                .unwrap_err();
            assert!(matches!(err, TerrainError::Degenerate { .. }));
        }

        #[test]
        fn rejects_non_finite_segment() {
            let mut terrain = Terrain::new();
            let err = terrain
                .add_segment(Segment::new(Vec2::new(f32::NAN, 0.0), Vec2::ONE))
                .unwrap_err();
            assert!(matches!(err, TerrainError::NonFinite(_)));
        }

        #[test]
        fn rejects_short_polyline() {
            let mut terrain = Terrain::new();
            assert_eq!(
                terrain.add_polyline(&[Vec2::ZERO]).unwrap_err(),
                TerrainError::PolylineTooShort(1)
            );
        }

        #[test]
        fn polyline_adds_one_segment_per_pair() {
            let mut terrain = Terrain::new();
            let ids = terrain
                .add_polyline(&[Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0)])
                .unwrap();
            assert_eq!(ids.len(), 2);
            assert_eq!(terrain.len(), 2);
            assert_eq!(terrain.bounds().max, Vec2::new(2.0, 1.0));
        }

        #[test]
        fn error_messages_are_readable() {
            let msg = TerrainError::PolylineTooShort(0).to_string();
            assert!(msg.contains("at least 2 points"));
        }
    }

    mod sweep_tests {
        use super::*;

        #[test]
        fn reports_every_touched_segment() {
            let mut terrain = Terrain::new();
            terrain
                .add_polyline(&[Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0)])
                .unwrap();
            terrain
                .add_segment(Segment::new(Vec2::new(-5.0, -1.0), Vec2::new(5.0, -1.0)))
                .unwrap();
            let hits = terrain.sweep(&query(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 5.0));
            assert_eq!(hits.len(), 2);
        }

        #[test]
        fn broad_phase_skips_far_segments() {
            let mut terrain = Terrain::new();
            terrain
                .add_segment(Segment::new(Vec2::new(100.0, 0.0), Vec2::new(110.0, 0.0)))
                .unwrap();
            assert!(terrain
                .sweep(&query(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 5.0))
                .is_empty());
        }

        #[test]
        fn filter_hides_other_layers_and_triggers() {
            let mut terrain = Terrain::new();
            terrain
                .add_segment(
                    Segment::new(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0))
                        .with_layers(CollisionLayers::PROPS),
                )
                .unwrap();
            terrain
                .add_segment(Segment::new(Vec2::new(-5.0, 1.0), Vec2::new(5.0, 1.0)).as_trigger())
                .unwrap();
            assert!(terrain
                .sweep(&query(Vec2::new(0.0, 3.0), Vec2::NEG_Y, 5.0))
                .is_empty());

            let mut q = query(Vec2::new(0.0, 3.0), Vec2::NEG_Y, 5.0);
            q.filter = QueryFilter {
                mask: CollisionLayers::all(),
                include_triggers: true,
            };
            assert_eq!(terrain.sweep(&q).len(), 2);
        }

        #[test]
        fn sweep_works_after_serde_round_trip() {
            let mut terrain = Terrain::new();
            terrain
                .add_polyline(&[Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0)])
                .unwrap();
            let json = serde_json::to_string(&terrain).unwrap();
            let mut back: Terrain = serde_json::from_str(&json).unwrap();
            assert_eq!(back.sweep(&query(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 5.0)).len(), 1);
            back.rebuild_cache();
            assert_eq!(back.bounds(), terrain.bounds());
            assert_eq!(back.sweep(&query(Vec2::new(0.0, 2.0), Vec2::NEG_Y, 5.0)).len(), 1);
        }
    }

    mod property_tests {
        use super::*;
        use crate::{generate_hills, HillsConfig};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn dropped_box_lands_on_generated_hills(
                seed in any::<u64>(),
                x in 2.0f32..60.0,
                slope in 0.0f32..60.0
            ) {
                let terrain = generate_hills(&HillsConfig {
                    max_slope_degrees: slope,
                    ..HillsConfig::with_seed(seed)
                })
                .unwrap();
                let ground = terrain.height_at(x).unwrap();

                let contacts = terrain.sweep(&query(Vec2::new(x, ground + 20.0), Vec2::NEG_Y, 40.0));

                prop_assert!(!contacts.is_empty());
                for contact in &contacts {
                    prop_assert!(contact.distance >= 0.0 && contact.distance <= 40.0);
                    prop_assert!((contact.normal.length() - 1.0).abs() < 1.0e-3);
                }
                let nearest = contacts.iter().map(|c| c.distance).fold(f32::INFINITY, f32::min);
                // The box bottom stops at or above the ground under its center
                prop_assert!(nearest <= 20.0 - 0.5 + 1.0e-3);
            }

            #[test]
            fn generated_slopes_respect_the_limit(
                seed in any::<u64>(),
                slope in 0.0f32..80.0
            ) {
                let config = HillsConfig {
                    max_slope_degrees: slope,
                    walled: false,
                    ..HillsConfig::with_seed(seed)
                };
                let terrain = generate_hills(&config).unwrap();

                prop_assert_eq!(terrain.len(), config.segment_count);
                for segment in terrain.segments() {
                    let edge = segment.b - segment.a;
                    let degrees = edge.y.abs().atan2(edge.x).to_degrees();
                    prop_assert!(degrees <= slope + 1.0e-2, "{} > {}", degrees, slope);
                }
            }
        }
    }

    #[test]
    fn height_at_interpolates() {
        let mut terrain = Terrain::new();
        terrain
            .add_polyline(&[Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0), Vec2::new(4.0, 2.0)])
            .unwrap();
        assert!((terrain.height_at(1.0).unwrap() - 1.0).abs() < 1e-6);
        assert!((terrain.height_at(3.0).unwrap() - 2.0).abs() < 1e-6);
        assert!(terrain.height_at(10.0).is_none());
    }
}
