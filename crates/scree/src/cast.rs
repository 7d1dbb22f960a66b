//! Narrow-phase shape casts against a single segment.
//!
//! Both casts reduce to a ray cast of the shape's center:
//! - box: ray against the Minkowski sum of the segment and the box (a convex
//!   polygon), clipped edge by edge (Cyrus–Beck)
//! - circle: ray against the capsule of the segment inflated by the radius

use glam::Vec2;

use crate::{BodyShape, Segment};

/// Below this, a ray is treated as parallel to an edge.
const PARALLEL_EPS: f32 = 1.0e-9;

/// Result of casting a shape against one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastHit {
    /// Travel distance until first touch (`0.0` when already overlapping)
    pub distance: f32,
    /// Unit normal of the touched feature, facing the shape
    ///
    /// For an initial overlap there is no touched feature; the normal is then
    /// the reverse of the cast direction.
    pub normal: Vec2,
}

/// Cast `shape` from `origin` along unit `direction` against `segment`.
#[must_use]
pub fn cast_shape(
    shape: &BodyShape,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    segment: &Segment,
) -> Option<CastHit> {
    match *shape {
        BodyShape::Box { half_extents } => {
            cast_box(origin, direction, max_distance, half_extents, segment)
        }
        BodyShape::Circle { radius } => cast_circle(origin, direction, max_distance, radius, segment),
    }
}

/// Cast an axis-aligned box against a segment.
#[must_use]
pub fn cast_box(
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    half_extents: Vec2,
    segment: &Segment,
) -> Option<CastHit> {
    let h = half_extents;
    let corners = [
        Vec2::new(-h.x, -h.y),
        Vec2::new(h.x, -h.y),
        Vec2::new(h.x, h.y),
        Vec2::new(-h.x, h.y),
    ];
    let mut points = [Vec2::ZERO; 8];
    for (i, corner) in corners.iter().enumerate() {
        points[i] = segment.a + *corner;
        points[i + 4] = segment.b + *corner;
    }
    let hull = convex_hull(&mut points);
    ray_vs_convex(origin, direction, max_distance, &hull)
}

/// Cast a circle against a segment.
#[must_use]
pub fn cast_circle(
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    radius: f32,
    segment: &Segment,
) -> Option<CastHit> {
    // Already overlapping
    let closest = segment.closest_point(origin);
    let offset = origin - closest;
    if offset.length_squared() < radius * radius {
        return Some(CastHit {
            distance: 0.0,
            normal: -direction,
        });
    }

    let mut best: Option<CastHit> = None;
    let mut consider = |hit: CastHit| {
        if best.map_or(true, |b| hit.distance < b.distance) {
            best = Some(hit);
        }
    };

    // Flat side of the capsule facing the origin
    let normal = facing_normal(segment, origin - segment.a);
    let denom = normal.dot(direction);
    if denom < -PARALLEL_EPS {
        let t = (normal.dot(origin - segment.a) - radius) / -denom;
        let center = origin + direction * t;
        let edge = segment.edge();
        let u = (center - segment.a).dot(edge) / edge.length_squared();
        if (0.0..=1.0).contains(&u) && t >= 0.0 {
            consider(CastHit {
                distance: t,
                normal,
            });
        }
    }

    // Rounded caps
    for cap in [segment.a, segment.b] {
        if let Some(t) = ray_vs_circle(origin, direction, cap, radius) {
            let normal = (origin + direction * t - cap).normalize_or_zero();
            consider(CastHit {
                distance: t,
                normal,
            });
        }
    }

    best.filter(|hit| hit.distance <= max_distance)
}

/// Segment normal on the same side as `toward`.
fn facing_normal(segment: &Segment, toward: Vec2) -> Vec2 {
    let normal = segment.left_normal();
    if normal.dot(toward) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Entry distance of a ray into a circle, if it enters ahead of the origin.
fn ray_vs_circle(origin: Vec2, direction: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let m = origin - center;
    let b = m.dot(direction);
    let c = m.length_squared() - radius * radius;
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some((-b - disc.sqrt()).max(0.0))
}

/// Counter-clockwise convex hull (monotone chain). Collinear points are dropped.
fn convex_hull(points: &mut [Vec2]) -> Vec<Vec2> {
    points.sort_by(|p, q| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)));

    let cross = |o: Vec2, a: Vec2, b: Vec2| (a - o).perp_dot(b - o);
    let mut hull: Vec<Vec2> = Vec::with_capacity(points.len() + 1);

    for &p in points.iter() {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Clip a ray against a CCW convex polygon.
fn ray_vs_convex(origin: Vec2, direction: Vec2, max_distance: f32, hull: &[Vec2]) -> Option<CastHit> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = Vec2::ZERO;

    for (i, &p) in hull.iter().enumerate() {
        let q = hull[(i + 1) % hull.len()];
        let edge = q - p;
        let Some(normal) = Vec2::new(edge.y, -edge.x).try_normalize() else {
            continue;
        };

        let outside = normal.dot(origin - p);
        let denom = normal.dot(direction);
        if denom.abs() < PARALLEL_EPS {
            if outside > 0.0 {
                return None;
            }
            continue;
        }

        let t = -outside / denom;
        if denom < 0.0 {
            if t > t_enter {
                t_enter = t;
                enter_normal = normal;
            }
        } else {
            t_exit = t_exit.min(t);
        }
    }

    if enter_normal == Vec2::ZERO || t_enter > t_exit || t_exit <= 0.0 || t_enter > max_distance {
        return None;
    }

    // Origin already inside the hull
    if t_enter < 0.0 {
        return Some(CastHit {
            distance: 0.0,
            normal: -direction,
        });
    }

    Some(CastHit {
        distance: t_enter,
        normal: enter_normal,
    })
}
