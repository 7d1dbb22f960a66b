//! Seeded procedural terrain.
//!
//! Produces rolling polyline hills whose slopes stay within a configured angle,
//! so tests and benchmarks can walk bodies over varied but reproducible ground.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{Terrain, TerrainError};

/// Parameters for [`generate_hills`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HillsConfig {
    /// RNG seed; equal seeds give identical terrain
    pub seed: u64,
    /// Number of polyline segments
    pub segment_count: usize,
    /// Horizontal width of each segment
    pub segment_width: f32,
    /// Steepest slope, in degrees, a segment may have
    pub max_slope_degrees: f32,
    /// Left end of the polyline
    pub start: Vec2,
    /// Add vertical walls at both ends so bodies cannot walk off
    pub walled: bool,
}

impl Default for HillsConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            segment_count: 64,
            segment_width: 1.0,
            max_slope_degrees: 40.0,
            start: Vec2::ZERO,
            walled: true,
        }
    }
}

impl HillsConfig {
    /// Default hills with the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }
}

/// Generate rolling hills.
///
/// # Errors
///
/// Fails only if the configuration yields degenerate segments (zero width or
/// fewer than one segment).
pub fn generate_hills(config: &HillsConfig) -> Result<Terrain, TerrainError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let max_rise = config.max_slope_degrees.to_radians().tan() * config.segment_width;

    let mut points = Vec::with_capacity(config.segment_count + 1);
    let mut cursor = config.start;
    points.push(cursor);
    for _ in 0..config.segment_count {
        let rise = if max_rise > 0.0 {
            rng.gen_range(-max_rise..=max_rise)
        } else {
            0.0
        };
        cursor += Vec2::new(config.segment_width, rise);
        points.push(cursor);
    }

    let mut terrain = Terrain::new();
    terrain.add_polyline(&points)?;

    if config.walled {
        let top = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max) + 10.0;
        let first = points[0];
        let last = points[points.len() - 1];
        // Left wall faces +x, right wall faces -x
        terrain.add_polyline(&[Vec2::new(first.x, top), first])?;
        terrain.add_polyline(&[last, Vec2::new(last.x, top)])?;
    }

    Ok(terrain)
}
