//! Tunable constants and the environment a body moves in.
//!
//! Two structs split the inputs by who owns them:
//! - [`MotionConfig`]: designer-facing tuning for a kind of body
//! - [`Environment`]: world-supplied gravity, tick length, and contact offset
//!
//! Both load from partial JSON (missing keys fall back to defaults) and are
//! checked with `validate()` before use.
//!
//! # Example
//!
//! ```
//! use slopewalk_core::config::MotionConfig;
//!
//! let config = MotionConfig::from_json_str(r#"{ "max_climbable_slope_angle": 50.0 }"#).unwrap();
//! assert_eq!(config.max_climbable_slope_angle, 50.0);
//! assert!(config.preserve_x_vel_downslope);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vertical velocity applied whenever the body lands on climbable ground.
///
/// Keeps a small downward push so the next vertical sweep finds the ground again.
pub const GROUNDING_BIAS: f32 = -0.1;

/// Extra depth the slope snap settles below the body before sweeping back.
pub const SNAP_SETTLE_DEPTH: f32 = 0.1;

/// Extra length added to every vertical sweep.
pub const VERTICAL_SWEEP_MARGIN: f32 = 0.005;

/// Travel counts as downslope only when `dir.y * velocity.x` is below minus this.
pub const DOWNSLOPE_EPSILON: f32 = 1.0e-4;

/// Smallest horizontal component of a ground-following direction that may be
/// divided by when preserving horizontal speed downslope.
pub const MIN_FOLLOW_X: f32 = 1.0e-4;

/// Per-component tolerance when comparing ground-following directions.
pub const DIRECTION_TOLERANCE: f32 = 1.0e-5;

/// Fixed tick length (1/60 second).
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Errors raised by configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Slope limit must lie in `[0, 90)`
    #[error("max_climbable_slope_angle must be in [0, 90), got {0}")]
    SlopeAngleOutOfRange(f32),
    /// Resolution constant must lie in `[0, 1]`
    #[error("velocity_resolution_constant must be in [0, 1], got {0}")]
    ResolutionConstantOutOfRange(f32),
    /// A value that must not be negative was
    #[error("{name} must not be negative, got {value}")]
    Negative {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f32,
    },
    /// Tick length must be strictly positive
    #[error("tick_duration must be positive, got {0}")]
    NonPositiveTick(f32),
    /// NaN or infinity in a field
    #[error("{0} must be finite")]
    NonFinite(&'static str),
    /// JSON could not be parsed
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

fn finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite(name))
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if finite(name, value)? < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}

// =============================================================================
// MotionConfig
// =============================================================================

/// Designer tuning for slope-following motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Steepest surface, in degrees from up, that counts as ground.
    pub max_climbable_slope_angle: f32,
    /// Slope snapping is skipped while vertical velocity is above this
    /// (so jumps and launches are never pulled back onto the slope).
    pub slope_snap_y_vel_threshold: f32,
    /// Scales the vertical part of an overhang normal before sliding along it.
    pub velocity_resolution_constant: f32,
    /// Scales environment gravity for this body.
    pub gravity_multiplier: f32,
    /// Keep horizontal speed exact when walking downhill.
    pub preserve_x_vel_downslope: bool,
    /// Downhill speed factor used when `preserve_x_vel_downslope` is off.
    pub downslope_vel_multiplier: f32,
    /// Horizontal moves no longer than this are skipped.
    pub min_move_distance: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_climbable_slope_angle: 45.0,
            slope_snap_y_vel_threshold: 0.0,
            velocity_resolution_constant: 0.5,
            gravity_multiplier: 1.0,
            preserve_x_vel_downslope: true,
            downslope_vel_multiplier: 1.25,
            min_move_distance: 0.001,
        }
    }
}

impl MotionConfig {
    /// Parse from JSON, filling missing keys with defaults, then validate.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, or any validation error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field is in range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let angle = finite("max_climbable_slope_angle", self.max_climbable_slope_angle)?;
        if !(0.0..90.0).contains(&angle) {
            return Err(ConfigError::SlopeAngleOutOfRange(angle));
        }
        let k = finite("velocity_resolution_constant", self.velocity_resolution_constant)?;
        if !(0.0..=1.0).contains(&k) {
            return Err(ConfigError::ResolutionConstantOutOfRange(k));
        }
        finite("slope_snap_y_vel_threshold", self.slope_snap_y_vel_threshold)?;
        finite("gravity_multiplier", self.gravity_multiplier)?;
        non_negative("downslope_vel_multiplier", self.downslope_vel_multiplier)?;
        non_negative("min_move_distance", self.min_move_distance)?;
        Ok(())
    }
}

// =============================================================================
// Environment
// =============================================================================

/// World-supplied inputs shared by every body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Gravity acceleration (before each body's multiplier).
    pub gravity: Vec2,
    /// Fixed tick length in seconds.
    pub tick_duration: f32,
    /// Gap kept between the body and any surface after a resolved move.
    pub contact_epsilon: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            tick_duration: FIXED_DT,
            contact_epsilon: 0.01,
        }
    }
}

impl Environment {
    /// Default environment with a custom tick length.
    ///
    /// Useful for tests with easy arithmetic.
    #[must_use]
    pub fn with_dt(tick_duration: f32) -> Self {
        Self {
            tick_duration,
            ..Default::default()
        }
    }

    /// Parse from JSON, filling missing keys with defaults, then validate.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, or any validation error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let env: Self = serde_json::from_str(json)?;
        env.validate()?;
        Ok(env)
    }

    /// Check every field is in range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFinite("gravity"));
        }
        let dt = finite("tick_duration", self.tick_duration)?;
        if dt <= 0.0 {
            return Err(ConfigError::NonPositiveTick(dt));
        }
        non_negative("contact_epsilon", self.contact_epsilon)?;
        Ok(())
    }
}
