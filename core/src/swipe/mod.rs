//! Card swipe interaction, independent of any UI toolkit.
//!
//! The rendering layer feeds pointer translation and frame ticks into a
//! [`SwipeController`] and reads back the offset and [`CardVisuals`].

mod controller;
mod spring;
mod visuals;

pub use controller::{Release, SwipeController, SwipeEvent, SwipePhase};
pub use spring::SpringParams;
pub use visuals::{card_visuals, interpolate, CardVisuals};

use std::time::Duration;

use crate::{Error, Result};

/// Card translation from its resting position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Which way a card left the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Like
    Right,
    /// Dislike
    Left,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }

    pub fn is_like(self) -> bool {
        self == Direction::Right
    }
}

/// Tuning for the swipe interaction. Distances share the unit of `width`
/// (pixels, terminal columns, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeConfig {
    /// Width of the surface the card moves across
    pub width: f32,
    /// Fraction of `width` a release must exceed to commit
    pub threshold_ratio: f32,
    /// Duration of the fly-out animation
    pub exit_duration: Duration,
    /// Rotation reached at half a width of travel
    pub max_rotation_deg: f32,
    pub spring: SpringParams,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            threshold_ratio: 0.25,
            exit_duration: Duration::from_millis(250),
            max_rotation_deg: 10.0,
            spring: SpringParams::default(),
        }
    }
}

impl SwipeConfig {
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width.max(0.0);
        self
    }

    /// Horizontal distance past which a release commits
    pub fn threshold(&self) -> f32 {
        self.width * self.threshold_ratio
    }

    /// How far off-screen the fly-out animation travels
    pub fn exit_distance(&self) -> f32 {
        self.width * 1.5
    }

    /// Reject tunings the controller cannot animate. `width` is not checked;
    /// it follows the rendering surface.
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold_ratio > 0.0 && self.threshold_ratio <= 1.0) {
            return Err(Error::InvalidInput(format!(
                "threshold_ratio must be in (0, 1], got {}",
                self.threshold_ratio
            )));
        }
        if !(self.max_rotation_deg.is_finite() && self.max_rotation_deg >= 0.0) {
            return Err(Error::InvalidInput(format!(
                "max_rotation_deg must be a non-negative number, got {}",
                self.max_rotation_deg
            )));
        }
        self.spring.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_fraction_of_width() {
        let config = SwipeConfig::default().with_width(400.0);
        assert_eq!(config.threshold(), 100.0);
        assert_eq!(config.exit_distance(), 600.0);
    }

    #[test]
    fn test_direction() {
        assert!(Direction::Right.is_like());
        assert!(!Direction::Left.is_like());
        assert_eq!(Direction::Left.sign(), -1.0);
    }

    #[test]
    fn test_validate_rejects_unusable_tuning() {
        assert!(SwipeConfig::default().validate().is_ok());

        let nan_threshold = SwipeConfig {
            threshold_ratio: f32::NAN,
            ..SwipeConfig::default()
        };
        assert!(matches!(nan_threshold.validate(), Err(Error::InvalidInput(_))));

        let zero_threshold = SwipeConfig {
            threshold_ratio: 0.0,
            ..SwipeConfig::default()
        };
        assert!(zero_threshold.validate().is_err());

        let mut negative_damping = SwipeConfig::default();
        negative_damping.spring.damping = -5.0;
        assert!(negative_damping.validate().is_err());

        let mut negative_stiffness = SwipeConfig::default();
        negative_stiffness.spring.stiffness = -180.0;
        assert!(negative_stiffness.validate().is_err());
    }
}
