use super::SwipeConfig;

/// What the card looks like for a given horizontal drag
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardVisuals {
    /// Clockwise rotation in degrees
    pub rotation_deg: f32,
    /// Strength of the LIKE overlay, 0..=1
    pub like_opacity: f32,
    /// Strength of the NOPE overlay, 0..=1
    pub nope_opacity: f32,
}

/// Map `value` linearly from `input` onto `output`, clamping at both ends
pub fn interpolate(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let (in_lo, in_hi) = input;
    let (out_lo, out_hi) = output;
    let span = in_hi - in_lo;
    if span.abs() <= f32::EPSILON {
        return if value >= in_hi { out_hi } else { out_lo };
    }
    let t = ((value - in_lo) / span).clamp(0.0, 1.0);
    out_lo + (out_hi - out_lo) * t
}

/// Rotation and overlay strengths for a horizontal offset `dx`.
///
/// Only the overlay on the side of the drag is ever non-zero.
pub fn card_visuals(dx: f32, config: &SwipeConfig) -> CardVisuals {
    let half = config.width / 2.0;
    let max = config.max_rotation_deg;
    let threshold = config.threshold();

    let rotation_deg = interpolate(dx, (-half, half), (-max, max));
    let like_opacity = if dx > 0.0 {
        interpolate(dx, (0.0, threshold), (0.0, 1.0))
    } else {
        0.0
    };
    let nope_opacity = if dx < 0.0 {
        interpolate(dx, (-threshold, 0.0), (1.0, 0.0))
    } else {
        0.0
    };

    CardVisuals {
        rotation_deg,
        like_opacity,
        nope_opacity,
    }
}
