use super::Offset;
use crate::{Error, Result};

/// Damped spring pulling the card back to rest (unit mass)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
    /// Distance and speed below which the card snaps to rest
    pub rest_epsilon: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 180.0,
            damping: 22.0,
            rest_epsilon: 0.5,
        }
    }
}

const MAX_STEP_SECS: f32 = 1.0 / 240.0;

impl SpringParams {
    /// A spring that is not positively stiff and damped never comes to rest
    pub fn validate(&self) -> Result<()> {
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(Error::InvalidInput(format!(
                "spring stiffness must be positive, got {}",
                self.stiffness
            )));
        }
        if !(self.damping.is_finite() && self.damping > 0.0) {
            return Err(Error::InvalidInput(format!(
                "spring damping must be positive, got {}",
                self.damping
            )));
        }
        if !(self.rest_epsilon.is_finite() && self.rest_epsilon > 0.0) {
            return Err(Error::InvalidInput(format!(
                "spring rest epsilon must be positive, got {}",
                self.rest_epsilon
            )));
        }
        Ok(())
    }

    /// Integrate the spring for `dt_secs`. Returns true once at rest.
    pub(crate) fn step(&self, position: &mut Offset, velocity: &mut Offset, dt_secs: f32) -> bool {
        let mut remaining = dt_secs.max(0.0);
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP_SECS);
            remaining -= h;

            let ax = -self.stiffness * position.x - self.damping * velocity.x;
            let ay = -self.stiffness * position.y - self.damping * velocity.y;
            velocity.x += ax * h;
            velocity.y += ay * h;
            position.x += velocity.x * h;
            position.y += velocity.y * h;
        }
        self.at_rest(position, velocity)
    }

    fn at_rest(&self, position: &Offset, velocity: &Offset) -> bool {
        let e = self.rest_epsilon;
        position.x.abs() < e && position.y.abs() < e && velocity.x.abs() < e && velocity.y.abs() < e
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_settles() {
        let spring = SpringParams::default();
        let mut position = Offset::new(80.0, -12.0);
        let mut velocity = Offset::ZERO;

        let mut settled = false;
        for _ in 0..300 {
            if spring.step(&mut position, &mut velocity, 1.0 / 60.0) {
                settled = true;
                break;
            }
        }
        assert!(settled);
        assert!(position.x.abs() < 0.5);
    }

    #[test]
    fn test_spring_moves_toward_rest() {
        let spring = SpringParams::default();
        let mut position = Offset::new(50.0, 0.0);
        let mut velocity = Offset::ZERO;
        spring.step(&mut position, &mut velocity, 1.0 / 60.0);
        assert!(position.x < 50.0);
        assert!(velocity.x < 0.0);
    }
}
