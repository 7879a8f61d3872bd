use std::time::Duration;

use super::{card_visuals, CardVisuals, Direction, Offset, SwipeConfig};
use crate::{Error, Result};

/// Where the card is in its interaction cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipePhase {
    /// At rest, offset is exactly zero
    Idle,
    /// Following the pointer
    Dragging { origin: Offset },
    /// Flying off-screen; no gesture is accepted until it lands
    Committing {
        direction: Direction,
        from: Offset,
        elapsed: Duration,
    },
    /// Springing back to rest
    Resetting { velocity: Offset },
}

/// Outcome of letting go of the card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Commit(Direction),
    Reset,
}

/// Emitted by [`SwipeController::tick`] when an animation finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeEvent {
    /// The fly-out landed; the card should be replaced
    Committed(Direction),
    /// The card is back at rest
    Settled,
}

#[derive(Debug, Clone)]
pub struct SwipeController {
    config: SwipeConfig,
    phase: SwipePhase,
    offset: Offset,
}

impl SwipeController {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            phase: SwipePhase::Idle,
            offset: Offset::ZERO,
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Resize the surface; takes effect on the next release
    pub fn set_width(&mut self, width: f32) {
        self.config.width = width.max(0.0);
    }

    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// True while a fly-out animation is in flight
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, SwipePhase::Committing { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, SwipePhase::Dragging { .. })
    }

    pub fn visuals(&self) -> CardVisuals {
        card_visuals(self.offset.x, &self.config)
    }

    /// Start following the pointer.
    ///
    /// Grabbing a card that is springing back continues from where it is.
    pub fn begin_drag(&mut self) -> Result<()> {
        match self.phase {
            SwipePhase::Committing { .. } => {
                Err(Error::Busy("card is still leaving the screen".to_string()))
            }
            SwipePhase::Dragging { .. } => Err(Error::Busy("a gesture is already active".to_string())),
            SwipePhase::Idle | SwipePhase::Resetting { .. } => {
                self.phase = SwipePhase::Dragging {
                    origin: self.offset,
                };
                Ok(())
            }
        }
    }

    /// Move the card by the pointer translation since `begin_drag`.
    /// Ignored when no gesture is active.
    pub fn update_drag(&mut self, dx: f32, dy: f32) {
        if let SwipePhase::Dragging { origin } = self.phase {
            self.offset = Offset::new(origin.x + dx, origin.y + dy);
        }
    }

    /// Let go of the card and classify the gesture
    pub fn release(&mut self) -> Result<Release> {
        if !self.is_dragging() {
            return Err(Error::InvalidInput("no gesture to release".to_string()));
        }

        let threshold = self.config.threshold();
        let dx = self.offset.x;
        if dx > threshold {
            self.start_commit(Direction::Right);
            Ok(Release::Commit(Direction::Right))
        } else if dx < -threshold {
            self.start_commit(Direction::Left);
            Ok(Release::Commit(Direction::Left))
        } else {
            self.phase = if self.offset.is_zero() {
                SwipePhase::Idle
            } else {
                SwipePhase::Resetting {
                    velocity: Offset::ZERO,
                }
            };
            Ok(Release::Reset)
        }
    }

    /// Commit without a drag, as if the card was thrown past the threshold
    pub fn fling(&mut self, direction: Direction) -> Result<()> {
        self.begin_drag()?;
        self.start_commit(direction);
        Ok(())
    }

    fn start_commit(&mut self, direction: Direction) {
        self.phase = SwipePhase::Committing {
            direction,
            from: self.offset,
            elapsed: Duration::ZERO,
        };
    }

    /// Advance the running animation by `dt`
    pub fn tick(&mut self, dt: Duration) -> Option<SwipeEvent> {
        match self.phase {
            SwipePhase::Idle | SwipePhase::Dragging { .. } => None,
            SwipePhase::Committing {
                direction,
                from,
                elapsed,
            } => {
                let elapsed = elapsed + dt;
                let total = self.config.exit_duration;
                if elapsed >= total {
                    self.settle();
                    return Some(SwipeEvent::Committed(direction));
                }

                let t = elapsed.as_secs_f32() / total.as_secs_f32();
                let target = direction.sign() * self.config.exit_distance();
                self.offset = Offset::new(from.x + (target - from.x) * t, from.y);
                self.phase = SwipePhase::Committing {
                    direction,
                    from,
                    elapsed,
                };
                None
            }
            SwipePhase::Resetting { mut velocity } => {
                let mut position = self.offset;
                let at_rest = self
                    .config
                    .spring
                    .step(&mut position, &mut velocity, dt.as_secs_f32());
                if at_rest {
                    self.settle();
                    return Some(SwipeEvent::Settled);
                }
                self.offset = position;
                self.phase = SwipePhase::Resetting { velocity };
                None
            }
        }
    }

    fn settle(&mut self) {
        self.phase = SwipePhase::Idle;
        self.offset = Offset::ZERO;
    }
}

impl Default for SwipeController {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn controller() -> SwipeController {
        SwipeController::new(SwipeConfig::default().with_width(400.0))
    }

    fn run_until_event(controller: &mut SwipeController) -> SwipeEvent {
        for _ in 0..1000 {
            if let Some(event) = controller.tick(FRAME) {
                return event;
            }
        }
        panic!("animation never finished");
    }

    #[test]
    fn test_starts_idle() {
        let controller = controller();
        assert_eq!(controller.phase(), SwipePhase::Idle);
        assert_eq!(controller.offset(), Offset::ZERO);
        assert!(!controller.is_transitioning());
    }

    #[test]
    fn test_drag_tracks_pointer() {
        let mut controller = controller();
        controller.begin_drag().unwrap();
        controller.update_drag(30.0, -4.0);
        assert_eq!(controller.offset(), Offset::new(30.0, -4.0));
        controller.update_drag(45.0, 2.0);
        assert_eq!(controller.offset(), Offset::new(45.0, 2.0));
    }

    #[test]
    fn test_update_without_gesture_is_ignored() {
        let mut controller = controller();
        controller.update_drag(30.0, 0.0);
        assert_eq!(controller.offset(), Offset::ZERO);
    }

    #[test]
    fn test_release_inside_threshold_resets() {
        for dx in [-100.0, -60.0, 0.0, 40.0, 100.0] {
            let mut controller = controller();
            controller.begin_drag().unwrap();
            controller.update_drag(dx, 12.0);
            assert_eq!(controller.release().unwrap(), Release::Reset);
            assert!(!controller.is_transitioning());

            assert_eq!(run_until_event(&mut controller), SwipeEvent::Settled);
            assert_eq!(controller.phase(), SwipePhase::Idle);
            assert_eq!(controller.offset(), Offset::ZERO);
        }
    }

    #[test]
    fn test_release_at_rest_goes_straight_to_idle() {
        let mut controller = controller();
        controller.begin_drag().unwrap();
        assert_eq!(controller.release().unwrap(), Release::Reset);
        assert_eq!(controller.phase(), SwipePhase::Idle);
    }

    #[test]
    fn test_release_past_threshold_commits() {
        let mut controller = controller();
        controller.begin_drag().unwrap();
        controller.update_drag(200.0, 0.0);
        assert_eq!(controller.release().unwrap(), Release::Commit(Direction::Right));
        assert!(controller.is_transitioning());

        let mut controller = self::controller();
        controller.begin_drag().unwrap();
        controller.update_drag(-150.0, 0.0);
        assert_eq!(controller.release().unwrap(), Release::Commit(Direction::Left));
    }

    #[test]
    fn test_commit_animation_flies_out_then_resets() {
        let mut controller = controller();
        controller.begin_drag().unwrap();
        controller.update_drag(150.0, 10.0);
        controller.release().unwrap();

        assert_eq!(controller.tick(Duration::from_millis(125)), None);
        let halfway = controller.offset().x;
        assert!(halfway > 150.0 && halfway < 600.0);
        assert_eq!(controller.offset().y, 10.0);

        assert_eq!(
            controller.tick(Duration::from_millis(125)),
            Some(SwipeEvent::Committed(Direction::Right))
        );
        assert_eq!(controller.phase(), SwipePhase::Idle);
        assert_eq!(controller.offset(), Offset::ZERO);
        assert_eq!(controller.tick(FRAME), None);
    }

    #[test]
    fn test_gestures_rejected_while_committing() {
        let mut controller = controller();
        controller.fling(Direction::Left).unwrap();

        assert!(matches!(controller.begin_drag(), Err(Error::Busy(_))));
        assert!(matches!(controller.fling(Direction::Right), Err(Error::Busy(_))));

        assert_eq!(
            run_until_event(&mut controller),
            SwipeEvent::Committed(Direction::Left)
        );
        assert!(controller.begin_drag().is_ok());
    }

    #[test]
    fn test_second_gesture_rejected_while_dragging() {
        let mut controller = controller();
        controller.begin_drag().unwrap();
        assert!(matches!(controller.begin_drag(), Err(Error::Busy(_))));
    }

    #[test]
    fn test_release_without_gesture_is_an_error() {
        let mut controller = controller();
        assert!(matches!(controller.release(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_grab_while_resetting_continues_from_current_offset() {
        let mut controller = controller();
        controller.begin_drag().unwrap();
        controller.update_drag(80.0, 0.0);
        controller.release().unwrap();
        controller.tick(FRAME);
        let mid = controller.offset();
        assert!(mid.x > 0.0 && mid.x < 80.0);

        controller.begin_drag().unwrap();
        controller.update_drag(10.0, 0.0);
        assert_eq!(controller.offset().x, mid.x + 10.0);
    }

    #[test]
    fn test_visuals_follow_offset() {
        let mut controller = controller();
        controller.begin_drag().unwrap();
        controller.update_drag(200.0, 0.0);
        let visuals = controller.visuals();
        assert_eq!(visuals.rotation_deg, 10.0);
        assert_eq!(visuals.like_opacity, 1.0);
        assert_eq!(visuals.nope_opacity, 0.0);
    }
}
