//! Ball bookkeeping
//!
//! Per-tick checks on the live ball: velocity spikes (logged, never acted on),
//! the launch button, and the drain boundary.

use glam::Vec2;

use super::body::{BodyId, Movable};
use super::events::GameEvent;
use crate::consts::*;
use crate::settings::TableConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    pub spike_threshold: f32,
    /// Ball is out once its y goes past this
    pub boundary_y: f32,
    pub launch_impulse: Vec2,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            spike_threshold: VELOCITY_SPIKE_THRESHOLD,
            boundary_y: BOUNDARY_Y,
            launch_impulse: LAUNCH_IMPULSE,
        }
    }
}

impl From<&TableConfig> for TrackerConfig {
    fn from(config: &TableConfig) -> Self {
        Self {
            spike_threshold: config.velocity_spike_threshold,
            boundary_y: config.boundary_y,
            launch_impulse: config.launch_impulse,
        }
    }
}

/// Tracks the live ball across ticks
#[derive(Debug, Clone, Default)]
pub struct BallMotionTracker {
    pub config: TrackerConfig,
    /// Ball the state below belongs to
    tracked: Option<BodyId>,
    last_velocity: Vec2,
    /// Ball-out already raised for the current crossing
    out_raised: bool,
}

impl BallMotionTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Ball currently tracked
    pub fn tracked(&self) -> Option<BodyId> {
        self.tracked
    }

    /// Forget the tracked ball
    pub fn reset(&mut self) {
        self.tracked = None;
        self.last_velocity = Vec2::ZERO;
        self.out_raised = false;
    }

    /// Run one tick of checks against `ball`
    pub fn step<B: Movable + ?Sized>(&mut self, ball: &mut B, launch_pressed: bool) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let id = ball.id();

        if self.tracked != Some(id) {
            self.tracked = Some(id);
            self.last_velocity = ball.velocity();
            self.out_raised = false;
        }

        let velocity = ball.velocity();
        let delta = velocity - self.last_velocity;
        if delta.length() > self.config.spike_threshold {
            log::debug!(
                "[Ball {id}] Velocity change detected - Previous: {}, Current: {velocity}, Delta: {delta}",
                self.last_velocity
            );
            events.push(GameEvent::VelocitySpike {
                ball: id,
                previous: self.last_velocity,
                current: velocity,
            });
        }
        self.last_velocity = velocity;

        if launch_pressed {
            if ball.is_sleeping() {
                log::info!("[Ball {id}] Launch - Position: {}, Velocity: {velocity}", ball.position());
                ball.set_sleeping(false);
                ball.apply_impulse(self.config.launch_impulse);
                events.push(GameEvent::Launched {
                    ball: id,
                    impulse: self.config.launch_impulse,
                });
            } else {
                log::debug!("[Ball {id}] Launch ignored, ball is already in play");
            }
        }

        let position = ball.position();
        if position.y > self.config.boundary_y {
            if !self.out_raised {
                self.out_raised = true;
                log::info!("[Ball {id}] Out at {position}");
                events.push(GameEvent::BallOut { ball: id, position });
            }
        } else {
            self.out_raised = false;
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::SimBall;

    #[test]
    fn test_launch_wakes_dormant_ball() {
        let mut tracker = BallMotionTracker::default();
        let mut ball = SimBall::new(BodyId(1), Vec2::new(400.0, 600.0));
        assert!(ball.sleeping);

        let events = tracker.step(&mut ball, true);

        assert!(!ball.sleeping);
        assert_eq!(ball.vel, LAUNCH_IMPULSE);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::Launched { .. }));
    }

    #[test]
    fn test_launch_ignored_when_awake() {
        let mut tracker = BallMotionTracker::default();
        let mut ball = SimBall::new(BodyId(1), Vec2::ZERO);
        ball.sleeping = false;
        ball.vel = Vec2::new(50.0, 0.0);

        let events = tracker.step(&mut ball, true);

        assert!(events.is_empty());
        assert_eq!(ball.vel, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_no_launch_without_press() {
        let mut tracker = BallMotionTracker::default();
        let mut ball = SimBall::new(BodyId(1), Vec2::ZERO);
        tracker.step(&mut ball, false);
        assert!(ball.sleeping);
        assert_eq!(ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_ball_out_fires_once_per_crossing() {
        let mut tracker = BallMotionTracker::default();
        let mut ball = SimBall::new(BodyId(1), Vec2::new(100.0, 790.0));
        assert!(tracker.step(&mut ball, false).is_empty());

        ball.pos.y = 801.0;
        let events = tracker.step(&mut ball, false);
        assert_eq!(events.iter().filter(|e| e.is_ball_out()).count(), 1);

        for _ in 0..10 {
            ball.pos.y += 5.0;
            assert!(tracker.step(&mut ball, false).iter().all(|e| !e.is_ball_out()));
        }

        // Back inside and out again is a new crossing
        ball.pos.y = 700.0;
        tracker.step(&mut ball, false);
        ball.pos.y = 900.0;
        assert_eq!(tracker.step(&mut ball, false).iter().filter(|e| e.is_ball_out()).count(), 1);
    }

    #[test]
    fn test_new_ball_rearms_boundary() {
        let mut tracker = BallMotionTracker::default();
        let mut old = SimBall::new(BodyId(1), Vec2::new(0.0, 900.0));
        assert_eq!(tracker.step(&mut old, false).len(), 1);

        let mut replacement = SimBall::new(BodyId(2), Vec2::new(0.0, 900.0));
        assert_eq!(tracker.step(&mut replacement, false).len(), 1);
        assert_eq!(tracker.tracked(), Some(BodyId(2)));
    }

    #[test]
    fn test_velocity_spike_is_reported_only() {
        let mut tracker = BallMotionTracker::default();
        let mut ball = SimBall::new(BodyId(1), Vec2::ZERO);
        ball.sleeping = false;
        tracker.step(&mut ball, false);

        ball.vel = Vec2::new(0.0, 1200.0);
        let events = tracker.step(&mut ball, false);
        assert!(matches!(events[0], GameEvent::VelocitySpike { .. }));
        assert_eq!(ball.vel, Vec2::new(0.0, 1200.0));

        // Same velocity next tick: no spike
        assert!(tracker.step(&mut ball, false).is_empty());
    }

    #[test]
    fn test_spike_baseline_resets_for_new_ball() {
        let mut tracker = BallMotionTracker::default();
        let mut fast = SimBall::new(BodyId(1), Vec2::ZERO);
        fast.vel = Vec2::new(0.0, 2000.0);
        tracker.step(&mut fast, false);

        let mut fresh = SimBall::new(BodyId(2), Vec2::ZERO);
        assert!(tracker.step(&mut fresh, false).is_empty());
    }
}
