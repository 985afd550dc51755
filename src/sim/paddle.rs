//! Flipper kinematics
//!
//! A flipper is static geometry whose rotation this module drives every tick.
//! Rotation eases toward the rest or active angle with a first-order low-pass
//! filter, and angular velocity is the rotation change over the last tick.
//!
//! Both the smoothing and the angular velocity are per tick, not per second:
//! changing the physics rate changes how the flippers feel.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::BodyId;
use crate::input::InputAction;

/// Which side of the table a flipper is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddleSide {
    /// Swings counterclockwise (rest - flip angle)
    Left,
    /// Swings clockwise (rest + flip angle)
    Right,
}

impl PaddleSide {
    /// Sign applied to the flip angle
    pub fn flip_sign(&self) -> f32 {
        match self {
            PaddleSide::Left => -1.0,
            PaddleSide::Right => 1.0,
        }
    }
}

/// A flipper on the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub id: BodyId,
    pub side: PaddleSide,
    pub action: InputAction,
    /// Pivot (world)
    pub position: Vec2,
    /// Current rotation (radians)
    pub rotation: f32,
    pub rest_angle: f32,
    pub active_angle: f32,
    /// Rotation recorded at the start of the last step
    pub(crate) last_rotation: f32,
    smoothing: f32,
}

impl Paddle {
    pub fn new(
        id: BodyId,
        side: PaddleSide,
        action: InputAction,
        position: Vec2,
        rest_angle: f32,
        flip_angle: f32,
        smoothing: f32,
    ) -> Self {
        let active_angle = rest_angle + side.flip_sign() * flip_angle;
        log::info!(
            "[Paddle {id}] Initialized - RestAngle: {:.2}°, ActiveAngle: {:.2}°, Action: {}",
            rest_angle.to_degrees(),
            active_angle.to_degrees(),
            action.as_str()
        );
        Self {
            id,
            side,
            action,
            position,
            rotation: rest_angle,
            rest_angle,
            active_angle,
            last_rotation: rest_angle,
            smoothing,
        }
    }

    /// Angle the flipper is easing toward
    pub fn target_angle(&self, held: bool) -> f32 {
        if held { self.active_angle } else { self.rest_angle }
    }

    /// Advance one tick
    pub fn step(&mut self, held: bool) {
        let delta = (self.rotation - self.last_rotation).abs();
        if delta > 0.01 || held {
            log::trace!(
                "[Paddle {}] Rotation: {:.2}°, Angular Delta: {:.2}°, Held: {}",
                self.id,
                self.rotation.to_degrees(),
                delta.to_degrees(),
                held
            );
        }

        let target = self.target_angle(held);
        self.last_rotation = self.rotation;
        self.rotation += (target - self.rotation) * self.smoothing;
    }

    /// Rotation change over the last tick (radians per tick)
    pub fn angular_velocity(&self) -> f32 {
        self.rotation - self.last_rotation
    }

    /// Unit vector along the flipper's long axis
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.rotation.cos(), self.rotation.sin())
    }

    /// Linear velocity of a point `length` from the pivot, per tick
    pub fn tip_velocity(&self, length: f32) -> Vec2 {
        let w = self.angular_velocity();
        Vec2::new(
            -self.rotation.sin() * w * length,
            self.rotation.cos() * w * length,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    fn paddle(side: PaddleSide) -> Paddle {
        let action = match side {
            PaddleSide::Left => InputAction::PaddleLeft,
            PaddleSide::Right => InputAction::PaddleRight,
        };
        Paddle::new(BodyId(1), side, action, Vec2::ZERO, 0.0, FRAC_PI_4, 0.4)
    }

    #[test]
    fn test_active_angle_by_side() {
        assert!((paddle(PaddleSide::Left).active_angle + FRAC_PI_4).abs() < 1e-6);
        assert!((paddle(PaddleSide::Right).active_angle - FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_step_moves_forty_percent() {
        let mut p = paddle(PaddleSide::Right);
        p.step(true);
        assert!((p.rotation - 0.4 * FRAC_PI_4).abs() < 1e-6);
        p.step(true);
        assert!((p.rotation - (0.4 + 0.6 * 0.4) * FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_angular_velocity_is_last_tick_delta() {
        let mut p = paddle(PaddleSide::Right);
        assert_eq!(p.angular_velocity(), 0.0);
        p.step(true);
        let first = p.rotation;
        assert!((p.angular_velocity() - first).abs() < 1e-6);
        p.step(true);
        assert!((p.angular_velocity() - (p.rotation - first)).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_stays_between_rest_and_active() {
        let mut p = paddle(PaddleSide::Left);
        let (lo, hi) = (p.active_angle, p.rest_angle);
        let pattern = [true, true, false, true, false, false, true, true, true, false];
        for held in pattern.iter().cycle().take(200) {
            p.step(*held);
            assert!(p.rotation >= lo - 1e-6 && p.rotation <= hi + 1e-6);
        }
    }

    #[test]
    fn test_release_returns_to_rest() {
        let mut p = paddle(PaddleSide::Right);
        for _ in 0..30 {
            p.step(true);
        }
        assert!((p.rotation - p.active_angle).abs() < 1e-4);
        for _ in 0..30 {
            p.step(false);
        }
        assert!((p.rotation - p.rest_angle).abs() < 1e-4);
        assert!(p.angular_velocity().abs() < 1e-4);
    }

    #[test]
    fn test_tip_velocity_perpendicular_to_axis() {
        let mut p = paddle(PaddleSide::Right);
        p.step(true);
        let tip = p.tip_velocity(60.0);
        assert!(tip.dot(p.direction()).abs() < 1e-4);
        assert!((tip.length() - p.angular_velocity().abs() * 60.0).abs() < 1e-4);
    }
}
