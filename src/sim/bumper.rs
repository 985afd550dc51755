//! Pop bumpers
//!
//! A bumper ignores how the ball arrived. It pushes the ball straight away from
//! its center with a fixed impulse; any extra bounce comes from the engine's
//! surface material, [`Bumper::MATERIAL`] (restitution 1.0, no friction).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::BodyId;
use crate::{FALLBACK_DIRECTION, direction_or};

/// Surface material the engine should give bumper colliders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    pub bounce: f32,
    pub friction: f32,
}

impl SurfaceMaterial {
    /// Velocity after bouncing off a surface with outward `normal`
    ///
    /// The normal component is reversed and scaled by `bounce`, the tangential
    /// one loses `friction` of its length. A ball already moving away is left
    /// alone.
    pub fn reflect(&self, velocity: Vec2, normal: Vec2) -> Vec2 {
        let normal = direction_or(normal, FALLBACK_DIRECTION);
        let approach = velocity.dot(normal);
        if approach >= 0.0 {
            return velocity;
        }
        let along = normal * approach;
        let across = velocity - along;
        across * (1.0 - self.friction) - along * self.bounce
    }
}

/// A bumper on the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bumper {
    pub id: BodyId,
    /// Center (world)
    pub position: Vec2,
    /// Impulse magnitude applied on contact
    pub force: f32,
}

impl Bumper {
    pub const MATERIAL: SurfaceMaterial = SurfaceMaterial {
        bounce: 1.0,
        friction: 0.0,
    };

    pub fn new(id: BodyId, position: Vec2, force: f32) -> Self {
        Self {
            id,
            position,
            force,
        }
    }

    /// Impulse for a ball touching this bumper
    pub fn impulse_for(&self, ball_position: Vec2) -> Vec2 {
        radial_impulse(ball_position, self.position, self.force)
    }
}

/// Radial push away from `bumper_position`, magnitude exactly `force`
///
/// Falls back to straight up when the ball sits on the bumper center.
#[inline]
pub fn radial_impulse(ball_position: Vec2, bumper_position: Vec2, force: f32) -> Vec2 {
    direction_or(ball_position - bumper_position, FALLBACK_DIRECTION) * force
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_radial_impulse_points_away() {
        let impulse = radial_impulse(Vec2::new(110.0, 100.0), Vec2::new(100.0, 100.0), 400.0);
        assert!((impulse.x - 400.0).abs() < 1e-3);
        assert!(impulse.y.abs() < 1e-3);
    }

    #[test]
    fn test_coincident_positions_fall_back_up() {
        let impulse = radial_impulse(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0), 400.0);
        assert_eq!(impulse, Vec2::new(0.0, -400.0));
        assert!(impulse.is_finite());
    }

    #[test]
    fn test_bumper_uses_own_force() {
        let bumper = Bumper::new(BodyId(3), Vec2::ZERO, 250.0);
        let impulse = bumper.impulse_for(Vec2::new(0.0, 10.0));
        assert!((impulse.length() - 250.0).abs() < 1e-3);
        assert!(impulse.y > 0.0);
    }

    #[test]
    fn test_bumper_material_is_elastic() {
        let velocity = Vec2::new(120.0, 300.0);
        let bounced = Bumper::MATERIAL.reflect(velocity, Vec2::NEG_Y);
        assert!((bounced - Vec2::new(120.0, -300.0)).length() < 1e-3);
        assert!((bounced.length() - velocity.length()).abs() < 1e-2);
    }

    #[test]
    fn test_reflect_ignores_separating_ball() {
        let velocity = Vec2::new(10.0, -50.0);
        assert_eq!(Bumper::MATERIAL.reflect(velocity, Vec2::NEG_Y), velocity);
    }

    #[test]
    fn test_lossy_material_damps_both_components() {
        let material = SurfaceMaterial {
            bounce: 0.5,
            friction: 0.25,
        };
        let bounced = material.reflect(Vec2::new(100.0, 200.0), Vec2::NEG_Y);
        assert!((bounced - Vec2::new(75.0, -100.0)).length() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_direction_and_magnitude(
            bx in -1000.0f32..1000.0,
            by in -1000.0f32..1000.0,
            dx in -200.0f32..200.0,
            dy in -200.0f32..200.0,
            force in 1.0f32..2000.0,
        ) {
            prop_assume!(dx.abs() > 0.01 || dy.abs() > 0.01);
            let bumper = Vec2::new(bx, by);
            let ball = bumper + Vec2::new(dx, dy);
            let impulse = radial_impulse(ball, bumper, force);
            prop_assert!((impulse.length() - force).abs() < force * 1e-4);
            let expected = (ball - bumper).normalize();
            prop_assert!(impulse.normalize().dot(expected) > 0.9999);
        }
    }
}
