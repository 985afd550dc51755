//! Ball/flipper impact response
//!
//! The tricky part of the table: turning a flipper contact into one impulse
//! that depends on the flipper's motion, where along the flipper the ball hit,
//! and how fast the ball is already going.
//!
//! The impulse is built in three stages:
//! 1. Direction: the flipper axis blended with the pivot-to-ball direction,
//!    then bent toward the flipper surface velocity at the hit point.
//! 2. Strength: a flat base (held vs. resting) plus a bonus for angular speed,
//!    scaled up toward the tip and faded out as the ball nears the speed cap.
//! 3. Cap: the resulting velocity is clamped to the max speed. An incoming
//!    velocity already over the cap is clamped first, so the post-impact speed
//!    never exceeds the cap.

use glam::Vec2;

use super::body::Movable;
use super::paddle::Paddle;
use crate::consts::*;
use crate::settings::TableConfig;
use crate::{DEGENERATE_LENGTH, FALLBACK_DIRECTION, cap_length, direction_or};

/// Flipper impact tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactTuning {
    /// Lever arm for the tip velocity and hit fraction
    pub half_length: f32,
    pub active_impulse: f32,
    pub resting_impulse: f32,
    pub angular_speed_scale: f32,
    pub motion_influence_gain: f32,
    pub max_speed: f32,
}

impl Default for ImpactTuning {
    fn default() -> Self {
        Self {
            half_length: PADDLE_HALF_LENGTH,
            active_impulse: ACTIVE_FLIP_IMPULSE,
            resting_impulse: RESTING_IMPULSE,
            angular_speed_scale: ANGULAR_SPEED_SCALE,
            motion_influence_gain: MOTION_INFLUENCE_GAIN,
            max_speed: MAX_BALL_SPEED,
        }
    }
}

impl From<&TableConfig> for ImpactTuning {
    fn from(config: &TableConfig) -> Self {
        Self {
            half_length: config.paddle_half_length,
            active_impulse: config.active_flip_impulse,
            resting_impulse: config.resting_impulse,
            angular_speed_scale: config.angular_speed_scale,
            motion_influence_gain: config.motion_influence_gain,
            max_speed: config.max_ball_speed,
        }
    }
}

/// Intermediate values of an impact, kept for logging and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactBreakdown {
    pub angular_velocity: f32,
    pub tip_velocity: Vec2,
    pub paddle_direction: Vec2,
    pub hit_distance: f32,
    pub hit_fraction: f32,
    pub impact_velocity: Vec2,
    pub angular_speed_factor: f32,
    pub motion_influence: Vec2,
    pub base_direction: Vec2,
    pub impulse_direction: Vec2,
    pub position_scale: f32,
    pub movement_scale: f32,
    pub speed_factor: f32,
    /// Impulse strength before the speed cap
    pub base_impulse: f32,
    /// Speed cap changed the impulse
    pub capped: bool,
}

/// What to do to the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactPlan {
    /// Velocity to set before the impulse (incoming speed was over the cap)
    pub clamp_velocity: Option<Vec2>,
    pub impulse: Vec2,
    pub breakdown: ImpactBreakdown,
}

impl ImpactPlan {
    /// Velocity the ball ends up with after the plan is applied
    pub fn resulting_velocity(&self, current_velocity: Vec2, mass: f32) -> Vec2 {
        let start = self.clamp_velocity.unwrap_or(current_velocity);
        start + self.impulse / effective_mass(mass)
    }
}

fn effective_mass(mass: f32) -> f32 {
    if mass.is_finite() && mass > 0.0 { mass } else { 1.0 }
}

/// Normalized distance from pivot to hit point: 0 at the pivot, 1 at (or past) the tip
#[inline]
pub fn hit_fraction(hit_distance: f32, half_length: f32) -> f32 {
    if half_length <= 0.0 {
        return 1.0;
    }
    (hit_distance / half_length).clamp(0.0, 1.0)
}

/// Fade-out of the impulse as the ball approaches the cap; 0 at or above it
#[inline]
pub fn speed_factor(speed: f32, max_speed: f32) -> f32 {
    (1.0 - speed / max_speed).max(0.0)
}

/// Computes flipper impacts
#[derive(Debug, Clone, Default)]
pub struct PaddleImpactResolver {
    pub tuning: ImpactTuning,
}

impl PaddleImpactResolver {
    pub fn new(tuning: ImpactTuning) -> Self {
        Self { tuning }
    }

    /// Plan the impulse for a ball touching `paddle`
    pub fn plan(
        &self,
        paddle: &Paddle,
        held: bool,
        ball_position: Vec2,
        ball_velocity: Vec2,
        ball_mass: f32,
    ) -> ImpactPlan {
        let t = &self.tuning;
        let mass = effective_mass(ball_mass);

        // Everything below, the cap included, works from the clamped velocity.
        // Capping against the raw incoming speed instead would leave an
        // over-cap ball at 2 * max - |v| after the impulse.
        let clamp_velocity = (ball_velocity.length() > t.max_speed)
            .then(|| cap_length(ball_velocity, t.max_speed));
        let velocity = clamp_velocity.unwrap_or(ball_velocity);

        let angular_velocity = paddle.angular_velocity();
        let tip_velocity = paddle.tip_velocity(t.half_length);
        let paddle_direction = paddle.direction();

        let relative = ball_position - paddle.position;
        let hit_distance = relative.length();
        let hit_direction = direction_or(relative, FALLBACK_DIRECTION);
        let hit_fraction = hit_fraction(hit_distance, t.half_length);
        let impact_velocity = tip_velocity * hit_fraction;

        let angular_speed_factor = angular_velocity.abs() * t.angular_speed_scale;
        let motion_influence = impact_velocity * t.motion_influence_gain;

        let base_direction = direction_or(paddle_direction + hit_direction, FALLBACK_DIRECTION);
        let impulse_direction =
            if motion_influence.length_squared() > DEGENERATE_LENGTH * DEGENERATE_LENGTH {
                direction_or(base_direction + motion_influence.normalize(), base_direction)
            } else {
                base_direction
            };

        let mut base_impulse = if held {
            t.active_impulse
        } else {
            t.resting_impulse
        };
        base_impulse += angular_speed_factor;
        let position_scale = 0.5 + hit_fraction;
        let movement_scale = 1.0 + angular_speed_factor / 100.0;
        base_impulse *= position_scale * movement_scale;
        let speed_factor = speed_factor(velocity.length(), t.max_speed);
        base_impulse *= speed_factor;

        let mut impulse = impulse_direction * base_impulse;
        // Against `velocity`, not `ball_velocity`; see the clamp above
        let expected = velocity + impulse / mass;
        let capped = expected.length() > t.max_speed;
        if capped {
            let clamped = cap_length(expected, t.max_speed);
            impulse = (clamped - velocity) * mass;
        }

        ImpactPlan {
            clamp_velocity,
            impulse,
            breakdown: ImpactBreakdown {
                angular_velocity,
                tip_velocity,
                paddle_direction,
                hit_distance,
                hit_fraction,
                impact_velocity,
                angular_speed_factor,
                motion_influence,
                base_direction,
                impulse_direction,
                position_scale,
                movement_scale,
                speed_factor,
                base_impulse,
                capped,
            },
        }
    }

    /// Plan and apply the impulse to `ball`
    pub fn resolve<B: Movable + ?Sized>(&self, paddle: &Paddle, held: bool, ball: &mut B) -> ImpactPlan {
        let plan = self.plan(paddle, held, ball.position(), ball.velocity(), ball.mass());
        let b = &plan.breakdown;
        log::debug!(
            "[Paddle {}] hit ball {} - fraction {:.2}, angular {:.2}°/tick, base impulse {:.2}, speed factor {:.2}, impulse {}{}",
            paddle.id,
            ball.id(),
            b.hit_fraction,
            b.angular_velocity.to_degrees(),
            b.base_impulse,
            b.speed_factor,
            plan.impulse,
            if b.capped { " (capped)" } else { "" }
        );

        if let Some(v) = plan.clamp_velocity {
            log::debug!("[Paddle {}] Clamped excessive velocity: {} -> {}", paddle.id, ball.velocity(), v);
            ball.set_velocity(v);
        }
        ball.apply_impulse(plan.impulse);
        plan
    }
}
