//! Pinball Sim - collision response for a pinball table
//!
//! Core modules:
//! - `sim`: Per-tick policy layer (bumpers, flippers, launch, drain detection)
//! - `input`: Named input actions and the query capability the table reads
//! - `settings`: Data-driven table configuration
//! - `error`: Configuration errors
//!
//! The physics engine itself (contact discovery, integration, gravity) is an
//! external collaborator reached through the capabilities in [`sim::body`].

pub mod error;
pub mod input;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use input::{InputAction, InputFrame, InputSource};
pub use settings::{BumperConfig, PaddleConfig, TableConfig};

use glam::Vec2;

/// Table configuration defaults
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Radial impulse applied by a bumper
    pub const BUMPER_FORCE: f32 = 400.0;

    /// Lever arm used for the flipper tip velocity
    pub const PADDLE_HALF_LENGTH: f32 = 60.0;
    /// Flipper swing from rest (degrees)
    pub const FLIP_ANGLE_DEG: f32 = 45.0;
    /// Fraction of the remaining distance to the target angle covered per tick
    pub const FLIP_SMOOTHING: f32 = 0.4;

    /// Impulse strength while the flipper button is held
    pub const ACTIVE_FLIP_IMPULSE: f32 = 700.0;
    /// Impulse strength for a flipper at rest
    pub const RESTING_IMPULSE: f32 = 300.0;
    /// Scale from |angular velocity| (rad/tick) to impulse bonus
    pub const ANGULAR_SPEED_SCALE: f32 = 50.0;
    /// Gain applied to the flipper surface velocity when steering the impulse
    pub const MOTION_INFLUENCE_GAIN: f32 = 1.5;

    /// Global ball speed cap
    pub const MAX_BALL_SPEED: f32 = 800.0;
    /// Impulse applied on launch (straight up, screen coordinates)
    pub const LAUNCH_IMPULSE: Vec2 = Vec2::new(0.0, -800.0);
    /// Ball-out threshold on the vertical axis
    pub const BOUNDARY_Y: f32 = 800.0;
    /// Per-tick velocity change that counts as a spike (diagnostic only)
    pub const VELOCITY_SPIKE_THRESHOLD: f32 = 1000.0;

    /// Post-impact probe delay (0.02 s at 120 Hz, rounded up)
    pub const PROBE_DELAY_TICKS: u32 = 2;

    /// Contacts the engine reports per ball per tick
    pub const MAX_CONTACTS_REPORTED: usize = 4;
}

/// Direction used whenever a normalisation has nothing to work with (straight up)
pub const FALLBACK_DIRECTION: Vec2 = Vec2::NEG_Y;

/// Lengths below this are treated as zero when normalising
pub const DEGENERATE_LENGTH: f32 = 1e-6;

/// Normalize `v`, or return `fallback` when `v` is (near) zero-length
#[inline]
pub fn direction_or(v: Vec2, fallback: Vec2) -> Vec2 {
    if v.length_squared() > DEGENERATE_LENGTH * DEGENERATE_LENGTH {
        v.normalize_or(fallback)
    } else {
        fallback
    }
}

/// Clamp `v` to at most `max` length, keeping its direction
#[inline]
pub fn cap_length(v: Vec2, max: f32) -> Vec2 {
    if v.length() > max {
        direction_or(v, FALLBACK_DIRECTION) * max
    } else {
        v
    }
}
