//! Table configuration
//!
//! Every tunable the table uses, with compiled-in defaults from
//! [`crate::consts`]. A JSON file can override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::input::InputAction;
use crate::sim::PaddleSide;

/// A flipper placed on the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaddleConfig {
    /// Body id the physics engine reports in contacts
    pub id: u32,
    pub side: PaddleSide,
    /// Input action name, resolved when the config is validated
    pub action: String,
    /// Pivot position (world)
    pub position: Vec2,
    /// Rotation at rest (radians)
    #[serde(default)]
    pub rest_angle: f32,
}

/// A pop bumper placed on the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BumperConfig {
    pub id: u32,
    /// Center position (world)
    pub position: Vec2,
    /// Overrides [`TableConfig::bumper_force`] for this bumper
    #[serde(default)]
    pub force: Option<f32>,
}

/// Table-wide tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    // === Bumpers ===
    pub bumper_force: f32,

    // === Flippers ===
    pub paddle_half_length: f32,
    pub flip_angle_deg: f32,
    /// Low-pass factor per tick (tied to tick rate, not wall-clock time)
    pub flip_smoothing: f32,
    pub active_flip_impulse: f32,
    pub resting_impulse: f32,
    pub angular_speed_scale: f32,
    pub motion_influence_gain: f32,

    // === Ball ===
    pub max_ball_speed: f32,
    pub launch_impulse: Vec2,
    pub boundary_y: f32,
    pub velocity_spike_threshold: f32,

    // === Diagnostics ===
    /// Ticks between a flipper hit and its post-impact probe (0 disables)
    pub probe_delay_ticks: u32,

    // === Layout ===
    pub paddles: Vec<PaddleConfig>,
    pub bumpers: Vec<BumperConfig>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            bumper_force: BUMPER_FORCE,

            paddle_half_length: PADDLE_HALF_LENGTH,
            flip_angle_deg: FLIP_ANGLE_DEG,
            flip_smoothing: FLIP_SMOOTHING,
            active_flip_impulse: ACTIVE_FLIP_IMPULSE,
            resting_impulse: RESTING_IMPULSE,
            angular_speed_scale: ANGULAR_SPEED_SCALE,
            motion_influence_gain: MOTION_INFLUENCE_GAIN,

            max_ball_speed: MAX_BALL_SPEED,
            launch_impulse: LAUNCH_IMPULSE,
            boundary_y: BOUNDARY_Y,
            velocity_spike_threshold: VELOCITY_SPIKE_THRESHOLD,

            probe_delay_ticks: PROBE_DELAY_TICKS,

            // Standard layout: two flippers above the drain, three bumpers up top
            paddles: vec![
                PaddleConfig {
                    id: 1,
                    side: PaddleSide::Left,
                    action: "paddle_left".into(),
                    position: Vec2::new(140.0, 700.0),
                    rest_angle: 0.5,
                },
                PaddleConfig {
                    id: 2,
                    side: PaddleSide::Right,
                    action: "paddle_right".into(),
                    position: Vec2::new(340.0, 700.0),
                    rest_angle: std::f32::consts::PI - 0.5,
                },
            ],
            bumpers: vec![
                BumperConfig {
                    id: 10,
                    position: Vec2::new(240.0, 200.0),
                    force: None,
                },
                BumperConfig {
                    id: 11,
                    position: Vec2::new(170.0, 300.0),
                    force: None,
                },
                BumperConfig {
                    id: 12,
                    position: Vec2::new(310.0, 300.0),
                    force: None,
                },
            ],
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "finite and > 0",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "finite and >= 0",
        })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "finite",
        })
    }
}

impl TableConfig {
    /// Parse a configuration from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded table config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Range-check every numeric field and resolve every action name;
    /// flippers only accept flipper actions
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("bumper_force", self.bumper_force)?;
        positive("paddle_half_length", self.paddle_half_length)?;
        non_negative("flip_angle_deg", self.flip_angle_deg)?;
        if !(self.flip_smoothing > 0.0 && self.flip_smoothing <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "flip_smoothing",
                value: self.flip_smoothing,
                expected: "in (0, 1]",
            });
        }
        non_negative("active_flip_impulse", self.active_flip_impulse)?;
        non_negative("resting_impulse", self.resting_impulse)?;
        non_negative("angular_speed_scale", self.angular_speed_scale)?;
        non_negative("motion_influence_gain", self.motion_influence_gain)?;
        positive("max_ball_speed", self.max_ball_speed)?;
        finite("launch_impulse.x", self.launch_impulse.x)?;
        finite("launch_impulse.y", self.launch_impulse.y)?;
        finite("boundary_y", self.boundary_y)?;
        positive("velocity_spike_threshold", self.velocity_spike_threshold)?;

        for paddle in &self.paddles {
            match paddle.action.parse::<InputAction>()? {
                InputAction::PaddleLeft | InputAction::PaddleRight => {}
                InputAction::LaunchBall => {
                    return Err(ConfigError::ActionNotAllowed {
                        name: paddle.action.clone(),
                        role: "flipper",
                    });
                }
            }
            finite("paddles.position.x", paddle.position.x)?;
            finite("paddles.position.y", paddle.position.y)?;
            finite("paddles.rest_angle", paddle.rest_angle)?;
        }
        for bumper in &self.bumpers {
            finite("bumpers.position.x", bumper.position.x)?;
            finite("bumpers.position.y", bumper.position.y)?;
            if let Some(force) = bumper.force {
                non_negative("bumpers.force", force)?;
            }
        }
        Ok(())
    }

    /// Flip swing in radians
    pub fn flip_angle(&self) -> f32 {
        self.flip_angle_deg.to_radians()
    }
}
