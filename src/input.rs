//! Named input actions
//!
//! The table only ever asks two questions of the input system: is an action
//! held, and was it pressed this tick. Action names are parsed into
//! [`InputAction`] when the table is configured, so a typo is a config error
//! rather than a silently dead flipper.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Actions the table reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    PaddleLeft,
    PaddleRight,
    LaunchBall,
}

impl InputAction {
    pub const ALL: [InputAction; 3] = [
        InputAction::PaddleLeft,
        InputAction::PaddleRight,
        InputAction::LaunchBall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputAction::PaddleLeft => "paddle_left",
            InputAction::PaddleRight => "paddle_right",
            InputAction::LaunchBall => "launch_ball",
        }
    }
}

impl FromStr for InputAction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownAction {
                name: s.to_string(),
            })
    }
}

/// Input query capability
pub trait InputSource {
    /// Action is currently held down
    fn is_held(&self, action: InputAction) -> bool;
    /// Action went down this tick (edge, not level)
    fn just_pressed(&self, action: InputAction) -> bool;
}

/// Snapshot of input for a single tick
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub paddle_left: bool,
    pub paddle_right: bool,
    pub launch_held: bool,
    pub paddle_left_pressed: bool,
    pub paddle_right_pressed: bool,
    /// Launch button went down this tick
    pub launch: bool,
}

impl InputFrame {
    /// Frame following `self`, with every edge derived from the level change
    pub fn next(&self, left: bool, right: bool, launch: bool) -> Self {
        Self {
            paddle_left: left,
            paddle_right: right,
            launch_held: launch,
            paddle_left_pressed: left && !self.paddle_left,
            paddle_right_pressed: right && !self.paddle_right,
            launch: launch && !self.launch_held,
        }
    }

    /// Build a frame from raw levels when only the previous launch level is
    /// known; flippers are taken as up on the previous tick
    pub fn from_levels(previous_launch_level: bool, launch_level: bool, left: bool, right: bool) -> Self {
        let previous = Self {
            launch_held: previous_launch_level,
            ..Default::default()
        };
        previous.next(left, right, launch_level)
    }
}

impl InputSource for InputFrame {
    fn is_held(&self, action: InputAction) -> bool {
        match action {
            InputAction::PaddleLeft => self.paddle_left,
            InputAction::PaddleRight => self.paddle_right,
            InputAction::LaunchBall => self.launch_held,
        }
    }

    fn just_pressed(&self, action: InputAction) -> bool {
        match action {
            InputAction::PaddleLeft => self.paddle_left_pressed,
            InputAction::PaddleRight => self.paddle_right_pressed,
            InputAction::LaunchBall => self.launch,
        }
    }
}
