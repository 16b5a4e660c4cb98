//! AI paddle policy
//!
//! Two speeds and no prediction: chase the ball's z at full speed while it's
//! coming, drift back to center while it's leaving.

use serde::{Deserialize, Serialize};

use super::state::{Ball, Side};
use crate::config::AiConfig;

/// What the AI paddle should do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiCommand {
    pub target_z: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiController {
    pub max_speed: f32,
    pub return_speed: f32,
    pub track_only_incoming: bool,
}

impl AiController {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            max_speed: config.max_speed,
            return_speed: config.return_speed,
            track_only_incoming: config.track_only_incoming,
        }
    }

    /// Pick a target and pursuit speed for the AI paddle
    pub fn decide(&self, ball: &Ball, center_z: f32) -> AiCommand {
        // The AI defends the right; a ball leaving it travels in the AI's outgoing direction
        let moving_away = ball.vel.x * Side::Ai.outgoing_dir() > 0.0;
        if self.track_only_incoming && moving_away {
            AiCommand {
                target_z: center_z,
                speed: self.return_speed,
            }
        } else {
            AiCommand {
                target_z: ball.pos.z,
                speed: self.max_speed,
            }
        }
    }
}
