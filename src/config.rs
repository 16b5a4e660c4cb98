//! Match configuration
//!
//! Loaded from JSON by the host (every field optional, missing ones fall back
//! to [`crate::consts`]) and validated before a match is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Arena extents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Extent along x (goal line to goal line)
    pub width: f32,
    /// Extent along z (wall to wall, before padding)
    pub depth: f32,
    /// Wall thickness taken off each side of the depth
    pub wall_padding: f32,
    /// Distance from a goal line to its paddle center
    pub paddle_inset: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            depth: FIELD_DEPTH,
            wall_padding: WALL_PADDING,
            paddle_inset: PADDLE_INSET,
        }
    }
}

impl FieldConfig {
    /// Depth left between the two walls
    pub fn playable_depth(&self) -> f32 {
        self.depth - 2.0 * self.wall_padding
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleConfig {
    /// Extent along x
    pub width: f32,
    /// Extent along z
    pub length: f32,
    /// Player paddle speed (units/s)
    pub speed: f32,
}

impl Default for PaddleConfig {
    fn default() -> Self {
        Self {
            width: PADDLE_WIDTH,
            length: PADDLE_LENGTH,
            speed: PADDLE_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    /// Fixed y the ball rides at
    pub height: f32,
    pub speed_start: f32,
    pub speed_max: f32,
    /// Multiplier applied on every paddle hit
    pub speed_gain: f32,
    /// Largest deflection a paddle edge hit imparts
    pub max_bounce_angle_deg: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            height: BALL_HEIGHT,
            speed_start: BALL_START_SPEED,
            speed_max: BALL_MAX_SPEED,
            speed_gain: BALL_SPEED_GAIN,
            max_bounce_angle_deg: MAX_BOUNCE_ANGLE_DEG,
        }
    }
}

impl BallConfig {
    pub fn max_bounce_angle(&self) -> f32 {
        self.max_bounce_angle_deg.to_radians()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Pursuit speed while tracking the ball
    pub max_speed: f32,
    /// Drift speed back to center while the ball moves away
    pub return_speed: f32,
    /// Only chase the ball while it heads toward the AI side
    pub track_only_incoming: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            max_speed: AI_MAX_SPEED,
            return_speed: AI_RETURN_SPEED,
            track_only_incoming: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub deuce_threshold: u32,
    pub skunk_threshold: u32,
    pub max_score: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            deuce_threshold: DEUCE_THRESHOLD,
            skunk_threshold: SKUNK_THRESHOLD,
            max_score: MAX_SCORE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Largest dt a single tick integrates; longer frames are truncated
    pub max_tick_dt: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_tick_dt: MAX_TICK_DT,
        }
    }
}

/// Complete match configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub field: FieldConfig,
    pub paddle: PaddleConfig,
    pub ball: BallConfig,
    pub ai: AiConfig,
    pub scoring: ScoringConfig,
    pub timing: TimingConfig,
}

impl MatchConfig {
    /// Parse a config from JSON. Not validated; see [`MatchConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the structural constraints gameplay relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("field.width", self.field.width),
            ("field.depth", self.field.depth),
            ("paddle.width", self.paddle.width),
            ("paddle.length", self.paddle.length),
            ("paddle.speed", self.paddle.speed),
            ("ball.radius", self.ball.radius),
            ("ball.height", self.ball.height),
            ("ball.speed_start", self.ball.speed_start),
            ("ball.speed_max", self.ball.speed_max),
            ("ai.max_speed", self.ai.max_speed),
            ("ai.return_speed", self.ai.return_speed),
            ("timing.max_tick_dt", self.timing.max_tick_dt),
        ];
        for (field, value) in positives {
            // also rejects NaN
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.field.wall_padding >= 0.0 && self.field.wall_padding.is_finite()) {
            return Err(ConfigError::NonPositive {
                field: "field.wall_padding",
                value: self.field.wall_padding,
            });
        }

        let depth = self.field.playable_depth();
        if !(self.paddle.length < depth) {
            return Err(ConfigError::PaddleTooLong {
                length: self.paddle.length,
                depth,
            });
        }

        let diameter = self.ball.radius * 2.0;
        if diameter >= self.field.width || diameter >= depth {
            return Err(ConfigError::BallTooLarge {
                diameter,
                width: self.field.width,
                depth,
            });
        }

        let half_width = self.field.width / 2.0;
        let inset = self.field.paddle_inset;
        if !(inset >= self.paddle.width / 2.0 && inset < half_width) {
            return Err(ConfigError::PaddleInset { inset, half_width });
        }

        if self.ball.speed_start > self.ball.speed_max {
            return Err(ConfigError::SpeedOrder {
                start: self.ball.speed_start,
                max: self.ball.speed_max,
            });
        }
        if !(self.ball.speed_gain >= 1.0) {
            return Err(ConfigError::SpeedGain(self.ball.speed_gain));
        }
        let angle = self.ball.max_bounce_angle_deg;
        if !(angle > 0.0 && angle < 90.0) {
            return Err(ConfigError::BounceAngle(angle));
        }

        let s = &self.scoring;
        if !(s.max_score > s.deuce_threshold && s.deuce_threshold > s.skunk_threshold) {
            return Err(ConfigError::ScoreOrder {
                max_score: s.max_score,
                deuce: s.deuce_threshold,
                skunk: s.skunk_threshold,
            });
        }

        Ok(())
    }
}
