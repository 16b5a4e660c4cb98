//! Configuration errors
//!
//! A bad config is a setup fault: [`crate::sim::MatchState::new`] refuses to
//! build a match rather than running undefined gameplay.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be finite and positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("paddle length {length} must be shorter than the playable depth {depth}")]
    PaddleTooLong { length: f32, depth: f32 },

    #[error("ball diameter {diameter} must fit inside the field ({width} x {depth})")]
    BallTooLarge { diameter: f32, width: f32, depth: f32 },

    #[error("paddle inset {inset} must leave the paddle inside the field (half width {half_width})")]
    PaddleInset { inset: f32, half_width: f32 },

    #[error("ball speed_start {start} exceeds speed_max {max}")]
    SpeedOrder { start: f32, max: f32 },

    #[error("ball speed_gain {0} must be at least 1.0")]
    SpeedGain(f32),

    #[error("max bounce angle {0} degrees must be within (0, 90)")]
    BounceAngle(f32),

    #[error(
        "scoring thresholds must satisfy max_score > deuce > skunk (got max {max_score}, deuce {deuce}, skunk {skunk})"
    )]
    ScoreOrder {
        max_score: u32,
        deuce: u32,
        skunk: u32,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}
