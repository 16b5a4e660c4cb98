//! pong3d - gameplay core for a 3D Pong match
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball, paddles, AI, scoring, tick)
//! - `config`: Match configuration with validation
//! - `audio`: Host-side sound cue gate (unlock, volume, mute)
//! - `error`: Configuration errors
//!
//! Rendering, input wiring and sound synthesis live in the host. The core
//! reports what happened through [`sim::EventSink`].

pub mod audio;
pub mod config;
pub mod error;
pub mod sim;

pub use config::MatchConfig;
pub use error::ConfigError;

/// Default tuning constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest dt a single tick will integrate
    pub const MAX_TICK_DT: f32 = 0.1;

    /// Arena dimensions (x = width between goals, z = depth between walls)
    pub const FIELD_WIDTH: f32 = 20.0;
    pub const FIELD_DEPTH: f32 = 12.0;
    pub const WALL_PADDING: f32 = 0.25;
    /// Distance from each goal line to its paddle center
    pub const PADDLE_INSET: f32 = 1.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 0.4;
    pub const PADDLE_LENGTH: f32 = 2.4;
    pub const PADDLE_SPEED: f32 = 10.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.25;
    pub const BALL_HEIGHT: f32 = 0.25;
    pub const BALL_START_SPEED: f32 = 8.0;
    pub const BALL_MAX_SPEED: f32 = 20.0;
    /// Speed multiplier applied on every paddle hit
    pub const BALL_SPEED_GAIN: f32 = 1.05;
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;
    /// Serves use this fraction of the max bounce angle
    pub const SERVE_ANGLE_FRACTION: f32 = 0.6;

    /// AI defaults
    pub const AI_MAX_SPEED: f32 = 7.0;
    pub const AI_RETURN_SPEED: f32 = 3.0;

    /// Scoring thresholds
    pub const DEUCE_THRESHOLD: u32 = 10;
    pub const SKUNK_THRESHOLD: u32 = 6;
    pub const MAX_SCORE: u32 = 11;

    /// Center messages
    pub const SERVE_PROMPT: &str = "Press serve to start";
    pub const POINT_PROMPT: &str = "Point scored! Press serve to continue";
    pub const DEUCE_PROMPT: &str = "Deuce! Win by two. Press serve to continue";
    pub const PLAYER_WINS_PROMPT: &str = "You win! Press serve to play on";
    pub const AI_WINS_PROMPT: &str = "AI wins! Press serve to play on";
}
