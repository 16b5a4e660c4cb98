//! Match state and core simulation types
//!
//! Everything the tick mutates lives in [`MatchState`]. Entities never hold
//! references to each other; the orchestrator passes them `&Bounds` and plain
//! targets.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::AiController;
use super::events::{EventSink, GameEvent};
use super::rules::{WinRules, WinVerdict};
use crate::config::{BallConfig, FieldConfig, MatchConfig, PaddleConfig};
use crate::consts::{SERVE_ANGLE_FRACTION, SERVE_PROMPT};
use crate::error::ConfigError;

/// Static play-field extents on the x/z plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub back: f32,
    pub front: f32,
}

impl Bounds {
    /// Field centered on the origin, walls pulled in by the padding
    pub fn from_field(field: &FieldConfig) -> Self {
        let half_width = field.width / 2.0;
        let half_depth = field.depth / 2.0;
        Self {
            left: -half_width,
            right: half_width,
            back: -half_depth + field.wall_padding,
            front: half_depth - field.wall_padding,
        }
    }

    #[inline]
    pub fn center_z(&self) -> f32 {
        (self.back + self.front) * 0.5
    }
}

/// Which side of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Left side, defends `bounds.left`
    Player,
    /// Right side, defends `bounds.right`
    Ai,
}

impl Side {
    /// Horizontal sign of a ball leaving this side's paddle
    #[inline]
    pub fn outgoing_dir(self) -> f32 {
        match self {
            Side::Player => 1.0,
            Side::Ai => -1.0,
        }
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// World position; y is pinned to `height`
    pub pos: Vec3,
    /// Velocity on the motion plane as (vx, vz). Always `speed` long.
    pub(crate) vel: Vec2,
    pub radius: f32,
    height: f32,
    speed: f32,
    speed_start: f32,
    speed_max: f32,
    speed_gain: f32,
    max_bounce_angle: f32,
}

impl Ball {
    pub fn new(config: &BallConfig) -> Self {
        Self {
            pos: Vec3::new(0.0, config.height, 0.0),
            vel: Vec2::ZERO,
            radius: config.radius,
            height: config.height,
            speed: 0.0,
            speed_start: config.speed_start,
            speed_max: config.speed_max,
            speed_gain: config.speed_gain,
            max_bounce_angle: config.max_bounce_angle(),
        }
    }

    /// Current scalar speed (0 while held at center)
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Velocity on the motion plane as (vx, vz)
    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn speed_max(&self) -> f32 {
        self.speed_max
    }

    #[inline]
    pub fn max_bounce_angle(&self) -> f32 {
        self.max_bounce_angle
    }

    /// Hold the ball at center, motionless
    pub fn reset_position(&mut self) {
        self.pos = Vec3::new(0.0, self.height, 0.0);
        self.vel = Vec2::ZERO;
        self.speed = 0.0;
    }

    /// Re-center and launch toward a random side at a shallow random angle
    pub fn serve<R: Rng>(&mut self, rng: &mut R) {
        self.reset_position();
        let dir_x = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let spread = self.max_bounce_angle * SERVE_ANGLE_FRACTION;
        let angle = rng.random_range(-spread..=spread);
        self.launch(dir_x, angle);
    }

    /// Set velocity to `speed_start` along `angle`, heading `dir_x` (±1)
    pub fn launch(&mut self, dir_x: f32, angle: f32) {
        self.speed = self.speed_start;
        self.set_heading(dir_x, angle);
    }

    /// Integrate one step and reflect off the back/front walls.
    ///
    /// Returns true if a wall was hit this step.
    pub fn update(&mut self, dt: f32, bounds: &Bounds) -> bool {
        self.pos.x += self.vel.x * dt;
        self.pos.z += self.vel.y * dt;
        self.pos.y = self.height;

        let mut bounced = false;
        if self.pos.z - self.radius < bounds.back {
            self.pos.z = bounds.back + self.radius;
            if self.vel.y < 0.0 {
                self.vel.y = -self.vel.y;
            }
            bounced = true;
        } else if self.pos.z + self.radius > bounds.front {
            self.pos.z = bounds.front - self.radius;
            if self.vel.y > 0.0 {
                self.vel.y = -self.vel.y;
            }
            bounced = true;
        }
        bounced
    }

    /// Paddle hit: speed up (capped) and head off along `impact_angle`
    pub fn speed_up_and_deflect(&mut self, outgoing_dir_x: f32, impact_angle: f32) {
        self.speed = (self.speed * self.speed_gain).min(self.speed_max);
        self.set_heading(outgoing_dir_x, impact_angle);
    }

    fn set_heading(&mut self, dir_x: f32, angle: f32) {
        self.vel = Vec2::new(
            dir_x.signum() * self.speed * angle.cos(),
            self.speed * angle.sin(),
        );
    }
}

/// A paddle, sliding along z at a fixed x
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub x: f32,
    pub z: f32,
    /// Extent along x
    pub width: f32,
    /// Extent along z
    pub length: f32,
    /// Speed under player control
    pub speed: f32,
}

impl Paddle {
    /// Build a centered paddle for `side`, inset from its goal line
    pub fn new(side: Side, config: &PaddleConfig, inset: f32, bounds: &Bounds) -> Self {
        let x = match side {
            Side::Player => bounds.left + inset,
            Side::Ai => bounds.right - inset,
        };
        Self {
            side,
            x,
            z: bounds.center_z(),
            width: config.width,
            length: config.length,
            speed: config.speed,
        }
    }

    #[inline]
    pub fn half_length(&self) -> f32 {
        self.length / 2.0
    }

    /// Legal range of `z` within `bounds`
    pub fn z_range(&self, bounds: &Bounds) -> (f32, f32) {
        (
            bounds.back + self.half_length(),
            bounds.front - self.half_length(),
        )
    }

    /// Held-key movement. Both keys held cancel out.
    pub fn update_player(&mut self, dt: f32, up: bool, down: bool, bounds: &Bounds) {
        if up {
            self.z += self.speed * dt;
        }
        if down {
            self.z -= self.speed * dt;
        }
        self.clamp_within(bounds);
    }

    /// Rate-limited pursuit of `target_z`
    pub fn update_ai(&mut self, dt: f32, target_z: f32, speed: f32, bounds: &Bounds) {
        // NaN and negative inputs mean no movement
        let max_delta = (speed * dt).max(0.0);
        let delta = (target_z - self.z).clamp(-max_delta, max_delta);
        self.z += delta;
        self.clamp_within(bounds);
    }

    pub fn clamp_within(&mut self, bounds: &Bounds) {
        let (min_z, max_z) = self.z_range(bounds);
        self.z = self.z.clamp(min_z, max_z);
    }

    pub fn set_z(&mut self, z: f32, bounds: &Bounds) {
        self.z = z;
        self.clamp_within(bounds);
    }
}

/// Points for each side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub ai: u32,
}

impl Score {
    pub fn award(&mut self, side: Side) {
        match side {
            Side::Player => self.player += 1,
            Side::Ai => self.ai += 1,
        }
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Ball held at center, waiting for a serve request
    Paused,
    /// Rally in progress
    Running,
}

/// Things that can move the match between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTrigger {
    ServeRequested,
    PointScored,
}

impl MatchPhase {
    /// Pure transition function. Triggers that don't apply leave the phase as is.
    pub fn transition(self, trigger: PhaseTrigger) -> MatchPhase {
        match (self, trigger) {
            (MatchPhase::Paused, PhaseTrigger::ServeRequested) => MatchPhase::Running,
            (MatchPhase::Running, PhaseTrigger::PointScored) => MatchPhase::Paused,
            (phase, _) => phase,
        }
    }
}

/// Complete match state, owned by the host and advanced by [`super::tick`]
#[derive(Debug, Clone)]
pub struct MatchState {
    pub(crate) config: MatchConfig,
    pub(crate) bounds: Bounds,
    pub(crate) ball: Ball,
    pub(crate) player: Paddle,
    pub(crate) ai_paddle: Paddle,
    pub(crate) ai: AiController,
    pub(crate) rules: WinRules,
    pub(crate) score: Score,
    pub(crate) phase: MatchPhase,
    pub(crate) verdict: WinVerdict,
    pub(crate) message: Option<String>,
    /// One-shot: the unlock request has already gone out
    pub(crate) audio_unlocked: bool,
    pub(crate) rng: Pcg32,
    pub(crate) seed: u64,
    pub(crate) time_ticks: u64,
}

impl MatchState {
    /// Validate `config` and set up a paused match. `seed` drives serve angles.
    pub fn new(config: MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let bounds = Bounds::from_field(&config.field);
        let inset = config.field.paddle_inset;
        let state = Self {
            bounds,
            ball: Ball::new(&config.ball),
            player: Paddle::new(Side::Player, &config.paddle, inset, &bounds),
            ai_paddle: Paddle::new(Side::Ai, &config.paddle, inset, &bounds),
            ai: AiController::new(&config.ai),
            rules: WinRules::new(&config.scoring),
            score: Score::default(),
            phase: MatchPhase::Paused,
            verdict: WinVerdict::Continue,
            message: Some(SERVE_PROMPT.to_string()),
            audio_unlocked: false,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            time_ticks: 0,
            config,
        };

        log::info!(
            "Match created: field {}x{}, first to {} (seed {})",
            state.config.field.width,
            state.config.field.depth,
            state.rules.max_score,
            seed
        );
        Ok(state)
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn player_paddle(&self) -> &Paddle {
        &self.player
    }

    pub fn ai_paddle(&self) -> &Paddle {
        &self.ai_paddle
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Verdict as of the last point
    pub fn verdict(&self) -> WinVerdict {
        self.verdict
    }

    /// Current center message, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Recenter both paddles and hold the ball at center
    pub fn reset_point(&mut self) {
        let center = self.bounds.center_z();
        self.player.set_z(center, &self.bounds);
        self.ai_paddle.set_z(center, &self.bounds);
        self.ball.reset_position();
    }

    /// Start a fresh match on the same config. Audio stays unlocked.
    pub fn reset_match<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        self.score = Score::default();
        self.phase = MatchPhase::Paused;
        self.verdict = WinVerdict::Continue;
        self.reset_point();
        self.set_message(Some(SERVE_PROMPT.to_string()), sink);
        sink.emit(GameEvent::ScoreChanged {
            player: 0,
            ai: 0,
        });
        log::info!("Match reset");
    }

    /// Replace the center message, emitting only on change
    pub(crate) fn set_message<S: EventSink + ?Sized>(&mut self, text: Option<String>, sink: &mut S) {
        if self.message != text {
            self.message = text.clone();
            sink.emit(GameEvent::MessageChanged(text));
        }
    }
}
