//! Per-frame simulation tick
//!
//! Advances the match by one host frame. A running frame is split into
//! substeps short enough that the ball at `speed_max` moves at most half a
//! paddle width plus its radius per step. Order within a substep: player
//! paddle, AI paddle, ball integration, paddle hits, scoring. The frame stops
//! at the first point, and the wall-bounce cue goes out once at the end.

use super::collision::circle_rect_overlap;
use super::events::{EventSink, GameEvent};
use super::rules::WinVerdict;
use super::state::{Ball, Bounds, MatchPhase, MatchState, Paddle, PhaseTrigger, Score, Side};
use crate::audio::SoundCue;
use crate::consts::*;

/// Input for a single tick
///
/// `up`/`down` are held-key state. A serve request is one-shot: the tick
/// consumes it whether or not it could act on it.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move toward +z
    pub up: bool,
    /// Move toward -z
    pub down: bool,
    serve: bool,
}

impl TickInput {
    /// Record a serve gesture (key down, click, tap)
    pub fn request_serve(&mut self) {
        self.serve = true;
    }

    /// Read and clear the serve request
    pub fn take_serve(&mut self) -> bool {
        std::mem::take(&mut self.serve)
    }
}

/// Advance the match by `dt` seconds
pub fn tick<S: EventSink + ?Sized>(
    state: &mut MatchState,
    input: &mut TickInput,
    dt: f32,
    sink: &mut S,
) {
    let dt = sanitize_dt(dt, state.config.timing.max_tick_dt);
    let serve_requested = input.take_serve();
    state.time_ticks += 1;

    match state.phase {
        MatchPhase::Paused => {
            if serve_requested {
                begin_rally(state, sink);
            }
            return;
        }
        MatchPhase::Running => {}
    }

    // Split the frame so the ball can't step over a paddle
    let max_step = state.config.paddle.width / 2.0 + state.config.ball.radius;
    let substeps = ((state.ball.speed_max() * dt / max_step).ceil() as u32).max(1);
    let step_dt = dt / substeps as f32;

    let mut wall_bounced = false;
    for _ in 0..substeps {
        let (bounced, scored) = step_rally(state, input, step_dt, sink);
        wall_bounced |= bounced;
        if scored {
            break;
        }
    }

    if wall_bounced {
        sink.emit(GameEvent::Sound(SoundCue::WallBounce));
    }
}

/// One substep of a running rally. Returns (wall bounced, point scored).
fn step_rally<S: EventSink + ?Sized>(
    state: &mut MatchState,
    input: &TickInput,
    dt: f32,
    sink: &mut S,
) -> (bool, bool) {
    let bounds = state.bounds;

    state
        .player
        .update_player(dt, input.up, input.down, &bounds);

    let command = state.ai.decide(&state.ball, bounds.center_z());
    state
        .ai_paddle
        .update_ai(dt, command.target_z, command.speed, &bounds);

    let wall_bounced = state.ball.update(dt, &bounds);

    if resolve_paddle_hit(&mut state.ball, &state.player) {
        log::debug!("Player paddle hit, speed {:.2}", state.ball.speed());
        sink.emit(GameEvent::Sound(SoundCue::LeftPaddleHit));
    }
    if resolve_paddle_hit(&mut state.ball, &state.ai_paddle) {
        log::debug!("AI paddle hit, speed {:.2}", state.ball.speed());
        sink.emit(GameEvent::Sound(SoundCue::RightPaddleHit));
    }

    match detect_score(&state.ball, &bounds) {
        Some(scorer) => {
            award_point(state, scorer, sink);
            (wall_bounced, true)
        }
        None => (wall_bounced, false),
    }
}

/// Clamp host-supplied dt into `[0, max_dt]`
fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Ignoring invalid tick dt {}", dt);
        return 0.0;
    }
    dt.min(max_dt)
}

/// Paused -> Running
fn begin_rally<S: EventSink + ?Sized>(state: &mut MatchState, sink: &mut S) {
    state.phase = state.phase.transition(PhaseTrigger::ServeRequested);

    if !state.audio_unlocked {
        state.audio_unlocked = true;
        sink.emit(GameEvent::UnlockAudio);
    }

    state.ball.serve(&mut state.rng);
    state.set_message(None, sink);

    log::info!(
        "Serve at {:.2} units/s, heading ({:.2}, {:.2})",
        state.ball.speed(),
        state.ball.vel.x,
        state.ball.vel.y
    );
}

/// Bounce the ball off `paddle` if it's heading into it and they overlap
fn resolve_paddle_hit(ball: &mut Ball, paddle: &Paddle) -> bool {
    let dir = paddle.side.outgoing_dir();
    if ball.vel.x * dir >= 0.0 {
        return false;
    }
    if !circle_rect_overlap(
        ball.pos.x,
        ball.pos.z,
        ball.radius,
        paddle.x,
        paddle.z,
        paddle.width,
        paddle.length,
    ) {
        return false;
    }

    // -1 at the back end of the paddle, +1 at the front end
    let offset = ((ball.pos.z - paddle.z) / paddle.half_length()).clamp(-1.0, 1.0);
    let angle = offset * ball.max_bounce_angle();

    // Sit the ball just outside the face it hit
    ball.pos.x = paddle.x + dir * (paddle.width / 2.0 + ball.radius);
    ball.speed_up_and_deflect(dir, angle);
    true
}

/// Which side scored, if the ball has reached a goal line
fn detect_score(ball: &Ball, bounds: &Bounds) -> Option<Side> {
    if ball.pos.x + ball.radius > bounds.right {
        Some(Side::Player)
    } else if ball.pos.x - ball.radius < bounds.left {
        Some(Side::Ai)
    } else {
        None
    }
}

/// Running -> Paused, with the score and verdict updated
fn award_point<S: EventSink + ?Sized>(state: &mut MatchState, scorer: Side, sink: &mut S) {
    state.score.award(scorer);
    let Score { player, ai } = state.score;
    sink.emit(GameEvent::ScoreChanged { player, ai });
    sink.emit(GameEvent::Sound(match scorer {
        Side::Player => SoundCue::PlayerScored,
        Side::Ai => SoundCue::AiScored,
    }));

    state.phase = state.phase.transition(PhaseTrigger::PointScored);
    state.reset_point();

    state.verdict = state.rules.evaluate(player, ai);
    log::info!(
        "Point to {:?}: {}-{} ({:?})",
        scorer,
        player,
        ai,
        state.verdict
    );

    let prompt = match state.verdict {
        WinVerdict::Continue => POINT_PROMPT,
        WinVerdict::Deuce => DEUCE_PROMPT,
        WinVerdict::PlayerWins => PLAYER_WINS_PROMPT,
        WinVerdict::AiWins => AI_WINS_PROMPT,
    };
    state.set_message(Some(prompt.to_string()), sink);

    if state.verdict != WinVerdict::Continue {
        sink.emit(GameEvent::Verdict(state.verdict));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::sim::events::NullSink;

    const DT: f32 = 0.05;

    fn new_state() -> MatchState {
        MatchState::new(MatchConfig::default(), 42).unwrap()
    }

    /// A match mid-rally with no message showing
    fn running_state() -> MatchState {
        let mut state = new_state();
        state.phase = MatchPhase::Running;
        state.message = None;
        state.audio_unlocked = true;
        state
    }

    #[test]
    fn test_serve_flag_is_consumed_once() {
        let mut input = TickInput::default();
        assert!(!input.take_serve());
        input.request_serve();
        assert!(input.take_serve());
        assert!(!input.take_serve());
    }

    #[test]
    fn test_paused_tick_without_serve_is_idle() {
        let mut state = new_state();
        let mut input = TickInput {
            up: true,
            ..Default::default()
        };
        let mut events = Vec::new();
        tick(&mut state, &mut input, DT, &mut events);

        assert!(events.is_empty());
        assert_eq!(state.phase(), MatchPhase::Paused);
        assert_eq!(state.player_paddle().z, 0.0);
        assert_eq!(state.ball().speed(), 0.0);
        assert_eq!(state.time_ticks(), 1);
    }

    #[test]
    fn test_serve_starts_rally() {
        let mut state = new_state();
        let mut input = TickInput::default();
        input.request_serve();
        let mut events = Vec::new();
        tick(&mut state, &mut input, DT, &mut events);

        assert_eq!(state.phase(), MatchPhase::Running);
        assert_eq!(state.ball().speed(), state.config().ball.speed_start);
        assert_eq!(state.message(), None);
        assert_eq!(
            events,
            vec![GameEvent::UnlockAudio, GameEvent::MessageChanged(None)]
        );
        // Serving tick doesn't integrate
        assert_eq!(state.ball().pos.x, 0.0);
        assert!(!input.take_serve());
    }

    #[test]
    fn test_serve_while_running_is_dropped() {
        let mut state = running_state();
        state.ball.launch(1.0, 0.0);
        let mut input = TickInput::default();
        input.request_serve();
        tick(&mut state, &mut input, DT, &mut NullSink);

        assert!(!input.take_serve());
        assert_eq!(state.phase(), MatchPhase::Running);
        // Still moving along the original heading, not re-served
        assert!(state.ball().pos.x > 0.0);
        assert_eq!(state.ball().pos.z, 0.0);
    }

    #[test]
    fn test_running_ball_covers_speed_times_dt() {
        let mut state = running_state();
        state.ball.launch(1.0, 0.0);
        tick(&mut state, &mut TickInput::default(), DT, &mut NullSink);
        let expected = state.config().ball.speed_start * DT;
        assert!((state.ball().pos.x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_player_scores_past_ai_paddle() {
        let mut state = running_state();
        let bounds = *state.bounds();
        state.ai_paddle.set_z(bounds.front, &bounds);
        state.ball.launch(1.0, 0.0);
        state.ball.pos.x = 9.7;
        state.ball.pos.z = -4.0;

        let mut events = Vec::new();
        tick(&mut state, &mut TickInput::default(), DT, &mut events);

        assert_eq!(state.score(), Score { player: 1, ai: 0 });
        assert_eq!(state.phase(), MatchPhase::Paused);
        assert_eq!(state.ball().speed(), 0.0);
        assert_eq!(state.ball().pos.x, 0.0);
        assert_eq!(state.ai_paddle().z, bounds.center_z());
        assert_eq!(state.message(), Some(POINT_PROMPT));
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreChanged { player: 1, ai: 0 },
                GameEvent::Sound(SoundCue::PlayerScored),
                GameEvent::MessageChanged(Some(POINT_PROMPT.to_string())),
            ]
        );
    }

    #[test]
    fn test_ai_scores_past_player_paddle() {
        let mut state = running_state();
        let bounds = *state.bounds();
        state.player.set_z(bounds.back, &bounds);
        state.ball.launch(-1.0, 0.0);
        state.ball.pos.x = -9.7;
        state.ball.pos.z = 4.0;

        let mut events = Vec::new();
        tick(&mut state, &mut TickInput::default(), DT, &mut events);

        assert_eq!(state.score(), Score { player: 0, ai: 1 });
        assert!(events.contains(&GameEvent::Sound(SoundCue::AiScored)));
        assert_eq!(state.phase(), MatchPhase::Paused);
    }

    #[test]
    fn test_player_paddle_deflects_by_impact_offset() {
        let mut state = running_state();
        state.ball.launch(-1.0, 0.0);
        state.ball.pos.x = -8.5;
        state.ball.pos.z = 0.6;

        let mut events = Vec::new();
        tick(&mut state, &mut TickInput::default(), SIM_DT, &mut events);

        assert_eq!(events, vec![GameEvent::Sound(SoundCue::LeftPaddleHit)]);
        let ball = state.ball();
        assert!((ball.pos.x - (-9.0 + 0.2 + 0.25)).abs() < 1e-5);
        let expected_speed = 8.0 * 1.05;
        assert!((ball.speed() - expected_speed).abs() < 1e-4);
        // Half way up the paddle: half the max bounce angle
        let angle = ball.vel.y.atan2(ball.vel.x);
        assert!((angle - 30f32.to_radians()).abs() < 1e-4);
        assert!(ball.vel.x > 0.0);
    }

    #[test]
    fn test_ai_paddle_center_hit_returns_straight() {
        let mut state = running_state();
        state.ball.launch(1.0, 0.0);
        state.ball.pos.x = 8.5;

        let mut events = Vec::new();
        tick(&mut state, &mut TickInput::default(), SIM_DT, &mut events);

        assert_eq!(events, vec![GameEvent::Sound(SoundCue::RightPaddleHit)]);
        let ball = state.ball();
        assert!(ball.vel.x < 0.0);
        assert_eq!(ball.vel.y, 0.0);
        assert!((ball.pos.x - (9.0 - 0.2 - 0.25)).abs() < 1e-5);
    }

    #[test]
    fn test_ball_leaving_paddle_is_not_hit_again() {
        let mut state = running_state();
        state.ball.launch(1.0, 0.0);
        state.ball.pos.x = -8.8;
        let mut events = Vec::new();
        tick(&mut state, &mut TickInput::default(), DT, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.ball().speed(), state.config().ball.speed_start);
    }

    #[test]
    fn test_wall_bounce_emits_cue() {
        let mut state = running_state();
        let front = state.bounds().front;
        state.ball.launch(1.0, 0.5);
        state.ball.pos.z = front - state.ball.radius - 0.01;

        let mut events = Vec::new();
        tick(&mut state, &mut TickInput::default(), DT, &mut events);

        assert_eq!(events, vec![GameEvent::Sound(SoundCue::WallBounce)]);
        assert!(state.ball().vel.y < 0.0);
    }

    #[test]
    fn test_deuce_and_win_verdicts() {
        let mut state = running_state();
        state.score = Score { player: 9, ai: 10 };
        state.ball.launch(1.0, 0.0);
        state.ball.pos.x = 9.9;
        state.ball.pos.z = -5.0;
        let mut events = Vec::new();
        tick(&mut state, &mut TickInput::default(), DT, &mut events);
        assert_eq!(state.verdict(), WinVerdict::Deuce);
        assert_eq!(state.message(), Some(DEUCE_PROMPT));
        assert_eq!(events.last(), Some(&GameEvent::Verdict(WinVerdict::Deuce)));

        let mut state = running_state();
        state.score = Score { player: 10, ai: 9 };
        state.ball.launch(1.0, 0.0);
        state.ball.pos.x = 9.9;
        state.ball.pos.z = -5.0;
        let mut events = Vec::new();
        tick(&mut state, &mut TickInput::default(), DT, &mut events);
        assert_eq!(state.score(), Score { player: 11, ai: 9 });
        assert_eq!(state.verdict(), WinVerdict::PlayerWins);
        assert_eq!(state.message(), Some(PLAYER_WINS_PROMPT));
        assert!(events.contains(&GameEvent::Verdict(WinVerdict::PlayerWins)));
    }

    #[test]
    fn test_audio_unlock_is_one_shot() {
        let mut state = new_state();
        let mut input = TickInput::default();
        let mut events = Vec::new();

        input.request_serve();
        tick(&mut state, &mut input, DT, &mut events);
        // Force a point so the match pauses again
        state.ball.pos.x = 9.9;
        state.ball.vel.x = state.ball.vel.x.abs();
        state.ball.pos.z = -5.0;
        tick(&mut state, &mut input, DT, &mut events);
        assert_eq!(state.phase(), MatchPhase::Paused);

        input.request_serve();
        tick(&mut state, &mut input, DT, &mut events);
        assert_eq!(state.phase(), MatchPhase::Running);

        let unlocks = events
            .iter()
            .filter(|e| **e == GameEvent::UnlockAudio)
            .count();
        assert_eq!(unlocks, 1);
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        let mut state = running_state();
        state.ball.launch(1.0, 0.3);
        let before = state.ball().pos;
        for dt in [-1.0, f32::NAN, f32::INFINITY] {
            tick(&mut state, &mut TickInput::default(), dt, &mut NullSink);
        }
        assert_eq!(state.ball().pos, before);
    }

    #[test]
    fn test_long_frame_is_truncated() {
        let mut state = running_state();
        state.ball.launch(1.0, 0.0);
        tick(&mut state, &mut TickInput::default(), 5.0, &mut NullSink);
        let max_step = state.config().ball.speed_start * MAX_TICK_DT;
        assert!((state.ball().pos.x - max_step).abs() < 1e-5);
    }

    #[test]
    fn test_fast_ball_does_not_pass_through_paddle() {
        let mut state = running_state();
        state.ball.launch(-1.0, 0.0);
        while state.ball().speed() < state.ball().speed_max() {
            state.ball.speed_up_and_deflect(-1.0, 0.0);
        }
        state.ball.pos.x = -7.5;

        let mut events = Vec::new();
        for _ in 0..3 {
            tick(&mut state, &mut TickInput::default(), MAX_TICK_DT, &mut events);
        }

        assert!(events.contains(&GameEvent::Sound(SoundCue::LeftPaddleHit)));
        assert_eq!(state.score(), Score::default());
        assert_eq!(state.phase(), MatchPhase::Running);
        assert!(state.ball().vel().x > 0.0);
    }

    #[test]
    fn test_frame_stops_at_first_point() {
        let mut state = running_state();
        let bounds = *state.bounds();
        state.player.set_z(bounds.back, &bounds);
        state.ball.launch(-1.0, 0.0);
        state.ball.pos.x = -9.7;
        state.ball.pos.z = 4.0;

        let mut input = TickInput {
            up: true,
            ..Default::default()
        };
        tick(&mut state, &mut input, MAX_TICK_DT, &mut NullSink);

        // Reset for the next serve, not carried on by the rest of the frame
        assert_eq!(state.score(), Score { player: 0, ai: 1 });
        assert_eq!(state.ball().pos.x, 0.0);
        assert_eq!(state.player_paddle().z, bounds.center_z());
    }

    #[test]
    fn test_same_seed_same_serve() {
        let mut a = new_state();
        let mut b = new_state();
        for state in [&mut a, &mut b] {
            let mut input = TickInput::default();
            input.request_serve();
            tick(state, &mut input, DT, &mut NullSink);
        }
        assert_eq!(a.ball().vel, b.ball().vel);
    }

    #[test]
    fn test_long_run_keeps_invariants() {
        let mut state = new_state();
        let mut input = TickInput::default();
        let mut events = Vec::new();
        let mut points = 0;

        for i in 0..20_000u32 {
            if state.phase() == MatchPhase::Paused {
                input.request_serve();
            }
            // Wiggle the player paddle
            input.up = (i / 90) % 3 == 0;
            input.down = (i / 90) % 3 == 1;
            tick(&mut state, &mut input, SIM_DT, &mut events);

            let bounds = *state.bounds();
            for paddle in [state.player_paddle(), state.ai_paddle()] {
                let (min_z, max_z) = paddle.z_range(&bounds);
                assert!(paddle.z >= min_z && paddle.z <= max_z);
            }
            let ball = state.ball();
            assert!(ball.speed() <= ball.speed_max());
            assert!(ball.pos.z - ball.radius >= bounds.back);
            assert!(ball.pos.z + ball.radius <= bounds.front);

            for event in events.drain(..) {
                if let GameEvent::ScoreChanged { player, ai } = event {
                    points += 1;
                    assert_eq!(player + ai, points);
                }
            }
            if state.verdict().is_win() {
                break;
            }
        }
        assert!(points > 0);
    }
}
