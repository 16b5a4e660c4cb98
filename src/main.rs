//! Headless match runner
//!
//! Plays the player side with a simple autopilot against the AI and logs
//! everything the simulation reports.
//!
//! Usage: `pong3d-sim [config.json] [--seed N] [--seconds N]`
//! Set `RUST_LOG=debug` to see paddle hits and sound cues.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use clap::Parser;
    use pong3d::audio::{AudioGate, SoundBackend, SoundCue};
    use pong3d::consts::*;
    use pong3d::sim::{
        EventSink, GameEvent, LogSink, MatchPhase, MatchState, TickInput, WinVerdict, tick,
    };
    use pong3d::{ConfigError, MatchConfig};
    use std::path::PathBuf;

    /// Frame time of the pretend display
    const FRAME_DT: f32 = 1.0 / 60.0;

    /// Sound backend that writes cues to the log
    #[derive(Default)]
    struct LogBackend {
        ready: bool,
    }

    impl SoundBackend for LogBackend {
        fn resume(&mut self) {
            self.ready = true;
        }

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn play(&mut self, cue: SoundCue, volume: f32) {
            log::debug!("play {:?} at {:.2}", cue, volume);
        }
    }

    /// Fans events out to the log, the audio gate and the final result
    struct HostSink {
        log: LogSink,
        audio: AudioGate<LogBackend>,
        verdict: Option<WinVerdict>,
    }

    impl EventSink for HostSink {
        fn emit(&mut self, event: GameEvent) {
            if let GameEvent::Verdict(verdict) = &event {
                if verdict.is_win() {
                    self.verdict = Some(*verdict);
                }
            }
            self.audio.emit(event.clone());
            self.log.emit(event);
        }
    }

    /// Headless Pong match runner
    #[derive(Parser)]
    #[command(name = "pong3d-sim")]
    #[command(about = "Run a headless 3D Pong match against the AI", long_about = None)]
    struct Args {
        /// JSON match config; built-in defaults when omitted
        config: Option<PathBuf>,

        /// RNG seed for serve angles (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many simulated seconds
        #[arg(long, default_value_t = 600.0)]
        seconds: f32,
    }

    /// Chase the ball's z with a small dead zone
    fn autopilot(state: &MatchState, input: &mut TickInput) {
        let paddle_z = state.player_paddle().z;
        let ball_z = state.ball().pos.z;
        input.up = ball_z > paddle_z + 0.3;
        input.down = ball_z < paddle_z - 0.3;
    }

    fn run() -> Result<(), ConfigError> {
        let args = Args::parse();
        let config = match &args.config {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                MatchConfig::from_json_file(path)?
            }
            None => MatchConfig::default(),
        };

        let seed = args.seed.unwrap_or_else(rand::random);
        let mut state = MatchState::new(config, seed)?;
        log::info!("Seed {} (pass --seed {} to replay)", state.seed(), state.seed());
        let mut input = TickInput::default();
        let mut sink = HostSink {
            log: LogSink,
            audio: AudioGate::new(LogBackend::default()),
            verdict: None,
        };

        let mut accumulator = 0.0;
        let mut elapsed = 0.0;
        while elapsed < args.seconds && sink.verdict.is_none() {
            accumulator += FRAME_DT;
            elapsed += FRAME_DT;

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if state.phase() == MatchPhase::Paused {
                    input.request_serve();
                }
                autopilot(&state, &mut input);
                tick(&mut state, &mut input, SIM_DT, &mut sink);
                accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        let score = state.score();
        match sink.verdict {
            Some(verdict) => log::info!(
                "Match over after {:.1}s: {}-{} ({:?})",
                elapsed,
                score.player,
                score.ai,
                verdict
            ),
            None => log::info!(
                "Stopped after {:.1}s without a winner: {}-{}",
                elapsed,
                score.player,
                score.ai
            ),
        }
        Ok(())
    }

    pub fn main() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();

        if let Err(e) = run() {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly; there is no headless runner
}
