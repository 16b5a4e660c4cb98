//! Sound cues and the host-side audio gate
//!
//! The simulation only names what happened ([`SoundCue`]). Hosts plug their
//! engine in through [`SoundBackend`] and route cues via [`AudioGate`], which
//! owns volume, mute, and the one-shot unlock.

use serde::{Deserialize, Serialize};

use crate::sim::{EventSink, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Ball hits the player (left) paddle
    LeftPaddleHit,
    /// Ball hits the AI (right) paddle
    RightPaddleHit,
    /// Ball hits a back/front wall
    WallBounce,
    PlayerScored,
    AiScored,
}

/// Whatever actually makes noise
pub trait SoundBackend {
    /// Start the output device. May complete asynchronously.
    fn resume(&mut self);
    /// Whether the device can play right now
    fn is_ready(&self) -> bool;
    /// Play `cue` at `volume` (0.0 - 1.0)
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Audio manager for the game
pub struct AudioGate<B: SoundBackend> {
    backend: B,
    unlocked: bool,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: SoundBackend> AudioGate<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            unlocked: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume the backend after a user gesture. Only the first call does anything.
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        self.backend.resume();
        log::info!("Audio unlock requested");
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue. Dropped (not queued) before unlock or while the backend
    /// isn't ready.
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 || !self.unlocked || !self.backend.is_ready() {
            return;
        }
        self.backend.play(cue, vol);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// Lets the gate sit directly on the simulation's event stream
impl<B: SoundBackend> EventSink for AudioGate<B> {
    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::UnlockAudio => self.unlock(),
            GameEvent::Sound(cue) => self.play(cue),
            _ => {}
        }
    }
}
