//! Notifications from the simulation to the presentation layer

use serde::{Deserialize, Serialize};

use super::rules::WinVerdict;
use crate::audio::SoundCue;

/// Something the host may want to show or play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { player: u32, ai: u32 },
    /// New center message, `None` clears it
    MessageChanged(Option<String>),
    Sound(SoundCue),
    /// First serve of the match: the host may start its audio output now
    UnlockAudio,
    /// Emitted after a point whenever the verdict is not `Continue`
    Verdict(WinVerdict),
}

/// Receiver for [`GameEvent`]s
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Collects events in order
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Writes every event to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: GameEvent) {
        match &event {
            GameEvent::Sound(cue) => log::debug!("sound: {:?}", cue),
            other => log::info!("event: {:?}", other),
        }
    }
}
