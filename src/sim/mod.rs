//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied dt only, sanitized on entry
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod collision;
pub mod events;
pub mod rules;
pub mod state;
pub mod tick;

pub use ai::{AiCommand, AiController};
pub use collision::circle_rect_overlap;
pub use events::{EventSink, GameEvent, LogSink, NullSink};
pub use rules::{WinRules, WinVerdict};
pub use state::{Ball, Bounds, MatchPhase, MatchState, Paddle, PhaseTrigger, Score, Side};
pub use tick::{TickInput, tick};
