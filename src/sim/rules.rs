//! Match win conditions
//!
//! Pure: the verdict depends only on the score pair and the thresholds.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;

/// Outcome of evaluating a score pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinVerdict {
    Continue,
    /// Both sides sit exactly on the deuce threshold
    Deuce,
    PlayerWins,
    AiWins,
}

impl WinVerdict {
    pub fn is_win(self) -> bool {
        matches!(self, WinVerdict::PlayerWins | WinVerdict::AiWins)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRules {
    pub deuce_threshold: u32,
    pub skunk_threshold: u32,
    pub max_score: u32,
}

impl Default for WinRules {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl WinRules {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            deuce_threshold: config.deuce_threshold,
            skunk_threshold: config.skunk_threshold,
            max_score: config.max_score,
        }
    }

    /// Evaluate a score pair.
    ///
    /// Exact deuce must be checked before the win-by-two rule.
    pub fn evaluate(&self, player: u32, ai: u32) -> WinVerdict {
        let deuce = self.deuce_threshold;

        if player == deuce && ai == deuce {
            return WinVerdict::Deuce;
        }

        // Extended play: win by two
        if player >= deuce && ai >= deuce {
            return if player > ai.saturating_add(1) {
                WinVerdict::PlayerWins
            } else if ai > player.saturating_add(1) {
                WinVerdict::AiWins
            } else {
                WinVerdict::Continue
            };
        }

        // Skunk
        if player == self.skunk_threshold && ai == 0 {
            return WinVerdict::PlayerWins;
        }
        if ai == self.skunk_threshold && player == 0 {
            return WinVerdict::AiWins;
        }

        if player == self.max_score && player > ai.saturating_add(1) {
            return WinVerdict::PlayerWins;
        }
        if ai == self.max_score && ai > player.saturating_add(1) {
            return WinVerdict::AiWins;
        }

        WinVerdict::Continue
    }
}
