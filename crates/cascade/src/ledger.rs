//! Score and move bookkeeping that gates player clicks.

use serde::Serialize;

/// Tracks score, remaining moves, and whether the game is still running.
///
/// `is_active` flips to false exactly once per game, when a consumed move
/// brings `moves_remaining` to zero or below. Only [`Ledger::reset`] turns it
/// back on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ledger {
    score: u32,
    moves_remaining: i32,
    initial_moves: i32,
    is_active: bool,
}

impl Ledger {
    #[must_use]
    pub fn new(initial_moves: i32) -> Self {
        Self {
            score: 0,
            moves_remaining: initial_moves,
            initial_moves,
            is_active: true,
        }
    }

    pub fn reset(&mut self, initial_moves: i32) {
        *self = Self::new(initial_moves);
    }

    #[must_use]
    pub fn can_move(&self) -> bool {
        self.is_active && self.moves_remaining > 0
    }

    /// Adds collected blocks to the score. Moves are untouched.
    pub fn record_match(&mut self, blocks_collected: u32) {
        self.score = self.score.saturating_add(blocks_collected);
    }

    pub fn consume_move(&mut self) {
        self.moves_remaining -= 1;
        if self.moves_remaining <= 0 && self.is_active {
            self.is_active = false;
            tracing::debug!(
                target: "cascade::ledger",
                score = self.score,
                "out of moves, game over"
            );
        }
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        !self.is_active
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn moves_remaining(&self) -> i32 {
        self.moves_remaining
    }

    #[must_use]
    pub fn initial_moves(&self) -> i32 {
        self.initial_moves
    }
}
