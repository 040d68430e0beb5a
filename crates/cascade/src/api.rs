//! JavaScript-facing wrapper around [`Session`].
//!
//! The browser resolves pointer events to grid coordinates, calls `click`, then
//! redraws from `cells()` and the score/move getters. Colors are palette
//! indices; sprite lookup stays on the JS side.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

use crate::engine::CascadeResult;
use crate::{Session, SessionConfig};

/// Seeded game session exported to JS.
#[wasm_bindgen]
#[derive(Debug)]
pub struct Game {
    session: Session<ChaCha8Rng>,
    last: CascadeResult,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: usize,
        height: usize,
        palette_size: u8,
        initial_moves: i32,
        seed: u64,
    ) -> Result<Game, JsError> {
        let config = SessionConfig {
            width,
            height,
            palette_size,
            initial_moves,
            ..SessionConfig::default()
        };
        Ok(Self::with_config(config, seed)?)
    }

    /// Builds a game from a TOML config string.
    #[wasm_bindgen(js_name = fromToml)]
    pub fn from_toml(config: &str, seed: u64) -> Result<Game, JsError> {
        Ok(Self::with_config(SessionConfig::from_toml_str(config)?, seed)?)
    }

    /// Returns the number of blocks collected by this click, chains included.
    pub fn click(&mut self, x: i32, y: i32) -> Result<u32, JsError> {
        self.last = self.session.click(x, y)?;
        Ok(self.last.collected)
    }

    pub fn reset(&mut self) -> Result<(), JsError> {
        self.session.reset()?;
        self.last = CascadeResult::default();
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.session.grid().width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.session.grid().height()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.score()
    }

    #[wasm_bindgen(js_name = movesRemaining)]
    #[must_use]
    pub fn moves_remaining(&self) -> i32 {
        self.session.moves_remaining()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.session.is_game_over()
    }

    #[wasm_bindgen(js_name = canMove)]
    #[must_use]
    pub fn can_move(&self) -> bool {
        self.session.can_move()
    }

    #[wasm_bindgen(js_name = lastChainSteps)]
    #[must_use]
    pub fn last_chain_steps(&self) -> u32 {
        self.last.chain_steps
    }

    #[wasm_bindgen(js_name = lastMoveConsumed)]
    #[must_use]
    pub fn last_move_consumed(&self) -> bool {
        self.last.move_consumed
    }

    /// Palette index at `(x, y)`, or -1 for an Empty cell.
    #[wasm_bindgen(js_name = cellColor)]
    pub fn cell_color(&self, x: i32, y: i32) -> Result<i32, JsError> {
        Ok(self.session.cell_color(x, y)?.map_or(-1, i32::from))
    }

    /// Score and move counters as TOML, for saving progress on the JS side.
    #[wasm_bindgen(js_name = ledgerSnapshot)]
    pub fn ledger_snapshot(&self) -> Result<String, JsError> {
        Ok(self.session.ledger_snapshot()?)
    }

    /// Row-major board snapshot from the bottom row up: 0 for Empty,
    /// `color + 1` otherwise.
    #[must_use]
    pub fn cells(&self) -> Vec<u8> {
        self.session
            .grid()
            .cells()
            .iter()
            .map(|cell| cell.to_byte())
            .collect()
    }
}

impl Game {
    /// # Errors
    ///
    /// Any session configuration error.
    pub fn with_config(config: SessionConfig, seed: u64) -> crate::Result<Self> {
        let session = Session::new(config, ChaCha8Rng::seed_from_u64(seed))?;
        Ok(Self {
            session,
            last: CascadeResult::default(),
        })
    }

    #[must_use]
    pub fn session(&self) -> &Session<ChaCha8Rng> {
        &self.session
    }
}
