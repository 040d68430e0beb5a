//! A single game: grid, ledger, cascade engine and random source under one owner.

use rand::Rng;

use crate::cell::{Cell, ColorId, Pos};
use crate::engine::{CascadeEngine, CascadeObserver, CascadeResult, CascadeStep};
use crate::{Error, Grid, Ledger, Result, SessionConfig};

/// Everything one player's game needs. Hosts hold it and pass clicks in.
///
/// `R` supplies refill colors; pass a seeded `rand_chacha::ChaCha8Rng` for
/// reproducible games.
#[derive(Debug)]
pub struct Session<R> {
    config: SessionConfig,
    grid: Grid,
    ledger: Ledger,
    engine: CascadeEngine,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Starts a game on a randomly filled board.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn new(config: SessionConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let grid = Grid::filled(config.width, config.height, config.palette_size, &mut rng)?;
        Ok(Self::assemble(config, grid, rng))
    }

    /// Starts a game on a prepared board.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if `config` is invalid, the board size
    /// differs from the config, or any cell is Empty or outside the palette.
    pub fn with_grid(config: SessionConfig, grid: Grid, rng: R) -> Result<Self> {
        config.validate()?;
        if grid.width() != config.width || grid.height() != config.height {
            return Err(Error::invalid_configuration(format!(
                "grid is {}x{}, config expects {}x{}",
                grid.width(),
                grid.height(),
                config.width,
                config.height
            )));
        }
        if let Some(pos) = grid.positions().find(|&pos| {
            !matches!(grid.at(pos), Ok(Cell::Occupied(color)) if color < config.palette_size)
        }) {
            return Err(Error::invalid_configuration(format!(
                "cell {pos} is empty or outside the palette"
            )));
        }
        Ok(Self::assemble(config, grid, rng))
    }

    fn assemble(config: SessionConfig, grid: Grid, rng: R) -> Self {
        tracing::debug!(
            target: "cascade::session",
            width = config.width,
            height = config.height,
            palette_size = config.palette_size,
            initial_moves = config.initial_moves,
            "session created"
        );
        Self {
            ledger: Ledger::new(config.initial_moves),
            engine: CascadeEngine::new(),
            config,
            grid,
            rng,
        }
    }

    /// Processes one click to completion.
    ///
    /// When the ledger forbids a move this succeeds with a zero result and
    /// changes nothing.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] for a coordinate off the board, [`Error::Busy`]
    /// while a stepped cascade is still in flight. Neither touches any state.
    pub fn click(&mut self, x: i32, y: i32) -> Result<CascadeResult> {
        self.click_observed(x, y, &mut |_: &CascadeStep, _: &Grid| {})
    }

    /// Like [`Session::click`], reporting each step to `observer`.
    ///
    /// # Errors
    ///
    /// Same as [`Session::click`].
    pub fn click_observed<O: CascadeObserver + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        observer: &mut O,
    ) -> Result<CascadeResult> {
        let anchor = self.check_click(x, y)?;
        if !self.ledger.can_move() {
            tracing::debug!(target: "cascade::session", %anchor, "click ignored, no moves left");
            return Ok(CascadeResult::default());
        }
        self.engine.process_click(
            &mut self.grid,
            &mut self.ledger,
            anchor,
            &self.config,
            &mut self.rng,
            observer,
        )
    }

    /// Begins a click without running it. Drive it with [`Session::step`].
    ///
    /// Returns `false` (and starts nothing) when the ledger forbids a move.
    ///
    /// # Errors
    ///
    /// Same as [`Session::click`].
    pub fn start_click(&mut self, x: i32, y: i32) -> Result<bool> {
        let anchor = self.check_click(x, y)?;
        if !self.ledger.can_move() {
            return Ok(false);
        }
        self.engine.begin(anchor, &self.config)?;
        Ok(true)
    }

    /// Advances a started click by one phase. `None` once idle.
    ///
    /// # Errors
    ///
    /// Grid errors from the phase; the cascade is abandoned.
    pub fn step(&mut self) -> Result<Option<CascadeStep>> {
        self.engine.step(&mut self.grid, &mut self.ledger, &mut self.rng)
    }

    fn check_click(&self, x: i32, y: i32) -> Result<Pos> {
        if !self.grid.in_bounds(x, y) {
            return Err(Error::OutOfBounds { x, y });
        }
        if self.engine.is_processing() {
            return Err(Error::Busy);
        }
        Ok(Pos::new(x, y))
    }

    /// New random board, fresh ledger, any in-flight cascade dropped.
    ///
    /// # Errors
    ///
    /// Only what [`Grid::filled`] reports, which a validated config rules out.
    /// The session is untouched on error.
    pub fn reset(&mut self) -> Result<()> {
        let grid = Grid::filled(
            self.config.width,
            self.config.height,
            self.config.palette_size,
            &mut self.rng,
        )?;
        self.grid = grid;
        self.ledger.reset(self.config.initial_moves);
        self.engine.reset();
        tracing::debug!(target: "cascade::session", "session reset");
        Ok(())
    }
}

impl<R> Session<R> {
    #[must_use]
    pub fn score(&self) -> u32 {
        self.ledger.score()
    }

    #[must_use]
    pub fn moves_remaining(&self) -> i32 {
        self.ledger.moves_remaining()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.ledger.is_game_over()
    }

    #[must_use]
    pub fn can_move(&self) -> bool {
        self.ledger.can_move()
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.engine.is_processing()
    }

    /// # Errors
    ///
    /// [`Error::OutOfBounds`] for a coordinate off the board.
    pub fn cell_color(&self, x: i32, y: i32) -> Result<Option<ColorId>> {
        self.grid.color_at(x, y)
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Score, moves and active flag as a TOML table, for host-side saves.
    ///
    /// # Errors
    ///
    /// [`Error::Snapshot`] if serialization fails.
    pub fn ledger_snapshot(&self) -> Result<String> {
        toml::to_string(&self.ledger).map_err(|err| Error::Snapshot(err.to_string()))
    }
}
