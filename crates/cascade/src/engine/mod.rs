//! One player move as a stepped state machine.
//!
//! A cascade runs `Match → Settle → (Chain → Settle)* → Finished`. Each call
//! to [`CascadeEngine::step`] performs one phase and reports it as a
//! [`CascadeStep`], so a presentation layer can animate between steps. Only the
//! initial match consumes a move; chain steps only add score.

pub mod chain;
pub mod settle;

use rand::Rng;

use crate::cell::Pos;
use crate::cluster::{find_cluster, Cluster};
use crate::{Error, Grid, Ledger, Result, SessionConfig};

pub use settle::SettleReport;

/// Summary of a completed click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeResult {
    /// Blocks removed by the initial match plus every chain step.
    pub collected: u32,
    pub chain_steps: u32,
    /// True only when the initial click matched. Never more than one move.
    pub move_consumed: bool,
    /// The chain cap stopped the loop while the anchor still matched.
    pub chain_capped: bool,
}

/// One observable phase of a cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeStep {
    /// The clicked block had no same-colored neighbour.
    NoMatch { anchor: Pos },
    /// The clicked cluster was removed.
    Matched { cluster: Cluster },
    Settled(SettleReport),
    /// A match re-formed at the anchor and was removed.
    Chained { depth: u32, cluster: Cluster },
    Finished(CascadeResult),
}

/// Receives every step of an observed click along with the grid after it.
pub trait CascadeObserver {
    fn on_step(&mut self, step: &CascadeStep, grid: &Grid);
}

impl<F> CascadeObserver for F
where
    F: FnMut(&CascadeStep, &Grid),
{
    fn on_step(&mut self, step: &CascadeStep, grid: &Grid) {
        self(step, grid);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Match,
    Settle,
    Chain,
    Done,
}

/// An in-flight cascade anchored at the clicked coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cascade {
    anchor: Pos,
    phase: Phase,
    palette: u8,
    max_chain_steps: Option<u32>,
    result: CascadeResult,
}

impl Cascade {
    fn new(anchor: Pos, palette: u8, max_chain_steps: Option<u32>) -> Self {
        Self {
            anchor,
            phase: Phase::Match,
            palette,
            max_chain_steps,
            result: CascadeResult::default(),
        }
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        ledger: &mut Ledger,
        rng: &mut R,
    ) -> Result<CascadeStep> {
        match self.phase {
            Phase::Match => {
                let cluster = find_cluster(grid, self.anchor)?;
                if !cluster.is_match() {
                    self.phase = Phase::Done;
                    return Ok(CascadeStep::NoMatch {
                        anchor: self.anchor,
                    });
                }
                let collected = chain::remove_cluster(grid, &cluster)?;
                ledger.record_match(collected);
                ledger.consume_move();
                self.result.collected = self.result.collected.saturating_add(collected);
                self.result.move_consumed = true;
                self.phase = Phase::Settle;
                Ok(CascadeStep::Matched { cluster })
            }
            Phase::Settle => {
                let report = settle::settle(grid, self.palette, rng)?;
                self.phase = Phase::Chain;
                Ok(CascadeStep::Settled(report))
            }
            Phase::Chain => {
                let Some(cluster) = chain::next_link(grid, self.anchor)? else {
                    return Ok(self.finish());
                };
                if self
                    .max_chain_steps
                    .is_some_and(|cap| self.result.chain_steps >= cap)
                {
                    self.result.chain_capped = true;
                    tracing::debug!(
                        target: "cascade::chain",
                        anchor = %self.anchor,
                        chain_steps = self.result.chain_steps,
                        "chain cap reached"
                    );
                    return Ok(self.finish());
                }
                let collected = chain::remove_cluster(grid, &cluster)?;
                ledger.record_match(collected);
                self.result.collected = self.result.collected.saturating_add(collected);
                self.result.chain_steps += 1;
                self.phase = Phase::Settle;
                tracing::debug!(
                    target: "cascade::chain",
                    anchor = %self.anchor,
                    depth = self.result.chain_steps,
                    collected,
                    "chain reaction"
                );
                Ok(CascadeStep::Chained {
                    depth: self.result.chain_steps,
                    cluster,
                })
            }
            Phase::Done => Ok(self.finish()),
        }
    }

    fn finish(&mut self) -> CascadeStep {
        self.phase = Phase::Done;
        CascadeStep::Finished(self.result)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum EngineState {
    #[default]
    Idle,
    Processing(Cascade),
}

/// Drives at most one cascade at a time over a borrowed grid and ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CascadeEngine {
    state: EngineState,
}

impl CascadeEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        matches!(self.state, EngineState::Processing(_))
    }

    /// Moves `Idle → Processing` for a click at `anchor`, taking the refill
    /// palette and chain cap from `config`.
    ///
    /// # Errors
    ///
    /// [`Error::Busy`] if a cascade is already in flight,
    /// [`Error::InvalidConfiguration`] for a palette of fewer than two colors.
    /// State is unchanged in both cases.
    pub fn begin(&mut self, anchor: Pos, config: &SessionConfig) -> Result<()> {
        if self.is_processing() {
            return Err(Error::Busy);
        }
        if config.palette_size < 2 {
            return Err(Error::invalid_configuration(format!(
                "palette_size must be at least 2, got {}",
                config.palette_size
            )));
        }
        tracing::debug!(target: "cascade::engine", %anchor, "cascade started");
        self.state = EngineState::Processing(Cascade::new(
            anchor,
            config.palette_size,
            config.max_chain_steps,
        ));
        Ok(())
    }

    /// Advances the in-flight cascade by one phase. Returns `None` when idle.
    ///
    /// The `Finished` step returns the engine to `Idle`. An error aborts the
    /// cascade and also returns to `Idle`.
    ///
    /// # Errors
    ///
    /// Grid or cluster errors raised by the phase.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        ledger: &mut Ledger,
        rng: &mut R,
    ) -> Result<Option<CascadeStep>> {
        let EngineState::Processing(cascade) = &mut self.state else {
            return Ok(None);
        };
        let step = match cascade.advance(grid, ledger, rng) {
            Ok(step) => step,
            Err(err) => {
                tracing::warn!(target: "cascade::engine", error = %err, "cascade aborted");
                self.state = EngineState::Idle;
                return Err(err);
            }
        };
        if let CascadeStep::Finished(result) = &step {
            tracing::debug!(
                target: "cascade::engine",
                collected = result.collected,
                chain_steps = result.chain_steps,
                move_consumed = result.move_consumed,
                "cascade finished"
            );
            self.state = EngineState::Idle;
        }
        Ok(Some(step))
    }

    /// Runs a whole click synchronously: begin, then step until finished.
    ///
    /// # Errors
    ///
    /// Whatever [`CascadeEngine::begin`] reports, or any error from a phase.
    pub fn process_click<R: Rng + ?Sized, O: CascadeObserver + ?Sized>(
        &mut self,
        grid: &mut Grid,
        ledger: &mut Ledger,
        anchor: Pos,
        config: &SessionConfig,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<CascadeResult> {
        self.begin(anchor, config)?;
        loop {
            match self.step(grid, ledger, rng)? {
                Some(CascadeStep::Finished(result)) => {
                    observer.on_step(&CascadeStep::Finished(result), grid);
                    return Ok(result);
                }
                Some(step) => observer.on_step(&step, grid),
                None => return Ok(CascadeResult::default()),
            }
        }
    }

    /// Drops any in-flight cascade.
    pub fn reset(&mut self) {
        self.state = EngineState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedColors;

    fn noop(_: &CascadeStep, _: &Grid) {}

    #[test]
    fn no_match_leaves_grid_and_ledger() {
        let mut grid = Grid::from_rows(&["01", "23"]).unwrap();
        let before = grid.clone();
        let mut ledger = Ledger::new(3);
        let mut engine = CascadeEngine::new();
        let mut rng = ScriptedColors::new(4, &[]);

        let result = engine
            .process_click(&mut grid, &mut ledger, Pos::new(0, 0), &SessionConfig::default(), &mut rng, &mut noop)
            .unwrap();

        assert_eq!(result, CascadeResult::default());
        assert_eq!(grid, before);
        assert_eq!(ledger, Ledger::new(3));
        assert!(!engine.is_processing());
    }

    #[test]
    fn match_consumes_one_move_and_scores() {
        // Bottom pair of 0s; refill brings 2 and 3, so nothing chains.
        let mut grid = Grid::from_rows(&["12", "00"]).unwrap();
        let mut ledger = Ledger::new(3);
        let mut engine = CascadeEngine::new();
        let mut rng = ScriptedColors::new(4, &[2, 3]);

        let result = engine
            .process_click(&mut grid, &mut ledger, Pos::new(0, 0), &SessionConfig::default(), &mut rng, &mut noop)
            .unwrap();

        assert_eq!(
            result,
            CascadeResult {
                collected: 2,
                chain_steps: 0,
                move_consumed: true,
                chain_capped: false,
            }
        );
        assert_eq!(grid.to_string(), "23\n12");
        assert_eq!(ledger.score(), 2);
        assert_eq!(ledger.moves_remaining(), 2);
    }

    #[test]
    fn steps_are_reported_in_order() {
        let mut grid = Grid::from_rows(&["12", "00"]).unwrap();
        let mut ledger = Ledger::new(3);
        let mut engine = CascadeEngine::new();
        let mut rng = ScriptedColors::new(4, &[2, 3]);
        let mut kinds = Vec::new();
        let mut record = |step: &CascadeStep, _: &Grid| {
            kinds.push(match step {
                CascadeStep::NoMatch { .. } => "no-match",
                CascadeStep::Matched { .. } => "matched",
                CascadeStep::Settled(_) => "settled",
                CascadeStep::Chained { .. } => "chained",
                CascadeStep::Finished(_) => "finished",
            });
        };

        engine
            .process_click(&mut grid, &mut ledger, Pos::new(1, 0), &SessionConfig::default(), &mut rng, &mut record)
            .unwrap();

        assert_eq!(kinds, ["matched", "settled", "finished"]);
    }

    #[test]
    fn begin_while_processing_is_busy() {
        let mut grid = Grid::from_rows(&["12", "00"]).unwrap();
        let mut ledger = Ledger::new(3);
        let mut engine = CascadeEngine::new();
        let mut rng = ScriptedColors::new(4, &[2, 3]);

        let config = SessionConfig::default();
        engine.begin(Pos::new(0, 0), &config).unwrap();
        let step = engine.step(&mut grid, &mut ledger, &mut rng).unwrap();
        assert!(matches!(step, Some(CascadeStep::Matched { .. })));

        let snapshot = engine.clone();
        assert_eq!(engine.begin(Pos::new(1, 1), &config), Err(Error::Busy));
        assert_eq!(engine, snapshot);

        while engine.is_processing() {
            engine.step(&mut grid, &mut ledger, &mut rng).unwrap();
        }
        assert_eq!(engine.step(&mut grid, &mut ledger, &mut rng), Ok(None));
    }

    #[test]
    fn error_aborts_cascade() {
        let mut grid = Grid::from_rows(&["1.", "00"]).unwrap();
        let mut ledger = Ledger::new(3);
        let mut engine = CascadeEngine::new();
        let mut rng = ScriptedColors::new(4, &[]);

        engine.begin(Pos::new(1, 1), &SessionConfig::default()).unwrap();
        assert_eq!(
            engine.step(&mut grid, &mut ledger, &mut rng),
            Err(Error::EmptySeed { x: 1, y: 1 })
        );
        assert!(!engine.is_processing());
    }

    #[test]
    fn single_color_palette_is_refused_before_any_change() {
        let mut grid = Grid::from_rows(&["12", "00"]).unwrap();
        let before = grid.clone();
        let mut ledger = Ledger::new(3);
        let mut engine = CascadeEngine::new();
        let mut rng = ScriptedColors::new(1, &[]);
        let config = SessionConfig {
            palette_size: 1,
            ..SessionConfig::default()
        };

        let err = engine
            .process_click(&mut grid, &mut ledger, Pos::new(0, 0), &config, &mut rng, &mut noop)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidConfiguration { .. }));
        assert!(!engine.is_processing());
        assert_eq!(grid, before);
        assert_eq!(ledger, Ledger::new(3));
    }

    #[test]
    fn collected_saturates_like_the_score() {
        let mut grid = Grid::from_rows(&["12", "00"]).unwrap();
        let mut ledger = Ledger::new(3);
        ledger.record_match(u32::MAX - 1);
        let mut rng = ScriptedColors::new(4, &[]);
        let mut cascade = Cascade::new(Pos::new(0, 0), 4, None);
        cascade.result.collected = u32::MAX - 1;

        let step = cascade.advance(&mut grid, &mut ledger, &mut rng).unwrap();

        assert!(matches!(step, CascadeStep::Matched { .. }));
        assert_eq!(cascade.result.collected, u32::MAX);
        assert_eq!(ledger.score(), u32::MAX);
    }
}
