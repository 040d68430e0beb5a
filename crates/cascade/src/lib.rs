//! Tile-matching cascade engine.
//!
//! A [`Session`] owns a [`Grid`] of colored blocks and a [`Ledger`] of score and
//! moves. Clicking a block removes its same-colored 4-connected cluster, lets
//! the remaining blocks fall toward row 0, refills the top, and keeps removing
//! matches that re-form at the clicked coordinate.

pub mod api;
pub mod cell;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

use cell::{Cell, ColorId, Pos};
use rand::Rng;

pub use config::SessionConfig;
pub use engine::{CascadeObserver, CascadeResult, CascadeStep};
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use session::Session;

/// Largest board a grid will allocate.
pub const MAX_CELLS: usize = 1 << 20;

/// 2D grid of block cells, stored row-major. Row 0 is the bottom; blocks
/// fall toward it.
///
/// Out-of-bounds coordinates are never stored; reads and writes outside the
/// grid fail with [`Error::OutOfBounds`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every cell Empty.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimension`] if either dimension is zero or the board
    /// would hold more than [`MAX_CELLS`] cells.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .filter(|&len| len > 0 && len <= MAX_CELLS)
            .ok_or(Error::InvalidDimension { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; len],
        })
    }

    /// Creates a grid where every cell holds a uniformly random palette color.
    ///
    /// Colors are drawn column by column, bottom to top, the same order
    /// refill uses.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimension`] for a zero dimension,
    /// [`Error::InvalidConfiguration`] for an empty palette.
    pub fn filled<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        palette: u8,
        rng: &mut R,
    ) -> Result<Self> {
        if palette == 0 {
            return Err(Error::invalid_configuration("palette must not be empty"));
        }
        let mut grid = Self::new(width, height)?;
        for x in 0..width {
            for y in 0..height {
                let color = engine::settle::random_color(rng, palette);
                grid.cells[y * width + x] = Cell::Occupied(color);
            }
        }
        Ok(grid)
    }

    /// Parses the format produced by `Display`: one string per row, top row
    /// first, `.` for Empty, `0`-`9` then `a`-`z` for colors 0 to 35.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimension`] for no rows or empty rows,
    /// [`Error::InvalidConfiguration`] for ragged rows or unknown characters.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Self::new(width, height)?;
        for (line, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(Error::invalid_configuration(format!(
                    "row {line} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            let y = height - 1 - line;
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => Cell::Empty,
                    other => match other.to_digit(36) {
                        Some(color) if !other.is_ascii_uppercase() => Cell::Occupied(color as u8),
                        _ => {
                            return Err(Error::invalid_configuration(format!(
                                "unexpected cell character {other:?} at ({x}, {y})"
                            )))
                        }
                    },
                };
                grid.cells[y * width + x] = cell;
            }
        }
        Ok(grid)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major view of every cell.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Result<usize> {
        if self.in_bounds(x, y) {
            Ok(y as usize * self.width + x as usize)
        } else {
            Err(Error::OutOfBounds { x, y })
        }
    }

    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if `(x, y)` is outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Result<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Shorthand for `get(pos.x, pos.y)`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if `pos` is outside the grid.
    pub fn at(&self, pos: Pos) -> Result<Cell> {
        self.get(pos.x, pos.y)
    }

    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if `(x, y)` is outside the grid.
    pub fn color_at(&self, x: i32, y: i32) -> Result<Option<ColorId>> {
        self.get(x, y).map(Cell::color)
    }

    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if `(x, y)` is outside the grid.
    pub fn set(&mut self, x: i32, y: i32, color: ColorId) -> Result<()> {
        let i = self.index(x, y)?;
        self.cells[i] = Cell::Occupied(color);
        Ok(())
    }

    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if `(x, y)` is outside the grid.
    pub fn clear(&mut self, x: i32, y: i32) -> Result<()> {
        let i = self.index(x, y)?;
        self.cells[i] = Cell::Empty;
        Ok(())
    }

    /// Moves the content of `from` into `to` and empties `from`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] if either position is outside the grid. Nothing
    /// is written in that case.
    pub fn move_cell(&mut self, from: Pos, to: Pos) -> Result<()> {
        let src = self.index(from.x, from.y)?;
        let dst = self.index(to.x, to.y)?;
        if src != dst {
            self.cells[dst] = self.cells[src];
            self.cells[src] = Cell::Empty;
        }
        Ok(())
    }

    /// True when no cell is Empty.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Iterates every in-bounds position, row-major from the bottom row.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let w = self.width as i32;
        let h = self.height as i32;
        (0..h).flat_map(move |y| (0..w).map(move |x| Pos::new(x, y)))
    }

    /// Iterates every in-bounds position column by column, each bottom to top.
    pub fn column_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let w = self.width as i32;
        let h = self.height as i32;
        (0..w).flat_map(move |x| (0..h).map(move |y| Pos::new(x, y)))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.width).rev().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}
