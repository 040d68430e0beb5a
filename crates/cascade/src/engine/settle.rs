//! Gravity compaction and refill.
//!
//! Gravity scans each column from row 0 upward with a write cursor, so blocks
//! keep their relative order and color. Refill then walks the grid column by
//! column, bottom to top, and spawns a random palette color in every hole left
//! at the top.

use rand::Rng;

use crate::cell::{Cell, ColorId, Pos};
use crate::{Error, Grid, Result};

/// What one settle pass did to the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    /// Blocks that moved down.
    pub fallen: u32,
    /// Fresh blocks created by refill.
    pub spawned: u32,
}

pub(crate) fn random_color<R: Rng + ?Sized>(rng: &mut R, palette: u8) -> ColorId {
    rng.gen_range(0..palette)
}

/// Restores a fully occupied grid: gravity first, then refill.
///
/// Afterwards no cell is Empty and no column has a hole under a block.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] for an empty palette. The grid is not
/// touched in that case.
pub fn settle<R: Rng + ?Sized>(grid: &mut Grid, palette: u8, rng: &mut R) -> Result<SettleReport> {
    if palette == 0 {
        return Err(Error::invalid_configuration("palette must not be empty"));
    }
    let fallen = apply_gravity(grid)?;
    let spawned = refill(grid, palette, rng)?;
    let report = SettleReport { fallen, spawned };
    tracing::trace!(
        target: "cascade::settle",
        fallen = report.fallen,
        spawned = report.spawned,
        "grid settled"
    );
    Ok(report)
}

/// Drops every block to the lowest free slot of its column, toward row 0.
///
/// Columns are independent; each needs a single pass.
///
/// # Errors
///
/// Only propagates bounds errors, which cannot occur for in-grid columns.
pub fn apply_gravity(grid: &mut Grid) -> Result<u32> {
    let w = grid.width() as i32;
    let h = grid.height() as i32;
    let mut fallen = 0;

    for x in 0..w {
        let mut write_y = 0;
        for y in 0..h {
            if grid.get(x, y)?.is_empty() {
                continue;
            }
            if y != write_y {
                grid.move_cell(Pos::new(x, y), Pos::new(x, write_y))?;
                fallen += 1;
            }
            write_y += 1;
        }
    }
    Ok(fallen)
}

/// Fills every Empty cell with a uniformly random palette color, column by
/// column and bottom to top within each column.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] for an empty palette.
pub fn refill<R: Rng + ?Sized>(grid: &mut Grid, palette: u8, rng: &mut R) -> Result<u32> {
    if palette == 0 {
        return Err(Error::invalid_configuration("palette must not be empty"));
    }
    let holes: Vec<Pos> = grid
        .column_positions()
        .filter(|&pos| grid.at(pos) == Ok(Cell::Empty))
        .collect();
    for pos in &holes {
        grid.set(pos.x, pos.y, random_color(rng, palette))?;
    }
    Ok(holes.len() as u32)
}
