//! Connected-component search over same-colored blocks.

use std::collections::{BTreeSet, VecDeque};

use crate::cell::{Cell, ColorId, Pos};
use crate::{Error, Grid, Result};

/// Same-colored, 4-connected set of positions reachable from a seed.
///
/// Only valid for the grid state it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    color: ColorId,
    cells: BTreeSet<Pos>,
}

impl Cluster {
    #[must_use]
    pub fn color(&self) -> ColorId {
        self.color
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true: a cluster always holds its seed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Clusters of one block are not removable.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.cells.len() > 1
    }

    #[must_use]
    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter().copied()
    }

    #[must_use]
    pub fn positions(&self) -> &BTreeSet<Pos> {
        &self.cells
    }
}

/// Breadth-first flood fill from `seed` through cells of the seed's color.
///
/// Diagonal neighbours are never considered.
///
/// # Errors
///
/// [`Error::OutOfBounds`] if `seed` is outside the grid,
/// [`Error::EmptySeed`] if the seed cell is Empty.
pub fn find_cluster(grid: &Grid, seed: Pos) -> Result<Cluster> {
    let Cell::Occupied(color) = grid.at(seed)? else {
        return Err(Error::EmptySeed {
            x: seed.x,
            y: seed.y,
        });
    };

    let mut visited = BTreeSet::from([seed]);
    let mut queue = VecDeque::from([seed]);

    while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            if !grid.in_bounds(next.x, next.y) || visited.contains(&next) {
                continue;
            }
            if grid.at(next)? == Cell::Occupied(color) {
                visited.insert(next);
                queue.push_back(next);
            }
        }
    }

    Ok(Cluster {
        color,
        cells: visited,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn positions(list: &[(i32, i32)]) -> BTreeSet<Pos> {
        list.iter().map(|&(x, y)| Pos::new(x, y)).collect()
    }

    #[test]
    fn finds_l_shaped_cluster() {
        let grid = Grid::from_rows(&["001", "023", "456"]).unwrap();
        let cluster = find_cluster(&grid, Pos::new(0, 2)).unwrap();
        assert_eq!(cluster.color(), 0);
        assert_eq!(cluster.positions(), &positions(&[(0, 2), (1, 2), (0, 1)]));
        assert!(cluster.is_match());
    }

    #[test]
    fn same_result_from_any_member() {
        let grid = Grid::from_rows(&["001", "023", "456"]).unwrap();
        let a = find_cluster(&grid, Pos::new(0, 2)).unwrap();
        let b = find_cluster(&grid, Pos::new(0, 1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn diagonals_do_not_connect() {
        let grid = Grid::from_rows(&["01", "10"]).unwrap();
        let cluster = find_cluster(&grid, Pos::new(0, 0)).unwrap();
        assert_eq!(cluster.len(), 1);
        assert!(!cluster.is_match());
        assert!(cluster.contains(Pos::new(0, 0)));
    }

    #[test]
    fn follows_winding_path() {
        let grid = Grid::from_rows(&[
            "11111",
            "22221",
            "11121",
            "12221",
            "11111",
        ])
        .unwrap();
        let cluster = find_cluster(&grid, Pos::new(0, 0)).unwrap();
        assert_eq!(cluster.len(), 17);
        assert!(cluster.contains(Pos::new(2, 2)));
        assert!(!cluster.contains(Pos::new(3, 2)));
    }

    #[test]
    fn empty_cells_break_connectivity() {
        let grid = Grid::from_rows(&["0.0"]).unwrap();
        let cluster = find_cluster(&grid, Pos::new(0, 0)).unwrap();
        assert_eq!(cluster.len(), 1);
    }

    #[test]
    fn empty_seed_is_rejected() {
        let grid = Grid::from_rows(&["0.0"]).unwrap();
        assert_eq!(
            find_cluster(&grid, Pos::new(1, 0)),
            Err(Error::EmptySeed { x: 1, y: 0 })
        );
    }

    #[test]
    fn out_of_bounds_seed_is_rejected() {
        let grid = Grid::from_rows(&["00"]).unwrap();
        assert_eq!(
            find_cluster(&grid, Pos::new(2, 0)),
            Err(Error::OutOfBounds { x: 2, y: 0 })
        );
    }

    fn arb_grid(size: usize, palette: u8) -> impl Strategy<Value = Grid> {
        proptest::collection::vec(0..palette, size * size).prop_map(move |colors| {
            let mut grid = Grid::new(size, size).unwrap();
            for (i, color) in colors.into_iter().enumerate() {
                grid.set((i % size) as i32, (i / size) as i32, color).unwrap();
            }
            grid
        })
    }

    proptest! {
        #[test]
        fn prop_cluster_is_closed_and_single_colored(
            grid in arb_grid(8, 3),
            x in 0i32..8,
            y in 0i32..8,
        ) {
            let seed = Pos::new(x, y);
            let cluster = find_cluster(&grid, seed).unwrap();
            prop_assert!(cluster.contains(seed));
            for pos in cluster.iter() {
                prop_assert_eq!(grid.at(pos).unwrap(), Cell::Occupied(cluster.color()));
                // Every same-colored neighbour of a member is a member.
                for n in pos.neighbors() {
                    if grid.at(n) == Ok(Cell::Occupied(cluster.color())) {
                        prop_assert!(cluster.contains(n));
                    }
                }
            }
        }
    }
}
