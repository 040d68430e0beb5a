//! Cluster removal and the chain-reaction check at the clicked coordinate.

use crate::cell::Pos;
use crate::cluster::{find_cluster, Cluster};
use crate::{Grid, Result};

/// Clears every cell of `cluster` and returns how many blocks were collected.
///
/// # Errors
///
/// Propagates bounds errors if the cluster was computed for another grid.
pub fn remove_cluster(grid: &mut Grid, cluster: &Cluster) -> Result<u32> {
    for pos in cluster.iter() {
        grid.clear(pos.x, pos.y)?;
    }
    Ok(cluster.len() as u32)
}

/// Returns the cluster re-formed at `anchor` after a settle, if it is a match.
///
/// The anchor block is not the one originally clicked; whatever color landed
/// there after refill is checked.
///
/// # Errors
///
/// Bounds or empty-seed errors from the cluster search.
pub fn next_link(grid: &Grid, anchor: Pos) -> Result<Option<Cluster>> {
    let cluster = find_cluster(grid, anchor)?;
    Ok(cluster.is_match().then_some(cluster))
}
