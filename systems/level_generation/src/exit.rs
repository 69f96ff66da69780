//! Exit placement within one jump of the final foothold.

use platformer_core::{Foothold, Grid, ReachabilityBounds, Tile, TilePos};

use crate::reachability::signed_tiles;

/// Columns kept free between the exit and the right edge.
const EXIT_EDGE_MARGIN: i32 = 3;

/// Marks the exit at most one gap-jump right of `last`, on the same row.
///
/// An exit level with the ground row is lifted one row, standing on the
/// ground; this deliberately departs from "same row" so the bottom row stays
/// solid outside pits.
///
/// The column never passes `W - 3`. A last foothold further right than that
/// (a long flat run stamped near the edge) pulls the exit back to the left,
/// which can leave it more than one gap away from `last`.
pub(crate) fn place_exit(grid: &mut Grid, bounds: ReachabilityBounds, last: Foothold) -> TilePos {
    let limit = grid.width() as i32 - EXIT_EDGE_MARGIN;
    let reach = signed_tiles(bounds.max_gap_tiles()).min(limit - last.x());
    let x = limit.min(last.x() + reach);
    let y = last.y().min(grid.ground_row() - 1);

    grid.set(x, y, Tile::Exit);
    TilePos::new(x, y)
}
