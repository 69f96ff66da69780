//! Collectible placement above interior footholds.

use platformer_core::{Foothold, Grid, Tile, TilePos};
use rand::{seq::SliceRandom, Rng};

/// Gem count range used when the caller does not request one.
const DEFAULT_GEM_RANGE: std::ops::RangeInclusive<u32> = 3..=6;

/// Marks up to `requested` gems above interior footholds with two open cells
/// of headroom. Returns the marked cells in selection order.
///
/// The first foothold is the spawn and the last one anchors the exit; neither
/// hosts a gem. Asking for more gems than there are candidates places every
/// candidate.
pub(crate) fn place_gems<R: Rng + ?Sized>(
    grid: &mut Grid,
    footholds: &[Foothold],
    requested: Option<u32>,
    rng: &mut R,
) -> Vec<TilePos> {
    let count = match requested {
        Some(count) => count,
        None => rng.gen_range(DEFAULT_GEM_RANGE),
    };

    let interior = match footholds {
        [_, interior @ .., _] => interior,
        _ => &[],
    };
    let mut candidates: Vec<TilePos> = interior
        .iter()
        .filter(|foothold| {
            grid.is_empty_at(foothold.x(), foothold.y() - 1)
                && grid.is_empty_at(foothold.x(), foothold.y() - 2)
        })
        .map(|foothold| foothold.above())
        .collect();

    candidates.shuffle(rng);
    candidates.truncate(count as usize);
    for cell in &candidates {
        grid.set(cell.x(), cell.y(), Tile::Collectible);
    }
    candidates
}
