//! Death pits carved into the ground row before any chunk is stamped.

use platformer_core::{Grid, PitRange, Tile};
use rand::Rng;

/// Leftmost column a pit may start on; keeps the spawn area intact.
pub(crate) const FIRST_PIT_COLUMN: i32 = 8;
/// Pits never start within this many columns of the right edge.
const RIGHT_EDGE_RESERVE: i32 = 10;
/// Pits never extend into the last columns before the right edge.
const RIGHT_EDGE_CLAMP: i32 = 4;
const PIT_CHANCE: f64 = 0.3;

/// Ground-row hazards owned by a single generation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PitMap {
    ground_row: i32,
    ranges: Vec<PitRange>,
}

impl PitMap {
    #[cfg(test)]
    pub(crate) fn new(ground_row: i32, ranges: Vec<PitRange>) -> Self {
        Self { ground_row, ranges }
    }

    /// Carved pits ordered left to right.
    pub(crate) fn ranges(&self) -> &[PitRange] {
        &self.ranges
    }

    /// Reports whether a platform spanning `x0..=x1` on row `y` would cover a
    /// pit. Only the ground row can cover one.
    pub(crate) fn crosses(&self, x0: i32, x1: i32, y: i32) -> bool {
        self.first_overlapping(x0, x1, y).is_some()
    }

    /// Leftmost pit covered by a platform spanning `x0..=x1` on row `y`.
    pub(crate) fn first_overlapping(&self, x0: i32, x1: i32, y: i32) -> Option<PitRange> {
        if y != self.ground_row {
            return None;
        }
        self.ranges
            .iter()
            .copied()
            .find(|pit| pit.overlaps(x0, x1))
    }
}

/// Walks the ground row and removes occasional 2-3 tile spans.
///
/// Spacing between trials guarantees the ranges never overlap.
pub(crate) fn carve_pits<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> PitMap {
    let width = grid.width() as i32;
    let ground_row = grid.ground_row();
    let mut ranges = Vec::new();

    let mut x = FIRST_PIT_COLUMN;
    while x < width - RIGHT_EDGE_RESERVE {
        if rng.gen_bool(PIT_CHANCE) {
            let pit_width: i32 = rng.gen_range(2..=3);
            let end = (x + pit_width).min(width - RIGHT_EDGE_CLAMP);
            for column in x..end {
                grid.set(column, ground_row, Tile::Empty);
            }
            ranges.push(PitRange::new(x, end - 1));
            x += pit_width + rng.gen_range(6..=10);
        } else {
            x += rng.gen_range(4..=8);
        }
    }

    log::debug!("carved {} pits: {:?}", ranges.len(), ranges);
    PitMap { ground_row, ranges }
}
