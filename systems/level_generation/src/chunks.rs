//! Chunk shapes stamped into the grid by the stitcher.
//!
//! Every chunk receives the explicit [`ChunkContext`] and the cursor it starts
//! from, and reports where the cursor landed instead of mutating shared state.

use platformer_core::{Foothold, Grid, ReachabilityBounds, Tile, TilePos};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{pits::PitMap, reachability::signed_tiles};

/// Rows of open air kept above every stamped platform.
const HEADROOM: i32 = 2;
/// Width of gap landings and stair steps.
const STEP_WIDTH: i32 = 3;
/// Shortest flat run worth keeping after truncation.
const MIN_FLAT_RUN: i32 = 3;
/// Highest row a platform may occupy while keeping its headroom on screen.
pub(crate) const TOP_PLATFORM_ROW: i32 = 2;

/// Closed set of segment shapes the stitcher can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// Solid run at the current height.
    Flat,
    /// Two short landings separated by an open gap.
    Gap,
    /// Ascending three-wide steps.
    StairsUp,
    /// Descending three-wide steps.
    StairsDown,
    /// Short platform shifted up or down from the current height.
    Floater,
}

impl ChunkKind {
    /// Every chunk kind in draw-table order.
    pub const ALL: [ChunkKind; 5] = [
        ChunkKind::Flat,
        ChunkKind::Gap,
        ChunkKind::StairsUp,
        ChunkKind::StairsDown,
        ChunkKind::Floater,
    ];

    /// Relative likelihood of drawing the chunk.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Flat => 3,
            Self::Gap | Self::StairsUp | Self::StairsDown | Self::Floater => 2,
        }
    }

    /// Stable lowercase name used in traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Gap => "gap",
            Self::StairsUp => "stairs_up",
            Self::StairsDown => "stairs_down",
            Self::Floater => "floater",
        }
    }

    pub(crate) fn place<R: Rng + ?Sized>(
        self,
        context: &mut ChunkContext<'_>,
        cursor: TilePos,
        rng: &mut R,
    ) -> ChunkOutcome {
        match self {
            Self::Flat => flat(context, cursor, rng),
            Self::Gap => gap(context, cursor, rng),
            Self::StairsUp => stairs_up(context, cursor, rng),
            Self::StairsDown => stairs_down(context, cursor, rng),
            Self::Floater => floater(context, cursor, rng),
        }
    }
}

/// Draws the next chunk kind. Descending stairs are withheld once the cursor
/// is within two rows of the ground.
pub(crate) fn draw_kind<R: Rng + ?Sized>(
    rng: &mut R,
    cursor_y: i32,
    ground_row: i32,
) -> ChunkKind {
    let available: Vec<ChunkKind> = ChunkKind::ALL
        .into_iter()
        .filter(|kind| *kind != ChunkKind::StairsDown || cursor_y < ground_row - 2)
        .collect();
    available
        .choose_weighted(rng, |kind| kind.weight())
        .copied()
        .unwrap_or(ChunkKind::Flat)
}

/// Result of attempting to place a chunk at the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ChunkOutcome {
    /// The chunk stamped at least one platform.
    Landed {
        /// Last platform tile the cursor now stands on.
        foothold: Foothold,
        /// Cells above the chunk's steps that could hold a collectible.
        gem_spots: Vec<TilePos>,
    },
    /// The chunk would have covered a pit and stamped nothing.
    Skipped,
}

/// Mutable generation state shared by every chunk of one level.
#[derive(Debug)]
pub(crate) struct ChunkContext<'a> {
    grid: &'a mut Grid,
    pits: &'a PitMap,
    bounds: ReachabilityBounds,
}

impl<'a> ChunkContext<'a> {
    pub(crate) fn new(grid: &'a mut Grid, pits: &'a PitMap, bounds: ReachabilityBounds) -> Self {
        Self { grid, pits, bounds }
    }

    pub(crate) fn bounds(&self) -> ReachabilityBounds {
        self.bounds
    }

    pub(crate) fn width(&self) -> i32 {
        self.grid.width() as i32
    }

    pub(crate) fn ground_row(&self) -> i32 {
        self.grid.ground_row()
    }

    fn max_up(&self) -> i32 {
        signed_tiles(self.bounds.max_up_tiles())
    }

    fn max_gap(&self) -> i32 {
        signed_tiles(self.bounds.max_gap_tiles())
    }

    fn crosses_pit(&self, x0: i32, x1: i32, y: i32) -> bool {
        self.pits.crosses(x0, x1, y)
    }

    fn rising_step_fits(&self, x: i32, y: i32) -> bool {
        y >= TOP_PLATFORM_ROW && !self.crosses_pit(x, x + STEP_WIDTH - 1, y)
    }

    /// Interior columns of `x0..=x1`; the leftmost column is never stamped.
    fn columns(&self, x0: i32, x1: i32) -> std::ops::RangeInclusive<i32> {
        x0.max(1)..=x1.min(self.width() - 1)
    }

    fn clear_headroom(&mut self, y: i32, x0: i32, x1: i32) {
        for x in self.columns(x0, x1) {
            for rise in 1..=HEADROOM {
                self.grid.set(x, y - rise, Tile::Empty);
            }
        }
    }

    fn stamp_platform(&mut self, y: i32, x0: i32, x1: i32) {
        for x in self.columns(x0, x1) {
            self.grid.set(x, y, Tile::Solid);
        }
        self.clear_headroom(y, x0, x1);
    }
}

/// Bounded draw of `2..=3`, shrunk when the reach bound is smaller.
fn draw_two_or_three<R: Rng + ?Sized>(rng: &mut R, cap: i32) -> i32 {
    let high = cap.min(3);
    rng.gen_range(high.min(2)..=high)
}

fn flat<R: Rng + ?Sized>(
    context: &mut ChunkContext<'_>,
    cursor: TilePos,
    rng: &mut R,
) -> ChunkOutcome {
    let (x0, y) = (cursor.x(), cursor.y());
    let length: i32 = rng.gen_range(5..=9);
    let mut x1 = x0 + length - 1;

    if let Some(pit) = context.pits.first_overlapping(x0, x1, y) {
        x1 = pit.start() - 1;
        if x1 - x0 + 1 < MIN_FLAT_RUN {
            return ChunkOutcome::Skipped;
        }
    }

    context.stamp_platform(y, x0, x1);
    let middle = x0 + (x1 - x0) / 2;
    ChunkOutcome::Landed {
        foothold: TilePos::new(x1, y),
        gem_spots: vec![TilePos::new(middle, y - 1)],
    }
}

fn gap<R: Rng + ?Sized>(
    context: &mut ChunkContext<'_>,
    cursor: TilePos,
    rng: &mut R,
) -> ChunkOutcome {
    let (x0, y) = (cursor.x(), cursor.y());
    let gap = draw_two_or_three(rng, context.max_gap());

    let left_x1 = x0 + STEP_WIDTH - 1;
    if context.crosses_pit(x0, left_x1, y) {
        return ChunkOutcome::Skipped;
    }
    context.stamp_platform(y, x0, left_x1);
    context.clear_headroom(y, left_x1 + 1, left_x1 + gap);

    let right_x0 = left_x1 + gap + 1;
    let right_x1 = right_x0 + STEP_WIDTH - 1;
    if context.crosses_pit(right_x0, right_x1, y) {
        return ChunkOutcome::Landed {
            foothold: TilePos::new(left_x1, y),
            gem_spots: Vec::new(),
        };
    }
    context.stamp_platform(y, right_x0, right_x1);
    ChunkOutcome::Landed {
        foothold: TilePos::new(right_x1, y),
        gem_spots: Vec::new(),
    }
}

fn stairs_up<R: Rng + ?Sized>(
    context: &mut ChunkContext<'_>,
    cursor: TilePos,
    rng: &mut R,
) -> ChunkOutcome {
    let steps = draw_two_or_three(rng, context.max_up());

    let mut gem_spots = Vec::new();
    let mut landing = None;
    let (mut x, mut y) = (cursor.x(), cursor.y());
    for _ in 0..steps {
        if !context.rising_step_fits(x, y) {
            break;
        }
        context.stamp_platform(y, x, x + STEP_WIDTH - 1);
        gem_spots.push(TilePos::new(x + 1, y - 1));
        landing = Some(TilePos::new(x + STEP_WIDTH - 1, y));
        x += STEP_WIDTH;
        y -= 1;
    }

    if context.rising_step_fits(x, y) {
        context.stamp_platform(y, x, x + STEP_WIDTH - 1);
        landing = Some(TilePos::new(x + STEP_WIDTH - 1, y));
    }

    match landing {
        Some(foothold) => ChunkOutcome::Landed {
            foothold,
            gem_spots,
        },
        None => ChunkOutcome::Skipped,
    }
}

fn stairs_down<R: Rng + ?Sized>(
    context: &mut ChunkContext<'_>,
    cursor: TilePos,
    rng: &mut R,
) -> ChunkOutcome {
    let ground_row = context.ground_row();
    let room = (ground_row - cursor.y() - 1).max(2);
    let steps = draw_two_or_three(rng, context.max_up().min(room));

    let mut gem_spots = Vec::new();
    let mut landing = None;
    let (mut x, mut y) = (cursor.x(), cursor.y());
    for _ in 0..steps {
        if y >= ground_row || context.crosses_pit(x, x + STEP_WIDTH - 1, y) {
            break;
        }
        context.stamp_platform(y, x, x + STEP_WIDTH - 1);
        gem_spots.push(TilePos::new(x + 1, y - 1));
        landing = Some(TilePos::new(x + STEP_WIDTH - 1, y));
        x += STEP_WIDTH;
        y += 1;
    }

    let y = y.min(ground_row);
    if !context.crosses_pit(x, x + STEP_WIDTH - 1, y) {
        context.stamp_platform(y, x, x + STEP_WIDTH - 1);
        landing = Some(TilePos::new(x + STEP_WIDTH - 1, y));
    }

    match landing {
        Some(foothold) => ChunkOutcome::Landed {
            foothold,
            gem_spots,
        },
        None => ChunkOutcome::Skipped,
    }
}

fn floater<R: Rng + ?Sized>(
    context: &mut ChunkContext<'_>,
    cursor: TilePos,
    rng: &mut R,
) -> ChunkOutcome {
    let ground_row = context.ground_row();
    let lowest_row = (ground_row - 2).max(TOP_PLATFORM_ROW);
    let reach = context.max_up().min(2);
    let shift: i32 = rng.gen_range(-reach..=reach);
    let length: i32 = rng.gen_range(3..=5);

    let x0 = cursor.x();
    let x1 = x0 + length - 1;
    let mut y = (cursor.y() + shift).min(ground_row - 2).max(TOP_PLATFORM_ROW);
    if context.crosses_pit(x0, x1, y) {
        y = lowest_row;
    }

    context.stamp_platform(y, x0, x1);
    ChunkOutcome::Landed {
        foothold: TilePos::new(x1, y),
        gem_spots: vec![TilePos::new(x0 + length / 2, y - 1)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_core::{LevelDimensions, PitRange};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const GROUND: i32 = 10;

    fn ground_grid() -> Grid {
        let mut grid = Grid::new(LevelDimensions::new(42, 11));
        for x in 0..42 {
            grid.set(x, GROUND, Tile::Solid);
        }
        grid
    }

    fn carve(grid: &mut Grid, pits: &[PitRange]) -> PitMap {
        for pit in pits {
            for x in pit.start()..=pit.end() {
                grid.set(x, GROUND, Tile::Empty);
            }
        }
        PitMap::new(GROUND, pits.to_vec())
    }

    fn bounds() -> ReachabilityBounds {
        ReachabilityBounds::new(3, 3)
    }

    fn landed(outcome: ChunkOutcome) -> (Foothold, Vec<TilePos>) {
        match outcome {
            ChunkOutcome::Landed {
                foothold,
                gem_spots,
            } => (foothold, gem_spots),
            ChunkOutcome::Skipped => panic!("chunk was skipped"),
        }
    }

    #[test]
    fn weight_table_covers_every_kind() {
        let total: u32 = ChunkKind::ALL.iter().map(|kind| kind.weight()).sum();
        assert_eq!(total, 11);
        assert_eq!(ChunkKind::StairsDown.name(), "stairs_down");
    }

    #[test]
    fn descending_stairs_are_withheld_near_the_ground() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            assert_ne!(draw_kind(&mut rng, GROUND - 2, GROUND), ChunkKind::StairsDown);
        }
        let drawn: Vec<ChunkKind> = (0..500)
            .map(|_| draw_kind(&mut rng, GROUND - 3, GROUND))
            .collect();
        assert!(drawn.contains(&ChunkKind::StairsDown));
    }

    #[test]
    fn flat_run_clears_headroom() {
        let mut grid = ground_grid();
        grid.set(8, 5, Tile::Solid);
        let pits = PitMap::new(GROUND, Vec::new());
        let mut context = ChunkContext::new(&mut grid, &pits, bounds());
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let (foothold, gem_spots) = landed(flat(&mut context, TilePos::new(5, 7), &mut rng));
        let length = foothold.x() - 5 + 1;
        assert!((5..=9).contains(&length));
        assert_eq!(foothold.y(), 7);
        assert_eq!(gem_spots, vec![TilePos::new(5 + (length - 1) / 2, 6)]);
        for x in 5..=foothold.x() {
            assert_eq!(grid.get(x, 7), Some(Tile::Solid));
            assert_eq!(grid.get(x, 6), Some(Tile::Empty));
            assert_eq!(grid.get(x, 5), Some(Tile::Empty));
        }
    }

    #[test]
    fn flat_run_stops_short_of_a_pit() {
        let mut grid = ground_grid();
        let pits = carve(&mut grid, &[PitRange::new(14, 15)]);
        let mut context = ChunkContext::new(&mut grid, &pits, bounds());
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let (foothold, _) = landed(flat(&mut context, TilePos::new(10, GROUND), &mut rng));
        assert_eq!(foothold, TilePos::new(13, GROUND));
        assert_eq!(grid.get(14, GROUND), Some(Tile::Empty));
        assert_eq!(grid.get(15, GROUND), Some(Tile::Empty));
    }

    #[test]
    fn flat_run_too_short_before_a_pit_is_skipped() {
        let mut grid = ground_grid();
        let pits = carve(&mut grid, &[PitRange::new(12, 13)]);
        let before = grid.clone();
        let mut context = ChunkContext::new(&mut grid, &pits, bounds());
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert_eq!(
            flat(&mut context, TilePos::new(10, GROUND), &mut rng),
            ChunkOutcome::Skipped
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn gap_over_a_pit_keeps_only_the_left_landing() {
        let mut grid = ground_grid();
        let pits = carve(&mut grid, &[PitRange::new(16, 17)]);
        let mut context = ChunkContext::new(&mut grid, &pits, bounds());
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let (foothold, gem_spots) = landed(gap(&mut context, TilePos::new(10, GROUND), &mut rng));
        assert_eq!(foothold, TilePos::new(12, GROUND));
        assert!(gem_spots.is_empty());
        assert_eq!(grid.get(16, GROUND), Some(Tile::Empty));
    }

    #[test]
    fn gap_starting_on_a_pit_is_skipped() {
        let mut grid = ground_grid();
        let pits = carve(&mut grid, &[PitRange::new(11, 12)]);
        let mut context = ChunkContext::new(&mut grid, &pits, bounds());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(
            gap(&mut context, TilePos::new(10, GROUND), &mut rng),
            ChunkOutcome::Skipped
        );
    }

    #[test]
    fn gap_width_respects_the_reach_bound() {
        for seed in 0..32 {
            let mut grid = ground_grid();
            let pits = PitMap::new(GROUND, Vec::new());
            let mut context =
                ChunkContext::new(&mut grid, &pits, ReachabilityBounds::new(3, 2));
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (foothold, _) = landed(gap(&mut context, TilePos::new(4, 6), &mut rng));
            assert_eq!(foothold, TilePos::new(4 + 3 + 2 + 2, 6));
            assert_eq!(grid.get(7, 6), Some(Tile::Empty));
            assert_eq!(grid.get(8, 6), Some(Tile::Empty));
        }
    }

    #[test]
    fn stairs_up_rise_one_row_per_step() {
        let mut grid = ground_grid();
        let pits = PitMap::new(GROUND, Vec::new());
        let mut context = ChunkContext::new(&mut grid, &pits, bounds());
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let (foothold, gem_spots) =
            landed(stairs_up(&mut context, TilePos::new(6, 8), &mut rng));
        let steps = gem_spots.len() as i32;
        assert!((2..=3).contains(&steps));
        assert_eq!(foothold, TilePos::new(6 + STEP_WIDTH * steps + 2, 8 - steps));
        for step in 0..=steps {
            let x = 6 + STEP_WIDTH * step;
            assert_eq!(grid.get(x + 1, 8 - step), Some(Tile::Solid));
        }
    }

    #[test]
    fn stairs_up_stop_below_the_top_band() {
        let mut grid = ground_grid();
        let pits = PitMap::new(GROUND, Vec::new());
        let mut context = ChunkContext::new(&mut grid, &pits, bounds());
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let (foothold, gem_spots) = landed(stairs_up(
            &mut context,
            TilePos::new(6, TOP_PLATFORM_ROW),
            &mut rng,
        ));
        assert_eq!(foothold, TilePos::new(8, TOP_PLATFORM_ROW));
        assert_eq!(gem_spots.len(), 1);
        for x in 0..42 {
            assert_ne!(grid.get(x, TOP_PLATFORM_ROW - 1), Some(Tile::Solid));
        }
    }

    #[test]
    fn stairs_down_never_sink_below_the_ground() {
        for seed in 0..32 {
            let mut grid = ground_grid();
            let pits = PitMap::new(GROUND, Vec::new());
            let mut context = ChunkContext::new(&mut grid, &pits, bounds());
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (foothold, _) =
                landed(stairs_down(&mut context, TilePos::new(6, GROUND - 3), &mut rng));
            assert!(foothold.y() <= GROUND, "seed {seed}: {foothold:?}");
            assert!(foothold.y() > GROUND - 3, "seed {seed}: {foothold:?}");
        }
    }

    #[test]
    fn stairs_down_land_before_a_ground_pit() {
        let mut grid = ground_grid();
        let pits = carve(&mut grid, &[PitRange::new(12, 14)]);
        let mut context = ChunkContext::new(&mut grid, &pits, ReachabilityBounds::new(2, 3));
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let (foothold, _) =
            landed(stairs_down(&mut context, TilePos::new(6, GROUND - 2), &mut rng));
        assert_eq!(foothold, TilePos::new(11, GROUND - 1));
        assert_eq!(grid.get(12, GROUND), Some(Tile::Empty));
    }

    #[test]
    fn floaters_stay_inside_the_playable_band() {
        for seed in 0..64 {
            let mut grid = ground_grid();
            let pits = PitMap::new(GROUND, Vec::new());
            let mut context = ChunkContext::new(&mut grid, &pits, bounds());
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let start = TilePos::new(6, 2 + (seed as i32 % 8));
            let (foothold, gem_spots) = landed(floater(&mut context, start, &mut rng));
            assert!((TOP_PLATFORM_ROW..=GROUND - 2).contains(&foothold.y()));
            assert!((start.y() - foothold.y()).abs() <= 2);
            assert!((8..=10).contains(&foothold.x()));
            assert_eq!(gem_spots.len(), 1);
        }
    }
}
