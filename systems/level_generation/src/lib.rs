#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic procedural level generation.
//!
//! A generation pass runs bottom-up over one owned [`Grid`]:
//!
//! 1. reachability bounds are derived from the player's physics constants,
//! 2. occasional death pits are carved into the ground row,
//! 3. chunks (flat runs, gaps, stairs, floaters) are stitched from the spawn
//!    towards the right edge, each checked against the reachability bounds,
//! 4. the exit is placed within one jump of the final foothold,
//! 5. gems are scattered above interior footholds.
//!
//! Every random draw comes from the generator handed to the pass, in exactly
//! that order, so a seed fully determines the resulting rows.

mod chunks;
mod error;
mod exit;
mod gems;
mod pits;
mod reachability;
mod stitcher;

use platformer_core::{
    Foothold, Grid, LevelDimensions, PhysicsConstants, PitRange, ReachabilityBounds, Tile,
    TilePos,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use chunks::ChunkKind;
pub use error::{GenerationError, MAX_SIDE_TILES, MIN_HEIGHT_TILES, MIN_WIDTH_TILES};
pub use reachability::reachability_bounds;
pub use stitcher::{chunk_within_reach, ChunkRecord};

use chunks::ChunkContext;

/// Column holding the player spawn, one row above the ground.
pub const SPAWN_COLUMN: i32 = 3;
/// Inclusive upper bound of the per-level seeds drawn for a level pack.
pub const PACK_SEED_MAX: u64 = 1_000_000;

/// Parameters of a single generation call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Size of the level to generate.
    pub dimensions: LevelDimensions,
    /// Seed for reproducible output; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Number of gems to place; `None` draws a count in `3..=6`.
    pub gem_count: Option<u32>,
}

impl GenerationRequest {
    /// Creates a request for a level of the given size.
    #[must_use]
    pub const fn new(width_tiles: u32, height_tiles: u32) -> Self {
        Self {
            dimensions: LevelDimensions::new(width_tiles, height_tiles),
            seed: None,
            gem_count: None,
        }
    }

    /// Pins the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Pins the number of gems.
    #[must_use]
    pub const fn with_gem_count(mut self, gem_count: u32) -> Self {
        self.gem_count = Some(gem_count);
        self
    }
}

/// Finished level together with the path the generator recorded for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLevel {
    seed: Option<u64>,
    grid: Grid,
    bounds: ReachabilityBounds,
    pits: Vec<PitRange>,
    footholds: Vec<Foothold>,
    chunks: Vec<ChunkRecord>,
    exit: TilePos,
    gems: Vec<TilePos>,
}

impl GeneratedLevel {
    /// Seed the level was generated from, if one was supplied.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Finished tile grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Reach bounds every chunk was checked against.
    #[must_use]
    pub const fn bounds(&self) -> ReachabilityBounds {
        self.bounds
    }

    /// Pits carved into the ground row, left to right.
    #[must_use]
    pub fn pits(&self) -> &[PitRange] {
        &self.pits
    }

    /// Traversal path from the spawn to the last chunk before the exit.
    #[must_use]
    pub fn footholds(&self) -> &[Foothold] {
        &self.footholds
    }

    /// Trace of every chunk placement attempt in cursor order.
    #[must_use]
    pub fn chunks(&self) -> &[ChunkRecord] {
        &self.chunks
    }

    /// Player spawn position.
    #[must_use]
    pub fn spawn(&self) -> TilePos {
        self.footholds[0]
    }

    /// Exit position.
    #[must_use]
    pub const fn exit(&self) -> TilePos {
        self.exit
    }

    /// Cells marked as collectibles.
    #[must_use]
    pub fn gems(&self) -> &[TilePos] {
        &self.gems
    }

    /// Renders the level as one interchange string per row.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        self.grid.rows()
    }
}

/// Level generator bound to one set of physics constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelGenerator {
    physics: PhysicsConstants,
    bounds: ReachabilityBounds,
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::new(PhysicsConstants::default())
    }
}

impl LevelGenerator {
    /// Creates a generator, deriving its reach bounds once.
    #[must_use]
    pub fn new(physics: PhysicsConstants) -> Self {
        Self {
            physics,
            bounds: reachability_bounds(&physics),
        }
    }

    /// Physics constants the bounds were derived from.
    #[must_use]
    pub const fn physics(&self) -> &PhysicsConstants {
        &self.physics
    }

    /// Reach bounds applied to every chunk.
    #[must_use]
    pub const fn bounds(&self) -> ReachabilityBounds {
        self.bounds
    }

    /// Generates one level, seeding a fresh random source from the request.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GeneratedLevel, GenerationError> {
        validate_dimensions(request.dimensions)?;
        let mut rng = seeded_rng(request.seed);
        let mut level = self.generate_with_rng(request.dimensions, request.gem_count, &mut rng)?;
        level.seed = request.seed;
        Ok(level)
    }

    /// Generates one level drawing every random value from `rng`.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        dimensions: LevelDimensions,
        gem_count: Option<u32>,
        rng: &mut R,
    ) -> Result<GeneratedLevel, GenerationError> {
        validate_dimensions(dimensions)?;

        let mut grid = Grid::new(dimensions);
        let ground_row = grid.ground_row();
        for x in 0..grid.width() as i32 {
            grid.set(x, ground_row, Tile::Solid);
        }

        let pits = pits::carve_pits(&mut grid, rng);
        let spawn = TilePos::new(SPAWN_COLUMN, ground_row - 1);
        grid.set(spawn.x(), spawn.y(), Tile::Spawn);

        let path = {
            let mut context = ChunkContext::new(&mut grid, &pits, self.bounds);
            stitcher::stitch_chunks(&mut context, spawn, rng)
        };

        let last = path.footholds.last().copied().unwrap_or(spawn);
        let exit = exit::place_exit(&mut grid, self.bounds, last);
        let gems = gems::place_gems(&mut grid, &path.footholds, gem_count, rng);

        log::debug!(
            "generated {}x{} level: {} pits, {} chunks, {} gems, exit at {:?}",
            dimensions.width_tiles,
            dimensions.height_tiles,
            pits.ranges().len(),
            path.chunks.len(),
            gems.len(),
            exit
        );

        Ok(GeneratedLevel {
            seed: None,
            grid,
            bounds: self.bounds,
            pits: pits.ranges().to_vec(),
            footholds: path.footholds,
            chunks: path.chunks,
            exit,
            gems,
        })
    }

    /// Generates `num_levels` independent levels from per-level seeds drawn
    /// out of one source seeded with `seed`.
    pub fn generate_pack(
        &self,
        num_levels: usize,
        dimensions: LevelDimensions,
        seed: Option<u64>,
    ) -> Result<Vec<GeneratedLevel>, GenerationError> {
        validate_dimensions(dimensions)?;
        let mut rng = seeded_rng(seed);
        let level_seeds: Vec<u64> = (0..num_levels)
            .map(|_| rng.gen_range(0..=PACK_SEED_MAX))
            .collect();

        let levels = level_seeds
            .into_iter()
            .map(|level_seed| {
                self.generate(&GenerationRequest {
                    dimensions,
                    seed: Some(level_seed),
                    gem_count: None,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("generated a pack of {} levels", levels.len());
        Ok(levels)
    }
}

/// Rejects dimensions the generator cannot lay a level out in.
pub fn validate_dimensions(dimensions: LevelDimensions) -> Result<(), GenerationError> {
    let LevelDimensions {
        width_tiles,
        height_tiles,
    } = dimensions;

    if width_tiles == 0 || height_tiles == 0 {
        return Err(GenerationError::NonPositiveDimensions {
            width_tiles,
            height_tiles,
        });
    }
    if width_tiles > MAX_SIDE_TILES || height_tiles > MAX_SIDE_TILES {
        return Err(GenerationError::TooLarge {
            width_tiles,
            height_tiles,
        });
    }
    if width_tiles < MIN_WIDTH_TILES {
        return Err(GenerationError::WidthTooSmall { width_tiles });
    }
    if height_tiles < MIN_HEIGHT_TILES {
        return Err(GenerationError::HeightTooSmall { height_tiles });
    }
    Ok(())
}

/// Generates one level with the default physics and returns its rows.
pub fn generate_level_layout(request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
    LevelGenerator::default()
        .generate(request)
        .map(|level| level.rows())
}

/// Generates a pack of levels with the default physics and returns their rows.
pub fn generate_level_pack(
    num_levels: usize,
    dimensions: LevelDimensions,
    seed: Option<u64>,
) -> Result<Vec<Vec<String>>, GenerationError> {
    let levels = LevelGenerator::default().generate_pack(num_levels, dimensions, seed)?;
    Ok(levels.iter().map(GeneratedLevel::rows).collect())
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
