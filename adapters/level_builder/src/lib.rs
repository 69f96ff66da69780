#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Converts interchange rows into world-space level blueprints.
//!
//! A blueprint is what a game scene consumes when it loads a generated level:
//! auto-tiled solid blocks, collectible and exit trigger positions, and the
//! player spawn, all expressed in pixels with `y` growing downwards.

use glam::Vec2;
use platformer_core::{Grid, GridError, LevelDimensions, PitRange, Tile, TilePos};
use thiserror::Error;

/// Spawn used when a layout carries no `P` tile.
pub const FALLBACK_SPAWN: Vec2 = Vec2::new(64.0, 64.0);

/// Errors raised while building a blueprint.
#[derive(Debug, Error, PartialEq)]
pub enum BlueprintError {
    /// The rows do not form a valid layout.
    #[error("invalid layout: {0}")]
    Layout(#[from] GridError),
    /// Tiles must have a positive, finite size in pixels.
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),
}

/// Texture family of a solid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Walkable top surface with open air above it.
    Grass,
    /// Buried body tile beneath another solid.
    Dirt,
}

/// Horizontal edge treatment of a solid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Neighboured on both sides, or open on both sides.
    Mid,
    /// Open on the left only.
    CornerLeft,
    /// Open on the right only.
    CornerRight,
}

/// Solid collision block with its auto-tile classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolidBlock {
    /// Grid cell the block occupies.
    pub cell: TilePos,
    /// Top-left corner in world space.
    pub position: Vec2,
    /// Surface texture family.
    pub surface: SurfaceKind,
    /// Edge texture variant.
    pub edge: Edge,
}

/// World-space description of a level ready to be instantiated.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelBlueprint {
    tile_size: f32,
    dimensions: LevelDimensions,
    solids: Vec<SolidBlock>,
    collectibles: Vec<Vec2>,
    exits: Vec<Vec2>,
    spawn: Vec2,
    spawn_found: bool,
}

impl LevelBlueprint {
    /// Builds a blueprint from interchange rows.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self, BlueprintError> {
        let grid = Grid::from_rows(rows)?;
        Self::from_grid(&grid, tile_size)
    }

    /// Builds a blueprint from a parsed grid.
    pub fn from_grid(grid: &Grid, tile_size: f32) -> Result<Self, BlueprintError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(BlueprintError::InvalidTileSize(tile_size));
        }

        let mut solids = Vec::new();
        let mut collectibles = Vec::new();
        let mut exits = Vec::new();
        let mut spawn = None;

        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                let top_left = Vec2::new(x as f32, y as f32) * tile_size;
                match grid.get(x, y) {
                    Some(Tile::Solid) => solids.push(SolidBlock {
                        cell: TilePos::new(x, y),
                        position: top_left,
                        surface: surface_at(grid, x, y),
                        edge: edge_at(grid, x, y),
                    }),
                    Some(Tile::Collectible) => {
                        collectibles.push(top_left + Vec2::splat(tile_size / 2.0));
                    }
                    Some(Tile::Exit) => exits.push(top_left - Vec2::new(0.0, tile_size / 2.0)),
                    Some(Tile::Spawn) => {
                        if spawn.is_none() {
                            spawn = Some(top_left);
                        }
                    }
                    Some(Tile::Empty) | None => {}
                }
            }
        }

        if spawn.is_none() {
            log::warn!("layout has no spawn tile, falling back to {FALLBACK_SPAWN}");
        }

        Ok(Self {
            tile_size,
            dimensions: grid.dimensions(),
            solids,
            collectibles,
            exits,
            spawn: spawn.unwrap_or(FALLBACK_SPAWN),
            spawn_found: spawn.is_some(),
        })
    }

    /// Edge length of a tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Size of the level in tiles.
    #[must_use]
    pub const fn dimensions(&self) -> LevelDimensions {
        self.dimensions
    }

    /// Size of the level in pixels.
    #[must_use]
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.dimensions.width_tiles as f32,
            self.dimensions.height_tiles as f32,
        ) * self.tile_size
    }

    /// Solid blocks in row-major order.
    #[must_use]
    pub fn solids(&self) -> &[SolidBlock] {
        &self.solids
    }

    /// Collectible centres in row-major order.
    #[must_use]
    pub fn collectibles(&self) -> &[Vec2] {
        &self.collectibles
    }

    /// Exit trigger positions in row-major order.
    #[must_use]
    pub fn exits(&self) -> &[Vec2] {
        &self.exits
    }

    /// Player spawn, top-left of the first `P` tile.
    #[must_use]
    pub const fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Whether the spawn came from the layout rather than the fallback.
    #[must_use]
    pub const fn has_spawn_tile(&self) -> bool {
        self.spawn_found
    }
}

fn is_solid(grid: &Grid, x: i32, y: i32) -> bool {
    grid.get(x, y).is_some_and(Tile::is_solid)
}

fn surface_at(grid: &Grid, x: i32, y: i32) -> SurfaceKind {
    if is_solid(grid, x, y - 1) {
        SurfaceKind::Dirt
    } else {
        SurfaceKind::Grass
    }
}

fn edge_at(grid: &Grid, x: i32, y: i32) -> Edge {
    match (is_solid(grid, x - 1, y), is_solid(grid, x + 1, y)) {
        (false, true) => Edge::CornerLeft,
        (true, false) => Edge::CornerRight,
        _ => Edge::Mid,
    }
}

/// Structural problem found in a layout.
#[derive(Debug, Error, PartialEq)]
pub enum Violation {
    /// The rows could not be parsed.
    #[error("layout does not parse: {0}")]
    Layout(GridError),
    /// The layout does not hold exactly one spawn.
    #[error("expected exactly one spawn, found {found}")]
    SpawnCount {
        /// Number of `P` tiles.
        found: usize,
    },
    /// The layout does not hold exactly one exit.
    #[error("expected exactly one exit, found {found}")]
    ExitCount {
        /// Number of `E` tiles.
        found: usize,
    },
    /// A ground column is open although no pit was carved there.
    #[error("ground row is open at column {column} outside any pit")]
    GroundGap {
        /// Column of the open ground cell.
        column: i32,
    },
    /// A ground column inside a carved pit holds a solid tile.
    #[error("pit column {column} is covered on the ground row")]
    CoveredPit {
        /// Column of the covered pit cell.
        column: i32,
    },
}

/// Checks a layout against the structural rules every generated level obeys.
///
/// Ground-row checks only run when the carved `pits` are known.
#[must_use]
pub fn audit<S: AsRef<str>>(rows: &[S], pits: Option<&[PitRange]>) -> Vec<Violation> {
    let grid = match Grid::from_rows(rows) {
        Ok(grid) => grid,
        Err(error) => return vec![Violation::Layout(error)],
    };

    let mut violations = Vec::new();
    let spawns = grid.count(Tile::Spawn);
    if spawns != 1 {
        violations.push(Violation::SpawnCount { found: spawns });
    }
    let exits = grid.count(Tile::Exit);
    if exits != 1 {
        violations.push(Violation::ExitCount { found: exits });
    }

    if let Some(pits) = pits {
        let ground = grid.ground_row();
        for column in 0..grid.width() as i32 {
            let in_pit = pits.iter().any(|pit| pit.contains(column));
            let solid = is_solid(&grid, column, ground);
            if in_pit && solid {
                violations.push(Violation::CoveredPit { column });
            } else if !in_pit && !solid {
                violations.push(Violation::GroundGap { column });
            }
        }
    }

    violations
}
