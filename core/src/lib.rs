#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the platformer level tooling.
//!
//! This crate defines the vocabulary that connects the level generator with
//! the adapters consuming its output. Generators stamp [`Tile`] values into a
//! [`Grid`], describe the traversal path they produced through [`Foothold`]
//! coordinates and [`PitRange`] hazards, and derive their jump limits from
//! [`PhysicsConstants`] through [`ReachabilityBounds`]. Adapters only ever see
//! the finished grid, usually in its one-string-per-row interchange form.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Level width used when the caller does not request one.
pub const DEFAULT_WIDTH_TILES: u32 = 42;
/// Level height used when the caller does not request one.
pub const DEFAULT_HEIGHT_TILES: u32 = 11;

/// Symbolic content of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Open air the player can move through.
    #[default]
    Empty,
    /// Solid collision tile.
    Solid,
    /// Player spawn location. A finished level contains exactly one.
    Spawn,
    /// Level exit trigger. A finished level contains exactly one.
    Exit,
    /// Collectible gem.
    Collectible,
}

impl Tile {
    /// Every tile kind in alphabet order.
    pub const ALL: [Tile; 5] = [
        Tile::Empty,
        Tile::Solid,
        Tile::Spawn,
        Tile::Exit,
        Tile::Collectible,
    ];

    /// Returns the single-character interchange code of the tile.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Solid => 'X',
            Self::Spawn => 'P',
            Self::Exit => 'E',
            Self::Collectible => 'C',
        }
    }

    /// Reports whether the tile blocks movement.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Solid)
    }
}

impl TryFrom<char> for Tile {
    type Error = TileCodeError;

    fn try_from(code: char) -> Result<Self, Self::Error> {
        match code {
            '.' => Ok(Self::Empty),
            'X' => Ok(Self::Solid),
            'P' => Ok(Self::Spawn),
            'E' => Ok(Self::Exit),
            'C' => Ok(Self::Collectible),
            other => Err(TileCodeError(other)),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Character that does not belong to the tile alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid tile code")]
pub struct TileCodeError(char);

impl TileCodeError {
    /// Offending character.
    #[must_use]
    pub const fn code(&self) -> char {
        self.0
    }
}

/// Reasons a row-encoded layout cannot be turned into a [`Grid`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// No rows, or rows without any tiles, were provided.
    #[error("layout must contain at least one non-empty row")]
    Empty,
    /// A row length differs from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A row contained a character outside the tile alphabet.
    #[error("row {row}, column {column}: {source}")]
    InvalidTile {
        /// Index of the offending row.
        row: usize,
        /// Index of the offending column.
        column: usize,
        /// Underlying decoding failure.
        #[source]
        source: TileCodeError,
    },
}

/// Requested size of a level measured in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDimensions {
    /// Number of tile columns.
    pub width_tiles: u32,
    /// Number of tile rows.
    pub height_tiles: u32,
}

impl LevelDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(width_tiles: u32, height_tiles: u32) -> Self {
        Self {
            width_tiles,
            height_tiles,
        }
    }

    /// Index of the bottom row, which holds the ground band.
    #[must_use]
    pub const fn ground_row(&self) -> i32 {
        self.height_tiles as i32 - 1
    }
}

impl Default for LevelDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH_TILES, DEFAULT_HEIGHT_TILES)
    }
}

/// Tile position expressed as column (`x`) and row (`y`), row 0 at the top.
///
/// Coordinates are signed so intermediate cursor arithmetic may step outside
/// the grid without wrapping; the grid itself ignores such positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    x: i32,
    y: i32,
}

impl TilePos {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Position directly above this one.
    #[must_use]
    pub const fn above(&self) -> Self {
        Self::new(self.x, self.y - 1)
    }
}

/// Position the generation cursor landed on after placing a chunk.
pub type Foothold = TilePos;

/// Inclusive span of ground-row columns removed to form a death pit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitRange {
    start: i32,
    end: i32,
}

impl PitRange {
    /// Creates a pit covering `start..=end`.
    #[must_use]
    pub fn new(start: i32, end: i32) -> Self {
        debug_assert!(start <= end, "pit range must not be inverted");
        Self { start, end }
    }

    /// First removed column.
    #[must_use]
    pub const fn start(&self) -> i32 {
        self.start
    }

    /// Last removed column.
    #[must_use]
    pub const fn end(&self) -> i32 {
        self.end
    }

    /// Number of removed columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.end - self.start + 1
    }

    /// Reports whether the column lies inside the pit.
    #[must_use]
    pub const fn contains(&self, x: i32) -> bool {
        self.start <= x && x <= self.end
    }

    /// Reports whether the inclusive span `x0..=x1` touches the pit.
    #[must_use]
    pub const fn overlaps(&self, x0: i32, x1: i32) -> bool {
        !(x1 < self.start || x0 > self.end)
    }
}

/// Movement constants of the player controller, in pixels and simulation steps.
///
/// The controller integrates once per frame without a time delta, so speeds
/// are expressed per step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConstants {
    /// Downward acceleration applied every step.
    pub gravity: f64,
    /// Magnitude of the upward velocity applied when a jump starts.
    pub jump_velocity: f64,
    /// Horizontal distance covered per step while running.
    pub player_speed: f64,
    /// Edge length of a tile in pixels.
    pub tile_size: f64,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            jump_velocity: 16.0,
            player_speed: 5.0,
            tile_size: 48.0,
        }
    }
}

/// Largest rise and gap a single jump is trusted to cover, in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReachabilityBounds {
    max_up_tiles: u32,
    max_gap_tiles: u32,
}

impl ReachabilityBounds {
    /// Largest rise or gap a bound may hold; no level is wider or taller.
    pub const MAX_TILES: u32 = 1 << 15;

    /// Creates bounds, clamping each component into `1..=MAX_TILES`.
    #[must_use]
    pub fn new(max_up_tiles: u32, max_gap_tiles: u32) -> Self {
        Self {
            max_up_tiles: max_up_tiles.clamp(1, Self::MAX_TILES),
            max_gap_tiles: max_gap_tiles.clamp(1, Self::MAX_TILES),
        }
    }

    /// Reports whether either component was cut down to [`Self::MAX_TILES`].
    #[must_use]
    pub const fn is_saturated(&self) -> bool {
        self.max_up_tiles == Self::MAX_TILES || self.max_gap_tiles == Self::MAX_TILES
    }

    /// Highest vertical rise reachable by one jump.
    #[must_use]
    pub const fn max_up_tiles(&self) -> u32 {
        self.max_up_tiles
    }

    /// Widest horizontal gap crossable by one jump.
    #[must_use]
    pub const fn max_gap_tiles(&self) -> u32 {
        self.max_gap_tiles
    }
}

/// Fixed-size, row-major tile buffer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid of the requested size filled with [`Tile::Empty`].
    #[must_use]
    pub fn new(dimensions: LevelDimensions) -> Self {
        let width = dimensions.width_tiles as usize;
        let height = dimensions.height_tiles as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }

    /// Parses a layout encoded as one string per row.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let expected = rows
            .first()
            .map(|row| row.as_ref().chars().count())
            .unwrap_or(0);
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(GridError::RaggedRow {
                    row: row_index,
                    expected,
                    found,
                });
            }
            for (column, code) in row.chars().enumerate() {
                let tile = Tile::try_from(code).map_err(|source| GridError::InvalidTile {
                    row: row_index,
                    column,
                    source,
                })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            width: expected,
            height: rows.len(),
            tiles,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Size of the grid as level dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> LevelDimensions {
        LevelDimensions::new(self.width as u32, self.height as u32)
    }

    /// Index of the bottom row.
    #[must_use]
    pub const fn ground_row(&self) -> i32 {
        self.height as i32 - 1
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Returns the tile at the position, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|index| self.tiles[index])
    }

    /// Writes a tile. Positions outside the grid are ignored.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(index) = self.index(x, y) {
            self.tiles[index] = tile;
        }
    }

    /// Reports whether the position is inside the grid and empty.
    #[must_use]
    pub fn is_empty_at(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(Tile::Empty)
    }

    /// Counts the occurrences of a tile kind.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|candidate| **candidate == tile).count()
    }

    /// Iterates over every position holding the tile kind, in row-major order.
    pub fn positions_of(&self, tile: Tile) -> impl Iterator<Item = TilePos> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, candidate)| **candidate == tile)
            .map(move |(index, _)| TilePos::new((index % width) as i32, (index / width) as i32))
    }

    /// Tiles of a single row, or `None` outside the grid.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[Tile]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.tiles[start..start + self.width])
    }

    /// Renders the grid as one interchange string per row.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|tile| tile.to_char()).collect())
            .collect()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows().iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}
