use thiserror::Error;

/// Narrowest level that still fits the spawn, one chunk and the exit.
pub const MIN_WIDTH_TILES: u32 = 8;
/// Shortest level that still fits the ground, headroom and a floating band.
pub const MIN_HEIGHT_TILES: u32 = 5;
/// Largest side length accepted; keeps tile coordinates well inside `i32`.
pub const MAX_SIDE_TILES: u32 = 1 << 15;

/// Caller errors rejected before any generation work starts.
///
/// Generation itself is total: every internal contingency is resolved by
/// truncating, skipping or substituting a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Width or height was zero.
    #[error("level dimensions must be positive, got {width_tiles}x{height_tiles}")]
    NonPositiveDimensions {
        /// Requested width.
        width_tiles: u32,
        /// Requested height.
        height_tiles: u32,
    },
    /// Width cannot host the spawn, a chunk and the exit.
    #[error("level width {width_tiles} is below the minimum of {min} tiles", min = MIN_WIDTH_TILES)]
    WidthTooSmall {
        /// Requested width.
        width_tiles: u32,
    },
    /// Height cannot host the ground, headroom and floating platforms.
    #[error("level height {height_tiles} is below the minimum of {min} tiles", min = MIN_HEIGHT_TILES)]
    HeightTooSmall {
        /// Requested height.
        height_tiles: u32,
    },
    /// A side exceeds the supported maximum.
    #[error(
        "level dimensions {width_tiles}x{height_tiles} exceed {max} tiles per side",
        max = MAX_SIDE_TILES
    )]
    TooLarge {
        /// Requested width.
        width_tiles: u32,
        /// Requested height.
        height_tiles: u32,
    },
}
