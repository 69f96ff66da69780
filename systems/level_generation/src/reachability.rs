//! Jump reach derived from the player controller's physics constants.

use platformer_core::{PhysicsConstants, ReachabilityBounds};

/// Derives the largest rise and gap a single jump is trusted to cover.
///
/// The controller integrates once per step, so airtime is counted in whole
/// steps. One tile is withheld from the horizontal reach for takeoff and
/// landing clearance.
#[must_use]
pub fn reachability_bounds(physics: &PhysicsConstants) -> ReachabilityBounds {
    let velocity = physics.jump_velocity.abs();
    let gravity = physics.gravity;
    let tile = physics.tile_size;

    let apex_px = (velocity * velocity) / (2.0 * gravity);
    let max_up = (apex_px / tile).floor();

    let airtime_steps = ((2.0 * velocity) / gravity).floor();
    let horizontal_px = physics.player_speed * airtime_steps;
    let max_gap = (horizontal_px / tile).floor() - 1.0;

    // Float to int casts saturate, and the bounds clamp to at least one tile.
    ReachabilityBounds::new(max_up as u32, max_gap as u32)
}

/// Converts a tile bound into signed grid units without wrapping.
pub(crate) fn signed_tiles(tiles: u32) -> i32 {
    i32::try_from(tiles).unwrap_or(i32::MAX)
}
