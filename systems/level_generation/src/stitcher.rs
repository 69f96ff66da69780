//! Cursor loop that stitches chunks from the spawn to the right edge.

use platformer_core::{Foothold, ReachabilityBounds, TilePos};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    chunks::{draw_kind, ChunkContext, ChunkKind, ChunkOutcome},
    reachability::signed_tiles,
};

/// Tiles left open between a foothold and the start of the next chunk.
const TAKEOFF_BUFFER: i32 = 2;
/// The loop stops once the cursor reaches this many columns from the right edge.
const RIGHT_MARGIN: i32 = 8;

/// Trace of one chunk placement attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Kind drawn from the weight table.
    pub drawn: ChunkKind,
    /// Whether the drawn chunk overshot the reach bounds and a flat run was
    /// stamped in its place. The substitute is not re-checked.
    pub substituted: bool,
    /// Cursor the chunk started from.
    pub start: TilePos,
    /// Foothold the cursor landed on, or `None` when the chunk was skipped.
    pub landing: Option<Foothold>,
    /// Collectible spots the chunk offered above its steps.
    pub gem_spots: Vec<TilePos>,
}

impl ChunkRecord {
    /// Kind whose platforms the cursor actually landed on.
    #[must_use]
    pub const fn placed(&self) -> ChunkKind {
        if self.substituted {
            ChunkKind::Flat
        } else {
            self.drawn
        }
    }
}

/// Reports whether a chunk starting at `start` and landing on `landing`
/// stays within a single jump's rise and twice its gap.
#[must_use]
pub fn chunk_within_reach(bounds: ReachabilityBounds, start: TilePos, landing: Foothold) -> bool {
    let rise = (landing.y() - start.y()).abs();
    let span = landing.x() - start.x();
    rise <= signed_tiles(bounds.max_up_tiles())
        && span <= signed_tiles(bounds.max_gap_tiles()).saturating_mul(2)
}

/// Footholds from the spawn onward plus the trace of every chunk attempt.
#[derive(Debug)]
pub(crate) struct StitchedPath {
    pub(crate) footholds: Vec<Foothold>,
    pub(crate) chunks: Vec<ChunkRecord>,
}

pub(crate) fn stitch_chunks<R: Rng + ?Sized>(
    context: &mut ChunkContext<'_>,
    spawn: Foothold,
    rng: &mut R,
) -> StitchedPath {
    let width = context.width();
    let ground_row = context.ground_row();
    let bounds = context.bounds();

    let mut footholds = vec![spawn];
    let mut chunks = Vec::new();
    let mut cursor = TilePos::new(spawn.x() + TAKEOFF_BUFFER, spawn.y());

    while cursor.x() < width - RIGHT_MARGIN {
        let drawn = draw_kind(rng, cursor.y(), ground_row);
        let mut outcome = drawn.place(context, cursor, rng);
        let mut substituted = false;

        if let ChunkOutcome::Landed { foothold, .. } = &outcome {
            if !chunk_within_reach(bounds, cursor, *foothold) {
                log::debug!(
                    "{} from {:?} to {:?} exceeds reach, substituting flat",
                    drawn.name(),
                    cursor,
                    foothold
                );
                outcome = ChunkKind::Flat.place(context, cursor, rng);
                substituted = true;
            }
        }

        let (landing, gem_spots) = match outcome {
            ChunkOutcome::Landed {
                foothold,
                gem_spots,
            } => (Some(foothold), gem_spots),
            ChunkOutcome::Skipped => (None, Vec::new()),
        };
        log::trace!("{} at {:?} landed on {:?}", drawn.name(), cursor, landing);

        chunks.push(ChunkRecord {
            drawn,
            substituted,
            start: cursor,
            landing,
            gem_spots,
        });

        cursor = match landing {
            Some(foothold) => {
                footholds.push(foothold);
                TilePos::new(foothold.x() + TAKEOFF_BUFFER, foothold.y())
            }
            None => TilePos::new(cursor.x() + TAKEOFF_BUFFER, cursor.y()),
        };
    }

    StitchedPath { footholds, chunks }
}
