//! Angular occupancy bookkeeping for one ring
//!
//! Each placed shape reserves its angular footprint, padded by a margin of
//! `BORDER_FACTOR` times its width on both sides. Footprints that cross the
//! 0/1 seam are split in two so every stored range satisfies
//! `0 <= start <= end <= 1`.

use crate::log::trace;
use crate::types::{AngularRange, Turn};

use super::defaults::BORDER_FACTOR;

/// Occupied ranges of a single ring. Created empty per ring and dropped once
/// the ring is drawn; rings never share occupancy.
#[derive(Debug, Clone, Default)]
pub struct OccupancyTracker {
    ranges: Vec<AngularRange>,
}

impl OccupancyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Padded footprint of a shape centred at `turn` with angular `width`,
    /// split at the seam. Nothing is recorded.
    pub fn footprint(turn: Turn, width: f64) -> Vec<AngularRange> {
        let border = width * BORDER_FACTOR;
        let start = turn.raw() - width / 2.0 - border;
        let end = turn.raw() + width / 2.0 + border;

        if start < 0.0 && end > 1.0 {
            vec![AngularRange::new(0.0, 1.0)]
        } else if start < 0.0 {
            vec![AngularRange::new(start + 1.0, 1.0), AngularRange::new(0.0, end)]
        } else if end > 1.0 {
            vec![AngularRange::new(start, 1.0), AngularRange::new(0.0, end - 1.0)]
        } else {
            vec![AngularRange::new(start, end)]
        }
    }

    /// Record the footprint of a shape and return the recorded ranges
    pub fn reserve(&mut self, turn: Turn, width: f64) -> Vec<AngularRange> {
        let footprint = Self::footprint(turn, width);
        trace!(turn = turn.raw(), width, ranges = footprint.len(), "reserved");
        self.ranges.extend_from_slice(&footprint);
        footprint
    }

    /// Whether `range` shares interior with any recorded range. Ranges that
    /// only touch at an endpoint do not intersect.
    pub fn intersects(&self, range: AngularRange) -> bool {
        self.ranges.iter().any(|occupied| occupied.overlaps(range))
    }

    /// Whether a shape at `turn` with angular `width` would fit without
    /// overlapping anything recorded so far
    pub fn is_free(&self, turn: Turn, width: f64) -> bool {
        Self::footprint(turn, width)
            .into_iter()
            .all(|range| !self.intersects(range))
    }

    pub fn ranges(&self) -> &[AngularRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
