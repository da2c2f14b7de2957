//! Rendering context - per-ring placement state and caller options

use crate::errors::RenderError;
use crate::log::{debug, trace};
use crate::types::{Length, Turn};

use super::occupancy::OccupancyTracker;
use super::shapes::{Placement, Shape, ShapeEnum};
use super::svg::SvgWriter;

/// Caller-selectable rendering behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Skip shapes whose footprint collides with one already placed on the
    /// same ring, and keep every shape's height within its ring's radius.
    /// Off by default: every expanded position is drawn.
    pub enforce_occupancy: bool,
}

impl RenderOptions {
    pub fn with_occupancy_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_occupancy = enforce;
        self
    }
}

/// State for drawing one ring. A fresh context is created per ring, so
/// footprints never leak between rings.
#[derive(Debug)]
pub struct RingContext {
    pub radius: Length,
    pub occupancy: OccupancyTracker,
    options: RenderOptions,
}

impl RingContext {
    pub fn new(radius: Length, options: RenderOptions) -> Self {
        Self {
            radius,
            occupancy: OccupancyTracker::new(),
            options,
        }
    }

    /// Largest height a shape may have on this ring
    pub fn max_height(&self) -> f64 {
        if self.options.enforce_occupancy {
            self.radius.raw()
        } else {
            f64::INFINITY
        }
    }

    /// Whether a shape of angular `width` at `turn` collides with an earlier
    /// shape on this ring. Never true unless occupancy is enforced.
    pub fn range_occupied(&self, turn: Turn, width: f64) -> bool {
        self.options.enforce_occupancy && !self.occupancy.is_free(turn, width)
    }

    /// Place `shape` at `turn`: clamp its height, check and reserve its
    /// footprint, and render it into `out`. Returns `false` when the shape
    /// was skipped.
    pub fn place(&mut self, mut shape: ShapeEnum, turn: Turn, out: &mut SvgWriter) -> Result<bool, RenderError> {
        let max_height = self.max_height();
        if shape.height() > max_height {
            trace!(height = shape.height(), max_height, "clamped shape height");
            shape.clamp_height(max_height);
        }

        let width = shape.angular_width(self.radius);
        if self.range_occupied(turn, width) {
            debug!(turn = turn.raw(), width, "skipped shape on occupied range");
            return Ok(false);
        }
        self.occupancy.reserve(turn, width);

        let at = Placement {
            radius: self.radius,
            turn,
        };
        shape.render_svg(at, out)?;
        Ok(true)
    }
}
