//! SVG rendering for dial descriptions
//!
//! This module is organized into submodules:
//! - `defaults`: Fixed sizes and styling
//! - `rings`: Cumulative offsets to absolute radii
//! - `positions`: Position specifications to concrete turns
//! - `occupancy`: Angular footprint bookkeeping per ring
//! - `shapes`: Shape geometry and per-shape markup
//! - `context`: RenderOptions and per-ring placement state
//! - `svg`: Markup writers

pub mod context;
pub mod defaults;
pub mod occupancy;
pub mod positions;
pub mod rings;
pub mod shapes;
pub mod svg;

pub use context::{RenderOptions, RingContext};
pub use shapes::{Shape, ShapeEnum};

use crate::ast::{Border, Dial, Element, Resolved, RingItem};
use crate::errors::RenderError;
use crate::log::{debug, trace};
use crate::types::Length;

use svg::SvgWriter;

/// Render a resolved dial to a markup fragment.
///
/// Rings are drawn innermost first; within a ring, items are drawn in
/// declaration order and each element's positions in expansion order.
/// Nothing is returned on error, so a caller never sees partial output.
pub fn render_dial(dial: &Dial<Resolved>, options: &RenderOptions) -> Result<String, RenderError> {
    let rings = rings::allocate(dial)?;
    let mut out = SvgWriter::new();

    for ring in rings.iter().rev() {
        let mut ctx = RingContext::new(ring.radius, *options);
        for item in ring.items {
            match item {
                RingItem::Border(border) => render_border(&mut out, border, ring.radius)?,
                RingItem::Element(element) => render_element(&mut out, &mut ctx, element)?,
            }
        }
        debug!(
            ring = ring.index,
            radius = ring.radius.raw(),
            reserved = ctx.occupancy.ranges().len(),
            "rendered ring"
        );
    }

    out.finish()
}

fn render_border(out: &mut SvgWriter, border: &Border<Resolved>, radius: Length) -> Result<(), RenderError> {
    let width = match border.stroke_width.as_number() {
        Some(w) if w.is_finite() && w >= 0.0 => w,
        _ => {
            return Err(RenderError::InvalidShapeArguments {
                kind: "border",
                message: format!(
                    "stroke width `{}` is not a finite non-negative number",
                    border.stroke_width
                ),
            });
        }
    };
    out.circular_border(radius.raw(), width)
}

fn render_element(
    out: &mut SvgWriter,
    ctx: &mut RingContext,
    element: &Element<Resolved>,
) -> Result<(), RenderError> {
    let turns = positions::expand(&element.position)?;
    let shape = ShapeEnum::from_args(element.kind, &element.args)?;
    trace!(kind = %element.kind, positions = turns.len(), "expanded element");

    for turn in turns {
        ctx.place(shape.clone(), turn, out)?;
    }
    Ok(())
}
