//! Shape types for dial rendering
//!
//! Each shape is its own type that knows how to:
//! - Report its linear width (across the radial direction) and height
//!   (along it, inward from the ring)
//! - Convert that width into an angular footprint on a ring
//! - Render itself to SVG at a given radius and turn

use std::f64::consts::{PI, TAU};

use enum_dispatch::enum_dispatch;

use crate::ast::{Resolved, ShapeKind};
use crate::errors::RenderError;
use crate::log::warn;
use crate::types::{Length, Turn};

use super::defaults::ROMAN;
use super::svg::SvgWriter;

/// Where a shape is drawn: its ring radius and angular position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub radius: Length,
    pub turn: Turn,
}

/// Common behavior for all shapes
#[enum_dispatch]
pub trait Shape {
    /// Extent across the radial direction, in dial units
    fn linear_width(&self) -> f64;

    /// Extent along the radial direction, measured inward from the ring
    fn height(&self) -> f64;

    /// Shrink the shape so its height does not exceed `max`
    fn clamp_height(&mut self, max: f64);

    /// Write this shape's markup
    fn render_svg(&self, at: Placement, out: &mut SvgWriter) -> Result<(), RenderError>;

    /// Fraction of a full turn covered by the shape on a ring of `radius`
    fn angular_width(&self, radius: Length) -> f64 {
        angular_width(self.linear_width(), radius)
    }
}

/// `asin(width / radius) / 2π`. Shapes wider than the ring's radius are
/// treated as covering half the circle. Never negative.
pub fn angular_width(width: f64, radius: Length) -> f64 {
    let ratio = (width / radius.raw()).abs();
    if ratio > 1.0 {
        warn!(width, radius = radius.raw(), "shape is wider than its ring radius");
        return 1.0_f64.asin() / TAU;
    }
    ratio.asin() / TAU
}

// ============================================================================
// Shape Types
// ============================================================================

/// Radial stroke from the ring inward
#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub height: f64,
    pub width: f64,
}

impl Shape for LineShape {
    fn linear_width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clamp_height(&mut self, max: f64) {
        self.height = self.height.min(max);
    }

    fn render_svg(&self, at: Placement, out: &mut SvgWriter) -> Result<(), RenderError> {
        let dir = at.turn.direction();
        let r = at.radius.raw();
        out.line(dir * r, dir * (r - self.height), self.width)
    }
}

/// Radial bar with fully rounded ends
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedLineShape {
    pub height: f64,
    pub width: f64,
}

impl Shape for RoundedLineShape {
    fn linear_width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clamp_height(&mut self, max: f64) {
        self.height = self.height.min(max);
    }

    fn render_svg(&self, at: Placement, out: &mut SvgWriter) -> Result<(), RenderError> {
        // The capsule is laid out along +y and rotated so +y points at the turn
        let rotation = (at.turn.radians() - PI / 2.0).to_degrees();
        let r = at.radius.raw();
        out.capsule(r - self.height, self.height, self.width, rotation)
    }
}

/// Two parallel radial strokes separated by `separation` times their width.
/// A separation below -1 makes the strokes swap sides.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoLinesShape {
    pub height: f64,
    pub width: f64,
    pub separation: f64,
}

impl Shape for TwoLinesShape {
    fn linear_width(&self) -> f64 {
        // Stroke centres sit `width * |1 + separation|` apart
        self.width * (1.0 + (1.0 + self.separation).abs())
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clamp_height(&mut self, max: f64) {
        self.height = self.height.min(max);
    }

    fn render_svg(&self, at: Placement, out: &mut SvgWriter) -> Result<(), RenderError> {
        let dir = at.turn.direction();
        let r = at.radius.raw();
        let offset = at.turn.tangent() * (self.width / 2.0 * (1.0 + self.separation));
        let (outer, inner) = (dir * r, dir * (r - self.height));

        out.line(outer + offset, inner + offset, self.width)?;
        out.line(outer - offset, inner - offset, self.width)
    }
}

/// Filled dot touching the ring from the inside
#[derive(Debug, Clone, PartialEq)]
pub struct DotShape {
    pub diameter: f64,
}

impl Shape for DotShape {
    fn linear_width(&self) -> f64 {
        self.diameter
    }

    fn height(&self) -> f64 {
        self.diameter
    }

    fn clamp_height(&mut self, max: f64) {
        self.diameter = self.diameter.min(max);
    }

    fn render_svg(&self, at: Placement, out: &mut SvgWriter) -> Result<(), RenderError> {
        let r = self.diameter / 2.0;
        let center = at.turn.direction() * (at.radius.raw() - r);
        out.dot(center, r)
    }
}

/// Triangle with its base on the ring and apex pointing at the centre
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleShape {
    pub height: f64,
    pub width: f64,
}

impl Shape for TriangleShape {
    fn linear_width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clamp_height(&mut self, max: f64) {
        self.height = self.height.min(max);
    }

    fn render_svg(&self, at: Placement, out: &mut SvgWriter) -> Result<(), RenderError> {
        let dir = at.turn.direction();
        let r = at.radius.raw();
        let base = dir * r;
        let half = at.turn.tangent() * (self.width / 2.0);
        out.polygon(&[base + half, base - half, dir * (r - self.height)])
    }
}

/// Which label a number shape prints at a given turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumeralKind {
    /// 1 to 12
    Hour,
    /// 1 to 60
    Minute,
    /// I to XII
    Roman,
}

impl NumeralKind {
    /// Unrecognised names fall back to hours
    pub fn from_arg(arg: &Resolved) -> NumeralKind {
        match arg.as_symbol() {
            Some("minute") => NumeralKind::Minute,
            Some("roman") => NumeralKind::Roman,
            _ => NumeralKind::Hour,
        }
    }

    pub fn label(self, turn: Turn) -> String {
        match self {
            NumeralKind::Hour => clock_value(turn, 12).to_string(),
            NumeralKind::Minute => clock_value(turn, 60).to_string(),
            NumeralKind::Roman => ROMAN[(clock_value(turn, 12) - 1) as usize].to_string(),
        }
    }
}

/// `round(turn * factor)` with ties to even, where 0 reads as `factor`
fn clock_value(turn: Turn, factor: u32) -> u32 {
    let value = (turn.raw() * factor as f64).round_ties_even() as u32;
    if value == 0 { factor } else { value.min(factor) }
}

/// How a label is rotated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Never rotated
    Horizontal,
    /// Rotated with the turn, so the top of each glyph faces outward
    Rotating,
    /// Like `Rotating`, but flipped on the lower half so it stays readable
    Upright,
}

impl Orientation {
    /// Unrecognised names fall back to upright
    pub fn from_arg(arg: &Resolved) -> Orientation {
        match arg.as_symbol() {
            Some("horizontal") => Orientation::Horizontal,
            Some("rotating") => Orientation::Rotating,
            _ => Orientation::Upright,
        }
    }

    /// Label rotation in degrees at `turn`
    pub fn rotation(self, turn: Turn) -> f64 {
        let rad = turn.radians();
        match self {
            Orientation::Horizontal => 0.0,
            Orientation::Rotating => (rad + PI / 2.0).to_degrees(),
            Orientation::Upright => {
                let flip = if rad > 0.0 && rad < PI { PI } else { 0.0 };
                (rad + PI / 2.0 + flip).to_degrees()
            }
        }
    }
}

/// Text numeral centred half its size inside the ring
#[derive(Debug, Clone, PartialEq)]
pub struct NumberShape {
    pub size: f64,
    pub kind: NumeralKind,
    pub orientation: Orientation,
    pub font: String,
}

impl Shape for NumberShape {
    fn linear_width(&self) -> f64 {
        self.size
    }

    fn height(&self) -> f64 {
        self.size
    }

    fn clamp_height(&mut self, max: f64) {
        self.size = self.size.min(max);
    }

    fn render_svg(&self, at: Placement, out: &mut SvgWriter) -> Result<(), RenderError> {
        let center = at.turn.direction() * (at.radius.raw() - self.size / 2.0);
        out.label(
            center,
            self.orientation.rotation(at.turn),
            self.size,
            &self.font,
            &self.kind.label(at.turn),
        )
    }
}

// ============================================================================
// Shape Enum
// ============================================================================

/// A shape enum wrapping all shape types
#[enum_dispatch(Shape)]
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeEnum {
    Line(LineShape),
    RoundedLine(RoundedLineShape),
    TwoLines(TwoLinesShape),
    Dot(DotShape),
    Triangle(TriangleShape),
    Number(NumberShape),
}

impl ShapeEnum {
    /// Build a shape from an element's kind and resolved arguments, checking
    /// arity and that every size is a finite non-negative number
    pub fn from_args(kind: ShapeKind, args: &[Resolved]) -> Result<ShapeEnum, RenderError> {
        let args = Args { kind, args };
        Ok(match kind {
            ShapeKind::Line => {
                args.arity(2, 2)?;
                ShapeEnum::Line(LineShape {
                    height: args.size(0, "height")?,
                    width: args.size(1, "width")?,
                })
            }
            ShapeKind::RoundedLine => {
                args.arity(2, 2)?;
                ShapeEnum::RoundedLine(RoundedLineShape {
                    height: args.size(0, "height")?,
                    width: args.size(1, "width")?,
                })
            }
            ShapeKind::TwoLines => {
                args.arity(3, 3)?;
                ShapeEnum::TwoLines(TwoLinesShape {
                    height: args.size(0, "height")?,
                    width: args.size(1, "width")?,
                    separation: args.number(2, "separation")?,
                })
            }
            ShapeKind::Circle => {
                args.arity(1, 1)?;
                ShapeEnum::Dot(DotShape {
                    diameter: args.size(0, "diameter")?,
                })
            }
            ShapeKind::Triangle => {
                args.arity(2, 2)?;
                ShapeEnum::Triangle(TriangleShape {
                    height: args.size(0, "height")?,
                    width: args.size(1, "width")?,
                })
            }
            ShapeKind::Number => {
                args.arity(3, 4)?;
                ShapeEnum::Number(NumberShape {
                    size: args.size(0, "size")?,
                    kind: NumeralKind::from_arg(&args.args[1]),
                    orientation: Orientation::from_arg(&args.args[2]),
                    // Without a font the family attribute is left empty
                    font: args.args.get(3).map(|font| font.to_string()).unwrap_or_default(),
                })
            }
        })
    }
}

struct Args<'a> {
    kind: ShapeKind,
    args: &'a [Resolved],
}

impl Args<'_> {
    fn invalid(&self, message: String) -> RenderError {
        RenderError::InvalidShapeArguments {
            kind: self.kind.name(),
            message,
        }
    }

    fn arity(&self, min: usize, max: usize) -> Result<(), RenderError> {
        let n = self.args.len();
        if n < min || n > max {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("{} or {}", min, max)
            };
            return Err(self.invalid(format!("expected {} arguments, got {}", expected, n)));
        }
        Ok(())
    }

    fn number(&self, index: usize, name: &str) -> Result<f64, RenderError> {
        let value = &self.args[index];
        match value.as_number() {
            Some(n) if n.is_finite() => Ok(n),
            _ => Err(self.invalid(format!("{} `{}` is not a finite number", name, value))),
        }
    }

    fn size(&self, index: usize, name: &str) -> Result<f64, RenderError> {
        let n = self.number(index, name)?;
        Length::try_non_negative(n)
            .map(Length::raw)
            .map_err(|e| self.invalid(format!("{} {}: {}", name, n, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Resolved {
        Resolved::Numeric(n)
    }

    fn sym(s: &str) -> Resolved {
        Resolved::Symbolic(s.to_string())
    }

    fn draw(shape: &ShapeEnum, at: Placement) -> String {
        let mut out = SvgWriter::new();
        shape.render_svg(at, &mut out).unwrap();
        out.finish().unwrap()
    }

    fn at(radius: f64, turn: f64) -> Placement {
        Placement {
            radius: Length(radius),
            turn: Turn::wrapping(turn),
        }
    }

    #[test]
    fn angular_width_follows_asin() {
        let w = angular_width(10.0, Length(100.0));
        assert!((w - (0.1_f64).asin() / TAU).abs() < 1e-12);
        assert_eq!(angular_width(0.0, Length(100.0)), 0.0);
    }

    #[test]
    fn oversized_width_is_clamped() {
        assert!((angular_width(250.0, Length(100.0)) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn negative_width_has_positive_footprint() {
        let w = angular_width(-10.0, Length(100.0));
        assert!((w - (0.1_f64).asin() / TAU).abs() < 1e-12);
        assert!((angular_width(-250.0, Length(100.0)) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn two_lines_footprint_includes_gap() {
        let shape = ShapeEnum::from_args(ShapeKind::TwoLines, &[num(5.0), num(1.0), num(2.0)]).unwrap();
        assert_eq!(shape.linear_width(), 4.0);
    }

    #[test]
    fn two_lines_footprint_with_negative_separation() {
        let width = |sep: f64| {
            ShapeEnum::from_args(ShapeKind::TwoLines, &[num(5.0), num(2.0), num(sep)])
                .unwrap()
                .linear_width()
        };
        // strokes touching, fully overlapping, then crossed over
        assert_eq!(width(0.0), 4.0);
        assert_eq!(width(-1.0), 2.0);
        assert_eq!(width(-3.0), 6.0);
        assert_eq!(width(-300.0), 600.0);

        let shape = ShapeEnum::from_args(ShapeKind::TwoLines, &[num(5.0), num(1.0), num(-300.0)]).unwrap();
        let footprint = shape.angular_width(Length(100.0));
        assert!((footprint - 0.25).abs() < 1e-12);
    }

    #[test]
    fn arity_is_checked() {
        let err = ShapeEnum::from_args(ShapeKind::Line, &[num(5.0)]).unwrap_err();
        assert_eq!(
            err,
            RenderError::InvalidShapeArguments {
                kind: "line",
                message: "expected 2 arguments, got 1".to_string()
            }
        );
        assert!(ShapeEnum::from_args(ShapeKind::Number, &[num(5.0), sym("hour")]).is_err());
        assert!(
            ShapeEnum::from_args(
                ShapeKind::Number,
                &[num(5.0), sym("hour"), sym("upright"), sym("serif"), num(1.0)]
            )
            .is_err()
        );
    }

    #[test]
    fn sizes_must_be_non_negative_numbers() {
        assert!(ShapeEnum::from_args(ShapeKind::Circle, &[num(-1.0)]).is_err());
        assert!(ShapeEnum::from_args(ShapeKind::Circle, &[sym("big")]).is_err());
        assert!(ShapeEnum::from_args(ShapeKind::Circle, &[num(0.0)]).is_ok());
    }

    #[test]
    fn dot_touches_ring_from_inside() {
        let shape = ShapeEnum::from_args(ShapeKind::Circle, &[num(10.0)]).unwrap();
        insta::assert_snapshot!(
            draw(&shape, at(100.0, 0.25)),
            @r#"<circle cx="95" cy="0" r="5" style="stroke-width: 0; fill: rgb(0, 0, 0);"></circle>"#
        );
    }

    #[test]
    fn line_runs_inward_from_ring() {
        let shape = ShapeEnum::from_args(ShapeKind::Line, &[num(8.0), num(1.5)]).unwrap();
        insta::assert_snapshot!(
            draw(&shape, at(100.0, 0.0)),
            @r#"<line x1="0" y1="-100" x2="0" y2="-92" style="stroke-width:1.5; stroke:#000000"></line>"#
        );
    }

    #[test]
    fn two_lines_are_offset_along_tangent() {
        let shape = ShapeEnum::from_args(ShapeKind::TwoLines, &[num(8.0), num(1.0), num(1.0)]).unwrap();
        insta::assert_snapshot!(
            draw(&shape, at(100.0, 0.0)),
            @r#"<line x1="1" y1="-100" x2="1" y2="-92" style="stroke-width:1; stroke:#000000"></line><line x1="-1" y1="-100" x2="-1" y2="-92" style="stroke-width:1; stroke:#000000"></line>"#
        );
    }

    #[test]
    fn rounded_line_spans_ring_inward() {
        let shape = ShapeEnum::from_args(ShapeKind::RoundedLine, &[num(10.0), num(2.0)]).unwrap();
        insta::assert_snapshot!(
            draw(&shape, at(100.0, 0.0)),
            @r#"<rect rx="1" y="90" x="-1" ry="1" transform="rotate(-180)" height="10" width="2"></rect>"#
        );
    }

    #[test]
    fn triangle_apex_points_at_centre() {
        let shape = ShapeEnum::from_args(ShapeKind::Triangle, &[num(6.0), num(4.0)]).unwrap();
        insta::assert_snapshot!(
            draw(&shape, at(100.0, 0.25)),
            @r#"<polygon points="100,2 100,-2 94,0"/>"#
        );
    }

    #[test]
    fn hour_labels() {
        assert_eq!(NumeralKind::Hour.label(Turn::ZERO), "12");
        assert_eq!(NumeralKind::Hour.label(Turn::wrapping(0.25)), "3");
        assert_eq!(NumeralKind::Minute.label(Turn::wrapping(0.25)), "15");
        assert_eq!(NumeralKind::Minute.label(Turn::ZERO), "60");
        assert_eq!(NumeralKind::Roman.label(Turn::fraction(4, 12)), "IIII");
        assert_eq!(NumeralKind::Roman.label(Turn::ZERO), "XII");
    }

    #[test]
    fn hour_rounding_is_half_even() {
        // 1.5 hours rounds to 2, 4.5 hours rounds to 4
        assert_eq!(NumeralKind::Hour.label(Turn::wrapping(0.125)), "2");
        assert_eq!(NumeralKind::Hour.label(Turn::wrapping(0.375)), "4");
    }

    #[test]
    fn unknown_names_fall_back() {
        assert_eq!(NumeralKind::from_arg(&sym("decimal")), NumeralKind::Hour);
        assert_eq!(NumeralKind::from_arg(&num(3.0)), NumeralKind::Hour);
        assert_eq!(Orientation::from_arg(&sym("sideways")), Orientation::Upright);
    }

    #[test]
    fn orientation_rotation() {
        let quarter = Turn::wrapping(0.25);
        let half = Turn::wrapping(0.5);
        assert_eq!(Orientation::Horizontal.rotation(half), 0.0);
        assert!((Orientation::Rotating.rotation(quarter) - 90.0).abs() < 1e-9);
        assert!((Orientation::Rotating.rotation(half) - 180.0).abs() < 1e-9);
        // lower half is flipped, upper half is not
        assert!((Orientation::Upright.rotation(half) - 360.0).abs() < 1e-9);
        assert!((Orientation::Upright.rotation(Turn::wrapping(0.125)) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn number_label_markup() {
        let shape = ShapeEnum::from_args(
            ShapeKind::Number,
            &[num(10.0), sym("hour"), sym("horizontal")],
        )
        .unwrap();
        insta::assert_snapshot!(
            draw(&shape, at(100.0, 0.25)),
            @r##"<g transform="translate(95, 0)"><text transform="rotate(0)" class="title" fill="#111111" fill-opacity="0.9" font-size="10" font-weight="bold" font-family="" alignment-baseline="middle" text-anchor="middle">3</text></g>"##
        );
    }

    #[test]
    fn clamp_never_grows() {
        let mut shape = ShapeEnum::from_args(ShapeKind::Line, &[num(8.0), num(1.0)]).unwrap();
        shape.clamp_height(20.0);
        assert_eq!(shape.height(), 8.0);
        shape.clamp_height(5.0);
        assert_eq!(shape.height(), 5.0);
    }
}
