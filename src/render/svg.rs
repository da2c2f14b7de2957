//! SVG markup writers
//!
//! Elements are emitted through a quick-xml [`Writer`], which escapes
//! attribute values and text. Every element lives in the dial's coordinate
//! system: origin at the centre, y pointing down, outer boundary at 100.

use glam::DVec2;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use super::defaults;
use crate::errors::RenderError;

/// Format a number with at most `DECIMALS` decimal places, trailing zeros
/// trimmed, and negative zero written as `0`.
pub(crate) fn fmt_num(value: f64) -> String {
    let scale = 10_f64.powi(defaults::DECIMALS as i32);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{:.prec$}", rounded, prec = defaults::DECIMALS);
    let s = s.trim_end_matches('0');
    let s = s.trim_end_matches('.');
    s.to_string()
}

fn markup_error(err: impl std::fmt::Display) -> RenderError {
    RenderError::Markup {
        message: err.to_string(),
    }
}

/// Accumulates markup for a whole fragment
pub struct SvgWriter {
    writer: Writer<Vec<u8>>,
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn start(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<(), RenderError> {
        let mut elem = BytesStart::new(name);
        for (key, value) in attrs {
            elem.push_attribute((*key, value.as_str()));
        }
        self.writer.write_event(Event::Start(elem)).map_err(markup_error)
    }

    fn end(&mut self, name: &str) -> Result<(), RenderError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(markup_error)
    }

    fn text(&mut self, content: &str) -> Result<(), RenderError> {
        self.writer
            .write_event(Event::Text(BytesText::new(content)))
            .map_err(markup_error)
    }

    /// Markup that is already escaped, written as is
    fn raw(&mut self, markup: &str) -> Result<(), RenderError> {
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(markup)))
            .map_err(markup_error)
    }

    /// An element with an explicit end tag and no content
    fn element(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<(), RenderError> {
        self.start(name, attrs)?;
        self.end(name)
    }

    /// Straight stroke between two points
    pub fn line(&mut self, from: DVec2, to: DVec2, width: f64) -> Result<(), RenderError> {
        self.element(
            "line",
            &[
                ("x1", fmt_num(from.x)),
                ("y1", fmt_num(from.y)),
                ("x2", fmt_num(to.x)),
                ("y2", fmt_num(to.y)),
                (
                    "style",
                    format!("stroke-width:{}; stroke:{}", fmt_num(width), defaults::STROKE),
                ),
            ],
        )
    }

    /// Capsule spanning radii `[inner, inner + height]` along the local y
    /// axis, rotated into place by `rotation` degrees
    pub fn capsule(&mut self, inner: f64, height: f64, width: f64, rotation: f64) -> Result<(), RenderError> {
        let half = fmt_num(width / 2.0);
        self.element(
            "rect",
            &[
                ("rx", half.clone()),
                ("y", fmt_num(inner)),
                ("x", fmt_num(-width / 2.0)),
                ("ry", half),
                ("transform", format!("rotate({})", fmt_num(rotation))),
                ("height", fmt_num(height)),
                ("width", fmt_num(width)),
            ],
        )
    }

    /// Filled dot
    pub fn dot(&mut self, center: DVec2, radius: f64) -> Result<(), RenderError> {
        self.element(
            "circle",
            &[
                ("cx", fmt_num(center.x)),
                ("cy", fmt_num(center.y)),
                ("r", fmt_num(radius)),
                ("style", format!("stroke-width: 0; fill: {};", defaults::DOT_FILL)),
            ],
        )
    }

    /// Filled polygon through `points`
    pub fn polygon(&mut self, points: &[DVec2]) -> Result<(), RenderError> {
        let points: Vec<String> = points
            .iter()
            .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
            .collect();
        let mut elem = BytesStart::new("polygon");
        elem.push_attribute(("points", points.join(" ").as_str()));
        self.writer.write_event(Event::Empty(elem)).map_err(markup_error)
    }

    /// Label centred on `at`, rotated by `rotation` degrees about its own
    /// centre
    pub fn label(&mut self, at: DVec2, rotation: f64, size: f64, font: &str, content: &str) -> Result<(), RenderError> {
        self.start(
            "g",
            &[("transform", format!("translate({}, {})", fmt_num(at.x), fmt_num(at.y)))],
        )?;
        self.start(
            "text",
            &[
                ("transform", format!("rotate({})", fmt_num(rotation))),
                ("class", defaults::TEXT_CLASS.to_string()),
                ("fill", defaults::TEXT_FILL.to_string()),
                ("fill-opacity", fmt_num(defaults::TEXT_OPACITY)),
                ("font-size", fmt_num(size)),
                ("font-weight", defaults::TEXT_WEIGHT.to_string()),
                ("font-family", font.to_string()),
                ("alignment-baseline", "middle".to_string()),
                ("text-anchor", "middle".to_string()),
            ],
        )?;
        self.text(content)?;
        self.end("text")?;
        self.end("g")
    }

    /// Unfilled circle around the origin
    pub fn circular_border(&mut self, radius: f64, stroke_width: f64) -> Result<(), RenderError> {
        self.element(
            "circle",
            &[
                ("cx", "0".to_string()),
                ("cy", "0".to_string()),
                ("r", fmt_num(radius)),
                (
                    "style",
                    format!(
                        "stroke-width: {}; stroke: {}; fill: {};",
                        fmt_num(stroke_width),
                        defaults::BORDER_STROKE,
                        defaults::BORDER_FILL
                    ),
                ),
            ],
        )
    }

    pub fn finish(self) -> Result<String, RenderError> {
        String::from_utf8(self.writer.into_inner()).map_err(markup_error)
    }
}

/// Wrap a rendered fragment in a minimal HTML page holding a square SVG
/// canvas, with the dial centred and scaled to fit.
pub fn document(fragment: &str) -> Result<String, RenderError> {
    let size = format!("{}px", defaults::DOCUMENT_SIZE);
    let half = defaults::DOCUMENT_SIZE / 2;

    let mut out = SvgWriter::new();
    out.start("html", &[])?;
    out.raw("\n")?;
    out.start("svg", &[("height", size.clone()), ("width", size)])?;
    out.raw("\n")?;
    out.start(
        "g",
        &[(
            "transform",
            format!("translate({half}, {half}) scale({})", defaults::DOCUMENT_SCALE),
        )],
    )?;
    out.raw("\n")?;
    out.raw(fragment)?;
    out.raw("\n")?;
    out.end("g")?;
    out.raw("\n")?;
    out.end("svg")?;
    out.raw("\n")?;
    out.end("html")?;
    out.finish()
}
