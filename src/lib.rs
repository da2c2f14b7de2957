//! Render watch-face style radial dials to SVG.
//!
//! A dial is described by a literal of the form
//! `(dictionary, [[offset, item, ...], ...])`: named numeric parameters
//! followed by concentric rings, outermost first. Ring items place shapes
//! (ticks, dots, triangles, numerals) at angular positions, or draw a
//! circular border.
//!
//! ```
//! let svg = dialmark::render("({'d': 10}, [[0, [4, 'circle', ['d']]]])").unwrap();
//! assert_eq!(svg.matches("<circle").count(), 4);
//! ```

pub mod ast;
pub mod errors;
pub mod eval;
pub mod log;
pub mod parse;
pub mod render;
pub mod resolve;
pub mod types;

pub use errors::{DialError, EvalError, ParseError, RenderError, SourceContext};
pub use render::RenderOptions;
pub use render::svg::document;

/// Render a dial description to an SVG fragment with default options.
pub fn render(source: &str) -> Result<String, DialError> {
    render_with(source, &RenderOptions::default())
}

/// Render a dial description to an SVG fragment.
///
/// The fragment is centred on the origin with the outer boundary at radius
/// 100; wrap it with [`document`] for a standalone page.
pub fn render_with(source: &str, options: &RenderOptions) -> Result<String, DialError> {
    render_named(&SourceContext::new("<input>", source), options)
}

/// Like [`render_with`], with parse diagnostics pointing at `ctx.name`
/// (usually the file the description was read from).
pub fn render_named(ctx: &SourceContext, options: &RenderOptions) -> Result<String, DialError> {
    let dial = parse::parse_named(ctx)?;
    let dial = resolve::resolve(dial)?;
    Ok(render::render_dial(&dial, options)?)
}

/// Render a dial description to an SVG fragment.
///
/// Returns the fragment on success, or a report with diagnostics.
pub fn dial(source: &str) -> Result<String, miette::Report> {
    render(source).map_err(miette::Report::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dial_renders_nothing() {
        assert_eq!(render("({}, [])").unwrap(), "");
    }

    #[test]
    fn errors_surface_by_stage() {
        assert!(matches!(render("({}, [[0, [4, 'spiral', [1]]]])"), Err(DialError::Parse(_))));
        assert!(matches!(render("({}, [[0, [4, 'line', ['1/0', 1]]]])"), Err(DialError::Eval(_))));
        assert!(matches!(render("({}, [[150]])"), Err(DialError::Render(_))));
    }

    #[test]
    fn named_source_reaches_diagnostics() {
        let ctx = SourceContext::new("dials/bad.dial", "({}, [[0, [4, 'spiral', [1]]]])");
        let err = render_named(&ctx, &RenderOptions::default()).unwrap_err();
        let DialError::Parse(ParseError::UnknownShapeKind { src, .. }) = err else {
            panic!("expected an unknown shape kind");
        };
        assert_eq!(src.name(), "dials/bad.dial");

        let ctx = SourceContext::new("dials/ok.dial", "({}, [[0, [4, 'circle', [2]]]])");
        assert_eq!(
            render_named(&ctx, &RenderOptions::default()).unwrap(),
            render(&ctx.source).unwrap()
        );
    }

    #[test]
    fn dial_reports_diagnostics() {
        let report = dial("({}, [[0, [4, 'spiral', [1]]]])").unwrap_err();
        assert!(report.to_string().contains("spiral"));
    }
}
