//! Error types with rich diagnostics using miette
//!
//! Parse errors carry source spans so the caller can print an annotated
//! report. Evaluation and render errors name the offending expression or
//! element instead, since they occur after the literal has been consumed.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Errors raised while reading the description literal
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("malformed description: {message}")]
    #[diagnostic(code(dialmark::parse::malformed_description))]
    MalformedDescription {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unknown shape kind: {name}")]
    #[diagnostic(
        code(dialmark::parse::unknown_shape_kind),
        help("expected one of: line, rounded_line, two_lines, circle, triangle, number")
    )]
    UnknownShapeKind {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a shape kind")]
        span: SourceSpan,
    },

    #[error("invalid position specification")]
    #[diagnostic(
        code(dialmark::parse::invalid_position_spec),
        help("use a count `N`, a range `[N, end]` or `[N, start, end]`, or a set `{{a, b, ...}}`")
    )]
    InvalidPositionSpec {
        #[source_code]
        src: NamedSource<String>,
        #[label("not a position specification")]
        span: SourceSpan,
    },
}

// ============================================================================
// Evaluation Errors
// ============================================================================

/// Errors raised by the restricted arithmetic evaluator
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("unsupported expression `{expr}`: {reason}")]
    #[diagnostic(
        code(dialmark::eval::unsupported_expression),
        help("expressions may only use numbers, parentheses, + - * / ^ ** and xor")
    )]
    UnsupportedExpression { expr: String, reason: String },

    #[error("division by zero in `{expr}`")]
    #[diagnostic(code(dialmark::eval::division_by_zero))]
    DivisionByZero { expr: String },

    #[error("`{expr}` does not evaluate to a finite real number")]
    #[diagnostic(code(dialmark::eval::non_finite))]
    NonFinite { expr: String },

    #[error("xor needs integer operands in `{expr}`")]
    #[diagnostic(code(dialmark::eval::xor_operands))]
    XorOperands { expr: String },
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors raised while laying out and drawing the resolved dial
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid position specification: {message}")]
    #[diagnostic(code(dialmark::render::invalid_position_spec))]
    InvalidPositionSpec { message: String },

    #[error("invalid arguments for {kind}: {message}")]
    #[diagnostic(code(dialmark::render::invalid_shape_arguments))]
    InvalidShapeArguments { kind: &'static str, message: String },

    #[error("ring {ring} has non-positive radius {radius}")]
    #[diagnostic(
        code(dialmark::render::non_positive_radius),
        help("the sum of ring offsets must stay below the outer radius of 100")
    )]
    NonPositiveRadius { ring: usize, radius: f64 },

    #[error("ring {ring} has negative offset {offset}")]
    #[diagnostic(
        code(dialmark::render::negative_offset),
        help("rings are declared from the outside in; offsets must not be negative")
    )]
    NegativeOffset { ring: usize, offset: f64 },

    #[error("ring offset is not numeric: `{value}`")]
    #[diagnostic(code(dialmark::render::symbolic_offset))]
    SymbolicOffset { value: String },

    #[error("failed to write markup: {message}")]
    #[diagnostic(code(dialmark::render::markup))]
    Markup { message: String },
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Any failure of the description-to-markup pipeline
#[derive(Error, Diagnostic, Debug)]
pub enum DialError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),
}
