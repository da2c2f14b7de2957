//! Syntax trees for dialmark
//!
//! Three layers live here:
//! - `Literal`: the data literal as written (numbers, strings, lists, sets,
//!   tuples, dicts), with source spans for diagnostics.
//! - `Expr`: the restricted arithmetic tree the evaluator interprets.
//! - `Dial<V>`: the typed description. `V` is `Term` straight out of the
//!   parser and `Resolved` once every expression has been resolved.

use std::fmt;

use miette::SourceSpan;

// ============================================================================
// Literal tree
// ============================================================================

/// A literal value with the span it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Number(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Human-readable name of the literal's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            LiteralKind::Number(_) => "number",
            LiteralKind::Str(_) => "string",
            LiteralKind::List(_) => "list",
            LiteralKind::Tuple(_) => "tuple",
            LiteralKind::Set(_) => "set",
            LiteralKind::Dict(_) => "dict",
        }
    }

    /// Items of a list or tuple (the two are interchangeable as sequences)
    pub fn as_sequence(&self) -> Option<&[Literal]> {
        match &self.kind {
            LiteralKind::List(items) | LiteralKind::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

// ============================================================================
// Arithmetic expressions
// ============================================================================

/// Binary operators accepted by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Xor,
}

/// Unary operators accepted by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

/// Arithmetic expression tree. The enumeration is closed: anything the
/// grammar cannot express as one of these nodes is rejected before
/// evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
}

// ============================================================================
// Dial model
// ============================================================================

/// An expression-bearing field before resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A numeric literal, passed through without string processing
    Number(f64),
    /// Expression text, possibly naming dictionary symbols
    Text(String),
}

/// An expression-bearing field after resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Numeric(f64),
    /// Text that still names something after substitution: a keyword such
    /// as `roman` or `rotating`, or a font name
    Symbolic(String),
}

impl Resolved {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Resolved::Numeric(n) => Some(*n),
            Resolved::Symbolic(_) => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Resolved::Numeric(_) => None,
            Resolved::Symbolic(s) => Some(s),
        }
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Numeric(n) => write!(f, "{}", n),
            Resolved::Symbolic(s) => f.write_str(s),
        }
    }
}

/// Symbol table of the description. Keeps declaration order; read-only
/// once parsing completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: Vec<(String, f64)>,
}

impl Dictionary {
    pub fn new(entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        let mut dict = Self::default();
        for (key, value) in entries {
            dict.insert(key, value);
        }
        dict
    }

    /// Insert a symbol; a repeated key keeps its first position and takes
    /// the new value, like a dict literal
    pub fn insert(&mut self, key: String, value: f64) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Complete dial description
#[derive(Debug, Clone, PartialEq)]
pub struct Dial<V> {
    pub dictionary: Dictionary,
    /// Outermost ring first
    pub rings: Vec<Ring<V>>,
}

/// A concentric band; its offset is measured inward from the previous ring
#[derive(Debug, Clone, PartialEq)]
pub struct Ring<V> {
    pub offset: V,
    pub items: Vec<RingItem<V>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RingItem<V> {
    Element(Element<V>),
    Border(Border<V>),
}

/// A circular stroke drawn at the ring's radius
#[derive(Debug, Clone, PartialEq)]
pub struct Border<V> {
    pub stroke_width: V,
}

/// Positioned markings of one shape kind
#[derive(Debug, Clone, PartialEq)]
pub struct Element<V> {
    pub position: PositionSpec<V>,
    pub kind: ShapeKind,
    pub args: Vec<V>,
}

/// Compact position specification, expanded into concrete turns at render
/// time
#[derive(Debug, Clone, PartialEq)]
pub enum PositionSpec<V> {
    /// `{a, b, ...}`: explicit turns
    Set(Vec<V>),
    /// `N`: N equally spaced turns starting at 0
    Count(V),
    /// `[N, end]` or `[N, start, end]`
    Range { count: V, start: Option<V>, end: V },
}

/// Shape kinds a dial element can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    RoundedLine,
    TwoLines,
    Circle,
    Triangle,
    Number,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Line,
        ShapeKind::RoundedLine,
        ShapeKind::TwoLines,
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::Number,
    ];

    pub fn from_name(name: &str) -> Option<ShapeKind> {
        ShapeKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::RoundedLine => "rounded_line",
            ShapeKind::TwoLines => "two_lines",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Number => "number",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<V> Dial<V> {
    /// Rebuild the dial with every expression-bearing field mapped through `f`
    pub fn try_map<W, E>(self, mut f: impl FnMut(V) -> Result<W, E>) -> Result<Dial<W>, E> {
        let rings = self
            .rings
            .into_iter()
            .map(|ring| ring.try_map(&mut f))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Dial {
            dictionary: self.dictionary,
            rings,
        })
    }
}

impl<V> Ring<V> {
    fn try_map<W, E>(self, f: &mut impl FnMut(V) -> Result<W, E>) -> Result<Ring<W>, E> {
        let offset = f(self.offset)?;
        let mut items = Vec::with_capacity(self.items.len());
        for item in self.items {
            items.push(match item {
                RingItem::Border(border) => RingItem::Border(Border {
                    stroke_width: f(border.stroke_width)?,
                }),
                RingItem::Element(element) => RingItem::Element(Element {
                    position: element.position.try_map(f)?,
                    kind: element.kind,
                    args: element.args.into_iter().map(&mut *f).collect::<Result<_, E>>()?,
                }),
            });
        }
        Ok(Ring { offset, items })
    }
}

impl<V> PositionSpec<V> {
    fn try_map<W, E>(self, f: &mut impl FnMut(V) -> Result<W, E>) -> Result<PositionSpec<W>, E> {
        Ok(match self {
            PositionSpec::Set(values) => {
                PositionSpec::Set(values.into_iter().map(&mut *f).collect::<Result<_, E>>()?)
            }
            PositionSpec::Count(n) => PositionSpec::Count(f(n)?),
            PositionSpec::Range { count, start, end } => PositionSpec::Range {
                count: f(count)?,
                start: start.map(&mut *f).transpose()?,
                end: f(end)?,
            },
        })
    }
}
