//! Parse description text into the typed dial model
//!
//! Two passes: pest pairs become a span-carrying `Literal` tree, then the
//! literal is checked against the `(dictionary, rings)` shape and converted
//! into a `Dial<Term>`.

use miette::SourceSpan;
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::ast::*;
use crate::errors::{ParseError, SourceContext};
use crate::log::debug;

#[derive(Parser)]
#[grammar = "description.pest"]
pub struct DescriptionParser;

/// Parse description text into an unresolved dial
pub fn parse(source: &str) -> Result<Dial<Term>, ParseError> {
    parse_named(&SourceContext::new("<input>", source))
}

/// Parse with a named source, so diagnostics point at the right file
pub fn parse_named(ctx: &SourceContext) -> Result<Dial<Term>, ParseError> {
    let literal = parse_literal(ctx)?;
    let dial = Converter { ctx }.dial(&literal)?;
    debug!(
        symbols = dial.dictionary.len(),
        rings = dial.rings.len(),
        "parsed dial description"
    );
    Ok(dial)
}

/// Parse description text into its literal tree without interpreting it
pub fn parse_literal(ctx: &SourceContext) -> Result<Literal, ParseError> {
    let pairs = DescriptionParser::parse(Rule::description, &ctx.source).map_err(|e| {
        let span: SourceSpan = match e.location {
            InputLocation::Pos(pos) => (pos, 0).into(),
            InputLocation::Span((start, end)) => (start, end - start).into(),
        };
        ParseError::MalformedDescription {
            message: format!("not a data literal ({})", e.variant.message()),
            src: ctx.named_source(),
            span,
        }
    })?;

    for pair in pairs {
        if pair.as_rule() == Rule::description {
            for inner in pair.into_inner() {
                if inner.as_rule() != Rule::EOI {
                    return build_literal(inner, ctx);
                }
            }
        }
    }

    Err(ParseError::MalformedDescription {
        message: "empty description".to_string(),
        src: ctx.named_source(),
        span: (0, ctx.source.len()).into(),
    })
}

fn span_of(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

fn build_literal(pair: Pair<Rule>, ctx: &SourceContext) -> Result<Literal, ParseError> {
    let span = span_of(&pair);
    let kind = match pair.as_rule() {
        Rule::number => {
            let text = pair.as_str();
            let n = text.parse::<f64>().map_err(|e| ParseError::MalformedDescription {
                message: format!("invalid number `{}`: {}", text, e),
                src: ctx.named_source(),
                span,
            })?;
            LiteralKind::Number(n)
        }
        Rule::string => {
            let raw = pair
                .into_inner()
                .next()
                .map(|inner| inner.as_str())
                .unwrap_or_default();
            LiteralKind::Str(unescape(raw))
        }
        Rule::list => LiteralKind::List(build_items(pair, ctx)?),
        Rule::tuple => LiteralKind::Tuple(build_items(pair, ctx)?),
        Rule::set => LiteralKind::Set(build_items(pair, ctx)?),
        Rule::dict => {
            let mut entries = Vec::new();
            for entry in pair.into_inner() {
                let mut kv = entry.into_inner();
                match (kv.next(), kv.next()) {
                    (Some(k), Some(v)) => {
                        entries.push((build_literal(k, ctx)?, build_literal(v, ctx)?))
                    }
                    _ => {
                        return Err(ParseError::MalformedDescription {
                            message: "incomplete dictionary entry".to_string(),
                            src: ctx.named_source(),
                            span,
                        });
                    }
                }
            }
            LiteralKind::Dict(entries)
        }
        rule => {
            return Err(ParseError::MalformedDescription {
                message: format!("unexpected {:?}", rule),
                src: ctx.named_source(),
                span,
            });
        }
    };
    Ok(Literal { kind, span })
}

fn build_items(pair: Pair<Rule>, ctx: &SourceContext) -> Result<Vec<Literal>, ParseError> {
    pair.into_inner()
        .map(|inner| build_literal(inner, ctx))
        .collect()
}

/// Resolve backslash escapes in a quoted string body
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) if matches!(other, '\\' | '\'' | '"') => out.push(other),
            // Unknown escapes keep their backslash
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

// ============================================================================
// Literal -> Dial
// ============================================================================

struct Converter<'a> {
    ctx: &'a SourceContext,
}

impl Converter<'_> {
    fn malformed(&self, message: impl Into<String>, span: SourceSpan) -> ParseError {
        ParseError::MalformedDescription {
            message: message.into(),
            src: self.ctx.named_source(),
            span,
        }
    }

    fn dial(&self, literal: &Literal) -> Result<Dial<Term>, ParseError> {
        let pair = match literal.as_sequence() {
            Some(items) if items.len() == 2 => items,
            _ => {
                return Err(self.malformed(
                    format!(
                        "expected a (dictionary, rings) pair, found a {}",
                        literal.type_name()
                    ),
                    literal.span,
                ));
            }
        };

        let dictionary = self.dictionary(&pair[0])?;
        let rings = match pair[1].as_sequence() {
            Some(rings) => rings
                .iter()
                .map(|ring| self.ring(ring))
                .collect::<Result<Vec<_>, _>>()?,
            None => {
                return Err(self.malformed(
                    format!("expected a list of rings, found a {}", pair[1].type_name()),
                    pair[1].span,
                ));
            }
        };

        Ok(Dial { dictionary, rings })
    }

    fn dictionary(&self, literal: &Literal) -> Result<Dictionary, ParseError> {
        let LiteralKind::Dict(entries) = &literal.kind else {
            return Err(self.malformed(
                format!("expected a dictionary, found a {}", literal.type_name()),
                literal.span,
            ));
        };

        let mut dict = Dictionary::default();
        for (key, value) in entries {
            let LiteralKind::Str(name) = &key.kind else {
                return Err(self.malformed("dictionary keys must be strings", key.span));
            };
            let LiteralKind::Number(n) = value.kind else {
                return Err(self.malformed(
                    format!("value of `{}` must be a number", name),
                    value.span,
                ));
            };
            dict.insert(name.clone(), n);
        }
        Ok(dict)
    }

    fn ring(&self, literal: &Literal) -> Result<Ring<Term>, ParseError> {
        let Some((offset, rest)) = literal.as_sequence().and_then(|items| items.split_first())
        else {
            return Err(self.malformed(
                "a ring is a list starting with its thickness offset",
                literal.span,
            ));
        };

        let offset = self.term(offset)?;
        let items = rest
            .iter()
            .map(|item| self.ring_item(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Ring { offset, items })
    }

    fn ring_item(&self, literal: &Literal) -> Result<RingItem<Term>, ParseError> {
        let Some(items) = literal.as_sequence() else {
            return Err(self.malformed(
                format!("expected a ring element list, found a {}", literal.type_name()),
                literal.span,
            ));
        };

        match items {
            [position, shape, args] => Ok(RingItem::Element(Element {
                position: self.position(position)?,
                kind: self.shape_kind(shape)?,
                args: self.args(args)?,
            })),
            // Fewer than three entries: `[label, [stroke_width]]` draws a border
            [_, width] => match width.as_sequence() {
                Some([stroke_width, ..]) => Ok(RingItem::Border(Border {
                    stroke_width: self.term(stroke_width)?,
                })),
                _ => Err(self.malformed(
                    "a border is written `[label, [stroke_width]]`",
                    width.span,
                )),
            },
            _ => Err(self.malformed(
                format!(
                    "expected `[position, shape, args]` or `[label, [stroke_width]]`, found {} entries",
                    items.len()
                ),
                literal.span,
            )),
        }
    }

    fn position(&self, literal: &Literal) -> Result<PositionSpec<Term>, ParseError> {
        match &literal.kind {
            LiteralKind::Set(values) => Ok(PositionSpec::Set(
                values
                    .iter()
                    .map(|value| self.term(value))
                    .collect::<Result<_, _>>()?,
            )),
            LiteralKind::Number(_) | LiteralKind::Str(_) => {
                Ok(PositionSpec::Count(self.term(literal)?))
            }
            LiteralKind::List(values) => match values.as_slice() {
                [count, end] => Ok(PositionSpec::Range {
                    count: self.term(count)?,
                    start: None,
                    end: self.term(end)?,
                }),
                [count, start, end] => Ok(PositionSpec::Range {
                    count: self.term(count)?,
                    start: Some(self.term(start)?),
                    end: self.term(end)?,
                }),
                _ => Err(self.invalid_position(literal)),
            },
            LiteralKind::Tuple(_) | LiteralKind::Dict(_) => Err(self.invalid_position(literal)),
        }
    }

    fn invalid_position(&self, literal: &Literal) -> ParseError {
        ParseError::InvalidPositionSpec {
            src: self.ctx.named_source(),
            span: literal.span,
        }
    }

    fn shape_kind(&self, literal: &Literal) -> Result<ShapeKind, ParseError> {
        let name = match &literal.kind {
            LiteralKind::Str(name) => name.clone(),
            _ => format!("<{}>", literal.type_name()),
        };
        ShapeKind::from_name(&name).ok_or_else(|| ParseError::UnknownShapeKind {
            name,
            src: self.ctx.named_source(),
            span: literal.span,
        })
    }

    fn args(&self, literal: &Literal) -> Result<Vec<Term>, ParseError> {
        let Some(values) = literal.as_sequence() else {
            return Err(self.malformed(
                format!("shape arguments must be a list, found a {}", literal.type_name()),
                literal.span,
            ));
        };
        values.iter().map(|value| self.term(value)).collect()
    }

    fn term(&self, literal: &Literal) -> Result<Term, ParseError> {
        match &literal.kind {
            LiteralKind::Number(n) => Ok(Term::Number(*n)),
            LiteralKind::Str(s) => Ok(Term::Text(s.clone())),
            _ => Err(self.malformed(
                format!("expected a number or expression, found a {}", literal.type_name()),
                literal.span,
            )),
        }
    }
}
