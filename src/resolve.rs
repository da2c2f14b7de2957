//! Parameter resolution
//!
//! Every expression-bearing field goes through two phases: dictionary
//! symbols are substituted textually, then the result is classified. Text
//! that is fully arithmetic is evaluated; text that still names something
//! (a keyword, a font, an unknown symbol) is kept as `Resolved::Symbolic`.

use crate::ast::{Dial, Dictionary, Resolved, Term};
use crate::errors::EvalError;
use crate::eval::{evaluate, parse_expr};
use crate::log::trace;

/// Resolve every expression in the dial against its dictionary
pub fn resolve(dial: Dial<Term>) -> Result<Dial<Resolved>, EvalError> {
    let dictionary = dial.dictionary.clone();
    let resolver = Resolver::new(&dictionary);
    dial.try_map(|term| resolver.resolve(term))
}

/// Substitutes dictionary values into expression text
#[derive(Debug)]
pub struct Resolver {
    /// (key, replacement) pairs, longest key first
    substitutions: Vec<(String, String)>,
}

impl Resolver {
    pub fn new(dictionary: &Dictionary) -> Self {
        let mut substitutions: Vec<(String, String)> = dictionary
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.to_string(), format!("{}", value)))
            .collect();
        // Longer names first, so `hour_len` is not clobbered by `hour`.
        // The sort is stable: equal lengths keep declaration order.
        substitutions.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { substitutions }
    }

    pub fn resolve(&self, term: Term) -> Result<Resolved, EvalError> {
        match term {
            Term::Number(n) => Ok(Resolved::Numeric(n)),
            Term::Text(text) => self.resolve_text(&text),
        }
    }

    pub fn resolve_text(&self, text: &str) -> Result<Resolved, EvalError> {
        let substituted = self.substitute(text);
        match classify(&substituted) {
            Classification::Numeric => {
                let value = evaluate(&substituted)?;
                trace!(%text, %substituted, value, "resolved expression");
                Ok(Resolved::Numeric(value))
            }
            Classification::Symbolic => {
                trace!(%text, %substituted, "kept symbolic argument");
                Ok(Resolved::Symbolic(text.to_string()))
            }
        }
    }

    /// Literal find-and-replace of every dictionary key
    pub fn substitute(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (key, value) in &self.substitutions {
            if out.contains(key.as_str()) {
                out = out.replace(key.as_str(), value);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Only numbers, operators and parentheses remain
    Numeric,
    /// Some word remains that the arithmetic grammar cannot read
    Symbolic,
}

/// Decide whether substituted text is arithmetic or still names something.
///
/// Text without letters is always numeric, so malformed arithmetic reaches
/// the evaluator and is reported. Text with letters is numeric only when
/// every word is the `xor` operator or an exponent marker (as in `1e-3`)
/// and the whole text reads as an arithmetic expression.
pub fn classify(text: &str) -> Classification {
    if !text.chars().any(char::is_alphabetic) {
        return Classification::Numeric;
    }
    if letters_are_arithmetic(text) && parse_expr(text).is_ok() {
        Classification::Numeric
    } else {
        Classification::Symbolic
    }
}

fn letters_are_arithmetic(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_alphabetic() {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i].is_alphabetic() {
            i += 1;
        }
        let word: String = chars[start..i].iter().collect();
        let allowed = word == "xor" || is_exponent(&chars, start, i);
        if !allowed {
            return false;
        }
    }
    true
}

/// `chars[start..end]` is a lone `e`/`E` between a mantissa and exponent digits
fn is_exponent(chars: &[char], start: usize, end: usize) -> bool {
    if end - start != 1 || !matches!(chars[start], 'e' | 'E') {
        return false;
    }
    let after_mantissa = start > 0 && (chars[start - 1].is_ascii_digit() || chars[start - 1] == '.');
    let mut j = end;
    if j < chars.len() && matches!(chars[j], '+' | '-') {
        j += 1;
    }
    let before_digits = j < chars.len() && chars[j].is_ascii_digit();
    after_mantissa && before_digits
}
