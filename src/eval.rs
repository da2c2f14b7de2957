//! Safe arithmetic evaluator
//!
//! Expressions are parsed with a closed grammar (see `arith.pest`) into the
//! tagged `Expr` tree and interpreted by structural recursion. Names,
//! calls, attribute access and string literals have no grammar rule, so
//! they can never reach the interpreter.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::errors::EvalError;

#[derive(Parser)]
#[grammar = "arith.pest"]
pub struct ArithParser;

/// Parse and evaluate an arithmetic expression.
pub fn evaluate(text: &str) -> Result<f64, EvalError> {
    let expr = parse_expr(text)?;
    eval_expr(&expr, text)
}

/// Parse an arithmetic expression into its tree form.
pub fn parse_expr(text: &str) -> Result<Expr, EvalError> {
    let mut pairs = ArithParser::parse(Rule::arith, text).map_err(|e| {
        EvalError::UnsupportedExpression {
            expr: text.to_string(),
            reason: e.variant.message().into_owned(),
        }
    })?;
    let arith = next_pair(&mut pairs.next().into_iter(), text)?;
    let mut inner = arith.into_inner();
    build_xor(next_pair(&mut inner, text)?, text)
}

/// Interpret an expression tree. `source` is only used in error messages.
pub fn eval_expr(expr: &Expr, source: &str) -> Result<f64, EvalError> {
    let value = match expr {
        Expr::Literal(n) => *n,
        Expr::UnaryOp { op: UnaryOp::Neg, operand } => -eval_expr(operand, source)?,
        Expr::BinaryOp { op, left, right } => {
            let l = eval_expr(left, source)?;
            let r = eval_expr(right, source)?;
            apply_binary(*op, l, r, source)?
        }
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite {
            expr: source.to_string(),
        })
    }
}

fn apply_binary(op: BinaryOp, l: f64, r: f64, source: &str) -> Result<f64, EvalError> {
    let division_by_zero = || EvalError::DivisionByZero {
        expr: source.to_string(),
    };
    Ok(match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => {
            if r == 0.0 {
                return Err(division_by_zero());
            }
            l / r
        }
        BinaryOp::Pow => {
            if l == 0.0 && r < 0.0 {
                return Err(division_by_zero());
            }
            l.powf(r)
        }
        BinaryOp::Xor => {
            let (Some(a), Some(b)) = (as_integer(l), as_integer(r)) else {
                return Err(EvalError::XorOperands {
                    expr: source.to_string(),
                });
            };
            (a ^ b) as f64
        }
    })
}

fn as_integer(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

// ============================================================================
// Tree construction
// ============================================================================

fn next_pair<'a>(
    pairs: &mut impl Iterator<Item = Pair<'a, Rule>>,
    text: &str,
) -> Result<Pair<'a, Rule>, EvalError> {
    pairs.next().ok_or_else(|| EvalError::UnsupportedExpression {
        expr: text.to_string(),
        reason: "incomplete expression".to_string(),
    })
}

/// Fold `operand (op operand)*` into a left-associative chain
fn fold_left(
    pair: Pair<Rule>,
    text: &str,
    operand: fn(Pair<Rule>, &str) -> Result<Expr, EvalError>,
) -> Result<Expr, EvalError> {
    let mut inner = pair.into_inner();
    let mut result = operand(next_pair(&mut inner, text)?, text)?;

    while let Some(op_pair) = inner.next() {
        let op = match op_pair.as_str() {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "xor" => BinaryOp::Xor,
            other => {
                return Err(EvalError::UnsupportedExpression {
                    expr: text.to_string(),
                    reason: format!("unexpected operator `{}`", other),
                });
            }
        };
        let rhs = operand(next_pair(&mut inner, text)?, text)?;
        result = Expr::BinaryOp {
            op,
            left: Box::new(result),
            right: Box::new(rhs),
        };
    }

    Ok(result)
}

fn build_xor(pair: Pair<Rule>, text: &str) -> Result<Expr, EvalError> {
    fold_left(pair, text, build_sum)
}

fn build_sum(pair: Pair<Rule>, text: &str) -> Result<Expr, EvalError> {
    fold_left(pair, text, build_product)
}

fn build_product(pair: Pair<Rule>, text: &str) -> Result<Expr, EvalError> {
    fold_left(pair, text, build_unary)
}

fn build_unary(pair: Pair<Rule>, text: &str) -> Result<Expr, EvalError> {
    let mut inner = pair.into_inner();
    let first = next_pair(&mut inner, text)?;
    match first.as_rule() {
        Rule::neg_op => Ok(Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand: Box::new(build_unary(next_pair(&mut inner, text)?, text)?),
        }),
        _ => build_power(first, text),
    }
}

fn build_power(pair: Pair<Rule>, text: &str) -> Result<Expr, EvalError> {
    let mut inner = pair.into_inner();
    let atom = next_pair(&mut inner, text)?;
    let base = match atom.as_rule() {
        Rule::number => parse_number(atom.as_str(), text)?,
        Rule::xor_expr => build_xor(atom, text)?,
        rule => {
            return Err(EvalError::UnsupportedExpression {
                expr: text.to_string(),
                reason: format!("unexpected {:?}", rule),
            });
        }
    };

    // `pow_op` is followed by the exponent, itself a unary expression
    if inner.next().is_some() {
        let exponent = build_unary(next_pair(&mut inner, text)?, text)?;
        return Ok(Expr::BinaryOp {
            op: BinaryOp::Pow,
            left: Box::new(base),
            right: Box::new(exponent),
        });
    }
    Ok(base)
}

fn parse_number(digits: &str, text: &str) -> Result<Expr, EvalError> {
    digits
        .parse::<f64>()
        .map(Expr::Literal)
        .map_err(|e| EvalError::UnsupportedExpression {
            expr: text.to_string(),
            reason: format!("invalid number `{}`: {}", digits, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> f64 {
        evaluate(text).unwrap_or_else(|e| panic!("failed to evaluate {:?}: {}", text, e))
    }

    #[test]
    fn literals() {
        assert_eq!(eval("42"), 42.0);
        assert_eq!(eval("2.5"), 2.5);
        assert_eq!(eval(".5"), 0.5);
        assert_eq!(eval("1e3"), 1000.0);
        assert_eq!(eval("1.5E-1"), 0.15);
    }

    #[test]
    fn standard_precedence() {
        assert_eq!(eval("2*5+1"), 11.0);
        assert_eq!(eval("1+2*3"), 7.0);
        assert_eq!(eval("(1+2)*3"), 9.0);
        assert_eq!(eval("10-4-3"), 3.0);
        assert_eq!(eval("24/4/2"), 3.0);
        assert_eq!(eval("7/2"), 3.5);
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(eval("2^3^2"), 512.0);
        assert_eq!(eval("2**3**2"), 512.0);
        assert_eq!(eval("(2^3)^2"), 64.0);
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(eval("-2^2"), -4.0);
        assert_eq!(eval("(-2)^2"), 4.0);
        assert_eq!(eval("2^-1"), 0.5);
        assert_eq!(eval("--3"), 3.0);
        assert_eq!(eval("2*-3"), -6.0);
    }

    #[test]
    fn xor_has_lowest_precedence() {
        assert_eq!(eval("5 xor 3"), 6.0);
        assert_eq!(eval("1+4 xor 1"), 4.0);
    }

    #[test]
    fn xor_rejects_fractions() {
        assert!(matches!(
            evaluate("1.5 xor 1"),
            Err(EvalError::XorOperands { .. })
        ));
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(eval("  1 +\t2 "), 3.0);
    }

    #[test]
    fn builds_tagged_tree() {
        let expr = parse_expr("-1+2").unwrap();
        assert_eq!(
            expr,
            Expr::BinaryOp {
                op: BinaryOp::Add,
                left: Box::new(Expr::UnaryOp {
                    op: UnaryOp::Neg,
                    operand: Box::new(Expr::Literal(1.0)),
                }),
                right: Box::new(Expr::Literal(2.0)),
            }
        );
    }

    #[test]
    fn rejects_names_calls_and_strings() {
        for text in [
            "x",
            "abs(3)",
            "__import__('os')",
            "a.b",
            "'5'",
            "\"5\"",
            "[1]",
            "1 if 1 else 2",
            "+5",
            "2 % 3",
            "",
            "1 +",
            "()",
        ] {
            assert!(
                matches!(
                    evaluate(text),
                    Err(EvalError::UnsupportedExpression { .. })
                ),
                "{:?} should be rejected",
                text
            );
        }
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert!(matches!(
            evaluate("1/0"),
            Err(EvalError::DivisionByZero { .. })
        ));
        assert!(matches!(
            evaluate("0^-1"),
            Err(EvalError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn non_real_results_are_reported() {
        assert!(matches!(
            evaluate("(-8)^(1/3)"),
            Err(EvalError::NonFinite { .. })
        ));
        assert!(matches!(
            evaluate("10^400"),
            Err(EvalError::NonFinite { .. })
        ));
    }
}
