//! Angular position expansion
//!
//! Turns a compact position specification into concrete turns:
//! - `{a, b, ...}`: the listed turns, wrapped onto [0, 1), sorted, deduplicated
//! - `N`: `i / N` for `i` in `0..N`
//! - `[N, end]` / `[N, start, end]`: the `i / N` with `start <= i / N <= end`

use crate::ast::{PositionSpec, Resolved};
use crate::errors::RenderError;
use crate::types::Turn;

/// Upper bound on positions generated by a single count. Larger counts are
/// rejected rather than drawn.
const MAX_POSITIONS: u64 = 100_000;

pub fn expand(spec: &PositionSpec<Resolved>) -> Result<Vec<Turn>, RenderError> {
    match spec {
        PositionSpec::Set(values) => {
            let mut turns = values
                .iter()
                .map(|value| {
                    let n = number(value, "set member")?;
                    if !n.is_finite() {
                        return Err(invalid(format!("set member {} is not finite", n)));
                    }
                    Ok(Turn::wrapping(n))
                })
                .collect::<Result<Vec<_>, _>>()?;
            turns.sort_by(|a, b| a.raw().total_cmp(&b.raw()));
            turns.dedup();
            Ok(turns)
        }
        PositionSpec::Count(count) => {
            let n = count_of(count)?;
            Ok((0..n).map(|i| Turn::fraction(i, n)).collect())
        }
        PositionSpec::Range { count, start, end } => {
            let n = count_of(count)?;
            let start = match start {
                Some(start) => number(start, "range start")?,
                None => 0.0,
            };
            let end = number(end, "range end")?;
            Ok((0..n)
                .filter(|&i| {
                    let f = i as f64 / n as f64;
                    start <= f && f <= end
                })
                .map(|i| Turn::fraction(i, n))
                .collect())
        }
    }
}

fn invalid(message: String) -> RenderError {
    RenderError::InvalidPositionSpec { message }
}

fn number(value: &Resolved, what: &str) -> Result<f64, RenderError> {
    value
        .as_number()
        .ok_or_else(|| invalid(format!("{} `{}` is not numeric", what, value)))
}

fn count_of(value: &Resolved) -> Result<u64, RenderError> {
    let n = number(value, "count")?;
    if n.fract() != 0.0 || n < 0.0 || !n.is_finite() {
        return Err(invalid(format!(
            "count must be a non-negative integer, got {}",
            n
        )));
    }
    if n > MAX_POSITIONS as f64 {
        return Err(invalid(format!(
            "count {} exceeds the limit of {}",
            n, MAX_POSITIONS
        )));
    }
    Ok(n as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Resolved {
        Resolved::Numeric(n)
    }

    fn raw(turns: Vec<Turn>) -> Vec<f64> {
        turns.into_iter().map(Turn::raw).collect()
    }

    #[test]
    fn count_is_evenly_spaced_from_zero() {
        for n in [1u32, 3, 4, 12, 60] {
            let turns = raw(expand(&PositionSpec::Count(num(n as f64))).unwrap());
            assert_eq!(turns.len(), n as usize);
            assert_eq!(turns[0], 0.0);
            for (i, t) in turns.iter().enumerate() {
                assert!((t - i as f64 / n as f64).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(expand(&PositionSpec::Count(num(0.0))).unwrap().is_empty());
    }

    #[test]
    fn range_with_end_only_starts_at_zero() {
        let spec = PositionSpec::Range {
            count: num(12.0),
            start: None,
            end: num(0.25),
        };
        assert_eq!(raw(expand(&spec).unwrap()), vec![0.0, 1.0 / 12.0, 2.0 / 12.0, 0.25]);
    }

    #[test]
    fn range_includes_both_bounds_and_nothing_else() {
        let spec = PositionSpec::Range {
            count: num(60.0),
            start: num(0.25).into(),
            end: num(0.5),
        };
        let turns = raw(expand(&spec).unwrap());
        assert_eq!(turns.len(), 16);
        for i in 0..60 {
            let f = i as f64 / 60.0;
            let expected = (0.25..=0.5).contains(&f);
            assert_eq!(turns.contains(&f), expected, "i = {}", i);
        }
    }

    #[test]
    fn set_wraps_sorts_and_dedups() {
        let spec = PositionSpec::Set(vec![num(0.5), num(1.25), num(-0.5), num(0.25)]);
        assert_eq!(raw(expand(&spec).unwrap()), vec![0.25, 0.5]);
    }

    #[test]
    fn non_integer_or_negative_counts_are_invalid() {
        for n in [2.5, -1.0, f64::INFINITY] {
            assert!(matches!(
                expand(&PositionSpec::Count(num(n))),
                Err(RenderError::InvalidPositionSpec { .. })
            ));
        }
    }

    #[test]
    fn symbolic_values_are_invalid() {
        let spec = PositionSpec::Count(Resolved::Symbolic("twelve".to_string()));
        assert!(matches!(
            expand(&spec),
            Err(RenderError::InvalidPositionSpec { .. })
        ));
    }

    #[test]
    fn huge_counts_are_invalid() {
        assert!(matches!(
            expand(&PositionSpec::Count(num(1e9))),
            Err(RenderError::InvalidPositionSpec { .. })
        ));
    }

    #[test]
    fn count_limit_is_inclusive() {
        let limit = MAX_POSITIONS as f64;
        assert_eq!(expand(&PositionSpec::Count(num(limit))).unwrap().len(), 100_000);
        assert_eq!(
            expand(&PositionSpec::Count(num(limit + 1.0))).unwrap_err(),
            RenderError::InvalidPositionSpec {
                message: "count 100001 exceeds the limit of 100000".to_string()
            }
        );
    }
}
