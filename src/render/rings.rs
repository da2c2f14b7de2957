//! Ring allocation: cumulative offsets to absolute radii

use crate::ast::{Dial, Resolved, RingItem};
use crate::errors::RenderError;
use crate::log::debug;
use crate::types::Length;

use super::defaults::OUTER_RADIUS;

/// A ring with its absolute radius
#[derive(Debug, Clone, Copy)]
pub struct AllocatedRing<'a> {
    /// Declaration index, outermost ring is 0
    pub index: usize,
    pub radius: Length,
    pub items: &'a [RingItem<Resolved>],
}

/// Subtract each ring's offset from the running radius, starting at the
/// outer boundary, in declaration order.
pub fn allocate(dial: &Dial<Resolved>) -> Result<Vec<AllocatedRing<'_>>, RenderError> {
    let mut radius = OUTER_RADIUS;
    let mut rings = Vec::with_capacity(dial.rings.len());

    for (index, ring) in dial.rings.iter().enumerate() {
        let offset = match &ring.offset {
            Resolved::Numeric(n) => *n,
            Resolved::Symbolic(s) => {
                return Err(RenderError::SymbolicOffset { value: s.clone() });
            }
        };
        if offset < 0.0 {
            return Err(RenderError::NegativeOffset {
                ring: index,
                offset,
            });
        }

        radius = radius - Length(offset);
        if radius.raw() <= 0.0 {
            return Err(RenderError::NonPositiveRadius {
                ring: index,
                radius: radius.raw(),
            });
        }

        debug!(ring = index, offset, radius = radius.raw(), "allocated ring");
        rings.push(AllocatedRing {
            index,
            radius,
            items: &ring.items,
        });
    }

    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Dictionary, Ring};

    fn dial(offsets: &[Resolved]) -> Dial<Resolved> {
        Dial {
            dictionary: Dictionary::default(),
            rings: offsets
                .iter()
                .map(|offset| Ring {
                    offset: offset.clone(),
                    items: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn offsets_accumulate_inward() {
        let dial = dial(&[
            Resolved::Numeric(0.0),
            Resolved::Numeric(10.0),
            Resolved::Numeric(2.5),
        ]);
        let radii: Vec<f64> = allocate(&dial)
            .unwrap()
            .iter()
            .map(|ring| ring.radius.raw())
            .collect();
        assert_eq!(radii, vec![100.0, 90.0, 87.5]);
    }

    #[test]
    fn empty_rings_still_consume_radius() {
        let dial = dial(&[Resolved::Numeric(30.0), Resolved::Numeric(30.0)]);
        let rings = allocate(&dial).unwrap();
        assert_eq!(rings[1].radius, Length(40.0));
        assert!(rings[1].items.is_empty());
    }

    #[test]
    fn radius_must_stay_positive() {
        let dial = dial(&[Resolved::Numeric(60.0), Resolved::Numeric(40.0)]);
        assert_eq!(
            allocate(&dial).unwrap_err(),
            RenderError::NonPositiveRadius {
                ring: 1,
                radius: 0.0
            }
        );
    }

    #[test]
    fn negative_offsets_are_rejected() {
        let dial = dial(&[Resolved::Numeric(-1.0)]);
        assert!(matches!(
            allocate(&dial),
            Err(RenderError::NegativeOffset { ring: 0, .. })
        ));
    }

    #[test]
    fn symbolic_offsets_are_rejected() {
        let dial = dial(&[Resolved::Symbolic("wide".to_string())]);
        assert!(matches!(
            allocate(&dial),
            Err(RenderError::SymbolicOffset { .. })
        ));
    }
}
