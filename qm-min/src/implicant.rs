// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use arrayvec::ArrayVec;
use std::fmt;

/// A single assignment of the input variables: bit `i` holds the value of input `i`.
pub type Term = u64;

/// The number of outputs an output tag can describe.
pub const MAX_OUTPUTS: usize = u64::BITS as usize;

/// The identity of an implicant: which inputs are fixed, and the values they are fixed to.
///
/// Two implicants with the same shape describe the same product term, whatever outputs they
/// apply to. Containers of implicants deduplicate on this key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermShape {
    pub literals: Term,
    pub dont_care_mask: Term,
}

/// A product term together with the set of outputs it is valid for.
///
/// Inputs whose bit is set in the don't care mask are free; every other input must equal the
/// corresponding bit in `literals`. Bits of `literals` under the don't care mask are always 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Implicant {
    literals: Term,
    dont_care_mask: Term,
    output_tag: u64,
}

impl Implicant {
    #[inline]
    pub fn new(literals: Term, dont_care_mask: Term, output_tag: u64) -> Self {
        Self {
            literals: literals & !dont_care_mask,
            dont_care_mask,
            output_tag,
        }
    }

    /// Returns an implicant covering exactly one term.
    #[inline]
    pub fn minterm(term: Term, output_tag: u64) -> Self {
        Self::new(term, 0, output_tag)
    }

    #[inline]
    pub fn literals(&self) -> Term {
        self.literals
    }

    #[inline]
    pub fn dont_care_mask(&self) -> Term {
        self.dont_care_mask
    }

    #[inline]
    pub fn output_tag(&self) -> u64 {
        self.output_tag
    }

    #[inline]
    pub fn shape(&self) -> TermShape {
        TermShape {
            literals: self.literals,
            dont_care_mask: self.dont_care_mask,
        }
    }

    /// The number of inputs fixed to 1. Implicants may only merge across adjacent weights.
    #[inline]
    pub fn weight(&self) -> u32 {
        self.literals.count_ones()
    }

    #[inline]
    pub fn dont_care_count(&self) -> u32 {
        self.dont_care_mask.count_ones()
    }

    /// Returns the number of literals needed to write this implicant over `input_width` inputs.
    pub fn literal_count(&self, input_width: usize) -> usize {
        (!self.dont_care_mask & width_mask(input_width)).count_ones() as usize
    }

    /// Merges `self` and `other` into the implicant covering both, if they are adjacent.
    ///
    /// Two implicants are adjacent if they have the same don't care mask and their literals
    /// differ in exactly one position. The merged implicant is valid only for the outputs both
    /// halves are valid for.
    ///
    /// # Examples
    ///
    /// ```
    /// use qm_min::implicant::Implicant;
    ///
    /// let a = Implicant::minterm(0b00, 0b11);
    /// let b = Implicant::minterm(0b10, 0b01);
    /// let merged = a.combine(&b).unwrap();
    ///
    /// assert_eq!(merged.dont_care_mask(), 0b10);
    /// assert_eq!(merged.literals(), 0b00);
    /// assert_eq!(merged.output_tag(), 0b01);
    ///
    /// // Terms two bits apart never merge.
    /// assert!(a.combine(&Implicant::minterm(0b11, 0b11)).is_none());
    /// ```
    pub fn combine(&self, other: &Self) -> Option<Self> {
        if self.dont_care_mask != other.dont_care_mask {
            return None;
        }

        let delta = self.literals ^ other.literals;
        if delta.count_ones() != 1 {
            return None;
        }

        Some(Self {
            literals: self.literals & !delta,
            dont_care_mask: self.dont_care_mask | delta,
            output_tag: self.output_tag & other.output_tag,
        })
    }

    /// Returns true if merging into `merged` lost none of `self`'s outputs, so `self` is no
    /// longer a prime candidate for any of them.
    #[inline]
    pub fn is_absorbed_by(&self, merged: &Self) -> bool {
        self.output_tag == merged.output_tag
    }

    /// Returns true if this implicant evaluates to 1 for `term`.
    #[inline]
    pub fn covers(&self, term: Term) -> bool {
        (self.dont_care_mask & term) | self.literals == term
    }

    #[inline]
    pub fn applies_to(&self, output_ix: usize) -> bool {
        output_ix < MAX_OUTPUTS && (self.output_tag >> output_ix) & 1 == 1
    }

    /// Returns the indexes of the outputs this implicant applies to, in ascending order.
    pub fn output_indices(&self) -> ArrayVec<usize, MAX_OUTPUTS> {
        (0..MAX_OUTPUTS)
            .filter(|&output_ix| self.applies_to(output_ix))
            .collect()
    }
}

impl fmt::Debug for Implicant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Renders as e.g. `Implicant(1-0 @ 0b11)`, over just enough inputs to show every fixed
        // or free bit.
        let width = (u64::BITS - (self.literals | self.dont_care_mask).leading_zeros()).max(1);
        write!(f, "Implicant(")?;
        for bit in (0..width).rev() {
            let ch = if (self.dont_care_mask >> bit) & 1 == 1 {
                '-'
            } else if (self.literals >> bit) & 1 == 1 {
                '1'
            } else {
                '0'
            };
            write!(f, "{}", ch)?;
        }
        write!(f, " @ {:#b})", self.output_tag)
    }
}

/// Returns a mask with the low `input_width` bits set.
#[inline]
pub(crate) fn width_mask(input_width: usize) -> Term {
    if input_width >= u64::BITS as usize {
        Term::MAX
    } else {
        (1 << input_width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_combine_adjacent() {
        let a = Implicant::new(0b0101, 0b1000, 0b111);
        let b = Implicant::new(0b0100, 0b1000, 0b011);
        let merged = a.combine(&b).expect("adjacent implicants merge");

        assert_eq!(merged.literals(), 0b0100);
        assert_eq!(merged.dont_care_mask(), 0b1001);
        assert_eq!(merged.output_tag(), 0b011);
        assert_eq!(b.combine(&a), Some(merged), "combine is symmetric");

        // `b` lost nothing in the merge, `a` lost output 2.
        assert!(b.is_absorbed_by(&merged));
        assert!(!a.is_absorbed_by(&merged));
    }

    #[test]
    fn test_combine_rejects() {
        let a = Implicant::new(0b0101, 0b1000, 0b1);
        // Different don't care masks.
        assert_eq!(a.combine(&Implicant::new(0b0100, 0b0010, 0b1)), None);
        // Same term.
        assert_eq!(a.combine(&a), None);
        // Two bits apart.
        assert_eq!(a.combine(&Implicant::new(0b0110, 0b1000, 0b1)), None);
    }

    #[test]
    fn test_covers() {
        // 1-0
        let im = Implicant::new(0b100, 0b010, 0b1);
        let covered: Vec<_> = (0..8).filter(|&term| im.covers(term)).collect();
        assert_eq!(covered, vec![0b100, 0b110]);

        let universe = Implicant::new(0, 0b11, 0b1);
        assert!((0..4).all(|term| universe.covers(term)));
        assert!(!universe.covers(0b100), "bits outside the mask must be 0");
    }

    #[test]
    fn test_new_clears_free_literals() {
        let im = Implicant::new(0b111, 0b010, 0b1);
        assert_eq!(im.literals(), 0b101);
        assert_eq!(im.shape(), Implicant::new(0b101, 0b010, 0b10).shape());
    }

    #[test]
    fn test_output_indices() {
        let im = Implicant::new(0, 0, (1 << 63) | 0b1010);
        assert_eq!(im.output_indices().as_slice(), &[1, 3, 63]);
        assert!(im.applies_to(63));
        assert!(!im.applies_to(0));
        assert!(!im.applies_to(64));
    }

    #[test]
    fn test_literal_count() {
        let im = Implicant::new(0b001, 0b010, 0b1);
        assert_eq!(im.literal_count(3), 2);
        assert_eq!(im.literal_count(64), 63);
        assert_eq!(format!("{:?}", im), "Implicant(-1 @ 0b1)");
    }

    proptest! {
        #[test]
        fn proptest_combine_precondition(
            a in any::<u8>(),
            b in any::<u8>(),
            mask_a in any::<u8>(),
            mask_b in any::<u8>(),
            tag_a in 1..u64::MAX,
            tag_b in 1..u64::MAX,
        ) {
            let im_a = Implicant::new(a as u64, mask_a as u64, tag_a);
            let im_b = Implicant::new(b as u64, mask_b as u64, tag_b);
            let distance = (im_a.literals() ^ im_b.literals()).count_ones();

            match im_a.combine(&im_b) {
                Some(merged) => {
                    prop_assert_eq!(mask_a, mask_b);
                    prop_assert_eq!(distance, 1);
                    prop_assert_eq!(merged.output_tag(), tag_a & tag_b);
                    prop_assert_eq!(merged.dont_care_count(), im_a.dont_care_count() + 1);
                    // The merged implicant covers exactly the union of its halves.
                    for term in 0..=u8::MAX as u64 {
                        prop_assert_eq!(
                            merged.covers(term),
                            im_a.covers(term) || im_b.covers(term),
                        );
                    }
                }
                None => {
                    prop_assert!(mask_a != mask_b || distance != 1);
                }
            }
        }
    }
}
