// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    cover::{CoverAlgebraicDisplay, CoverMatrixDisplay, Labels},
    implicant::{Implicant, Term, MAX_OUTPUTS},
};
use arrayvec::ArrayVec;

/// A sum-of-products cover of a multi-output function.
///
/// Each implicant carries the outputs it is part of, so an implicant shared by several outputs
/// appears (and costs) once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cover {
    implicants: Vec<Implicant>,
    output_count: usize,
    input_width: usize,
}

impl Cover {
    pub fn new(
        implicants: impl IntoIterator<Item = Implicant>,
        output_count: usize,
        input_width: usize,
    ) -> Self {
        assert!(
            output_count <= MAX_OUTPUTS,
            "output count {} must be at most {}",
            output_count,
            MAX_OUTPUTS
        );
        assert!(
            input_width <= Term::BITS as usize,
            "input width {} must be at most {}",
            input_width,
            Term::BITS
        );
        Self {
            implicants: implicants.into_iter().collect(),
            output_count,
            input_width,
        }
    }

    /// Returns the implicants in selection order.
    #[inline]
    pub fn implicants(&self) -> &[Implicant] {
        &self.implicants
    }

    #[inline]
    pub fn into_implicants(self) -> Vec<Implicant> {
        self.implicants
    }

    #[inline]
    pub fn implicant_count(&self) -> usize {
        self.implicants.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.implicants.is_empty()
    }

    #[inline]
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Returns the number of inputs the function is defined over.
    #[inline]
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Returns the total number of literals across all implicants.
    pub fn literal_count(&self) -> usize {
        self.implicants
            .iter()
            .map(|implicant| implicant.literal_count(self.input_width))
            .sum()
    }

    /// Returns the implicants that make up the sum for `output_ix`.
    pub fn output_component(&self, output_ix: usize) -> impl Iterator<Item = &Implicant> + '_ {
        assert!(
            output_ix < self.output_count,
            "output ix {} must be in range 0..{}",
            output_ix,
            self.output_count
        );
        self.implicants
            .iter()
            .filter(move |implicant| implicant.applies_to(output_ix))
    }

    /// Returns the value of output `output_ix` for the input `term`.
    pub fn evaluate(&self, output_ix: usize, term: Term) -> bool {
        self.output_component(output_ix)
            .any(|implicant| implicant.covers(term))
    }

    /// Returns the value of every output for the input `term`.
    pub fn evaluate_all(&self, term: Term) -> ArrayVec<bool, MAX_OUTPUTS> {
        (0..self.output_count)
            .map(|output_ix| self.evaluate(output_ix, term))
            .collect()
    }

    #[inline]
    pub fn matrix_display(&self) -> CoverMatrixDisplay<'_> {
        CoverMatrixDisplay::new(self)
    }

    #[inline]
    pub fn algebraic_display<'a>(&'a self, labels: &'a Labels) -> CoverAlgebraicDisplay<'a> {
        CoverAlgebraicDisplay::new(self, labels)
    }
}
