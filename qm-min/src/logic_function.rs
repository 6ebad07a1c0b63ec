// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::OutputCapacityExceeded,
    implicant::{Term, MAX_OUTPUTS},
};
use std::collections::BTreeSet;

/// One output of a function: the terms it must be 1 for, and the terms it may take any value for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputFunction {
    on_set: BTreeSet<Term>,
    dc_set: BTreeSet<Term>,
}

impl OutputFunction {
    /// Creates a new output, deduplicating both sets.
    ///
    /// A term listed as both ON and don't care is an ON term: it is dropped from the don't care
    /// set.
    pub fn new(
        on_set: impl IntoIterator<Item = Term>,
        dc_set: impl IntoIterator<Item = Term>,
    ) -> Self {
        let on_set: BTreeSet<_> = on_set.into_iter().collect();
        let dc_set = dc_set
            .into_iter()
            .filter(|term| !on_set.contains(term))
            .collect();
        Self { on_set, dc_set }
    }

    #[inline]
    pub fn on_set(&self) -> &BTreeSet<Term> {
        &self.on_set
    }

    #[inline]
    pub fn dc_set(&self) -> &BTreeSet<Term> {
        &self.dc_set
    }

    /// Returns the required value for `term`, or `None` if it is a don't care.
    pub fn value(&self, term: Term) -> Option<bool> {
        if self.dc_set.contains(&term) {
            None
        } else {
            Some(self.on_set.contains(&term))
        }
    }

    /// Returns the largest term in either set.
    pub fn largest_term(&self) -> Option<Term> {
        let on_max = self.on_set.iter().next_back();
        let dc_max = self.dc_set.iter().next_back();
        on_max.into_iter().chain(dc_max).max().copied()
    }
}

/// A multi-output function, described by the ON-set and don't care set of each output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogicFunction {
    outputs: Vec<OutputFunction>,
    min_input_width: usize,
}

impl LogicFunction {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an output, returning its index.
    pub fn add_output(&mut self, output: OutputFunction) -> Result<usize, OutputCapacityExceeded> {
        if self.outputs.len() == MAX_OUTPUTS {
            return Err(OutputCapacityExceeded {
                capacity: MAX_OUTPUTS,
            });
        }
        self.outputs.push(output);
        Ok(self.outputs.len() - 1)
    }

    #[inline]
    pub fn outputs(&self) -> &[OutputFunction] {
        &self.outputs
    }

    #[inline]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Declares that the function has at least `width` inputs, even if no term uses the upper ones.
    pub fn set_min_input_width(&mut self, width: usize) {
        assert!(
            width <= Term::BITS as usize,
            "input width {} must be at most {}",
            width,
            Term::BITS
        );
        self.min_input_width = width;
    }

    /// Returns the largest term of any output, or 0 if there are no terms.
    pub fn largest_term(&self) -> Term {
        self.outputs
            .iter()
            .filter_map(|output| output.largest_term())
            .max()
            .unwrap_or(0)
    }

    /// Returns the number of inputs: enough bits to write the largest term, and at least the
    /// declared minimum.
    pub fn input_width(&self) -> usize {
        let term_width = (Term::BITS - self.largest_term().leading_zeros()) as usize;
        term_width.max(self.min_input_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_function_normalizes() {
        let output = OutputFunction::new([5, 1, 5, 3], [3, 7, 7, 0]);
        assert_eq!(output.on_set().iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
        // 3 is an ON term, so it is not a don't care.
        assert_eq!(output.dc_set().iter().copied().collect::<Vec<_>>(), vec![0, 7]);

        assert_eq!(output.value(3), Some(true));
        assert_eq!(output.value(2), Some(false));
        assert_eq!(output.value(7), None);
        assert_eq!(output.largest_term(), Some(7));
        assert_eq!(OutputFunction::default().largest_term(), None);
    }

    #[test]
    fn test_input_width() {
        let mut function = LogicFunction::new();
        assert_eq!(function.input_width(), 0);

        function.add_output(OutputFunction::new([0], [])).unwrap();
        assert_eq!(function.input_width(), 0);

        function.add_output(OutputFunction::new([2], [5])).unwrap();
        assert_eq!(function.largest_term(), 5);
        assert_eq!(function.input_width(), 3);

        function.set_min_input_width(6);
        assert_eq!(function.input_width(), 6);
    }

    #[test]
    fn test_output_capacity() {
        let mut function = LogicFunction::new();
        for output_ix in 0..MAX_OUTPUTS {
            assert_eq!(function.add_output(OutputFunction::default()), Ok(output_ix));
        }
        assert_eq!(
            function.add_output(OutputFunction::default()),
            Err(OutputCapacityExceeded { capacity: 64 })
        );
    }
}
