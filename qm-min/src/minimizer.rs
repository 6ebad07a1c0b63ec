// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    cover::{Cover, CoverTable},
    errors::{IncorrectCover, OutputCapacityExceeded},
    implicant::{width_mask, Implicant, Term},
    logic_function::{LogicFunction, OutputFunction},
    table::ImplicantTable,
};
use log::{debug, info};

/// Options that control how a cover is computed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MinimizerOptions {
    parallel_reduction: bool,
}

impl MinimizerOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether prime implicant generation merges weight classes on the rayon thread pool.
    ///
    /// Defaults to true. The result is the same either way.
    pub fn with_parallel_reduction(mut self, parallel_reduction: bool) -> Self {
        self.parallel_reduction = parallel_reduction;
        self
    }

    #[inline]
    pub fn parallel_reduction(&self) -> bool {
        self.parallel_reduction
    }
}

impl Default for MinimizerOptions {
    fn default() -> Self {
        Self {
            parallel_reduction: true,
        }
    }
}

/// Computes low-cost covers for multi-output functions.
///
/// Outputs are added one at a time. [`Self::minimum_cost_cover`] then generates every prime
/// implicant, extracts the essential ones, completes the cover greedily and checks the result
/// by simulating it over every input.
#[derive(Clone, Debug, Default)]
pub struct Minimizer {
    function: LogicFunction,
    table: ImplicantTable,
    options: MinimizerOptions,
}

impl Minimizer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_function(function: &LogicFunction) -> Result<Self, OutputCapacityExceeded> {
        let mut minimizer = Self::new();
        minimizer.function.set_min_input_width(function.input_width());
        for output in function.outputs() {
            minimizer.push_output(output.clone())?;
        }
        Ok(minimizer)
    }

    pub fn with_options(mut self, options: MinimizerOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn options(&self) -> &MinimizerOptions {
        &self.options
    }

    #[inline]
    pub fn function(&self) -> &LogicFunction {
        &self.function
    }

    /// Adds an output given by its ON-set and don't care set, returning its index.
    ///
    /// Duplicate terms are ignored, and don't cares that are also ON terms are dropped.
    pub fn add_output(
        &mut self,
        on_set: impl IntoIterator<Item = Term>,
        dc_set: impl IntoIterator<Item = Term>,
    ) -> Result<usize, OutputCapacityExceeded> {
        self.push_output(OutputFunction::new(on_set, dc_set))
    }

    fn push_output(&mut self, output: OutputFunction) -> Result<usize, OutputCapacityExceeded> {
        let output_ix = self.table.add_output(
            output.on_set().iter().copied(),
            output.dc_set().iter().copied(),
        )?;
        debug!(
            "added output {}: on set {:?}, dc set {:?}",
            output_ix,
            output.on_set(),
            output.dc_set(),
        );
        let function_ix = self.function.add_output(output)?;
        debug_assert_eq!(output_ix, function_ix);
        Ok(output_ix)
    }

    /// Returns every prime implicant of the function.
    pub fn prime_implicants(&self) -> Vec<Implicant> {
        self.table
            .reduce(self.options.parallel_reduction)
            .prime_implicants()
    }

    /// Computes a low-cost cover of the function.
    ///
    /// The cover is checked against the function before it is returned, and an error is
    /// returned if it does not reproduce every output on every input that isn't a don't care.
    ///
    /// The check visits all `2^input_width` inputs for each output, so its cost doubles with every
    /// input. A single term such as `1 << 40` makes the function 41 inputs wide, which is far too
    /// many to verify in practice.
    pub fn minimum_cost_cover(&self) -> Result<Cover, IncorrectCover> {
        let primes = self.prime_implicants();
        let prime_count = primes.len();
        let on_sets = self
            .function
            .outputs()
            .iter()
            .map(|output| output.on_set().iter().copied().collect())
            .collect();

        let mut table = CoverTable::new(primes, on_sets);
        // Removing a prime only clears the terms it covers, so every term left afterwards keeps
        // all of its coverers: one sweep finds every essential prime.
        let mut selected = table.extract_essential_primes();
        let essential_count = selected.len();
        selected.extend(table.select_minimum_cost_cover());

        self.verify_cover(&selected)?;

        let cover = Cover::new(
            selected,
            self.function.output_count(),
            self.function.input_width(),
        );
        info!(
            "found cover with {} implicants ({} essential) and {} literals from {} primes",
            cover.implicant_count(),
            essential_count,
            cover.literal_count(),
            prime_count,
        );
        Ok(cover)
    }

    /// Checks that `cover` reproduces the function.
    ///
    /// For every output, every term in the input domain that isn't a don't care must evaluate to
    /// 1 exactly if it is in the ON-set. This takes `2^input_width` evaluations per output.
    pub fn verify_cover(&self, cover: &[Implicant]) -> Result<(), IncorrectCover> {
        let max_term = width_mask(self.function.input_width());

        for (output_ix, output) in self.function.outputs().iter().enumerate() {
            for term in 0..=max_term {
                let expected = match output.value(term) {
                    Some(expected) => expected,
                    None => continue,
                };
                let actual = cover
                    .iter()
                    .any(|implicant| implicant.applies_to(output_ix) && implicant.covers(term));
                if actual != expected {
                    return Err(IncorrectCover {
                        output_ix,
                        term,
                        expected,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cover::Labels, implicant::MAX_OUTPUTS};
    use proptest::prelude::*;

    #[test]
    fn test_two_input_cover() {
        let mut minimizer = Minimizer::new();
        minimizer.add_output([0, 1, 2], []).unwrap();

        let cover = minimizer.minimum_cost_cover().unwrap();
        // x1' covers 00 and 01, x0' covers 00 and 10.
        assert_eq!(
            cover.implicants(),
            &[
                Implicant::new(0b00, 0b01, 0b1),
                Implicant::new(0b00, 0b10, 0b1),
            ]
        );
        assert_eq!(
            cover.algebraic_display(&Labels::new()).to_string(),
            "f0 = x1' + x0'\n"
        );
    }

    #[test]
    fn test_dont_care_absorbed() {
        let mut minimizer = Minimizer::new();
        minimizer.add_output([0], [1]).unwrap();
        minimizer.function.set_min_input_width(2);

        let cover = minimizer.minimum_cost_cover().unwrap();
        // A single implicant with input 0 free: x1'.
        assert_eq!(cover.implicants(), &[Implicant::new(0b00, 0b01, 0b1)]);
        assert_eq!(cover.literal_count(), 1);
        assert!(cover.evaluate(0, 1), "the don't care is covered");
    }

    #[test]
    fn test_dont_care_duplicating_on_term_is_dropped() {
        // Term 1 is listed as both ON and don't care. It stays an ON term, and only term 2 is a
        // don't care.
        let mut minimizer = Minimizer::new();
        minimizer.add_output([0, 1], [1, 2]).unwrap();
        let output = &minimizer.function().outputs()[0];
        assert_eq!(output.dc_set().iter().copied().collect::<Vec<_>>(), vec![2]);

        let cover = minimizer.minimum_cost_cover().unwrap();
        assert!(cover.evaluate(0, 1), "term 1 must be covered");
        assert!(!cover.evaluate(0, 3), "term 3 is off");
    }

    #[test]
    fn test_shared_implicant() {
        // Term 3 is the only term shared by the two outputs, and nothing else is adjacent to it.
        let mut minimizer = Minimizer::new();
        minimizer.add_output([3, 4], []).unwrap();
        minimizer.add_output([3, 8], []).unwrap();

        let cover = minimizer.minimum_cost_cover().unwrap();
        let covering_3: Vec<_> = cover
            .implicants()
            .iter()
            .filter(|implicant| implicant.covers(3))
            .collect();
        assert_eq!(covering_3, vec![&Implicant::minterm(3, 0b11)]);
        assert_eq!(cover.implicant_count(), 3);
    }

    #[test]
    fn test_shared_prime_keeps_both_tags() {
        // f0 = {5, 7} needs 01-1, which is valid for f1 as well. f1 = {5, 7, 13, 15} is covered
        // by -1-1 alone.
        let mut minimizer = Minimizer::new();
        minimizer.add_output([5, 7], []).unwrap();
        minimizer.add_output([5, 7, 13, 15], []).unwrap();

        let cover = minimizer.minimum_cost_cover().unwrap();
        assert_eq!(
            cover.implicants(),
            &[
                Implicant::new(0b0101, 0b0010, 0b11),
                Implicant::new(0b0101, 0b1010, 0b10),
            ]
        );
    }

    #[test]
    fn test_output_capacity() {
        let mut minimizer = Minimizer::new();
        for output_ix in 0..MAX_OUTPUTS {
            assert_eq!(minimizer.add_output([output_ix as Term], []), Ok(output_ix));
        }
        assert_eq!(
            minimizer.add_output([0], []),
            Err(OutputCapacityExceeded { capacity: 64 })
        );
        assert_eq!(minimizer.function().output_count(), 64);
    }

    #[test]
    fn test_empty_outputs() {
        let minimizer = Minimizer::new();
        let cover = minimizer.minimum_cost_cover().unwrap();
        assert!(cover.is_empty());

        let mut minimizer = Minimizer::new();
        minimizer.add_output([], [3]).unwrap();
        let cover = minimizer.minimum_cost_cover().unwrap();
        assert!(cover.is_empty());
        assert_eq!(cover.output_count(), 1);
    }

    #[test]
    fn test_verify_cover_detects_errors() {
        let mut minimizer = Minimizer::new();
        minimizer.add_output([0, 1, 2], []).unwrap();
        minimizer.add_output([3], [2]).unwrap();

        let correct = [
            Implicant::new(0b00, 0b01, 0b01),
            Implicant::new(0b00, 0b10, 0b01),
            Implicant::new(0b10, 0b01, 0b10),
        ];
        assert_eq!(minimizer.verify_cover(&correct), Ok(()));

        // Missing term 2 for output 0.
        assert_eq!(
            minimizer.verify_cover(&correct[..1]),
            Err(IncorrectCover {
                output_ix: 0,
                term: 2,
                expected: true,
            })
        );

        // Covering term 3 for output 0 as well.
        let too_wide = [
            Implicant::new(0b00, 0b11, 0b01),
            Implicant::new(0b10, 0b01, 0b10),
        ];
        assert_eq!(
            minimizer.verify_cover(&too_wide),
            Err(IncorrectCover {
                output_ix: 0,
                term: 3,
                expected: false,
            })
        );

        // The right implicants, tagged for the wrong output.
        let wrong_tag = [
            Implicant::new(0b00, 0b01, 0b01),
            Implicant::new(0b00, 0b10, 0b01),
            Implicant::new(0b10, 0b01, 0b01),
        ];
        assert_eq!(
            minimizer.verify_cover(&wrong_tag),
            Err(IncorrectCover {
                output_ix: 0,
                term: 3,
                expected: false,
            })
        );
    }

    #[test]
    fn test_verify_cover_spans_input_width() {
        // Only term 0 is on, but the function is declared over three inputs, so terms 1..=7 are
        // all checked.
        let mut function = LogicFunction::new();
        function.add_output(OutputFunction::new([0], [])).unwrap();
        function.set_min_input_width(3);
        let minimizer = Minimizer::from_function(&function).unwrap();

        assert_eq!(
            minimizer.verify_cover(&[Implicant::new(0b000, 0b100, 0b1)]),
            Err(IncorrectCover {
                output_ix: 0,
                term: 4,
                expected: false,
            })
        );

        let cover = minimizer.minimum_cost_cover().unwrap();
        assert_eq!(cover.implicants(), &[Implicant::minterm(0, 0b1)]);
        assert_eq!(cover.literal_count(), 3);
    }

    #[test]
    fn test_from_function() {
        let mut function = LogicFunction::new();
        function.add_output(OutputFunction::new([1, 3], [7])).unwrap();
        function.set_min_input_width(4);

        let minimizer = Minimizer::from_function(&function).unwrap();
        assert_eq!(minimizer.function(), &function);
        let cover = minimizer.minimum_cost_cover().unwrap();
        assert_eq!(cover.input_width(), 4);
        // Term 1 makes 00-1 essential, and it covers term 3 as well.
        assert_eq!(cover.implicant_count(), 1);
    }

    fn check_cover(function: &LogicFunction, cover: &Cover) -> Result<(), TestCaseError> {
        let max_term = width_mask(function.input_width());
        for (output_ix, output) in function.outputs().iter().enumerate() {
            for term in 0..=max_term {
                if let Some(expected) = output.value(term) {
                    prop_assert_eq!(
                        cover.evaluate(output_ix, term),
                        expected,
                        "output {} term {}",
                        output_ix,
                        term
                    );
                }
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn proptest_cover_is_sound(
            function in any_with::<LogicFunction>(Some((4, 3))),
            parallel_reduction in any::<bool>(),
        ) {
            let options = MinimizerOptions::new().with_parallel_reduction(parallel_reduction);
            let minimizer = Minimizer::from_function(&function).unwrap().with_options(options);
            let cover = minimizer.minimum_cost_cover().expect("minimization succeeds");
            check_cover(&function, &cover)?;
        }

        #[test]
        fn proptest_essential_primes_selected(
            function in any_with::<LogicFunction>(Some((4, 2))),
        ) {
            let minimizer = Minimizer::from_function(&function).unwrap();
            let primes = minimizer.prime_implicants();
            let cover = minimizer.minimum_cost_cover().expect("minimization succeeds");

            for (output_ix, output) in function.outputs().iter().enumerate() {
                for &term in output.on_set() {
                    let mut coverers = primes
                        .iter()
                        .filter(|prime| prime.applies_to(output_ix) && prime.covers(term));
                    if let (Some(only), None) = (coverers.next(), coverers.next()) {
                        prop_assert!(
                            cover.implicants().contains(only),
                            "essential prime {:?} for term {} is in the cover",
                            only,
                            term
                        );
                    }
                }
            }
        }

        #[test]
        fn proptest_single_sweep_finds_every_essential_prime(
            function in any_with::<LogicFunction>(Some((5, 3))),
        ) {
            let minimizer = Minimizer::from_function(&function).unwrap();
            let on_sets = function
                .outputs()
                .iter()
                .map(|output| output.on_set().iter().copied().collect())
                .collect();
            let mut table = CoverTable::new(minimizer.prime_implicants(), on_sets);

            table.extract_essential_primes();
            let second = table.extract_essential_primes();
            prop_assert!(second.is_empty(), "second sweep found {:?}", second);
        }
    }
}
