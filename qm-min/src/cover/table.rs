// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::implicant::{Implicant, Term};
use bitvec::vec::BitVec;
use log::debug;

/// The covering problem: which prime implicants cover which ON-set terms, per output.
///
/// The table shrinks as implicants are selected. Selecting an implicant removes it along with
/// every term it covers, for every output it applies to.
#[derive(Clone, Debug)]
pub struct CoverTable {
    primes: Vec<Implicant>,
    // coverage[prime_ix][output_ix] has bit `i` set if the prime covers `on_sets[output_ix][i]`
    // and that term is still uncovered.
    coverage: Vec<Vec<BitVec>>,
    on_sets: Vec<Vec<Term>>,
    remaining: Vec<BitVec>,
}

impl CoverTable {
    /// Builds the table for `primes` against the ON-set of each output.
    ///
    /// Don't care terms are deliberately absent: nothing needs to cover them.
    pub fn new(primes: Vec<Implicant>, on_sets: Vec<Vec<Term>>) -> Self {
        let coverage = primes
            .iter()
            .map(|prime| {
                on_sets
                    .iter()
                    .enumerate()
                    .map(|(output_ix, on_set)| {
                        let applies = prime.applies_to(output_ix);
                        on_set
                            .iter()
                            .map(|&term| applies && prime.covers(term))
                            .collect()
                    })
                    .collect()
            })
            .collect();
        let remaining = on_sets
            .iter()
            .map(|on_set| BitVec::repeat(true, on_set.len()))
            .collect();

        Self {
            primes,
            coverage,
            on_sets,
            remaining,
        }
    }

    /// Returns the implicants not yet selected or removed.
    #[inline]
    pub fn primes(&self) -> &[Implicant] {
        &self.primes
    }

    #[inline]
    pub fn output_count(&self) -> usize {
        self.on_sets.len()
    }

    /// Returns the ON-set terms of `output_ix` that no selected implicant covers yet.
    pub fn remaining_terms(&self, output_ix: usize) -> impl Iterator<Item = Term> + '_ {
        let on_set = &self.on_sets[output_ix];
        self.remaining[output_ix]
            .iter_ones()
            .map(move |term_ix| on_set[term_ix])
    }

    /// Returns the number of uncovered terms, summed over every output.
    pub fn remaining_count(&self) -> usize {
        self.remaining.iter().map(|bits| bits.count_ones()).sum()
    }

    /// Returns the uncovered terms of `output_ix` that `prime` covers.
    pub fn covered_terms(
        &self,
        prime: &Implicant,
        output_ix: usize,
    ) -> impl Iterator<Item = Term> + '_ {
        let on_set = &self.on_sets[output_ix];
        self.position(prime)
            .into_iter()
            .flat_map(move |prime_ix| self.coverage[prime_ix][output_ix].iter_ones())
            .map(move |term_ix| on_set[term_ix])
    }

    /// Removes and returns the essential prime implicants.
    ///
    /// A prime is essential if it is the only remaining prime covering some uncovered term. This
    /// makes one sweep over the uncovered terms; terms that become singly covered once the
    /// essential primes are removed are not revisited.
    pub fn extract_essential_primes(&mut self) -> Vec<Implicant> {
        let mut essential: Vec<Implicant> = Vec::new();

        for output_ix in 0..self.output_count() {
            for term_ix in self.remaining[output_ix].iter_ones() {
                let mut coverers = self
                    .coverage
                    .iter()
                    .enumerate()
                    .filter(|(_, coverage)| coverage[output_ix][term_ix])
                    .map(|(prime_ix, _)| prime_ix);

                let prime_ix = match (coverers.next(), coverers.next()) {
                    (Some(prime_ix), None) => prime_ix,
                    _ => continue,
                };
                let prime = self.primes[prime_ix];
                if !essential.iter().any(|p| p.shape() == prime.shape()) {
                    debug!(
                        "{:?} is essential: only cover of term {} for output {}",
                        prime, self.on_sets[output_ix][term_ix], output_ix,
                    );
                    essential.push(prime);
                }
            }
        }

        for prime in &essential {
            self.remove_prime_and_coverage(prime);
        }
        essential
    }

    /// Greedily selects implicants until every term is covered, removing them from the table.
    ///
    /// Each step picks the implicant covering the most uncovered terms across all outputs. Ties
    /// go to the implicant with the most free inputs (the fewest literals), then to the earliest
    /// one. This is a heuristic: the result is a valid cover, but not necessarily a minimum one.
    pub fn select_minimum_cost_cover(&mut self) -> Vec<Implicant> {
        let mut selected = Vec::new();

        while self.remaining_count() > 0 {
            let mut best: Option<(usize, (usize, u32))> = None;
            for (prime_ix, prime) in self.primes.iter().enumerate() {
                let covered_count = self.coverage[prime_ix]
                    .iter()
                    .map(|bits| bits.count_ones())
                    .sum::<usize>();
                let key = (covered_count, prime.dont_care_count());
                if best.map_or(true, |(_, best_key)| key > best_key) {
                    best = Some((prime_ix, key));
                }
            }

            let prime = match best {
                Some((prime_ix, (covered_count, _))) if covered_count > 0 => self.primes[prime_ix],
                _ => {
                    // Only reachable if the primes don't cover the ON-sets. The caller's
                    // verification reports the uncovered terms.
                    debug!(
                        "{} terms remain but no implicant covers any of them",
                        self.remaining_count()
                    );
                    break;
                }
            };

            debug!("selected {:?}", prime);
            self.remove_prime_and_coverage(&prime);
            selected.push(prime);
        }

        selected
    }

    /// Removes `prime` and every term it covers (for each output it applies to) from the table.
    ///
    /// Does nothing if `prime` is not in the table.
    pub fn remove_prime_and_coverage(&mut self, prime: &Implicant) {
        let prime_ix = match self.position(prime) {
            Some(prime_ix) => prime_ix,
            None => return,
        };

        let stored = self.primes[prime_ix];
        for output_ix in stored.output_indices() {
            if output_ix >= self.output_count() {
                break;
            }
            let covered: Vec<usize> = self.coverage[prime_ix][output_ix].iter_ones().collect();
            for term_ix in covered {
                for coverage in &mut self.coverage {
                    coverage[output_ix].set(term_ix, false);
                }
                self.remaining[output_ix].set(term_ix, false);
            }
        }

        self.primes.remove(prime_ix);
        self.coverage.remove(prime_ix);
    }

    fn position(&self, prime: &Implicant) -> Option<usize> {
        self.primes.iter().position(|p| p.shape() == prime.shape())
    }
}
