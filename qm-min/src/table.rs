// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tabulation step: generating every prime implicant of a multi-output function.
//!
//! Implicants are grouped first by generation (how many merges produced them, which equals the
//! number of free inputs) and then by weight (the number of inputs fixed to 1). Generation `g + 1`
//! is produced from generation `g` by merging every implicant of weight `w` with every implicant
//! of weight `w + 1`. Once a generation produces nothing, every implicant that was never fully
//! absorbed into a wider one is prime.

use crate::{
    errors::OutputCapacityExceeded,
    implicant::{Implicant, Term, TermShape, MAX_OUTPUTS},
};
use log::{debug, trace};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// The input side of the tabulation: every ON-set and don't care term, tagged with the outputs
/// it belongs to.
#[derive(Clone, Debug, Default)]
pub struct ImplicantTable {
    output_count: usize,
    base: Generation,
}

impl ImplicantTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Returns the first generation: every term added so far, grouped by weight.
    #[inline]
    pub fn base(&self) -> &Generation {
        &self.base
    }

    /// Adds the terms of one more output, returning the index of its output tag bit.
    ///
    /// Don't care terms take part in merging exactly like ON-set terms. They are only told apart
    /// later, when the cover table is built from the ON-sets alone.
    pub fn add_output(
        &mut self,
        on_set: impl IntoIterator<Item = Term>,
        dc_set: impl IntoIterator<Item = Term>,
    ) -> Result<usize, OutputCapacityExceeded> {
        if self.output_count == MAX_OUTPUTS {
            return Err(OutputCapacityExceeded {
                capacity: MAX_OUTPUTS,
            });
        }

        let output_ix = self.output_count;
        let tag = 1_u64 << output_ix;
        for term in on_set.into_iter().chain(dc_set) {
            self.base.insert_or_tag(Implicant::minterm(term, tag));
        }
        self.output_count += 1;

        Ok(output_ix)
    }

    /// Runs the tabulation to completion.
    ///
    /// If `parallel` is true, the weight class pairs of each generation are merged on the rayon
    /// thread pool. The result does not depend on this setting.
    pub fn reduce(&self, parallel: bool) -> Reduction {
        let mut generations = Vec::new();
        let mut subsumed = HashSet::new();
        let mut current = self.base.clone();

        loop {
            debug!(
                "generation {}: {} implicants in {} weight classes",
                generations.len(),
                current.implicant_count(),
                current.classes.len(),
            );

            let next = current.next_generation(parallel, &mut subsumed);
            generations.push(current);
            if next.implicant_count() == 0 {
                break;
            }
            current = next;
        }

        let reduction = Reduction {
            generations,
            subsumed,
        };
        debug!(
            "reduction finished after {} generations with {} prime implicants",
            reduction.generations.len(),
            reduction.prime_implicants().len(),
        );
        reduction
    }
}

/// The implicants of one generation, grouped into weight classes.
#[derive(Clone, Debug, Default)]
pub struct Generation {
    classes: Vec<WeightClass>,
}

impl Generation {
    pub fn implicant_count(&self) -> usize {
        self.classes.iter().map(|class| class.implicants.len()).sum()
    }

    /// Returns the implicants of weight `weight`, in insertion order.
    pub fn weight_class(&self, weight: usize) -> &[Implicant] {
        self.classes
            .get(weight)
            .map(|class| class.implicants.as_slice())
            .unwrap_or_default()
    }

    pub fn weight_classes(&self) -> impl Iterator<Item = &[Implicant]> + '_ {
        self.classes.iter().map(|class| class.implicants.as_slice())
    }

    pub fn implicants(&self) -> impl Iterator<Item = &Implicant> + '_ {
        self.classes.iter().flat_map(|class| &class.implicants)
    }

    fn insert_or_tag(&mut self, implicant: Implicant) {
        let weight = implicant.weight() as usize;
        if weight >= self.classes.len() {
            self.classes.resize_with(weight + 1, WeightClass::default);
        }
        self.classes[weight].insert_or_tag(implicant);
    }

    fn next_generation(&self, parallel: bool, subsumed: &mut HashSet<TermShape>) -> Generation {
        let pair_count = self.classes.len().saturating_sub(1);
        let mut classes = vec![WeightClass::default(); pair_count];

        // Pair (w, w + 1) and pair (w + 1, w + 2) share a weight class, so even pairs go in one
        // wave and odd pairs in the next. Each task writes only to its own local output.
        for parity in [0, 1] {
            let pairs: Vec<usize> = (parity..pair_count).step_by(2).collect();
            let merge = |weight: usize| {
                (
                    weight,
                    PairMerge::new(&self.classes[weight], &self.classes[weight + 1]),
                )
            };
            let results: Vec<(usize, PairMerge)> = if parallel {
                pairs.into_par_iter().map(merge).collect()
            } else {
                pairs.into_iter().map(merge).collect()
            };

            for (weight, pair_merge) in results {
                // A merge always clears the differing bit, so pair (w, w + 1) lands in class w.
                classes[weight] = pair_merge.merged;
                subsumed.extend(pair_merge.absorbed);
            }
        }

        while classes.last().map_or(false, |class| class.implicants.is_empty()) {
            classes.pop();
        }

        Generation { classes }
    }
}

/// The result of running the tabulation: every generation, and which implicants were absorbed.
#[derive(Clone, Debug)]
pub struct Reduction {
    generations: Vec<Generation>,
    // Shapes are unique across generations, since each generation has one more free input than
    // the last.
    subsumed: HashSet<TermShape>,
}

impl Reduction {
    #[inline]
    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    #[inline]
    pub fn is_subsumed(&self, implicant: &Implicant) -> bool {
        self.subsumed.contains(&implicant.shape())
    }

    /// Returns the prime implicants, ordered by generation, then weight, then insertion order.
    pub fn prime_implicants(&self) -> Vec<Implicant> {
        self.generations
            .iter()
            .flat_map(|generation| generation.implicants())
            .filter(|implicant| !self.is_subsumed(implicant))
            .copied()
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
struct WeightClass {
    implicants: Vec<Implicant>,
    positions: HashMap<TermShape, usize>,
}

impl WeightClass {
    /// Inserts `implicant`, or ORs its tag into an existing implicant of the same shape.
    fn insert_or_tag(&mut self, implicant: Implicant) {
        match self.positions.get(&implicant.shape()) {
            Some(&ix) => {
                let existing = &mut self.implicants[ix];
                *existing = Implicant::new(
                    existing.literals(),
                    existing.dont_care_mask(),
                    existing.output_tag() | implicant.output_tag(),
                );
            }
            None => self.push(implicant),
        }
    }

    /// Inserts `implicant` unless an implicant of the same shape is already present.
    fn insert(&mut self, implicant: Implicant) {
        match self.positions.get(&implicant.shape()) {
            Some(&ix) => {
                // Any two derivations of a shape AND together the tags of the same terms.
                debug_assert_eq!(self.implicants[ix].output_tag(), implicant.output_tag());
            }
            None => self.push(implicant),
        }
    }

    fn push(&mut self, implicant: Implicant) {
        self.positions
            .insert(implicant.shape(), self.implicants.len());
        self.implicants.push(implicant);
    }
}

/// The merges found between two adjacent weight classes.
#[derive(Debug, Default)]
struct PairMerge {
    merged: WeightClass,
    absorbed: Vec<TermShape>,
}

impl PairMerge {
    fn new(lower: &WeightClass, upper: &WeightClass) -> Self {
        let mut res = Self::default();
        for a in &lower.implicants {
            for b in &upper.implicants {
                let merged = match a.combine(b) {
                    Some(merged) => merged,
                    None => continue,
                };
                trace!("merged {:?} and {:?} into {:?}", a, b, merged);

                if a.is_absorbed_by(&merged) {
                    res.absorbed.push(a.shape());
                }
                if b.is_absorbed_by(&merged) {
                    res.absorbed.push(b.shape());
                }
                // An implicant valid for no output is not worth keeping.
                if merged.output_tag() != 0 {
                    res.merged.insert(merged);
                }
            }
        }
        res
    }
}
