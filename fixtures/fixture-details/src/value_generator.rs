// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use color_eyre::{eyre::eyre, Result};
use proptest::{
    strategy::{Strategy, ValueTree},
    test_runner::{Config, RngAlgorithm, TestRng, TestRunner},
};
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

/// Generates values from proptest strategies, deterministically for a given seed.
pub struct ValueGenerator {
    runner: TestRunner,
}

impl ValueGenerator {
    pub fn from_seed(seed: impl Hash) -> Self {
        // ChaCha takes a 32-byte seed: fill it with four hashes of the seed.
        let mut seed_bytes = [0_u8; 32];
        for (ix, chunk) in seed_bytes.chunks_exact_mut(8).enumerate() {
            let mut hasher = XxHash64::with_seed(ix as u64);
            seed.hash(&mut hasher);
            chunk.copy_from_slice(&hasher.finish().to_le_bytes());
        }

        let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &seed_bytes);
        Self {
            runner: TestRunner::new_with_rng(Config::default(), rng),
        }
    }

    /// Returns a generator whose RNG is split off from this one.
    pub fn partial_clone(&mut self) -> Self {
        Self {
            runner: TestRunner::new_with_rng(Config::default(), self.runner.new_rng()),
        }
    }

    pub fn generate<S: Strategy>(&mut self, strategy: S) -> Result<S::Value> {
        let tree = strategy
            .new_tree(&mut self.runner)
            .map_err(|reason| eyre!("failed to generate value: {}", reason))?;
        Ok(tree.current())
    }
}
