// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{details::FixtureDetails, document::FunctionDocument, value_generator::ValueGenerator};
use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::{eyre::WrapErr, Result};
use log::info;
use once_cell::sync::Lazy;
use proptest::prelude::*;
use qm_min::{
    cover::Labels,
    logic_function::LogicFunction,
    minimizer::{Minimizer, MinimizerOptions},
};

pub struct AllFixtures {
    dir: Utf8PathBuf,
    fixtures: Vec<FixtureDetails>,
}

static ALL_FIXTURES_STATIC: Lazy<AllFixtures> = Lazy::new(AllFixtures::init);

impl AllFixtures {
    pub fn get() -> &'static Self {
        &*ALL_FIXTURES_STATIC
    }

    /// Returns the directory fixtures are stored in.
    pub fn default_dir() -> Utf8PathBuf {
        let dir: Utf8PathBuf = env!("CARGO_MANIFEST_DIR").into();
        match dir.parent() {
            Some(parent) => parent.join("data"),
            None => dir.join("data"),
        }
    }

    fn init() -> Self {
        let dir = Self::default_dir();
        Self::load(&dir).expect("fixtures in the data directory are valid")
    }

    /// Loads every `.json` fixture in `dir`, sorted by file name.
    pub fn load(dir: &Utf8Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in dir
            .read_dir_utf8()
            .wrap_err_with(|| format!("failed to read fixture directory {}", dir))?
        {
            let entry = entry.wrap_err_with(|| format!("failed to read entry in {}", dir))?;
            if entry.path().extension() == Some("json") {
                paths.push(entry.path().to_owned());
            }
        }
        paths.sort();

        let fixtures = paths
            .iter()
            .map(|path| FixtureDetails::load(path))
            .collect::<Result<_>>()?;
        Ok(Self {
            dir: dir.to_owned(),
            fixtures,
        })
    }

    #[inline]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    #[inline]
    pub fn fixtures(&self) -> &[FixtureDetails] {
        &self.fixtures
    }

    pub fn fixture(&self, name: &str) -> Option<&FixtureDetails> {
        self.fixtures.iter().find(|fixture| fixture.name() == name)
    }

    /// Generates `count` random functions, minimizing and verifying each one.
    ///
    /// Functions are generated deterministically from the input width and output count. If
    /// `out_dir` is set, each function is also written there as a fixture.
    pub fn generate(
        count: usize,
        input_width: usize,
        output_count: usize,
        options: MinimizerOptions,
        out_dir: Option<&Utf8Path>,
    ) -> Result<GenerateSummary> {
        let mut value_gen =
            ValueGenerator::from_seed(format!("qm-min_{}_{}", input_width, output_count));
        let mut summary = GenerateSummary::default();

        for ix in 0..count {
            let mut gen = value_gen.partial_clone();
            let function: LogicFunction =
                gen.generate(any_with::<LogicFunction>(Some((input_width, output_count))))?;

            let minimizer = Minimizer::from_function(&function)?.with_options(options);
            let prime_count = minimizer.prime_implicants().len();
            let cover = minimizer
                .minimum_cost_cover()
                .wrap_err_with(|| format!("failed to minimize generated function {}", ix))?;

            summary.function_count += 1;
            summary.prime_count += prime_count;
            summary.implicant_count += cover.implicant_count();
            summary.literal_count += cover.literal_count();

            if let Some(out_dir) = out_dir {
                let path = out_dir.join(format!(
                    "generated-{}-{}-{:03}.json",
                    input_width, output_count, ix
                ));
                let json = FunctionDocument::from_function(&function, &Labels::new()).to_json()?;
                std::fs::write(&path, json)
                    .wrap_err_with(|| format!("failed to write fixture {}", path))?;
            }
        }

        info!(
            "generated {} functions: {} primes, {} implicants selected, {} literals",
            summary.function_count,
            summary.prime_count,
            summary.implicant_count,
            summary.literal_count,
        );
        Ok(summary)
    }
}

/// Totals over a run of generated functions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub function_count: usize,
    pub prime_count: usize,
    pub implicant_count: usize,
    pub literal_count: usize,
}
