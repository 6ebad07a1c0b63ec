// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::document::FunctionDocument;
use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::{eyre::WrapErr, Result};
use qm_min::{
    cover::{Cover, Labels},
    logic_function::LogicFunction,
    minimizer::{Minimizer, MinimizerOptions},
};

/// A function description loaded from a fixture file.
#[derive(Clone, Debug)]
pub struct FixtureDetails {
    name: String,
    path: Utf8PathBuf,
    function: LogicFunction,
    labels: Labels,
}

impl FixtureDetails {
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read fixture {}", path))?;
        let (function, labels) = FunctionDocument::parse(&json)
            .and_then(|document| document.to_function())
            .wrap_err_with(|| format!("invalid fixture {}", path))?;
        let name = path.file_stem().unwrap_or(path.as_str()).to_owned();

        Ok(Self {
            name,
            path: path.to_owned(),
            function,
            labels,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    #[inline]
    pub fn function(&self) -> &LogicFunction {
        &self.function
    }

    #[inline]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Computes and verifies a cover for this fixture.
    pub fn minimize(&self, options: MinimizerOptions) -> Result<Cover> {
        let minimizer = Minimizer::from_function(&self.function)?.with_options(options);
        let cover = minimizer
            .minimum_cost_cover()
            .wrap_err_with(|| format!("failed to minimize fixture {}", self.name))?;
        Ok(cover)
    }
}
