// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use color_eyre::{
    eyre::{bail, WrapErr},
    Result,
};
use qm_min::{
    cover::Labels,
    implicant::{Term, MAX_OUTPUTS},
    logic_function::{LogicFunction, OutputFunction},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A function description in JSON form.
///
/// ```json
/// {
///     "inputs": { "0": "cin", "1": "b", "2": "a" },
///     "sum": { "s": [1, 2, 4, 7] },
///     "carry": { "s": [3, 5, 6, 7], "d": [] }
/// }
/// ```
///
/// `inputs` optionally maps bit indexes to labels. Every other key is an output, with its
/// ON-set under `s` and its don't care set under `d`. Outputs are taken in key order.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct FunctionDocument {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, String>,
    #[serde(flatten)]
    pub outputs: BTreeMap<String, OutputDocument>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct OutputDocument {
    #[serde(rename = "s", default)]
    pub on_set: Vec<Term>,
    #[serde(rename = "d", default, skip_serializing_if = "Vec::is_empty")]
    pub dc_set: Vec<Term>,
}

impl FunctionDocument {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).wrap_err("failed to parse function document")
    }

    /// Builds a document from a function, naming outputs with `labels`.
    pub fn from_function(function: &LogicFunction, labels: &Labels) -> Self {
        let outputs = function
            .outputs()
            .iter()
            .enumerate()
            .map(|(output_ix, output)| {
                let document = OutputDocument {
                    on_set: output.on_set().iter().copied().collect(),
                    dc_set: output.dc_set().iter().copied().collect(),
                };
                (labels.output(output_ix).into_owned(), document)
            })
            .collect();

        Self {
            inputs: BTreeMap::new(),
            outputs,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).wrap_err("failed to serialize function document")
    }

    /// Converts this document into a function and the labels to render it with.
    pub fn to_function(&self) -> Result<(LogicFunction, Labels)> {
        if self.outputs.len() > MAX_OUTPUTS {
            bail!(
                "document defines {} outputs, but at most {} are supported",
                self.outputs.len(),
                MAX_OUTPUTS
            );
        }

        let mut labels = Labels::new();
        for (key, label) in &self.inputs {
            let input_ix: usize = key
                .parse()
                .wrap_err_with(|| format!("input label key {:?} is not a bit index", key))?;
            if input_ix >= Term::BITS as usize {
                bail!(
                    "input label key {} is out of range: inputs are bits 0..{}",
                    input_ix,
                    Term::BITS
                );
            }
            labels.set_input(input_ix, label.as_str());
        }

        let mut function = LogicFunction::new();
        for (name, output) in &self.outputs {
            let output_ix = function.add_output(OutputFunction::new(
                output.on_set.iter().copied(),
                output.dc_set.iter().copied(),
            ))?;
            labels.set_output(output_ix, name.as_str());
        }
        if let Some(max_input) = labels.max_labeled_input() {
            function.set_min_input_width(max_input + 1);
        }

        Ok((function, labels))
    }
}
