// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::implicant::Term;
use thiserror::Error;

/// Returned when adding an output to a function that already has the maximum number of outputs.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("cannot add output: all {capacity} output tag bits are in use")]
pub struct OutputCapacityExceeded {
    pub capacity: usize,
}

/// Returned when a selected cover does not reproduce the function it was computed for.
///
/// The cover selection is heuristic, so every cover is simulated against the function before it
/// is handed out. This error reports the first disagreement found.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("cover is incorrect for output {output_ix}: term {term} should evaluate to {expected}")]
pub struct IncorrectCover {
    pub output_ix: usize,
    pub term: Term,
    pub expected: bool,
}
