// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-output two-level logic minimization with the tabulation (Quine-McCluskey) method.
//!
//! ```
//! use qm_min::{cover::Labels, minimizer::Minimizer};
//!
//! let mut minimizer = Minimizer::new();
//! minimizer.add_output([0, 1, 2], []).unwrap();
//! let cover = minimizer.minimum_cost_cover().unwrap();
//!
//! assert_eq!(
//!     cover.algebraic_display(&Labels::new()).to_string(),
//!     "f0 = x1' + x0'\n",
//! );
//! ```

pub mod cover;
pub mod errors;
pub mod implicant;
pub mod logic_function;
pub mod minimizer;
#[cfg(any(test, feature = "proptest1"))]
mod proptest_helpers;
pub mod table;
