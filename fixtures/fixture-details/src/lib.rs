// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod all;
mod details;
mod document;
mod value_generator;

pub use all::*;
pub use details::*;
pub use document::*;
pub use value_generator::*;
