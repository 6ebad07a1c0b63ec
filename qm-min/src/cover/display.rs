// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{cover::Cover, implicant::Implicant};
use itertools::{Itertools, Position};
use std::{borrow::Cow, collections::BTreeMap, fmt};

/// Names for inputs and outputs, used when rendering a cover.
///
/// Inputs without a label are written `x0`, `x1`, ...; outputs without a label are written
/// `f0`, `f1`, ...
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labels {
    inputs: BTreeMap<usize, String>,
    outputs: BTreeMap<usize, String>,
}

impl Labels {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input_ix: usize, label: impl Into<String>) -> Self {
        self.set_input(input_ix, label);
        self
    }

    pub fn with_output(mut self, output_ix: usize, label: impl Into<String>) -> Self {
        self.set_output(output_ix, label);
        self
    }

    pub fn set_input(&mut self, input_ix: usize, label: impl Into<String>) {
        self.inputs.insert(input_ix, label.into());
    }

    pub fn set_output(&mut self, output_ix: usize, label: impl Into<String>) {
        self.outputs.insert(output_ix, label.into());
    }

    /// Returns the largest input index with an explicit label.
    pub fn max_labeled_input(&self) -> Option<usize> {
        self.inputs.keys().next_back().copied()
    }

    pub fn input(&self, input_ix: usize) -> Cow<'_, str> {
        match self.inputs.get(&input_ix) {
            Some(label) => Cow::Borrowed(label),
            None => Cow::Owned(format!("x{}", input_ix)),
        }
    }

    pub fn output(&self, output_ix: usize) -> Cow<'_, str> {
        match self.outputs.get(&output_ix) {
            Some(label) => Cow::Borrowed(label),
            None => Cow::Owned(format!("f{}", output_ix)),
        }
    }
}

/// Displays a cover as one equation per output, e.g. `f0 = a'.b + c`.
#[derive(Clone, Debug)]
pub struct CoverAlgebraicDisplay<'a> {
    cover: &'a Cover,
    labels: &'a Labels,
    separator: (Cow<'a, str>, bool),
}

impl<'a> CoverAlgebraicDisplay<'a> {
    pub fn new(cover: &'a Cover, labels: &'a Labels) -> Self {
        Self {
            cover,
            labels,
            separator: (Cow::Borrowed("\n"), true),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<Cow<'a, str>>, print_last: bool) -> Self {
        self.separator = (separator.into(), print_last);
        self
    }

    fn fmt_implicant(&self, implicant: &Implicant, f: &mut fmt::Formatter) -> fmt::Result {
        let input_width = self.cover.input_width();
        let fixed_bits = (0..input_width)
            .rev()
            .filter(|&bit| (implicant.dont_care_mask() >> bit) & 1 == 0);

        let mut any_literal = false;
        for bit in fixed_bits {
            if any_literal {
                write!(f, ".")?;
            }
            write!(f, "{}", self.labels.input(bit))?;
            if (implicant.literals() >> bit) & 1 == 0 {
                write!(f, "'")?;
            }
            any_literal = true;
        }

        if !any_literal {
            // Every input is free.
            write!(f, "1")?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for CoverAlgebraicDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (separator, print_last) = &self.separator;
        let output_count = self.cover.output_count();

        for output_ix in 0..output_count {
            write!(f, "{} = ", self.labels.output(output_ix))?;

            let mut any_implicant = false;
            for position in self.cover.output_component(output_ix).with_position() {
                let (implicant, last) = match position {
                    Position::First(implicant) | Position::Middle(implicant) => (implicant, false),
                    Position::Last(implicant) | Position::Only(implicant) => (implicant, true),
                };
                self.fmt_implicant(implicant, f)?;
                if !last {
                    write!(f, " + ")?;
                }
                any_implicant = true;
            }
            if !any_implicant {
                write!(f, "0")?;
            }

            if output_ix < output_count - 1 || *print_last {
                write!(f, "{}", separator)?;
            }
        }

        Ok(())
    }
}

/// Displays a cover as a matrix, one implicant per row, e.g. `1 - 0 | 1 0`.
///
/// Inputs are written most significant first. Outputs are written in index order.
#[derive(Clone, Debug)]
pub struct CoverMatrixDisplay<'a> {
    cover: &'a Cover,
    format: MatrixDisplayFormat,
    internal_separator: Cow<'a, str>,
    input_output_separator: Cow<'a, str>,
    implicant_separator: (Cow<'a, str>, bool),
}

impl<'a> CoverMatrixDisplay<'a> {
    pub fn new(cover: &'a Cover) -> Self {
        Self {
            cover,
            format: MatrixDisplayFormat::default(),
            internal_separator: Cow::Borrowed(" "),
            input_output_separator: Cow::Borrowed(" | "),
            implicant_separator: (Cow::Borrowed("\n"), true),
        }
    }

    pub fn with_format(mut self, format: MatrixDisplayFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_internal_separator(mut self, separator: impl Into<Cow<'a, str>>) -> Self {
        self.internal_separator = separator.into();
        self
    }

    pub fn with_input_output_separator(mut self, separator: impl Into<Cow<'a, str>>) -> Self {
        self.input_output_separator = separator.into();
        self
    }

    pub fn with_implicant_separator(
        mut self,
        separator: impl Into<Cow<'a, str>>,
        print_last: bool,
    ) -> Self {
        self.implicant_separator = (separator.into(), print_last);
        self
    }

    fn fmt_implicant(&self, implicant: &Implicant, f: &mut fmt::Formatter) -> fmt::Result {
        let input_width = self.cover.input_width();
        let output_count = self.cover.output_count();

        for (ix, bit) in (0..input_width).rev().enumerate() {
            let input = if (implicant.dont_care_mask() >> bit) & 1 == 1 {
                None
            } else {
                Some((implicant.literals() >> bit) & 1 == 1)
            };
            write!(f, "{}", self.format.char_for_input(input))?;
            if ix < input_width - 1 {
                write!(f, "{}", self.internal_separator)?;
            }
        }

        if input_width > 0 && output_count > 0 {
            write!(f, "{}", self.input_output_separator)?;
        }

        for output_ix in 0..output_count {
            let output = implicant.applies_to(output_ix);
            write!(f, "{}", self.format.char_for_output(output))?;
            if output_ix < output_count - 1 {
                write!(f, "{}", self.internal_separator)?;
            }
        }

        Ok(())
    }
}

impl<'a> fmt::Display for CoverMatrixDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let implicant_count = self.cover.implicant_count();
        let (separator, print_last) = &self.implicant_separator;

        for (ix, implicant) in self.cover.implicants().iter().enumerate() {
            self.fmt_implicant(implicant, f)?;
            if *print_last || ix < implicant_count - 1 {
                write!(f, "{}", separator)?;
            }
        }

        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatrixDisplayFormat {
    /// Display a cover using the format `100-1 | 10`, with dashes representing free inputs.
    Dashes,

    /// Display a cover using the format `10021 | 43`, the numeric notation used by Espresso.
    Numeric,
}

impl MatrixDisplayFormat {
    /// Returns the character that would be displayed for an input.
    pub fn char_for_input(self, input: Option<bool>) -> char {
        match input {
            Some(true) => '1',
            Some(false) => '0',
            None => match self {
                Self::Dashes => '-',
                Self::Numeric => '2',
            },
        }
    }

    /// Returns the character that would be displayed for an output.
    pub fn char_for_output(self, output: bool) -> char {
        match (self, output) {
            (Self::Dashes, true) => '1',
            (Self::Dashes, false) => '0',
            (Self::Numeric, true) => '4',
            (Self::Numeric, false) => '3',
        }
    }
}

impl Default for MatrixDisplayFormat {
    fn default() -> Self {
        Self::Dashes
    }
}
