// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    implicant::{Term, MAX_OUTPUTS},
    logic_function::{LogicFunction, OutputFunction},
};
use proptest::prelude::*;

/// The largest input width generated, to keep truth tables small.
const MAX_ARBITRARY_INPUT_WIDTH: usize = 12;

impl Arbitrary for OutputFunction {
    /// The input width.
    type Parameters = Option<usize>;
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(params: Self::Parameters) -> Self::Strategy {
        let input_width = params.unwrap_or(4);
        assert!(
            input_width <= MAX_ARBITRARY_INPUT_WIDTH,
            "input width {} must be at most {}",
            input_width,
            MAX_ARBITRARY_INPUT_WIDTH
        );

        // Each term is off, on or a don't care, with off and on twice as likely as don't care.
        let value_strategy = prop_oneof![
            2 => Just(Some(false)),
            2 => Just(Some(true)),
            1 => Just(None::<bool>),
        ];
        prop::collection::vec(value_strategy, 1_usize << input_width)
            .prop_map(|values| {
                let mut on_set = Vec::new();
                let mut dc_set = Vec::new();
                for (term, value) in values.into_iter().enumerate() {
                    match value {
                        Some(true) => on_set.push(term as Term),
                        Some(false) => {}
                        None => dc_set.push(term as Term),
                    }
                }
                OutputFunction::new(on_set, dc_set)
            })
            .boxed()
    }
}

impl Arbitrary for LogicFunction {
    /// The input width and the number of outputs.
    type Parameters = Option<(usize, usize)>;
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(params: Self::Parameters) -> Self::Strategy {
        let (input_width, output_count) = params.unwrap_or((4, 2));
        assert!(
            output_count <= MAX_OUTPUTS,
            "output count {} must be at most {}",
            output_count,
            MAX_OUTPUTS
        );

        prop::collection::vec(any_with::<OutputFunction>(Some(input_width)), output_count)
            .prop_map(move |outputs| {
                let mut function = LogicFunction::new();
                function.set_min_input_width(input_width);
                for output in outputs {
                    function
                        .add_output(output)
                        .expect("output count was checked against capacity");
                }
                function
            })
            .boxed()
    }
}
