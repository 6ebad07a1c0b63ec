// Copyright (c) The qm-min Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use clap::{ArgEnum, Args, Parser};
use color_eyre::{eyre::WrapErr, Result};
use fixture_details::{AllFixtures, FixtureDetails};
use qm_min::{
    cover::MatrixDisplayFormat,
    minimizer::MinimizerOptions,
};

#[derive(Debug, Parser)]
pub struct FixtureManagerApp {
    #[clap(subcommand)]
    command: FixtureManagerCommand,
}

#[derive(Debug, Parser)]
pub enum FixtureManagerCommand {
    /// Minimize a function file and print the resulting cover.
    Minimize {
        /// Path to a JSON function file.
        path: Utf8PathBuf,

        #[clap(flatten)]
        options: MinimizeOpts,

        /// Output format.
        #[clap(long, arg_enum, default_value = "algebraic")]
        format: OutputFormat,
    },

    /// Generate random functions, minimizing and verifying each one.
    GenerateInputs {
        #[clap(long, short, default_value_t = 64)]
        count: usize,

        #[clap(long, default_value_t = 8)]
        input_width: usize,

        #[clap(long, default_value_t = 4)]
        outputs: usize,

        #[clap(flatten)]
        options: MinimizeOpts,

        /// Write generated functions to this directory.
        #[clap(long)]
        out_dir: Option<Utf8PathBuf>,
    },

    /// Minimize and verify every fixture in the data directory.
    CheckFixtures {
        #[clap(flatten)]
        options: MinimizeOpts,
    },
}

#[derive(Debug, Args)]
pub struct MinimizeOpts {
    /// Reduce weight classes on a single thread.
    #[clap(long)]
    sequential: bool,
}

impl MinimizeOpts {
    fn to_options(&self) -> MinimizerOptions {
        MinimizerOptions::new().with_parallel_reduction(!self.sequential)
    }
}

#[derive(Copy, Clone, Debug, ArgEnum)]
pub enum OutputFormat {
    Algebraic,
    Matrix,
    Numeric,
}

impl FixtureManagerApp {
    pub fn exec(self) -> Result<()> {
        self.command.exec()
    }
}

impl FixtureManagerCommand {
    pub fn exec(self) -> Result<()> {
        match self {
            Self::Minimize {
                path,
                options,
                format,
            } => {
                let fixture = FixtureDetails::load(&path)?;
                let cover = fixture.minimize(options.to_options())?;
                match format {
                    OutputFormat::Algebraic => {
                        print!("{}", cover.algebraic_display(fixture.labels()))
                    }
                    OutputFormat::Matrix => print!("{}", cover.matrix_display()),
                    OutputFormat::Numeric => print!(
                        "{}",
                        cover
                            .matrix_display()
                            .with_format(MatrixDisplayFormat::Numeric)
                    ),
                }
                Ok(())
            }
            Self::GenerateInputs {
                count,
                input_width,
                outputs,
                options,
                out_dir,
            } => {
                if let Some(out_dir) = &out_dir {
                    std::fs::create_dir_all(out_dir)
                        .wrap_err_with(|| format!("failed to create directory {}", out_dir))?;
                }
                let summary = AllFixtures::generate(
                    count,
                    input_width,
                    outputs,
                    options.to_options(),
                    out_dir.as_deref(),
                )?;
                println!(
                    "{} functions: {} primes, {} implicants, {} literals",
                    summary.function_count,
                    summary.prime_count,
                    summary.implicant_count,
                    summary.literal_count
                );
                Ok(())
            }
            Self::CheckFixtures { options } => {
                let all = AllFixtures::get();
                let options = options.to_options();
                for fixture in all.fixtures() {
                    let cover = fixture.minimize(options)?;
                    println!(
                        "{}: {} implicants, {} literals",
                        fixture.name(),
                        cover.implicant_count(),
                        cover.literal_count()
                    );
                }
                Ok(())
            }
        }
    }
}
