use clap::{Parser, Subcommand};
use tracing::info;

use crate::{
    config::ConfigArg,
    demo::{self, Steps},
};

use self::output::OutputArg;

mod output;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    config: ConfigArg,
    #[clap(flatten)]
    output: OutputArg,
    /// Which demonstration to run (all of them by default)
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Mode {
    /// Run every demonstration in order
    #[default]
    Run,
    /// Generate and summarize the synthetic table
    Dataset,
    /// Partition the table into training and testing subsets
    Split,
    /// Cross-validate a linear model over k folds
    CrossValidate,
    /// Fit ridge regression on the training subset and score it on the testing subset
    Ridge,
    /// Apply the Bonferroni correction to synthetic p-values
    Correct,
}

impl Mode {
    fn steps(self) -> Steps {
        match self {
            Mode::Run => Steps::ALL,
            Mode::Dataset => Steps {
                dataset: true,
                ..Steps::NONE
            },
            Mode::Split => Steps {
                split: true,
                ..Steps::NONE
            },
            Mode::CrossValidate => Steps {
                cross_validation: true,
                ..Steps::NONE
            },
            Mode::Ridge => Steps {
                ridge: true,
                ..Steps::NONE
            },
            Mode::Correct => Steps {
                correction: true,
                ..Steps::NONE
            },
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs {
        config,
        output,
        mode,
    } = CommandArgs::parse();
    let config = config.load()?;
    let mode = mode.unwrap_or_default();
    info!(?mode, seed = config.seed, "running demonstrations");

    let report = demo::run(&config, mode.steps())?;
    output.write_report(&report)
}
