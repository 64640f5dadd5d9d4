//! Demonstrations of data snooping.
//!
//! Data snooping happens when one dataset is analysed again and again (new
//! features, new models, new thresholds) until something looks significant.
//! Each test may be honest on its own, but with enough tries noise alone
//! produces findings that do not hold on new data: in-sample fits look
//! convincing, a strategy works only on the period it was designed on, and a
//! long list of uncorrected p-values contains a few small ones.
//!
//! The usual defences:
//!
//! - **Predefine hypotheses.** Decide what to test before looking at the data.
//! - **Hold out a test set.** Tune on the training rows only and evaluate on
//!   the test rows once, at the end (`split`).
//! - **Cross-validate.** Look at how much the score moves between folds, not
//!   only at its best value (`cross-validate`).
//! - **Regularize.** Penalize large coefficients so the model cannot follow
//!   every wiggle of the training rows (`ridge`).
//! - **Correct for multiple comparisons.** Test each of `m` hypotheses at
//!   `alpha / m` to keep the family-wise error rate at `alpha` (`correct`).
//!
//! Every step runs on a seeded synthetic table whose `returns` and `volume`
//! columns are independent, so any apparent predictive power is noise.

use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod demo;
mod report;
mod util;

fn main() -> anyhow::Result<()> {
    init_logging();
    command::run()
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
