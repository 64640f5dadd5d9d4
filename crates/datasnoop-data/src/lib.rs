//! Seeded synthetic data for the data-snooping demonstrations.
//!
//! # Modules
//!
//! - [`market`]: a daily table of `returns` and `volume` drawn from independent
//!   normal distributions
//! - [`split`]: random train/test partition of row indices
//! - [`pvalues`]: uniformly drawn p-values for the multiple-comparisons step
//!
//! Every generator takes an explicit random number generator. Use
//! [`seeded_rng`] to get the deterministic one used throughout the project:
//! the same seed reproduces the same table, partition and p-values.
//!
//! # Examples
//!
//! ```
//! use datasnoop_data::{
//!     market::{MarketTable, TableSpec},
//!     pvalues::uniform_p_values,
//!     seeded_rng,
//! };
//!
//! let mut rng = seeded_rng(42);
//! let table = MarketTable::generate(&TableSpec::default(), &mut rng).unwrap();
//! let p_values = uniform_p_values(10, 0.01, 0.1, &mut rng).unwrap();
//!
//! let split = table.train_test_split(0.2, &mut seeded_rng(42)).unwrap();
//! assert_eq!(split.train.len() + split.test.len(), table.len());
//! assert_eq!(p_values.len(), 10);
//! ```

use rand::SeedableRng as _;
use rand_pcg::Pcg32;

pub mod market;
pub mod pvalues;
pub mod split;

/// Random number generator used for all synthetic data.
pub type DemoRng = Pcg32;

/// Creates a [`DemoRng`] deterministically derived from `seed`.
#[must_use]
pub fn seeded_rng(seed: u64) -> DemoRng {
    Pcg32::seed_from_u64(seed)
}
