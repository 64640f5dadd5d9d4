//! Statistical helpers for the data-snooping demonstrations.
//!
//! - [`descriptive`]: summary statistics for the synthetic columns and for
//!   cross-validation scores
//! - [`multiple_testing`]: Bonferroni correction of a family of p-values
//!
//! # Examples
//!
//! ```
//! use datasnoop_stats::{descriptive::DescriptiveStats, multiple_testing::bonferroni};
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!(stats.mean, 3.0);
//!
//! let correction = bonferroni(&[0.01, 0.2], 0.05).unwrap();
//! assert_eq!(correction.reject, vec![true, false]);
//! ```

pub mod descriptive;
pub mod multiple_testing;
