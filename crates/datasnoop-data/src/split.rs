//! Random train/test partition.
//!
//! Holding back a test subset that no modelling decision ever looks at is the
//! simplest guard against data snooping: whatever was tuned on the training
//! rows is judged once on rows it has never seen.

use rand::{Rng, seq::SliceRandom as _};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SplitError {
    #[display("test fraction must be in (0, 1), got {fraction}")]
    InvalidTestFraction { fraction: f64 },
    #[display("splitting {n_samples} samples with {n_test} test samples leaves an empty subset")]
    EmptySubset { n_samples: usize, n_test: usize },
}

/// Row indices of a train/test partition.
///
/// The two index lists are disjoint and together cover `0..n_samples`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffles `0..n_samples` with `rng` and cuts it into test and train indices.
///
/// The test subset takes `ceil(test_fraction * n_samples)` indices, the
/// training subset the rest. The same generator state always yields the same
/// partition.
///
/// # Examples
///
/// ```
/// use datasnoop_data::{seeded_rng, split::train_test_split};
///
/// let split = train_test_split(100, 0.2, &mut seeded_rng(42)).unwrap();
/// assert_eq!(split.train.len(), 80);
/// assert_eq!(split.test.len(), 20);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn train_test_split<R>(
    n_samples: usize,
    test_fraction: f64,
    rng: &mut R,
) -> Result<SplitIndices, SplitError>
where
    R: Rng + ?Sized,
{
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidTestFraction {
            fraction: test_fraction,
        });
    }

    let n_test = (test_fraction * n_samples as f64).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(SplitError::EmptySubset { n_samples, n_test });
    }

    let mut indices = (0..n_samples).collect::<Vec<_>>();
    indices.shuffle(rng);
    let train = indices.split_off(n_test);

    Ok(SplitIndices {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeded_rng;

    #[test]
    fn test_disjoint_and_covering() {
        let split = train_test_split(100, 0.2, &mut seeded_rng(42)).unwrap();

        let mut all = split
            .train
            .iter()
            .chain(&split.test)
            .copied()
            .collect::<Vec<_>>();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_partition() {
        let a = train_test_split(100, 0.2, &mut seeded_rng(42)).unwrap();
        let b = train_test_split(100, 0.2, &mut seeded_rng(42)).unwrap();
        let c = train_test_split(100, 0.2, &mut seeded_rng(7)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_test_size_rounds_up() {
        let split = train_test_split(11, 0.25, &mut seeded_rng(0)).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn test_invalid_fraction() {
        for fraction in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                train_test_split(100, fraction, &mut seeded_rng(0)),
                Err(SplitError::InvalidTestFraction { .. })
            ));
        }
    }

    #[test]
    fn test_empty_subset() {
        assert_eq!(
            train_test_split(0, 0.2, &mut seeded_rng(0)),
            Err(SplitError::EmptySubset {
                n_samples: 0,
                n_test: 0
            })
        );
        assert_eq!(
            train_test_split(1, 0.5, &mut seeded_rng(0)),
            Err(SplitError::EmptySubset {
                n_samples: 1,
                n_test: 1
            })
        );
    }
}
