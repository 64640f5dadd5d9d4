//! K-fold cross-validation.
//!
//! A single train/test split gives one noisy estimate of out-of-sample
//! performance, and picking whichever model wins on that one split is itself
//! a form of snooping. K-fold cross-validation rotates the held-out part
//! through the whole dataset and reports one score per fold, so the spread
//! of the scores is visible next to their mean.

use datasnoop_stats::descriptive::DescriptiveStats;
use ndarray::{Array1, Array2, Axis};
use rand::{Rng, seq::SliceRandom as _};
use serde::Serialize;

use crate::{error::ModelError, linear::Regressor};

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CrossValidationError {
    #[display("number of folds must be at least 2, got {n_splits}")]
    TooFewFolds { n_splits: usize },
    #[display("cannot split {n_samples} samples into {n_splits} folds")]
    TooManyFolds { n_splits: usize, n_samples: usize },
    #[display("no folds to evaluate")]
    NoFolds,
    #[display("dimension mismatch: {rows} feature rows, {targets} targets")]
    DimensionMismatch { rows: usize, targets: usize },
    #[display("fold #{fold}: {source}")]
    Fold { fold: usize, source: ModelError },
}

/// Sample indices of one fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoldSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// K-fold splitter.
///
/// Folds are contiguous runs of the (optionally shuffled) sample indices. When
/// `n_samples` is not a multiple of `n_splits`, the first `n_samples % n_splits`
/// folds hold one extra sample.
///
/// # Examples
///
/// ```
/// use datasnoop_model::cross_validation::KFold;
///
/// let folds = KFold::new(5).split(100).unwrap();
/// assert_eq!(folds.len(), 5);
/// assert_eq!(folds[0].test, (0..20).collect::<Vec<_>>());
/// assert_eq!(folds[0].train.len(), 80);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    #[must_use]
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Splits `0..n_samples` in order.
    pub fn split(&self, n_samples: usize) -> Result<Vec<FoldSplit>, CrossValidationError> {
        self.split_indices(&(0..n_samples).collect::<Vec<_>>())
    }

    /// Shuffles `0..n_samples` with `rng` before splitting.
    pub fn shuffled_split<R>(
        &self,
        n_samples: usize,
        rng: &mut R,
    ) -> Result<Vec<FoldSplit>, CrossValidationError>
    where
        R: Rng + ?Sized,
    {
        let mut indices = (0..n_samples).collect::<Vec<_>>();
        indices.shuffle(rng);
        self.split_indices(&indices)
    }

    fn split_indices(&self, indices: &[usize]) -> Result<Vec<FoldSplit>, CrossValidationError> {
        let n_splits = self.n_splits;
        let n_samples = indices.len();
        if n_splits < 2 {
            return Err(CrossValidationError::TooFewFolds { n_splits });
        }
        if n_splits > n_samples {
            return Err(CrossValidationError::TooManyFolds {
                n_splits,
                n_samples,
            });
        }

        let base = n_samples / n_splits;
        let extra = n_samples % n_splits;
        let mut start = 0;
        let folds = (0..n_splits)
            .map(|fold| {
                let end = start + base + usize::from(fold < extra);
                let split = FoldSplit {
                    train: indices[..start]
                        .iter()
                        .chain(&indices[end..])
                        .copied()
                        .collect(),
                    test: indices[start..end].to_vec(),
                };
                start = end;
                split
            })
            .collect();
        Ok(folds)
    }
}

/// Per-fold scores of a cross-validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvScores {
    /// R² on each held-out fold, in fold order.
    pub scores: Vec<f64>,
    /// Summary of `scores`.
    pub summary: DescriptiveStats,
}

impl CvScores {
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.summary.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.summary.std_dev
    }
}

/// Fits a fresh model from `make_model` on the training part of each fold and
/// scores it (R²) on the held-out part.
///
/// # Panics
///
/// Panics if a fold refers to a row outside `x`.
///
/// # Examples
///
/// ```
/// use datasnoop_model::{
///     cross_validation::{KFold, cross_val_score},
///     linear::LinearRegression,
/// };
/// use ndarray::{Array1, Array2};
///
/// let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
/// let y = Array1::from_shape_fn(10, |i| 2.0 * i as f64 + 1.0);
/// let folds = KFold::new(5).split(10).unwrap();
///
/// let cv = cross_val_score(LinearRegression::new, &x, &y, &folds).unwrap();
/// assert_eq!(cv.scores.len(), 5);
/// assert!(cv.scores.iter().all(|s| (s - 1.0).abs() < 1e-9));
/// ```
pub fn cross_val_score<M, F>(
    mut make_model: F,
    x: &Array2<f64>,
    y: &Array1<f64>,
    folds: &[FoldSplit],
) -> Result<CvScores, CrossValidationError>
where
    M: Regressor,
    F: FnMut() -> M,
{
    if x.nrows() != y.len() {
        return Err(CrossValidationError::DimensionMismatch {
            rows: x.nrows(),
            targets: y.len(),
        });
    }

    let scores = folds
        .iter()
        .enumerate()
        .map(|(fold, split)| {
            let x_train = x.select(Axis(0), &split.train);
            let y_train = y.select(Axis(0), &split.train);
            let x_test = x.select(Axis(0), &split.test);
            let y_test = y.select(Axis(0), &split.test);

            let mut model = make_model();
            model
                .fit(&x_train, &y_train)
                .and_then(|()| model.score(&x_test, &y_test))
                .map_err(|source| CrossValidationError::Fold { fold, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let summary =
        DescriptiveStats::new(scores.iter().copied()).ok_or(CrossValidationError::NoFolds)?;
    Ok(CvScores { scores, summary })
}

#[cfg(test)]
mod tests {
    use datasnoop_data::{
        market::{MarketTable, TableSpec},
        seeded_rng,
    };

    use super::*;
    use crate::linear::{LinearRegression, RidgeRegression};

    #[test]
    fn test_fold_sizes_with_remainder() {
        let folds = KFold::new(5).split(101).unwrap();
        let sizes = folds.iter().map(|f| f.test.len()).collect::<Vec<_>>();
        assert_eq!(sizes, vec![21, 20, 20, 20, 20]);
        for fold in &folds {
            assert_eq!(fold.train.len() + fold.test.len(), 101);
            assert!(fold.test.iter().all(|i| !fold.train.contains(i)));
        }
    }

    #[test]
    fn test_test_folds_cover_every_sample_once() {
        let folds = KFold::new(3)
            .shuffled_split(10, &mut seeded_rng(5))
            .unwrap();
        let mut all = folds
            .iter()
            .flat_map(|f| f.test.iter().copied())
            .collect::<Vec<_>>();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_invalid_fold_counts() {
        assert_eq!(KFold::new(1).n_splits(), 1);
        assert_eq!(
            KFold::new(1).split(10),
            Err(CrossValidationError::TooFewFolds { n_splits: 1 })
        );
        assert_eq!(
            KFold::new(11).split(10),
            Err(CrossValidationError::TooManyFolds {
                n_splits: 11,
                n_samples: 10
            })
        );
    }

    #[test]
    fn test_five_folds_give_five_scores() {
        let table = MarketTable::generate(&TableSpec::default(), &mut seeded_rng(42)).unwrap();
        let folds = KFold::new(5).split(table.len()).unwrap();
        let cv = cross_val_score(
            LinearRegression::new,
            &table.features(),
            &table.targets(),
            &folds,
        )
        .unwrap();

        assert_eq!(cv.scores.len(), 5);
        assert_eq!(cv.summary.count, 5);
        assert!(cv.scores.iter().all(|s| s.is_finite()));
        // no signal to find: held-out scores hover around zero or below
        assert!(cv.mean() < 0.2);
    }

    #[test]
    fn test_fold_failure_reports_fold_index() {
        // the second fold trains only on rows with the same feature value
        let x = Array2::from_shape_vec((4, 1), vec![0.0, 0.0, 1.0, 2.0]).unwrap();
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let folds = KFold::new(2).split(4).unwrap();

        let err = cross_val_score(LinearRegression::new, &x, &y, &folds).unwrap_err();
        assert_eq!(
            err,
            CrossValidationError::Fold {
                fold: 1,
                source: ModelError::NotPositiveDefinite
            }
        );

        let cv = cross_val_score(|| RidgeRegression::new(1.0).unwrap(), &x, &y, &folds).unwrap();
        assert_eq!(cv.scores.len(), 2);
    }

    #[test]
    fn test_dimension_mismatch() {
        let x = Array2::zeros((4, 1));
        let y = Array1::zeros(3);
        assert_eq!(
            cross_val_score(LinearRegression::new, &x, &y, &[]),
            Err(CrossValidationError::DimensionMismatch {
                rows: 4,
                targets: 3
            })
        );
    }

    #[test]
    fn test_no_folds() {
        let x = Array2::zeros((4, 1));
        let y = Array1::zeros(4);
        assert_eq!(
            cross_val_score(LinearRegression::new, &x, &y, &[]),
            Err(CrossValidationError::NoFolds)
        );
    }
}
