//! Synthetic daily market table.
//!
//! The table has three aligned columns: a date, a `returns` value drawn from
//! N(0, 1), and a `volume` value drawn from N(0, 1) and scaled. Nothing links
//! returns to volume, so any "relationship" a model finds between the two is
//! noise, which is exactly what the demonstrations need.

use std::iter;

use chrono::{Days, NaiveDate};
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::{Distribution as _, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::split::{self, SplitError, SplitIndices};

/// First date of the generated table unless configured otherwise.
pub const DEFAULT_START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2023, 1, 1) {
    Some(date) => date,
    None => panic!("invalid default start date"),
};

/// Shape of a generated [`MarketTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Number of rows (one per day).
    pub rows: usize,
    /// Date of the first row.
    pub start_date: NaiveDate,
    /// Factor applied to the standard-normal volume draws.
    pub volume_scale: f64,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            rows: 100,
            start_date: DEFAULT_START_DATE,
            volume_scale: 100.0,
        }
    }
}

impl TableSpec {
    /// Date of the last row, or `None` for an empty table.
    pub fn end_date(&self) -> Result<Option<NaiveDate>, TableSpecError> {
        let Some(last) = self.rows.checked_sub(1) else {
            return Ok(None);
        };
        u64::try_from(last)
            .ok()
            .and_then(|days| self.start_date.checked_add_days(Days::new(days)))
            .map(Some)
            .ok_or(TableSpecError {
                rows: self.rows,
                start_date: self.start_date,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{rows} daily rows from {start_date} run past the last representable date")]
pub struct TableSpecError {
    pub rows: usize,
    pub start_date: NaiveDate,
}

/// One day of synthetic data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
    pub date: NaiveDate,
    pub returns: f64,
    pub volume: f64,
}

/// Synthetic table of [`MarketRow`]s, columns aligned by index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketTable {
    rows: Vec<MarketRow>,
}

/// A table partitioned into disjoint training and testing subsets.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSplit {
    pub train: MarketTable,
    pub test: MarketTable,
    /// Row indices of the original table backing each subset.
    pub indices: SplitIndices,
}

impl MarketTable {
    /// Generates a table from `rng`.
    ///
    /// All returns are drawn first, then all volumes, so a given seed always
    /// yields the same two columns regardless of how the rows are consumed.
    ///
    /// Fails without drawing anything if the dates would overflow.
    ///
    /// # Examples
    ///
    /// ```
    /// use datasnoop_data::{market::{MarketTable, TableSpec}, seeded_rng};
    ///
    /// let spec = TableSpec::default();
    /// let a = MarketTable::generate(&spec, &mut seeded_rng(42)).unwrap();
    /// let b = MarketTable::generate(&spec, &mut seeded_rng(42)).unwrap();
    /// assert_eq!(a.len(), 100);
    /// assert_eq!(a, b);
    /// ```
    pub fn generate<R>(spec: &TableSpec, rng: &mut R) -> Result<Self, TableSpecError>
    where
        R: Rng + ?Sized,
    {
        spec.end_date()?;

        let returns = (0..spec.rows)
            .map(|_| StandardNormal.sample(rng))
            .collect::<Vec<f64>>();
        let volume = (0..spec.rows)
            .map(|_| {
                let z: f64 = StandardNormal.sample(rng);
                z * spec.volume_scale
            })
            .collect::<Vec<f64>>();

        // `iter_days` never yields `NaiveDate::MAX`
        let dates = iter::successors(Some(spec.start_date), NaiveDate::succ_opt);
        let rows = dates
            .zip(returns)
            .zip(volume)
            .map(|((date, returns), volume)| MarketRow {
                date,
                returns,
                volume,
            })
            .collect();
        Ok(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[MarketRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    pub fn returns(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.returns)
    }

    pub fn volume(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.volume)
    }

    /// Design matrix with the `volume` column as the single feature.
    #[must_use]
    pub fn features(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows.len(), 1), |(i, _)| self.rows[i].volume)
    }

    /// Target vector, the `returns` column.
    #[must_use]
    pub fn targets(&self) -> Array1<f64> {
        self.returns().collect()
    }

    /// Builds a sub-table from row `indices`, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&i| self.rows[i]).collect(),
        }
    }

    /// Randomly partitions the table into training and testing subsets.
    ///
    /// See [`split::train_test_split`] for how the subset sizes are chosen.
    pub fn train_test_split<R>(
        &self,
        test_fraction: f64,
        rng: &mut R,
    ) -> Result<TableSplit, SplitError>
    where
        R: Rng + ?Sized,
    {
        let indices = split::train_test_split(self.len(), test_fraction, rng)?;
        Ok(TableSplit {
            train: self.select(&indices.train),
            test: self.select(&indices.test),
            indices,
        })
    }
}
