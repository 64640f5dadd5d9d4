use std::io::{self, Write};

use chrono::NaiveDate;
use datasnoop_data::market::MarketRow;
use datasnoop_model::cross_validation::CvScores;
use datasnoop_stats::{descriptive::DescriptiveStats, multiple_testing::BonferroniCorrection};
use serde::Serialize;

use crate::config::DemoConfig;

/// Results of the demonstration steps that were run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub config: DemoConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_validation: Option<CrossValidationSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ridge: Option<RidgeSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<CorrectionSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSection {
    pub rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub returns: Option<DescriptiveStats>,
    pub volume: Option<DescriptiveStats>,
    /// Leading rows of the table.
    pub head: Vec<MarketRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitSection {
    pub test_fraction: f64,
    pub seed: u64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub disjoint: bool,
    pub covers_table: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidationSection {
    pub folds: usize,
    pub scores: CvScores,
}

/// Coefficients and scores of one fitted model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub train_r2: f64,
    pub test_r2: f64,
    pub test_mse: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RidgeSection {
    pub alpha: f64,
    pub ridge: FitSummary,
    /// Unpenalized fit on the same split, for comparison.
    pub ols: FitSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionSection {
    pub naive_discoveries: usize,
    pub discoveries: usize,
    pub bonferroni: BonferroniCorrection,
}

impl Report {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            config,
            dataset: None,
            split: None,
            cross_validation: None,
            ridge: None,
            correction: None,
        }
    }

    pub fn write_text<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        writeln!(w, "Data snooping demonstrations (seed {})", self.config.seed)?;
        if let Some(section) = &self.dataset {
            writeln!(w)?;
            section.write_text(w)?;
        }
        if let Some(section) = &self.split {
            writeln!(w)?;
            section.write_text(w)?;
        }
        if let Some(section) = &self.cross_validation {
            writeln!(w)?;
            section.write_text(w)?;
        }
        if let Some(section) = &self.ridge {
            writeln!(w)?;
            section.write_text(w)?;
        }
        if let Some(section) = &self.correction {
            writeln!(w)?;
            section.write_text(w)?;
        }
        Ok(())
    }
}

fn write_stats<W>(w: &mut W, name: &str, stats: Option<&DescriptiveStats>) -> io::Result<()>
where
    W: Write + ?Sized,
{
    match stats {
        Some(s) => writeln!(
            w,
            "  {name:<8} mean {:>9.4}  std {:>9.4}  min {:>9.4}  max {:>9.4}",
            s.mean, s.std_dev, s.min, s.max
        ),
        None => writeln!(w, "  {name:<8} (empty)"),
    }
}

impl DatasetSection {
    fn write_text<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        writeln!(w, "Synthetic dataset")?;
        match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => {
                writeln!(w, "  {} daily rows, {first} to {last}", self.rows)?;
            }
            _ => writeln!(w, "  {} rows", self.rows)?,
        }
        write_stats(w, "returns", self.returns.as_ref())?;
        write_stats(w, "volume", self.volume.as_ref())?;
        for row in &self.head {
            writeln!(
                w,
                "  {}  {:>9.4}  {:>10.4}",
                row.date, row.returns, row.volume
            )?;
        }
        Ok(())
    }
}

impl SplitSection {
    fn write_text<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        writeln!(
            w,
            "Train/test split (test fraction {}, seed {})",
            self.test_fraction, self.seed
        )?;
        writeln!(
            w,
            "  train {} rows, test {} rows, disjoint: {}, covers table: {}",
            self.train_rows, self.test_rows, self.disjoint, self.covers_table
        )?;
        writeln!(
            w,
            "  The test rows stay untouched until the final evaluation."
        )
    }
}

impl CrossValidationSection {
    fn write_text<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        writeln!(w, "{}-fold cross-validation (linear regression, R²)", self.folds)?;
        for (fold, score) in self.scores.scores.iter().enumerate() {
            writeln!(w, "  fold {fold}: {score:>8.4}")?;
        }
        writeln!(
            w,
            "  mean {:.4} (+/- {:.4})",
            self.scores.mean(),
            self.scores.std_dev() * 2.0
        )
    }
}

impl FitSummary {
    fn write_text<W>(&self, w: &mut W, name: &str) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        writeln!(
            w,
            "  {name:<6} coef {:.6?}  intercept {:>8.4}  train R² {:>8.4}  test R² {:>8.4}  test MSE {:>8.4}",
            self.coefficients, self.intercept, self.train_r2, self.test_r2, self.test_mse
        )
    }
}

impl RidgeSection {
    fn write_text<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        writeln!(w, "Ridge regression (alpha {})", self.alpha)?;
        self.ridge.write_text(w, "ridge")?;
        self.ols.write_text(w, "ols")
    }
}

impl CorrectionSection {
    fn write_text<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        let b = &self.bonferroni;
        writeln!(
            w,
            "Bonferroni correction ({} tests, alpha {}, per-test alpha {:.4})",
            b.p_values.len(),
            b.alpha,
            b.corrected_alpha
        )?;
        for (i, (raw, corrected)) in b.p_values.iter().zip(&b.corrected).enumerate() {
            writeln!(
                w,
                "  #{i:<2} p {raw:.4} -> {corrected:.4}  naive: {:<5}  corrected: {}",
                b.naive_reject[i], b.reject[i]
            )?;
        }
        writeln!(
            w,
            "  significant without correction: {}, after correction: {}",
            self.naive_discoveries, self.discoveries
        )
    }
}
