use std::collections::BTreeSet;

use anyhow::Context;
use datasnoop_data::{
    market::{MarketTable, TableSplit},
    pvalues::uniform_p_values,
    seeded_rng,
};
use datasnoop_model::{
    cross_validation::{KFold, cross_val_score},
    linear::{LinearFit, LinearRegression, Regressor, RidgeRegression},
    metrics,
};
use datasnoop_stats::{descriptive::DescriptiveStats, multiple_testing};
use tracing::{debug, info};

use crate::{
    config::DemoConfig,
    report::{
        CorrectionSection, CrossValidationSection, DatasetSection, FitSummary, Report,
        RidgeSection, SplitSection,
    },
};

const HEAD_ROWS: usize = 5;

/// Which steps a command runs.
#[expect(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steps {
    pub dataset: bool,
    pub split: bool,
    pub cross_validation: bool,
    pub ridge: bool,
    pub correction: bool,
}

impl Steps {
    pub const ALL: Self = Self {
        dataset: true,
        split: true,
        cross_validation: true,
        ridge: true,
        correction: true,
    };
    pub const NONE: Self = Self {
        dataset: false,
        split: false,
        cross_validation: false,
        ridge: false,
        correction: false,
    };
}

/// Synthetic inputs shared by the steps.
///
/// The table and the p-values come from one generator stream seeded with
/// `config.seed`, table first, so the p-values do not depend on which steps run.
#[derive(Debug, Clone)]
pub struct SyntheticData {
    pub table: MarketTable,
    pub p_values: Vec<f64>,
}

impl SyntheticData {
    pub fn generate(config: &DemoConfig) -> anyhow::Result<Self> {
        let mut rng = seeded_rng(config.seed);
        let table = MarketTable::generate(&config.table_spec(), &mut rng)
            .context("Failed to generate the synthetic table")?;
        let p_values = uniform_p_values(
            config.p_value_count,
            config.p_value_low,
            config.p_value_high,
            &mut rng,
        )
        .context("Failed to draw synthetic p-values")?;
        debug!(
            rows = table.len(),
            p_values = p_values.len(),
            "generated synthetic data"
        );
        Ok(Self { table, p_values })
    }
}

pub fn run(config: &DemoConfig, steps: Steps) -> anyhow::Result<Report> {
    let data = SyntheticData::generate(config)?;
    let mut report = Report::new(config.clone());

    if steps.dataset {
        report.dataset = Some(dataset_section(&data.table));
    }
    if steps.split || steps.ridge {
        let split = split_table(config, &data.table)?;
        if steps.split {
            report.split = Some(split_section(config, &data.table, &split));
        }
        if steps.ridge {
            report.ridge = Some(ridge_section(config, &split)?);
        }
    }
    if steps.cross_validation {
        report.cross_validation = Some(cross_validation_section(config, &data.table)?);
    }
    if steps.correction {
        report.correction = Some(correction_section(config, &data.p_values)?);
    }
    Ok(report)
}

fn dataset_section(table: &MarketTable) -> DatasetSection {
    info!(rows = table.len(), "summarizing synthetic dataset");
    DatasetSection {
        rows: table.len(),
        first_date: table.dates().next(),
        last_date: table.dates().last(),
        returns: DescriptiveStats::new(table.returns()),
        volume: DescriptiveStats::new(table.volume()),
        head: table.rows().iter().take(HEAD_ROWS).copied().collect(),
    }
}

fn split_table(config: &DemoConfig, table: &MarketTable) -> anyhow::Result<TableSplit> {
    let split = table
        .train_test_split(config.test_fraction, &mut seeded_rng(config.split_seed))
        .context("Failed to split the synthetic table")?;
    info!(
        train = split.train.len(),
        test = split.test.len(),
        "split table into training and testing subsets"
    );
    Ok(split)
}

fn split_section(config: &DemoConfig, table: &MarketTable, split: &TableSplit) -> SplitSection {
    let train = split.indices.train.iter().copied().collect::<BTreeSet<_>>();
    let test = split.indices.test.iter().copied().collect::<BTreeSet<_>>();
    let disjoint = train.is_disjoint(&test);
    let covers_table = train.union(&test).copied().eq(0..table.len());

    SplitSection {
        test_fraction: config.test_fraction,
        seed: config.split_seed,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        disjoint,
        covers_table,
    }
}

fn cross_validation_section(
    config: &DemoConfig,
    table: &MarketTable,
) -> anyhow::Result<CrossValidationSection> {
    let k_fold = KFold::new(config.folds);
    let folds = k_fold
        .split(table.len())
        .context("Failed to build cross-validation folds")?;
    let scores = cross_val_score(
        LinearRegression::new,
        &table.features(),
        &table.targets(),
        &folds,
    )
    .context("Cross-validation failed")?;
    info!(
        folds = k_fold.n_splits(),
        mean = scores.mean(),
        std_dev = scores.std_dev(),
        "cross-validated linear regression"
    );
    Ok(CrossValidationSection {
        folds: k_fold.n_splits(),
        scores,
    })
}

fn ridge_section(config: &DemoConfig, split: &TableSplit) -> anyhow::Result<RidgeSection> {
    let mut ridge = RidgeRegression::new(config.alpha).context("Invalid ridge penalty")?;
    let ridge_fit = fit_and_score(&mut ridge, split, RidgeRegression::fitted)
        .context("Failed to fit ridge regression")?;
    let mut ols = LinearRegression::new();
    let ols_fit = fit_and_score(&mut ols, split, LinearRegression::fitted)
        .context("Failed to fit linear regression")?;

    info!(
        alpha = ridge.alpha(),
        ridge_test_r2 = ridge_fit.test_r2,
        ols_test_r2 = ols_fit.test_r2,
        "fitted ridge regression"
    );
    Ok(RidgeSection {
        alpha: ridge.alpha(),
        ridge: ridge_fit,
        ols: ols_fit,
    })
}

fn fit_and_score<M>(
    model: &mut M,
    split: &TableSplit,
    fitted: fn(&M) -> Option<&LinearFit>,
) -> anyhow::Result<FitSummary>
where
    M: Regressor,
{
    let (x_train, y_train) = (split.train.features(), split.train.targets());
    let (x_test, y_test) = (split.test.features(), split.test.targets());

    model.fit(&x_train, &y_train)?;
    let fit = fitted(model).context("Model has no parameters after fitting")?;
    let predictions = model.predict(&x_test)?;

    Ok(FitSummary {
        coefficients: fit.coefficients.to_vec(),
        intercept: fit.intercept,
        train_r2: model.score(&x_train, &y_train)?,
        test_r2: metrics::r2_score(&y_test, &predictions),
        test_mse: metrics::mean_squared_error(&y_test, &predictions),
    })
}

fn correction_section(
    config: &DemoConfig,
    p_values: &[f64],
) -> anyhow::Result<CorrectionSection> {
    let bonferroni = multiple_testing::bonferroni(p_values, config.significance)
        .context("Failed to apply the Bonferroni correction")?;
    let section = CorrectionSection {
        naive_discoveries: bonferroni.naive_discoveries(),
        discoveries: bonferroni.discoveries(),
        bonferroni,
    };
    info!(
        tests = p_values.len(),
        naive = section.naive_discoveries,
        corrected = section.discoveries,
        "applied Bonferroni correction"
    );
    Ok(section)
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;

    #[test]
    fn test_run_all_default() {
        let config = DemoConfig::default();
        let report = run(&config, Steps::ALL).unwrap();

        let dataset = report.dataset.as_ref().unwrap();
        assert_eq!(dataset.rows, 100);
        assert_eq!(dataset.first_date, Some(config.start_date));
        assert_eq!(dataset.head.len(), HEAD_ROWS);

        let split = report.split.as_ref().unwrap();
        assert_eq!((split.train_rows, split.test_rows), (80, 20));
        assert!(split.disjoint);
        assert!(split.covers_table);

        let cv = report.cross_validation.as_ref().unwrap();
        assert_eq!(cv.scores.scores.len(), 5);

        let ridge = report.ridge.as_ref().unwrap();
        assert_eq!(ridge.ridge.coefficients.len(), 1);
        // the penalty pulls the coefficient towards zero
        assert!(ridge.ridge.coefficients[0].abs() <= ridge.ols.coefficients[0].abs());

        let correction = report.correction.as_ref().unwrap();
        let b = &correction.bonferroni;
        assert_eq!(b.corrected.len(), 10);
        assert!(b.p_values.iter().zip(&b.corrected).all(|(p, c)| c >= p));
        assert!(correction.discoveries <= correction.naive_discoveries);
    }

    #[test]
    fn test_run_is_reproducible() {
        let config = DemoConfig::default();
        assert_eq!(
            run(&config, Steps::ALL).unwrap(),
            run(&config, Steps::ALL).unwrap()
        );
    }

    #[test]
    fn test_single_step_matches_full_run() {
        let config = DemoConfig::default();
        let full = run(&config, Steps::ALL).unwrap();
        let only_correction = run(
            &config,
            Steps {
                correction: true,
                ..Steps::NONE
            },
        )
        .unwrap();

        assert!(only_correction.dataset.is_none());
        assert!(only_correction.split.is_none());
        assert_eq!(only_correction.correction, full.correction);
    }

    #[test]
    fn test_invalid_parameters_fail() {
        let config = DemoConfig {
            folds: 1,
            ..DemoConfig::default()
        };
        assert!(run(&config, Steps::ALL).is_err());

        let config = DemoConfig {
            test_fraction: 1.0,
            ..DemoConfig::default()
        };
        assert!(run(&config, Steps::ALL).is_err());

        let config = DemoConfig {
            alpha: -1.0,
            ..DemoConfig::default()
        };
        assert!(run(&config, Steps::ALL).is_err());

        let config = DemoConfig {
            start_date: NaiveDate::MAX - Days::new(9),
            ..DemoConfig::default()
        };
        assert!(run(&config, Steps::ALL).is_err());
    }

    #[test]
    fn test_json_report_has_only_requested_sections() {
        let report = run(
            &DemoConfig::default(),
            Steps {
                cross_validation: true,
                ..Steps::NONE
            },
        )
        .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        let keys = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>();
        assert_eq!(keys, ["config", "cross_validation"]);
        assert_eq!(json["config"]["seed"], 42);
        assert_eq!(json["cross_validation"]["folds"], 5);
        assert_eq!(
            json["cross_validation"]["scores"]["scores"]
                .as_array()
                .unwrap()
                .len(),
            5
        );

        let full = serde_json::to_value(run(&DemoConfig::default(), Steps::ALL).unwrap()).unwrap();
        for key in ["dataset", "split", "cross_validation", "ridge", "correction"] {
            assert!(full.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_text_report_has_every_section() {
        let report = run(&DemoConfig::default(), Steps::ALL).unwrap();
        let mut buf = Vec::new();
        report.write_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        for heading in [
            "Synthetic dataset",
            "Train/test split",
            "5-fold cross-validation",
            "Ridge regression",
            "Bonferroni correction",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
    }
}
