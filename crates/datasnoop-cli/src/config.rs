use std::path::PathBuf;

use chrono::NaiveDate;
use datasnoop_data::market::{DEFAULT_START_DATE, TableSpec};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::util;

/// Parameters of every demonstration step.
///
/// Values come from the defaults, then an optional JSON file, then
/// command-line flags, each layer overriding the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Seed of the generator shared by the table and the p-values.
    pub seed: u64,
    /// Seed of the train/test shuffle.
    pub split_seed: u64,
    pub rows: usize,
    pub start_date: NaiveDate,
    pub volume_scale: f64,
    pub test_fraction: f64,
    pub folds: usize,
    /// Ridge penalty strength.
    pub alpha: f64,
    pub p_value_count: usize,
    pub p_value_low: f64,
    pub p_value_high: f64,
    /// Family-wise significance level of the correction step.
    pub significance: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            split_seed: 42,
            rows: 100,
            start_date: DEFAULT_START_DATE,
            volume_scale: 100.0,
            test_fraction: 0.2,
            folds: 5,
            alpha: 1.0,
            p_value_count: 10,
            p_value_low: 0.01,
            p_value_high: 0.1,
            significance: 0.05,
        }
    }
}

impl DemoConfig {
    #[must_use]
    pub fn table_spec(&self) -> TableSpec {
        TableSpec {
            rows: self.rows,
            start_date: self.start_date,
            volume_scale: self.volume_scale,
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed for the synthetic table and p-values
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Seed for the train/test shuffle
    #[arg(long, global = true)]
    split_seed: Option<u64>,
    /// Number of rows in the synthetic table
    #[arg(long, global = true)]
    rows: Option<usize>,
    /// First date of the synthetic table (YYYY-MM-DD)
    #[arg(long, global = true)]
    start_date: Option<NaiveDate>,
    /// Share of rows held out for testing
    #[arg(long, global = true)]
    test_fraction: Option<f64>,
    /// Number of cross-validation folds
    #[arg(long, global = true)]
    folds: Option<usize>,
    /// Ridge penalty strength
    #[arg(long, global = true)]
    alpha: Option<f64>,
    /// Number of synthetic p-values
    #[arg(long, global = true)]
    p_values: Option<usize>,
    /// Family-wise significance level
    #[arg(long, global = true)]
    significance: Option<f64>,
}

impl ConfigArg {
    pub(crate) fn load(&self) -> anyhow::Result<DemoConfig> {
        let mut config = match &self.config {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration");
                util::read_json_file("configuration", path)?
            }
            None => DemoConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut DemoConfig) {
        let Self {
            config: _,
            seed,
            split_seed,
            rows,
            start_date,
            test_fraction,
            folds,
            alpha,
            p_values,
            significance,
        } = self;

        override_with(&mut config.seed, *seed);
        override_with(&mut config.split_seed, *split_seed);
        override_with(&mut config.rows, *rows);
        override_with(&mut config.start_date, *start_date);
        override_with(&mut config.test_fraction, *test_fraction);
        override_with(&mut config.folds, *folds);
        override_with(&mut config.alpha, *alpha);
        override_with(&mut config.p_value_count, *p_values);
        override_with(&mut config.significance, *significance);
    }
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tempfile::NamedTempFile;

    use super::*;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: DemoConfig =
            serde_json::from_str(r#"{"seed": 7, "start_date": "2024-02-28"}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(
            config.start_date,
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()
        );
        assert_eq!(config.folds, 5);
        assert_eq!(config.rows, 100);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(serde_json::from_str::<DemoConfig>(r#"{"sed": 7}"#).is_err());
    }

    #[test]
    fn test_flags_override_file_values() {
        let arg = ConfigArg {
            seed: Some(1),
            folds: Some(10),
            p_values: Some(20),
            ..ConfigArg::default()
        };
        let mut config = DemoConfig {
            seed: 7,
            alpha: 3.0,
            ..DemoConfig::default()
        };
        arg.apply(&mut config);

        assert_eq!(config.seed, 1);
        assert_eq!(config.folds, 10);
        assert_eq!(config.p_value_count, 20);
        assert_eq!(config.alpha, 3.0);
    }

    #[test]
    fn test_table_spec() {
        let spec = DemoConfig::default().table_spec();
        assert_eq!(spec, TableSpec::default());
    }

    #[test]
    fn test_load_layers_file_and_flags() {
        let file = json_file(r#"{"seed": 7, "folds": 3, "alpha": 2.5}"#);
        let arg = ConfigArg {
            config: Some(file.path().to_owned()),
            folds: Some(4),
            ..ConfigArg::default()
        };
        let config = arg.load().unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.alpha, 2.5);
        assert_eq!(config.folds, 4);
        assert_eq!(config.rows, 100);
    }

    #[test]
    fn test_load_bad_file_fails() {
        let arg = ConfigArg {
            config: Some(PathBuf::from("/nonexistent/datasnoop.json")),
            ..ConfigArg::default()
        };
        let err = arg.load().unwrap_err();
        assert!(err.to_string().contains("Failed to open configuration file"));

        let file = json_file("{ not json");
        let arg = ConfigArg {
            config: Some(file.path().to_owned()),
            ..ConfigArg::default()
        };
        let err = arg.load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration JSON file"));
    }
}
