//! Linear models and validation tools for the data-snooping demonstrations.
//!
//! # Modules
//!
//! - [`linear`]: ordinary least squares and ridge regression behind the
//!   [`Regressor`](linear::Regressor) trait
//! - [`metrics`]: R² and mean squared error
//! - [`cross_validation`]: k-fold splitting and per-fold scoring
//!
//! # Examples
//!
//! ```
//! use datasnoop_model::{
//!     cross_validation::{KFold, cross_val_score},
//!     linear::{LinearRegression, Regressor as _, RidgeRegression},
//! };
//! use ndarray::{Array1, Array2};
//!
//! let x = Array2::from_shape_fn((20, 1), |(i, _)| i as f64);
//! let y = Array1::from_shape_fn(20, |i| 0.5 * i as f64 - 1.0);
//!
//! let folds = KFold::new(5).split(20).unwrap();
//! let cv = cross_val_score(LinearRegression::new, &x, &y, &folds).unwrap();
//! assert_eq!(cv.scores.len(), 5);
//!
//! let mut ridge = RidgeRegression::new(1.0).unwrap();
//! ridge.fit(&x, &y).unwrap();
//! assert!(ridge.score(&x, &y).unwrap() > 0.99);
//! ```

pub mod cross_validation;
pub mod error;
pub mod linear;
pub mod metrics;

pub use self::error::ModelError;
