//! Ordinary least squares and ridge regression.
//!
//! Both models fit an intercept by centering the design matrix and the
//! targets, then solve the (optionally penalized) normal equations
//!
//! ```text
//! (XcᵀXc + αI) β = Xcᵀyc,    intercept = ȳ − x̄·β
//! ```
//!
//! with a Cholesky factorisation. Ordinary least squares is the `α = 0` case.
//! The intercept is never penalized.

use ndarray::{Array1, Array2, Axis};

use crate::{error::ModelError, metrics};

/// A regression model that can be fitted and scored.
pub trait Regressor {
    /// Fits the model to `x` (samples × features) and `y`.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError>;

    /// Predicts targets for `x` with the fitted parameters.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError>;

    /// R² of the predictions for `x` against `y`.
    fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64, ModelError> {
        check_dimensions(x, y)?;
        let predictions = self.predict(x)?;
        Ok(metrics::r2_score(y, &predictions))
    }
}

/// Fitted parameters of a linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub coefficients: Array1<f64>,
    pub intercept: f64,
}

impl LinearFit {
    fn solve(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<Self, ModelError> {
        check_dimensions(x, y)?;
        let x_mean = x.mean_axis(Axis(0)).ok_or(ModelError::EmptyInput)?;
        let y_mean = y.mean().ok_or(ModelError::EmptyInput)?;

        let x_centered = x - &x_mean;
        let y_centered = y - y_mean;

        let mut gram = x_centered.t().dot(&x_centered);
        gram.diag_mut().mapv_inplace(|d| d + alpha);
        let moment = x_centered.t().dot(&y_centered);

        let coefficients = cholesky_solve(&gram, &moment)?;
        let intercept = y_mean - x_mean.dot(&coefficients);
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if x.ncols() != self.coefficients.len() {
            return Err(ModelError::FeatureMismatch {
                expected: self.coefficients.len(),
                got: x.ncols(),
            });
        }
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}

/// Linear regression fitted by ordinary least squares.
///
/// # Examples
///
/// ```
/// use datasnoop_model::linear::{LinearRegression, Regressor as _};
/// use ndarray::array;
///
/// let x = array![[0.0], [1.0], [2.0], [3.0]];
/// let y = array![1.0, 3.0, 5.0, 7.0];
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
/// let fit = model.fitted().unwrap();
/// assert!((fit.coefficients[0] - 2.0).abs() < 1e-9);
/// assert!((fit.intercept - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearRegression {
    fit: Option<LinearFit>,
}

impl LinearRegression {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fitted parameters, if [`Regressor::fit`] succeeded.
    #[must_use]
    pub fn fitted(&self) -> Option<&LinearFit> {
        self.fit.as_ref()
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        self.fit = Some(LinearFit::solve(x, y, 0.0)?);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        self.fit.as_ref().ok_or(ModelError::NotFitted)?.predict(x)
    }
}

/// Linear regression with an L2 penalty `alpha · ‖β‖²` on the coefficients.
///
/// Shrinking the coefficients towards zero trades a little bias for less
/// variance, which limits how far a model can chase noise in the training
/// rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeRegression {
    alpha: f64,
    fit: Option<LinearFit>,
}

impl RidgeRegression {
    /// Creates an unfitted model with penalty strength `alpha`.
    pub fn new(alpha: f64) -> Result<Self, ModelError> {
        if !(alpha.is_finite() && alpha >= 0.0) {
            return Err(ModelError::InvalidAlpha { alpha });
        }
        Ok(Self { alpha, fit: None })
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the fitted parameters, if [`Regressor::fit`] succeeded.
    #[must_use]
    pub fn fitted(&self) -> Option<&LinearFit> {
        self.fit.as_ref()
    }
}

impl Regressor for RidgeRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        self.fit = Some(LinearFit::solve(x, y, self.alpha)?);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        self.fit.as_ref().ok_or(ModelError::NotFitted)?.predict(x)
    }
}

fn check_dimensions(x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
    if x.nrows() != y.len() {
        return Err(ModelError::DimensionMismatch {
            rows: x.nrows(),
            targets: y.len(),
        });
    }
    if y.is_empty() {
        return Err(ModelError::EmptyInput);
    }
    Ok(())
}

/// Solves `a · z = b` for symmetric positive definite `a`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let sum = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum::<f64>();
            if i == j {
                let diag = a[[i, i]] - sum;
                if !(diag > f64::EPSILON * a[[i, i]].abs()) {
                    return Err(ModelError::NotPositiveDefinite);
                }
                l[[i, i]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L · w = b
    let mut w = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum = (0..i).map(|k| l[[i, k]] * w[k]).sum::<f64>();
        w[i] = (b[i] - sum) / l[[i, i]];
    }

    // Lᵀ · z = w
    let mut z = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum = (i + 1..n).map(|k| l[[k, i]] * z[k]).sum::<f64>();
        z[i] = (w[i] - sum) / l[[i, i]];
    }

    Ok(z)
}
