//! Regression scores.

use ndarray::Array1;

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// A constant `y_true` has no variance to explain: the score is `1.0` for a
/// perfect prediction and `0.0` otherwise. An empty input scores `NaN`.
///
/// # Panics
///
/// Panics if the two arrays differ in length.
///
/// # Examples
///
/// ```
/// use datasnoop_model::metrics::r2_score;
/// use ndarray::array;
///
/// let y = array![1.0, 2.0, 3.0];
/// assert_eq!(r2_score(&y, &y), 1.0);
/// assert_eq!(r2_score(&y, &array![2.0, 2.0, 2.0]), 0.0);
/// ```
#[must_use]
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "arrays must have the same length");
    let Some(mean) = y_true.mean() else {
        return f64::NAN;
    };

    let ss_res = sum_of_squares(y_true, y_pred);
    let ss_tot = y_true.iter().map(|y| (y - mean).powi(2)).sum::<f64>();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Mean of the squared residuals. An empty input scores `NaN`.
///
/// # Panics
///
/// Panics if the two arrays differ in length.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "arrays must have the same length");
    if y_true.is_empty() {
        return f64::NAN;
    }
    sum_of_squares(y_true, y_pred) / y_true.len() as f64
}

fn sum_of_squares(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum()
}
