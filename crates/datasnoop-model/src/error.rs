/// Failure while fitting or applying a linear model.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ModelError {
    #[display("cannot fit a model on zero samples")]
    EmptyInput,
    #[display("dimension mismatch: {rows} feature rows, {targets} targets")]
    DimensionMismatch { rows: usize, targets: usize },
    #[display("regularization strength must be finite and non-negative, got {alpha}")]
    InvalidAlpha { alpha: f64 },
    #[display("normal equations are not positive definite")]
    NotPositiveDefinite,
    #[display("model has not been fitted yet")]
    NotFitted,
    #[display("model was fitted on {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },
}
