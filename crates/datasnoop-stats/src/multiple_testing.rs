//! Multiple-comparisons correction.
//!
//! Testing `m` hypotheses at level `α` each inflates the chance of at least one
//! false positive to roughly `1 - (1 - α)^m`. The Bonferroni procedure keeps
//! the family-wise error rate at `α` by testing every hypothesis at `α / m`,
//! or equivalently by multiplying every p-value by `m` (clipped at 1) and
//! comparing against the original `α`.
//!
//! # Examples
//!
//! ```
//! use datasnoop_stats::multiple_testing::bonferroni;
//!
//! let p_values = [0.01, 0.02, 0.04, 0.30];
//! let correction = bonferroni(&p_values, 0.05).unwrap();
//!
//! assert_eq!(correction.corrected, vec![0.04, 0.08, 0.16, 1.0]);
//! assert_eq!(correction.naive_reject, vec![true, true, true, false]);
//! assert_eq!(correction.reject, vec![true, false, false, false]);
//! assert_eq!(correction.corrected_alpha, 0.0125);
//! ```

use serde::Serialize;

/// Invalid input to a multiple-comparisons correction.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CorrectionError {
    #[display("significance level must be in (0, 1), got {alpha}")]
    InvalidAlpha { alpha: f64 },
    #[display("p-value #{index} must be in [0, 1], got {value}")]
    InvalidPValue { index: usize, value: f64 },
}

/// Result of a Bonferroni correction over a family of p-values.
///
/// All vectors have the same length and order as the input p-values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonferroniCorrection {
    /// Family-wise significance level the decisions are made at.
    pub alpha: f64,
    /// Per-test level, `alpha / m`.
    pub corrected_alpha: f64,
    /// The input p-values.
    pub p_values: Vec<f64>,
    /// Adjusted p-values, `min(p * m, 1)`.
    pub corrected: Vec<f64>,
    /// Decisions made without correction, `p <= alpha`.
    pub naive_reject: Vec<bool>,
    /// Decisions after correction, `corrected <= alpha`.
    pub reject: Vec<bool>,
}

impl BonferroniCorrection {
    /// Number of hypotheses rejected without correction.
    #[must_use]
    pub fn naive_discoveries(&self) -> usize {
        self.naive_reject.iter().filter(|r| **r).count()
    }

    /// Number of hypotheses rejected after correction.
    #[must_use]
    pub fn discoveries(&self) -> usize {
        self.reject.iter().filter(|r| **r).count()
    }
}

/// Applies the Bonferroni correction to `p_values` at family-wise level `alpha`.
///
/// An empty family yields an empty correction with `corrected_alpha == alpha`.
#[expect(clippy::cast_precision_loss)]
pub fn bonferroni(p_values: &[f64], alpha: f64) -> Result<BonferroniCorrection, CorrectionError> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(CorrectionError::InvalidAlpha { alpha });
    }
    if let Some((index, &value)) = p_values
        .iter()
        .enumerate()
        .find(|(_, p)| !(0.0..=1.0).contains(*p))
    {
        return Err(CorrectionError::InvalidPValue { index, value });
    }

    let m = p_values.len().max(1) as f64;
    let corrected = p_values
        .iter()
        .map(|p| (p * m).min(1.0))
        .collect::<Vec<_>>();
    let naive_reject = p_values.iter().map(|p| *p <= alpha).collect();
    let reject = corrected.iter().map(|p| *p <= alpha).collect();

    Ok(BonferroniCorrection {
        alpha,
        corrected_alpha: alpha / m,
        p_values: p_values.to_vec(),
        corrected,
        naive_reject,
        reject,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrected_values_never_below_input() {
        let p_values = [
            0.012, 0.034, 0.055, 0.071, 0.099, 0.018, 0.027, 0.063, 0.081, 0.045,
        ];
        let correction = bonferroni(&p_values, 0.05).unwrap();

        assert_eq!(correction.corrected.len(), 10);
        for (raw, corrected) in p_values.iter().zip(&correction.corrected) {
            assert!(corrected >= raw);
            assert!(*corrected <= 1.0);
        }
        assert!((correction.corrected[0] - 0.12).abs() < 1e-12);
        assert!((correction.corrected_alpha - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_correction_removes_marginal_findings() {
        let p_values = [0.01, 0.02, 0.03, 0.04, 0.05, 0.06, 0.07, 0.08, 0.09, 0.1];
        let correction = bonferroni(&p_values, 0.05).unwrap();

        assert_eq!(correction.naive_discoveries(), 5);
        assert_eq!(correction.discoveries(), 0);
    }

    #[test]
    fn test_clipped_at_one() {
        let correction = bonferroni(&[0.5, 0.9], 0.05).unwrap();
        assert_eq!(correction.corrected, vec![1.0, 1.0]);
    }

    #[test]
    fn test_empty_family() {
        let correction = bonferroni(&[], 0.05).unwrap();
        assert!(correction.corrected.is_empty());
        assert_eq!(correction.corrected_alpha, 0.05);
    }

    #[test]
    fn test_invalid_alpha() {
        assert_eq!(
            bonferroni(&[0.1], 0.0),
            Err(CorrectionError::InvalidAlpha { alpha: 0.0 })
        );
        assert!(bonferroni(&[0.1], 1.0).is_err());
        assert!(bonferroni(&[0.1], f64::NAN).is_err());
    }

    #[test]
    fn test_invalid_p_value() {
        assert_eq!(
            bonferroni(&[0.1, 1.5], 0.05),
            Err(CorrectionError::InvalidPValue {
                index: 1,
                value: 1.5
            })
        );
        assert!(bonferroni(&[f64::NAN], 0.05).is_err());
    }
}
