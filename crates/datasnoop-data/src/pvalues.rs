//! Synthetic p-values for the multiple-comparisons demonstration.
//!
//! Values are drawn uniformly from a narrow band just above zero, so a naive
//! reading at the 5% level "discovers" several effects that a corrected
//! reading does not.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("p-value range must satisfy 0 <= low < high <= 1, got [{low}, {high})")]
pub struct PValueRangeError {
    pub low: f64,
    pub high: f64,
}

/// Draws `count` p-values uniformly from `[low, high)`.
///
/// # Examples
///
/// ```
/// use datasnoop_data::{pvalues::uniform_p_values, seeded_rng};
///
/// let p_values = uniform_p_values(10, 0.01, 0.1, &mut seeded_rng(42)).unwrap();
/// assert_eq!(p_values.len(), 10);
/// assert!(p_values.iter().all(|p| (0.01..0.1).contains(p)));
/// ```
pub fn uniform_p_values<R>(
    count: usize,
    low: f64,
    high: f64,
    rng: &mut R,
) -> Result<Vec<f64>, PValueRangeError>
where
    R: Rng + ?Sized,
{
    if !(0.0..1.0).contains(&low) || !(low < high && high <= 1.0) {
        return Err(PValueRangeError { low, high });
    }
    Ok((0..count).map(|_| rng.random_range(low..high)).collect())
}
