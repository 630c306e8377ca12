//! Standardized Precipitation-Evapotranspiration Index
//!
//! Monthly water balance (P − PET) accumulated over a rolling window, fitted
//! per calendar month to a three-parameter log-logistic distribution by
//! probability-weighted moments, then mapped onto a standard normal score.
//!
//! # Scientific References
//! - Vicente-Serrano, S.M., Beguería, S. & López-Moreno, J.I. (2010).
//!   "A multiscalar drought index sensitive to global warming: the SPEI"
//!   Journal of Climate, 23(7), 1696-1718
//! - Hosking, J.R.M. (1990). "L-moments: analysis and estimation of
//!   distributions using linear combinations of order statistics"
//!   Journal of the Royal Statistical Society B, 52(1), 105-124

use rayon::prelude::*;
use tracing::{debug, warn};

use super::special_functions::{gamma_ln, normal_quantile};
use crate::core_types::MONTHS_PER_YEAR;
use crate::error::{ClimateError, ClimateResult};

/// CDF values are kept this far inside (0, 1) so the normal score stays finite
const CDF_CLAMP: f64 = 1e-7;

/// Three-parameter log-logistic distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLogistic {
    /// Location ξ
    pub location: f64,
    /// Scale α
    pub scale: f64,
    /// Shape κ
    pub shape: f64,
}

impl LogLogistic {
    /// Fit from the first three probability-weighted moments
    ///
    /// Returns `None` when the moments do not describe a usable distribution
    /// (zero variance, too few samples, or a shape ≤ 1 where Γ(1 − 1/κ) is
    /// undefined).
    pub fn fit(beta: [f64; 3]) -> Option<Self> {
        let shape = (2.0 * beta[1] - beta[0]) / (6.0 * beta[1] - beta[0] - 6.0 * beta[2]);
        let g1 = gamma_ln(1.0 + 1.0 / shape).exp();
        let g2 = gamma_ln(1.0 - 1.0 / shape).exp();
        let scale = (beta[0] - 2.0 * beta[1]) * shape / (g1 * g2);
        let location = beta[0] - scale * g1 * g2;

        let usable = [shape, scale, location].iter().all(|v| v.is_finite()) && scale > 0.0;
        usable.then_some(Self {
            location,
            scale,
            shape,
        })
    }

    /// Cumulative probability at `x`, clamped into [1e-7, 1 − 1e-7]
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.location {
            return CDF_CLAMP;
        }
        let p = 1.0 / (1.0 + (self.scale / (x - self.location)).powf(self.shape));
        p.clamp(CDF_CLAMP, 1.0 - CDF_CLAMP)
    }
}

/// Unbiased probability-weighted moments of ascending-sorted data
///
/// `β_r = (1/n) Σ x_(i) × C(n−i, r) / C(n−1, r)` for r = 0, 1, 2
///
/// Fewer than three samples yield non-finite moments.
pub fn probability_weighted_moments(sorted: &[f64]) -> [f64; 3] {
    let n = sorted.len() as f64;
    let mut acc = [0.0; 3];
    for (i, &x) in sorted.iter().enumerate() {
        let above = n - (i + 1) as f64;
        acc[0] += x;
        acc[1] += x * above;
        acc[2] += x * above * (above - 1.0);
    }
    [
        acc[0] / n,
        acc[1] / n / (n - 1.0),
        acc[2] / n / ((n - 1.0) * (n - 2.0)),
    ]
}

/// Rolling sums of P − PET over `window` months, regrouped by calendar month
///
/// Returns `[month][year]`; slots without a full window of history are NaN.
fn accumulate_deficits(precip: &[[f64; 12]], pet: &[[f64; 12]], window: usize) -> Vec<Vec<f64>> {
    let deficit: Vec<f64> = precip
        .iter()
        .zip(pet)
        .flat_map(|(p, e)| p.iter().zip(e).map(|(p, e)| p - e))
        .collect();

    let years = precip.len();
    let mut by_month = vec![vec![f64::NAN; years]; MONTHS_PER_YEAR];
    for k in (window - 1)..deficit.len() {
        let sum: f64 = deficit[k + 1 - window..=k].iter().sum();
        by_month[k % MONTHS_PER_YEAR][k / MONTHS_PER_YEAR] = sum;
    }
    by_month
}

/// Score one calendar month across all years
fn month_scores(month: usize, cumulative: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = cumulative.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);

    let fit = if sorted.len() >= 3 {
        LogLogistic::fit(probability_weighted_moments(&sorted))
    } else {
        None
    };

    let Some(distribution) = fit else {
        warn!(
            "SPEI fit degenerate for month {} ({} samples), scoring 0",
            month + 1,
            sorted.len()
        );
        return vec![0.0; cumulative.len()];
    };

    debug!(
        "SPEI month {}: ξ={:.3} α={:.3} κ={:.3}",
        month + 1,
        distribution.location,
        distribution.scale,
        distribution.shape
    );

    cumulative
        .iter()
        .map(|&x| {
            if x.is_nan() {
                0.0
            } else {
                normal_quantile(distribution.cdf(x))
            }
        })
        .collect()
}

/// Monthly SPEI for a sequence of years
///
/// # Arguments
/// * `precip` - Monthly precipitation per year, `[year][month]`
/// * `pet` - Monthly potential evapotranspiration per year, same units
/// * `window` - Accumulation window in months (≥ 1)
///
/// # Returns
/// SPEI per year and month. Months before the first full window, and every
/// month of a calendar-month group whose fit is degenerate, score 0.
///
/// # Errors
/// [`ClimateError::Spei`] when the inputs differ in length or the window
/// is zero.
pub fn calculate_spei(
    precip: &[[f64; 12]],
    pet: &[[f64; 12]],
    window: usize,
) -> ClimateResult<Vec<[f64; 12]>> {
    if precip.len() != pet.len() {
        return Err(ClimateError::Spei {
            reason: format!(
                "precipitation covers {} years but PET covers {}",
                precip.len(),
                pet.len()
            ),
        });
    }
    if window == 0 {
        return Err(ClimateError::Spei {
            reason: "accumulation window must be at least one month".to_string(),
        });
    }

    let years = precip.len();
    let cumulative = accumulate_deficits(precip, pet, window);

    // Calendar months are fitted independently
    let scores: Vec<Vec<f64>> = cumulative
        .par_iter()
        .enumerate()
        .map(|(month, values)| month_scores(month, values))
        .collect();

    let mut spei = vec![[0.0; 12]; years];
    for (month, column) in scores.iter().enumerate() {
        for (year, &value) in column.iter().enumerate() {
            spei[year][month] = value;
        }
    }
    Ok(spei)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn skewed_series(years: usize) -> Vec<[f64; 12]> {
        (0..years)
            .map(|y| {
                let base = ((y % 7) as f64 + 1.0).powi(2) + y as f64 * 0.37;
                std::array::from_fn(|m| base + m as f64)
            })
            .collect()
    }

    #[test]
    fn test_pwm_closed_form() {
        let beta = probability_weighted_moments(&[1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(beta[0], 2.5);
        assert_relative_eq!(beta[1], 10.0 / 12.0);
        assert_relative_eq!(beta[2], 10.0 / 24.0);
    }

    #[test]
    fn test_constant_group_is_degenerate() {
        let beta = probability_weighted_moments(&[4.0; 10]);
        assert!(LogLogistic::fit(beta).is_none());
    }

    #[test]
    fn test_cdf_clamped_below_location() {
        let dist = LogLogistic {
            location: 10.0,
            scale: 5.0,
            shape: 4.0,
        };
        assert_relative_eq!(dist.cdf(2.0), CDF_CLAMP);
        assert!(dist.cdf(1e12) <= 1.0 - CDF_CLAMP);
        assert!(dist.cdf(12.0) < dist.cdf(20.0));
    }

    #[test]
    fn test_first_months_without_history_score_zero() {
        let precip = skewed_series(20);
        let pet = vec![[0.0; 12]; 20];
        let spei = calculate_spei(&precip, &pet, 3).unwrap();
        assert_eq!(spei.len(), 20);
        assert_eq!(spei[0][0], 0.0);
        assert_eq!(spei[0][1], 0.0);
        assert!(spei.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_scores_follow_deficit_order() {
        let precip = skewed_series(30);
        let pet = vec![[1.0; 12]; 30];
        let spei = calculate_spei(&precip, &pet, 1).unwrap();

        for month in 0..12 {
            let mut pairs: Vec<(f64, f64)> = (0..30).map(|y| (precip[y][month], spei[y][month])).collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            for w in pairs.windows(2) {
                assert!(w[1].1 >= w[0].1, "month {} not monotone: {:?}", month, w);
            }
            assert!(pairs[29].1 > pairs[0].1);
        }
    }

    #[test]
    fn test_constant_deficits_stay_finite() {
        let precip = vec![[5.0; 12]; 12];
        let pet = vec![[2.0; 12]; 12];
        let spei = calculate_spei(&precip, &pet, 3).unwrap();
        assert!(spei.iter().flatten().all(|v| v.is_finite()));
        assert!(spei.iter().flatten().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rejects_mismatched_inputs() {
        let err = calculate_spei(&skewed_series(3), &skewed_series(4), 3).unwrap_err();
        assert!(matches!(err, ClimateError::Spei { .. }));
        assert!(calculate_spei(&skewed_series(3), &skewed_series(3), 0).is_err());
    }
}
