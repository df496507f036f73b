//! Design rows and prediction for the additive forecast models.
//!
//! The forecaster relies on two primitive operations:
//! - build a design row for a given month (for least squares)
//! - predict sales for a month given fitted coefficients
//!
//! Both models are linear in the coefficients:
//!
//! - `Trend`:    y(t) = β0 + β1·t
//! - `Seasonal`: y(t) = β0 + β1·t + Σ β_m · 1[month = m]   (m = Feb..Dec)
//!
//! January is the seasonal baseline, so the dummy for month `m` (2..=12)
//! lives at column index `m`.

use crate::domain::TrendModelKind;

/// Fill a design row for the given model kind.
///
/// `t` is the month offset from the first observation; `month` is the
/// calendar month (1..=12).
///
/// # Panics
/// Panics if `out` does not have length `kind.beta_len()`. Callers size the
/// row from the model kind.
pub fn fill_design_row(kind: TrendModelKind, t: f64, month: u32, out: &mut [f64]) {
    out[0] = 1.0;
    out[1] = t;
    if kind == TrendModelKind::Seasonal {
        for slot in out[2..].iter_mut() {
            *slot = 0.0;
        }
        if month >= 2 {
            out[month as usize] = 1.0;
        }
    }
}

/// Predict sales for the given model kind.
pub fn predict(kind: TrendModelKind, t: f64, month: u32, betas: &[f64]) -> f64 {
    let mut y = betas[0] + betas[1] * t;
    if kind == TrendModelKind::Seasonal && month >= 2 {
        y += betas[month as usize];
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_predict_is_affine() {
        let betas = [10.0, 2.0];
        assert_eq!(predict(TrendModelKind::Trend, 0.0, 1, &betas), 10.0);
        assert_eq!(predict(TrendModelKind::Trend, 3.0, 7, &betas), 16.0);
    }

    #[test]
    fn seasonal_dummy_applies_only_to_its_month() {
        let mut betas = vec![0.0; TrendModelKind::Seasonal.beta_len()];
        betas[0] = 100.0;
        betas[12] = 25.0; // December effect
        assert_eq!(predict(TrendModelKind::Seasonal, 0.0, 12, &betas), 125.0);
        assert_eq!(predict(TrendModelKind::Seasonal, 0.0, 1, &betas), 100.0);
        assert_eq!(predict(TrendModelKind::Seasonal, 0.0, 6, &betas), 100.0);
    }

    #[test]
    fn design_row_matches_predict() {
        let kind = TrendModelKind::Seasonal;
        let betas: Vec<f64> = (0..kind.beta_len()).map(|i| i as f64 * 0.5).collect();
        let mut row = vec![0.0; kind.beta_len()];
        fill_design_row(kind, 4.0, 9, &mut row);
        let dot: f64 = row.iter().zip(&betas).map(|(a, b)| a * b).sum();
        assert!((dot - predict(kind, 4.0, 9, &betas)).abs() < 1e-12);
    }
}
