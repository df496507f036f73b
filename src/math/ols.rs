//! Least squares solver for the forecast regression.
//!
//! The forecaster fits small linear models of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! The design matrix is tall (one row per observed month, 2–13 columns), so
//! we solve via SVD rather than QR: nalgebra's `QR::solve` targets square
//! systems, and SVD also degrades gracefully when seasonal dummy columns are
//! collinear with the intercept on short histories.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to yield finite
/// coefficients at any of the attempted tolerances.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_linear_coefficients() {
        // y = 5 + 2t on t = [0, 1, 2, 3]
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let y = DVector::from_row_slice(&[5.0, 7.0, 9.0, 11.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 5.0).abs() < 1e-10);
        assert!((beta[1] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn overdetermined_noisy_system_solves() {
        let x = DMatrix::from_row_slice(5, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0]);
        let y = DVector::from_row_slice(&[1.1, 2.9, 5.2, 6.8, 9.1]);

        let beta = solve_least_squares(&x, &y).unwrap();
        // Slope near 2, intercept near 1.
        assert!((beta[1] - 2.0).abs() < 0.2);
        assert!((beta[0] - 1.0).abs() < 0.4);
    }
}
