//! Least squares solver for the forecast regression.
//!
//! The default forecast backend repeatedly solves small linear regression
//! problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - The parameter dimension is tiny (1–6 columns), so SVD performance is
//!   more than adequate for interactive refits.
//! - Prediction intervals additionally need `(XᵀX)⁻¹`; we expose that here so
//!   the backend doesn't touch nalgebra internals directly.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails. Short
    // histories can make the weekly harmonic columns nearly collinear with
    // the trend column.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Inverse of the normal matrix `XᵀX`.
///
/// Used to compute the prediction variance `x'(XᵀX)⁻¹x` for confidence bands.
/// Returns `None` when the normal matrix is singular.
pub fn normal_matrix_inverse(x: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let xtx = x.transpose() * x;
    let inv = xtx.try_inverse()?;
    if inv.iter().all(|v| v.is_finite()) {
        Some(inv)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn normal_matrix_inverse_gives_positive_prediction_variance() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let inv = normal_matrix_inverse(&x).unwrap();

        for t in [0.0, 1.5, 10.0] {
            let row = DVector::from_row_slice(&[1.0, t]);
            let var = (row.transpose() * &inv * &row)[(0, 0)];
            assert!(var > 0.0, "prediction variance at t={t} should be > 0, got {var}");
        }
    }
}
