//! Model evaluation for the Flat / Trend / Trend+Weekly family.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given day offset (for OLS)
//! - predict y(t) given betas (for fitted values and future points)
//!
//! These are implemented here for each model kind. `t` is the day offset
//! from the first historical date, so calendar gaps in the history land at
//! their true positions and the weekly phase stays aligned.

use crate::domain::ModelKind;

/// Number of weekly Fourier harmonics used by `TrendSeasonal`.
pub const WEEKLY_HARMONICS: usize = 2;

/// Seasonal period in days (weekly reporting cycle).
pub const SEASONAL_PERIOD_DAYS: f64 = 7.0;

/// Fill a design row for the given model kind.
///
/// The row includes the constant term first (intercept).
///
/// # Panics
/// Panics if `out` does not have length `model.param_count()`. Callers should
/// size the array correctly.
pub fn fill_design_row(model: ModelKind, t: f64, out: &mut [f64]) {
    match model {
        ModelKind::Flat => {
            out[0] = 1.0;
        }
        ModelKind::Trend => {
            out[0] = 1.0;
            out[1] = t;
        }
        ModelKind::TrendSeasonal => {
            out[0] = 1.0;
            out[1] = t;
            for k in 0..WEEKLY_HARMONICS {
                let (s, c) = harmonic(t, k + 1);
                out[2 + 2 * k] = s;
                out[3 + 2 * k] = c;
            }
        }
    }
}

/// Predict `y(t)` for the given model kind.
pub fn predict(model: ModelKind, t: f64, betas: &[f64]) -> f64 {
    match model {
        ModelKind::Flat => betas[0],
        ModelKind::Trend => betas[0] + betas[1] * t,
        ModelKind::TrendSeasonal => {
            let mut y = betas[0] + betas[1] * t;
            for k in 0..WEEKLY_HARMONICS {
                let (s, c) = harmonic(t, k + 1);
                y += betas[2 + 2 * k] * s + betas[3 + 2 * k] * c;
            }
            y
        }
    }
}

fn harmonic(t: f64, k: usize) -> (f64, f64) {
    let omega = 2.0 * std::f64::consts::PI * (k as f64) / SEASONAL_PERIOD_DAYS;
    ((omega * t).sin(), (omega * t).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_trend_is_linear() {
        let betas = [10.0, 2.0];
        assert!((predict(ModelKind::Trend, 0.0, &betas) - 10.0).abs() < 1e-12);
        assert!((predict(ModelKind::Trend, 5.0, &betas) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn seasonal_component_repeats_weekly() {
        // With a zero trend, predictions 7 days apart must coincide.
        let mut betas = vec![5.0, 0.0];
        betas.extend([3.0, -1.0, 0.5, 2.0]);
        for t in [0.0, 1.0, 2.5, 6.0] {
            let a = predict(ModelKind::TrendSeasonal, t, &betas);
            let b = predict(ModelKind::TrendSeasonal, t + SEASONAL_PERIOD_DAYS, &betas);
            assert!((a - b).abs() < 1e-9, "t={t}: {a} vs {b}");
        }
    }

    #[test]
    fn design_row_matches_predict() {
        let betas = [1.0, 0.5, 0.2, -0.3, 0.1, 0.05];
        let mut row = vec![0.0; ModelKind::TrendSeasonal.param_count()];
        for t in [0.0, 3.0, 11.0] {
            fill_design_row(ModelKind::TrendSeasonal, t, &mut row);
            let dot: f64 = row.iter().zip(betas.iter()).map(|(a, b)| a * b).sum();
            let direct = predict(ModelKind::TrendSeasonal, t, &betas);
            assert!((dot - direct).abs() < 1e-12);
        }
    }
}
