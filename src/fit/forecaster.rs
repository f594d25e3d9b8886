//! The forecasting collaborator seam and its default backend.
//!
//! The pipeline only depends on the [`Forecaster`] trait: history in,
//! fitted-plus-future `(date, point, lower, upper)` out. Any backend honoring
//! that contract is substitutable without touching the filter/trend pipeline.
//!
//! The default backend fits the Flat / Trend / Trend+Weekly family by
//! ordinary least squares and derives prediction intervals from the residual
//! sigma and the OLS prediction variance `x'(XᵀX)⁻¹x`, so bands widen as the
//! forecast moves away from the center of the history.

use chrono::Duration;
use nalgebra::{DMatrix, DVector};

use crate::domain::{ForecastInput, ForecastPoint, ForecastSeries, ModelKind, ModelSpec};
use crate::error::AppError;
use crate::fit::selection::{fit_and_select, FitDiagnostics};
use crate::math::{normal_matrix_inverse, solve_least_squares};
use crate::models::{fill_design_row, predict};

/// External forecasting collaborator contract.
pub trait Forecaster {
    /// Label for status lines and reports.
    fn label(&self) -> &'static str;

    /// Fit on `input` and produce estimates for every historical date plus
    /// `horizon_days` daily future dates continuing after the last one.
    fn forecast(&self, input: &ForecastInput, horizon_days: u32)
        -> Result<ForecastSeries, AppError>;
}

/// Default backend: OLS trend + weekly seasonality with BIC model selection.
#[derive(Debug, Clone)]
pub struct SeasonalTrendForecaster {
    pub model_spec: ModelSpec,
    pub confidence_level: f64,
}

impl Default for SeasonalTrendForecaster {
    fn default() -> Self {
        Self {
            model_spec: ModelSpec::Auto,
            confidence_level: 0.95,
        }
    }
}

impl Forecaster for SeasonalTrendForecaster {
    fn label(&self) -> &'static str {
        "ols-seasonal-trend"
    }

    fn forecast(
        &self,
        input: &ForecastInput,
        horizon_days: u32,
    ) -> Result<ForecastSeries, AppError> {
        self.forecast_with_diagnostics(input, horizon_days)
            .map(|(series, _)| series)
    }
}

impl SeasonalTrendForecaster {
    /// Forecast and also return per-model diagnostics for reporting.
    pub fn forecast_with_diagnostics(
        &self,
        input: &ForecastInput,
        horizon_days: u32,
    ) -> Result<(ForecastSeries, FitDiagnostics), AppError> {
        let n = input.points.len();
        if n < 2 {
            return Err(AppError::insufficient_history(format!(
                "Need at least 2 history points to fit, got {n}."
            )));
        }

        let first_date = input.points[0].0;
        let last_date = input.points[n - 1].0;

        // Day offsets from the first historical date. Calendar gaps land at
        // their true positions, keeping the weekly phase aligned.
        let ts: Vec<f64> = input
            .points
            .iter()
            .map(|(d, _)| (*d - first_date).num_days() as f64)
            .collect();
        let ys: Vec<f64> = input.points.iter().map(|(_, v)| *v).collect();

        let selection = fit_and_select(self.model_spec, &ts, &ys)?;
        let best = &selection.best;
        let z = z_score(self.confidence_level);

        let mut points = Vec::with_capacity(n + horizon_days as usize);
        for (i, (date, _)) in input.points.iter().enumerate() {
            points.push(band_point(best, *date, ts[i], z));
        }

        let last_offset = (last_date - first_date).num_days();
        for k in 1..=horizon_days as i64 {
            let date = last_date + Duration::days(k);
            points.push(band_point(best, date, (last_offset + k) as f64, z));
        }

        let series = ForecastSeries {
            location: input.location.clone(),
            measure: input.measure,
            model: best.kind.display_name().to_string(),
            confidence_level: self.confidence_level,
            horizon_days,
            history_len: n,
            points,
        };

        Ok((series, selection.into_diagnostics()))
    }
}

fn band_point(fit: &ModelFit, date: chrono::NaiveDate, t: f64, z: f64) -> ForecastPoint {
    let predicted = fit.predict(t);
    let se = fit.prediction_se(t);
    ForecastPoint {
        date,
        predicted,
        lower: predicted - z * se,
        upper: predicted + z * se,
    }
}

/// Z-score for a two-sided confidence level (approximate).
fn z_score(confidence_level: f64) -> f64 {
    match confidence_level {
        x if x >= 0.99 => 2.576,
        x if x >= 0.95 => 1.96,
        x if x >= 0.90 => 1.645,
        x if x >= 0.80 => 1.282,
        _ => 1.96,
    }
}

/// Best fit for a single model kind.
#[derive(Debug, Clone)]
pub struct ModelFit {
    pub kind: ModelKind,
    pub betas: Vec<f64>,
    pub sse: f64,
    pub rmse: f64,
    /// Residual standard error (sse over degrees of freedom).
    pub sigma: f64,
    pub n: usize,
    xtx_inv: DMatrix<f64>,
}

impl ModelFit {
    pub fn predict(&self, t: f64) -> f64 {
        predict(self.kind, t, &self.betas)
    }

    /// Prediction standard error at day offset `t`:
    /// `sigma * sqrt(1 + x'(XᵀX)⁻¹x)`.
    pub fn prediction_se(&self, t: f64) -> f64 {
        let p = self.kind.param_count();
        let mut row = vec![0.0; p];
        fill_design_row(self.kind, t, &mut row);
        let x = DVector::from_row_slice(&row);
        let var = (x.transpose() * &self.xtx_inv * &x)[(0, 0)];
        self.sigma * (1.0 + var.max(0.0)).sqrt()
    }
}

/// Fit a single model kind by ordinary least squares.
pub fn fit_model(kind: ModelKind, ts: &[f64], ys: &[f64]) -> Result<ModelFit, AppError> {
    let n = ts.len();
    let p = kind.param_count();
    if n != ys.len() {
        return Err(AppError::internal("Mismatched design/observation lengths."));
    }
    if ts.iter().any(|v| !v.is_finite()) || ys.iter().any(|v| !v.is_finite()) {
        return Err(AppError::internal("Non-finite values in fit inputs."));
    }

    let mut x = DMatrix::<f64>::zeros(n, p);
    let mut row = vec![0.0; p];
    for i in 0..n {
        fill_design_row(kind, ts[i], &mut row);
        for j in 0..p {
            x[(i, j)] = row[j];
        }
    }
    let y = DVector::from_row_slice(ys);

    let beta = solve_least_squares(&x, &y).ok_or_else(|| {
        AppError::internal(format!(
            "Least-squares solve failed for model {}.",
            kind.display_name()
        ))
    })?;
    let betas: Vec<f64> = beta.iter().copied().collect();

    let mut sse = 0.0;
    for i in 0..n {
        let r = ys[i] - predict(kind, ts[i], &betas);
        sse += r * r;
    }
    if !sse.is_finite() {
        return Err(AppError::internal(format!(
            "Non-finite residual sum for model {}.",
            kind.display_name()
        )));
    }

    let rmse = (sse / n as f64).sqrt();
    let dof = n.saturating_sub(p).max(1);
    let sigma = (sse / dof as f64).sqrt();

    let xtx_inv = normal_matrix_inverse(&x).ok_or_else(|| {
        AppError::internal(format!(
            "Singular normal matrix for model {}.",
            kind.display_name()
        ))
    })?;

    Ok(ModelFit {
        kind,
        betas,
        sse,
        rmse,
        sigma,
        n,
        xtx_inv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Measure;
    use chrono::NaiveDate;

    fn input(values: &[f64]) -> ForecastInput {
        let d0 = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        ForecastInput {
            location: "A".to_string(),
            measure: Measure::NewCases,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| (d0 + Duration::days(i as i64), *v))
                .collect(),
        }
    }

    #[test]
    fn fit_model_recovers_linear_trend() {
        let ts: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let ys: Vec<f64> = ts.iter().map(|t| 5.0 + 2.0 * t).collect();
        let fit = fit_model(ModelKind::Trend, &ts, &ys).unwrap();
        assert!((fit.betas[0] - 5.0).abs() < 1e-8);
        assert!((fit.betas[1] - 2.0).abs() < 1e-8);
        assert!(fit.rmse < 1e-8);
    }

    #[test]
    fn prediction_se_grows_away_from_history() {
        let ts: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let ys: Vec<f64> = ts.iter().map(|t| 10.0 + 0.5 * t + (t * 0.7).sin()).collect();
        let fit = fit_model(ModelKind::Trend, &ts, &ys).unwrap();
        let se_inside = fit.prediction_se(15.0);
        let se_future = fit.prediction_se(60.0);
        assert!(se_future > se_inside);
    }

    #[test]
    fn forecast_bounds_are_ordered_on_every_row() {
        let values: Vec<f64> = (0..40).map(|i| 100.0 + 3.0 * i as f64).collect();
        let forecaster = SeasonalTrendForecaster::default();
        let series = forecaster.forecast(&input(&values), 14).unwrap();
        assert_eq!(series.points.len(), 40 + 14);
        for p in &series.points {
            assert!(
                p.lower <= p.predicted && p.predicted <= p.upper,
                "unordered bounds at {}",
                p.date
            );
        }
    }

    #[test]
    fn forecast_future_dates_are_daily_and_contiguous() {
        let values: Vec<f64> = (0..100).map(|i| 50.0 + (i % 7) as f64).collect();
        let forecaster = SeasonalTrendForecaster::default();
        let series = forecaster.forecast(&input(&values), 30).unwrap();

        assert_eq!(series.points.len(), 130);
        assert_eq!(series.history_len, 100);
        let future = series.future();
        assert_eq!(future.len(), 30);

        let last_hist = series.fitted().last().unwrap().date;
        let mut expected = last_hist;
        for p in future {
            expected += Duration::days(1);
            assert_eq!(p.date, expected);
        }
    }

    #[test]
    fn two_point_history_is_enough() {
        let forecaster = SeasonalTrendForecaster::default();
        let series = forecaster.forecast(&input(&[10.0, 12.0]), 7).unwrap();
        assert_eq!(series.points.len(), 9);
    }

    #[test]
    fn one_point_history_is_insufficient() {
        let forecaster = SeasonalTrendForecaster::default();
        let err = forecaster.forecast(&input(&[10.0]), 7).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
