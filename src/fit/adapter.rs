//! Forecast adapter: shapes a series into the collaborator contract and
//! validates what comes back.
//!
//! The adapter owns three responsibilities:
//! - drop absent values and enforce the minimum-history rule
//! - enforce the configured horizon bounds (error, not clamp — widgets clamp
//!   before calling the core, so interactive use never hits the error)
//! - verify the collaborator honored its output contract before anything
//!   downstream renders it

use chrono::Duration;

use crate::domain::{ForecastInput, ForecastSeries, TimeSeries};
use crate::error::AppError;
use crate::fit::forecaster::Forecaster;

/// Forecasting libraries degrade or fail below this many points.
pub const MIN_HISTORY_POINTS: usize = 2;

/// Allowed horizon range in days, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HorizonBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for HorizonBounds {
    fn default() -> Self {
        Self { min: 7, max: 90 }
    }
}

impl HorizonBounds {
    pub fn contains(&self, horizon_days: u32) -> bool {
        horizon_days >= self.min && horizon_days <= self.max
    }

    /// Clamp a widget value into range (used by sliders, not by the core).
    pub fn clamp(&self, horizon_days: u32) -> u32 {
        horizon_days.clamp(self.min, self.max)
    }
}

/// Drop absent values and reshape into the `(timestamp, value)` contract.
///
/// Fails with an insufficient-history error when fewer than
/// [`MIN_HISTORY_POINTS`] usable points remain.
pub fn prepare_for_forecast(series: &TimeSeries) -> Result<ForecastInput, AppError> {
    let points: Vec<(chrono::NaiveDate, f64)> = series
        .points
        .iter()
        .filter_map(|p| p.value.map(|v| (p.date, v)))
        .collect();

    if points.len() < MIN_HISTORY_POINTS {
        return Err(AppError::insufficient_history(format!(
            "'{}' has {} usable point(s) for {}; need at least {MIN_HISTORY_POINTS} to forecast.",
            series.location,
            points.len(),
            series.measure.display_name(),
        )));
    }

    Ok(ForecastInput {
        location: series.location.clone(),
        measure: series.measure,
        points,
    })
}

/// Reject horizons outside the configured bounds.
pub fn check_horizon(horizon_days: u32, bounds: &HorizonBounds) -> Result<(), AppError> {
    if !bounds.contains(horizon_days) {
        return Err(AppError::invalid_horizon(format!(
            "Horizon {horizon_days}d is outside the allowed range {}..={}d.",
            bounds.min, bounds.max
        )));
    }
    Ok(())
}

/// Delegate to the forecasting collaborator and validate its response.
pub fn run_forecast(
    forecaster: &dyn Forecaster,
    input: &ForecastInput,
    horizon_days: u32,
    bounds: &HorizonBounds,
) -> Result<ForecastSeries, AppError> {
    check_horizon(horizon_days, bounds)?;
    let series = forecaster.forecast(input, horizon_days)?;
    validate_response(input, horizon_days, &series)?;
    Ok(series)
}

pub(crate) fn validate_response(
    input: &ForecastInput,
    horizon_days: u32,
    series: &ForecastSeries,
) -> Result<(), AppError> {
    let n = input.points.len();
    let expected = n + horizon_days as usize;

    if series.history_len != n {
        return Err(AppError::internal(format!(
            "Forecaster reported history_len {} for a {n}-point history.",
            series.history_len
        )));
    }
    if series.points.len() != expected {
        return Err(AppError::internal(format!(
            "Forecaster returned {} rows, expected {expected}.",
            series.points.len()
        )));
    }

    for (row, (date, _)) in series.fitted().iter().zip(input.points.iter()) {
        if row.date != *date {
            return Err(AppError::internal(format!(
                "Fitted region dates diverge from history at {date}."
            )));
        }
    }

    let last_hist = input
        .last_date()
        .ok_or_else(|| AppError::internal("Empty forecast input."))?;
    let mut expected_date = last_hist;
    for row in series.future() {
        expected_date += Duration::days(1);
        if row.date != expected_date {
            return Err(AppError::internal(format!(
                "Future dates must be daily and contiguous; got {} expecting {expected_date}.",
                row.date
            )));
        }
    }

    for row in &series.points {
        if !(row.predicted.is_finite() && row.lower.is_finite() && row.upper.is_finite()) {
            return Err(AppError::internal(format!(
                "Non-finite forecast values at {}.",
                row.date
            )));
        }
        if !(row.lower <= row.predicted && row.predicted <= row.upper) {
            return Err(AppError::internal(format!(
                "Forecast bounds out of order at {}.",
                row.date
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Measure, SeriesPoint};
    use crate::fit::forecaster::SeasonalTrendForecaster;
    use chrono::NaiveDate;

    fn series(values: &[Option<f64>]) -> TimeSeries {
        let d0 = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        TimeSeries {
            location: "A".to_string(),
            measure: Measure::NewCases,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| SeriesPoint {
                    date: d0 + Duration::days(i as i64),
                    value: *v,
                })
                .collect(),
        }
    }

    #[test]
    fn prepare_drops_absent_values() {
        let input = prepare_for_forecast(&series(&[Some(1.0), None, Some(3.0)])).unwrap();
        assert_eq!(input.points.len(), 2);
        assert_eq!(input.points[1].1, 3.0);
    }

    #[test]
    fn prepare_fails_below_minimum_history() {
        let err = prepare_for_forecast(&series(&[Some(1.0), None])).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        // An empty selection flows through as an empty series and fails the
        // same way, not with a panic.
        let err = prepare_for_forecast(&series(&[])).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn horizon_outside_bounds_is_rejected() {
        let input = prepare_for_forecast(&series(&[Some(1.0), Some(2.0), Some(3.0)])).unwrap();
        let forecaster = SeasonalTrendForecaster::default();
        let bounds = HorizonBounds::default();

        for bad in [0, 6, 91, 400] {
            let err = run_forecast(&forecaster, &input, bad, &bounds).unwrap_err();
            assert_eq!(err.exit_code(), 2, "horizon {bad} should be rejected");
        }
        assert!(run_forecast(&forecaster, &input, 7, &bounds).is_ok());
        assert!(run_forecast(&forecaster, &input, 90, &bounds).is_ok());
    }

    #[test]
    fn horizon_30_on_100_point_history_yields_130_rows() {
        let values: Vec<Option<f64>> = (0..100).map(|i| Some(20.0 + i as f64)).collect();
        let input = prepare_for_forecast(&series(&values)).unwrap();
        let forecaster = SeasonalTrendForecaster::default();
        let out = run_forecast(&forecaster, &input, 30, &HorizonBounds::default()).unwrap();

        assert_eq!(out.points.len(), 130);
        let future = out.future();
        assert_eq!(future.len(), 30);
        for w in future.windows(2) {
            assert_eq!((w[1].date - w[0].date).num_days(), 1);
        }
        assert_eq!(
            future[0].date,
            input.last_date().unwrap() + Duration::days(1)
        );
    }

    #[test]
    fn history_gaps_do_not_break_validation() {
        // Drop a stretch in the middle: the fitted region must align with the
        // surviving dates, and the future must continue after the last one.
        let mut values: Vec<Option<f64>> = (0..60).map(|i| Some(5.0 + i as f64)).collect();
        for v in values.iter_mut().skip(20).take(10) {
            *v = None;
        }
        let input = prepare_for_forecast(&series(&values)).unwrap();
        assert_eq!(input.points.len(), 50);

        let forecaster = SeasonalTrendForecaster::default();
        let out = run_forecast(&forecaster, &input, 7, &HorizonBounds::default()).unwrap();
        assert_eq!(out.points.len(), 57);
    }

    #[test]
    fn clamp_is_available_for_widgets() {
        let bounds = HorizonBounds::default();
        assert_eq!(bounds.clamp(1), 7);
        assert_eq!(bounds.clamp(30), 30);
        assert_eq!(bounds.clamp(500), 90);
    }
}
