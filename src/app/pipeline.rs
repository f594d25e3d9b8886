//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> filter (date range, location) -> aggregate/trend -> forecast
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! Every widget change re-runs the relevant stage top to bottom; the only
//! shared state is the dataset cache in `data::STORE`.

use crate::agg;
use crate::domain::{DashConfig, Dataset, DateRange, ForecastInput, ForecastSeries, TimeSeries, TrendKind};
use crate::error::{AppError, ErrorKind};
use crate::filter;
use crate::fit::adapter::{check_horizon, prepare_for_forecast, validate_response, HorizonBounds};
use crate::fit::forecaster::SeasonalTrendForecaster;
use crate::fit::selection::FitDiagnostics;
use crate::report::{global_summary, GlobalSummary};
use crate::trend;

/// Everything the summary/trend widgets need for one interaction.
#[derive(Debug, Clone)]
pub struct ViewOutput {
    pub summary: GlobalSummary,
    /// Effective range after clamping to the dataset span; `None` when the
    /// requested range and the data are disjoint.
    pub range: Option<DateRange>,
    /// Raw per-location series for the selected measure, range-filtered.
    pub series: TimeSeries,
    /// The series after the selected trend transform.
    pub trend: TimeSeries,
}

/// Forecast results for one interaction.
///
/// Insufficient history is a recoverable condition here: the dashboard shows
/// `note` instead of a chart rather than aborting the whole view.
#[derive(Debug, Clone, Default)]
pub struct ForecastStage {
    pub input: Option<ForecastInput>,
    pub forecast: Option<ForecastSeries>,
    pub diagnostics: Option<FitDiagnostics>,
    pub note: Option<String>,
}

/// All computed outputs of a single dashboard evaluation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub view: ViewOutput,
    pub forecast: ForecastStage,
}

/// Resolve the requested date range against the dataset's observed span.
///
/// Missing endpoints default to the span's own bounds; the result is clamped
/// to the span. `Ok(None)` means there is nothing to show (empty dataset or
/// a disjoint request) — an empty selection, not an error.
pub fn effective_range(
    dataset: &Dataset,
    config: &DashConfig,
) -> Result<Option<DateRange>, AppError> {
    let Some(span) = dataset.span() else {
        return Ok(None);
    };
    let start = config.range_start.unwrap_or_else(|| span.start());
    let end = config.range_end.unwrap_or_else(|| span.end());
    let requested = DateRange::new(start, end)?;
    Ok(requested.clamp_to(&span))
}

/// Build the range- and location-filtered series the trend and forecast
/// stages both consume.
pub fn selected_series(
    dataset: &Dataset,
    config: &DashConfig,
    range: Option<&DateRange>,
) -> TimeSeries {
    match range {
        Some(range) => {
            let slice = filter::by_date_range(dataset, range);
            agg::location_series(&slice, &config.location, config.measure)
        }
        None => TimeSeries::new(config.location.clone(), config.measure),
    }
}

/// Run the summary + trend stages.
pub fn run_view(dataset: &Dataset, config: &DashConfig) -> Result<ViewOutput, AppError> {
    let summary = global_summary(dataset);
    let range = effective_range(dataset, config)?;
    let series = selected_series(dataset, config, range.as_ref());

    let trend = match config.trend {
        TrendKind::Raw => series.clone(),
        TrendKind::Average => trend::moving_average(&series, config.window)?,
        TrendKind::Growth => trend::growth_rate(&series),
    };

    Ok(ViewOutput {
        summary,
        range,
        series,
        trend,
    })
}

/// Run the forecast stage on the location-filtered (not trend-transformed)
/// slice and drive the forecasting collaborator.
pub fn run_forecast_stage(
    dataset: &Dataset,
    config: &DashConfig,
    forecaster: &SeasonalTrendForecaster,
    bounds: &HorizonBounds,
) -> Result<ForecastStage, AppError> {
    check_horizon(config.horizon_days, bounds)?;

    let range = effective_range(dataset, config)?;
    let series = selected_series(dataset, config, range.as_ref());

    let input = match prepare_for_forecast(&series) {
        Ok(input) => input,
        Err(err) if err.kind() == ErrorKind::InsufficientHistory => {
            return Ok(ForecastStage {
                note: Some(err.to_string()),
                ..ForecastStage::default()
            });
        }
        Err(err) => return Err(err),
    };

    let (forecast, diagnostics) =
        forecaster.forecast_with_diagnostics(&input, config.horizon_days)?;
    validate_response(&input, config.horizon_days, &forecast)?;

    Ok(ForecastStage {
        input: Some(input),
        forecast: Some(forecast),
        diagnostics: Some(diagnostics),
        note: None,
    })
}

/// Execute the full pipeline for one interaction.
pub fn run_dashboard(
    dataset: &Dataset,
    config: &DashConfig,
    forecaster: &SeasonalTrendForecaster,
    bounds: &HorizonBounds,
) -> Result<RunOutput, AppError> {
    let view = run_view(dataset, config)?;
    let forecast = run_forecast_stage(dataset, config, forecaster, bounds)?;
    Ok(RunOutput { view, forecast })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_sample, SampleSpec};
    use crate::domain::{Measure, ModelSpec};
    use chrono::NaiveDate;

    fn config(location: &str) -> DashConfig {
        DashConfig {
            location: location.to_string(),
            compare_locations: Vec::new(),
            measure: Measure::NewCases,
            trend: TrendKind::Average,
            window: 7,
            range_start: None,
            range_end: None,
            horizon_days: 30,
            confidence_level: 0.95,
            model_spec: ModelSpec::Auto,
            top_n: 10,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export: None,
            export_forecast: None,
        }
    }

    fn dataset() -> crate::domain::Dataset {
        generate_sample(&SampleSpec {
            locations: 3,
            days: 120,
            ..SampleSpec::default()
        })
        .unwrap()
    }

    #[test]
    fn full_pipeline_produces_forecast_on_sample_data() {
        let ds = dataset();
        let cfg = config("Brazil");
        let out = run_dashboard(
            &ds,
            &cfg,
            &SeasonalTrendForecaster::default(),
            &HorizonBounds::default(),
        )
        .unwrap();

        assert!(!out.view.series.is_empty());
        assert_eq!(out.view.trend.len(), out.view.series.len());
        let forecast = out.forecast.forecast.expect("sample data must forecast");
        assert_eq!(
            forecast.points.len(),
            forecast.history_len + cfg.horizon_days as usize
        );
        assert!(out.forecast.note.is_none());
    }

    #[test]
    fn unknown_location_is_an_empty_selection_with_a_note() {
        let ds = dataset();
        let out = run_dashboard(
            &ds,
            &config("Atlantis"),
            &SeasonalTrendForecaster::default(),
            &HorizonBounds::default(),
        )
        .unwrap();

        assert!(out.view.series.is_empty());
        assert!(out.forecast.forecast.is_none());
        assert!(out.forecast.note.is_some());
    }

    #[test]
    fn disjoint_range_yields_empty_view_not_error() {
        let ds = dataset();
        let mut cfg = config("Brazil");
        cfg.range_start = Some(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        cfg.range_end = Some(NaiveDate::from_ymd_opt(1990, 12, 31).unwrap());

        let view = run_view(&ds, &cfg).unwrap();
        assert!(view.range.is_none());
        assert!(view.series.is_empty());
    }

    #[test]
    fn out_of_bounds_horizon_fails_before_fitting() {
        let ds = dataset();
        let mut cfg = config("Brazil");
        cfg.horizon_days = 365;
        let err = run_forecast_stage(
            &ds,
            &cfg,
            &SeasonalTrendForecaster::default(),
            &HorizonBounds::default(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn range_endpoints_are_clamped_to_the_span() {
        let ds = dataset();
        let mut cfg = config("Brazil");
        cfg.range_start = Some(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        let range = effective_range(&ds, &cfg).unwrap().unwrap();
        assert_eq!(Some(range.start()), ds.span().map(|s| s.start()));
    }
}
