//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the filter/aggregate/forecast pipeline
//! - exported to JSON/CSV
//! - reloaded later for plotting saved forecasts

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Numeric measure columns recognized in the backing store.
///
/// The loader restricts ingest to this set; everything else in the file is
/// ignored. `ExcessMortality`, `NewTests` and `TotalTests` are optional —
/// a store without them is still valid, and consumers must query the loaded
/// [`Schema`] before using them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    TotalCases,
    NewCases,
    TotalDeaths,
    NewDeaths,
    PeopleVaccinated,
    Aged65Older,
    IcuPatients,
    HospitalBedsPerThousand,
    GdpPerCapita,
    Population,
    ExcessMortality,
    NewTests,
    TotalTests,
}

/// Number of recognized measure columns.
pub const MEASURE_COUNT: usize = 13;

impl Measure {
    pub const ALL: [Measure; MEASURE_COUNT] = [
        Measure::TotalCases,
        Measure::NewCases,
        Measure::TotalDeaths,
        Measure::NewDeaths,
        Measure::PeopleVaccinated,
        Measure::Aged65Older,
        Measure::IcuPatients,
        Measure::HospitalBedsPerThousand,
        Measure::GdpPerCapita,
        Measure::Population,
        Measure::ExcessMortality,
        Measure::NewTests,
        Measure::TotalTests,
    ];

    /// Column name as it appears in the backing store header.
    pub fn column_name(self) -> &'static str {
        match self {
            Measure::TotalCases => "total_cases",
            Measure::NewCases => "new_cases",
            Measure::TotalDeaths => "total_deaths",
            Measure::NewDeaths => "new_deaths",
            Measure::PeopleVaccinated => "people_vaccinated",
            Measure::Aged65Older => "aged_65_older",
            Measure::IcuPatients => "icu_patients",
            Measure::HospitalBedsPerThousand => "hospital_beds_per_thousand",
            Measure::GdpPerCapita => "gdp_per_capita",
            Measure::Population => "population",
            Measure::ExcessMortality => "excess_mortality",
            Measure::NewTests => "new_tests",
            Measure::TotalTests => "total_tests",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Measure::TotalCases => "Total cases",
            Measure::NewCases => "New cases",
            Measure::TotalDeaths => "Total deaths",
            Measure::NewDeaths => "New deaths",
            Measure::PeopleVaccinated => "People vaccinated",
            Measure::Aged65Older => "Aged 65+ (%)",
            Measure::IcuPatients => "ICU patients",
            Measure::HospitalBedsPerThousand => "Hospital beds / 1k",
            Measure::GdpPerCapita => "GDP per capita",
            Measure::Population => "Population",
            Measure::ExcessMortality => "Excess mortality",
            Measure::NewTests => "New tests",
            Measure::TotalTests => "Total tests",
        }
    }

    /// Columns the loader tolerates missing from the store.
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Measure::ExcessMortality | Measure::NewTests | Measure::TotalTests
        )
    }

    pub(crate) fn index(self) -> usize {
        Measure::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }
}

/// Per-row measure values; absent cells stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureValues([Option<f64>; MEASURE_COUNT]);

impl MeasureValues {
    pub fn get(&self, measure: Measure) -> Option<f64> {
        self.0[measure.index()]
    }

    pub fn set(&mut self, measure: Measure, value: Option<f64>) {
        self.0[measure.index()] = value;
    }
}

/// One dated measurement row for one location.
///
/// Invariant: `(location, date)` is unique per source row. Ingest keeps the
/// first row it encounters when a store violates this.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub location: String,
    pub continent: Option<String>,
    pub date: NaiveDate,
    pub values: MeasureValues,
}

/// Which measure columns the backing store actually provided.
///
/// Consumers query this instead of probing rows for presence, so "is this
/// column available" is answered once at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema([bool; MEASURE_COUNT]);

impl Schema {
    pub fn mark(&mut self, measure: Measure) {
        self.0[measure.index()] = true;
    }

    pub fn has(&self, measure: Measure) -> bool {
        self.0[measure.index()]
    }

    /// Measures present in the store, in `Measure::ALL` order.
    pub fn measures(&self) -> Vec<Measure> {
        Measure::ALL.iter().copied().filter(|m| self.has(*m)).collect()
    }
}

/// The loaded table: ordered observation rows plus the resolved schema.
///
/// Rows are sorted by `(location, date)` at ingest. Datasets are value
/// snapshots — filters and transforms always produce a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<Observation>,
    pub schema: Schema,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Unique location identifiers, sorted.
    pub fn locations(&self) -> Vec<String> {
        let mut out: Vec<String> = self.rows.iter().map(|r| r.location.clone()).collect();
        out.sort();
        out.dedup();
        out
    }

    /// Observed min/max date span, `None` when the dataset is empty.
    pub fn span(&self) -> Option<DateRange> {
        let min = self.rows.iter().map(|r| r.date).min()?;
        let max = self.rows.iter().map(|r| r.date).max()?;
        DateRange::new(min, max).ok()
    }
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::invalid_input(format!(
                "Invalid date range: start {start} is after end {end}."
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Intersect with the dataset's observed span.
    ///
    /// Returns `None` when the two ranges are disjoint (nothing to show),
    /// which callers treat as an empty selection rather than an error.
    pub fn clamp_to(&self, span: &DateRange) -> Option<DateRange> {
        let start = self.start.max(span.start);
        let end = self.end.min(span.end);
        DateRange::new(start, end).ok()
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One point of a per-location, per-measure series. `value` is `None` where
/// the store had no value for that date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Ordered `(date, value)` sequence for a single location and measure.
///
/// Invariants: dates ascend with no duplicates; calendar gaps are preserved,
/// not densified. Transforms keep the date alignment and only change values.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub location: String,
    pub measure: Measure,
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn new(location: impl Into<String>, measure: Measure) -> Self {
        Self {
            location: location.into(),
            measure,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Count of points carrying an actual value.
    pub fn present_len(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }
}

/// Dense forecast history: absent values already dropped, at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastInput {
    pub location: String,
    pub measure: Measure,
    pub points: Vec<(NaiveDate, f64)>,
}

impl ForecastInput {
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(d, _)| *d)
    }
}

/// One forecast row. Invariant: `lower <= predicted <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Forecast output covering the historical fitted region plus the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub location: String,
    pub measure: Measure,
    /// Label of the model the collaborator chose (for display only).
    pub model: String,
    pub confidence_level: f64,
    pub horizon_days: u32,
    pub history_len: usize,
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Rows covering the historical fitted region.
    pub fn fitted(&self) -> &[ForecastPoint] {
        &self.points[..self.history_len.min(self.points.len())]
    }

    /// Rows beyond the last historical date.
    pub fn future(&self) -> &[ForecastPoint] {
        &self.points[self.history_len.min(self.points.len())..]
    }
}

/// A saved forecast file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    pub series: ForecastSeries,
}

/// Trend transform selected in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrendKind {
    /// No transform; show the raw series.
    Raw,
    /// Trailing moving average (default 7-day window).
    Average,
    /// Period-over-period percentage change.
    Growth,
}

impl TrendKind {
    pub fn display_name(self) -> &'static str {
        match self {
            TrendKind::Raw => "Raw",
            TrendKind::Average => "Moving average",
            TrendKind::Growth => "Growth rate (%)",
        }
    }
}

/// Which forecast model(s) the default backend may fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    Auto,
    Flat,
    Trend,
    Seasonal,
}

/// Concrete fitted model kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Intercept only.
    Flat,
    /// Intercept + linear trend.
    Trend,
    /// Intercept + linear trend + weekly Fourier harmonics.
    TrendSeasonal,
}

impl ModelKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Flat => "Flat",
            ModelKind::Trend => "Trend",
            ModelKind::TrendSeasonal => "Trend+Weekly",
        }
    }

    /// Number of regression coefficients for this model.
    pub fn param_count(self) -> usize {
        match self {
            ModelKind::Flat => 1,
            ModelKind::Trend => 2,
            ModelKind::TrendSeasonal => 2 + 2 * crate::models::WEEKLY_HARMONICS,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags or TUI widget state (plus defaults).
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub location: String,
    /// Locations for the multi-country comparison view.
    pub compare_locations: Vec<String>,
    pub measure: Measure,
    pub trend: TrendKind,
    /// Trailing window length for the moving-average transform.
    pub window: usize,
    pub range_start: Option<NaiveDate>,
    pub range_end: Option<NaiveDate>,

    pub horizon_days: u32,
    pub confidence_level: f64,
    pub model_spec: ModelSpec,

    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export: Option<PathBuf>,
    pub export_forecast: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_rejects_inverted_bounds() {
        let a = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert!(DateRange::new(a, b).is_err());
        assert!(DateRange::new(b, a).is_ok());
    }

    #[test]
    fn clamp_to_intersects_with_span() {
        let d = |m: u32, day: u32| NaiveDate::from_ymd_opt(2021, m, day).unwrap();
        let span = DateRange::new(d(2, 1), d(3, 31)).unwrap();

        let wide = DateRange::new(d(1, 1), d(12, 31)).unwrap();
        let clamped = wide.clamp_to(&span).unwrap();
        assert_eq!(clamped.start(), d(2, 1));
        assert_eq!(clamped.end(), d(3, 31));

        let disjoint = DateRange::new(d(5, 1), d(6, 1)).unwrap();
        assert!(disjoint.clamp_to(&span).is_none());
    }

    #[test]
    fn schema_capability_queries() {
        let mut schema = Schema::default();
        assert!(!schema.has(Measure::ExcessMortality));
        schema.mark(Measure::ExcessMortality);
        schema.mark(Measure::NewCases);
        assert!(schema.has(Measure::ExcessMortality));
        assert_eq!(
            schema.measures(),
            vec![Measure::NewCases, Measure::ExcessMortality]
        );
    }

    #[test]
    fn measure_indices_are_distinct() {
        let mut values = MeasureValues::default();
        for (i, m) in Measure::ALL.iter().enumerate() {
            values.set(*m, Some(i as f64));
        }
        for (i, m) in Measure::ALL.iter().enumerate() {
            assert_eq!(values.get(*m), Some(i as f64));
        }
    }

    #[test]
    fn forecast_series_splits_fitted_and_future() {
        let d0 = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let points: Vec<ForecastPoint> = (0..5)
            .map(|i| ForecastPoint {
                date: d0 + chrono::Duration::days(i),
                predicted: i as f64,
                lower: i as f64 - 1.0,
                upper: i as f64 + 1.0,
            })
            .collect();
        let series = ForecastSeries {
            location: "A".to_string(),
            measure: Measure::NewCases,
            model: "Trend".to_string(),
            confidence_level: 0.95,
            horizon_days: 2,
            history_len: 3,
            points,
        };
        assert_eq!(series.fitted().len(), 3);
        assert_eq!(series.future().len(), 2);
        assert_eq!(series.future()[0].date, d0 + chrono::Duration::days(3));
    }
}
