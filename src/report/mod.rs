//! Reporting: summary metrics and comparison data shapes.
//!
//! We keep the computation here and the formatting in `format` so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for golden tests)

use chrono::NaiveDate;

use crate::agg;
use crate::domain::{Dataset, DateRange, Measure, TimeSeries};

pub mod format;

pub use format::*;

/// Worldwide headline metrics: the peak of each cumulative global series.
#[derive(Debug, Clone)]
pub struct GlobalSummary {
    pub locations: usize,
    pub span: Option<DateRange>,
    pub total_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub people_vaccinated: Option<f64>,
}

/// Compute the global summary from cross-location daily totals.
pub fn global_summary(dataset: &Dataset) -> GlobalSummary {
    let totals = agg::global_daily_totals(dataset);
    let max_of = |measure: Measure| -> Option<f64> {
        totals
            .iter()
            .find(|(m, _)| *m == measure)
            .and_then(|(_, series)| series_max(series))
    };

    GlobalSummary {
        locations: dataset.locations().len(),
        span: dataset.span(),
        total_cases: max_of(Measure::TotalCases),
        total_deaths: max_of(Measure::TotalDeaths),
        people_vaccinated: max_of(Measure::PeopleVaccinated),
    }
}

/// One cross-sectional comparison row: a location's last-known value for the
/// compared measure next to its last-known total cases.
#[derive(Debug, Clone)]
pub struct SnapshotRow {
    pub location: String,
    pub x: Option<f64>,
    pub total_cases: Option<f64>,
}

/// Cross-sectional comparison of one measure against total cases.
#[derive(Debug, Clone)]
pub struct SnapshotComparison {
    pub measure: Measure,
    pub rows: Vec<SnapshotRow>,
}

/// Build a cross-sectional comparison, or `None` when the store never
/// provided the compared column (schema capability query, no row probing).
pub fn snapshot_comparison(dataset: &Dataset, measure: Measure) -> Option<SnapshotComparison> {
    if !dataset.schema.has(measure) || !dataset.schema.has(Measure::TotalCases) {
        return None;
    }

    let mut rows: Vec<SnapshotRow> = agg::latest_snapshot(dataset)
        .into_iter()
        .map(|(location, obs)| SnapshotRow {
            location,
            x: obs.values.get(measure),
            total_cases: obs.values.get(Measure::TotalCases),
        })
        .collect();

    // Largest outbreaks first; locations without totals go last.
    rows.sort_by(|a, b| {
        b.total_cases
            .unwrap_or(f64::NEG_INFINITY)
            .partial_cmp(&a.total_cases.unwrap_or(f64::NEG_INFINITY))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Some(SnapshotComparison { measure, rows })
}

/// Dates-by-locations pivot for the multi-country comparison view.
///
/// Absent cells are filled with 0 so every column has the same length.
#[derive(Debug, Clone)]
pub struct ComparisonPivot {
    pub measure: Measure,
    pub locations: Vec<String>,
    pub rows: Vec<(NaiveDate, Vec<f64>)>,
}

pub fn comparison_pivot(
    dataset: &Dataset,
    locations: &[String],
    measure: Measure,
) -> ComparisonPivot {
    let series: Vec<TimeSeries> = locations
        .iter()
        .map(|loc| agg::location_series(dataset, loc, measure))
        .collect();

    let mut dates: Vec<NaiveDate> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.date))
        .collect();
    dates.sort();
    dates.dedup();

    let rows = dates
        .into_iter()
        .map(|date| {
            let values = series
                .iter()
                .map(|s| {
                    s.points
                        .iter()
                        .find(|p| p.date == date)
                        .and_then(|p| p.value)
                        .unwrap_or(0.0)
                })
                .collect();
            (date, values)
        })
        .collect();

    ComparisonPivot {
        measure,
        locations: locations.to_vec(),
        rows,
    }
}

/// Maximum present value of a series.
pub fn series_max(series: &TimeSeries) -> Option<f64> {
    series
        .points
        .iter()
        .filter_map(|p| p.value)
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MeasureValues, Observation, Schema};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    fn row(location: &str, day: u32, total_cases: f64, aged: Option<f64>) -> Observation {
        let mut values = MeasureValues::default();
        values.set(Measure::TotalCases, Some(total_cases));
        values.set(Measure::Aged65Older, aged);
        Observation {
            location: location.to_string(),
            continent: None,
            date: d(day),
            values,
        }
    }

    fn dataset(rows: Vec<Observation>, with_aged: bool) -> Dataset {
        let mut schema = Schema::default();
        schema.mark(Measure::TotalCases);
        if with_aged {
            schema.mark(Measure::Aged65Older);
        }
        Dataset { rows, schema }
    }

    #[test]
    fn global_summary_takes_peak_of_totals() {
        let ds = dataset(
            vec![
                row("A", 1, 10.0, None),
                row("A", 2, 30.0, None),
                row("B", 1, 5.0, None),
                row("B", 2, 7.0, None),
            ],
            false,
        );
        let summary = global_summary(&ds);
        assert_eq!(summary.total_cases, Some(37.0));
        assert_eq!(summary.locations, 2);
        // Absent cumulative series stay absent, not zero.
        assert_eq!(summary.total_deaths, None);
    }

    #[test]
    fn snapshot_comparison_requires_schema_capability() {
        let ds = dataset(vec![row("A", 1, 10.0, Some(15.0))], false);
        assert!(snapshot_comparison(&ds, Measure::Aged65Older).is_none());

        let ds = dataset(
            vec![row("A", 1, 10.0, Some(15.0)), row("B", 1, 99.0, Some(5.0))],
            true,
        );
        let cmp = snapshot_comparison(&ds, Measure::Aged65Older).unwrap();
        assert_eq!(cmp.rows.len(), 2);
        // Sorted by total cases, descending.
        assert_eq!(cmp.rows[0].location, "B");
    }

    #[test]
    fn comparison_pivot_fills_absent_with_zero() {
        let ds = dataset(
            vec![row("A", 1, 10.0, None), row("B", 2, 20.0, None)],
            false,
        );
        let pivot = comparison_pivot(
            &ds,
            &["A".to_string(), "B".to_string()],
            Measure::TotalCases,
        );
        assert_eq!(pivot.rows.len(), 2);
        assert_eq!(pivot.rows[0].1, vec![10.0, 0.0]);
        assert_eq!(pivot.rows[1].1, vec![0.0, 20.0]);
    }
}
