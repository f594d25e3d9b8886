//! Group-level summaries over the dataset.
//!
//! Responsibilities:
//!
//! - extract a per-location series for one measure
//! - sum every measure across locations per date (global daily totals)
//! - pick the last-known row per location (cross-sectional snapshots)
//!
//! All operations are pure functions of the dataset.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::domain::{Dataset, Measure, Observation, SeriesPoint, TimeSeries};

/// Location label used for the cross-location totals series.
pub const GLOBAL_LOCATION: &str = "World";

/// Build the ascending-date series for one location and measure.
///
/// Rows arrive sorted by `(location, date)` from ingest, but filtered slices
/// may interleave locations, so we re-sort by date here. If the store
/// violated the `(location, date)` uniqueness invariant, the first row in
/// input order wins — defined behavior, covered by a test.
pub fn location_series(dataset: &Dataset, location: &str, measure: Measure) -> TimeSeries {
    let mut rows: Vec<&Observation> = dataset
        .rows
        .iter()
        .filter(|r| r.location == location)
        .collect();
    rows.sort_by_key(|r| r.date);

    let mut points: Vec<SeriesPoint> = Vec::with_capacity(rows.len());
    for r in rows {
        if points.last().map(|p| p.date) == Some(r.date) {
            continue;
        }
        points.push(SeriesPoint {
            date: r.date,
            value: r.values.get(measure),
        });
    }

    TimeSeries {
        location: location.to_string(),
        measure,
        points,
    }
}

/// Sum each measure across locations per date.
///
/// Absent values are treated as zero for summation, so a date where every
/// location is absent still yields a 0 total. Returns one ascending-date
/// series per measure present in the schema; measures are computed in
/// parallel since they are independent column scans.
pub fn global_daily_totals(dataset: &Dataset) -> Vec<(Measure, TimeSeries)> {
    let measures = dataset.schema.measures();
    measures
        .into_par_iter()
        .map(|measure| (measure, daily_totals_for(dataset, measure)))
        .collect()
}

fn daily_totals_for(dataset: &Dataset, measure: Measure) -> TimeSeries {
    let mut by_date: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();
    for r in &dataset.rows {
        let slot = by_date.entry(r.date).or_insert(0.0);
        if let Some(v) = r.values.get(measure) {
            *slot += v;
        }
    }

    TimeSeries {
        location: GLOBAL_LOCATION.to_string(),
        measure,
        points: by_date
            .into_iter()
            .map(|(date, value)| SeriesPoint {
                date,
                value: Some(value),
            })
            .collect(),
    }
}

/// For each location, the row with the maximum date.
///
/// Used for cross-sectional (non-temporal) comparisons. If multiple rows
/// share the maximum date for a location, the first encountered in input
/// order wins. Results are sorted by location.
pub fn latest_snapshot(dataset: &Dataset) -> Vec<(String, Observation)> {
    let mut latest: BTreeMap<&str, &Observation> = BTreeMap::new();
    for r in &dataset.rows {
        match latest.get(r.location.as_str()) {
            Some(existing) if existing.date >= r.date => {}
            _ => {
                latest.insert(r.location.as_str(), r);
            }
        }
    }

    latest
        .into_iter()
        .map(|(loc, row)| (loc.to_string(), row.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MeasureValues, Schema};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    fn row(location: &str, day: u32, new_cases: Option<f64>) -> Observation {
        let mut values = MeasureValues::default();
        values.set(Measure::NewCases, new_cases);
        Observation {
            location: location.to_string(),
            continent: None,
            date: d(day),
            values,
        }
    }

    fn dataset(rows: Vec<Observation>) -> Dataset {
        let mut schema = Schema::default();
        schema.mark(Measure::NewCases);
        Dataset { rows, schema }
    }

    #[test]
    fn location_series_sorts_and_keeps_first_duplicate() {
        let ds = dataset(vec![
            row("A", 3, Some(30.0)),
            row("A", 1, Some(10.0)),
            row("A", 3, Some(99.0)),
            row("A", 2, None),
        ]);
        let s = location_series(&ds, "A", Measure::NewCases);
        assert_eq!(s.len(), 3);
        assert_eq!(s.points[0].value, Some(10.0));
        assert_eq!(s.points[1].value, None);
        // Duplicate date: first encountered in input order wins.
        assert_eq!(s.points[2].value, Some(30.0));
    }

    #[test]
    fn global_totals_treat_absent_as_zero() {
        let ds = dataset(vec![
            row("A", 1, Some(10.0)),
            row("B", 1, Some(5.0)),
            row("A", 2, None),
            row("B", 2, None),
            row("A", 3, Some(1.0)),
        ]);
        let totals = global_daily_totals(&ds);
        let (_, series) = totals
            .iter()
            .find(|(m, _)| *m == Measure::NewCases)
            .unwrap();

        assert_eq!(series.location, GLOBAL_LOCATION);
        assert_eq!(series.points[0].value, Some(15.0));
        // Every location absent still yields a 0 total, not a gap.
        assert_eq!(series.points[1].value, Some(0.0));
        assert_eq!(series.points[2].value, Some(1.0));
    }

    #[test]
    fn latest_snapshot_takes_max_date_first_wins_on_tie() {
        let ds = dataset(vec![
            row("A", 1, Some(1.0)),
            row("A", 5, Some(50.0)),
            row("A", 5, Some(99.0)),
            row("B", 2, Some(2.0)),
        ]);
        let snap = latest_snapshot(&ds);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].0, "A");
        assert_eq!(snap[0].1.values.get(Measure::NewCases), Some(50.0));
        assert_eq!(snap[1].0, "B");
        assert_eq!(snap[1].1.date, d(2));
    }
}
