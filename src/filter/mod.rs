//! Dataset filtering.
//!
//! Both filters are pure, side-effect-free projections: they clone the rows
//! that survive and leave the input untouched. Composing them is
//! order-independent (date-then-location equals location-then-date), which
//! keeps widget handlers free to apply them in whatever order is convenient.

use std::collections::BTreeSet;

use crate::domain::{Dataset, DateRange};

/// Keep rows whose date falls within `range`, inclusive.
pub fn by_date_range(dataset: &Dataset, range: &DateRange) -> Dataset {
    Dataset {
        rows: dataset
            .rows
            .iter()
            .filter(|r| range.contains(r.date))
            .cloned()
            .collect(),
        schema: dataset.schema.clone(),
    }
}

/// Keep rows whose location is a member of `locations`.
///
/// An empty set yields an empty dataset, not an error.
pub fn by_locations(dataset: &Dataset, locations: &BTreeSet<String>) -> Dataset {
    Dataset {
        rows: dataset
            .rows
            .iter()
            .filter(|r| locations.contains(&r.location))
            .cloned()
            .collect(),
        schema: dataset.schema.clone(),
    }
}

/// Convenience for the single-country view.
pub fn by_location(dataset: &Dataset, location: &str) -> Dataset {
    let mut set = BTreeSet::new();
    set.insert(location.to_string());
    by_locations(dataset, &set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Measure, MeasureValues, Observation, Schema};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    fn row(location: &str, day: u32, new_cases: f64) -> Observation {
        let mut values = MeasureValues::default();
        values.set(Measure::NewCases, Some(new_cases));
        Observation {
            location: location.to_string(),
            continent: None,
            date: d(day),
            values,
        }
    }

    fn dataset() -> Dataset {
        let mut schema = Schema::default();
        schema.mark(Measure::NewCases);
        Dataset {
            rows: vec![
                row("A", 1, 10.0),
                row("A", 2, 20.0),
                row("A", 3, 30.0),
                row("B", 1, 5.0),
                row("B", 2, 6.0),
                row("C", 3, 7.0),
            ],
            schema,
        }
    }

    #[test]
    fn date_range_filter_is_inclusive() {
        let ds = dataset();
        let range = DateRange::new(d(2), d(3)).unwrap();
        let out = by_date_range(&ds, &range);
        assert_eq!(out.len(), 4);
        assert!(out.rows.iter().all(|r| r.date >= d(2) && r.date <= d(3)));
    }

    #[test]
    fn location_filter_keeps_members_only() {
        let ds = dataset();
        let set: BTreeSet<String> = ["A", "C"].iter().map(|s| s.to_string()).collect();
        let out = by_locations(&ds, &set);
        assert_eq!(out.len(), 4);
        assert_eq!(out.locations(), vec!["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn empty_location_set_yields_empty_dataset() {
        let ds = dataset();
        let out = by_locations(&ds, &BTreeSet::new());
        assert!(out.is_empty());
        assert_eq!(out.schema, ds.schema);
    }

    #[test]
    fn filters_commute() {
        let ds = dataset();
        let range = DateRange::new(d(1), d(2)).unwrap();
        let set: BTreeSet<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();

        let date_then_loc = by_locations(&by_date_range(&ds, &range), &set);
        let loc_then_date = by_date_range(&by_locations(&ds, &set), &range);
        assert_eq!(date_then_loc, loc_then_date);
    }
}
