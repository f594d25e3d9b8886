//! Trend transforms over a per-location series.
//!
//! Both transforms preserve the input's date alignment exactly: same length,
//! same dates, only values change. Rolling windows operate on row order, not
//! calendar-filled order — a gap in the history does not widen the window.

use crate::domain::{SeriesPoint, TimeSeries};
use crate::error::AppError;

/// Default trailing window length, matching the dashboard's 7-day average.
pub const DEFAULT_WINDOW: usize = 7;

/// Strict trailing moving average.
///
/// Output at index `i` is the mean of the `window` values ending at `i`.
/// Positions with fewer than `window` values available (including `i`), or
/// with any absent value inside the window, produce `None` — partial windows
/// are never computed.
pub fn moving_average(series: &TimeSeries, window: usize) -> Result<TimeSeries, AppError> {
    if window == 0 {
        return Err(AppError::invalid_input("Moving-average window must be > 0."));
    }

    let mut points = Vec::with_capacity(series.points.len());
    for (i, p) in series.points.iter().enumerate() {
        let value = if i + 1 < window {
            None
        } else {
            let slice = &series.points[i + 1 - window..=i];
            let mut sum = 0.0;
            let mut complete = true;
            for q in slice {
                match q.value {
                    Some(v) => sum += v,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            if complete {
                Some(sum / window as f64)
            } else {
                None
            }
        };
        points.push(SeriesPoint {
            date: p.date,
            value,
        });
    }

    Ok(TimeSeries {
        location: series.location.clone(),
        measure: series.measure,
        points,
    })
}

/// Period-over-period percentage change.
///
/// Output at index `i` is `(v[i] - v[i-1]) / v[i-1] * 100`. The result is 0
/// at index 0 and whenever the previous value is zero or absent, or the
/// current value is absent — never ±inf or NaN. This zero-guard is a defined
/// numeric policy, not error suppression.
pub fn growth_rate(series: &TimeSeries) -> TimeSeries {
    let mut points = Vec::with_capacity(series.points.len());
    let mut prev: Option<f64> = None;

    for (i, p) in series.points.iter().enumerate() {
        let value = match (i, prev, p.value) {
            (0, _, _) => 0.0,
            (_, Some(pv), Some(cv)) if pv != 0.0 => (cv - pv) / pv * 100.0,
            _ => 0.0,
        };
        points.push(SeriesPoint {
            date: p.date,
            value: Some(value),
        });
        prev = p.value;
    }

    TimeSeries {
        location: series.location.clone(),
        measure: series.measure,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Measure;
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
                    date: d0 + chrono::Duration::days(i as i64),
                    value: *v,
                })
                .collect(),
        }
    }

    #[test]
    fn moving_average_is_strict_about_partial_windows() {
        // new_cases for A = 10, 20, ..., 100 over 2021-01-01..2021-01-10.
        let input = series(&(1..=10).map(|i| Some(i as f64 * 10.0)).collect::<Vec<_>>());
        let out = moving_average(&input, 7).unwrap();

        assert_eq!(out.len(), input.len());
        for i in 0..6 {
            assert_eq!(out.points[i].value, None, "position {i} has a partial window");
        }
        // At 2021-01-07 (index 6): mean(10..70) = 40.
        assert_eq!(out.points[6].date, NaiveDate::from_ymd_opt(2021, 1, 7).unwrap());
        assert_eq!(out.points[6].value, Some(40.0));
        assert_eq!(out.points[9].value, Some(70.0));
    }

    #[test]
    fn moving_average_skips_windows_with_absent_values() {
        let mut values: Vec<Option<f64>> = (1..=10).map(|i| Some(i as f64)).collect();
        values[4] = None;
        let out = moving_average(&series(&values), 7).unwrap();

        // Any window covering index 4 is incomplete.
        for i in 6..=10usize.min(values.len() - 1) {
            let covers_gap = i >= 4 && i.saturating_sub(6) <= 4;
            assert_eq!(out.points[i].value.is_none(), covers_gap, "index {i}");
        }
    }

    #[test]
    fn moving_average_rejects_zero_window() {
        let err = moving_average(&series(&[Some(1.0)]), 0).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn growth_rate_guards_zero_and_absent_predecessors() {
        // Value sequence [0, 50] must yield [0, 0], not infinity.
        let out = growth_rate(&series(&[Some(0.0), Some(50.0)]));
        assert_eq!(out.points[0].value, Some(0.0));
        assert_eq!(out.points[1].value, Some(0.0));

        let out = growth_rate(&series(&[None, Some(50.0), Some(100.0), None, Some(25.0)]));
        assert_eq!(out.points[0].value, Some(0.0));
        assert_eq!(out.points[1].value, Some(0.0)); // prev absent
        assert_eq!(out.points[2].value, Some(100.0)); // 50 -> 100
        assert_eq!(out.points[3].value, Some(0.0)); // current absent
        assert_eq!(out.points[4].value, Some(0.0)); // prev absent
    }

    #[test]
    fn transforms_preserve_date_alignment() {
        let input = series(&[Some(1.0), None, Some(3.0), Some(4.0)]);
        let ma = moving_average(&input, 2).unwrap();
        let gr = growth_rate(&input);
        let dates: Vec<_> = input.points.iter().map(|p| p.date).collect();
        assert_eq!(ma.points.iter().map(|p| p.date).collect::<Vec<_>>(), dates);
        assert_eq!(gr.points.iter().map(|p| p.date).collect::<Vec<_>>(), dates);
    }
}
