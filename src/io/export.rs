//! Export forecast rows to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts, so the header matches the dashboard's download wording.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ForecastSeries;
use crate::error::AppError;

/// Write a forecast to a CSV file as `(Date, Predicted Value, Lower Bound, Upper Bound)`.
pub fn write_forecast_csv(path: &Path, series: &ForecastSeries) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::invalid_input(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "Date,Predicted Value,Lower Bound,Upper Bound")
        .map_err(|e| AppError::invalid_input(format!("Failed to write export CSV header: {e}")))?;

    for p in &series.points {
        writeln!(
            file,
            "{},{:.4},{:.4},{:.4}",
            p.date, p.predicted, p.lower, p.upper
        )
        .map_err(|e| AppError::invalid_input(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, Measure};
    use chrono::NaiveDate;

    #[test]
    fn export_writes_expected_rows() {
        let d0 = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        let series = ForecastSeries {
            location: "Peru".to_string(),
            measure: Measure::NewCases,
            model: "Trend".to_string(),
            confidence_level: 0.95,
            horizon_days: 1,
            history_len: 1,
            points: vec![
                ForecastPoint {
                    date: d0,
                    predicted: 10.0,
                    lower: 8.0,
                    upper: 12.0,
                },
                ForecastPoint {
                    date: d0 + chrono::Duration::days(1),
                    predicted: 11.0,
                    lower: 8.5,
                    upper: 13.5,
                },
            ],
        };

        let dir = std::env::temp_dir().join("epi_trends_export_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("forecast.csv");
        write_forecast_csv(&path, &series).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Date,Predicted Value,Lower Bound,Upper Bound"
        );
        assert_eq!(lines.next().unwrap(), "2021-06-01,10.0000,8.0000,12.0000");
        assert_eq!(lines.next().unwrap(), "2021-06-02,11.0000,8.5000,13.5000");
    }
}
