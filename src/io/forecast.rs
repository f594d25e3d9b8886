//! Read/write saved forecast JSON files.
//!
//! Forecast JSON is the "portable" representation of a forecast run:
//! - location, measure and model label
//! - horizon, history length and confidence level
//! - the full `(date, predicted, lower, upper)` point list
//!
//! The schema is defined by `domain::ForecastFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{ForecastFile, ForecastSeries};
use crate::error::AppError;

/// Write a forecast JSON file.
pub fn write_forecast_json(path: &Path, series: &ForecastSeries) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::invalid_input(format!(
            "Failed to create forecast JSON '{}': {e}",
            path.display()
        ))
    })?;

    let out = ForecastFile {
        tool: "epi".to_string(),
        series: series.clone(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::invalid_input(format!("Failed to write forecast JSON: {e}")))?;

    Ok(())
}

/// Read a forecast JSON file.
pub fn read_forecast_json(path: &Path) -> Result<ForecastFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::invalid_input(format!(
            "Failed to open forecast JSON '{}': {e}",
            path.display()
        ))
    })?;
    let parsed: ForecastFile = serde_json::from_reader(file)
        .map_err(|e| AppError::invalid_input(format!("Invalid forecast JSON: {e}")))?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, Measure};
    use chrono::NaiveDate;

    #[test]
    fn forecast_json_round_trips() {
        let series = ForecastSeries {
            location: "Kenya".to_string(),
            measure: Measure::NewDeaths,
            model: "Trend+Weekly".to_string(),
            confidence_level: 0.95,
            horizon_days: 7,
            history_len: 2,
            points: vec![ForecastPoint {
                date: NaiveDate::from_ymd_opt(2021, 8, 1).unwrap(),
                predicted: 3.0,
                lower: 1.0,
                upper: 5.0,
            }],
        };

        let dir = std::env::temp_dir().join("epi_trends_json_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("forecast.json");

        write_forecast_json(&path, &series).unwrap();
        let loaded = read_forecast_json(&path).unwrap();
        assert_eq!(loaded.tool, "epi");
        assert_eq!(loaded.series, series);
    }
}
