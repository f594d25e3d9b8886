//! CSV ingest and normalization.
//!
//! This module is responsible for turning a raw epidemiological CSV into a
//! clean [`Dataset`] that is safe to filter, aggregate and forecast.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows sorted by `(location, date)`)
//! - **Separation of concerns**: no aggregation or trend logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Dataset, Measure, MeasureValues, Observation, Schema};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub location: Option<String>,
    pub message: String,
}

/// Ingest bookkeeping: what was read, what survived, what was skipped.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub rows_read: usize,
    pub rows_used: usize,
    pub row_errors: Vec<RowError>,
}

/// Load and normalize a CSV file into a dataset.
pub fn read_dataset_csv(path: &Path) -> Result<(Dataset, IngestReport), AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::data_unavailable(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    parse_dataset(file)
}

/// Parse CSV content from any reader into a dataset.
///
/// This is the single ingest path for local files, remote fetches and tests.
pub fn parse_dataset<R: Read>(input: R) -> Result<(Dataset, IngestReport), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data_unavailable(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    // Resolve the schema once: measure columns present in this store.
    let mut schema = Schema::default();
    for measure in Measure::ALL {
        if header_map.contains_key(measure.column_name()) {
            schema.mark(measure);
        }
    }

    let mut rows = Vec::new();
    let mut report = IngestReport::default();

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        report.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                report.row_errors.push(RowError {
                    line,
                    location: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map, &schema) {
            Ok(row) => rows.push(row),
            Err(e) => report.row_errors.push(RowError {
                line,
                location: get_optional(&record, &header_map, "location").map(str::to_string),
                message: e,
            }),
        }
    }

    if rows.is_empty() {
        return Err(AppError::data_unavailable(
            "No valid rows remain after normalization.",
        ));
    }

    // Deterministic order for everything downstream.
    rows.sort_by(|a, b| (a.location.as_str(), a.date).cmp(&(b.location.as_str(), b.date)));

    report.rows_used = rows.len();
    Ok((Dataset { rows, schema }, report))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿date"). If we don't strip it, schema validation will
    // incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    if !header_map.contains_key("date") {
        return Err(AppError::data_unavailable("Missing required column: `date`"));
    }
    if !header_map.contains_key("location") {
        return Err(AppError::data_unavailable(
            "Missing required column: `location`",
        ));
    }
    if !header_map.contains_key("continent") {
        return Err(AppError::data_unavailable(
            "Missing required column: `continent`",
        ));
    }

    for measure in Measure::ALL {
        if !measure.is_optional() && !header_map.contains_key(measure.column_name()) {
            return Err(AppError::data_unavailable(format!(
                "Missing required column: `{}`",
                measure.column_name()
            )));
        }
    }

    Ok(())
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    schema: &Schema,
) -> Result<Observation, String> {
    let location = get_required(record, header_map, "location")?.to_string();
    let date = parse_date(get_required(record, header_map, "date")?)?;
    let continent = get_optional(record, header_map, "continent").map(str::to_string);

    let mut values = MeasureValues::default();
    for measure in Measure::ALL {
        if !schema.has(measure) {
            continue;
        }
        let raw = get_optional(record, header_map, measure.column_name());
        values.set(measure, parse_opt_f64(raw));
    }

    Ok(Observation {
        location,
        continent,
        date,
        values,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but spreadsheet exports often use
    // `DD/MM/YYYY` or `DD-MM-YYYY`. We accept a small set of common formats to
    // reduce friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?;
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
