//! Formatted terminal output for summaries, trends and forecasts.

use crate::domain::{ForecastSeries, TimeSeries, TrendKind};
use crate::fit::selection::FitDiagnostics;
use crate::report::{ComparisonPivot, GlobalSummary, SnapshotComparison};

/// Format the worldwide headline metrics.
pub fn format_global_summary(summary: &GlobalSummary, source: &str) -> String {
    let mut out = String::new();

    out.push_str("=== epi - Global Summary ===\n");
    out.push_str(&format!("Source: {source}\n"));
    match &summary.span {
        Some(span) => out.push_str(&format!(
            "Span: {span} ({} days) | locations: {}\n",
            span.num_days(),
            summary.locations
        )),
        None => out.push_str("Span: (empty dataset)\n"),
    }
    out.push_str(&format!(
        "Total cases worldwide:        {}\n",
        fmt_opt_count(summary.total_cases)
    ));
    out.push_str(&format!(
        "Total deaths worldwide:       {}\n",
        fmt_opt_count(summary.total_deaths)
    ));
    out.push_str(&format!(
        "Total vaccinations worldwide: {}\n",
        fmt_opt_count(summary.people_vaccinated)
    ));

    out
}

/// Format one cross-sectional comparison table (top-N locations).
pub fn format_snapshot_table(cmp: &SnapshotComparison, top_n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} vs. total cases (last known per location):\n",
        cmp.measure.display_name()
    ));
    out.push_str(&format!(
        "{:<24} {:>16} {:>16}\n",
        "location",
        cmp.measure.column_name(),
        "total_cases"
    ));
    out.push_str(&format!("{:-<24} {:-<16} {:-<16}\n", "", "", ""));

    for row in cmp.rows.iter().take(top_n) {
        out.push_str(&format!(
            "{:<24} {:>16} {:>16}\n",
            truncate(&row.location, 24),
            fmt_opt_value(row.x),
            fmt_opt_count(row.total_cases),
        ));
    }

    out
}

/// Format a trend table: raw values next to the transformed series.
pub fn format_trend_table(
    raw: &TimeSeries,
    transformed: &TimeSeries,
    kind: TrendKind,
    last_n: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} — {} ({})\n",
        raw.location,
        raw.measure.display_name(),
        kind.display_name()
    ));
    out.push_str(&format!(
        "{:<12} {:>14} {:>14}\n",
        "date",
        "raw",
        match kind {
            TrendKind::Raw => "raw",
            TrendKind::Average => "avg",
            TrendKind::Growth => "growth %",
        }
    ));
    out.push_str(&format!("{:-<12} {:-<14} {:-<14}\n", "", "", ""));

    let skip = raw.points.len().saturating_sub(last_n);
    for (r, t) in raw.points.iter().zip(transformed.points.iter()).skip(skip) {
        out.push_str(&format!(
            "{:<12} {:>14} {:>14}\n",
            r.date,
            fmt_opt_value(r.value),
            fmt_opt_value(t.value),
        ));
    }

    out
}

/// Format the multi-country comparison pivot.
pub fn format_comparison(pivot: &ComparisonPivot, last_n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} comparison ({}):\n",
        pivot.measure.display_name(),
        pivot.locations.join(", ")
    ));

    out.push_str(&format!("{:<12}", "date"));
    for loc in &pivot.locations {
        out.push_str(&format!(" {:>16}", truncate(loc, 16)));
    }
    out.push('\n');

    let skip = pivot.rows.len().saturating_sub(last_n);
    for (date, values) in pivot.rows.iter().skip(skip) {
        out.push_str(&format!("{date:<12}"));
        for v in values {
            out.push_str(&format!(" {:>16}", fmt_count(*v)));
        }
        out.push('\n');
    }

    out
}

/// Format the forecast run summary: metadata, model diagnostics, future rows.
pub fn format_forecast_summary(
    series: &ForecastSeries,
    diagnostics: Option<&FitDiagnostics>,
    last_n: usize,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== epi - Forecast: {} / {} ===\n",
        series.location,
        series.measure.display_name()
    ));
    out.push_str(&format!(
        "Model: {} | horizon: {}d | confidence: {:.0}% | history: {} points\n",
        series.model,
        series.horizon_days,
        series.confidence_level * 100.0,
        series.history_len,
    ));

    if let Some(diags) = diagnostics {
        out.push_str("\nModel diagnostics:\n");
        for fit in &diags.fits {
            let chosen = if fit.chosen { "*" } else { " " };
            out.push_str(&format!(
                "{chosen} {:<14} RMSE={:.3} BIC={:.3}\n",
                fit.kind.display_name(),
                fit.rmse,
                fit.bic
            ));
        }
        for (kind, reason) in &diags.skipped {
            out.push_str(&format!("  (skipped {}) {reason}\n", kind.display_name()));
        }
    }

    out.push_str("\nForecast (future rows):\n");
    out.push_str(&format!(
        "{:<12} {:>14} {:>14} {:>14}\n",
        "date", "predicted", "lower", "upper"
    ));
    out.push_str(&format!("{:-<12} {:-<14} {:-<14} {:-<14}\n", "", "", "", ""));

    let future = series.future();
    let skip = future.len().saturating_sub(last_n);
    for p in future.iter().skip(skip) {
        out.push_str(&format!(
            "{:<12} {:>14.1} {:>14.1} {:>14.1}\n",
            p.date, p.predicted, p.lower, p.upper
        ));
    }

    out
}

/// Thousands-grouped integer rendering (`1234567.8` -> `1,234,568`).
pub fn fmt_count(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let negative = value < 0.0;
    let rounded = value.abs().round() as u64;
    let digits = rounded.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn fmt_opt_count(value: Option<f64>) -> String {
    value.map(fmt_count).unwrap_or_else(|| "-".to_string())
}

fn fmt_opt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateRange, Measure};
    use crate::report::SnapshotRow;
    use chrono::NaiveDate;

    #[test]
    fn fmt_count_groups_thousands() {
        assert_eq!(fmt_count(0.0), "0");
        assert_eq!(fmt_count(999.0), "999");
        assert_eq!(fmt_count(1_000.0), "1,000");
        assert_eq!(fmt_count(1_234_567.8), "1,234,568");
        assert_eq!(fmt_count(-12_345.0), "-12,345");
    }

    #[test]
    fn global_summary_renders_headline_lines() {
        let d = |day: u32| NaiveDate::from_ymd_opt(2021, 1, day).unwrap();
        let summary = GlobalSummary {
            locations: 3,
            span: Some(DateRange::new(d(1), d(31)).unwrap()),
            total_cases: Some(1_234_567.0),
            total_deaths: Some(89_000.0),
            people_vaccinated: None,
        };
        let text = format_global_summary(&summary, "sample:test");
        assert!(text.contains("Total cases worldwide:        1,234,567"));
        assert!(text.contains("Total vaccinations worldwide: -"));
        assert!(text.contains("31 days"));
    }

    #[test]
    fn snapshot_table_limits_to_top_n() {
        let cmp = SnapshotComparison {
            measure: Measure::GdpPerCapita,
            rows: (0..10)
                .map(|i| SnapshotRow {
                    location: format!("L{i}"),
                    x: Some(1000.0 * i as f64),
                    total_cases: Some(10.0 * i as f64),
                })
                .collect(),
        };
        let text = format_snapshot_table(&cmp, 3);
        assert_eq!(text.lines().count(), 3 + 3);
    }
}
