//! Debug bundle writer for inspecting dataset inputs and forecast runs.
//!
//! Bound to the TUI's `d` key: dumps the current source, schema, selection
//! and forecast diagnostics to a timestamped markdown file so a puzzling
//! chart can be reported with its exact inputs.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::app::pipeline::RunOutput;
use crate::data::Loaded;
use crate::domain::DashConfig;
use crate::error::AppError;

pub fn write_debug_bundle(
    loaded: &Loaded,
    config: &DashConfig,
    run: Option<&RunOutput>,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::internal(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("epi_debug_{ts}.md"));

    let mut out = String::new();
    out.push_str("# epi debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- source: {}\n", loaded.source));
    out.push_str(&format!(
        "- rows: {} used / {} read ({} row errors)\n",
        loaded.report.rows_used,
        loaded.report.rows_read,
        loaded.report.row_errors.len()
    ));
    out.push_str(&format!(
        "- locations: {}\n",
        loaded.dataset.locations().len()
    ));
    match loaded.dataset.span() {
        Some(span) => out.push_str(&format!("- span: {span}\n")),
        None => out.push_str("- span: (empty)\n"),
    }
    out.push_str(&format!(
        "- schema: {}\n",
        loaded
            .dataset
            .schema
            .measures()
            .iter()
            .map(|m| m.column_name())
            .collect::<Vec<_>>()
            .join(", ")
    ));

    out.push_str("\n## selection\n");
    out.push_str(&format!("- country: {}\n", config.location));
    out.push_str(&format!("- measure: {}\n", config.measure.column_name()));
    out.push_str(&format!(
        "- trend: {} (window {})\n",
        config.trend.display_name(),
        config.window
    ));
    out.push_str(&format!(
        "- range: {:?} .. {:?}\n",
        config.range_start, config.range_end
    ));
    out.push_str(&format!(
        "- horizon: {}d | confidence: {:.2} | model: {:?}\n",
        config.horizon_days, config.confidence_level, config.model_spec
    ));

    if let Some(run) = run {
        out.push_str("\n## pipeline\n");
        out.push_str(&format!(
            "- series points: {} ({} present)\n",
            run.view.series.len(),
            run.view.series.present_len()
        ));
        match &run.forecast.forecast {
            Some(fc) => {
                out.push_str(&format!(
                    "- forecast: {} rows (history {} + horizon {})\n",
                    fc.points.len(),
                    fc.history_len,
                    fc.horizon_days
                ));
                out.push_str(&format!("- model: {}\n", fc.model));
            }
            None => {
                out.push_str(&format!(
                    "- forecast: none ({})\n",
                    run.forecast.note.as_deref().unwrap_or("no note")
                ));
            }
        }
        if let Some(diags) = &run.forecast.diagnostics {
            for fit in &diags.fits {
                let chosen = if fit.chosen { "*" } else { " " };
                out.push_str(&format!(
                    "  {chosen} {:<14} RMSE={:.4} BIC={:.4}\n",
                    fit.kind.display_name(),
                    fit.rmse,
                    fit.bic
                ));
            }
            for (kind, reason) in &diags.skipped {
                out.push_str(&format!("    (skipped {}) {reason}\n", kind.display_name()));
            }
        }
    }

    let mut file = File::create(&path)
        .map_err(|e| AppError::internal(format!("Failed to create debug file: {e}")))?;
    file.write_all(out.as_bytes())
        .map_err(|e| AppError::internal(format!("Failed to write debug file: {e}")))?;

    Ok(path)
}
