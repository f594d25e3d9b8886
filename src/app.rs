//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the dataset (once, via the process-wide store)
//! - runs the filter/aggregate/trend/forecast pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{
    Command, CompareArgs, DataArgs, ForecastArgs, PlotArgs, SummaryArgs, TrendArgs,
};
use crate::data::{Loaded, STORE};
use crate::domain::{DashConfig, Measure, ModelSpec, TrendKind};
use crate::error::AppError;
use crate::fit::adapter::HorizonBounds;
use crate::fit::forecaster::SeasonalTrendForecaster;

pub mod pipeline;

/// Entry point for the `epi` binary.
pub fn run() -> Result<(), AppError> {
    // We want `epi` and `epi -f data.csv` to behave like `epi tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Trend(args) => handle_trend(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Compare(args) => handle_compare(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn load(data: &DataArgs) -> Result<std::sync::Arc<Loaded>, AppError> {
    STORE.get(&data.to_source())
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let loaded = load(&args.data)?;
    let summary = crate::report::global_summary(&loaded.dataset);

    print!(
        "{}",
        crate::report::format_global_summary(&summary, &loaded.source)
    );
    if !loaded.report.row_errors.is_empty() {
        println!(
            "(skipped {} malformed row(s) during ingest)",
            loaded.report.row_errors.len()
        );
    }
    println!();

    // Cross-sectional comparisons, each guarded by a schema capability query.
    for measure in [
        Measure::Aged65Older,
        Measure::IcuPatients,
        Measure::HospitalBedsPerThousand,
        Measure::GdpPerCapita,
    ] {
        if let Some(cmp) = crate::report::snapshot_comparison(&loaded.dataset, measure) {
            println!("{}", crate::report::format_snapshot_table(&cmp, args.top));
        }
    }

    Ok(())
}

fn handle_trend(args: TrendArgs) -> Result<(), AppError> {
    let loaded = load(&args.data)?;
    let location = resolve_country(&loaded, args.country.as_deref())?;
    let config = trend_config(&args, location);

    let view = pipeline::run_view(&loaded.dataset, &config)?;
    if view.series.is_empty() {
        return Err(AppError::empty_selection(format!(
            "No rows for '{}' in the selected range.",
            config.location
        )));
    }

    print!(
        "{}",
        crate::report::format_trend_table(&view.series, &view.trend, config.trend, args.rows)
    );

    // Testing insight, only when the store carries testing columns.
    if loaded.dataset.schema.has(Measure::TotalTests) {
        let tests = pipeline::selected_series(
            &loaded.dataset,
            &DashConfig {
                measure: Measure::TotalTests,
                ..config.clone()
            },
            view.range.as_ref(),
        );
        if let Some(total) = crate::report::series_max(&tests) {
            println!(
                "\nTotal tests conducted: {}",
                crate::report::fmt_count(total)
            );
        }
    }

    Ok(())
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let loaded = load(&args.data)?;
    let location = resolve_country(&loaded, args.country.as_deref())?;
    let config = forecast_config(&args, location);

    let forecaster = SeasonalTrendForecaster {
        model_spec: config.model_spec,
        confidence_level: config.confidence_level,
    };
    let stage = pipeline::run_forecast_stage(
        &loaded.dataset,
        &config,
        &forecaster,
        &HorizonBounds::default(),
    )?;

    let (Some(forecast), Some(input)) = (&stage.forecast, &stage.input) else {
        return Err(AppError::insufficient_history(
            stage
                .note
                .unwrap_or_else(|| "Not enough history to forecast.".to_string()),
        ));
    };

    print!(
        "{}",
        crate::report::format_forecast_summary(forecast, stage.diagnostics.as_ref(), args.rows)
    );

    if config.plot {
        let plot = crate::plot::render_forecast_plot(
            input,
            forecast,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export {
        crate::io::export::write_forecast_csv(path, forecast)?;
    }
    if let Some(path) = &config.export_forecast {
        crate::io::forecast::write_forecast_json(path, forecast)?;
    }

    Ok(())
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let loaded = load(&args.data)?;
    let available = loaded.dataset.locations();

    let locations: Vec<String> = if args.countries.is_empty() {
        default_compare_locations(&loaded)
    } else {
        args.countries
            .iter()
            .map(|c| crate::cli::picker::resolve_location(&available, c))
            .collect::<Result<_, _>>()?
    };
    if locations.is_empty() {
        return Err(AppError::empty_selection("No locations to compare."));
    }

    let config = DashConfig {
        location: locations[0].clone(),
        compare_locations: locations.clone(),
        measure: args.measure,
        range_start: args.start,
        range_end: args.end,
        ..default_config()
    };

    let range = pipeline::effective_range(&loaded.dataset, &config)?;
    let slice = match range {
        Some(range) => crate::filter::by_date_range(&loaded.dataset, &range),
        None => {
            return Err(AppError::empty_selection(
                "The requested range contains no data.",
            ));
        }
    };

    let pivot = crate::report::comparison_pivot(&slice, &config.compare_locations, args.measure);
    print!("{}", crate::report::format_comparison(&pivot, args.rows));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::forecast::read_forecast_json(&args.forecast)?;
    let plot =
        crate::plot::render_forecast_plot_from_file(&file.series, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn resolve_country(loaded: &Loaded, requested: Option<&str>) -> Result<String, AppError> {
    let locations = loaded.dataset.locations();
    match requested {
        Some(name) => crate::cli::picker::resolve_location(&locations, name),
        None => crate::cli::picker::prompt_for_location(&locations),
    }
}

/// The three largest outbreaks make a sensible default comparison set.
fn default_compare_locations(loaded: &Loaded) -> Vec<String> {
    crate::report::snapshot_comparison(&loaded.dataset, Measure::TotalCases)
        .map(|cmp| cmp.rows.iter().take(3).map(|r| r.location.clone()).collect())
        .unwrap_or_else(|| loaded.dataset.locations().into_iter().take(3).collect())
}

pub fn default_config() -> DashConfig {
    DashConfig {
        location: String::new(),
        compare_locations: Vec::new(),
        measure: Measure::NewCases,
        trend: TrendKind::Raw,
        window: crate::trend::DEFAULT_WINDOW,
        range_start: None,
        range_end: None,
        horizon_days: 30,
        confidence_level: 0.95,
        model_spec: ModelSpec::Auto,
        top_n: 15,
        plot: true,
        plot_width: 100,
        plot_height: 25,
        export: None,
        export_forecast: None,
    }
}

fn trend_config(args: &TrendArgs, location: String) -> DashConfig {
    DashConfig {
        location,
        measure: args.measure,
        trend: args.trend,
        window: args.window,
        range_start: args.start,
        range_end: args.end,
        ..default_config()
    }
}

fn forecast_config(args: &ForecastArgs, location: String) -> DashConfig {
    DashConfig {
        location,
        measure: args.measure,
        range_start: args.start,
        range_end: args.end,
        horizon_days: args.horizon,
        confidence_level: args.confidence,
        model_spec: args.model,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export: args.export.clone(),
        export_forecast: args.export_forecast.clone(),
        ..default_config()
    }
}

/// Rewrite argv so `epi` defaults to `epi tui`.
///
/// Rules:
/// - `epi`                     -> `epi tui`
/// - `epi -f data.csv ...`     -> `epi tui -f data.csv ...`
/// - `epi --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "summary" | "trend" | "forecast" | "compare" | "plot" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["epi"])), argv(&["epi", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["epi", "-f", "data.csv"])),
            argv(&["epi", "tui", "-f", "data.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["epi", "forecast", "-c", "Japan"])),
            argv(&["epi", "forecast", "-c", "Japan"])
        );
        assert_eq!(rewrite_args(argv(&["epi", "--help"])), argv(&["epi", "--help"]));
    }
}
