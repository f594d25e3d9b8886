//! Command-line parsing for the epidemiological trends dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline/forecasting code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::data::{DataSource, SampleSpec};
use crate::domain::{Measure, ModelSpec, TrendKind};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "epi", version, about = "Epidemiological trend analysis & forecasting dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print worldwide summary metrics and cross-sectional comparison tables.
    Summary(SummaryArgs),
    /// Print a trend table (raw, moving average, or growth rate) for one location.
    Trend(TrendArgs),
    /// Fit a forecast for one location, print diagnostics, and optionally plot/export.
    Forecast(ForecastArgs),
    /// Compare a measure across multiple locations.
    Compare(CompareArgs),
    /// Plot a previously exported forecast JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI dashboard.
    ///
    /// This uses the same underlying pipeline as the other subcommands, but
    /// renders results in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Where to load the dataset from (shared by every subcommand).
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Load the dataset from a local CSV file.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Fetch the dataset CSV from this URL.
    #[arg(long, value_name = "URL", conflicts_with = "data")]
    pub url: Option<String>,

    /// Fetch the dataset from the URL in $EPI_DATA_URL (.env honored).
    #[arg(long, conflicts_with_all = ["data", "url"])]
    pub remote: bool,

    /// Synthetic locations when no other source is given.
    #[arg(long, default_value_t = 8)]
    pub sample_locations: usize,

    /// Synthetic days when no other source is given.
    #[arg(long, default_value_t = 365)]
    pub sample_days: usize,

    /// Random seed for synthetic data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl DataArgs {
    /// Resolve the flags into a concrete source.
    ///
    /// Priority: explicit file > explicit URL > --remote > synthetic sample.
    pub fn to_source(&self) -> DataSource {
        if let Some(path) = &self.data {
            return DataSource::Csv(path.clone());
        }
        if let Some(url) = &self.url {
            return DataSource::Remote(Some(url.clone()));
        }
        if self.remote {
            return DataSource::Remote(None);
        }
        DataSource::Sample(SampleSpec {
            locations: self.sample_locations,
            days: self.sample_days,
            seed: self.seed,
            ..SampleSpec::default()
        })
    }
}

#[derive(Debug, Parser)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Rows per comparison table.
    #[arg(long, default_value_t = 15)]
    pub top: usize,
}

#[derive(Debug, Parser)]
pub struct TrendArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Location to analyze (prompted interactively when omitted).
    #[arg(short = 'c', long)]
    pub country: Option<String>,

    /// Measure column to analyze.
    #[arg(long, value_enum, default_value_t = Measure::NewCases)]
    pub measure: Measure,

    /// Trend transform to apply.
    #[arg(long, value_enum, default_value_t = TrendKind::Average)]
    pub trend: TrendKind,

    /// Trailing window for the moving average.
    #[arg(long, default_value_t = 7)]
    pub window: usize,

    /// Range start (YYYY-MM-DD; defaults to the dataset's first date).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD; defaults to the dataset's last date).
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Table rows to print (most recent).
    #[arg(long, default_value_t = 20)]
    pub rows: usize,
}

#[derive(Debug, Parser)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Location to forecast (prompted interactively when omitted).
    #[arg(short = 'c', long)]
    pub country: Option<String>,

    /// Measure column to forecast.
    #[arg(long, value_enum, default_value_t = Measure::NewCases)]
    pub measure: Measure,

    /// Forecast horizon in days (allowed range 7..=90).
    #[arg(long, default_value_t = 30)]
    pub horizon: u32,

    /// Confidence level for the bands.
    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,

    /// Which model(s) the backend may fit.
    #[arg(long, value_enum, default_value_t = ModelSpec::Auto)]
    pub model: ModelSpec,

    /// Range start (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export forecast rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full forecast (model + points) to JSON.
    #[arg(long = "export-forecast")]
    pub export_forecast: Option<PathBuf>,

    /// Future rows to print (most recent).
    #[arg(long, default_value_t = 20)]
    pub rows: usize,
}

#[derive(Debug, Parser)]
pub struct CompareArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Locations to compare (repeatable; defaults to the three largest).
    #[arg(short = 'c', long = "country")]
    pub countries: Vec<String>,

    /// Measure column to compare.
    #[arg(long, value_enum, default_value_t = Measure::NewCases)]
    pub measure: Measure,

    /// Range start (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Table rows to print (most recent).
    #[arg(long, default_value_t = 20)]
    pub rows: usize,
}

/// Options for plotting a saved forecast.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Forecast JSON file produced by `epi forecast --export-forecast`.
    #[arg(long, value_name = "JSON")]
    pub forecast: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Parser)]
pub struct TuiArgs {
    #[command(flatten)]
    pub data: DataArgs,
}
