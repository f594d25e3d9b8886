//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the recognized measure columns (`Measure`) and loaded `Schema`
//! - observation rows and the immutable `Dataset`
//! - derived series types (`TimeSeries`, `DateRange`)
//! - forecast contract types (`ForecastInput`, `ForecastSeries`)

pub mod types;

pub use types::*;
