//! Forecasting orchestration.
//!
//! Responsibilities:
//!
//! - define the collaborator seam (`Forecaster`) and the default OLS backend
//! - select the best model kind using BIC + guardrails
//! - adapt series into the forecast contract and validate responses

pub mod adapter;
pub mod forecaster;
pub mod selection;

pub use adapter::*;
pub use forecaster::*;
pub use selection::*;
