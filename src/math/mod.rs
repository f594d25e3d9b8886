//! Mathematical utilities: least-squares solving for the forecast backend.

pub mod ols;

pub use ols::*;
