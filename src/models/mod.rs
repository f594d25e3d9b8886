//! Forecast model family implementations.
//!
//! Models are implemented as small, pure functions so that fitting/selection
//! code can stay generic.

pub mod model;

pub use model::*;
