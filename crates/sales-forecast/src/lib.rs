//! Sales Forecasting
//!
//! Wraps a fitted seasonal series model and shapes its output for the
//! dashboard: monthly points, or calendar-year totals.

mod adapter;
mod model;

pub use adapter::{Granularity, SalesForecast, SalesForecaster, DEFAULT_STEPS};
pub use model::{ForecastFrame, IndexConvention, SeasonalForecastModel, SeriesModel, MAX_HORIZON};

use thiserror::Error;

/// Errors during forecasting
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("Model load failed: {0}")]
    ModelLoad(String),
    #[error("model is not fitted: {0}")]
    NotFitted(String),
    #[error("invalid forecast horizon: {0}")]
    InvalidHorizon(String),
    #[error("Forecasting error: {0}")]
    Forecasting(String),
}
