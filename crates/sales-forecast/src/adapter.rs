//! Forecast Adapter
//!
//! Scales the requested horizon to model periods and reshapes the frame
//! into parallel label/value lists.

use crate::model::{ForecastFrame, SeriesModel};
use crate::ForecastError;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Horizon used when the caller gives none
pub const DEFAULT_STEPS: usize = 12;

/// Output resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Monthly,
    Yearly,
}

impl Granularity {
    /// Parse a query value. Only `yearly` selects yearly output; anything
    /// else is monthly.
    pub fn from_query(value: &str) -> Self {
        if value == "yearly" {
            Self::Yearly
        } else {
            Self::Monthly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Model periods per output step
    fn periods_per_step(&self) -> usize {
        match self {
            Self::Monthly => 1,
            Self::Yearly => 12,
        }
    }
}

/// Forecast as parallel lists, ready for serialization
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesForecast {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
    pub lower_ci: Vec<f64>,
    pub upper_ci: Vec<f64>,
}

impl SalesForecast {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    fn monthly(frame: ForecastFrame) -> Self {
        Self {
            dates: frame
                .index
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect(),
            values: frame.mean,
            lower_ci: frame.lower,
            upper_ci: frame.upper,
        }
    }

    /// Calendar-year totals of each column
    fn yearly(frame: ForecastFrame) -> Self {
        let mut totals: BTreeMap<i32, [f64; 3]> = BTreeMap::new();
        for (i, date) in frame.index.iter().enumerate() {
            let entry = totals.entry(date.year()).or_insert([0.0; 3]);
            entry[0] += frame.mean[i];
            entry[1] += frame.lower[i];
            entry[2] += frame.upper[i];
        }

        let mut forecast = Self::default();
        for (year, [mean, lower, upper]) in totals {
            forecast.dates.push(format!("{:04}", year));
            forecast.values.push(mean);
            forecast.lower_ci.push(lower);
            forecast.upper_ci.push(upper);
        }
        forecast
    }
}

/// Sales forecaster over a fitted series model
#[derive(Clone)]
pub struct SalesForecaster {
    model: Arc<dyn SeriesModel>,
}

impl SalesForecaster {
    pub fn new(model: Arc<dyn SeriesModel>) -> Self {
        Self { model }
    }

    /// Forecast `steps` output periods at the given granularity.
    ///
    /// Every failure is reported as [`ForecastError::Forecasting`] with the
    /// underlying cause in the message.
    pub fn forecast(
        &self,
        steps: usize,
        granularity: Granularity,
    ) -> Result<SalesForecast, ForecastError> {
        let model_steps = steps
            .checked_mul(granularity.periods_per_step())
            .ok_or_else(|| ForecastError::Forecasting(format!("horizon {} overflows", steps)))?;

        let frame = self
            .model
            .get_forecast(model_steps)
            .map_err(|e| ForecastError::Forecasting(e.to_string()))?;
        check_aligned(&frame)?;

        let forecast = match granularity {
            Granularity::Monthly => SalesForecast::monthly(frame),
            Granularity::Yearly => SalesForecast::yearly(frame),
        };

        debug!(
            steps,
            granularity = granularity.as_str(),
            points = forecast.len(),
            "Sales forecast ready"
        );
        Ok(forecast)
    }
}

/// Every column of the frame must have one entry per date
fn check_aligned(frame: &ForecastFrame) -> Result<(), ForecastError> {
    let dates = frame.index.len();
    if frame.mean.len() != dates || frame.lower.len() != dates || frame.upper.len() != dates {
        return Err(ForecastError::Forecasting(format!(
            "misaligned forecast: {} dates, {} values, {} lower, {} upper",
            dates,
            frame.mean.len(),
            frame.lower.len(),
            frame.upper.len()
        )));
    }
    Ok(())
}
