//! Seasonal Series Model

use crate::ForecastError;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Longest horizon a single call may request (months)
pub const MAX_HORIZON: usize = 1200;

/// Two-sided 95% normal quantile
const DEFAULT_INTERVAL_Z: f64 = 1.959_963_984_540_054;

/// Point forecasts with a confidence band, one row per period
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastFrame {
    pub index: Vec<NaiveDate>,
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ForecastFrame {
    /// Number of periods
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the frame holds no periods
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// A fitted model able to project a number of periods ahead
pub trait SeriesModel: Send + Sync {
    fn get_forecast(&self, steps: usize) -> Result<ForecastFrame, ForecastError>;
}

/// Date convention of the series index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexConvention {
    /// Periods labelled by the first day of the month
    #[default]
    MonthStart,
    /// Periods labelled by the last day of the month
    MonthEnd,
}

fn default_interval_z() -> f64 {
    DEFAULT_INTERVAL_Z
}

/// Additive level + trend + seasonal state, as exported after fitting.
///
/// `seasonal[k]` is the effect for the k-th period after the last
/// observation, cycling with period `seasonal.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalForecastModel {
    /// Index label of the last observed period
    pub last_observation: NaiveDate,
    #[serde(default)]
    pub index: IndexConvention,
    pub level: f64,
    #[serde(default)]
    pub trend: f64,
    pub seasonal: Vec<f64>,
    /// One-step-ahead residual variance
    pub residual_variance: f64,
    #[serde(default = "default_interval_z")]
    pub interval_z: f64,
}

impl SeasonalForecastModel {
    /// Load a model exported as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading sales model");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ForecastError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        let model: Self = serde_json::from_str(&contents)
            .map_err(|e| ForecastError::ModelLoad(format!("{}: {}", path.display(), e)))?;

        info!(
            last_observation = %model.last_observation,
            period = model.seasonal.len(),
            "Sales model loaded successfully"
        );
        Ok(model)
    }

    /// Seasonal period length
    pub fn period(&self) -> usize {
        self.seasonal.len()
    }

    fn check_fitted(&self) -> Result<(), ForecastError> {
        if self.seasonal.is_empty() {
            return Err(ForecastError::NotFitted("no seasonal state".to_string()));
        }
        if !self.residual_variance.is_finite() || self.residual_variance < 0.0 {
            return Err(ForecastError::NotFitted(format!(
                "residual variance {}",
                self.residual_variance
            )));
        }
        let state_finite = self.level.is_finite()
            && self.trend.is_finite()
            && self.seasonal.iter().all(|s| s.is_finite());
        if !state_finite {
            return Err(ForecastError::NotFitted("non-finite state".to_string()));
        }
        Ok(())
    }

    /// Index label of the period `h` steps after the last observation
    fn period_date(&self, h: u32) -> Option<NaiveDate> {
        let anchor =
            NaiveDate::from_ymd_opt(self.last_observation.year(), self.last_observation.month(), 1)?;
        let start = anchor.checked_add_months(Months::new(h))?;
        match self.index {
            IndexConvention::MonthStart => Some(start),
            IndexConvention::MonthEnd => start.checked_add_months(Months::new(1))?.pred_opt(),
        }
    }
}

impl SeriesModel for SeasonalForecastModel {
    fn get_forecast(&self, steps: usize) -> Result<ForecastFrame, ForecastError> {
        if steps == 0 || steps > MAX_HORIZON {
            return Err(ForecastError::InvalidHorizon(format!(
                "{} (expected 1..={})",
                steps, MAX_HORIZON
            )));
        }
        self.check_fitted()?;

        let mut frame = ForecastFrame {
            index: Vec::with_capacity(steps),
            mean: Vec::with_capacity(steps),
            lower: Vec::with_capacity(steps),
            upper: Vec::with_capacity(steps),
        };

        for h in 1..=steps {
            let date = self.period_date(h as u32).ok_or_else(|| {
                ForecastError::InvalidHorizon(format!("period {} is outside the calendar", h))
            })?;
            let mean = self.level + h as f64 * self.trend + self.seasonal[(h - 1) % self.period()];
            let half_width = self.interval_z * (self.residual_variance * h as f64).sqrt();

            frame.index.push(date);
            frame.mean.push(mean);
            frame.lower.push(mean - half_width);
            frame.upper.push(mean + half_width);
        }

        debug!(steps, first = ?frame.index.first(), "Series forecast computed");
        Ok(frame)
    }
}
