//! Health Label Decoding
//!
//! The classifier emits class indices. The names behind them are the sorted
//! distinct values of the training dataset's status column, so the encoder
//! is rebuilt from that dataset when it is available.

use crate::InferenceError;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

/// Column holding the health status in the training dataset
pub const LABEL_COLUMN: &str = "battery_health_status";

/// Classes used when no dataset is shipped with the model
pub const DEFAULT_HEALTH_CLASSES: [&str; 3] = ["Degraded", "Healthy", "Moderate"];

/// Index-to-name mapping for classifier outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Use the given classes in the given order
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Learn classes from observed labels: distinct values, sorted
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        Self {
            classes: distinct.into_iter().collect(),
        }
    }

    /// Default battery health classes
    pub fn default_health() -> Self {
        Self::new(DEFAULT_HEALTH_CLASSES)
    }

    /// Fit from the status column of a dataset file (CSV with header, or a
    /// JSON array of records)
    pub fn from_dataset(path: &Path) -> Result<Self, InferenceError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        })?;

        let labels = if contents.trim_start().starts_with('[') {
            labels_from_json(&contents)?
        } else {
            labels_from_csv(&contents)?
        };

        if labels.is_empty() {
            return Err(InferenceError::ModelLoadError(format!(
                "{}: no values in column {}",
                path.display(),
                LABEL_COLUMN
            )));
        }

        Ok(Self::fit(labels))
    }

    /// Known classes, index order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Class name for an index
    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

/// Mapping used when the encoder could not be rebuilt
pub fn fallback_label(index: usize) -> &'static str {
    match index {
        0 => "Degraded",
        1 => "Healthy",
        2 => "Moderate",
        _ => "Unknown",
    }
}

/// Resolve the label encoder for the health classifier.
///
/// No dataset on disk means the default classes. A dataset that exists but
/// cannot be read yields `None`, and callers fall back to `fallback_label`.
pub fn load_health_labels(dataset: &Path) -> Option<LabelEncoder> {
    if !dataset.exists() {
        info!(path = %dataset.display(), "Dataset not found, using default label mapping");
        return Some(LabelEncoder::default_health());
    }

    match LabelEncoder::from_dataset(dataset) {
        Ok(encoder) => {
            info!(classes = ?encoder.classes(), "Label encoder created");
            Some(encoder)
        }
        Err(e) => {
            warn!(error = %e, "Failed to build label encoder from dataset");
            None
        }
    }
}

fn labels_from_json(contents: &str) -> Result<Vec<String>, InferenceError> {
    let records: Vec<Value> = serde_json::from_str(contents)
        .map_err(|e| InferenceError::ModelLoadError(format!("invalid dataset JSON: {}", e)))?;

    Ok(records
        .iter()
        .filter_map(|r| r.get(LABEL_COLUMN).and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}

fn labels_from_csv(contents: &str) -> Result<Vec<String>, InferenceError> {
    let invalid = |e: csv::Error| InferenceError::ModelLoadError(format!("invalid dataset CSV: {}", e));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let column = reader
        .headers()
        .map_err(invalid)?
        .iter()
        .position(|h| h == LABEL_COLUMN)
        .ok_or_else(|| {
            InferenceError::ModelLoadError(format!("dataset has no {} column", LABEL_COLUMN))
        })?;

    let mut labels = Vec::new();
    for record in reader.records() {
        let record = record.map_err(invalid)?;
        if let Some(label) = record.get(column).filter(|l| !l.is_empty()) {
            labels.push(label.to_string());
        }
    }
    Ok(labels)
}
