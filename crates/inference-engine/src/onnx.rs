//! tract-backed ONNX Models

use crate::model::{HealthClassifier, ValueRegressor};
use crate::InferenceError;
use feature_engine::{HealthFeatureVector, ValueFeatureRow, HEALTH_FEATURE_DIMENSION};
use std::path::{Path, PathBuf};
use tract_onnx::prelude::*;
use tracing::{debug, info, warn};

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Optimized ONNX graph taking a single `f32[1, n]` input
struct OnnxModel {
    path: PathBuf,
    plan: OnnxPlan,
    input_width: Option<usize>,
}

impl OnnxModel {
    fn load(path: &Path, input_width: Option<usize>) -> Result<Self, InferenceError> {
        info!(path = %path.display(), input_width = ?input_width, "Loading ONNX model");

        let load_err =
            |e: TractError| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e));

        let mut model = tract_onnx::onnx().model_for_path(path).map_err(load_err)?;
        if let Some(width) = input_width {
            model = model
                .with_input_fact(0, f32::fact([1, width]).into())
                .map_err(load_err)?;
        }
        let plan = model
            .into_optimized()
            .and_then(|m| m.into_runnable())
            .map_err(load_err)?;

        info!(path = %path.display(), "Model loaded successfully");
        Ok(Self {
            path: path.to_path_buf(),
            plan,
            input_width,
        })
    }

    fn run(&self, values: &[f64]) -> Result<TVec<TValue>, InferenceError> {
        if let Some(width) = self.input_width {
            if values.len() != width {
                return Err(InferenceError::InvalidInputShape {
                    expected: format!("[1, {}]", width),
                    actual: format!("[1, {}]", values.len()),
                });
            }
        }

        let data: Vec<f32> = values.iter().map(|v| *v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, values.len()), data)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .into();

        let start = std::time::Instant::now();
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        debug!(
            model = %self.path.display(),
            latency_us = start.elapsed().as_micros() as u64,
            "ONNX inference completed"
        );

        Ok(outputs)
    }
}

/// Class index from a classifier output: an integer label tensor, or a
/// score tensor reduced by argmax.
fn class_index(output: &Tensor) -> Result<usize, InferenceError> {
    let failed = |e: TractError| InferenceError::InvalidOutput(e.to_string());

    if output.datum_type() == i64::datum_type() {
        let view = output.to_array_view::<i64>().map_err(failed)?;
        let label = view
            .iter()
            .next()
            .copied()
            .ok_or_else(|| InferenceError::InvalidOutput("empty label tensor".to_string()))?;
        return usize::try_from(label)
            .map_err(|_| InferenceError::InvalidOutput(format!("negative class index {}", label)));
    }

    let scores = output.cast_to::<f32>().map_err(failed)?;
    let view = scores.to_array_view::<f32>().map_err(failed)?;
    match view.len() {
        0 => Err(InferenceError::InvalidOutput("empty score tensor".to_string())),
        1 => {
            let value = view.iter().next().copied().unwrap_or_default();
            if value < 0.0 {
                Err(InferenceError::InvalidOutput(format!("negative class index {}", value)))
            } else {
                Ok(value.round() as usize)
            }
        }
        _ => Ok(view
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (idx, &score)| {
                if score > best.1 {
                    (idx, score)
                } else {
                    best
                }
            })
            .0),
    }
}

/// Battery health classifier exported to ONNX
pub struct OnnxHealthClassifier {
    model: OnnxModel,
}

impl OnnxHealthClassifier {
    /// Load the classifier; its input is fixed at ten features
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let model = OnnxModel::load(path.as_ref(), Some(HEALTH_FEATURE_DIMENSION))?;
        Ok(Self { model })
    }
}

impl HealthClassifier for OnnxHealthClassifier {
    fn classify(&self, features: &HealthFeatureVector) -> Result<usize, InferenceError> {
        let outputs = self.model.run(features.as_slice())?;
        let first = outputs
            .first()
            .ok_or_else(|| InferenceError::InvalidOutput("model produced no outputs".to_string()))?;
        class_index(first)
    }
}

/// Value-for-money regressor exported to ONNX, with its training column
/// names kept in a JSON sidecar file
pub struct OnnxValueRegressor {
    model: OnnxModel,
    feature_names: Option<Vec<String>>,
}

impl OnnxValueRegressor {
    /// Load the regressor and, if present, its feature-name sidecar.
    ///
    /// A missing sidecar still loads the model, but without the feature-name
    /// capability.
    pub fn load(
        model_path: impl AsRef<Path>,
        features_path: impl AsRef<Path>,
    ) -> Result<Self, InferenceError> {
        let features_path = features_path.as_ref();
        let feature_names = if features_path.exists() {
            Some(read_feature_names(features_path)?)
        } else {
            warn!(
                path = %features_path.display(),
                "Feature names not found, value model will not accept requests"
            );
            None
        };

        let width = feature_names.as_ref().map(Vec::len);
        let model = OnnxModel::load(model_path.as_ref(), width)?;

        Ok(Self {
            model,
            feature_names,
        })
    }
}

impl ValueRegressor for OnnxValueRegressor {
    fn predict(&self, row: &ValueFeatureRow) -> Result<f64, InferenceError> {
        let outputs = self.model.run(row.as_slice())?;
        let first = outputs
            .first()
            .ok_or_else(|| InferenceError::InvalidOutput("model produced no outputs".to_string()))?;

        let failed = |e: TractError| InferenceError::InvalidOutput(e.to_string());
        let values = first.cast_to::<f32>().map_err(failed)?;
        let view = values.to_array_view::<f32>().map_err(failed)?;
        view.iter()
            .next()
            .map(|v| f64::from(*v))
            .ok_or_else(|| InferenceError::InvalidOutput("empty prediction tensor".to_string()))
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

/// Read the training column names: a JSON array of strings
fn read_feature_names(path: &Path) -> Result<Vec<String>, InferenceError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;
    let names: Vec<String> = serde_json::from_str(&contents)
        .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

    info!(path = %path.display(), count = names.len(), "Loaded value model feature names");
    Ok(names)
}
