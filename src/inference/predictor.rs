//! Prediction Service
//!
//! Turns validated feature vectors into a crop label: builds the sample
//! batch, fetches the model through the loader, runs inference and
//! normalizes the output. Every failure is terminal for the request; nothing
//! is retried.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::debug;

use super::features::{FeatureVector, SampleBatch};
use crate::model::{Label, ModelLoader, Prediction};
use crate::utils::error::{CropError, Result};

/// Serves predictions from the lazily loaded model
#[derive(Debug, Clone)]
pub struct PredictionService {
    loader: Arc<ModelLoader>,
}

impl PredictionService {
    pub fn new(loader: Arc<ModelLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &ModelLoader {
        &self.loader
    }

    /// Validate a raw request payload and predict a single label
    pub fn predict_json(&self, payload: &Value) -> Result<Label> {
        let object = payload
            .as_object()
            .ok_or_else(|| CropError::InvalidBody("expected a JSON object".into()))?;
        let features = FeatureVector::from_json(object)?;
        self.predict_one(&features)
    }

    /// Predict the crop for one feature vector
    pub fn predict_one(&self, features: &FeatureVector) -> Result<Label> {
        let batch = SampleBatch::single(*features);
        let prediction = self.run_model(&batch)?;

        if prediction.len() != 1 {
            return Err(CropError::Inference(format!(
                "model returned {} labels for a single sample",
                prediction.len()
            )));
        }

        prediction
            .into_single()
            .ok_or_else(|| CropError::Inference("model returned no label".into()))
    }

    /// Predict one label per vector, in input order
    pub fn predict_batch(&self, vectors: &[FeatureVector]) -> Result<Vec<Label>> {
        if vectors.is_empty() {
            return Ok(Vec::new());
        }

        let batch = SampleBatch::from_vectors(vectors);
        let labels = self.run_model(&batch)?.into_labels();

        if labels.len() != batch.len() {
            return Err(CropError::Inference(format!(
                "model returned {} labels for {} samples",
                labels.len(),
                batch.len()
            )));
        }
        Ok(labels)
    }

    fn run_model(&self, batch: &SampleBatch) -> Result<Prediction> {
        let model = self.loader.get_model()?;

        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| model.predict(batch)));
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let prediction = match outcome {
            Ok(Ok(prediction)) => prediction,
            Ok(Err(e)) => return Err(CropError::Inference(format!("{:#}", e))),
            Err(_) => return Err(CropError::Inference("model panicked during predict".into())),
        };

        debug!(
            "Inference on {} sample(s) took {:.2} ms",
            batch.len(),
            elapsed_ms
        );
        Ok(prediction)
    }
}
