//! Inference module
//!
//! This module provides:
//! - Feature vector validation for the seven soil/climate inputs
//! - The prediction service wrapping the lazily loaded model

pub mod features;
pub mod predictor;

// Re-export main types for convenience
pub use features::{FeatureVector, SampleBatch, FEATURE_NAMES, NUM_FEATURES};
pub use predictor::PredictionService;
