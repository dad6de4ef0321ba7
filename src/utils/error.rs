//! Error Handling Module
//!
//! Defines the error taxonomy for the crop recommender.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for crop recommendation operations
#[derive(Error, Debug)]
pub enum CropError {
    /// The model artifact does not exist at the resolved path
    #[error("Model file not found at: {}", .0.display())]
    ModelNotFound(PathBuf),

    /// The model artifact exists but could not be read or deserialized
    #[error("Failed to load model from '{}': {}", .0.display(), .1)]
    ModelLoad(PathBuf, String),

    /// The deserialized model is structurally unusable
    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    /// A required feature is absent from the request
    #[error("Missing data field in request: '{0}'")]
    MissingField(String),

    /// A feature is present but cannot be converted to a float
    #[error("Invalid data type in request: field '{field}' has non-numeric value {raw}")]
    InvalidValue { field: String, raw: String },

    /// The request body is not a JSON object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The model itself failed while predicting
    #[error("Inference error: {0}")]
    Inference(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CropError {
    /// Client errors are caused by the request and never touch the model.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CropError::MissingField(_) | CropError::InvalidValue { .. } | CropError::InvalidBody(_)
        )
    }

    /// Name of the offending feature, if the error is about one.
    pub fn field(&self) -> Option<&str> {
        match self {
            CropError::MissingField(field) => Some(field),
            CropError::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Convenience Result type for crop recommendation operations
pub type Result<T> = std::result::Result<T, CropError>;
