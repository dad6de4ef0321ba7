//! Prediction endpoint
//!
//! `POST /predecir` takes the seven features as a JSON object and answers
//! with `{"status": "success", "resultado": <label>}` or
//! `{"status": "error", "message": ...}`.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::model::Label;
use crate::server::state::SharedState;
use crate::utils::error::CropError;

/// Message returned for server-side failures; details stay in the logs
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error during prediction";

/// Response envelope of the prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictResponse {
    Success { resultado: Label },
    Error { message: String },
}

/// POST /predecir - Predict the recommended crop
///
/// Parsing, the first model load and inference run on the blocking pool so
/// runtime workers stay free while the artifact is read.
pub async fn make_prediction(
    State(state): State<SharedState>,
    body: Bytes,
) -> (StatusCode, Json<PredictResponse>) {
    let service = state.service.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let payload = serde_json::from_slice::<Value>(&body)
            .map_err(|e| CropError::InvalidBody(e.to_string()))?;
        debug!("Data received: {}", payload);
        service.predict_json(&payload)
    })
    .await
    .unwrap_or_else(|e| Err(CropError::Inference(format!("prediction task failed: {}", e))));

    match outcome {
        Ok(label) => {
            info!("Crop predicted successfully: {}", label);
            (
                StatusCode::OK,
                Json(PredictResponse::Success { resultado: label }),
            )
        }
        Err(err) => {
            let (status, message) = error_response(&err);
            (status, Json(PredictResponse::Error { message }))
        }
    }
}

/// Map an error to its status code and public message
pub fn error_response(err: &CropError) -> (StatusCode, String) {
    if err.is_client_error() {
        warn!("Client error: {}", err);
        (StatusCode::BAD_REQUEST, err.to_string())
    } else {
        error!("Server error during prediction: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR_MESSAGE.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_success_envelope() {
        let response = PredictResponse::Success {
            resultado: Label::from("rice"),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success", "resultado": "rice"}));
    }

    #[test]
    fn test_error_envelope() {
        let response = PredictResponse::Error {
            message: "nope".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"status": "error", "message": "nope"}));
    }

    #[test]
    fn test_client_errors_are_bad_requests() {
        let (status, message) = error_response(&CropError::MissingField("K".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("'K'"));
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = CropError::ModelNotFound(PathBuf::from("/secret/location/model.json"));
        let (status, message) = error_response(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));

        let (status, _) = error_response(&CropError::Inference("shape".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
