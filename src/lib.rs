//! # Crop Recommender
//!
//! Serves a pre-trained random-forest crop recommender over HTTP. A client
//! posts seven soil/climate measurements and receives the predicted crop.
//!
//! ## Modules
//!
//! - `inference`: Feature validation and the prediction service
//! - `model`: The classifier contract, the random forest and the load-once model holder
//! - `server`: axum routes, shared state and configuration
//! - `utils`: Logging and error types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crop_recommender::{FeatureVector, ModelLoader, PredictionService};
//!
//! let loader = ModelLoader::new(ModelLoader::default_model_path());
//! let service = PredictionService::new(Arc::new(loader));
//! let features = FeatureVector::new([90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]);
//! let label = service.predict_one(&features)?;
//! ```

pub mod inference;
pub mod model;
pub mod server;
pub mod utils;

// Re-export commonly used items for convenience
pub use inference::{FeatureVector, PredictionService, SampleBatch, FEATURE_NAMES, NUM_FEATURES};
pub use model::{Classifier, Label, ModelHandle, ModelLoader, Prediction, RandomForest};
pub use server::{build_router, prepare_state, AppState, ServerConfig, SharedState};
pub use utils::error::{CropError, Result};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
