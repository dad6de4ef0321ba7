//! Model module
//!
//! The service treats the trained classifier as an opaque black box behind
//! the [`Classifier`] trait. This module provides:
//! - The call contract (`predict(batch) -> labels`)
//! - The bundled random-forest implementation
//! - A lazily initialized, load-once model holder

pub mod forest;
pub mod loader;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::inference::features::SampleBatch;

pub use forest::{Leaf, Node, RandomForest, TreeNode};
pub use loader::ModelLoader;

/// A predicted crop name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Output of a model call.
///
/// Models normally return one label per sample, but a scalar answer for a
/// single-sample batch is accepted as already unwrapped.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Batch(Vec<Label>),
    Scalar(Label),
}

impl Prediction {
    /// Number of labels carried
    pub fn len(&self) -> usize {
        match self {
            Prediction::Batch(labels) => labels.len(),
            Prediction::Scalar(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve to the first (and normally only) label
    pub fn into_single(self) -> Option<Label> {
        match self {
            Prediction::Batch(labels) => labels.into_iter().next(),
            Prediction::Scalar(label) => Some(label),
        }
    }

    pub fn into_labels(self) -> Vec<Label> {
        match self {
            Prediction::Batch(labels) => labels,
            Prediction::Scalar(label) => vec![label],
        }
    }
}

/// Call contract of a trained classifier.
///
/// Implementations must be safe to call from many request handlers at once;
/// inference never mutates the model.
pub trait Classifier: Send + Sync {
    /// Predict one label per row of `batch`
    fn predict(&self, batch: &SampleBatch) -> anyhow::Result<Prediction>;

    /// Short description used in logs and the health endpoint
    fn describe(&self) -> String {
        "classifier".to_string()
    }
}

/// Shared handle to the loaded model
pub type ModelHandle = Arc<dyn Classifier>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_resolves_to_first_label() {
        let prediction = Prediction::Batch(vec![Label::from("rice")]);
        assert_eq!(prediction.len(), 1);
        assert_eq!(prediction.into_single(), Some(Label::from("rice")));
    }

    #[test]
    fn test_scalar_is_already_unwrapped() {
        let prediction = Prediction::Scalar(Label::from("maize"));
        assert_eq!(prediction.len(), 1);
        assert_eq!(prediction.clone().into_labels(), vec![Label::from("maize")]);
        assert_eq!(prediction.into_single(), Some(Label::from("maize")));
    }

    #[test]
    fn test_empty_batch_has_no_label() {
        let prediction = Prediction::Batch(Vec::new());
        assert!(prediction.is_empty());
        assert_eq!(prediction.into_single(), None);
    }

    #[test]
    fn test_label_serializes_as_plain_string() {
        let json = serde_json::to_string(&Label::from("coffee")).unwrap();
        assert_eq!(json, "\"coffee\"");
        assert_eq!(Label::from("coffee").to_string(), "coffee");
    }
}
