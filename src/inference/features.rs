//! Feature vectors and sample batches
//!
//! Converts loosely typed request payloads into the fixed-order numeric
//! input the model expects: `[N, P, K, temperature, humidity, ph, rainfall]`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::utils::error::{CropError, Result};

/// Number of features the model consumes
pub const NUM_FEATURES: usize = 7;

/// Feature names in the order the model was trained on
pub const FEATURE_NAMES: [&str; NUM_FEATURES] =
    ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

/// The seven soil/climate measurements for one sample.
///
/// Values are passed to the model uninterpreted; no range checks are made.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; NUM_FEATURES]);

impl FeatureVector {
    pub fn new(values: [f64; NUM_FEATURES]) -> Self {
        Self(values)
    }

    /// Build a vector from a JSON object keyed by feature name.
    ///
    /// Fields are checked in model order and the first problem wins.
    /// Numbers are taken as-is, strings are parsed after trimming
    /// whitespace, and anything else is rejected. JSON numbers that do not
    /// fit a finite `f64` (e.g. `1e400`) are rejected as invalid values.
    pub fn from_json(object: &Map<String, Value>) -> Result<Self> {
        let mut values = [0.0; NUM_FEATURES];

        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            let raw = object
                .get(name)
                .ok_or_else(|| CropError::MissingField(name.to_string()))?;
            *slot = parse_feature(name, raw)?;
        }

        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64; NUM_FEATURES] {
        &self.0
    }

    /// Look up a feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|idx| self.0[idx])
    }
}

fn parse_feature(name: &str, raw: &Value) -> Result<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| CropError::InvalidValue {
        field: name.to_string(),
        raw: raw.to_string(),
    })
}

/// An ordered batch of samples (batch_size x 7)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBatch {
    rows: Vec<[f64; NUM_FEATURES]>,
}

impl SampleBatch {
    /// Wrap a single vector into a batch of size 1
    pub fn single(features: FeatureVector) -> Self {
        Self {
            rows: vec![features.0],
        }
    }

    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        Self {
            rows: vectors.iter().map(|v| v.0).collect(),
        }
    }

    pub fn rows(&self) -> &[[f64; NUM_FEATURES]] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
