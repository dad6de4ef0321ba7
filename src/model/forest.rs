//! Random forest classifier
//!
//! Inference-only forest read from a JSON artifact. Each tree routes a
//! sample to a leaf holding a class index; the forest predicts the class
//! with the most votes, ties going to the lowest class index.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

use super::{Classifier, Label, Prediction};
use crate::inference::features::SampleBatch;
use crate::utils::error::{CropError, Result};

/// Internal node in a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f64,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node holding the predicted class index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    pub class_label: usize,
}

/// A node in a decision tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Node(Node),
    Leaf(Leaf),
}

impl TreeNode {
    pub fn leaf(class_label: usize) -> Self {
        TreeNode::Leaf(Leaf { class_label })
    }

    pub fn split(feature_idx: usize, threshold: f64, left: TreeNode, right: TreeNode) -> Self {
        TreeNode::Node(Node {
            feature_idx,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Route one sample down to its leaf
    fn route(&self, sample: &[f64]) -> usize {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf.class_label,
                TreeNode::Node(internal) => {
                    node = if sample[internal.feature_idx] <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }

    fn check(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        match self {
            TreeNode::Leaf(leaf) if leaf.class_label >= n_classes => Err(format!(
                "leaf class {} out of range for {} classes",
                leaf.class_label, n_classes
            )),
            TreeNode::Leaf(_) => Ok(()),
            TreeNode::Node(node) => {
                if node.feature_idx >= n_features {
                    return Err(format!(
                        "split on feature {} but model has {} features",
                        node.feature_idx, n_features
                    ));
                }
                if node.threshold.is_nan() {
                    return Err(format!("NaN threshold on feature {}", node.feature_idx));
                }
                node.left.check(n_features, n_classes)?;
                node.right.check(n_features, n_classes)
            }
        }
    }
}

/// Majority-vote ensemble of decision trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    classes: Vec<String>,
    n_features: usize,
    trees: Vec<TreeNode>,
}

impl RandomForest {
    /// Assemble a forest, rejecting structurally broken ones
    pub fn new(classes: Vec<String>, n_features: usize, trees: Vec<TreeNode>) -> Result<Self> {
        let forest = Self {
            classes,
            n_features,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// Read and validate a forest artifact
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CropError::ModelLoad(path.to_path_buf(), e.to_string()))?;
        let forest: RandomForest = serde_json::from_str(&content)
            .map_err(|e| CropError::ModelLoad(path.to_path_buf(), e.to_string()))?;
        forest.validate()?;
        Ok(forest)
    }

    /// Write the forest as a JSON artifact
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CropError::InvalidModel(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(CropError::InvalidModel("forest has no trees".into()));
        }
        if self.classes.is_empty() {
            return Err(CropError::InvalidModel("forest has no classes".into()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features, self.classes.len())
                .map_err(|e| CropError::InvalidModel(format!("tree {}: {}", idx, e)))?;
        }
        Ok(())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Class index voted for by the most trees
    fn vote(&self, sample: &[f64]) -> usize {
        let mut votes = vec![0usize; self.classes.len()];
        for tree in &self.trees {
            votes[tree.route(sample)] += 1;
        }

        let mut best = 0;
        for (class, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = class;
            }
        }
        best
    }
}

impl Classifier for RandomForest {
    fn predict(&self, batch: &SampleBatch) -> anyhow::Result<Prediction> {
        let mut labels = Vec::with_capacity(batch.len());

        for row in batch.rows() {
            if row.len() != self.n_features {
                bail!(
                    "feature count mismatch: model expects {} features but input has {}",
                    self.n_features,
                    row.len()
                );
            }
            let class = self.vote(row);
            let name = self
                .classes
                .get(class)
                .ok_or_else(|| anyhow!("class index {} has no name", class))?;
            labels.push(Label::new(name.as_str()));
        }

        Ok(Prediction::Batch(labels))
    }

    fn describe(&self) -> String {
        format!(
            "random forest ({} trees, max depth {}, {} classes)",
            self.n_trees(),
            self.max_depth(),
            self.classes.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::features::FeatureVector;
    use tempfile::TempDir;

    fn classes() -> Vec<String> {
        vec!["rice".into(), "maize".into(), "chickpea".into()]
    }

    /// rainfall > 150 -> rice, otherwise temperature <= 25 -> maize, else chickpea
    fn stump_forest() -> RandomForest {
        let tree = TreeNode::split(
            6,
            150.0,
            TreeNode::split(3, 25.0, TreeNode::leaf(1), TreeNode::leaf(2)),
            TreeNode::leaf(0),
        );
        RandomForest::new(classes(), 7, vec![tree.clone(), tree, TreeNode::leaf(2)]).unwrap()
    }

    fn sample(temperature: f64, rainfall: f64) -> SampleBatch {
        SampleBatch::single(FeatureVector::new([
            90.0,
            42.0,
            43.0,
            temperature,
            82.0,
            6.5,
            rainfall,
        ]))
    }

    #[test]
    fn test_majority_vote() {
        let forest = stump_forest();
        let prediction = forest.predict(&sample(20.8, 202.9)).unwrap();
        assert_eq!(prediction, Prediction::Batch(vec![Label::from("rice")]));

        let prediction = forest.predict(&sample(20.0, 50.0)).unwrap();
        assert_eq!(prediction.into_single(), Some(Label::from("maize")));
    }

    #[test]
    fn test_tie_goes_to_lowest_class() {
        let forest =
            RandomForest::new(classes(), 7, vec![TreeNode::leaf(2), TreeNode::leaf(1)]).unwrap();
        let prediction = forest.predict(&sample(20.0, 50.0)).unwrap();
        assert_eq!(prediction.into_single(), Some(Label::from("maize")));
    }

    #[test]
    fn test_one_label_per_row() {
        let forest = stump_forest();
        let batch = SampleBatch::from_vectors(&[
            FeatureVector::new([0.0, 0.0, 0.0, 30.0, 0.0, 0.0, 10.0]),
            FeatureVector::new([0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 300.0]),
        ]);
        let labels = forest.predict(&batch).unwrap().into_labels();
        assert_eq!(labels, vec![Label::from("chickpea"), Label::from("rice")]);
    }

    #[test]
    fn test_feature_count_mismatch_fails_inference() {
        let forest = RandomForest::new(classes(), 4, vec![TreeNode::leaf(0)]).unwrap();
        let err = forest.predict(&sample(20.0, 50.0)).unwrap_err();
        assert!(err.to_string().contains("feature count mismatch"));
    }

    #[test]
    fn test_validation_rejects_broken_forests() {
        assert!(RandomForest::new(classes(), 7, Vec::new()).is_err());
        assert!(RandomForest::new(Vec::new(), 7, vec![TreeNode::leaf(0)]).is_err());
        assert!(RandomForest::new(classes(), 7, vec![TreeNode::leaf(3)]).is_err());

        let bad_split = TreeNode::split(9, 1.0, TreeNode::leaf(0), TreeNode::leaf(1));
        let err = RandomForest::new(classes(), 7, vec![bad_split]).unwrap_err();
        assert!(matches!(err, CropError::InvalidModel(_)));
    }

    #[test]
    fn test_save_and_load_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forest.json");

        let forest = stump_forest();
        forest.save(&path).unwrap();

        let loaded = RandomForest::load(&path).unwrap();
        assert_eq!(loaded.n_trees(), 3);
        assert_eq!(loaded.max_depth(), 2);
        assert_eq!(loaded.classes(), forest.classes());
        assert!(loaded.describe().contains("3 trees"));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forest.json");
        fs::write(&path, "not a model").unwrap();

        let err = RandomForest::load(&path).unwrap_err();
        assert!(matches!(err, CropError::ModelLoad(_, _)));
    }
}
