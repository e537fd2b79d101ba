//! Fitted model artifacts
//!
//! An artifact is a JSON document produced by the modeling toolchain.
//! Besides the fitted parameters it embeds the ordered feature schema it
//! was trained against, so the engine can verify the extraction contract
//! instead of trusting positions.

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// A fitted model loaded from disk
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub version: String,
    /// Ordered field names the model was trained on
    pub feature_schema: Vec<String>,
    pub model: ModelKind,
}

/// Fitted parameters by model family
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    /// Constant-label classifier; exposes no probability estimate
    MajorityClass { will_rain: bool },

    /// Logistic-regression classifier with a decision threshold
    Logistic {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },

    /// Linear regressor
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },

    /// Gradient-boosted regression tree ensemble
    GradientBoosting {
        base_score: f64,
        #[serde(default = "default_learning_rate")]
        learning_rate: f64,
        trees: Vec<RegressionTree>,
    },
}

fn default_threshold() -> f64 {
    0.5
}

fn default_learning_rate() -> f64 {
    1.0
}

impl ModelKind {
    pub fn is_classifier(&self) -> bool {
        matches!(
            self,
            ModelKind::MajorityClass { .. } | ModelKind::Logistic { .. }
        )
    }

    pub fn is_regressor(&self) -> bool {
        matches!(
            self,
            ModelKind::Linear { .. } | ModelKind::GradientBoosting { .. }
        )
    }
}

/// One regression tree, nodes stored as a flat arena rooted at index 0
#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl RegressionTree {
    /// Walk the tree for one feature vector.
    ///
    /// Returns `None` for structurally broken trees (dangling child
    /// index, feature index past the vector, or a walk longer than the
    /// node count, which implies a cycle).
    pub fn evaluate(&self, features: &[f64]) -> Option<f64> {
        let mut index = 0usize;

        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index)? {
                TreeNode::Leaf { value } => return Some(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature)?;
                    index = if *value <= *threshold { *left } else { *right };
                }
            }
        }

        None
    }
}

impl ModelArtifact {
    /// Load and structurally validate an artifact file
    pub fn load(path: &Path) -> AppResult<Self> {
        let file = File::open(path).map_err(|e| {
            AppError::Configuration(format!(
                "cannot open model artifact {}: {}",
                path.display(),
                e
            ))
        })?;

        let artifact: ModelArtifact =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                AppError::Configuration(format!(
                    "cannot parse model artifact {}: {}",
                    path.display(),
                    e
                ))
            })?;

        artifact.validate()?;
        Ok(artifact)
    }

    /// Check internal consistency: parameter arity against the embedded
    /// schema, and tree node references against node and feature counts.
    fn validate(&self) -> AppResult<()> {
        let arity = self.feature_schema.len();

        match &self.model {
            ModelKind::MajorityClass { .. } => {}
            ModelKind::Logistic { coefficients, .. }
            | ModelKind::Linear { coefficients, .. } => {
                if coefficients.len() != arity {
                    return Err(AppError::Configuration(format!(
                        "artifact `{}` has {} coefficients for {} schema fields",
                        self.name,
                        coefficients.len(),
                        arity
                    )));
                }
            }
            ModelKind::GradientBoosting { trees, .. } => {
                for (tree_index, tree) in trees.iter().enumerate() {
                    for node in &tree.nodes {
                        if let TreeNode::Split {
                            feature,
                            left,
                            right,
                            ..
                        } = node
                        {
                            if *feature >= arity
                                || *left >= tree.nodes.len()
                                || *right >= tree.nodes.len()
                            {
                                return Err(AppError::Configuration(format!(
                                    "artifact `{}` tree {} references an out-of-range node \
                                     or feature",
                                    self.name, tree_index
                                )));
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Verify the artifact's embedded schema against the canonical
    /// extraction order used by the feature builder.
    pub fn check_schema(&self, expected: &[&str]) -> AppResult<()> {
        if self.feature_schema.len() != expected.len()
            || self
                .feature_schema
                .iter()
                .zip(expected.iter())
                .any(|(actual, wanted)| actual != wanted)
        {
            return Err(AppError::Configuration(format!(
                "artifact `{}` was trained on a different feature schema than this build \
                 extracts; retrain or update the artifact",
                self.name
            )));
        }
        Ok(())
    }
}
