//! Prediction engine holding the fitted models
//!
//! Both artifacts are loaded once at process start and never mutated;
//! the engine is shared read-only across concurrent requests. A missing
//! artifact disables its forecast type only; the other stays servable.

use shared::{
    PrecipitationFeatureVector, RainFeatureVector, PRECIPITATION_FEATURE_FIELDS,
    RAIN_FEATURE_FIELDS,
};
use std::path::Path;

use crate::config::ModelsConfig;
use crate::error::{AppError, AppResult};
use crate::models::{ModelArtifact, ModelKind};

/// Classifier output
#[derive(Debug, Clone, PartialEq)]
pub struct RainModelOutput {
    pub will_rain: bool,
    /// Probability of the predicted label, when the model exposes one
    pub confidence: Option<f64>,
}

/// Regressor output
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationModelOutput {
    pub amount_mm: f64,
}

/// Inference engine over the two fitted models
#[derive(Debug)]
pub struct PredictionEngine {
    classifier: Option<ModelArtifact>,
    regressor: Option<ModelArtifact>,
}

impl PredictionEngine {
    /// Load both artifacts from disk.
    ///
    /// A model that fails to load is logged and left unavailable; the
    /// process keeps serving the other forecast type.
    pub fn load(config: &ModelsConfig) -> Self {
        let classifier = load_artifact(
            &config.rain_classifier_path(),
            "rain classifier",
            &RAIN_FEATURE_FIELDS,
            ModelKind::is_classifier,
        );
        let regressor = load_artifact(
            &config.precipitation_regressor_path(),
            "precipitation regressor",
            &PRECIPITATION_FEATURE_FIELDS,
            ModelKind::is_regressor,
        );

        Self {
            classifier,
            regressor,
        }
    }

    /// Build an engine from already-loaded artifacts
    pub fn from_artifacts(
        classifier: Option<ModelArtifact>,
        regressor: Option<ModelArtifact>,
    ) -> Self {
        Self {
            classifier,
            regressor,
        }
    }

    pub fn classifier_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn regressor_loaded(&self) -> bool {
        self.regressor.is_some()
    }

    /// Predict whether rain will occur on the target date
    pub fn predict_rain(&self, vector: &RainFeatureVector) -> AppResult<RainModelOutput> {
        let artifact = self
            .classifier
            .as_ref()
            .ok_or(AppError::ModelUnavailable("rain classifier"))?;

        check_arity(vector.len(), artifact)?;

        match &artifact.model {
            ModelKind::MajorityClass { will_rain } => Ok(RainModelOutput {
                will_rain: *will_rain,
                confidence: None,
            }),
            ModelKind::Logistic {
                coefficients,
                intercept,
                threshold,
            } => {
                let score = dot(coefficients, vector.values()) + intercept;
                let probability = sigmoid(score);
                let will_rain = probability >= *threshold;
                let confidence = if will_rain {
                    probability
                } else {
                    1.0 - probability
                };

                Ok(RainModelOutput {
                    will_rain,
                    confidence: Some(confidence),
                })
            }
            _ => Err(AppError::Configuration(format!(
                "artifact `{}` is not a classifier",
                artifact.name
            ))),
        }
    }

    /// Predict cumulative precipitation over the window, in millimetres.
    ///
    /// Precipitation cannot be negative: a negative raw model output is
    /// reported as zero.
    pub fn predict_precipitation_fall(
        &self,
        vector: &PrecipitationFeatureVector,
    ) -> AppResult<PrecipitationModelOutput> {
        let artifact = self
            .regressor
            .as_ref()
            .ok_or(AppError::ModelUnavailable("precipitation regressor"))?;

        check_arity(vector.len(), artifact)?;

        let raw = match &artifact.model {
            ModelKind::Linear {
                coefficients,
                intercept,
            } => dot(coefficients, vector.values()) + intercept,
            ModelKind::GradientBoosting {
                base_score,
                learning_rate,
                trees,
            } => {
                let mut sum = *base_score;
                for tree in trees {
                    let contribution = tree.evaluate(vector.values()).ok_or_else(|| {
                        AppError::Internal(format!(
                            "artifact `{}` contains an unevaluable tree",
                            artifact.name
                        ))
                    })?;
                    sum += learning_rate * contribution;
                }
                sum
            }
            _ => {
                return Err(AppError::Configuration(format!(
                    "artifact `{}` is not a regressor",
                    artifact.name
                )))
            }
        };

        Ok(PrecipitationModelOutput {
            amount_mm: raw.max(0.0),
        })
    }
}

fn load_artifact(
    path: &Path,
    role: &str,
    expected_schema: &[&str],
    role_check: fn(&ModelKind) -> bool,
) -> Option<ModelArtifact> {
    let artifact = ModelArtifact::load(path)
        .and_then(|artifact| {
            artifact.check_schema(expected_schema)?;
            if !role_check(&artifact.model) {
                return Err(AppError::Configuration(format!(
                    "artifact `{}` has the wrong model family for the {} slot",
                    artifact.name, role
                )));
            }
            Ok(artifact)
        });

    match artifact {
        Ok(artifact) => {
            tracing::info!(
                "Loaded {} `{}` version {}",
                role,
                artifact.name,
                artifact.version
            );
            Some(artifact)
        }
        Err(e) => {
            tracing::warn!("{} not available: {}", role, e);
            None
        }
    }
}

/// Vectors reaching the engine are builder-produced, so a length mismatch
/// is an internal schema-contract bug, never a caller error.
fn check_arity(actual: usize, artifact: &ModelArtifact) -> AppResult<()> {
    if actual != artifact.feature_schema.len() {
        return Err(AppError::InvalidFeatureVector(format!(
            "expected {} features for `{}`, got {}",
            artifact.feature_schema.len(),
            artifact.name,
            actual
        )));
    }
    Ok(())
}

fn dot(coefficients: &[f64], values: &[f64]) -> f64 {
    coefficients
        .iter()
        .zip(values.iter())
        .map(|(c, v)| c * v)
        .sum()
}

fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegressionTree, TreeNode};
    use chrono::NaiveDate;
    use shared::{build_precipitation_features, build_rain_features};
    use shared::{DailyObservation, HourlyObservation};

    fn rain_vector() -> RainFeatureVector {
        let observation = DailyObservation {
            date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            temperature_2m_max: Some(18.4),
            temperature_2m_min: Some(9.1),
            temperature_2m_mean: Some(13.2),
            relative_humidity_2m_max: Some(88.0),
            relative_humidity_2m_min: Some(54.0),
            pressure_msl_mean: Some(1021.3),
            wind_speed_10m_max: Some(24.5),
            wind_speed_10m_mean: Some(11.3),
            wind_direction_10m_dominant: Some(225.0),
            precipitation_sum: Some(0.4),
            rain_sum: Some(0.4),
            shortwave_radiation_sum: Some(9.8),
            daylight_duration: Some(35711.0),
        };
        build_rain_features(&observation).unwrap()
    }

    fn precipitation_vector() -> PrecipitationFeatureVector {
        let observation = HourlyObservation {
            timestamp: NaiveDate::from_ymd_opt(2023, 6, 16)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            temperature_2m: Some(11.0),
            relative_humidity_2m: Some(76.0),
            dew_point_2m: Some(7.0),
            precipitation: Some(0.2),
            rain: Some(0.2),
            pressure_msl: Some(1019.4),
            cloud_cover: Some(64.0),
            wind_speed_10m: Some(8.9),
            wind_direction_10m: Some(200.0),
            shortwave_radiation: Some(0.0),
            surface_pressure: Some(1018.1),
            cloud_cover_low: Some(40.0),
            cloud_cover_mid: Some(25.0),
            cloud_cover_high: Some(10.0),
        };
        build_precipitation_features(&[observation]).unwrap()
    }

    fn classifier_artifact(model: ModelKind) -> ModelArtifact {
        ModelArtifact {
            name: "rain_classifier".to_string(),
            version: "test".to_string(),
            feature_schema: RAIN_FEATURE_FIELDS.iter().map(|s| s.to_string()).collect(),
            model,
        }
    }

    fn regressor_artifact(model: ModelKind) -> ModelArtifact {
        ModelArtifact {
            name: "precipitation_regressor".to_string(),
            version: "test".to_string(),
            feature_schema: PRECIPITATION_FEATURE_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            model,
        }
    }

    #[test]
    fn test_majority_class_has_no_confidence() {
        let engine = PredictionEngine::from_artifacts(
            Some(classifier_artifact(ModelKind::MajorityClass {
                will_rain: false,
            })),
            None,
        );

        let output = engine.predict_rain(&rain_vector()).unwrap();
        assert!(!output.will_rain);
        assert_eq!(output.confidence, None);
    }

    #[test]
    fn test_logistic_confidence_in_unit_interval() {
        let coefficients = vec![0.0; RAIN_FEATURE_FIELDS.len()];
        let engine = PredictionEngine::from_artifacts(
            Some(classifier_artifact(ModelKind::Logistic {
                coefficients,
                intercept: 2.0,
                threshold: 0.5,
            })),
            None,
        );

        let output = engine.predict_rain(&rain_vector()).unwrap();
        assert!(output.will_rain);
        let confidence = output.confidence.unwrap();
        assert!((0.0..=1.0).contains(&confidence));
        // sigmoid(2.0) ~ 0.88
        assert!(confidence > 0.85);
    }

    #[test]
    fn test_missing_classifier_is_model_unavailable() {
        let engine = PredictionEngine::from_artifacts(None, None);

        let result = engine.predict_rain(&rain_vector());
        assert!(matches!(result, Err(AppError::ModelUnavailable(_))));
    }

    #[test]
    fn test_negative_regressor_output_clamps_to_zero() {
        let coefficients = vec![0.0; PRECIPITATION_FEATURE_FIELDS.len()];
        let engine = PredictionEngine::from_artifacts(
            None,
            Some(regressor_artifact(ModelKind::Linear {
                coefficients,
                intercept: -1.2,
            })),
        );

        let output = engine
            .predict_precipitation_fall(&precipitation_vector())
            .unwrap();
        assert_eq!(output.amount_mm, 0.0);
    }

    #[test]
    fn test_positive_regressor_output_passes_through() {
        let coefficients = vec![0.0; PRECIPITATION_FEATURE_FIELDS.len()];
        let engine = PredictionEngine::from_artifacts(
            None,
            Some(regressor_artifact(ModelKind::Linear {
                coefficients,
                intercept: 6.4,
            })),
        );

        let output = engine
            .predict_precipitation_fall(&precipitation_vector())
            .unwrap();
        assert_eq!(output.amount_mm, 6.4);
    }

    #[test]
    fn test_gradient_boosting_sums_tree_contributions() {
        let trees = vec![
            RegressionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 3, // precipitation, 0.2 in the fixture
                        threshold: 0.1,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { value: 0.5 },
                    TreeNode::Leaf { value: 2.0 },
                ],
            },
            RegressionTree {
                nodes: vec![TreeNode::Leaf { value: 1.0 }],
            },
        ];
        let engine = PredictionEngine::from_artifacts(
            None,
            Some(regressor_artifact(ModelKind::GradientBoosting {
                base_score: 0.5,
                learning_rate: 0.5,
                trees,
            })),
        );

        let output = engine
            .predict_precipitation_fall(&precipitation_vector())
            .unwrap();
        // 0.5 + 0.5 * 2.0 + 0.5 * 1.0
        assert!((output.amount_mm - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_arity_mismatch_is_invalid_feature_vector() {
        let mut schema: Vec<String> = RAIN_FEATURE_FIELDS.iter().map(|s| s.to_string()).collect();
        schema.push("extra_field".to_string());
        let artifact = ModelArtifact {
            name: "rain_classifier".to_string(),
            version: "test".to_string(),
            feature_schema: schema,
            model: ModelKind::MajorityClass { will_rain: true },
        };
        let engine = PredictionEngine::from_artifacts(Some(artifact), None);

        let result = engine.predict_rain(&rain_vector());
        assert!(matches!(result, Err(AppError::InvalidFeatureVector(_))));
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(100))]

        /// The reported amount is non-negative for any linear model and
        /// any complete observation
        #[test]
        fn prop_precipitation_never_negative(
            values in proptest::array::uniform14(-500.0..500.0f64),
            coefficients in proptest::array::uniform14(-5.0..5.0f64),
            intercept in -100.0..100.0f64,
        ) {
            let observation = HourlyObservation {
                timestamp: NaiveDate::from_ymd_opt(2023, 6, 16)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                temperature_2m: Some(values[0]),
                relative_humidity_2m: Some(values[1]),
                dew_point_2m: Some(values[2]),
                precipitation: Some(values[3]),
                rain: Some(values[4]),
                pressure_msl: Some(values[5]),
                cloud_cover: Some(values[6]),
                wind_speed_10m: Some(values[7]),
                wind_direction_10m: Some(values[8]),
                shortwave_radiation: Some(values[9]),
                surface_pressure: Some(values[10]),
                cloud_cover_low: Some(values[11]),
                cloud_cover_mid: Some(values[12]),
                cloud_cover_high: Some(values[13]),
            };
            let vector = build_precipitation_features(&[observation]).unwrap();

            let engine = PredictionEngine::from_artifacts(
                None,
                Some(regressor_artifact(ModelKind::Linear {
                    coefficients: coefficients.to_vec(),
                    intercept,
                })),
            );

            let output = engine.predict_precipitation_fall(&vector).unwrap();
            proptest::prop_assert!(output.amount_mm >= 0.0);
        }
    }

    #[test]
    fn test_predictions_are_deterministic() {
        let coefficients = vec![0.01; RAIN_FEATURE_FIELDS.len()];
        let engine = PredictionEngine::from_artifacts(
            Some(classifier_artifact(ModelKind::Logistic {
                coefficients,
                intercept: -0.3,
                threshold: 0.5,
            })),
            None,
        );

        let first = engine.predict_rain(&rain_vector()).unwrap();
        let second = engine.predict_rain(&rain_vector()).unwrap();
        assert_eq!(first, second);
    }
}
