//! Risk classification: encode, pick a model, turn its output into a verdict
//!
//! This is the single entry point every presentation surface goes through,
//! so there is exactly one feature order and one error taxonomy.

use crate::encoder::FeatureEncoder;
use crate::model::Prediction;
use crate::registry::{ModelHandle, ModelRegistry, SharedRegistry};
use lungscreen_core::{
    Error, FeatureVector, Result, RiskLabel, RiskVerdict, SymptomForm, SymptomRecord,
};

/// Slack allowed for floating-point drift in model probabilities
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Classify a raw form with the named model.
///
/// Fails with `Encoding` for bad input, `UnknownModel` for a name that is
/// not registered, and `Inference` when the model errors or returns an
/// unusable distribution. Never falls back to a default verdict.
pub fn classify(
    form: &SymptomForm,
    model_name: &str,
    registry: &ModelRegistry,
) -> Result<RiskVerdict> {
    let features = FeatureEncoder::encode(form)?;
    classify_features(&features, model_name, registry)
}

/// Classify an already validated record
pub fn classify_record(
    record: &SymptomRecord,
    model_name: &str,
    registry: &ModelRegistry,
) -> Result<RiskVerdict> {
    let features = FeatureEncoder::encode_record(record);
    classify_features(&features, model_name, registry)
}

fn classify_features(
    features: &FeatureVector,
    model_name: &str,
    registry: &ModelRegistry,
) -> Result<RiskVerdict> {
    let handle = registry.get(model_name)?;
    let prediction = run_model(&handle, features)?;
    verdict_from_prediction(handle.name(), prediction)
}

fn run_model(handle: &ModelHandle, features: &FeatureVector) -> Result<Prediction> {
    handle
        .model()
        .predict_with_proba(features)
        .map_err(|e| match e {
            Error::Inference(_) => e,
            other => Error::inference(format!("model '{}' failed: {}", handle.name(), other)),
        })
}

/// Turn raw model output into a verdict.
///
/// Confidence is the probability of the *predicted* class, so a `LowRisk`
/// verdict reports confidence in low risk.
pub fn verdict_from_prediction(model_name: &str, prediction: Prediction) -> Result<RiskVerdict> {
    let Prediction {
        class,
        probabilities,
    } = prediction;

    let label = RiskLabel::from_class(class).ok_or_else(|| {
        Error::inference(format!(
            "model '{}' predicted class {}, expected 0 or 1",
            model_name, class
        ))
    })?;

    if probabilities.len() != 2 {
        return Err(Error::inference(format!(
            "model '{}' returned {} class probabilities, expected 2",
            model_name,
            probabilities.len()
        )));
    }

    if let Some(bad) = probabilities
        .iter()
        .find(|p| !p.is_finite() || **p < -PROBABILITY_TOLERANCE || **p > 1.0 + PROBABILITY_TOLERANCE)
    {
        return Err(Error::inference(format!(
            "model '{}' returned probability {} outside [0, 1]",
            model_name, bad
        )));
    }

    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(Error::inference(format!(
            "model '{}' class probabilities sum to {}, expected 1",
            model_name, total
        )));
    }

    let confidence = probabilities[class].clamp(0.0, 1.0);

    Ok(RiskVerdict::new(label, confidence, model_name))
}

/// Classifier bound to a shared registry, for long-lived services
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    registry: SharedRegistry,
}

impl RiskClassifier {
    pub fn new(registry: impl Into<SharedRegistry>) -> Self {
        Self {
            registry: registry.into(),
        }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Classify a raw form with the named model
    pub fn classify(&self, form: &SymptomForm, model_name: &str) -> Result<RiskVerdict> {
        classify(form, model_name, &self.registry)
    }

    /// Classify a validated record with the named model
    pub fn classify_record(&self, record: &SymptomRecord, model_name: &str) -> Result<RiskVerdict> {
        classify_record(record, model_name, &self.registry)
    }

    /// Classify with the registry's default model
    pub fn classify_default(&self, form: &SymptomForm) -> Result<RiskVerdict> {
        classify(form, self.registry.default_model(), &self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(class: usize, probabilities: Vec<f64>) -> Prediction {
        Prediction {
            class,
            probabilities,
        }
    }

    #[test]
    fn test_confidence_is_probability_of_predicted_class() {
        let high = verdict_from_prediction("m", prediction(1, vec![0.3, 0.7])).unwrap();
        assert_eq!(high.label, RiskLabel::HighRisk);
        assert_eq!(high.confidence, 0.7);

        let low = verdict_from_prediction("m", prediction(0, vec![0.8, 0.2])).unwrap();
        assert_eq!(low.label, RiskLabel::LowRisk);
        assert_eq!(low.confidence, 0.8);
        assert_eq!(low.model, "m");
    }

    #[test]
    fn test_confidence_follows_class_even_when_minority() {
        // A model may predict a class it assigns less mass to
        let verdict = verdict_from_prediction("m", prediction(1, vec![0.6, 0.4])).unwrap();
        assert_eq!(verdict.label, RiskLabel::HighRisk);
        assert_eq!(verdict.confidence, 0.4);
    }

    #[test]
    fn test_rejects_class_outside_binary_domain() {
        let err = verdict_from_prediction("m", prediction(2, vec![0.2, 0.3, 0.5])).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_rejects_short_distribution() {
        let err = verdict_from_prediction("m", prediction(1, vec![0.9])).unwrap_err();
        assert!(err.to_string().contains("returned 1 class probabilities"));
    }

    #[test]
    fn test_rejects_out_of_range_and_nan() {
        assert!(verdict_from_prediction("m", prediction(0, vec![1.5, -0.5])).is_err());
        assert!(verdict_from_prediction("m", prediction(0, vec![f64::NAN, 0.5])).is_err());
    }

    #[test]
    fn test_rejects_distribution_not_summing_to_one() {
        let err = verdict_from_prediction("m", prediction(0, vec![0.5, 0.4])).unwrap_err();
        assert!(err.to_string().contains("sum to"));
    }

    #[test]
    fn test_tolerates_rounding_drift() {
        let verdict =
            verdict_from_prediction("m", prediction(1, vec![-1e-9, 1.0 + 1e-9])).unwrap();
        assert_eq!(verdict.confidence, 1.0);
    }
}
