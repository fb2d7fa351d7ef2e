//! Prediction service facade consumed by the extraction pipeline.

use std::{path::Path, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    artifact,
    classifier::IntentClassifier,
    error::Result,
    nlp::{Vectorizer, VectorizerDescriptor},
};

/// Label the pipeline treats as a false-positive funder mention.
pub const NO_FUNDER: &str = "no_funder";

/// Confidence above which a `no_funder` prediction rejects a candidate.
pub const DEFAULT_MIN_NO_FUNDER_CONFIDENCE: f64 = 0.75;

/// `{"intent": {"value": ..., "confidence": ...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub intent: IntentValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentValue {
    pub value: String,
    pub confidence: f64,
}

impl PredictionResponse {
    pub fn new(value: impl Into<String>, confidence: f64) -> Self {
        Self {
            intent: IntentValue {
                value: value.into(),
                confidence: round_confidence(confidence),
            },
        }
    }

    /// Gate rule of the extraction pipeline: keep the candidate answer unless
    /// it is confidently classified as `no_funder`.
    pub fn accepts_funder(&self, min_no_funder_confidence: f64) -> bool {
        !(self.intent.value == NO_FUNDER && self.intent.confidence > min_no_funder_confidence)
    }
}

/// Round to four decimal places.
pub fn round_confidence(confidence: f64) -> f64 {
    (confidence * 10_000.0).round() / 10_000.0
}

/// Vectorizer and trained classifier held together for the lifetime of the
/// service. Cloning shares both; prediction never mutates them.
#[derive(Clone)]
pub struct IntentService {
    vectorizer: Arc<dyn Vectorizer>,
    classifier: Arc<IntentClassifier>,
}

impl IntentService {
    pub fn new(vectorizer: Arc<dyn Vectorizer>, classifier: IntentClassifier) -> Result<Self> {
        classifier.validate()?;
        classifier.ensure_compatible(&vectorizer.descriptor())?;
        Ok(Self {
            vectorizer,
            classifier: Arc::new(classifier),
        })
    }

    /// Load the artifact at `model_path` and pair it with `vectorizer`.
    pub fn load(model_path: &Path, vectorizer: Arc<dyn Vectorizer>) -> Result<Self> {
        let classifier = artifact::load(model_path)?;
        Self::new(vectorizer, classifier)
    }

    pub fn predict(&self, text: &str) -> Result<PredictionResponse> {
        let prediction = self.classifier.predict(self.vectorizer.as_ref(), text)?;
        debug!(
            intent = %prediction.intent,
            confidence = prediction.confidence,
            "classified context"
        );
        Ok(PredictionResponse::new(
            prediction.intent,
            prediction.confidence,
        ))
    }

    pub fn labels(&self) -> Vec<String> {
        self.classifier.labels()
    }

    pub fn vectorizer(&self) -> VectorizerDescriptor {
        self.vectorizer.descriptor()
    }
}
