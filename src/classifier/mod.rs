//! Intent classifier core: training over embedded examples and inference.

pub mod encoder;
pub mod metrics;
pub mod search;
pub mod split;
pub mod svm;

use linfa::{traits::Predict, Dataset};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

pub use encoder::LabelEncoder;
pub use search::{GridSearch, HyperparameterSearch, SearchOutcome};
pub use svm::{ClassWeight, Kernel, LinearSvc, SvcParams};

use crate::{
    data::LabeledExample,
    error::{ClassifierError, Result},
    nlp::{Vectorizer, VectorizerDescriptor},
};

/// Seed of the validation shuffle.
pub const DEFAULT_SEED: u64 = 2503;

/// Knobs of a training run.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Share of examples held out for the validation report.
    pub validation_fraction: f64,
    pub seed: u64,
    /// Cross-validation folds of the default grid search.
    pub folds: usize,
    /// Upper bound on parallel fits during the grid search.
    pub workers: usize,
    /// Grid of configurations compared by the default search.
    pub candidates: Vec<SvcParams>,
}

impl TrainingConfig {
    pub fn grid_search(&self) -> GridSearch {
        GridSearch::new(self.candidates.clone(), self.folds).workers(self.workers)
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            validation_fraction: 0.05,
            seed: DEFAULT_SEED,
            folds: 2,
            workers: 8,
            candidates: vec![SvcParams::new(150.0)],
        }
    }
}

/// Trained artifact: label encoder, fitted model and the vectorizer it expects.
#[derive(Debug, Serialize, Deserialize)]
pub struct IntentClassifier {
    encoder: LabelEncoder,
    model: LinearSvc,
    vectorizer: VectorizerDescriptor,
}

/// Best intent for a text with its unrounded probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub intent: String,
    pub confidence: f64,
}

impl IntentClassifier {
    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn model(&self) -> &LinearSvc {
        &self.model
    }

    pub fn vectorizer(&self) -> &VectorizerDescriptor {
        &self.vectorizer
    }

    pub fn labels(&self) -> Vec<String> {
        self.encoder.classes().map(str::to_string).collect()
    }

    /// Check that encoder, model and vectorizer agree on their index and
    /// feature spaces.
    pub fn validate(&self) -> Result<()> {
        if self.encoder.len() < 2 {
            return Err(ClassifierError::TypeMismatch(format!(
                "encoder holds {} classes, expected at least 2",
                self.encoder.len()
            )));
        }
        if self.encoder.len() != self.model.n_classes() {
            return Err(ClassifierError::TypeMismatch(format!(
                "encoder holds {} classes but model scores {}",
                self.encoder.len(),
                self.model.n_classes()
            )));
        }
        if !self.model.is_consistent() {
            return Err(ClassifierError::TypeMismatch(
                "model parameters are malformed".into(),
            ));
        }
        if self.model.n_features() != self.vectorizer.dimension {
            return Err(ClassifierError::TypeMismatch(format!(
                "model expects {} features but was trained with vectorizer {}",
                self.model.n_features(),
                self.vectorizer
            )));
        }
        Ok(())
    }

    /// Fail unless `descriptor` names the vectorizer this artifact was
    /// trained with.
    pub fn ensure_compatible(&self, descriptor: &VectorizerDescriptor) -> Result<()> {
        if *descriptor != self.vectorizer {
            return Err(ClassifierError::TypeMismatch(format!(
                "artifact trained with vectorizer {} cannot score {} vectors",
                self.vectorizer, descriptor
            )));
        }
        Ok(())
    }

    /// Every label with its probability, most probable first. Equal
    /// probabilities keep encoder order.
    pub fn rank(&self, vectorizer: &dyn Vectorizer, text: &str) -> Result<Vec<(String, f64)>> {
        self.validate()?;
        self.ensure_compatible(&vectorizer.descriptor())?;

        let features = vectorizer
            .embed(text)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;
        if features.len() != self.model.n_features() {
            return Err(ClassifierError::Inference(format!(
                "vectorizer returned {} features, expected {}",
                features.len(),
                self.model.n_features()
            )));
        }
        let x = to_row(features);
        let probabilities = self.model.predict_proba_row(x.view());

        let mut ranked = probabilities
            .iter()
            .enumerate()
            .map(|(idx, &p)| {
                self.encoder
                    .inverse_transform(idx)
                    .map(|label| (label.to_string(), p))
                    .ok_or_else(|| {
                        ClassifierError::TypeMismatch(format!("class index {idx} has no label"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(ranked)
    }

    pub fn predict(&self, vectorizer: &dyn Vectorizer, text: &str) -> Result<Prediction> {
        predict(vectorizer, self, text)
    }
}

/// Train with the grid search described by `config`.
pub fn train(
    vectorizer: &dyn Vectorizer,
    examples: &[LabeledExample],
    config: &TrainingConfig,
) -> Result<IntentClassifier> {
    train_with(vectorizer, examples, config, &config.grid_search())
}

/// Train with an explicit hyperparameter search strategy.
#[instrument(skip_all, fields(examples = examples.len()))]
pub fn train_with(
    vectorizer: &dyn Vectorizer,
    examples: &[LabeledExample],
    config: &TrainingConfig,
    search: &dyn HyperparameterSearch,
) -> Result<IntentClassifier> {
    if examples.is_empty() {
        return Err(ClassifierError::Training("no training examples".into()));
    }
    let encoder = LabelEncoder::fit(examples.iter().map(LabeledExample::intent));
    if encoder.len() < 2 {
        return Err(ClassifierError::Training(format!(
            "at least two distinct intents are required, found {}",
            encoder.len()
        )));
    }

    let descriptor = vectorizer.descriptor();
    let mut records = Array2::<f64>::zeros((examples.len(), descriptor.dimension));
    let mut targets = Array1::<usize>::zeros(examples.len());
    for (idx, example) in examples.iter().enumerate() {
        let features = vectorizer.embed(example.text()).map_err(|e| {
            ClassifierError::Training(format!("embedding example {idx}: {e}"))
        })?;
        if features.len() != descriptor.dimension {
            return Err(ClassifierError::Training(format!(
                "example {idx} embedded to {} features, expected {}",
                features.len(),
                descriptor.dimension
            )));
        }
        records.row_mut(idx).assign(&to_row(features));
        targets[idx] = encoder.transform(example.intent()).ok_or_else(|| {
            ClassifierError::Training(format!("intent of example {idx} missing from encoder"))
        })?;
    }
    let dataset = Dataset::new(records, targets);

    let split = split::shuffle_split(examples.len(), config.validation_fraction, config.seed);
    let train_set = search::subset(&dataset, &split.train);
    info!(
        classes = encoder.len(),
        train = split.train.len(),
        validation = split.validation.len(),
        dimension = descriptor.dimension,
        "training intent classifier"
    );
    let outcome = search.search(&train_set, encoder.len())?;

    if split.validation.is_empty() {
        info!("validation split is empty; skipping accuracy report");
    } else {
        let validation = search::subset(&dataset, &split.validation);
        let predicted: Array1<usize> = outcome.model.predict(&validation.records);
        let accuracy = metrics::accuracy(validation.targets.view(), predicted.view())?;
        info!(
            accuracy,
            samples = split.validation.len(),
            "accuracy on validation split"
        );
    }

    Ok(IntentClassifier {
        encoder,
        model: outcome.model,
        vectorizer: descriptor,
    })
}

/// Most probable intent for `text` and its probability (not rounded).
pub fn predict(
    vectorizer: &dyn Vectorizer,
    classifier: &IntentClassifier,
    text: &str,
) -> Result<Prediction> {
    let ranked = classifier.rank(vectorizer, text)?;
    let (intent, confidence) = ranked
        .into_iter()
        .next()
        .ok_or_else(|| ClassifierError::Inference("model produced no classes".into()))?;
    Ok(Prediction { intent, confidence })
}

fn to_row(features: Vec<f32>) -> Array1<f64> {
    features.into_iter().map(f64::from).collect()
}
