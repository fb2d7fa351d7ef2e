#![allow(dead_code)]

use funder_intent::{
    classifier::{self, IntentClassifier, TrainingConfig},
    nlp::HashingVectorizer,
    LabeledExample,
};

pub fn acknowledgements() -> Vec<LabeledExample> {
    vec![
        LabeledExample::new(
            "we thank the national science fund for their generous support",
            "funder",
        ),
        LabeledExample::new("this work is licensed under open access terms", "no_funder"),
        LabeledExample::new(
            "the grant was provided by the national science fund",
            "funder",
        ),
        LabeledExample::new("no external funding was received for this study", "no_funder"),
    ]
}

pub fn config() -> TrainingConfig {
    TrainingConfig {
        workers: 2,
        ..TrainingConfig::default()
    }
}

pub fn trained() -> (HashingVectorizer, IntentClassifier) {
    let vectorizer = HashingVectorizer::default();
    let classifier = classifier::train(&vectorizer, &acknowledgements(), &config())
        .expect("training succeeds");
    (vectorizer, classifier)
}
