mod common;

use std::sync::OnceLock;

use funder_intent::{
    classifier::IntentClassifier, data::expression::normalize, nlp::HashingVectorizer,
    LabeledExample,
};
use proptest::prelude::*;

fn model() -> &'static (HashingVectorizer, IntentClassifier) {
    static MODEL: OnceLock<(HashingVectorizer, IntentClassifier)> = OnceLock::new();
    MODEL.get_or_init(common::trained)
}

proptest! {
    #[test]
    fn normalisation_is_idempotent(text in "[ A-Za-z\t]{0,40}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once.clone());
        let example = LabeledExample::new(&text, "funder");
        prop_assert_eq!(example.text(), once.as_str());
    }

    #[test]
    fn predictions_stay_within_the_label_set(text in "[a-z ]{0,60}") {
        let (vectorizer, classifier) = model();
        let prediction = classifier.predict(vectorizer, &text).unwrap();
        prop_assert!(classifier.labels().contains(&prediction.intent));
        prop_assert!(prediction.confidence >= 0.5 && prediction.confidence <= 1.0);

        let ranked = classifier.rank(vectorizer, &text).unwrap();
        let total: f64 = ranked.iter().map(|(_, p)| p).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }
}
