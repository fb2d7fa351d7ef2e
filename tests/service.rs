mod common;

use std::{sync::Arc, thread};

use funder_intent::{service::NO_FUNDER, IntentService, PredictionResponse};
use insta::assert_json_snapshot;

fn service() -> IntentService {
    let (vectorizer, classifier) = common::trained();
    IntentService::new(Arc::new(vectorizer), classifier).unwrap()
}

#[test]
fn response_shape_is_stable() {
    assert_json_snapshot!(PredictionResponse::new("funder", 0.876_543_21), @r###"
    {
      "intent": {
        "value": "funder",
        "confidence": 0.8765
      }
    }
    "###);
}

#[test]
fn predicts_funder_mentions() {
    let response = service()
        .predict("supported by a grant from the national science fund")
        .unwrap();
    assert_eq!(response.intent.value, "funder");
    assert!(response.intent.confidence > 0.5);
    assert!(response.accepts_funder(0.75));
}

#[test]
fn confidence_has_at_most_four_decimals() {
    let service = service();
    for text in ["open access licence", "funded by the fund", "zzz"] {
        let confidence = service.predict(text).unwrap().intent.confidence;
        assert!((0.0..=1.0).contains(&confidence));
        assert_eq!(confidence, (confidence * 10_000.0).round() / 10_000.0);
    }
}

#[test]
fn labels_come_from_training_data() {
    assert_eq!(service().labels(), vec!["funder".to_string(), NO_FUNDER.to_string()]);
}

#[test]
fn concurrent_predictions_agree() {
    let service = service();
    let expected = service.predict("the national science fund").unwrap();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            thread::spawn(move || service.predict("the national science fund").unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
