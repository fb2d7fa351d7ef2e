mod common;

use std::sync::Arc;

use funder_intent::{
    artifact,
    classifier,
    nlp::HashingVectorizer,
    ClassifierError, IntentService,
};

const QUERIES: &[&str] = &[
    "supported by a grant from the national science fund",
    "this article is distributed under open access terms",
    "the authors received no specific funding",
    "",
];

#[test]
fn saved_model_predicts_identically_after_load() {
    let (vectorizer, model) = common::trained();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models/intent.bin");

    artifact::save(&model, &path).unwrap();
    let restored = artifact::load(&path).unwrap();

    assert_eq!(
        artifact::to_bytes(&restored).unwrap(),
        artifact::to_bytes(&model).unwrap()
    );
    for text in QUERIES {
        let before = classifier::predict(&vectorizer, &model, text).unwrap();
        let after = classifier::predict(&vectorizer, &restored, text).unwrap();
        assert_eq!(before.intent, after.intent);
        assert_eq!(before.confidence.to_bits(), after.confidence.to_bits());
    }
}

#[test]
fn save_leaves_no_staging_file() {
    let (_, model) = common::trained();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("intent.bin");
    artifact::save(&model, &path).unwrap();
    artifact::save(&model, &path).unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("intent.bin")]);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.bin");
    match artifact::load(&path) {
        Err(ClassifierError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn corrupted_payload_is_rejected() {
    let (_, model) = common::trained();
    let mut bytes = artifact::to_bytes(&model).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    assert!(matches!(
        artifact::from_bytes(&bytes),
        Err(ClassifierError::TypeMismatch(_))
    ));
}

#[test]
fn truncated_payload_is_rejected() {
    let (_, model) = common::trained();
    let mut bytes = artifact::to_bytes(&model).unwrap();
    bytes.truncate(bytes.len() - 16);
    assert!(matches!(
        artifact::from_bytes(&bytes),
        Err(ClassifierError::TypeMismatch(_))
    ));
}

#[test]
fn newer_format_version_is_rejected() {
    let (_, model) = common::trained();
    let mut bytes = artifact::to_bytes(&model).unwrap();
    bytes[8..10].copy_from_slice(&(artifact::FORMAT_VERSION + 1).to_le_bytes());
    let err = artifact::from_bytes(&bytes).unwrap_err();
    assert!(err.to_string().contains("version"), "{err}");
}

#[test]
fn foreign_file_is_type_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "just some notes, not a model").unwrap();
    assert!(matches!(
        artifact::load(&path),
        Err(ClassifierError::TypeMismatch(_))
    ));
}

#[test]
fn artifact_refuses_a_different_vectorizer() {
    let (_, model) = common::trained();
    let narrow = HashingVectorizer::new(64);
    assert!(matches!(
        classifier::predict(&narrow, &model, "funded by the nsf"),
        Err(ClassifierError::TypeMismatch(_))
    ));
    assert!(matches!(
        IntentService::new(Arc::new(narrow), model),
        Err(ClassifierError::TypeMismatch(_))
    ));
}
