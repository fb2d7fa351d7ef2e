use std::io::Write;

use funder_intent::{data::load_training_data, ClassifierError};

fn write_json(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_and_normalises_expressions() {
    let file = write_json(
        r#"{"expressions": [
            {"text": "  Funded by the ERC ", "intent": "funder"},
            {"text": "Open Access", "intent": "no_funder"}
        ]}"#,
    );
    let examples = load_training_data(file.path()).unwrap();
    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0].text(), "funded by the erc");
    assert_eq!(examples[1].intent(), "no_funder");
}

#[test]
fn missing_expressions_key_is_schema_error() {
    let file = write_json(r#"{"examples": []}"#);
    assert!(matches!(
        load_training_data(file.path()),
        Err(ClassifierError::Schema(_))
    ));
}

#[test]
fn invalid_json_is_schema_error() {
    let file = write_json("{not json");
    assert!(matches!(
        load_training_data(file.path()),
        Err(ClassifierError::Schema(_))
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("training_data.json");
    assert!(matches!(
        load_training_data(&path),
        Err(ClassifierError::Io { .. })
    ));
}
