//! Loading labeled expressions from the JSON training document.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::{
    data::LabeledExample,
    error::{ClassifierError, Result},
};

/// Top-level key holding the list of training expressions.
pub const EXPRESSIONS_KEY: &str = "expressions";

/// Read the training document at `path` and extract its expressions.
pub fn load_training_data(path: &Path) -> Result<Vec<LabeledExample>> {
    info!(path = %path.display(), "loading training data");
    let raw = std::fs::read_to_string(path).map_err(|e| ClassifierError::io(path, e))?;
    let document: Value = serde_json::from_str(&raw)
        .map_err(|e| ClassifierError::Schema(format!("{}: {e}", path.display())))?;
    parse_expressions(&document)
}

/// Validate the document structure and build one example per list element,
/// preserving input order.
pub fn parse_expressions(document: &Value) -> Result<Vec<LabeledExample>> {
    let expressions = document.get(EXPRESSIONS_KEY).ok_or_else(|| {
        ClassifierError::Schema(format!("no `{EXPRESSIONS_KEY}` found in document"))
    })?;
    let expressions = expressions.as_array().ok_or_else(|| {
        ClassifierError::Schema(format!("`{EXPRESSIONS_KEY}` must be a list"))
    })?;

    let examples = expressions
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let text = string_field(element, "text", index)?;
            let intent = string_field(element, "intent", index)?;
            Ok(LabeledExample::new(text, intent))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(count = examples.len(), "loaded expressions");
    Ok(examples)
}

fn string_field<'a>(element: &'a Value, field: &str, index: usize) -> Result<&'a str> {
    match element.get(field) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(ClassifierError::InvalidExample {
            index,
            reason: format!("`{field}` is not a string: {other}"),
        }),
        None => Err(ClassifierError::InvalidExample {
            index,
            reason: format!("missing `{field}`"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn preserves_order_and_duplicates() {
        let doc = json!({
            "expressions": [
                {"text": "B", "intent": "no_funder"},
                {"text": "a", "intent": "funder"},
                {"text": "a", "intent": "funder"},
            ]
        });
        let examples = parse_expressions(&doc).unwrap();
        let texts: Vec<_> = examples.iter().map(LabeledExample::text).collect();
        assert_eq!(texts, vec!["b", "a", "a"]);
    }

    #[test]
    fn non_list_value_is_schema_error() {
        let doc = json!({"expressions": {"text": "a", "intent": "funder"}});
        assert!(matches!(
            parse_expressions(&doc),
            Err(ClassifierError::Schema(_))
        ));
    }

    #[test]
    fn non_string_intent_names_the_element() {
        let doc = json!({
            "expressions": [
                {"text": "a", "intent": "funder"},
                {"text": "b", "intent": 3},
            ]
        });
        match parse_expressions(&doc) {
            Err(ClassifierError::InvalidExample { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_text_is_invalid_example() {
        let doc = json!({"expressions": [{"intent": "funder"}]});
        assert!(matches!(
            parse_expressions(&doc),
            Err(ClassifierError::InvalidExample { index: 0, .. })
        ));
    }
}
