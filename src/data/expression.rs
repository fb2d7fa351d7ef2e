//! A single labeled phrase used to train the intent classifier.

use serde::Serialize;

/// Training phrase paired with its intent label.
///
/// The text is lower-cased and trimmed on construction; the original casing is
/// not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledExample {
    text: String,
    intent: String,
}

impl LabeledExample {
    pub fn new(text: impl AsRef<str>, intent: impl Into<String>) -> Self {
        Self {
            text: normalize(text.as_ref()),
            intent: intent.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn intent(&self) -> &str {
        &self.intent
    }
}

/// Canonical form applied to every training text.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_lowercased_and_trimmed() {
        let example = LabeledExample::new("  Funded by the NSF \n", "funder");
        assert_eq!(example.text(), "funded by the nsf");
        assert_eq!(example.intent(), "funder");
    }

    #[test]
    fn intent_is_kept_verbatim() {
        let example = LabeledExample::new("x", " No_Funder ");
        assert_eq!(example.intent(), " No_Funder ");
    }
}
